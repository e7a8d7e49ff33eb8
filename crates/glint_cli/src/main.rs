//! glint - render a scene file with the CPU ray tracer
//!
//! With an output path the frame is encoded and saved; without one it is
//! shown in a window (requires the `viewer` feature).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use glint_core::{load_scene_with_limits, SceneLimits};
use glint_math::DVec3;
use glint_renderer::{
    render, render_bucketed, ImageBuffer, RenderConfig, SphereLighting, TriangleShadowScan,
};

#[cfg(feature = "viewer")]
mod viewer;

#[derive(Parser, Debug)]
#[command(name = "glint")]
#[command(about = "Phong ray tracer for triangle and sphere scenes", long_about = None)]
struct Cli {
    /// Scene description file
    scene: PathBuf,

    /// Output image (format from extension: .jpg, .jpeg, .png, .ppm, .bmp).
    /// Without it the render is shown in a window.
    output: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 480, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f64,

    /// Eye position as x,y,z (the view direction is always -z)
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    eye: DVec3,

    /// Color for pixels that hit nothing, as r,g,b in [0, 1]
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    background: DVec3,

    /// Render threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Light spheres with every light instead of only the first one
    #[arg(long)]
    all_lights: bool,

    /// Leave the scene's last triangle out of shadow tests from triangles
    #[arg(long)]
    skip_last_shadow_triangle: bool,

    #[arg(long, default_value_t = 2000)]
    max_triangles: usize,

    #[arg(long, default_value_t = 10)]
    max_spheres: usize,

    #[arg(long, default_value_t = 10)]
    max_lights: usize,

    /// Render in square buckets of this size instead of by rows
    #[arg(long, value_name = "SIZE")]
    buckets: Option<u32>,
}

impl Cli {
    fn limits(&self) -> SceneLimits {
        SceneLimits {
            max_triangles: self.max_triangles,
            max_spheres: self.max_spheres,
            max_lights: self.max_lights,
        }
    }

    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            field_of_view: self.fov,
            eye: self.eye,
            background: self.background,
            sphere_lighting: if self.all_lights {
                SphereLighting::AllLights
            } else {
                SphereLighting::FirstLight
            },
            triangle_shadow_scan: if self.skip_last_shadow_triangle {
                TriangleShadowScan::SkipLast
            } else {
                TriangleShadowScan::All
            },
            threads: self.threads,
        }
    }
}

/// Parse "x,y,z" into a vector.
fn parse_vec3(s: &str) -> Result<DVec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected three comma-separated numbers, got '{}'", s));
    }

    let mut v = [0.0; 3];
    for (slot, part) in v.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{}' is not a number", part))?;
    }
    Ok(DVec3::from_array(v))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let scene = load_scene_with_limits(&cli.scene, cli.limits())
        .with_context(|| format!("Failed to load scene {}", cli.scene.display()))?;
    let config = cli.render_config();

    match &cli.output {
        Some(output) => {
            check_format(output)?;

            let frame = match cli.buckets {
                Some(size) => render_bucketed(&scene, &config, size),
                None => render(&scene, &config),
            };

            save_image(&frame, output)?;
            log::info!("Saved {}", output.display());
        }
        None => display(scene, config, cli.buckets)?,
    }

    Ok(())
}

/// Reject unsupported output formats before spending time on the render.
fn check_format(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "ppm" | "bmp" => Ok(()),
        "" => bail!("Output {} has no extension to pick a format from", path.display()),
        _ => bail!("Unknown output format: {}", ext),
    }
}

fn save_image(frame: &ImageBuffer, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        frame.as_bytes(),
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(feature = "viewer")]
fn display(
    scene: glint_core::Scene,
    config: RenderConfig,
    bucket_size: Option<u32>,
) -> Result<()> {
    viewer::run(
        scene,
        config,
        bucket_size.unwrap_or(glint_renderer::DEFAULT_BUCKET_SIZE),
    )
}

#[cfg(not(feature = "viewer"))]
fn display(
    _scene: glint_core::Scene,
    _config: RenderConfig,
    _bucket_size: Option<u32>,
) -> Result<()> {
    bail!("No output path given, and this build has no display window (enable the `viewer` feature)")
}
