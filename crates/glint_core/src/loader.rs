//! Scene file loading.

use std::fs;
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::parser::{ParseError, SceneParser};
use crate::scene::{Scene, SceneLimits};

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a scene file with the default limits.
///
/// # Example
///
/// ```ignore
/// use glint_core::load_scene;
///
/// let scene = load_scene("scenes/spheres.scene")?;
/// println!("{} spheres, {} lights", scene.spheres().len(), scene.lights().len());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    load_scene_with_limits(path, SceneLimits::default())
}

/// Load a scene file with custom limits.
pub fn load_scene_with_limits<P: AsRef<Path>>(path: P, limits: SceneLimits) -> LoadResult<Scene> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let scene = SceneParser::new(&content).with_limits(limits).parse()?;

    info!(
        "Loaded {}: {} triangles, {} spheres, {} lights",
        path.display(),
        scene.triangles().len(),
        scene.spheres().len(),
        scene.lights().len()
    );

    Ok(scene)
}
