//! Pinhole camera and primary ray generation.
//!
//! The image plane sits at z = -1 in front of the eye. Its corners come from
//! the vertical field of view and the aspect ratio; pixel directions are a
//! separable linear subdivision between those corners.

use glint_math::{DVec2, DVec3, Ray};

/// The four corners of the image plane, relative to the eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageCorners {
    pub top_left: DVec3,
    pub top_right: DVec3,
    pub bottom_left: DVec3,
    pub bottom_right: DVec3,
}

/// Camera for generating primary rays.
///
/// The camera always looks down -z with +y up; only the eye position moves.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    eye: DVec3,
    vfov: f64, // Vertical field of view in degrees

    // Cached computed values (refreshed by every builder method)
    corners: ImageCorners,
    pixel_delta: DVec2,
}

impl Camera {
    /// Create a 640x480 camera with a 60 degree field of view at the origin.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 640,
            image_height: 480,
            eye: DVec3::ZERO,
            vfov: 60.0,
            corners: ImageCorners {
                top_left: DVec3::ZERO,
                top_right: DVec3::ZERO,
                bottom_left: DVec3::ZERO,
                bottom_right: DVec3::ZERO,
            },
            pixel_delta: DVec2::ZERO,
        };
        camera.update();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self.update();
        self
    }

    /// Set the vertical field of view, in degrees.
    pub fn with_fov(mut self, vfov: f64) -> Self {
        self.vfov = vfov;
        self.update();
        self
    }

    /// Set the eye position.
    pub fn with_eye(mut self, eye: DVec3) -> Self {
        self.eye = eye;
        self
    }

    pub fn eye(&self) -> DVec3 {
        self.eye
    }

    pub fn corners(&self) -> ImageCorners {
        self.corners
    }

    fn update(&mut self) {
        let aspect = self.image_width as f64 / self.image_height as f64;
        let half_height = (self.vfov.to_radians() / 2.0).tan();
        let half_width = aspect * half_height;

        self.corners = ImageCorners {
            top_left: DVec3::new(-half_width, half_height, -1.0),
            top_right: DVec3::new(half_width, half_height, -1.0),
            bottom_left: DVec3::new(-half_width, -half_height, -1.0),
            bottom_right: DVec3::new(half_width, -half_height, -1.0),
        };

        // A single column or row has no span to divide; it sits on the
        // left or bottom edge.
        let columns = self.image_width.saturating_sub(1).max(1) as f64;
        let rows = self.image_height.saturating_sub(1).max(1) as f64;

        self.pixel_delta = DVec2::new(
            (self.corners.top_right.x - self.corners.top_left.x) / columns,
            (self.corners.top_left.y - self.corners.bottom_left.y) / rows,
        );
    }

    /// Unit direction through pixel (x, row), with row 0 at the top.
    pub fn direction(&self, x: u32, row: u32) -> DVec3 {
        let from_bottom = self.image_height.saturating_sub(1).saturating_sub(row);
        let origin = self.corners.bottom_left;

        DVec3::new(
            origin.x + x as f64 * self.pixel_delta.x,
            origin.y + from_bottom as f64 * self.pixel_delta.y,
            origin.z,
        )
        .normalize()
    }

    /// Primary ray for pixel (x, row), with row 0 at the top.
    pub fn get_ray(&self, x: u32, row: u32) -> Ray {
        Ray::new(self.eye, self.direction(x, row))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
