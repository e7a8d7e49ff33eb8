//! glint core - scene description types and loading.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Triangle`, `Vertex`, `Sphere`, `Light`
//! - **Scene files**: a tolerant-of-whitespace, strict-about-tokens parser
//!   and a path-based loader
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene;
//!
//! let scene = load_scene("scenes/table.scene")?;
//! println!("Loaded {} objects", scene.object_count());
//! ```

pub mod loader;
pub mod parser;
pub mod scene;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_with_limits, LoadError, LoadResult};
pub use parser::{parse_scene, parse_scene_with_limits, ParseError, ParseResult, SceneParser};
pub use scene::{
    CapacityError, Color, Light, ObjectKind, Scene, SceneLimits, Sphere, Triangle, Vertex,
};
