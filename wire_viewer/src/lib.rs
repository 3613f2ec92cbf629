//! `wire_viewer`
//!
//! Interactive frontend for the wireframe renderer:
//! - Scene loading from JSON descriptor files
//! - Camera motion commands (move/turn, fixed steps)
//! - Cooperative animation stepping
//! - An ASCII character-grid drawing surface

pub mod app;
pub mod ascii;

pub use app::ViewerApp;
