//! A thin OpenGL layer for single-threaded 2D rendering: shader programs
//! with reflected bindings, scoped guards over the global binding points,
//! and exclusive-ownership wrappers for buffers, vertex arrays and textures.
//!
//! Context creation and GL function loading belong to the windowing layer;
//! this crate assumes `gl` function pointers are already loaded on the
//! calling thread.

pub mod binding;
pub mod error;
pub mod image;
pub mod linear;
pub mod program;
pub mod texture;
pub mod vertex;

pub use binding::{ActiveTextureUnit, GpuState, Scoped};
pub use error::{Error, NameKind, Stage};
pub use image::ImageData;
pub use linear::Vec2;
pub use program::Program;
pub use texture::{Texture, WrapMode};
pub use vertex::{Buffer, VertexArray, VertexData};
