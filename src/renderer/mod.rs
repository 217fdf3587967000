//! WebGPU rendering module
//!
//! Draws [`Frame`](crate::view::Frame) snapshots as flat-colored quads.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, field_to_ndc};
pub use vertex::Vertex;
