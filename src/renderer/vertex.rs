//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.33, 0.68, 0.86, 1.0];
    pub const LETTERBOX: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const PIPE: [f32; 4] = [0.18, 0.77, 0.26, 1.0];
    pub const PIPE_CAP: [f32; 4] = [0.11, 0.54, 0.17, 1.0];
    pub const ACTOR: [f32; 4] = [0.98, 0.82, 0.16, 1.0];
    pub const ACTOR_EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const ACTOR_PUPIL: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
    pub const ACTOR_BEAK: [f32; 4] = [0.95, 0.45, 0.15, 1.0];
    /// Dims the field while the game-over message is up
    pub const GAME_OVER_SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
}
