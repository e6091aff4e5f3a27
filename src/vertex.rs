use crate::backend::{VertexAttribute, VertexAttributeFormat, VertexBufferLayout};

/// A debug draw vertex: position + packed color.
///
/// The layout is a wire contract with the pipeline vertex-input declaration:
/// position as three floats at offset 0, packed RGBA8 color as a uint at
/// offset 12, 16 bytes total. Both sides must change together.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: u32,
}

static_assertions::const_assert_eq!(std::mem::size_of::<Vertex>(), 16);
static_assertions::const_assert_eq!(std::mem::align_of::<Vertex>(), 4);

impl Vertex {
    /// Vertex stride in bytes.
    pub const STRIDE: u32 = std::mem::size_of::<Self>() as u32;

    pub fn new(position: [f32; 3], color: u32) -> Self {
        Self { position, color }
    }

    /// Vertex-input layout shared by every debug draw pipeline.
    pub fn buffer_layout() -> VertexBufferLayout {
        VertexBufferLayout {
            stride: Self::STRIDE,
            attributes: vec![
                VertexAttribute {
                    location: 0,
                    format: VertexAttributeFormat::Float3,
                    offset: 0,
                },
                VertexAttribute {
                    location: 1,
                    format: VertexAttributeFormat::Uint,
                    offset: 12,
                },
            ],
        }
    }
}

/// Pack a float RGBA color into `r<<24 | g<<16 | b<<8 | a`.
///
/// Channels are scaled by 255 and clamped to `[0, 255]`, so each survives a
/// round trip within 8-bit quantization (±1/255).
pub fn pack_color(color: [f32; 4]) -> u32 {
    let channel = |c: f32| (c * 255.0).clamp(0.0, 255.0) as u32;
    channel(color[0]) << 24 | channel(color[1]) << 16 | channel(color[2]) << 8 | channel(color[3])
}
