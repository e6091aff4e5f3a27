//! Immediate-mode debug geometry rendering over a pluggable GPU backend.
//!
//! Callers issue draw calls for points, boxes, lines, spheres and text
//! across a frame; the engine coalesces them into a bounded number of
//! GPU buffers and replays them in call order in a single deferred
//! submission pass. There is no scene graph and no retained draw objects —
//! every submission fully drains the queue.
//!
//! # Architecture
//!
//! - [`DebugDraw`] — engine context: draw API, batching, submission
//! - [`GpuBackend`] — capability interface onto the host's device layer
//! - [`DummyBackend`] — recording no-op backend for tests and headless runs
//! - [`render_text`] — pure string-to-line-segments vector font
//!
//! # Usage
//!
//! ```ignore
//! let mut draw = DebugDraw::new(backend, color_format, depth_format)?;
//!
//! // Each frame:
//! draw.set_color([0.0, 1.0, 0.0, 1.0])?;
//! draw.draw_line([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])?;
//! draw.draw_box([-1.0; 3], [1.0; 3])?;
//! draw.draw_text("fps: 60", 8.0, 8.0, 12)?;
//!
//! // After clearing the targets:
//! draw.submit(command_buffer, color_target, Some(depth_target), &view_proj)?;
//! ```

pub mod backend;
mod batch;
mod engine;
mod error;
mod geometry;
mod pipeline;
mod queue;
mod shader;
pub mod text;
mod vertex;

pub use backend::dummy::DummyBackend;
pub use backend::{
    BackendError, BackendResult, BufferHandle, CommandBufferHandle, GpuBackend, PipelineHandle,
    ShaderHandle, TextureFormat, TextureHandle, TransferBufferHandle,
};
pub use engine::DebugDraw;
pub use error::{DrawError, DrawResult};
pub use text::{render_text, Segment};
pub use vertex::{pack_color, Vertex};
