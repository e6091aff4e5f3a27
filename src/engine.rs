//! The debug draw engine.
//!
//! An explicit context object owning the backend, the four pipelines, the
//! command queue and the active color. Draw calls tessellate on the CPU and
//! append into host-visible staging memory; nothing reaches the GPU until
//! [`submit`](DebugDraw::submit) uploads every batch and issues the draws
//! in call order.

use glam::Mat4;

use crate::backend::{
    ColorAttachment, CommandBufferHandle, DepthStencilAttachment, GpuBackend, LoadOp,
    PipelineHandle, PrimitiveTopology, RenderPassDescriptor, StoreOp, TextureFormat, TextureHandle,
};
use crate::error::{DrawError, DrawResult};
use crate::geometry;
use crate::pipeline::PipelineSet;
use crate::queue::CommandQueue;
use crate::text;
use crate::vertex::pack_color;

/// Immediate-mode debug geometry renderer.
///
/// One engine per render target family; independent engines are fully
/// isolated. Dropping the engine releases every pending batch and the
/// pipelines.
pub struct DebugDraw {
    backend: Box<dyn GpuBackend>,
    pipelines: PipelineSet,
    queue: CommandQueue,
    color: u32,
}

impl DebugDraw {
    /// Create an engine drawing to targets of the given formats.
    ///
    /// Builds the shader pair and all four pipelines up front. Fails
    /// atomically: on error everything created so far has been released
    /// and the backend is dropped.
    pub fn new(
        mut backend: Box<dyn GpuBackend>,
        color_format: TextureFormat,
        depth_format: TextureFormat,
    ) -> DrawResult<Self> {
        let pipelines = PipelineSet::create(backend.as_mut(), color_format, depth_format)?;
        log::debug!(
            "debug draw engine ready (backend: {}, color: {:?}, depth: {:?})",
            backend.name(),
            color_format,
            depth_format
        );
        Ok(Self {
            backend,
            pipelines,
            queue: CommandQueue::new(),
            color: 0xFFFF_FFFF,
        })
    }

    /// Shut the engine down, releasing pending batches and pipelines.
    ///
    /// Equivalent to dropping it; provided for call sites that want the
    /// teardown to read explicitly.
    pub fn shutdown(self) {}

    /// Set the color applied to vertices of subsequent draw calls.
    ///
    /// Channels are `[0, 1]` floats; the color is packed to RGBA8 and
    /// captured into each vertex at push time.
    pub fn set_color(&mut self, color: [f32; 4]) -> DrawResult<()> {
        if !color.iter().all(|c| c.is_finite()) {
            return Err(DrawError::InvalidArgument("color"));
        }
        self.color = pack_color(color);
        Ok(())
    }

    /// Draw a point as a solid cube of half-extent `radius`.
    pub fn draw_point(&mut self, center: [f32; 3], radius: f32) -> DrawResult<()> {
        if !finite3(center) {
            return Err(DrawError::InvalidArgument("center"));
        }
        if !radius.is_finite() || radius < f32::EPSILON {
            return Err(DrawError::InvalidArgument("radius"));
        }
        let vertices = geometry::cube(center, radius, self.color);
        self.queue
            .enqueue(
                self.backend.as_mut(),
                PrimitiveTopology::TriangleList,
                &vertices,
            )
            .map_err(Into::into)
    }

    /// Draw the wireframe box spanned by two opposite corners.
    ///
    /// Corners are used as-is; no min/max normalization.
    pub fn draw_box(&mut self, corner_a: [f32; 3], corner_b: [f32; 3]) -> DrawResult<()> {
        if !finite3(corner_a) {
            return Err(DrawError::InvalidArgument("corner_a"));
        }
        if !finite3(corner_b) {
            return Err(DrawError::InvalidArgument("corner_b"));
        }
        let vertices = geometry::box_edges(corner_a, corner_b, self.color);
        self.queue
            .enqueue(self.backend.as_mut(), PrimitiveTopology::LineList, &vertices)
            .map_err(Into::into)
    }

    /// Draw a line segment.
    pub fn draw_line(&mut self, start: [f32; 3], end: [f32; 3]) -> DrawResult<()> {
        if !finite3(start) {
            return Err(DrawError::InvalidArgument("start"));
        }
        if !finite3(end) {
            return Err(DrawError::InvalidArgument("end"));
        }
        let vertices = geometry::line(start, end, self.color);
        self.queue
            .enqueue(self.backend.as_mut(), PrimitiveTopology::LineList, &vertices)
            .map_err(Into::into)
    }

    /// Draw a lat/long wireframe sphere.
    ///
    /// Every grid line goes through the same path as
    /// [`draw_line`](Self::draw_line), so a sphere coalesces no better than
    /// the equivalent run of line calls. Debug draw is not a hot path;
    /// simplicity wins over throughput here.
    pub fn draw_sphere(&mut self, center: [f32; 3], radius: f32) -> DrawResult<()> {
        if !finite3(center) {
            return Err(DrawError::InvalidArgument("center"));
        }
        if !radius.is_finite() || radius < f32::EPSILON {
            return Err(DrawError::InvalidArgument("radius"));
        }
        for (start, end) in geometry::sphere_outline(center, radius) {
            let vertices = geometry::line(start, end, self.color);
            self.queue
                .enqueue(self.backend.as_mut(), PrimitiveTopology::LineList, &vertices)?;
        }
        Ok(())
    }

    /// Draw vector-stroke text on the z = 0 plane.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, size: i32) -> DrawResult<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(DrawError::InvalidArgument("position"));
        }
        if size < 3 {
            return Err(DrawError::InvalidArgument("size"));
        }
        for segment in text::render_text(text, x as i32, y as i32, size) {
            let vertices = geometry::line(
                [segment.start[0] as f32, segment.start[1] as f32, 0.0],
                [segment.end[0] as f32, segment.end[1] as f32, 0.0],
                self.color,
            );
            self.queue
                .enqueue(self.backend.as_mut(), PrimitiveTopology::LineList, &vertices)?;
        }
        Ok(())
    }

    /// Upload every pending batch and issue its draw, in call order.
    ///
    /// Records one copy pass and one render pass into `command_buffer`.
    /// Targets are loaded and stored, never cleared; clearing is the
    /// caller's responsibility before submitting.
    ///
    /// If the copy pass fails to open, the queue is untouched and the call
    /// may be retried. Once the upload has run, the queue is drained no
    /// matter what: a render-pass failure releases every batch and resets
    /// the queue before reporting the error.
    pub fn submit(
        &mut self,
        command_buffer: CommandBufferHandle,
        color_target: TextureHandle,
        depth_target: Option<TextureHandle>,
        view_proj: &Mat4,
    ) -> DrawResult<()> {
        self.backend.begin_copy_pass(command_buffer)?;
        for batch in self.queue.iter() {
            self.backend.unmap_transfer_buffer(batch.staging());
            self.backend
                .upload_buffer(batch.staging(), batch.buffer(), batch.size());
        }
        self.backend.end_copy_pass();

        let descriptor = RenderPassDescriptor {
            label: Some("debug_draw".into()),
            color: ColorAttachment {
                texture: color_target,
                load_op: LoadOp::Load,
                store_op: StoreOp::Store,
            },
            depth: depth_target.map(|texture| DepthStencilAttachment {
                texture,
                load_op: LoadOp::Load,
                store_op: StoreOp::Store,
            }),
        };
        if let Err(error) = self.backend.begin_render_pass(command_buffer, &descriptor) {
            // Upload already ran; draining is the only consistent exit.
            log::warn!(
                "render pass failed after upload; dropping {} batches",
                self.queue.len()
            );
            self.queue.release_all(self.backend.as_mut());
            return Err(error.into());
        }

        let depth = depth_target.is_some();
        let mut bound: Option<PipelineHandle> = None;
        for batch in self.queue.drain() {
            let pipeline = self.pipelines.select(batch.kind(), depth);
            if bound != Some(pipeline) {
                bound = Some(pipeline);
                self.backend.bind_pipeline(pipeline);
                // Pipeline binds invalidate pushed uniforms on some
                // backends; re-push after every switch.
                self.backend
                    .push_vertex_uniform(0, bytemuck::bytes_of(view_proj));
            }
            self.backend.bind_vertex_buffer(batch.buffer());
            self.backend.draw(batch.vertex_count(), 1);
            batch.release(self.backend.as_mut());
        }
        self.backend.end_render_pass();
        Ok(())
    }

    /// Number of batches waiting for the next submission.
    pub fn pending_batches(&self) -> usize {
        self.queue.len()
    }

    /// Bytes of vertex data waiting for the next submission.
    pub fn pending_bytes(&self) -> u32 {
        self.queue.total_bytes()
    }
}

impl Drop for DebugDraw {
    fn drop(&mut self) {
        if !self.queue.is_empty() {
            log::debug!(
                "debug draw engine dropped with {} unsubmitted batches",
                self.queue.len()
            );
        }
        self.queue.release_all(self.backend.as_mut());
        self.pipelines.release(self.backend.as_mut());
    }
}

fn finite3(v: [f32; 3]) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyBackend;

    fn engine() -> DebugDraw {
        DebugDraw::new(
            Box::new(DummyBackend::new()),
            TextureFormat::Bgra8Unorm,
            TextureFormat::Depth32Float,
        )
        .unwrap()
    }

    #[test]
    fn test_set_color_rejects_non_finite() {
        let mut engine = engine();
        assert!(engine.set_color([f32::NAN, 0.0, 0.0, 1.0]).is_err());
        assert!(engine.set_color([0.2, 0.4, 0.6, 1.0]).is_ok());
    }

    #[test]
    fn test_degenerate_radius_enqueues_nothing() {
        let mut engine = engine();
        assert!(engine.draw_point([0.0; 3], 0.0).is_err());
        assert!(engine.draw_point([0.0; 3], -1.0).is_err());
        assert!(engine.draw_point([0.0; 3], f32::NAN).is_err());
        assert!(engine.draw_sphere([0.0; 3], 0.0).is_err());
        assert_eq!(engine.pending_batches(), 0);
    }

    #[test]
    fn test_non_finite_positions_rejected() {
        let mut engine = engine();
        assert!(engine.draw_line([f32::INFINITY, 0.0, 0.0], [0.0; 3]).is_err());
        assert!(engine.draw_box([0.0; 3], [0.0, f32::NAN, 0.0]).is_err());
        assert!(engine.draw_text("x", f32::NAN, 0.0, 8).is_err());
        assert_eq!(engine.pending_batches(), 0);
    }

    #[test]
    fn test_text_size_minimum() {
        let mut engine = engine();
        assert!(engine.draw_text("abc", 0.0, 0.0, 2).is_err());
        assert!(engine.draw_text("abc", 0.0, 0.0, 3).is_ok());
    }
}
