//! Pipeline creation and selection.
//!
//! Four pipelines cover every draw the engine issues:
//! `{line, triangle} × {no depth target, depth target}`. All four share the
//! same shader program, vertex layout and alpha blend state; they differ
//! only in topology and depth state. They are created once at engine
//! construction and selected by pure lookup per batch.

use crate::backend::{
    BackendResult, BlendState, CompareFunction, DepthStencilState, GpuBackend, PipelineDescriptor,
    PipelineHandle, PrimitiveTopology, ShaderDescriptor, ShaderStage, TextureFormat,
};
use crate::shader;
use crate::vertex::Vertex;

/// The four precompiled pipeline handles.
pub(crate) struct PipelineSet {
    handles: [PipelineHandle; 4],
}

fn index(topology: PrimitiveTopology, depth: bool) -> usize {
    match (topology, depth) {
        (PrimitiveTopology::LineList, false) => 0,
        (PrimitiveTopology::LineList, true) => 1,
        (PrimitiveTopology::TriangleList, false) => 2,
        (PrimitiveTopology::TriangleList, true) => 3,
    }
}

impl PipelineSet {
    /// Build the shader pair and all four pipelines.
    ///
    /// Fails atomically: on any error every pipeline created so far is
    /// released before returning. The shader modules are released in all
    /// cases once pipeline creation has been attempted.
    pub(crate) fn create(
        backend: &mut dyn GpuBackend,
        color_format: TextureFormat,
        depth_format: TextureFormat,
    ) -> BackendResult<Self> {
        let program = shader::select(backend.supported_shader_formats())?;

        let vertex_shader = backend.create_shader(&ShaderDescriptor {
            label: Some("debug_draw_vertex".into()),
            stage: ShaderStage::Vertex,
            format: program.format,
            code: program.vertex_code.to_vec(),
            entry_point: program.entry_point.into(),
            uniform_buffers: 1,
        })?;
        let fragment_shader = match backend.create_shader(&ShaderDescriptor {
            label: Some("debug_draw_fragment".into()),
            stage: ShaderStage::Fragment,
            format: program.format,
            code: program.fragment_code.to_vec(),
            entry_point: program.entry_point.into(),
            uniform_buffers: 0,
        }) {
            Ok(handle) => handle,
            Err(error) => {
                backend.release_shader(vertex_shader);
                return Err(error);
            }
        };

        let variants = [
            (PrimitiveTopology::LineList, false),
            (PrimitiveTopology::LineList, true),
            (PrimitiveTopology::TriangleList, false),
            (PrimitiveTopology::TriangleList, true),
        ];
        let mut created = Vec::with_capacity(variants.len());
        let mut failure = None;
        for (topology, depth) in variants {
            let descriptor = PipelineDescriptor {
                label: Some(format!(
                    "debug_draw_{:?}_{}",
                    topology,
                    if depth { "depth" } else { "no_depth" }
                )),
                vertex_shader,
                fragment_shader,
                topology,
                vertex_layout: Vertex::buffer_layout(),
                blend: BlendState::alpha_blending(),
                color_format,
                depth: depth.then_some(DepthStencilState {
                    format: depth_format,
                    compare: CompareFunction::Less,
                    depth_write_enabled: true,
                }),
            };
            match backend.create_pipeline(&descriptor) {
                Ok(handle) => created.push(handle),
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
        }

        backend.release_shader(vertex_shader);
        backend.release_shader(fragment_shader);

        if let Some(error) = failure {
            for handle in created {
                backend.release_pipeline(handle);
            }
            return Err(error);
        }

        let handles = [created[0], created[1], created[2], created[3]];
        Ok(Self { handles })
    }

    /// Pipeline for a batch of `topology` drawn with or without a depth target.
    pub(crate) fn select(&self, topology: PrimitiveTopology, depth: bool) -> PipelineHandle {
        self.handles[index(topology, depth)]
    }

    pub(crate) fn release(&self, backend: &mut dyn GpuBackend) {
        for handle in self.handles {
            backend.release_pipeline(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::{BackendOp, DummyBackend};

    fn formats() -> (TextureFormat, TextureFormat) {
        (TextureFormat::Bgra8Unorm, TextureFormat::Depth32Float)
    }

    #[test]
    fn test_selection_is_exhaustive_and_distinct() {
        let mut backend = DummyBackend::new();
        let (color, depth) = formats();
        let pipelines = PipelineSet::create(&mut backend, color, depth).unwrap();
        let all = [
            pipelines.select(PrimitiveTopology::LineList, false),
            pipelines.select(PrimitiveTopology::LineList, true),
            pipelines.select(PrimitiveTopology::TriangleList, false),
            pipelines.select(PrimitiveTopology::TriangleList, true),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_shaders_released_after_creation() {
        let mut backend = DummyBackend::new();
        let (color, depth) = formats();
        PipelineSet::create(&mut backend, color, depth).unwrap();
        let ops = backend.ops();
        let created = ops
            .iter()
            .filter(|op| matches!(op, BackendOp::CreateShader { .. }))
            .count();
        let released = ops
            .iter()
            .filter(|op| matches!(op, BackendOp::ReleaseShader(_)))
            .count();
        assert_eq!(created, 2);
        assert_eq!(released, 2);
    }

    #[test]
    fn test_partial_failure_rolls_back_created_pipelines() {
        let mut backend = DummyBackend::new();
        backend.fail_pipeline_creates_after(2);
        let (color, depth) = formats();
        assert!(PipelineSet::create(&mut backend, color, depth).is_err());
        let ops = backend.ops();
        let created: Vec<u64> = ops
            .iter()
            .filter_map(|op| match op {
                BackendOp::CreatePipeline { handle, .. } => Some(*handle),
                _ => None,
            })
            .collect();
        let released: Vec<u64> = ops
            .iter()
            .filter_map(|op| match op {
                BackendOp::ReleasePipeline(handle) => Some(*handle),
                _ => None,
            })
            .collect();
        assert_eq!(created.len(), 2);
        assert_eq!(released, created);
    }

    #[test]
    fn test_unsupported_format_fails_before_creating_anything() {
        let mut backend = DummyBackend::with_shader_formats(crate::backend::ShaderFormats::empty());
        let (color, depth) = formats();
        assert!(PipelineSet::create(&mut backend, color, depth).is_err());
        assert!(backend.ops().is_empty());
    }
}
