//! Dummy GPU backend for testing and development.
//!
//! Performs no GPU work, but mints real handles, keeps staging-buffer
//! contents, and records every operation in order, so the whole engine can
//! be exercised and inspected without GPU hardware. Cloning shares the
//! underlying state; tests keep one clone to inspect what the engine did
//! through the other.
//!
//! Failure injection covers the engine's error paths: buffer and pipeline
//! creation can be made to fail after N successes, and mapping, copy-pass
//! and render-pass opens can be made to fail once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    BackendError, BackendResult, BufferDescriptor, BufferHandle, CommandBufferHandle, GpuBackend,
    PipelineDescriptor, PipelineHandle, PrimitiveTopology, RenderPassDescriptor, ShaderDescriptor,
    ShaderFormats, ShaderHandle, ShaderStage, TransferBufferHandle,
};

/// One recorded backend operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOp {
    CreateShader {
        handle: u64,
        stage: ShaderStage,
    },
    ReleaseShader(u64),
    CreatePipeline {
        handle: u64,
        topology: PrimitiveTopology,
        has_depth: bool,
    },
    ReleasePipeline(u64),
    CreateBuffer {
        handle: u64,
        size: u64,
    },
    ReleaseBuffer(u64),
    CreateTransferBuffer {
        handle: u64,
        size: u32,
    },
    MapTransferBuffer(u64),
    WriteTransferBuffer {
        handle: u64,
        offset: u32,
        len: u32,
    },
    UnmapTransferBuffer(u64),
    ReleaseTransferBuffer(u64),
    BeginCopyPass,
    /// Captures the exact bytes transferred, `[0, size)` of the source.
    Upload {
        source: u64,
        destination: u64,
        bytes: Vec<u8>,
    },
    EndCopyPass,
    BeginRenderPass {
        has_depth: bool,
    },
    BindPipeline(u64),
    BindVertexBuffer(u64),
    PushUniform {
        slot: u32,
        len: u32,
    },
    Draw {
        vertex_count: u32,
        instance_count: u32,
    },
    EndRenderPass,
}

struct TransferSlot {
    data: Vec<u8>,
    mapped: bool,
}

#[derive(Default)]
struct State {
    next_handle: u64,
    ops: Vec<BackendOp>,
    transfers: HashMap<u64, TransferSlot>,
    buffer_creates_before_failure: Option<u32>,
    pipeline_creates_before_failure: Option<u32>,
    fail_next_map: bool,
    fail_next_copy_pass: bool,
    fail_next_render_pass: bool,
}

impl State {
    fn mint(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

/// Recording no-op backend.
#[derive(Clone)]
pub struct DummyBackend {
    formats: ShaderFormats,
    state: Arc<Mutex<State>>,
}

impl DummyBackend {
    /// Create a new dummy backend advertising SPIR-V support.
    pub fn new() -> Self {
        Self::with_shader_formats(ShaderFormats::SPIRV)
    }

    /// Create a dummy backend advertising the given shader formats.
    pub fn with_shader_formats(formats: ShaderFormats) -> Self {
        Self {
            formats,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Snapshot the recorded operations.
    pub fn ops(&self) -> Vec<BackendOp> {
        self.state.lock().ops.clone()
    }

    /// Discard the recorded operations.
    pub fn clear_ops(&self) {
        self.state.lock().ops.clear();
    }

    /// Make buffer creation fail after `successes` more successful calls.
    pub fn fail_buffer_creates_after(&self, successes: u32) {
        self.state.lock().buffer_creates_before_failure = Some(successes);
    }

    /// Make pipeline creation fail after `successes` more successful calls.
    pub fn fail_pipeline_creates_after(&self, successes: u32) {
        self.state.lock().pipeline_creates_before_failure = Some(successes);
    }

    /// Make the next staging-buffer map fail.
    pub fn fail_next_map(&self) {
        self.state.lock().fail_next_map = true;
    }

    /// Make the next copy-pass open fail.
    pub fn fail_next_copy_pass(&self) {
        self.state.lock().fail_next_copy_pass = true;
    }

    /// Make the next render-pass open fail.
    pub fn fail_next_render_pass(&self) {
        self.state.lock().fail_next_render_pass = true;
    }
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn countdown(counter: &mut Option<u32>) -> bool {
    match counter {
        Some(0) => true,
        Some(remaining) => {
            *remaining -= 1;
            false
        }
        None => false,
    }
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn supported_shader_formats(&self) -> ShaderFormats {
        self.formats
    }

    fn create_shader(&mut self, descriptor: &ShaderDescriptor) -> BackendResult<ShaderHandle> {
        let mut state = self.state.lock();
        let handle = state.mint();
        log::trace!(
            "DummyBackend: creating {:?} shader {:?} ({} bytes)",
            descriptor.stage,
            descriptor.label,
            descriptor.code.len()
        );
        state.ops.push(BackendOp::CreateShader {
            handle,
            stage: descriptor.stage,
        });
        Ok(ShaderHandle(handle))
    }

    fn release_shader(&mut self, shader: ShaderHandle) {
        self.state.lock().ops.push(BackendOp::ReleaseShader(shader.0));
    }

    fn create_pipeline(&mut self, descriptor: &PipelineDescriptor) -> BackendResult<PipelineHandle> {
        let mut state = self.state.lock();
        if countdown(&mut state.pipeline_creates_before_failure) {
            return Err(BackendError::PipelineCreationFailed(
                "injected failure".into(),
            ));
        }
        let handle = state.mint();
        log::trace!(
            "DummyBackend: creating pipeline {:?} ({:?}, depth: {})",
            descriptor.label,
            descriptor.topology,
            descriptor.depth.is_some()
        );
        state.ops.push(BackendOp::CreatePipeline {
            handle,
            topology: descriptor.topology,
            has_depth: descriptor.depth.is_some(),
        });
        Ok(PipelineHandle(handle))
    }

    fn release_pipeline(&mut self, pipeline: PipelineHandle) {
        self.state
            .lock()
            .ops
            .push(BackendOp::ReleasePipeline(pipeline.0));
    }

    fn create_buffer(&mut self, descriptor: &BufferDescriptor) -> BackendResult<BufferHandle> {
        let mut state = self.state.lock();
        if countdown(&mut state.buffer_creates_before_failure) {
            return Err(BackendError::BufferCreationFailed("injected failure".into()));
        }
        let handle = state.mint();
        log::trace!(
            "DummyBackend: creating buffer {:?} (size: {})",
            descriptor.label,
            descriptor.size
        );
        state.ops.push(BackendOp::CreateBuffer {
            handle,
            size: descriptor.size,
        });
        Ok(BufferHandle(handle))
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.state.lock().ops.push(BackendOp::ReleaseBuffer(buffer.0));
    }

    fn create_transfer_buffer(&mut self, size: u32) -> BackendResult<TransferBufferHandle> {
        let mut state = self.state.lock();
        if countdown(&mut state.buffer_creates_before_failure) {
            return Err(BackendError::BufferCreationFailed("injected failure".into()));
        }
        let handle = state.mint();
        log::trace!("DummyBackend: creating transfer buffer (size: {})", size);
        state.transfers.insert(
            handle,
            TransferSlot {
                data: vec![0; size as usize],
                mapped: false,
            },
        );
        state
            .ops
            .push(BackendOp::CreateTransferBuffer { handle, size });
        Ok(TransferBufferHandle(handle))
    }

    fn map_transfer_buffer(&mut self, buffer: TransferBufferHandle) -> BackendResult<()> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_next_map) {
            return Err(BackendError::MapFailed("injected failure".into()));
        }
        if let Some(slot) = state.transfers.get_mut(&buffer.0) {
            slot.mapped = true;
        }
        state.ops.push(BackendOp::MapTransferBuffer(buffer.0));
        Ok(())
    }

    fn write_transfer_buffer(&mut self, buffer: TransferBufferHandle, offset: u32, data: &[u8]) {
        let mut state = self.state.lock();
        if let Some(slot) = state.transfers.get_mut(&buffer.0) {
            debug_assert!(slot.mapped, "write to unmapped transfer buffer");
            let start = offset as usize;
            let end = start + data.len();
            if slot.data.len() < end {
                slot.data.resize(end, 0);
            }
            slot.data[start..end].copy_from_slice(data);
        }
        state.ops.push(BackendOp::WriteTransferBuffer {
            handle: buffer.0,
            offset,
            len: data.len() as u32,
        });
    }

    fn unmap_transfer_buffer(&mut self, buffer: TransferBufferHandle) {
        let mut state = self.state.lock();
        if let Some(slot) = state.transfers.get_mut(&buffer.0) {
            slot.mapped = false;
        }
        state.ops.push(BackendOp::UnmapTransferBuffer(buffer.0));
    }

    fn release_transfer_buffer(&mut self, buffer: TransferBufferHandle) {
        let mut state = self.state.lock();
        if let Some(slot) = state.transfers.get_mut(&buffer.0) {
            slot.mapped = false;
        }
        state.ops.push(BackendOp::ReleaseTransferBuffer(buffer.0));
    }

    fn begin_copy_pass(&mut self, _command_buffer: CommandBufferHandle) -> BackendResult<()> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_next_copy_pass) {
            return Err(BackendError::CopyPassFailed("injected failure".into()));
        }
        state.ops.push(BackendOp::BeginCopyPass);
        Ok(())
    }

    fn upload_buffer(&mut self, source: TransferBufferHandle, destination: BufferHandle, size: u32) {
        let mut state = self.state.lock();
        let bytes = state
            .transfers
            .get(&source.0)
            .map(|slot| slot.data[..(size as usize).min(slot.data.len())].to_vec())
            .unwrap_or_default();
        log::trace!(
            "DummyBackend: upload {} -> {} ({} bytes)",
            source.0,
            destination.0,
            size
        );
        state.ops.push(BackendOp::Upload {
            source: source.0,
            destination: destination.0,
            bytes,
        });
    }

    fn end_copy_pass(&mut self) {
        self.state.lock().ops.push(BackendOp::EndCopyPass);
    }

    fn begin_render_pass(
        &mut self,
        _command_buffer: CommandBufferHandle,
        descriptor: &RenderPassDescriptor,
    ) -> BackendResult<()> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_next_render_pass) {
            return Err(BackendError::RenderPassFailed("injected failure".into()));
        }
        state.ops.push(BackendOp::BeginRenderPass {
            has_depth: descriptor.depth.is_some(),
        });
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: PipelineHandle) {
        self.state.lock().ops.push(BackendOp::BindPipeline(pipeline.0));
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferHandle) {
        self.state
            .lock()
            .ops
            .push(BackendOp::BindVertexBuffer(buffer.0));
    }

    fn push_vertex_uniform(&mut self, slot: u32, data: &[u8]) {
        self.state.lock().ops.push(BackendOp::PushUniform {
            slot,
            len: data.len() as u32,
        });
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32) {
        self.state.lock().ops.push(BackendOp::Draw {
            vertex_count,
            instance_count,
        });
    }

    fn end_render_pass(&mut self) {
        self.state.lock().ops.push(BackendOp::EndRenderPass);
    }
}
