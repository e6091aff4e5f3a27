//! GPU backend abstraction layer.
//!
//! The engine never talks to a GPU API directly. Everything it needs —
//! buffer and staging-buffer lifetime, copy passes, render passes, pipeline
//! binds, per-draw uniform pushes — goes through the [`GpuBackend`] trait,
//! so the engine can sit on top of any device layer the host application
//! already owns.
//!
//! Handles are opaque: the backend mints them, the engine only stores and
//! returns them. Command buffers and render-target textures are created by
//! the host and passed through [`crate::DebugDraw::submit`] untouched.

pub mod dummy;

use thiserror::Error;

/// Errors that can occur in backend operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("failed to create shader: {0}")]
    ShaderCreationFailed(String),
    #[error("failed to create pipeline: {0}")]
    PipelineCreationFailed(String),
    #[error("failed to create buffer: {0}")]
    BufferCreationFailed(String),
    #[error("failed to map transfer buffer: {0}")]
    MapFailed(String),
    #[error("failed to begin copy pass: {0}")]
    CopyPassFailed(String),
    #[error("failed to begin render pass: {0}")]
    RenderPassFailed(String),
    #[error("no supported shader format")]
    FormatNotSupported,
    #[error("out of GPU memory")]
    OutOfMemory,
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to a device-resident buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a host-visible staging buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferBufferHandle(pub u64);

/// Handle to a compiled shader module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Handle to a graphics pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineHandle(pub u64);

/// Handle to a host-owned command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandBufferHandle(pub u64);

/// Handle to a host-owned render-target texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

bitflags::bitflags! {
    /// Usage flags for device buffers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Buffer can be bound as a vertex buffer.
        const VERTEX = 1 << 0;
        /// Buffer can be bound as a uniform buffer.
        const UNIFORM = 1 << 1;
        /// Buffer can be the source of a copy-pass transfer.
        const COPY_SRC = 1 << 2;
        /// Buffer can be the destination of a copy-pass transfer.
        const COPY_DST = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Shader binary formats a backend may accept.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderFormats: u32 {
        const SPIRV = 1 << 0;
        const DXIL = 1 << 1;
        const MSL = 1 << 2;
    }
}

/// Descriptor for creating a device buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferDescriptor {
    /// Debug label for the buffer.
    pub label: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Usage flags.
    pub usage: BufferUsage,
}

impl BufferDescriptor {
    /// Create a new buffer descriptor.
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            label: None,
            size,
            usage,
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Descriptor for creating a shader module.
#[derive(Debug, Clone)]
pub struct ShaderDescriptor {
    pub label: Option<String>,
    pub stage: ShaderStage,
    /// Format of `code` (exactly one bit set).
    pub format: ShaderFormats,
    pub code: Vec<u8>,
    pub entry_point: String,
    /// Number of uniform buffer slots the stage reads.
    pub uniform_buffers: u32,
}

/// Primitive topology of a pipeline, and the coalescing identity of a batch.
///
/// A closed enum on purpose: the batch/pipeline mapping matches on it
/// exhaustively, so adding a topology forces every site to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    LineList,
    TriangleList,
}

/// Texture formats the engine forwards into pipeline creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8Unorm,
    Bgra8Unorm,
    Rgba16Float,
    Depth16Unorm,
    Depth24PlusStencil8,
    Depth32Float,
}

/// Blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Blend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
}

/// Fixed-function blend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendState {
    pub src_color: BlendFactor,
    pub dst_color: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
    pub color_op: BlendOp,
    pub alpha_op: BlendOp,
}

impl BlendState {
    /// Standard `src*alpha + dst*(1-alpha)` blending.
    pub const fn alpha_blending() -> Self {
        Self {
            src_color: BlendFactor::SrcAlpha,
            dst_color: BlendFactor::OneMinusSrcAlpha,
            src_alpha: BlendFactor::SrcAlpha,
            dst_alpha: BlendFactor::OneMinusSrcAlpha,
            color_op: BlendOp::Add,
            alpha_op: BlendOp::Add,
        }
    }
}

/// Depth comparison function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    Always,
}

/// Depth state for pipelines that target a depth texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilState {
    pub format: TextureFormat,
    pub compare: CompareFunction,
    pub depth_write_enabled: bool,
}

/// Format of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    Float3,
    Uint,
}

/// One attribute of the vertex-input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: VertexAttributeFormat,
    pub offset: u32,
}

/// Interleaved vertex buffer layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexBufferLayout {
    pub stride: u32,
    pub attributes: Vec<VertexAttribute>,
}

/// Descriptor for creating a graphics pipeline.
#[derive(Debug, Clone)]
pub struct PipelineDescriptor {
    pub label: Option<String>,
    pub vertex_shader: ShaderHandle,
    pub fragment_shader: ShaderHandle,
    pub topology: PrimitiveTopology,
    pub vertex_layout: VertexBufferLayout,
    pub blend: BlendState,
    pub color_format: TextureFormat,
    /// Depth test/write state; `None` for pipelines without a depth target.
    pub depth: Option<DepthStencilState>,
}

/// Load operation for an attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOp {
    /// Keep the existing attachment contents.
    Load,
    /// Clear to the given color (unused by the engine, which never clears).
    Clear([f32; 4]),
}

/// Store operation for an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Store,
    Discard,
}

/// Color attachment of a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAttachment {
    pub texture: TextureHandle,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
}

/// Depth attachment of a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStencilAttachment {
    pub texture: TextureHandle,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
}

/// Descriptor for beginning a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPassDescriptor {
    pub label: Option<String>,
    pub color: ColorAttachment,
    pub depth: Option<DepthStencilAttachment>,
}

/// Capability interface the engine consumes.
///
/// Pass recording is stateful: `begin_copy_pass`/`end_copy_pass` bracket
/// `upload_buffer` calls, `begin_render_pass`/`end_render_pass` bracket the
/// bind/uniform/draw calls, all recording into the command buffer supplied
/// at `begin_*`. Outside a pass those calls are a contract violation.
///
/// Releasing a transfer buffer that is still mapped implicitly unmaps it
/// (the engine relies on this during teardown sweeps).
pub trait GpuBackend {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    /// Shader binary formats this backend accepts.
    fn supported_shader_formats(&self) -> ShaderFormats;

    /// Create a shader module.
    fn create_shader(&mut self, descriptor: &ShaderDescriptor) -> BackendResult<ShaderHandle>;

    /// Release a shader module.
    fn release_shader(&mut self, shader: ShaderHandle);

    /// Create a graphics pipeline.
    fn create_pipeline(&mut self, descriptor: &PipelineDescriptor) -> BackendResult<PipelineHandle>;

    /// Release a graphics pipeline.
    fn release_pipeline(&mut self, pipeline: PipelineHandle);

    /// Create a device buffer.
    fn create_buffer(&mut self, descriptor: &BufferDescriptor) -> BackendResult<BufferHandle>;

    /// Release a device buffer.
    fn release_buffer(&mut self, buffer: BufferHandle);

    /// Create a host-visible staging buffer of `size` bytes.
    fn create_transfer_buffer(&mut self, size: u32) -> BackendResult<TransferBufferHandle>;

    /// Map a staging buffer for host writes.
    fn map_transfer_buffer(&mut self, buffer: TransferBufferHandle) -> BackendResult<()>;

    /// Write into the mapped region of a staging buffer.
    ///
    /// Host-memory only; valid between map and unmap.
    fn write_transfer_buffer(&mut self, buffer: TransferBufferHandle, offset: u32, data: &[u8]);

    /// Unmap a staging buffer, making its contents visible to transfers.
    fn unmap_transfer_buffer(&mut self, buffer: TransferBufferHandle);

    /// Release a staging buffer.
    fn release_transfer_buffer(&mut self, buffer: TransferBufferHandle);

    /// Begin a copy pass on the given command buffer.
    fn begin_copy_pass(&mut self, command_buffer: CommandBufferHandle) -> BackendResult<()>;

    /// Record a staging-to-device transfer of `size` bytes (from offset 0).
    fn upload_buffer(&mut self, source: TransferBufferHandle, destination: BufferHandle, size: u32);

    /// End the current copy pass.
    fn end_copy_pass(&mut self);

    /// Begin a render pass on the given command buffer.
    fn begin_render_pass(
        &mut self,
        command_buffer: CommandBufferHandle,
        descriptor: &RenderPassDescriptor,
    ) -> BackendResult<()>;

    /// Bind a graphics pipeline.
    fn bind_pipeline(&mut self, pipeline: PipelineHandle);

    /// Bind a buffer as the sole vertex source.
    fn bind_vertex_buffer(&mut self, buffer: BufferHandle);

    /// Push uniform bytes for the vertex stage of the next draws.
    ///
    /// Binding a pipeline invalidates previously pushed data on some
    /// backends, so callers must re-push after every bind.
    fn push_vertex_uniform(&mut self, slot: u32, data: &[u8]);

    /// Record a non-indexed draw.
    fn draw(&mut self, vertex_count: u32, instance_count: u32);

    /// End the current render pass.
    fn end_render_pass(&mut self);
}
