//! A batch: the minimal unit of GPU state.
//!
//! One device buffer plus one mapped staging buffer, both sized to the same
//! capacity, holding a contiguous run of vertices of a single primitive
//! kind. Batches are write-once-forward: the `size` cursor only advances,
//! and a batch is never revisited after it stops being the queue tail.

use crate::backend::{
    BackendResult, BufferDescriptor, BufferHandle, BufferUsage, GpuBackend, PrimitiveTopology,
    TransferBufferHandle,
};
use crate::vertex::Vertex;

/// Minimum capacity of a freshly allocated batch, in bytes.
pub(crate) const BATCH_CAPACITY: u32 = 1024;

pub(crate) struct Batch {
    kind: PrimitiveTopology,
    buffer: BufferHandle,
    staging: TransferBufferHandle,
    size: u32,
    capacity: u32,
}

impl Batch {
    /// Allocate a batch able to hold at least `requested` bytes.
    ///
    /// Creates the device buffer, the staging buffer, and maps the staging
    /// buffer for host writes. On any failure the resources created so far
    /// are released and nothing escapes.
    pub(crate) fn allocate(
        backend: &mut dyn GpuBackend,
        kind: PrimitiveTopology,
        requested: u32,
    ) -> BackendResult<Self> {
        let capacity = requested.max(BATCH_CAPACITY);
        let buffer = backend.create_buffer(
            &BufferDescriptor::new(
                capacity as u64,
                BufferUsage::VERTEX | BufferUsage::COPY_DST,
            )
            .with_label("debug_draw_batch"),
        )?;
        let staging = match backend.create_transfer_buffer(capacity) {
            Ok(handle) => handle,
            Err(error) => {
                backend.release_buffer(buffer);
                return Err(error);
            }
        };
        if let Err(error) = backend.map_transfer_buffer(staging) {
            backend.release_transfer_buffer(staging);
            backend.release_buffer(buffer);
            return Err(error);
        }
        Ok(Self {
            kind,
            buffer,
            staging,
            size: 0,
            capacity,
        })
    }

    pub(crate) fn kind(&self) -> PrimitiveTopology {
        self.kind
    }

    pub(crate) fn buffer(&self) -> BufferHandle {
        self.buffer
    }

    pub(crate) fn staging(&self) -> TransferBufferHandle {
        self.staging
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.capacity
    }

    pub(crate) fn vertex_count(&self) -> u32 {
        self.size / Vertex::STRIDE
    }

    /// Whether `bytes` more bytes fit behind the cursor.
    pub(crate) fn fits(&self, bytes: u32) -> bool {
        self.size + bytes <= self.capacity
    }

    /// Copy `data` into staging memory at the cursor and advance it.
    pub(crate) fn write(&mut self, backend: &mut dyn GpuBackend, data: &[u8]) {
        debug_assert!(self.fits(data.len() as u32));
        backend.write_transfer_buffer(self.staging, self.size, data);
        self.size += data.len() as u32;
    }

    /// Release both buffers. Valid whether or not staging is still mapped.
    pub(crate) fn release(&self, backend: &mut dyn GpuBackend) {
        backend.release_transfer_buffer(self.staging);
        backend.release_buffer(self.buffer);
    }
}
