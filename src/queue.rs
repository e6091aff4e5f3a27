//! The command queue: one frame's worth of pending batches.
//!
//! An ordered, owning list of [`Batch`]es. Batches appear in the order
//! their first vertex was pushed, and only the tail is eligible to receive
//! appends, so draw order is always caller order. The queue grows across
//! `draw_*` calls and is fully drained by a successful submission.

use crate::backend::{BackendResult, GpuBackend, PrimitiveTopology};
use crate::batch::Batch;
use crate::vertex::Vertex;

#[derive(Default)]
pub(crate) struct CommandQueue {
    batches: Vec<Batch>,
}

impl CommandQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Route vertices of `kind` into the tail batch, or a new one.
    ///
    /// The append-vs-allocate decision is tail-only and O(1): a batch is
    /// never revisited or merged once it stops being the tail. Allocation
    /// failure leaves the queue exactly as it was.
    pub(crate) fn enqueue(
        &mut self,
        backend: &mut dyn GpuBackend,
        kind: PrimitiveTopology,
        vertices: &[Vertex],
    ) -> BackendResult<()> {
        let data: &[u8] = bytemuck::cast_slice(vertices);
        match self.batches.last_mut() {
            Some(tail) if tail.kind() == kind && tail.fits(data.len() as u32) => {
                tail.write(backend, data);
            }
            _ => {
                let mut batch = Batch::allocate(backend, kind, data.len() as u32)?;
                batch.write(backend, data);
                self.batches.push(batch);
            }
        }
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.batches.len()
    }

    /// Total bytes written across all batches.
    pub(crate) fn total_bytes(&self) -> u32 {
        self.batches.iter().map(Batch::size).sum()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Batch> {
        self.batches.iter()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Batch> {
        self.batches.drain(..)
    }

    /// Teardown sweep: release every batch's buffers and reset to empty.
    pub(crate) fn release_all(&mut self, backend: &mut dyn GpuBackend) {
        for batch in self.batches.drain(..) {
            batch.release(backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::{BackendOp, DummyBackend};
    use crate::batch::BATCH_CAPACITY;

    fn line_vertices(count: usize) -> Vec<Vertex> {
        (0..count * 2)
            .map(|i| Vertex::new([i as f32, 0.0, 0.0], 0xFFFF_FFFF))
            .collect()
    }

    #[test]
    fn test_same_kind_pushes_coalesce() {
        let mut backend = DummyBackend::new();
        let mut queue = CommandQueue::new();
        for _ in 0..4 {
            queue
                .enqueue(&mut backend, PrimitiveTopology::LineList, &line_vertices(1))
                .unwrap();
        }
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.total_bytes(), 4 * 2 * Vertex::STRIDE);
    }

    #[test]
    fn test_kind_change_starts_a_new_batch() {
        let mut backend = DummyBackend::new();
        let mut queue = CommandQueue::new();
        for kind in [
            PrimitiveTopology::LineList,
            PrimitiveTopology::TriangleList,
            PrimitiveTopology::LineList,
        ] {
            queue.enqueue(&mut backend, kind, &line_vertices(1)).unwrap();
        }
        assert_eq!(queue.len(), 3);
        let kinds: Vec<_> = queue.iter().map(Batch::kind).collect();
        assert_eq!(
            kinds,
            [
                PrimitiveTopology::LineList,
                PrimitiveTopology::TriangleList,
                PrimitiveTopology::LineList,
            ]
        );
    }

    #[test]
    fn test_overflow_allocates_second_batch_without_loss() {
        let mut backend = DummyBackend::new();
        let mut queue = CommandQueue::new();
        let lines_per_batch = (BATCH_CAPACITY / (2 * Vertex::STRIDE)) as usize;
        for _ in 0..lines_per_batch + 1 {
            queue
                .enqueue(&mut backend, PrimitiveTopology::LineList, &line_vertices(1))
                .unwrap();
        }
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.total_bytes(),
            (lines_per_batch as u32 + 1) * 2 * Vertex::STRIDE
        );
    }

    #[test]
    fn test_oversized_push_gets_matching_capacity() {
        let mut backend = DummyBackend::new();
        let mut queue = CommandQueue::new();
        let vertices = line_vertices(BATCH_CAPACITY as usize); // far beyond one batch
        queue
            .enqueue(&mut backend, PrimitiveTopology::LineList, &vertices)
            .unwrap();
        assert_eq!(queue.len(), 1);
        let batch = queue.iter().next().unwrap();
        assert_eq!(batch.capacity(), vertices.len() as u32 * Vertex::STRIDE);
        assert_eq!(batch.size(), batch.capacity());
    }

    #[test]
    fn test_allocation_failure_leaves_queue_intact() {
        let mut backend = DummyBackend::new();
        let mut queue = CommandQueue::new();
        queue
            .enqueue(&mut backend, PrimitiveTopology::LineList, &line_vertices(1))
            .unwrap();

        // Device buffer succeeds, staging buffer fails.
        backend.fail_buffer_creates_after(1);
        let result = queue.enqueue(
            &mut backend,
            PrimitiveTopology::TriangleList,
            &line_vertices(1),
        );
        assert!(result.is_err());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.total_bytes(), 2 * Vertex::STRIDE);

        // The orphaned device buffer was released immediately.
        let ops = backend.ops();
        let created: Vec<u64> = ops
            .iter()
            .filter_map(|op| match op {
                BackendOp::CreateBuffer { handle, .. } => Some(*handle),
                _ => None,
            })
            .collect();
        assert!(ops.contains(&BackendOp::ReleaseBuffer(*created.last().unwrap())));
    }

    #[test]
    fn test_map_failure_releases_both_buffers() {
        let mut backend = DummyBackend::new();
        let mut queue = CommandQueue::new();
        backend.fail_next_map();
        let result = queue.enqueue(&mut backend, PrimitiveTopology::LineList, &line_vertices(1));
        assert!(result.is_err());
        assert!(queue.is_empty());
        let ops = backend.ops();
        assert_eq!(
            ops.iter()
                .filter(|op| matches!(
                    op,
                    BackendOp::ReleaseBuffer(_) | BackendOp::ReleaseTransferBuffer(_)
                ))
                .count(),
            2
        );
    }

    #[test]
    fn test_release_all_resets_queue() {
        let mut backend = DummyBackend::new();
        let mut queue = CommandQueue::new();
        queue
            .enqueue(&mut backend, PrimitiveTopology::LineList, &line_vertices(1))
            .unwrap();
        queue
            .enqueue(
                &mut backend,
                PrimitiveTopology::TriangleList,
                &line_vertices(1),
            )
            .unwrap();
        queue.release_all(&mut backend);
        assert!(queue.is_empty());
        let ops = backend.ops();
        let releases = ops
            .iter()
            .filter(|op| matches!(op, BackendOp::ReleaseBuffer(_)))
            .count();
        assert_eq!(releases, 2);
    }
}
