/*!
 * Block Table
 * Ordered, contiguous list of regions covering the whole address space
 */

use super::types::MemoryBlock;
use crate::core::types::{Address, PartitionId, Size};

/// Ground-truth layout of the address space
///
/// Blocks are kept in ascending `start` order, are contiguous and
/// non-overlapping, and together cover exactly `[0, total)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTable {
    pub(super) blocks: Vec<MemoryBlock>,
    pub(super) total: Size,
}

impl BlockTable {
    /// One free block spanning `total` units
    pub fn new(total: Size) -> Self {
        Self {
            blocks: vec![MemoryBlock::free(0, total, None)],
            total,
        }
    }

    /// Build a table from already laid-out blocks
    pub(super) fn from_blocks(blocks: Vec<MemoryBlock>, total: Size) -> Self {
        Self { blocks, total }
    }

    pub fn total(&self) -> Size {
        self.total
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Sum of all allocated block sizes
    pub fn used(&self) -> Size {
        self.blocks
            .iter()
            .filter(|block| !block.is_free())
            .map(|block| block.size)
            .sum()
    }

    pub fn largest_free(&self) -> Size {
        self.blocks
            .iter()
            .filter(|block| block.is_free())
            .map(|block| block.size)
            .max()
            .unwrap_or(0)
    }

    /// Index of the block owned by `name`
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.blocks.iter().position(|block| block.is_owned_by(name))
    }

    pub fn partition_of(&self, name: &str) -> Option<PartitionId> {
        self.position_of(name)
            .and_then(|index| self.blocks[index].partition)
    }

    /// Bind `size` units at the head of free block `index` to `owner`
    ///
    /// An exact fit is marked used in place. A larger block is split into the
    /// used head and a free remainder in the same partition. The caller must
    /// pass a free block of at least `size` units.
    pub fn allocate_at(&mut self, index: usize, owner: &str, size: Size) -> Address {
        let block = &mut self.blocks[index];
        debug_assert!(block.is_free() && block.size >= size);

        let start = block.start;
        let partition = block.partition;

        if block.size > size {
            let remainder = MemoryBlock::free(start + size, block.size - size, partition);
            block.size = size;
            self.blocks.insert(index + 1, remainder);
        }

        let block = &mut self.blocks[index];
        block.free = false;
        block.owner = Some(owner.to_string());
        start
    }

    /// Free the block owned by `name`, without coalescing
    pub fn release(&mut self, name: &str) -> Option<Size> {
        let index = self.position_of(name)?;
        let block = &mut self.blocks[index];
        block.release();
        Some(block.size)
    }

    /// Copy of this table with every block freed and coalesced
    ///
    /// A partitioned table keeps one free block per partition.
    pub fn cleared(&self) -> Self {
        let mut table = self.clone();
        for block in &mut table.blocks {
            block.release();
        }
        table.merge_free_blocks();
        table
    }

    /// Check the layout invariants, returning a description of the first
    /// violation
    pub fn validate(&self) -> Result<(), String> {
        let mut cursor: Address = 0;
        let partitioned = self.blocks.first().map_or(false, |b| b.partition.is_some());

        for (index, block) in self.blocks.iter().enumerate() {
            if block.size == 0 {
                return Err(format!("block {} has zero size", index));
            }
            if block.start != cursor {
                return Err(format!(
                    "block {} starts at {} but previous block ends at {}",
                    index, block.start, cursor
                ));
            }
            if block.is_free() == block.owner.is_some() {
                return Err(format!("block {} ownership does not match its free flag", index));
            }
            if block.partition.is_some() != partitioned {
                return Err(format!("block {} partition tag is inconsistent", index));
            }
            cursor += block.size;
        }

        if cursor != self.total {
            return Err(format!("blocks cover {} units of {}", cursor, self.total));
        }
        Ok(())
    }
}
