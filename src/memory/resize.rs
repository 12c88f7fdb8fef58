/*!
 * Unpartitioned Resize
 * Grows or shrinks the address space while keeping every allocation
 */

use super::table::BlockTable;
use super::types::{MemoryBlock, MemoryError, MemoryResult};
use crate::core::types::Size;

impl BlockTable {
    /// Layout of this table over `new_total` units
    ///
    /// Allocations that still fit keep their address. When shrinking pushes
    /// an allocation past the new end, it and any allocation in its way slide
    /// toward address 0 by the minimum distance, preserving their order.
    /// Space between allocations becomes free blocks. Fails only when the
    /// allocations no longer fit at all.
    pub fn resized(&self, new_total: Size) -> MemoryResult<Self> {
        if new_total == 0 {
            return Err(MemoryError::InvalidSize(new_total));
        }

        let used = self.used();
        if used > new_total {
            return Err(MemoryError::ShrinkBelowUsed {
                requested: new_total,
                used,
            });
        }

        let mut placed: Vec<MemoryBlock> = self
            .blocks
            .iter()
            .filter(|block| !block.is_free())
            .cloned()
            .collect();

        let mut limit = new_total;
        for block in placed.iter_mut().rev() {
            block.start = block.start.min(limit - block.size);
            limit = block.start;
        }

        let mut blocks = Vec::with_capacity(placed.len() * 2 + 1);
        let mut cursor = 0;
        for block in placed {
            if block.start > cursor {
                blocks.push(MemoryBlock::free(cursor, block.start - cursor, None));
            }
            cursor = block.start + block.size;
            blocks.push(block);
        }
        if cursor < new_total {
            blocks.push(MemoryBlock::free(cursor, new_total - cursor, None));
        }

        Ok(Self::from_blocks(blocks, new_total))
    }
}
