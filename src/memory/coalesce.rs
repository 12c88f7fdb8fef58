/*!
 * Free Block Coalescing
 * Merges adjacent free blocks without crossing partition boundaries
 */

use super::table::BlockTable;
use super::types::MemoryBlock;
use std::collections::BTreeMap;

impl BlockTable {
    /// Merge every run of adjacent free blocks into a single block
    ///
    /// When partitioned, blocks are grouped by partition, merged within each
    /// group, and the groups concatenated in ascending partition order.
    /// Returns the number of merges performed.
    pub fn merge_free_blocks(&mut self) -> usize {
        let before = self.blocks.len();
        let partitioned = self.blocks.iter().any(|block| block.partition.is_some());

        self.blocks = if partitioned {
            let mut groups: BTreeMap<_, Vec<MemoryBlock>> = BTreeMap::new();
            for block in self.blocks.drain(..) {
                groups.entry(block.partition).or_default().push(block);
            }
            groups.into_values().flat_map(merge_run).collect()
        } else {
            merge_run(std::mem::take(&mut self.blocks))
        };

        before - self.blocks.len()
    }
}

/// Single pass over blocks in address order
fn merge_run(blocks: Vec<MemoryBlock>) -> Vec<MemoryBlock> {
    let mut merged: Vec<MemoryBlock> = Vec::with_capacity(blocks.len());

    for block in blocks {
        match merged.last_mut() {
            Some(prev)
                if prev.is_free()
                    && block.is_free()
                    && prev.end() + 1 == block.start
                    && prev.partition == block.partition =>
            {
                prev.size += block.size;
            }
            _ => merged.push(block),
        }
    }

    merged
}
