/*!
 * Static Partitioning
 *
 * Splits the address space into fixed sub-ranges from a list of percentages.
 * Each partition gets `max(1, floor(pct / 100 * total))` units and the last
 * partition takes whatever remains, so the partitions always tile the space
 * exactly.
 */

use super::table::BlockTable;
use super::types::{MemoryBlock, MemoryError, MemoryResult};
use crate::core::limits::PARTITION_SUM_TOLERANCE;
use crate::core::types::Size;

/// Partition sizes for `percentages` over `total` units
///
/// Rejects non-finite or non-positive percentages, more partitions than
/// units, and layouts where the earlier partitions leave nothing for the last.
pub fn partition_sizes(percentages: &[f64], total: Size) -> MemoryResult<Vec<Size>> {
    if let Some((index, &value)) = percentages
        .iter()
        .enumerate()
        .find(|(_, value)| !value.is_finite() || **value <= 0.0)
    {
        return Err(MemoryError::InvalidPartition { index, value });
    }

    let count = percentages.len();
    if count > total {
        return Err(MemoryError::TooManyPartitions { count, total });
    }

    let Some((_, leading)) = percentages.split_last() else {
        return Ok(Vec::new());
    };

    let mut sizes: Vec<Size> = leading
        .iter()
        .map(|pct| ((pct / 100.0 * total as f64).floor() as Size).max(1))
        .collect();

    let claimed: Size = sizes.iter().sum();
    if claimed >= total {
        return Err(MemoryError::PartitionOverflow { claimed, total });
    }
    sizes.push(total - claimed);

    Ok(sizes)
}

impl BlockTable {
    /// One free block per partition, tagged with sequential partition ids
    pub fn partitioned(percentages: &[f64], total: Size) -> MemoryResult<Self> {
        let sizes = partition_sizes(percentages, total)?;

        let mut start = 0;
        let blocks = sizes
            .into_iter()
            .enumerate()
            .map(|(id, size)| {
                let block = MemoryBlock::free(start, size, Some(id));
                start += size;
                block
            })
            .collect();

        Ok(Self::from_blocks(blocks, total))
    }
}

/// `count` equal percentages
pub fn even_split(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    vec![100.0 / count as f64; count]
}

/// Rescale percentages to sum to 100
///
/// Values already within `PARTITION_SUM_TOLERANCE` of 100 are returned
/// unchanged.
pub fn normalize(percentages: &[f64]) -> Vec<f64> {
    let sum: f64 = percentages.iter().sum();
    if sum <= 0.0 || (sum - 100.0).abs() <= PARTITION_SUM_TOLERANCE {
        return percentages.to_vec();
    }
    percentages.iter().map(|pct| pct * (100.0 / sum)).collect()
}
