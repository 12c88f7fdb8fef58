/*!
 * Placement Strategies
 * Selection of a free block for a contiguous allocation
 */

use super::types::{MemoryBlock, MemoryError};
use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placement algorithm used to pick a free block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Lowest-address free block that fits
    FirstFit,
    /// Smallest free block that fits, earliest on ties
    BestFit,
    /// Largest free block that fits, earliest on ties
    WorstFit,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::FirstFit, Algorithm::BestFit, Algorithm::WorstFit];

    /// Index of the block to allocate `size` units from, if any qualifies
    ///
    /// Only free blocks with at least `size` units are considered. Ties go to
    /// the earliest block in table order.
    pub fn select(self, blocks: &[MemoryBlock], size: Size) -> Option<usize> {
        let mut candidates = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.is_free() && block.size >= size);

        match self {
            Algorithm::FirstFit => candidates.next().map(|(index, _)| index),
            Algorithm::BestFit => candidates
                .fold(None, |best: Option<(usize, Size)>, (index, block)| match best {
                    Some((_, best_size)) if block.size >= best_size => best,
                    _ => Some((index, block.size)),
                })
                .map(|(index, _)| index),
            Algorithm::WorstFit => candidates
                .fold(None, |worst: Option<(usize, Size)>, (index, block)| match worst {
                    Some((_, worst_size)) if block.size <= worst_size => worst,
                    _ => Some((index, block.size)),
                })
                .map(|(index, _)| index),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::FirstFit => "first_fit",
            Algorithm::BestFit => "best_fit",
            Algorithm::WorstFit => "worst_fit",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::FirstFit => write!(f, "First Fit"),
            Algorithm::BestFit => write!(f, "Best Fit"),
            Algorithm::WorstFit => write!(f, "Worst Fit"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = MemoryError;

    /// Accepts `first_fit`, `First Fit`, `first-fit`, `FirstFit` and friends
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "firstfit" | "first" => Ok(Algorithm::FirstFit),
            "bestfit" | "best" => Ok(Algorithm::BestFit),
            "worstfit" | "worst" => Ok(Algorithm::WorstFit),
            _ => Err(MemoryError::UnknownAlgorithm(s.to_string())),
        }
    }
}
