//! Per-item point subsampling.

use crate::error::{DataError, Result};
use rand::Rng;

/// Choose `count` point indices out of `available`.
///
/// Frozen sampling takes the first `count` points so that precomputed
/// transforms line up across runs. Otherwise `count` distinct indices are
/// drawn uniformly without replacement.
pub fn sample_indices<R: Rng + ?Sized>(
    available: usize,
    count: usize,
    frozen: bool,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if count > available {
        return Err(DataError::InsufficientPoints {
            requested: count,
            available,
        });
    }
    if frozen {
        return Ok((0..count).collect());
    }
    Ok(rand::seq::index::sample(rng, available, count).into_vec())
}
