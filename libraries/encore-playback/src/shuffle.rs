//! Shuffle selection
//!
//! Shuffle never reorders the playlist; it only picks the next index
//! uniformly at random, excluding the current one so a track does not repeat
//! back to back.

use rand::Rng;

/// Pick a random index in `[0, len)` different from `current`
///
/// Lists with zero or one entry resolve to index 0 without randomization.
/// With no current index every position is eligible.
pub fn pick_next_index<R: Rng + ?Sized>(rng: &mut R, len: usize, current: Option<usize>) -> usize {
    if len <= 1 {
        return 0;
    }

    match current {
        Some(current) if current < len => {
            // Draw from len - 1 slots and skip over the current one
            let candidate = rng.gen_range(0..len - 1);
            if candidate >= current {
                candidate + 1
            } else {
                candidate
            }
        }
        _ => rng.gen_range(0..len),
    }
}
