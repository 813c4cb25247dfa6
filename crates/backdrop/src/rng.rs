//! Entity randomness

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Fixed seed when configured, entropy otherwise
pub(crate) fn scene_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}
