use rand::{RngExt, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

// k-means++ picks depend only on the input and this value
pub const RANDOM_SEED: u64 = 0;

pub fn new() -> impl RngExt {
    with_seed(RANDOM_SEED)
}

pub fn with_seed(seed: u64) -> impl RngExt {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}
