//! Deterministic hashing helpers.
//!
//! Node hashes must be identical across runs for hash consing to behave the
//! same way, so nothing here uses a randomly seeded hasher. The mixing steps
//! follow [MurmurHash3][murmur] (x64 variant).
//!
//! [murmur]: https://github.com/aappleby/smhasher/blob/master/src/MurmurHash3.cpp

const SEED: u64 = 0x3141_5926_5358_9793;
const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

pub trait MyHash {
    /// Deterministic structural hash.
    fn hash(&self) -> u64;
}

pub fn rotl64(x: u64, r: u32) -> u64 {
    x.rotate_left(r)
}

/// Cheap combination of two hashes, order-sensitive.
pub fn combine_two_hashes(x: u64, y: u64) -> u64 {
    (x << 9) ^ (y >> 7)
}

/// Murmur finalizer: forces all bits of a hash block to avalanche.
pub fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// Hash of a single 64-bit word.
pub fn mhash(x: u64) -> u64 {
    let mut state = Murmur::new();
    state.block(x);
    state.xor(8);
    state.finish()
}

/// Incremental Murmur-style hash state.
///
/// ```
/// use idd_rs::utils::Murmur;
///
/// let mut a = Murmur::new();
/// a.block(1);
/// a.block(2);
/// let mut b = Murmur::new();
/// b.block(2);
/// b.block(1);
/// assert_ne!(a.finish(), b.finish());
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Murmur {
    h1: u64,
}

impl Default for Murmur {
    fn default() -> Self {
        Self::new()
    }
}

impl Murmur {
    pub fn new() -> Self {
        Self { h1: SEED }
    }

    /// Mix one 64-bit block into the state.
    pub fn block(&mut self, k1: u64) {
        let mut k1 = k1.wrapping_mul(C1);
        k1 = rotl64(k1, 31);
        k1 = k1.wrapping_mul(C2);
        self.h1 ^= k1;
        self.h1 = rotl64(self.h1, 27);
        self.h1 = self.h1.wrapping_mul(5).wrapping_add(0x52dc_e729);
    }

    /// XOR a value into the state without mixing it.
    pub fn xor(&mut self, value: u64) {
        self.h1 ^= value;
    }

    pub fn finish(self) -> u64 {
        fmix64(self.h1)
    }
}

impl MyHash for u64 {
    fn hash(&self) -> u64 {
        mhash(*self)
    }
}

impl MyHash for usize {
    fn hash(&self) -> u64 {
        mhash(*self as u64)
    }
}

impl MyHash for (u64, u64) {
    fn hash(&self) -> u64 {
        combine_two_hashes(self.0.hash(), self.1.hash())
    }
}
