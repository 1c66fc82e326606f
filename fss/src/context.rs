//! The evaluation context owning the PRF key material of a scheme instance.

use crate::error::Error;
use crate::prg::{self, PF_EXPANSION_SIZE, PRF_KEY_COUNT, SEED_SIZE};
use rand::{thread_rng, Rng};
use utils::fixed_key_aes::FixedKeyAes;

/// Bit width of the machine word holding domain values.  Points and queries
/// are placed into the `num_bits` most significant bits of such a word before
/// the tree traversal.
pub(crate) const WORD_BITS: u32 = u64::BITS;

/// A 128-bit key for one fixed-key cipher instance of the PRG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct PrfKey([u8; SEED_SIZE]);

impl PrfKey {
    /// Create a key from exactly 16 bytes of key material.
    ///
    /// Fails with [`Error::InvalidPrfKeyLength`] on any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        match bytes.try_into() {
            Ok(key) => Ok(Self(key)),
            Err(_) => Err(Error::InvalidPrfKeyLength {
                expected: SEED_SIZE,
                actual: bytes.len(),
            }),
        }
    }

    /// Return the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.0
    }
}

impl From<[u8; SEED_SIZE]> for PrfKey {
    fn from(bytes: [u8; SEED_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Context shared by key generation and evaluation: the domain size exponent,
/// the PRF keys, and the cipher instances derived from them.
///
/// Each role constructs its context once: the client samples fresh keys with
/// [`FssContext::with_random_keys`] and transports them to both servers; each
/// server re-derives an equivalent context with [`FssContext::from_prf_keys`].
/// A context is immutable after construction and may be shared freely between
/// threads; all scratch state of the algorithms lives on the call stack.
#[derive(Clone, Debug)]
pub struct FssContext {
    /// domain size exponent; the function domain is `[0, 2^num_bits)`
    num_bits: u32,
    /// the PRF keys, kept so that they can be sent to the servers
    prf_keys: [PrfKey; PRF_KEY_COUNT],
    /// cipher instances with expanded keys, derived from `prf_keys`
    ciphers: [FixedKeyAes; PRF_KEY_COUNT],
}

impl FssContext {
    /// Create a client context for the domain `[0, 2^num_bits)` with freshly
    /// sampled PRF keys.
    pub fn with_random_keys(num_bits: u32) -> Result<Self, Error> {
        let mut rng = thread_rng();
        let prf_keys = core::array::from_fn(|_| PrfKey(rng.gen()));
        Self::new(num_bits, prf_keys)
    }

    /// Create a server context from the PRF keys received from the client.
    ///
    /// Exactly [`PRF_KEY_COUNT`] keys are required.
    pub fn from_prf_keys(num_bits: u32, prf_keys: &[PrfKey]) -> Result<Self, Error> {
        match prf_keys.try_into() {
            Ok(prf_keys) => Self::new(num_bits, prf_keys),
            Err(_) => Err(Error::InvalidPrfKeyCount {
                expected: PRF_KEY_COUNT,
                actual: prf_keys.len(),
            }),
        }
    }

    fn new(num_bits: u32, prf_keys: [PrfKey; PRF_KEY_COUNT]) -> Result<Self, Error> {
        if num_bits == 0 || num_bits > WORD_BITS {
            return Err(Error::InvalidDomainSize { num_bits });
        }
        let ciphers = prf_keys.map(|key| FixedKeyAes::new(key.0));
        Ok(Self {
            num_bits,
            prf_keys,
            ciphers,
        })
    }

    /// Return the domain size exponent.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Return the PRF keys for transport to the evaluating parties.
    pub fn prf_keys(&self) -> &[PrfKey; PRF_KEY_COUNT] {
        &self.prf_keys
    }

    /// Expand a tree seed with the point function subset of the ciphers.
    pub(crate) fn expand(&self, seed: &[u8; SEED_SIZE], out: &mut [u8; PF_EXPANSION_SIZE]) {
        prg::expand_seed(&self.ciphers[..prg::PF_EXPANSION_BLOCKS], seed, out);
    }

    /// Check that `value` lies in the domain and place it into the `num_bits`
    /// most significant bits of a word.
    pub(crate) fn check_point(&self, value: u64) -> Result<u64, Error> {
        if self.num_bits < WORD_BITS && value >> self.num_bits != 0 {
            return Err(Error::PointOutOfDomain {
                value,
                num_bits: self.num_bits,
            });
        }
        Ok(value << (WORD_BITS - self.num_bits))
    }
}
