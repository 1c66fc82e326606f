//! Error type for context construction and FSS operations.

/// Errors returned by context construction, key generation, and evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A PRF key of the wrong byte length was supplied
    InvalidPrfKeyLength {
        /// required key length in bytes
        expected: usize,
        /// length of the supplied key material
        actual: usize,
    },
    /// A wrong number of PRF keys was supplied
    InvalidPrfKeyCount {
        /// required number of keys
        expected: usize,
        /// number of supplied keys
        actual: usize,
    },
    /// The domain size exponent is outside the supported range
    InvalidDomainSize {
        /// the rejected exponent
        num_bits: u32,
    },
    /// A point or query lies outside the domain `[0, 2^num_bits)`
    PointOutOfDomain {
        /// the rejected value
        value: u64,
        /// the domain size exponent of the context
        num_bits: u32,
    },
    /// The party id is not 0 or 1
    InvalidPartyId {
        /// the rejected party id
        party_id: usize,
    },
    /// The key was generated for a differently configured context
    KeyContextMismatch {
        /// domain size exponent recorded in the key
        key_num_bits: u32,
        /// domain size exponent of the evaluating context
        context_num_bits: u32,
    },
}
