//! The fixed-key pseudorandom generator used to expand GGM tree seeds.
//!
//! A 128-bit seed is expanded into one block per cipher instance via the
//! Matyas–Meyer–Oseas compression `E_{k_i}(x) ^ x`.  Since the ciphers are
//! keyed once at context construction, the expansion is a deterministic
//! function of the seed, which both the key generator and the evaluators must
//! reproduce bit for bit.

use utils::fixed_key_aes::FixedKeyAes;

/// Byte size of a PRG seed and of each expansion block.
pub const SEED_SIZE: usize = 16;

/// Number of fixed-key cipher instances held by a context.
///
/// The two-party point function scheme only uses the first
/// [`PF_EXPANSION_BLOCKS`] of them; the remaining instance is reserved for a
/// multi-party generalization.
pub const PRF_KEY_COUNT: usize = 4;

/// Number of expansion blocks consumed per tree level by the point function
/// scheme.
pub const PF_EXPANSION_BLOCKS: usize = 3;

/// Byte size of one seed expansion of the point function scheme.
pub const PF_EXPANSION_SIZE: usize = SEED_SIZE * PF_EXPANSION_BLOCKS;

// Layout of the 48-byte expansion.  Only the first 34 bytes carry meaning:
// the candidate child seeds and the source bytes of the two control bits.
// The right half deliberately starts at byte 17, directly behind the left
// control byte.
pub(crate) const LEFT_SEED: usize = 0;
pub(crate) const LEFT_CONTROL: usize = SEED_SIZE;
pub(crate) const RIGHT_SEED: usize = SEED_SIZE + 1;
pub(crate) const RIGHT_CONTROL: usize = 2 * SEED_SIZE + 1;

/// Expand `seed` into `16 * ciphers.len()` pseudorandom bytes, one
/// Matyas–Meyer–Oseas compression per cipher instance.
pub fn expand_seed(ciphers: &[FixedKeyAes], seed: &[u8; SEED_SIZE], out: &mut [u8]) {
    assert_eq!(out.len(), SEED_SIZE * ciphers.len());
    for (cipher, block) in ciphers.iter().zip(out.chunks_exact_mut(SEED_SIZE)) {
        let block: &mut [u8; SEED_SIZE] = block
            .try_into()
            .expect("does not fail since chunks are exactly one block");
        cipher.hash_cr_bytes(seed, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};

    #[test]
    fn test_expansion_is_deterministic() {
        let ciphers: Vec<FixedKeyAes> = (0..PF_EXPANSION_BLOCKS)
            .map(|_| FixedKeyAes::sample())
            .collect();
        let seed: [u8; SEED_SIZE] = thread_rng().gen();
        let mut out_1 = [0u8; PF_EXPANSION_SIZE];
        let mut out_2 = [0u8; PF_EXPANSION_SIZE];
        expand_seed(&ciphers, &seed, &mut out_1);
        expand_seed(&ciphers, &seed, &mut out_2);
        assert_eq!(out_1, out_2);
    }

    #[test]
    fn test_expansion_blocks_are_independent() {
        let ciphers: Vec<FixedKeyAes> = (0..PF_EXPANSION_BLOCKS)
            .map(|_| FixedKeyAes::sample())
            .collect();
        let seed_1: [u8; SEED_SIZE] = thread_rng().gen();
        let mut seed_2 = seed_1;
        seed_2[0] ^= 1;
        let mut out_1 = [0u8; PF_EXPANSION_SIZE];
        let mut out_2 = [0u8; PF_EXPANSION_SIZE];
        expand_seed(&ciphers, &seed_1, &mut out_1);
        expand_seed(&ciphers, &seed_2, &mut out_2);
        // distinct seeds and distinct ciphers must not produce equal blocks
        for i in 0..PF_EXPANSION_BLOCKS {
            for j in 0..PF_EXPANSION_BLOCKS {
                if i == j {
                    continue;
                }
                assert_ne!(
                    out_1[i * SEED_SIZE..(i + 1) * SEED_SIZE],
                    out_1[j * SEED_SIZE..(j + 1) * SEED_SIZE]
                );
            }
            assert_ne!(
                out_1[i * SEED_SIZE..(i + 1) * SEED_SIZE],
                out_2[i * SEED_SIZE..(i + 1) * SEED_SIZE]
            );
        }
    }

    #[test]
    fn test_layout() {
        assert_eq!(LEFT_CONTROL, 16);
        assert_eq!(RIGHT_SEED, 17);
        assert_eq!(RIGHT_CONTROL, 33);
        assert!(RIGHT_CONTROL < PF_EXPANSION_SIZE);
    }
}
