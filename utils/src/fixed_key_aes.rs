//! Functionality for AES in fixed-key mode.

use aes::cipher::crypto_common::Block;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;
use rand::{thread_rng, Rng};

/// Fixed-key AES implementation.  Implements the Matyas–Meyer–Oseas one-way
/// compression function `E_k(x) ^ x`, which turns a block cipher with a fixed
/// key into a correlation robust hash function.
#[derive(Clone, Debug)]
pub struct FixedKeyAes {
    /// AES object including expanded key.
    aes: Aes128,
}

impl FixedKeyAes {
    /// Create a new instance with a given key.
    pub fn new(key: [u8; 16]) -> Self {
        Self {
            aes: Aes128::new_from_slice(&key).expect("does not fail since key has the right size"),
        }
    }

    /// Create a new instance with a randomly sampled key.
    pub fn sample() -> Self {
        let key: [u8; 16] = thread_rng().gen();
        Self::new(key)
    }

    /// Random permutation `pi(x) = AES(k, x)` on a 16-byte block.
    #[inline(always)]
    pub fn pi_bytes(&self, x: &[u8; 16], out: &mut [u8; 16]) {
        let block_in = Block::<Aes128>::from_slice(x);
        let block_out = Block::<Aes128>::from_mut_slice(out);
        self.aes.encrypt_block_b2b(block_in, block_out);
    }

    /// MMO function `pi(x) ^ x` on a 16-byte block.
    #[inline(always)]
    pub fn hash_cr_bytes(&self, x: &[u8; 16], out: &mut [u8; 16]) {
        self.pi_bytes(x, out);
        for (o, b) in out.iter_mut().zip(x.iter()) {
            *o ^= b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pi_fips_197_vector() {
        // AES-128 test vector from FIPS-197, Appendix C.1
        let key: [u8; 16] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        let plaintext: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let ciphertext: [u8; 16] = [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ];
        let fkaes = FixedKeyAes::new(key);
        let mut out = [0u8; 16];
        fkaes.pi_bytes(&plaintext, &mut out);
        assert_eq!(out, ciphertext);

        let mut hashed = [0u8; 16];
        fkaes.hash_cr_bytes(&plaintext, &mut hashed);
        for i in 0..16 {
            assert_eq!(hashed[i], ciphertext[i] ^ plaintext[i]);
        }
    }

    #[test]
    fn test_hash_cr_deterministic() {
        let fkaes = FixedKeyAes::sample();
        let x: [u8; 16] = thread_rng().gen();
        let mut out_1 = [0u8; 16];
        let mut out_2 = [0u8; 16];
        fkaes.hash_cr_bytes(&x, &mut out_1);
        fkaes.clone().hash_cr_bytes(&x, &mut out_2);
        assert_eq!(out_1, out_2);
    }
}
