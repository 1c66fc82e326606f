//! Key generation and evaluation for two-party point function sharing.
//!
//! Implements the tree-based scheme of Boyle, Gilboa, and Ishai ("Function
//! Secret Sharing: Improvements and Extensions", CCS 2016): key generation
//! walks a GGM tree of depth `num_bits` along the path selected by the special
//! point and publishes one correction word per level; evaluation replays the
//! traversal with one party's private seed and the correction words.  The
//! correction words force both parties' expansions to collapse to identical
//! states on every path except the one leading to the special point, so the
//! two additive shares cancel everywhere else.

use crate::context::{FssContext, WORD_BITS};
use crate::error::Error;
use crate::prg::{
    LEFT_CONTROL, LEFT_SEED, PF_EXPANSION_SIZE, RIGHT_CONTROL, RIGHT_SEED, SEED_SIZE,
};
use rand::{thread_rng, Rng};
use rayon::prelude::*;
use utils::bits::get_bit;
use utils::varint::varint;

/// Public per-level correction word, identical in both key shares.
#[derive(Clone, Copy, Debug, bincode::Encode, bincode::Decode)]
pub struct CorrectionWord {
    /// mask applied to both candidate child seeds
    seed_mask: [u8; SEED_SIZE],
    /// correction (0 or 1) for the left control bit source
    control_left: u8,
    /// correction (0 or 1) for the right control bit source
    control_right: u8,
}

/// One party's share of a point function `f` with `f(alpha) = beta` and
/// `f(x) = 0` for `x != alpha`.
///
/// `seed_init` and `control_init` are private to the holding party; the
/// correction words and the final correction are identical in both shares.
/// None of the fields may be disclosed to the querying client, or the special
/// point becomes recoverable.
#[derive(Clone, Debug, bincode::Encode, bincode::Decode)]
pub struct PointFnKey {
    /// domain size exponent the key was generated for
    num_bits: u32,
    /// private 128-bit starting seed
    seed_init: [u8; SEED_SIZE],
    /// private starting control bit (0 or 1)
    control_init: u8,
    /// vector of `num_bits` public correction words
    correction_words: Vec<CorrectionWord>,
    /// public final correction value
    final_correction: i64,
}

impl PointFnKey {
    /// Return the domain size exponent this key was generated for.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }
}

impl FssContext {
    /// Generate the two key shares of the point function with value `beta` at
    /// point `alpha`.
    ///
    /// `alpha` must lie in `[0, 2^num_bits)`.  Share arithmetic is performed
    /// in the integers mod `2^64` (wrapping `i64`).
    pub fn generate_keys(&self, alpha: u64, beta: i64) -> Result<(PointFnKey, PointFnKey), Error> {
        let a = self.check_point(alpha)?;
        let mut rng = thread_rng();

        let seed_init_0: [u8; SEED_SIZE] = rng.gen();
        let seed_init_1: [u8; SEED_SIZE] = rng.gen();
        let control_init_0 = rng.gen::<u8>() & 1;
        let control_init_1 = control_init_0 ^ 1;

        let mut seed_0 = seed_init_0;
        let mut seed_1 = seed_init_1;
        let mut control_0 = control_init_0;
        let mut control_1 = control_init_1;

        let mut correction_words = Vec::with_capacity(self.num_bits() as usize);
        let mut out_0 = [0u8; PF_EXPANSION_SIZE];
        let mut out_1 = [0u8; PF_EXPANSION_SIZE];

        for i in 0..self.num_bits() {
            self.expand(&seed_0, &mut out_0);
            self.expand(&seed_1, &mut out_1);

            let a_bit = get_bit(a, WORD_BITS - self.num_bits() + i + 1, WORD_BITS);
            // the expansions diverge only on the branch not taken by `a`;
            // its XOR becomes the public seed correction of this level
            let (keep, lose) = if a_bit == 0 {
                (LEFT_SEED, RIGHT_SEED)
            } else {
                (RIGHT_SEED, LEFT_SEED)
            };

            let mut seed_mask = [0u8; SEED_SIZE];
            for j in 0..SEED_SIZE {
                seed_mask[j] = out_0[lose + j] ^ out_1[lose + j];
            }
            let control_left = (out_0[LEFT_CONTROL] ^ out_1[LEFT_CONTROL] ^ a_bit ^ 1) & 1;
            let control_right = (out_0[RIGHT_CONTROL] ^ out_1[RIGHT_CONTROL] ^ a_bit) & 1;

            // each party advances with its own expansion and the control bit
            // it held before this level; multiplying by the 0/1 control bit
            // applies the correction without branching on secret state
            for j in 0..SEED_SIZE {
                seed_0[j] = out_0[keep + j] ^ control_0 * seed_mask[j];
                seed_1[j] = out_1[keep + j] ^ control_1 * seed_mask[j];
            }
            let control_keep = if a_bit == 0 { control_left } else { control_right };
            control_0 = (out_0[keep + SEED_SIZE] & 1) ^ control_keep * control_0;
            control_1 = (out_1[keep + SEED_SIZE] & 1) ^ control_keep * control_1;

            correction_words.push(CorrectionWord {
                seed_mask,
                control_left,
                control_right,
            });
        }

        let (share_0, _) = varint(&seed_0[..8]);
        let (share_1, _) = varint(&seed_1[..8]);
        let mut final_correction = beta.wrapping_sub(share_0).wrapping_add(share_1);
        if control_1 == 1 {
            final_correction = final_correction.wrapping_neg();
        }

        Ok((
            PointFnKey {
                num_bits: self.num_bits(),
                seed_init: seed_init_0,
                control_init: control_init_0,
                correction_words: correction_words.clone(),
                final_correction,
            },
            PointFnKey {
                num_bits: self.num_bits(),
                seed_init: seed_init_1,
                control_init: control_init_1,
                correction_words,
                final_correction,
            },
        ))
    }

    /// Evaluate party `party_id`'s additive share of the point function at
    /// query `x`.
    ///
    /// The two parties' shares sum to `beta` (mod `2^64`) if `x` equals the
    /// shared point and to `0` otherwise, provided both keys stem from the
    /// same [`FssContext::generate_keys`] call and both evaluators derived
    /// their context from the same PRF keys.
    pub fn evaluate_at(&self, party_id: usize, key: &PointFnKey, x: u64) -> Result<i64, Error> {
        self.check_key(party_id, key)?;
        let x = self.check_point(x)?;

        let mut seed = key.seed_init;
        let mut control = key.control_init;
        let mut out = [0u8; PF_EXPANSION_SIZE];

        for i in 0..self.num_bits() {
            self.expand_corrected(&seed, control, &key.correction_words[i as usize], &mut out);
            let x_bit = get_bit(x, WORD_BITS - self.num_bits() + i + 1, WORD_BITS);
            if x_bit == 0 {
                seed.copy_from_slice(&out[LEFT_SEED..LEFT_SEED + SEED_SIZE]);
                control = out[LEFT_CONTROL] & 1;
            } else {
                seed.copy_from_slice(&out[RIGHT_SEED..RIGHT_SEED + SEED_SIZE]);
                control = out[RIGHT_CONTROL] & 1;
            }
        }

        Ok(Self::convert_share(
            party_id,
            &seed,
            control,
            key.final_correction,
        ))
    }

    /// Evaluate party `party_id`'s shares on the entire domain.
    ///
    /// Expands the tree layer by layer with one PRG call per node instead of
    /// one root-to-leaf path per point, so the whole domain costs roughly as
    /// much as two point evaluations per output.
    pub fn evaluate_domain(&self, party_id: usize, key: &PointFnKey) -> Result<Vec<i64>, Error> {
        self.check_key(party_id, key)?;
        assert!(self.num_bits() < usize::BITS, "domain too large to enumerate");
        let domain_size = 1usize << self.num_bits();

        let mut nodes = vec![([0u8; SEED_SIZE], 0u8); domain_size];
        nodes[0] = (key.seed_init, key.control_init);

        let mut out = [0u8; PF_EXPANSION_SIZE];
        for i in 0..self.num_bits() as usize {
            // expand right to left so that the same buffer can hold the
            // current and the next layer
            for j in (0..1usize << i).rev() {
                let (seed, control) = nodes[j];
                self.expand_corrected(&seed, control, &key.correction_words[i], &mut out);
                let left_seed: [u8; SEED_SIZE] = out[LEFT_SEED..LEFT_SEED + SEED_SIZE]
                    .try_into()
                    .expect("does not fail since the slice is exactly one block");
                let right_seed: [u8; SEED_SIZE] = out[RIGHT_SEED..RIGHT_SEED + SEED_SIZE]
                    .try_into()
                    .expect("does not fail since the slice is exactly one block");
                nodes[2 * j] = (left_seed, out[LEFT_CONTROL] & 1);
                nodes[2 * j + 1] = (right_seed, out[RIGHT_CONTROL] & 1);
            }
        }

        Ok(nodes
            .iter()
            .map(|(seed, control)| {
                Self::convert_share(party_id, seed, *control, key.final_correction)
            })
            .collect())
    }

    /// Evaluate party `party_id`'s share at every query in `xs` in parallel.
    ///
    /// The context is immutable during evaluation, so the worker threads
    /// share it directly.
    pub fn evaluate_batch(
        &self,
        party_id: usize,
        key: &PointFnKey,
        xs: &[u64],
    ) -> Result<Vec<i64>, Error> {
        self.check_key(party_id, key)?;
        xs.par_iter()
            .map(|&x| self.evaluate_at(party_id, key, x))
            .collect()
    }

    /// Expand `seed` and apply `control * cw` across the full expansion.
    /// This undoes the generator's masking exactly on the path leading to the
    /// shared point and leaves pseudorandom garbage elsewhere.
    fn expand_corrected(
        &self,
        seed: &[u8; SEED_SIZE],
        control: u8,
        cw: &CorrectionWord,
        out: &mut [u8; PF_EXPANSION_SIZE],
    ) {
        self.expand(seed, out);
        for j in 0..SEED_SIZE {
            out[LEFT_SEED + j] ^= control * cw.seed_mask[j];
            out[RIGHT_SEED + j] ^= control * cw.seed_mask[j];
        }
        out[LEFT_CONTROL] ^= control * cw.control_left;
        out[RIGHT_CONTROL] ^= control * cw.control_right;
    }

    /// Turn a final tree node into the party's additive output share.
    fn convert_share(
        party_id: usize,
        seed: &[u8; SEED_SIZE],
        control: u8,
        final_correction: i64,
    ) -> i64 {
        let (s_final, _) = varint(&seed[..8]);
        let share = s_final.wrapping_add((control as i64).wrapping_mul(final_correction));
        if party_id == 0 {
            share
        } else {
            share.wrapping_neg()
        }
    }

    fn check_key(&self, party_id: usize, key: &PointFnKey) -> Result<(), Error> {
        if party_id > 1 {
            return Err(Error::InvalidPartyId { party_id });
        }
        if key.num_bits != self.num_bits()
            || key.correction_words.len() != self.num_bits() as usize
        {
            return Err(Error::KeyContextMismatch {
                key_num_bits: key.num_bits,
                context_num_bits: self.num_bits(),
            });
        }
        Ok(())
    }
}
