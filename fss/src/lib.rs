//! Implementation of two-party function secret sharing (FSS) for point
//! functions.
//!
//! A point function is a function `f` that is specified by two values `(a, b)`
//! such that `f(a) = b` and `f(x) = 0` for all other values `x != a`.
//!
//! A function secret sharing scheme for point functions allows to take the
//! description of a point function `f` and output two keys `k_0, k_1`.  These
//! keys can be used with an evaluation algorithm `Eval` to obtain an additive
//! share of `f`'s value such that `Eval(k_0, x) + Eval(k_1, x) = f(x)` for all
//! `x` in the domain, while either key alone reveals nothing about `(a, b)`.
//! This is the building block of distributed point functions as used in
//! two-server private information retrieval and secure aggregation.
//!
//! The scheme implemented here is the tree-based construction of Boyle,
//! Gilboa, and Ishai ("Function Secret Sharing: Improvements and Extensions",
//! CCS 2016), instantiated with a fixed-key AES pseudorandom generator.

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod point;
pub mod prg;
