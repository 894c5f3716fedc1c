#![forbid(unsafe_code)]

//! Escape-introducer scanning.
//!
//! # Role in termtext
//! `termtext-simd` hosts the one hot loop every termtext operation starts
//! with: finding the next escape-sequence introducer in a UTF-8 or UTF-16
//! buffer. The loops here are written so the compiler can autovectorize them
//! without `unsafe` or platform intrinsics.
//!
//! # How it fits in the system
//! Each `find_*` function has a `*_scalar` twin that is the definition of
//! correct behavior. The block-wise variants filter 16 units at a time with a
//! cheap superset test and only fall back to the scalar check inside blocks
//! that might hold an introducer. The two are kept equivalent by property
//! tests.

pub mod escape;

pub use escape::{
    BLOCK_UNITS, find_introducer_utf8, find_introducer_utf8_scalar, find_introducer_utf16,
    find_introducer_utf16_scalar, is_c1_introducer_byte, is_introducer,
};
