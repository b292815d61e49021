// crates/itsuku-prove/src/lib.rs

//! The Omega chain, nonce search, proof assembly, and verification for the
//! Itsuku memory-hard proof-of-work scheme.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod io;
pub mod omega;
pub mod proof;
pub mod search;
pub mod verify;

pub use omega::{compute_omega, leading_zero_bits, pad_root, ElementSource, OmegaResult};
pub use proof::Proof;
pub use search::search;
pub use verify::{verify, VerifyError};
