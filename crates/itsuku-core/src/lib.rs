// crates/itsuku-core/src/lib.rs

//! Core data types, Argon2-style indexing, and the deterministic memory
//! builder for the Itsuku memory-hard proof-of-work scheme.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod challenge;
pub mod config;
pub mod element;
pub mod index;
pub mod memory;

pub use challenge::ChallengeId;
pub use config::{Config, ConfigError};
pub use element::{Element, ELEMENT_BYTES};
pub use index::{argon2_index, phi, PHI_VARIANTS};
pub use memory::{compress, Memory};
