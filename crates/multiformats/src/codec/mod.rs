//! Binary framing primitives.
//!
//! Every other format in the crate prefixes its payload with varints read
//! and written through this module.

pub mod primitives;
pub mod varint;

pub use primitives::{Reader, Writer};
