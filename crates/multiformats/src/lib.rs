//! Multiformats: self-describing encodings for hashes, content identifiers
//! and network addresses.
//!
//! Every format in this crate prefixes its payload with a compact tag drawn
//! from a registry, so a reader can tell what an opaque byte string is
//! without outside context.
//!
//! # Quick Start
//!
//! ```rust
//! use multiformats::{Address, Cid, Entry, HashFunctions, multibase};
//!
//! // Hash some content and name it with a CID
//! let mh = HashFunctions::default().digest("sha2-256", b"foo bar baz").unwrap();
//! let cid = Cid::new("raw", mh).unwrap();
//! let text = cid.to_string();
//! assert!(text.starts_with('b'));
//! assert_eq!(text.parse::<Cid>().unwrap(), cid);
//!
//! // Build a network address
//! let addr = Address::create([
//!     Entry::new("ip4", "127.0.0.1").unwrap(),
//!     Entry::new("tcp", 80).unwrap(),
//! ]);
//! assert_eq!(addr.to_string(), "/ip4/127.0.0.1/tcp/80");
//!
//! // Render arbitrary bytes with a self-describing base
//! assert_eq!(multibase::format("base16", b"hi").unwrap(), "f6869");
//! ```
//!
//! # Modules
//!
//! - [`codec`]: Varints and the bounded reader/writer every format uses
//! - [`multibase`]: Prefix-tagged text encodings and their registry
//! - [`multicodec`]: Registry of codec keys and numeric codes
//! - [`multihash`]: Algorithm-tagged digests
//! - [`cid`]: Content identifiers (v0 and v1)
//! - [`multiaddr`]: Composable network addresses
//! - [`error`]: Error types
//! - [`limits`]: Wire-format limits for decoding
//!
//! # Security
//!
//! Decoders are designed to safely handle untrusted input:
//! - Varints are limited to 9 bytes (63 bits)
//! - Digest and address value lengths are bounded before allocation
//! - Trailing bytes after a complete value are rejected by `decode`
//!
//! # Registries
//!
//! The multibase and multicodec registries are process-wide. They start with
//! the built-in tables and can be extended with `register_*`; concurrent
//! lookups always see a complete snapshot.

pub mod cid;
pub mod codec;
pub mod error;
pub mod limits;
mod meta;
pub mod multiaddr;
pub mod multibase;
pub mod multicodec;
pub mod multihash;
mod selector;

// Re-export commonly used types at crate root
pub use cid::{Cid, DEFAULT_CID_BASE, Version};
pub use error::{
    AddressError, CidError, Error, ErrorKind, MultibaseError, MulticodecError, MultihashError,
    VarintError,
};
pub use meta::Metadata;
pub use multiaddr::{Address, Entry, Protocol, Value};
pub use multibase::{Base, BaseDefinition};
pub use multihash::{Algorithm, HashFunctions, Multihash};
pub use selector::Selector;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
