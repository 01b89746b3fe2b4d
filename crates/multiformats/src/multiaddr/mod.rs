//! Multiaddr: composable, self-describing network addresses.
//!
//! An [`Address`] is an ordered sequence of [`Entry`]s, each a protocol from
//! the fixed [`Protocol`] table plus the value that protocol requires.
//!
//! Text form: `/ip4/127.0.0.1/tcp/80`. Binary form: each entry as
//! `varint(code)` followed by its value, concatenated with no outer framing.
//!
//! ```rust
//! use multiformats::multiaddr::{Address, Entry};
//!
//! let addr = Address::create([
//!     Entry::new("ip4", "127.0.0.1").unwrap(),
//!     Entry::new("tcp", 80).unwrap(),
//! ]);
//! assert_eq!(addr.as_bytes(), [4, 127, 0, 0, 1, 6, 0, 80]);
//! assert_eq!(addr.to_string(), "/ip4/127.0.0.1/tcp/80");
//! ```

mod protocol;
mod value;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHasher;

use crate::codec::{Reader, Writer};
use crate::error::AddressError;
use crate::meta::{Meta, Metadata};

pub use protocol::{Protocol, ValueKind};
pub use value::Value;

/// One `(protocol, value)` pair together with its canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    protocol: Protocol,
    value: Option<Value>,
    bytes: Arc<[u8]>,
}

impl Entry {
    /// Creates an entry for a value-bearing protocol.
    ///
    /// Text values are parsed according to the protocol, so `"80"` is
    /// accepted for `tcp` and `"::1"` for `ip6`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::UnknownProtocol`],
    /// [`AddressError::UnexpectedValue`] for a protocol that takes no value,
    /// and [`AddressError::InvalidValue`] for a value the protocol rejects.
    pub fn new(protocol: &str, value: impl Into<Value>) -> Result<Self, AddressError> {
        Self::with_protocol(lookup(protocol)?, Some(value.into()))
    }

    /// Creates an entry for a protocol that takes no value.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::UnknownProtocol`] or
    /// [`AddressError::MissingValue`].
    pub fn bare(protocol: &str) -> Result<Self, AddressError> {
        Self::with_protocol(lookup(protocol)?, None)
    }

    /// Creates an entry from a known protocol.
    ///
    /// # Errors
    ///
    /// As [`Entry::new`] and [`Entry::bare`].
    pub fn with_protocol(protocol: Protocol, value: Option<Value>) -> Result<Self, AddressError> {
        let value = match (protocol.kind(), value) {
            (ValueKind::None, None) => None,
            (ValueKind::None, Some(_)) => {
                return Err(AddressError::UnexpectedValue {
                    protocol: protocol.name(),
                });
            }
            (_, None) => {
                return Err(AddressError::MissingValue {
                    protocol: protocol.name(),
                });
            }
            (_, Some(value)) => Some(value::normalize(protocol, value)?),
        };

        let mut writer = Writer::new();
        writer.write_varint(protocol.code())?;
        if let Some(value) = &value {
            value::write(protocol, value, &mut writer)?;
        }
        Ok(Self {
            protocol,
            value,
            bytes: writer.into_bytes().into(),
        })
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, AddressError> {
        let start = reader.position();
        let code = reader.read_varint("multiaddr.protocol")?;
        let protocol = Protocol::from_code(code).ok_or(AddressError::UnknownProtocolCode { code })?;
        let value = value::read(protocol, reader)?;
        Ok(Self {
            protocol,
            value,
            bytes: reader.consumed_since(start).into(),
        })
    }

    /// Returns the protocol.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Returns the value, if the protocol takes one.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Returns the canonical encoding of this entry.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.protocol)?;
        if let Some(value) = &self.value {
            write!(f, "/{value}")?;
        }
        Ok(())
    }
}

fn lookup(name: &str) -> Result<Protocol, AddressError> {
    Protocol::from_name(name).ok_or_else(|| AddressError::UnknownProtocol {
        name: name.to_string(),
    })
}

/// An immutable multiaddr.
///
/// Equality, ordering and hashing are defined on the canonical bytes.
#[derive(Clone, Default)]
pub struct Address {
    bytes: Arc<[u8]>,
    entries: Arc<[Entry]>,
    hash: OnceLock<u64>,
    meta: Meta,
}

impl Address {
    /// Builds an address from entries, in order.
    pub fn create(entries: impl IntoIterator<Item = Entry>) -> Self {
        Self::from_entries(entries.into_iter().collect())
    }

    fn from_entries(entries: Vec<Entry>) -> Self {
        let mut writer = Writer::with_capacity(entries.iter().map(|e| e.bytes.len()).sum());
        for entry in &entries {
            writer.write_bytes(&entry.bytes);
        }
        Self {
            bytes: writer.into_bytes().into(),
            entries: entries.into(),
            hash: OnceLock::new(),
            meta: Meta::default(),
        }
    }

    /// Parses the text form.
    ///
    /// `"/"` is the empty address and a single trailing `/` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingLeadingSlash`],
    /// [`AddressError::UnknownProtocol`], [`AddressError::MissingValue`] or
    /// [`AddressError::InvalidValue`].
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let Some(body) = text.strip_prefix('/') else {
            return Err(AddressError::MissingLeadingSlash {
                text: text.to_string(),
            });
        };
        let body = body.strip_suffix('/').unwrap_or(body);
        if body.is_empty() {
            return Ok(Self::default());
        }

        let mut entries = Vec::new();
        let mut segments = body.split('/');
        while let Some(name) = segments.next() {
            let protocol = lookup(name)?;
            let value = match protocol.kind() {
                ValueKind::None => None,
                _ => {
                    let raw = segments.next().ok_or(AddressError::MissingValue {
                        protocol: protocol.name(),
                    })?;
                    Some(Value::from(raw))
                }
            };
            entries.push(Entry::with_protocol(protocol, value)?);
        }
        Ok(Self::from_entries(entries))
    }

    /// Decodes the binary form, reading entries until the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::UnknownProtocolCode`] for an unknown code,
    /// [`AddressError::Varint`] for truncated input and
    /// [`AddressError::InvalidValue`] for a value the protocol rejects.
    pub fn decode(bytes: &[u8]) -> Result<Self, AddressError> {
        let mut reader = Reader::new(bytes);
        let mut entries = Vec::new();
        while !reader.is_empty() {
            entries.push(Entry::read(&mut reader)?);
        }
        Ok(Self {
            bytes: bytes.into(),
            entries: entries.into(),
            hash: OnceLock::new(),
            meta: Meta::default(),
        })
    }

    /// Returns the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a copy of the canonical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the address has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::IndexOutOfBounds`] past the last entry.
    pub fn get(&self, index: usize) -> Result<&Entry, AddressError> {
        self.entries.get(index).ok_or(AddressError::IndexOutOfBounds {
            index,
            len: self.entries.len(),
        })
    }

    /// Returns the entry at `index`, or `default` past the last entry.
    pub fn get_or<'a>(&'a self, index: usize, default: &'a Entry) -> &'a Entry {
        self.entries.get(index).unwrap_or(default)
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Returns the entries.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the protocols of every entry, in order.
    pub fn protocols(&self) -> Vec<Protocol> {
        self.entries.iter().map(Entry::protocol).collect()
    }

    /// Returns a new address with `entry` appended.
    pub fn push(&self, entry: Entry) -> Self {
        let mut entries = self.entries.to_vec();
        entries.push(entry);
        Self {
            meta: self.meta.clone(),
            ..Self::from_entries(entries)
        }
    }

    /// Returns the last entry.
    pub fn peek(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Returns a new address without the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::EmptyAddress`] if there is nothing to remove.
    pub fn pop(&self) -> Result<Self, AddressError> {
        let Some((last, rest)) = self.entries.split_last() else {
            return Err(AddressError::EmptyAddress);
        };
        let keep = self.bytes.len() - last.bytes.len();
        Ok(Self {
            bytes: self.bytes[..keep].into(),
            entries: rest.into(),
            hash: OnceLock::new(),
            meta: self.meta.clone(),
        })
    }

    /// Returns the cached hash of the canonical bytes.
    pub fn hash_code(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = FxHasher::default();
            hasher.write(&self.bytes);
            hasher.finish()
        })
    }

    /// Returns a copy carrying `key = value` in its metadata.
    pub fn with_meta(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            meta: self.meta.with(key, value),
            ..self.clone()
        }
    }

    /// Returns the attached metadata.
    pub fn meta(&self) -> Option<&Metadata> {
        self.meta.get()
    }
}

impl<'a> IntoIterator for &'a Address {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Address {}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Address").field(&self.to_string()).finish()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("/");
        }
        for entry in self.entries.iter() {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv6Addr;

    use super::*;
    use crate::error::VarintError;

    fn localhost_tcp() -> Address {
        Address::create([
            Entry::new("ip4", "127.0.0.1").unwrap(),
            Entry::new("tcp", 80).unwrap(),
        ])
    }

    #[test]
    fn test_create_encodes_and_renders() {
        let addr = localhost_tcp();
        assert_eq!(addr.as_bytes(), [4, 127, 0, 0, 1, 6, 0, 80]);
        assert_eq!(addr.to_string(), "/ip4/127.0.0.1/tcp/80");
        assert_eq!(addr.len(), 2);
        assert_eq!(addr.protocols(), vec![Protocol::Ip4, Protocol::Tcp]);
    }

    #[test]
    fn test_parse_and_decode_agree() {
        let addr = localhost_tcp();
        assert_eq!(Address::parse("/ip4/127.0.0.1/tcp/80").unwrap(), addr);
        assert_eq!(Address::parse("/ip4/127.0.0.1/tcp/80/").unwrap(), addr);
        assert_eq!(Address::decode(addr.as_bytes()).unwrap(), addr);
        assert_eq!(
            "/ip4/127.0.0.1/tcp/80".parse::<Address>().unwrap().to_string(),
            addr.to_string()
        );
    }

    #[test]
    fn test_mixed_value_kinds() {
        let text = "/dns4/example.com/tcp/443/wss/p2p/QmPeer/p2p-circuit";
        let addr = Address::parse(text).unwrap();
        assert_eq!(addr.to_string(), text);
        assert_eq!(Address::decode(addr.as_bytes()).unwrap(), addr);
        assert_eq!(addr.get(2).unwrap().value(), None);
        assert_eq!(
            addr.get(3).unwrap().value(),
            Some(&Value::Text("QmPeer".to_string()))
        );

        let ipfs = Address::parse("/ipfs/QmPeer").unwrap();
        assert_eq!(ipfs.to_string(), "/p2p/QmPeer");
    }

    #[test]
    fn test_ip6() {
        let addr = Address::parse("/ip6/::1/udp/5353").unwrap();
        assert_eq!(
            addr.get(0).unwrap().value(),
            Some(&Value::from(Ipv6Addr::LOCALHOST))
        );
        assert_eq!(addr.as_bytes().len(), 1 + 16 + 2 + 2);
        assert_eq!(addr.to_string(), "/ip6/::1/udp/5353");
    }

    #[test]
    fn test_empty_address() {
        let empty = Address::parse("/").unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "/");
        assert_eq!(empty, Address::decode(&[]).unwrap());
        assert_eq!(empty.pop(), Err(AddressError::EmptyAddress));
        assert_eq!(empty.peek(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Address::parse("ip4/1.2.3.4"),
            Err(AddressError::MissingLeadingSlash {
                text: "ip4/1.2.3.4".to_string()
            })
        );
        assert_eq!(
            Address::parse("/smtp/25"),
            Err(AddressError::UnknownProtocol {
                name: "smtp".to_string()
            })
        );
        assert_eq!(
            Address::parse("/ip4"),
            Err(AddressError::MissingValue { protocol: "ip4" })
        );
        assert!(matches!(
            Address::parse("/tcp/65536"),
            Err(AddressError::InvalidValue { protocol: "tcp", .. })
        ));
        assert!(matches!(
            Address::parse("/ip4/1.2.3"),
            Err(AddressError::InvalidValue { protocol: "ip4", .. })
        ));
        assert!(matches!(
            Address::parse("//tcp/80"),
            Err(AddressError::UnknownProtocol { .. })
        ));
    }

    #[test]
    fn test_entry_errors() {
        assert_eq!(
            Entry::new("ws", "x"),
            Err(AddressError::UnexpectedValue { protocol: "ws" })
        );
        assert_eq!(
            Entry::bare("tcp"),
            Err(AddressError::MissingValue { protocol: "tcp" })
        );
        assert!(Entry::bare("ws").is_ok());
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            Address::decode(&[0x63]),
            Err(AddressError::UnknownProtocolCode { code: 0x63 })
        );
        assert!(matches!(
            Address::decode(&[4, 127, 0]),
            Err(AddressError::Varint(_))
        ));
    }

    #[test]
    fn test_decode_rejects_padded_varints() {
        assert_eq!(
            Address::decode(&[0x84, 0x00, 127, 0, 0, 1]),
            Err(AddressError::Varint(VarintError::NonMinimal {
                context: "multiaddr.protocol"
            }))
        );
        assert!(matches!(
            Address::decode(&[53, 0x83, 0x00, b'a', b'.', b'b']),
            Err(AddressError::Varint(VarintError::NonMinimal { .. }))
        ));
        assert!(matches!(
            Address::decode(&[0xa5, 0x03, 0x82, 0x00, b'Q', b'm']),
            Err(AddressError::Varint(VarintError::NonMinimal { .. }))
        ));

        let canonical = Address::decode(&[4, 127, 0, 0, 1]).unwrap();
        assert_eq!(Address::parse(&canonical.to_string()).unwrap(), canonical);
    }

    #[test]
    fn test_sequence_operations() {
        let addr = localhost_tcp();
        let ws = Entry::bare("ws").unwrap();

        let longer = addr.push(ws.clone());
        assert_eq!(longer.to_string(), "/ip4/127.0.0.1/tcp/80/ws");
        assert_eq!(addr.len(), 2);
        assert_eq!(longer.peek(), Some(&ws));
        assert_eq!(longer.pop().unwrap(), addr);

        assert_eq!(
            addr.get(5),
            Err(AddressError::IndexOutOfBounds { index: 5, len: 2 })
        );
        assert_eq!(addr.get_or(5, &ws), &ws);
        assert_eq!(addr.get_or(0, &ws).protocol(), Protocol::Ip4);

        let names: Vec<_> = addr.iter().map(|e| e.protocol().name()).collect();
        assert_eq!(names, ["ip4", "tcp"]);
        assert_eq!((&addr).into_iter().count(), 2);
    }

    #[test]
    fn test_metadata_is_ignored() {
        let addr = localhost_tcp();
        let tagged = addr.with_meta("label", "local");
        assert_eq!(tagged, addr);
        assert_eq!(tagged.hash_code(), addr.hash_code());
        assert_eq!(tagged.push(Entry::bare("ws").unwrap()).meta(), tagged.meta());
        assert!(addr.meta().is_none());
    }
}
