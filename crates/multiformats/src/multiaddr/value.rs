//! Per-protocol value transcoders.
//!
//! Values arrive from callers and from text as loosely-typed [`Value`]s and
//! are normalized against the protocol's [`ValueKind`] before encoding, so
//! every entry holds exactly one canonical representation.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::codec::{Reader, Writer};
use crate::error::AddressError;
use crate::limits::MAX_ADDRESS_VALUE_LEN;
use crate::multiaddr::protocol::{Protocol, ValueKind};

/// The value of a multiaddr entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Ip(IpAddr),
    Number(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Ip(ip) => write!(f, "{ip}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<IpAddr> for Value {
    fn from(ip: IpAddr) -> Self {
        Value::Ip(ip)
    }
}

impl From<Ipv4Addr> for Value {
    fn from(ip: Ipv4Addr) -> Self {
        Value::Ip(IpAddr::V4(ip))
    }
}

impl From<Ipv6Addr> for Value {
    fn from(ip: Ipv6Addr) -> Self {
        Value::Ip(IpAddr::V6(ip))
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(i64::from(n))
                }
            }
        )*
    };
}

value_from_int!(u8, u16, u32, i8, i16, i32, i64);

fn invalid(protocol: Protocol, reason: impl Into<String>) -> AddressError {
    AddressError::InvalidValue {
        protocol: protocol.name(),
        reason: reason.into(),
    }
}

/// Coerces `value` into the canonical representation for `protocol`.
pub(crate) fn normalize(protocol: Protocol, value: Value) -> Result<Value, AddressError> {
    match protocol.kind() {
        ValueKind::None => Err(AddressError::UnexpectedValue {
            protocol: protocol.name(),
        }),
        ValueKind::Binary(4) => match value {
            Value::Ip(IpAddr::V4(_)) => Ok(value),
            Value::Text(text) => text
                .parse::<Ipv4Addr>()
                .map(Value::from)
                .map_err(|_| invalid(protocol, format!("malformed IPv4 address {text:?}"))),
            other => Err(invalid(protocol, format!("expected an IPv4 address, got {other}"))),
        },
        ValueKind::Binary(16) => match value {
            Value::Ip(IpAddr::V6(_)) => Ok(value),
            Value::Text(text) => text
                .parse::<Ipv6Addr>()
                .map(Value::from)
                .map_err(|_| invalid(protocol, format!("malformed IPv6 address {text:?}"))),
            other => Err(invalid(protocol, format!("expected an IPv6 address, got {other}"))),
        },
        ValueKind::Binary(n) => Err(invalid(
            protocol,
            format!("no transcoder for {n}-byte values"),
        )),
        ValueKind::Numeric(width) => {
            let n = match value {
                Value::Number(n) => n,
                Value::Text(text) => text
                    .parse::<i64>()
                    .map_err(|_| invalid(protocol, format!("malformed number {text:?}")))?,
                Value::Ip(ip) => {
                    return Err(invalid(protocol, format!("expected a number, got {ip}")));
                }
            };
            let max = numeric_max(width);
            if n < 0 || n as u64 > max {
                return Err(invalid(protocol, format!("{n} is outside 0..={max}")));
            }
            Ok(Value::Number(n))
        }
        ValueKind::Utf8 => match value {
            Value::Text(text) => {
                check_text(protocol, &text)?;
                Ok(Value::Text(text))
            }
            other => Err(invalid(protocol, format!("expected text, got {other}"))),
        },
    }
}

fn numeric_max(width: usize) -> u64 {
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (8 * width)) - 1
    }
}

fn check_text(protocol: Protocol, text: &str) -> Result<(), AddressError> {
    if text.is_empty() {
        return Err(invalid(protocol, "value is empty"));
    }
    if text.len() > MAX_ADDRESS_VALUE_LEN {
        return Err(invalid(
            protocol,
            format!("{} bytes exceeds maximum {MAX_ADDRESS_VALUE_LEN}", text.len()),
        ));
    }
    if text.contains('/') {
        return Err(invalid(protocol, "value contains '/'"));
    }
    Ok(())
}

/// Writes a normalized value.
pub(crate) fn write(
    protocol: Protocol,
    value: &Value,
    writer: &mut Writer,
) -> Result<(), AddressError> {
    match (protocol.kind(), value) {
        (ValueKind::Binary(_), Value::Ip(IpAddr::V4(ip))) => writer.write_bytes(&ip.octets()),
        (ValueKind::Binary(_), Value::Ip(IpAddr::V6(ip))) => writer.write_bytes(&ip.octets()),
        (ValueKind::Numeric(width), Value::Number(n)) => writer.write_uint_be(*n as u64, width),
        (ValueKind::Utf8, Value::Text(text)) => writer.write_prefixed(text.as_bytes())?,
        _ => return Err(invalid(protocol, format!("cannot encode {value}"))),
    }
    Ok(())
}

/// Reads the value that follows `protocol`'s code.
pub(crate) fn read(
    protocol: Protocol,
    reader: &mut Reader<'_>,
) -> Result<Option<Value>, AddressError> {
    let context = protocol.name();
    match protocol.kind() {
        ValueKind::None => Ok(None),
        ValueKind::Binary(4) => {
            let bytes = reader.read_bytes(4, context)?;
            let octets: [u8; 4] = [bytes[0], bytes[1], bytes[2], bytes[3]];
            Ok(Some(Value::from(Ipv4Addr::from(octets))))
        }
        ValueKind::Binary(16) => {
            let bytes = reader.read_bytes(16, context)?;
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            Ok(Some(Value::from(Ipv6Addr::from(octets))))
        }
        ValueKind::Binary(n) => Err(invalid(
            protocol,
            format!("no transcoder for {n}-byte values"),
        )),
        ValueKind::Numeric(width) => {
            let n = reader.read_uint_be(width, context)?;
            let n = i64::try_from(n)
                .map_err(|_| invalid(protocol, format!("{n} is out of range")))?;
            Ok(Some(Value::Number(n)))
        }
        ValueKind::Utf8 => {
            let bytes = reader
                .read_prefixed(MAX_ADDRESS_VALUE_LEN, context)?
                .map_err(|len| {
                    invalid(
                        protocol,
                        format!("{len} bytes exceeds maximum {MAX_ADDRESS_VALUE_LEN}"),
                    )
                })?;
            let text = std::str::from_utf8(bytes)
                .map_err(|_| invalid(protocol, "value is not valid UTF-8"))?;
            check_text(protocol, text)?;
            Ok(Some(Value::Text(text.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ip() {
        assert_eq!(
            normalize(Protocol::Ip4, Value::from("127.0.0.1")).unwrap(),
            Value::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST))
        );
        assert_eq!(
            normalize(Protocol::Ip6, Value::from("::1")).unwrap(),
            Value::Ip(IpAddr::V6(Ipv6Addr::LOCALHOST))
        );
        assert!(normalize(Protocol::Ip4, Value::from("256.0.0.1")).is_err());
        assert!(normalize(Protocol::Ip4, Value::from(Ipv6Addr::LOCALHOST)).is_err());
        assert!(normalize(Protocol::Ip6, Value::from("fe80::1%eth0")).is_err());
    }

    #[test]
    fn test_normalize_port() {
        assert_eq!(normalize(Protocol::Tcp, Value::from("80")).unwrap(), Value::Number(80));
        assert_eq!(normalize(Protocol::Udp, Value::from(65535)).unwrap(), Value::Number(65535));
        assert!(matches!(
            normalize(Protocol::Tcp, Value::from(65536)),
            Err(AddressError::InvalidValue { protocol: "tcp", .. })
        ));
        assert!(normalize(Protocol::Tcp, Value::from(-1)).is_err());
        assert!(normalize(Protocol::Tcp, Value::from("http")).is_err());
    }

    #[test]
    fn test_normalize_text() {
        assert!(normalize(Protocol::Dns4, Value::from("example.com")).is_ok());
        assert!(normalize(Protocol::Dns4, Value::from("")).is_err());
        assert!(normalize(Protocol::Dns4, Value::from("a/b")).is_err());
        let too_long = "x".repeat(MAX_ADDRESS_VALUE_LEN + 1);
        assert!(normalize(Protocol::Dns4, Value::from(too_long)).is_err());
        assert!(normalize(Protocol::Dns4, Value::from(53)).is_err());
    }

    #[test]
    fn test_no_value_protocol() {
        assert_eq!(
            normalize(Protocol::Ws, Value::from("x")),
            Err(AddressError::UnexpectedValue { protocol: "ws" })
        );
    }

    #[test]
    fn test_write_then_read() {
        let cases = [
            (Protocol::Ip4, Value::from(Ipv4Addr::new(10, 0, 0, 1))),
            (Protocol::Ip6, Value::from(Ipv6Addr::LOCALHOST)),
            (Protocol::Tcp, Value::Number(443)),
            (Protocol::Dns, Value::from("example.com")),
        ];
        for (protocol, value) in cases {
            let mut writer = Writer::new();
            write(protocol, &value, &mut writer).unwrap();
            let bytes = writer.into_bytes();
            let mut reader = Reader::new(&bytes);
            assert_eq!(read(protocol, &mut reader).unwrap(), Some(value));
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn test_read_rejects_bad_text() {
        let mut reader = Reader::new(&[0x02, 0xff, 0xfe]);
        assert!(matches!(
            read(Protocol::Dns, &mut reader),
            Err(AddressError::InvalidValue { .. })
        ));
        let mut reader = Reader::new(&[0x00]);
        assert!(read(Protocol::Dns, &mut reader).is_err());
        let mut reader = Reader::new(&[127, 0]);
        assert!(matches!(
            read(Protocol::Ip4, &mut reader),
            Err(AddressError::Varint(_))
        ));
    }
}
