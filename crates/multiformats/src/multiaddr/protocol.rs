//! The fixed multiaddr protocol table.

use std::fmt;

/// How a protocol's value is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// No value.
    None,
    /// Exactly `n` raw bytes (IP addresses).
    Binary(usize),
    /// An unsigned integer of `width` big-endian bytes (ports).
    Numeric(usize),
    /// `varint(len) ‖ utf8` (hostnames, peer ids).
    Utf8,
}

macro_rules! protocols {
    ($($variant:ident => ($name:literal, $code:literal, $kind:expr),)*) => {
        /// A multiaddr protocol.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Protocol {
            $($variant,)*
        }

        impl Protocol {
            /// Every protocol, ordered by code.
            pub const ALL: &'static [Protocol] = &[$(Protocol::$variant,)*];

            /// Returns the name used in text form.
            pub fn name(self) -> &'static str {
                match self {
                    $(Protocol::$variant => $name,)*
                }
            }

            /// Returns the protocol code.
            pub fn code(self) -> u64 {
                match self {
                    $(Protocol::$variant => $code,)*
                }
            }

            /// Returns the value layout.
            pub fn kind(self) -> ValueKind {
                match self {
                    $(Protocol::$variant => $kind,)*
                }
            }

            /// Looks up a protocol by code.
            pub fn from_code(code: u64) -> Option<Protocol> {
                match code {
                    $($code => Some(Protocol::$variant),)*
                    _ => None,
                }
            }

            /// Looks up a protocol by name. `ipfs` is accepted for `p2p`.
            pub fn from_name(name: &str) -> Option<Protocol> {
                match name {
                    $($name => Some(Protocol::$variant),)*
                    "ipfs" => Some(Protocol::P2p),
                    _ => None,
                }
            }
        }
    };
}

protocols! {
    Ip4 => ("ip4", 4, ValueKind::Binary(4)),
    Tcp => ("tcp", 6, ValueKind::Numeric(2)),
    Dccp => ("dccp", 33, ValueKind::Numeric(2)),
    Ip6 => ("ip6", 41, ValueKind::Binary(16)),
    Dns => ("dns", 53, ValueKind::Utf8),
    Dns4 => ("dns4", 54, ValueKind::Utf8),
    Dns6 => ("dns6", 55, ValueKind::Utf8),
    Dnsaddr => ("dnsaddr", 56, ValueKind::Utf8),
    Sctp => ("sctp", 132, ValueKind::Numeric(2)),
    Udp => ("udp", 273, ValueKind::Numeric(2)),
    P2pWebrtcStar => ("p2p-webrtc-star", 275, ValueKind::None),
    P2pWebrtcDirect => ("p2p-webrtc-direct", 276, ValueKind::None),
    Webrtc => ("webrtc", 280, ValueKind::None),
    P2pCircuit => ("p2p-circuit", 290, ValueKind::None),
    Udt => ("udt", 301, ValueKind::None),
    Utp => ("utp", 302, ValueKind::None),
    P2p => ("p2p", 421, ValueKind::Utf8),
    Https => ("https", 443, ValueKind::None),
    Tls => ("tls", 448, ValueKind::None),
    Noise => ("noise", 454, ValueKind::None),
    Quic => ("quic", 460, ValueKind::None),
    QuicV1 => ("quic-v1", 461, ValueKind::None),
    Webtransport => ("webtransport", 465, ValueKind::None),
    Ws => ("ws", 477, ValueKind::None),
    Wss => ("wss", 478, ValueKind::None),
    P2pWebsocketStar => ("p2p-websocket-star", 479, ValueKind::None),
    Http => ("http", 480, ValueKind::None),
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
