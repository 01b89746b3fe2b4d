//! Known vectors and boundary cases across the public API.

use multiformats::codec::varint;
use multiformats::multibase::BaseDefinition;
use multiformats::{
    Address, AddressError, Cid, CidError, Entry, ErrorKind, HashFunctions, MultibaseError,
    MulticodecError, Multihash, MultihashError, VarintError, multibase, multicodec, multihash,
};
use tracing_subscriber::EnvFilter;

const DECENTRALIZE: &[u8] = b"Decentralize everything!!";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

#[test]
fn test_sha1_multihash_from_bytes() {
    let mh = Multihash::decode(&[0x11, 0x04, 0x0b, 0xee, 0xc7, 0xb8]).unwrap();
    assert_eq!(mh.name(), "sha1");
    assert_eq!(mh.digest_hex(), "0beec7b8");
}

#[test]
fn test_cid_v0_of_foo_bar_baz() {
    let mh = HashFunctions::default().digest("sha2-256", b"foo bar baz").unwrap();
    let cid = Cid::v0(mh).unwrap();
    assert_eq!(
        cid.format(None).unwrap(),
        "Qmd8kgzaFLGYtTS1zfF37qKGgYQd5yKcQMyBeSa8UkUz4W"
    );
}

#[test]
fn test_localhost_address() {
    let addr = Address::create([
        Entry::new("ip4", "127.0.0.1").unwrap(),
        Entry::new("tcp", 80).unwrap(),
    ]);
    assert_eq!(addr.to_bytes(), vec![4, 127, 0, 0, 1, 6, 0, 80]);
    assert_eq!(addr.to_string(), "/ip4/127.0.0.1/tcp/80");
}

#[test]
fn test_multibase_vectors() {
    let cases = [
        ("base16", "f446563656e7472616c697a652065766572797468696e672121"),
        ("BASE16", "F446563656E7472616C697A652065766572797468696E672121"),
        ("base32", "birswgzloorzgc3djpjssazlwmvzhs5dinfxgoijb"),
        ("BASE32", "BIRSWGZLOORZGC3DJPJSSAZLWMVZHS5DINFXGOIJB"),
        ("base32hex", "v8him6pbeehp62r39f9ii0pbmclp7it38d5n6e891"),
        ("base36", "k343ixo7d49hqj1ium15pgy1wzww5fxrid21td7l"),
        ("base58btc", "zUXE7GvtEk8XTXs1GF8HSGbVA9FCX9SEBPe"),
        ("base64", "mRGVjZW50cmFsaXplIGV2ZXJ5dGhpbmchIQ"),
    ];
    for (key, expected) in cases {
        assert_eq!(multibase::format(key, DECENTRALIZE).unwrap(), expected, "{key}");
        assert_eq!(multibase::parse(expected).unwrap(), DECENTRALIZE, "{key}");
    }
}

#[test]
fn test_boundaries() {
    assert_eq!(
        varint::encode_i64(-1),
        Err(VarintError::Negative { value: -1 })
    );
    assert_eq!(
        multibase::format("base58btc", &[]),
        Err(MultibaseError::EmptyInput)
    );
    assert_eq!(Multihash::new("sha2-256", &[]), Err(MultihashError::EmptyDigest));
    assert_eq!(Address::default().pop(), Err(AddressError::EmptyAddress));
}

#[test]
fn test_varint_limits() {
    assert_eq!(varint::encode(u64::MAX), Err(VarintError::Unsupported { value: u64::MAX }));
    assert!(matches!(
        varint::decode(&[0xff; 10], 0),
        Err(VarintError::Overlong { .. })
    ));
    assert!(matches!(
        varint::decode(&[0x80, 0x80], 0),
        Err(VarintError::Truncated { .. })
    ));
    let mut buffer = [0u8; 2];
    assert!(matches!(
        varint::write_at(300, &mut buffer, 1),
        Err(VarintError::OutOfBounds { .. })
    ));
}

#[test]
fn test_concatenated_values_are_self_terminating() {
    let fns = HashFunctions::default();
    let a = fns.digest("sha2-256", b"a").unwrap();
    let b = fns.digest("sha2-512", b"b").unwrap();

    let mut buffer = vec![0u8; a.as_bytes().len() + b.as_bytes().len()];
    let n = a.write_at(&mut buffer, 0).unwrap();
    b.write_at(&mut buffer, n).unwrap();

    let (first, read) = Multihash::read_at(&buffer, 0).unwrap();
    let (second, _) = Multihash::read_at(&buffer, read).unwrap();
    assert_eq!(first, a);
    assert_eq!(second, b);
}

#[test]
fn test_verify_through_free_function() {
    let fns = HashFunctions::default();
    let mh = fns.digest("dbl-sha2-256", b"content").unwrap();
    assert_eq!(multihash::test(Some(&mh), Some(b"content".as_slice()), &fns), Ok(Some(true)));
    assert_eq!(multihash::test(Some(&mh), Some(b"other".as_slice()), &fns), Ok(Some(false)));
    assert_eq!(multihash::test(None, None, &fns), Ok(None));
}

#[test]
fn test_error_kinds() {
    let err = Cid::parse("zzz").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);

    let err = multicodec::register_codec("raw", 0x99u64).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RegistryConflict);
    assert_eq!(err.kind().code(), "MF004");

    let err = Address::parse("/onion/xyz").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownIdentifier);

    let err = CidError::from(MulticodecError::NegativeCode { code: -1 });
    assert_eq!(err.kind(), ErrorKind::InvalidConstruction);

    let err: multiformats::Error = Multihash::new("sha2-256", &[]).unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::InvalidConstruction);
}

#[test]
fn test_runtime_registration() {
    init_tracing();

    multicodec::register_codec("vectors-codec", 0x3e_0001u64).unwrap();
    let mh = HashFunctions::default().digest("sha2-256", b"x").unwrap();
    let cid = Cid::new("vectors-codec", mh).unwrap();
    assert_eq!(cid.codec_key().as_deref(), Some("vectors-codec"));
    multicodec::unregister_codec("vectors-codec");
    assert_eq!(cid.codec_key(), None);

    multibase::register_base(BaseDefinition::new("vectors-base4", '4').alphabet("ACGT")).unwrap();
    let text = cid.format(Some("vectors-base4")).unwrap();
    assert!(text.starts_with('4'));
    assert_eq!(multibase::parse(&text).unwrap(), cid.to_bytes());
    multibase::unregister_base("vectors-base4");
    assert!(multibase::inspect(&text).is_none());
}
