use quickcheck::QuickCheck;

use super::fixtures::{Everything, LogRecord};
use crate::{decode, encode};

fn tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Property: encoding a record and decoding the bytes yields an equal
/// record.
#[test]
fn record_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(rec: LogRecord) -> bool {
        let bytes = encode(&rec).unwrap();
        decode::<LogRecord>(&bytes) == Ok(rec)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(LogRecord) -> bool);
}

/// Property: the round trip holds for every strategy, including stringified
/// and optional fields.
#[test]
fn every_strategy_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(rec: Everything) -> bool {
        let bytes = encode(&rec).unwrap();
        decode::<Everything>(&bytes) == Ok(rec)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Everything) -> bool);
}

/// Property: the encoder's output is JSON that an independent parser
/// accepts and reads back to the same strings and integers.
#[test]
fn encode_agrees_with_serde_json_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(rec: LogRecord) -> bool {
        let bytes = encode(&rec).unwrap();
        let Ok(v) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            return false;
        };
        v["meth"] == rec.method.as_str()
            && v["RemoteIP"] == rec.remote_ip.as_str()
            && v["OriginId"] == rec.origin_id
            && v["Bar"]["Blah"] == rec.bar.blah
            && v["BytesSent"] == rec.bytes_sent
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(LogRecord) -> bool);
}
