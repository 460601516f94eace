#![no_main]
use std::{cell::RefCell, collections::BTreeMap};

use arbitrary::Arbitrary;
use jsonforge::{ByteReader, DecodeOptions, Lexer, RawJson, Token, record};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 1; // option flags

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b"/* c */", b"// c\n"];

static KEYS: &[&str] = &["id", "name", "ratio", "tags", "child", "raw", "attrs", "on", "quoted"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

#[derive(Debug, Default)]
struct Child {
    id: i64,
    name: String,
}

record!(Child {
    id: i64 => "id",
    name: String => "name" [omitempty],
});

#[derive(Debug, Default)]
struct Target {
    id: i64,
    name: String,
    ratio: f64,
    tags: Vec<String>,
    child: Option<Box<Child>>,
    raw: RawJson,
    attrs: BTreeMap<String, u32>,
    on: bool,
    quoted: u16,
}

record!(Target {
    id: i64 => "id",
    name: String => "name",
    ratio: f64 => "ratio" [omitempty],
    tags: Vec<String> => "tags" [omitempty],
    child: Option<Box<Child>> => "child" [omitempty],
    raw: RawJson => "raw" [omitempty],
    attrs: BTreeMap<String, u32> => "attrs" [omitempty],
    on: bool => "on",
    quoted: u16 => "quoted" [string],
});

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07);
        let limit = max_size - HEADER;
        HEADER + append_object(&mut data[HEADER..], size, limit)
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Writes an object whose keys are mostly ones `Target` knows, with
/// whitespace and comments sprinkled between tokens.
fn append_object(buf: &mut [u8], size: usize, limit: usize) -> usize {
    let mut out = b"{".to_vec();
    let entries = with_rng(|rng| rng.random_range(0..8));
    for i in 0..entries {
        if i > 0 {
            out.push(b',');
        }
        out.extend_from_slice(whitespace());
        let key = with_rng(|rng| {
            if rng.random_bool(0.8) {
                KEYS[rng.random_range(0..KEYS.len())].to_owned()
            } else {
                format!("unknown{}", rng.next_u32())
            }
        });
        out.extend_from_slice(serde_json::to_string(&key).unwrap_or_default().as_bytes());
        out.extend_from_slice(whitespace());
        out.push(b':');
        out.extend_from_slice(whitespace());
        out.extend_from_slice(&arbitrary_value(size));
    }
    out.extend_from_slice(whitespace());
    out.push(b'}');

    let len = out.len().min(limit);
    buf[..len].copy_from_slice(&out[..len]);
    len
}

fn whitespace() -> &'static [u8] {
    with_rng(|rng| {
        if rng.random_bool(0.5) {
            b""
        } else {
            WS_TABLE[rng.random_range(0..WS_TABLE.len())]
        }
    })
}

fn arbitrary_value(size: usize) -> Vec<u8> {
    loop {
        let s = with_rng(|rng| rng.random_range(1..=size.clamp(1, 256)));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            return serde_json::to_vec(&value.0).unwrap_or_default();
        }
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::Number(u.arbitrary::<i64>()?.into()),
            4..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

fn options(flags: u8) -> DecodeOptions {
    DecodeOptions {
        deny_unknown_fields: flags & 1 != 0,
        allow_comments: flags & 2 != 0,
        allow_trailing_data: flags & 4 != 0,
        ..Default::default()
    }
}

/// Scans tokens until the input or the lexer gives out. Every scan must make
/// progress.
fn scan_all(data: &[u8], options: DecodeOptions) {
    let mut lexer = Lexer::with_options(data, options);
    loop {
        let before = lexer.pos();
        match lexer.scan() {
            Token::Eof | Token::Error => break,
            tok if tok.starts_value() => {
                if lexer.skip_field(tok).is_err() {
                    break;
                }
            }
            _ => {}
        }
        assert!(lexer.pos() > before, "lexer stalled at {before}");
    }
}

/// Runs the string slicer over everything after the first quote, in both
/// modes. The cursor never moves past the input.
fn slice_strings(data: &[u8]) {
    let Some(start) = data.iter().position(|&b| b == b'"') else {
        return;
    };
    let rest = &data[start + 1..];
    for verbatim in [false, true] {
        let mut reader = ByteReader::new(rest);
        let mut out = Vec::new();
        let _ = reader.slice_quoted_string(&mut out, verbatim);
        assert!(reader.pos() <= rest.len());
    }
}

/// A successful decode must re-encode to bytes that decode to the same
/// encoding.
fn decode_roundtrip(data: &[u8], options: DecodeOptions) {
    let Ok(rec) = jsonforge::decode_with_options::<Target>(data, options) else {
        return;
    };
    let Ok(first) = jsonforge::encode(&rec) else {
        return;
    };
    let again: Target = match jsonforge::decode(&first) {
        Ok(v) => v,
        Err(e) => panic!("re-decode failed: {e}\n{}", String::from_utf8_lossy(&first)),
    };
    let second = jsonforge::encode(&again).unwrap();
    assert_eq!(first, second);
}

fn run(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let options = options(data[0]);
    let data = &data[HEADER..];

    scan_all(data, options);
    slice_strings(data);
    decode_roundtrip(data, options);
}

fuzz_target!(|data: &[u8]| run(data));
