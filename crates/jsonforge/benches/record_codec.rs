//! Benchmark – record decode and encode, with `serde_json` as the baseline.
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsonforge::{Encoder, record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Foo {
    #[serde(rename = "Blah")]
    blah: i64,
}

record!(Foo {
    blah: i64 => "Blah",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct LogRecord {
    #[serde(rename = "id", default)]
    timestamp: i64,
    #[serde(rename = "OriginId", default)]
    origin_id: u32,
    #[serde(rename = "Bar", default)]
    bar: Foo,
    #[serde(rename = "meth", default)]
    method: String,
    #[serde(rename = "ReqId", default)]
    req_id: String,
    #[serde(rename = "ServerIp", default)]
    server_ip: String,
    #[serde(rename = "RemoteIP", default)]
    remote_ip: String,
    #[serde(rename = "BytesSent", default)]
    bytes_sent: u64,
}

record!(LogRecord {
    timestamp: i64 => "id" [omitempty],
    origin_id: u32 => "OriginId",
    bar: Foo => "Bar",
    method: String => "meth",
    req_id: String => "ReqId",
    server_ip: String => "ServerIp",
    remote_ip: String => "RemoteIP",
    bytes_sent: u64 => "BytesSent",
});

fn sample(i: u64) -> LogRecord {
    LogRecord {
        timestamp: 1_400_000_000 + i64::try_from(i).unwrap_or_default(),
        origin_id: 22,
        bar: Foo { blah: -3 },
        method: "GET".into(),
        req_id: format!("req-{i:08x}"),
        server_ip: "192.168.1.10".into(),
        remote_ip: "10.20.30.40".into(),
        bytes_sent: 4096 + i,
    }
}

/// One encoded record, padded with `noise` unknown keys holding nested values
/// so the skip path gets exercised too.
fn payload(noise: usize) -> Vec<u8> {
    let mut out = b"{".to_vec();
    for i in 0..noise {
        out.extend_from_slice(
            format!(r#""extra{i}": {{"a": [1, 2.5, "three", null, {{"b": [true]}}]}}, "#).as_bytes(),
        );
    }
    let encoded = jsonforge::encode(&sample(1)).unwrap();
    out.extend_from_slice(&encoded[1..]);
    out
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_decode");
    for &noise in &[0usize, 4, 32] {
        let input = payload(noise);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("jsonforge", noise), &input, |b, input| {
            b.iter(|| {
                let rec: LogRecord = jsonforge::decode(black_box(input)).unwrap();
                black_box(rec);
            });
        });
        group.bench_with_input(BenchmarkId::new("serde_json", noise), &input, |b, input| {
            b.iter(|| {
                let rec: LogRecord = serde_json::from_slice(black_box(input)).unwrap();
                black_box(rec);
            });
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let records: Vec<LogRecord> = (0..64).map(sample).collect();
    let mut group = c.benchmark_group("record_encode");

    group.bench_function("jsonforge_encoder", |b| {
        let mut encoder = Encoder::new();
        b.iter(|| {
            for rec in &records {
                black_box(encoder.encode(black_box(rec)).unwrap().len());
            }
        });
    });
    group.bench_function("jsonforge_vec", |b| {
        b.iter(|| {
            for rec in &records {
                black_box(jsonforge::encode(black_box(rec)).unwrap());
            }
        });
    });
    group.bench_function("serde_json", |b| {
        b.iter(|| {
            for rec in &records {
                black_box(serde_json::to_vec(black_box(rec)).unwrap());
            }
        });
    });
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_decode, bench_encode }
criterion_main!(benches);
