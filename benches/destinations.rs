#![allow(unused)]
extern crate jumpscope;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use jumpscope::{
    config::KnownAppIds,
    decoder::LinkDecoder,
    destinations::custom,
    shell::{NoInstalledApplications, NoShell},
    AppIdHash, Enrichment,
};
use std::hint::black_box;

const SHELL_LINK_CLSID: [u8; 16] = [
    0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
];

fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Class-identified unicode link with a description and an environment target block
fn link_object(index: usize) -> Vec<u8> {
    let description = format!("Document {index}");
    let target = format!("C:\\Users\\Public\\Documents\\document-{index}.txt");

    let mut data = SHELL_LINK_CLSID.to_vec();
    data.extend_from_slice(&0x4C_u32.to_le_bytes());
    data.extend_from_slice(&SHELL_LINK_CLSID);
    data.extend_from_slice(&0x84_u32.to_le_bytes());
    data.resize(16 + 0x4C, 0);

    data.extend_from_slice(&(description.encode_utf16().count() as u16).to_le_bytes());
    data.extend_from_slice(&utf16(&description));

    let mut ansi: Vec<u8> = target.bytes().collect();
    ansi.resize(260, 0);
    let mut unicode = utf16(&target);
    unicode.resize(520, 0);
    data.extend_from_slice(&0x314_u32.to_le_bytes());
    data.extend_from_slice(&0xA000_0001_u32.to_le_bytes());
    data.extend_from_slice(&ansi);
    data.extend_from_slice(&unicode);
    data.extend_from_slice(&0_u32.to_le_bytes());
    data
}

/// Custom destinations buffer with one titled category and a task list
fn custom_destinations(items: usize, tasks: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for value in [2_i32, 2, 0] {
        data.extend_from_slice(&value.to_le_bytes());
    }

    data.extend_from_slice(&0_i32.to_le_bytes());
    data.extend_from_slice(&(8_i16).to_le_bytes());
    data.extend_from_slice(&utf16("Projects"));
    data.extend_from_slice(&(items as i32).to_le_bytes());
    for index in 0..items {
        data.extend_from_slice(&link_object(index));
    }
    data.extend_from_slice(&0xBABF_FBAB_u32.to_le_bytes());

    data.extend_from_slice(&2_i32.to_le_bytes());
    data.extend_from_slice(&(tasks as i32).to_le_bytes());
    for index in 0..tasks {
        data.extend_from_slice(&link_object(items + index));
    }
    data.extend_from_slice(&0xBABF_FBAB_u32.to_le_bytes());
    data
}

/// Benchmark the identity hash that names every destinations file
fn bench_app_id_hash(c: &mut Criterion) {
    let app_ids = [
        "Microsoft.Windows.Explorer",
        "{6D809377-6AF0-444B-8957-A3773F02200E}\\Contoso\\Editor\\editor.exe",
        "Microsoft.WindowsCalculator_8wekyb3d8bbwe!App",
    ];

    let mut group = c.benchmark_group("app_id_hash");
    for app_id in app_ids {
        group.throughput(Throughput::Bytes(app_id.len() as u64));
        group.bench_function(format!("compute/{}", app_id.len()), |b| {
            b.iter(|| black_box(AppIdHash::compute(black_box(app_id))));
        });
    }
    group.finish();
}

/// Benchmark decoding a custom destinations buffer without shell enrichment
///
/// The category limit is far below the item count, so the discarded objects measure the cost
/// of walking over links that are decoded but never emitted.
fn bench_custom_destinations(c: &mut Criterion) {
    let data = custom_destinations(200, 20);
    let known = KnownAppIds::default();
    let decoder = LinkDecoder::new(
        Enrichment::Disabled,
        &known,
        &NoShell,
        &NoInstalledApplications,
    );

    println!(
        "Benchmarking custom destinations: {} bytes ({:.2} KB)",
        data.len(),
        data.len() as f64 / 1024.0
    );

    let mut group = c.benchmark_group("custom_destinations");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("parse_limit_10", |b| {
        b.iter(|| {
            let parsed = custom::parse(black_box(&data), "bench.customDestinations-ms", &decoder, 10);
            black_box(parsed)
        });
    });
    group.bench_function("parse_unlimited", |b| {
        b.iter(|| {
            let parsed =
                custom::parse(black_box(&data), "bench.customDestinations-ms", &decoder, usize::MAX);
            black_box(parsed)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_app_id_hash, bench_custom_destinations);
criterion_main!(benches);
