use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use sysreport::{
    render, scale, MemorySnapshot, Section, SectionData, SectionSelection, SnapshotAssembler,
    SystemCollector,
};

/// Benchmark a full report against the live host
fn bench_report_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_assembly");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    // CPU is excluded: its usage sample sleeps for the sampling interval
    for section in [Section::System, Section::Memory, Section::Disk, Section::Network] {
        let selection = SectionSelection::default().with_section(section, true);
        group.bench_with_input(BenchmarkId::new("section", section), &selection, |b, sel| {
            let mut collector = SystemCollector::new();
            b.iter(|| SnapshotAssembler::new(*sel).assemble(&mut collector))
        });
    }

    group.finish();
}

/// Benchmark byte scaling across the unit range
fn bench_byte_scaling(c: &mut Criterion) {
    let samples: [u64; 6] = [
        512,
        4_567_890,
        8 * 1024 * 1024 * 1024,
        3 * 1024u64.pow(4),
        1024u64.pow(5),
        u64::MAX,
    ];

    c.bench_function("byte_scaling", |b| {
        b.iter(|| {
            for bytes in samples {
                black_box(scale(black_box(bytes)));
            }
        })
    });
}

/// Benchmark text and JSON rendering of a live report
fn bench_rendering(c: &mut Criterion) {
    let selection = SectionSelection::default()
        .with_section(Section::System, true)
        .with_section(Section::Memory, true)
        .with_section(Section::Disk, true)
        .with_section(Section::Network, true);
    let report = SnapshotAssembler::new(selection).assemble(&mut SystemCollector::new());

    c.bench_function("render_text", |b| b.iter(|| render::render_text(&report)));

    c.bench_function("render_json", |b| {
        b.iter(|| render::render_json(&report).expect("Should serialize"))
    });
}

/// Benchmark JSON deserialization of a memory snapshot
fn bench_json_deserialization(c: &mut Criterion) {
    let selection = SectionSelection::default().with_section(Section::Memory, true);
    let report = SnapshotAssembler::new(selection).assemble(&mut SystemCollector::new());

    let memory = match report.get(Section::Memory).and_then(|s| s.data()) {
        Some(SectionData::Memory(memory)) => memory.clone(),
        _ => return,
    };
    let json_string = serde_json::to_string(&memory).expect("Should serialize");

    c.bench_function("json_deserialization", |b| {
        b.iter(|| serde_json::from_str::<MemorySnapshot>(&json_string).expect("Should deserialize"))
    });
}

criterion_group!(
    benches,
    bench_report_assembly,
    bench_byte_scaling,
    bench_rendering,
    bench_json_deserialization
);
criterion_main!(benches);
