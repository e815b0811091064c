//! Performance benchmarks for ferro-panel
//!
//! Run with: cargo bench
//! Run specific benchmark: cargo bench -- tiling

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferro_panel::config::TilingConfig;
use ferro_panel::generate::tiling::tile;
use ferro_panel::{
    Criteria, GenomicInterval, InMemoryGenome, MockScorer, PanelConfig, PanelData,
    ProbeGenerationSpec, ProbeGenerator, ProbeGeometry, SelectionStrategy, TargetMetadata,
    TargetType,
};

fn generator() -> ProbeGenerator<InMemoryGenome, MockScorer> {
    let genome = InMemoryGenome::new().with_chromosome("chr1", "AACCGGTTACGT".repeat(50_000));
    ProbeGenerator::new(PanelConfig::default(), genome, MockScorer::new(0.8)).unwrap()
}

fn cover(start: i64, end: i64) -> ProbeGenerationSpec {
    ProbeGenerationSpec::CoverRegion {
        region: GenomicInterval::new("chr1", start, end).unwrap(),
        metadata: TargetMetadata::new(TargetType::GeneExon, "bench"),
        criteria: Criteria::default(),
        strategy: SelectionStrategy::max_quality(),
    }
}

// =============================================================================
// Tiling benchmarks
// =============================================================================

fn bench_tiling(c: &mut Criterion) {
    let geometry = ProbeGeometry::new(120);
    let config = TilingConfig::default();
    let mut group = c.benchmark_group("tiling");

    for length in [50i64, 401, 5_000, 100_000] {
        let region = GenomicInterval::new("chr1", 10_000, 10_000 + length - 1).unwrap();
        let bounds = GenomicInterval::new("chr1", 1, 10_000 + length + 1_000).unwrap();
        group.throughput(Throughput::Elements(length as u64));
        group.bench_with_input(BenchmarkId::new("bases", length), &region, |b, region| {
            b.iter(|| tile(black_box(region), &bounds, &geometry, &config))
        });
    }

    group.finish();
}

// =============================================================================
// Placement benchmarks
// =============================================================================

fn bench_cover_region(c: &mut Criterion) {
    let g = generator();
    let mut group = c.benchmark_group("cover_region");

    for length in [200i64, 2_000, 20_000] {
        let spec = cover(100_000, 100_000 + length - 1);
        group.throughput(Throughput::Elements(length as u64));
        group.bench_with_input(BenchmarkId::new("bases", length), &spec, |b, spec| {
            b.iter(|| g.generate(black_box(spec), None))
        });
    }

    group.finish();
}

fn bench_phases(c: &mut Criterion) {
    let g = generator();
    // Overlapping exon-sized targets so later phases hit existing coverage
    let genes: Vec<ProbeGenerationSpec> = (0..200)
        .map(|i| cover(10_000 + i * 2_500, 10_300 + i * 2_500))
        .collect();
    let custom: Vec<ProbeGenerationSpec> = (0..200)
        .map(|i| cover(10_200 + i * 2_500, 10_700 + i * 2_500))
        .collect();

    c.bench_function("two_phase_panel", |b| {
        b.iter(|| {
            let mut panel = PanelData::new();
            panel.run_phase("genes", &g, genes.clone()).ok();
            panel.run_phase("custom", &g, custom.clone()).ok();
            black_box(panel.probe_count())
        })
    });
}

criterion_group!(benches, bench_tiling, bench_cover_region, bench_phases);
criterion_main!(benches);
