//! Multi-phase panel design
//!
//! Phases run in priority order and each sees the probes of the phases
//! before it.

use std::io::Write;

use ferro_panel::coverage::PanelCoverage;
use ferro_panel::{
    Criteria, GenomicInterval, GenomicPosition, InMemoryGenome, MockScorer, OrientedRegion,
    PanelConfig, PanelData, ProbeGenerationSpec, ProbeGenerator, SelectionStrategy,
    SequenceDefinition, TargetMetadata, TargetType,
};
use tempfile::NamedTempFile;

fn iv(start: i64, end: i64) -> GenomicInterval {
    GenomicInterval::new("chr1", start, end).unwrap()
}

fn generator(config: PanelConfig) -> ProbeGenerator<InMemoryGenome, MockScorer> {
    let genome = InMemoryGenome::new().with_chromosome("chr1", "ACGT".repeat(2500));
    ProbeGenerator::new(config, genome, MockScorer::default()).unwrap()
}

fn cover(region: GenomicInterval, target_type: TargetType, name: &str) -> ProbeGenerationSpec {
    ProbeGenerationSpec::CoverRegion {
        region,
        metadata: TargetMetadata::new(target_type, name),
        criteria: Criteria::default(),
        strategy: SelectionStrategy::max_quality(),
    }
}

fn starts(panel: &PanelData, from: usize) -> Vec<i64> {
    panel.result().probes[from..]
        .iter()
        .filter_map(|p| p.region().map(GenomicInterval::start))
        .collect()
}

#[test]
fn test_later_phase_fills_only_the_gap() {
    let g = generator(PanelConfig::default());
    let mut panel = PanelData::new();

    panel
        .run_phase("genes", &g, vec![cover(iv(1000, 1400), TargetType::GeneExon, "EXON")])
        .unwrap();
    assert_eq!(starts(&panel, 0), vec![980, 1087, 1194, 1301]);

    let custom = panel
        .run_phase(
            "custom",
            &g,
            vec![cover(iv(1200, 1700), TargetType::CustomRegion, "hotspot")],
        )
        .unwrap();
    assert_eq!(custom.probes, 3);
    assert_eq!(starts(&panel, 4), vec![1401, 1501, 1601]);
    assert!(panel.is_covered(&iv(1000, 1700)));
}

#[test]
fn test_variant_phase_skips_covered_small_indels() {
    let g = generator(PanelConfig::default());
    let mut panel = PanelData::new();
    panel
        .run_phase("genes", &g, vec![cover(iv(1000, 1400), TargetType::GeneExon, "EXON")])
        .unwrap();

    let deletion = SequenceDefinition::two_sided(
        OrientedRegion::forward(iv(1001, 1060)),
        "",
        OrientedRegion::forward(iv(1071, 1130)),
    )
    .unwrap();
    let breakend = SequenceDefinition::two_sided(
        OrientedRegion::forward(iv(3001, 3060)),
        "",
        OrientedRegion::reverse(iv(5001, 5060)),
    )
    .unwrap();
    let sv = TargetMetadata::new(TargetType::StructuralVariant, "SV");
    let summary = panel
        .run_phase(
            "variants",
            &g,
            vec![
                ProbeGenerationSpec::CoverSequence {
                    definition: deletion,
                    metadata: sv.clone(),
                    criteria: Criteria::default(),
                },
                ProbeGenerationSpec::CoverSequence {
                    definition: breakend,
                    metadata: sv,
                    criteria: Criteria::default(),
                },
            ],
        )
        .unwrap();

    assert_eq!(summary.probes, 1);
    assert_eq!(summary.candidate_targets, 4);
    assert_eq!(summary.covered_targets, 4);
    assert_eq!(summary.probes_by_type.get("STRUCTURAL_VARIANT"), Some(&1));
    // Breakend pieces are indexed as covered too
    assert!(panel.is_covered(&iv(5001, 5060)));
}

#[test]
fn test_position_requests_ignore_coverage() {
    let g = generator(PanelConfig::default());
    let mut panel = PanelData::new();
    panel
        .run_phase("genes", &g, vec![cover(iv(1000, 1400), TargetType::GeneExon, "EXON")])
        .unwrap();

    let summary = panel
        .run_phase(
            "amber",
            &g,
            vec![ProbeGenerationSpec::CoverPosition {
                position: GenomicPosition::new("chr1", 1300).unwrap(),
                metadata: TargetMetadata::new(TargetType::AmberSite, "het SNP"),
                criteria: Criteria::default(),
                strategy: SelectionStrategy::max_quality(),
            }],
        )
        .unwrap();
    assert_eq!(summary.probes, 1);
    assert_eq!(panel.phases().len(), 2);
}

#[test]
fn test_coverage_never_shrinks_across_phases() {
    let g = generator(PanelConfig::default());
    let mut panel = PanelData::new();
    let targets = [iv(500, 700), iv(2000, 2300), iv(650, 900), iv(6000, 6001)];

    let mut covered: Vec<GenomicInterval> = Vec::new();
    for (i, target) in targets.iter().enumerate() {
        panel
            .run_phase(
                &format!("phase {}", i),
                &g,
                vec![cover(target.clone(), TargetType::CustomRegion, "t")],
            )
            .unwrap();
        assert!(covered.iter().all(|c| panel.is_covered(c)));
        covered.extend(
            panel
                .result()
                .covered_targets
                .iter()
                .map(|t| t.region.clone()),
        );
    }
    assert!(covered.iter().all(|c| panel.is_covered(c)));
}

#[test]
fn test_config_file_drives_generation() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "probe_length = 100").unwrap();
    writeln!(file, "[tiling]").unwrap();
    writeln!(file, "shift_max = 5").unwrap();

    let config = PanelConfig::from_file(file.path()).unwrap();
    assert_eq!(config.tiling.max_overlap, 60);
    let g = generator(config);

    let mut panel = PanelData::new();
    panel
        .run_phase("genes", &g, vec![cover(iv(1000, 1299), TargetType::GeneExon, "EXON")])
        .unwrap();
    assert_eq!(starts(&panel, 0), vec![1000, 1100, 1200]);
    assert!(panel.result().probes.iter().all(|p| p.sequence().len() == 100));
}

#[test]
fn test_result_serializes_to_json() {
    let g = generator(PanelConfig::default());
    let mut panel = PanelData::new();
    let spec = ProbeGenerationSpec::CoverRegion {
        region: iv(1000, 1400),
        metadata: TargetMetadata::new(TargetType::GeneExon, "EXON")
            .with_extra(serde_json::json!({ "gene": "BRCA2", "exon": 11 })),
        criteria: Criteria::default(),
        strategy: SelectionStrategy::max_quality(),
    };
    panel.run_phase("genes", &g, vec![spec]).unwrap();

    let json = serde_json::to_value(panel.result()).unwrap();
    assert_eq!(json["probes"].as_array().map(Vec::len), Some(4));
    let metadata = &json["candidate_targets"][0]["metadata"];
    assert_eq!(metadata["target_type"], "GENE_EXON");
    assert_eq!(metadata["extra"]["gene"], "BRCA2");

    let phases = serde_json::to_value(panel.phases()).unwrap();
    assert_eq!(phases[0]["name"], "genes");
    assert_eq!(phases[0]["summary"]["probes"], 4);
}
