use assert_approx_eq::assert_approx_eq;
use itertools::Itertools;

use super::ingest::*;
use super::resolver::*;
use super::venn::*;
use crate::config::{
    DeTableLayout,
    ReconciliationLayout,
    SiteConfig,
};
use crate::data_structs::{
    AggregateStore,
    CellAggregate,
    Site,
    VennSegment,
};

const HEADER: [&str; 7] = [
    "canon_structure",
    "canon_cell_name",
    "alt_cell_name",
    "umich_sc",
    "ucsf_sc",
    "ucsd_sn",
    "guess",
];

fn reconciliation_rows() -> Vec<Vec<&'static str>> {
    vec![
        HEADER.to_vec(),
        vec!["Glomerulus", "Podocyte", "POD", "Podo", "Podocytes", "POD", ""],
        vec!["Tubule", "Proximal Tubule", "PT", "PT-1", "", "PT", "y"],
        vec!["Tubule", "Thick Ascending Limb", "TAL", "TAL", "TAL", "", ""],
        vec!["", "Orphan", "", "orphan", "", "", ""],
    ]
}

fn resolver() -> CellNameResolver {
    CellNameResolver::from_rows(reconciliation_rows(), &ReconciliationLayout::default())
}

fn sites() -> Vec<Site> {
    vec!["ucsd_sn".into(), "ucsf_sc".into(), "umich_sc".into()]
}

fn cell_with(sets: &[(&str, &[&str])]) -> CellAggregate {
    let mut cell = CellAggregate::new("Podocyte".into());
    for (site, genes) in sets {
        for gene in genes.iter() {
            cell.add_site_gene(&Site::from(*site), (*gene).into());
        }
    }
    cell
}

fn sizes(segments: &[VennSegment]) -> Vec<(String, usize)> {
    segments
        .iter()
        .map(|segment| (segment.site_combination().iter().join("+"), segment.size()))
        .collect_vec()
}

#[test]
fn test_resolver_skips_header_and_empty_structure() {
    let resolver = resolver();
    assert_eq!(resolver.len(), 3);
    assert!(resolver.resolve("canon_cell_name").is_none());
    assert!(resolver.resolve("umich_sc").is_none());
    assert!(resolver.resolve("orphan").is_none());
}

#[test]
fn test_resolver_maps_aliases_of_every_site() {
    let resolver = resolver();
    for alias in ["Podo", "Podocytes", "POD"] {
        assert_eq!(
            resolver.resolve(alias).unwrap().canonical_cell_name(),
            "Podocyte"
        );
    }
    let (site, row) = resolver.resolve_alias("PT").unwrap();
    assert_eq!(site.as_str(), "ucsd_sn");
    assert_eq!(row.canonical_cell_name(), "Proximal Tubule");
    assert_eq!(row.display_structure(), "Tubule");
    assert_eq!(row.alternate_label(), "PT");
    assert_eq!(row.guess(), "y");
}

#[test]
fn test_empty_alias_column_registers_nothing() {
    let resolver = resolver();
    let row = resolver
        .resolve("PT-1")
        .unwrap();
    assert_eq!(row.local_aliases().len(), 2);
    assert!(!row
        .local_aliases()
        .contains_key(&Site::from("ucsf_sc")));
    assert!(resolver.resolve("").is_none());
    // Podo, Podocytes, POD, PT-1, PT, TAL
    assert_eq!(resolver.alias_count(), 6);
}

#[test]
fn test_conflicting_alias_last_row_wins() {
    let mut rows = reconciliation_rows();
    rows.push(vec!["Interstitium", "Fibroblast", "FIB", "", "TAL", "", ""]);
    let resolver =
        CellNameResolver::from_rows(rows, &ReconciliationLayout::default());

    let (site, row) = resolver.resolve_alias("TAL").unwrap();
    assert_eq!(row.canonical_cell_name(), "Fibroblast");
    assert_eq!(site.as_str(), "ucsf_sc");
}

#[test]
fn test_directory_keeps_first_row_per_cell() {
    let mut rows = reconciliation_rows();
    rows.push(vec!["Other", "Podocyte", "POD2", "podo-2", "", "", ""]);
    let resolver =
        CellNameResolver::from_rows(rows, &ReconciliationLayout::default());

    let directory = resolver.directory();
    assert_eq!(directory.len(), 3);
    let entry = directory.get("Podocyte").unwrap();
    assert_eq!(entry.canonical_structure, "Glomerulus");
    assert_eq!(entry.alternate_label, "POD");
    assert_eq!(
        directory.keys().map(|k| k.as_str()).collect_vec(),
        vec!["Podocyte", "Proximal Tubule", "Thick Ascending Limb"]
    );
    assert_eq!(
        resolver.resolve("podo-2").unwrap().display_structure(),
        "Other"
    );
}

#[test]
fn test_reconciliation_header_is_case_sensitive() {
    let rows = vec![vec!["CANON_STRUCTURE", "Header Cell", "", "hdr", "", "", ""]];
    let resolver =
        CellNameResolver::from_rows(rows, &ReconciliationLayout::default());
    assert!(resolver.resolve("hdr").is_some());
}

#[test]
fn test_padded_reconciliation_header_is_data() {
    let rows = vec![
        HEADER.to_vec(),
        vec![" canon_structure", "Padded", "", "padded", "", "", ""],
    ];
    let resolver =
        CellNameResolver::from_rows(rows, &ReconciliationLayout::default());

    assert_eq!(resolver.len(), 1);
    let row = resolver.resolve("padded").unwrap();
    assert_eq!(row.canonical_cell_name(), "Padded");
    assert_eq!(row.display_structure(), "canon_structure");
}

#[test]
fn test_ingest_counts_every_skip_reason() {
    let resolver = resolver();
    let mut store = AggregateStore::new(sites());
    let site = SiteConfig::new("umich_sc");
    let rows = vec![
        vec!["Gene Symbol", "p_val_adj", "avg_logFC", "cluster"],
        vec!["NPHS1", "1e-30", "2.5", "Podo"],
        vec!["NPHS2", "NA", "2.1", "Podo"],
        vec!["NPHS2", "0.01", "", "Podo"],
        vec!["UMOD", "0.001", "1.2", "Unknown cells"],
        vec!["LRP2", "0.001"],
        vec!["", "0.1", "0.2", "Podo"],
        vec!["LRP2", "1e-5", "1.1", "PT-1"],
    ];

    let summary = RecordIngestor::new(&resolver, &mut store)
        .ingest(&site, rows)
        .unwrap();

    assert_eq!(summary.rows_read, 8);
    assert_eq!(summary.header_rows, 1);
    assert_eq!(summary.parse_failures, 2);
    assert_eq!(summary.unresolved_cells, 1);
    assert_eq!(summary.malformed_rows, 2);
    assert_eq!(summary.records_merged, 2);
    assert_eq!(summary.skipped(), 5);
    assert_eq!(store.len_records(), 2);
}

#[test]
fn test_unresolved_rows_leave_no_trace() {
    let resolver = resolver();
    let mut store = AggregateStore::new(sites());
    let rows = vec![vec!["UMOD", "0.001", "1.2", "Unknown cells"]];

    RecordIngestor::new(&resolver, &mut store)
        .ingest(&SiteConfig::new("ucsf_sc"), rows)
        .unwrap();

    assert!(store.is_empty());
    assert!(store.gene("UMOD").is_none());
    assert!(store.cell("Unknown cells").is_none());
    assert_eq!(store.all_cells().count(), 0);
}

#[test]
fn test_same_pair_from_several_sites_is_one_record() {
    let resolver = resolver();
    let mut store = AggregateStore::new(sites());
    {
        let mut ingestor = RecordIngestor::new(&resolver, &mut store);
        ingestor
            .ingest(
                &SiteConfig::new("umich_sc"),
                vec![vec!["NPHS1", "1e-30", "2.5", "Podo"]],
            )
            .unwrap();
        ingestor
            .ingest(
                &SiteConfig::new("ucsf_sc"),
                vec![vec!["NPHS1", "1e-12", "1.5", "Podocytes"]],
            )
            .unwrap();
    }

    assert_eq!(store.len_records(), 1);
    let record = store.record_for("NPHS1", "Podocyte").unwrap();
    assert_eq!(record.reporting_sites().len(), 2);
    assert_approx_eq!(
        record.stats(&"umich_sc".into()).unwrap().avg_log_fold_change,
        2.5
    );
    assert_approx_eq!(
        record.stats(&"ucsf_sc".into()).unwrap().adjusted_p_value,
        1e-12
    );
    assert!(record.stats(&"ucsd_sn".into()).is_none());

    let cell = store.cell("Podocyte").unwrap();
    assert_eq!(cell.sites_present().len(), 2);
}

#[test]
fn test_duplicate_row_last_value_wins() {
    let resolver = resolver();
    let mut store = AggregateStore::new(sites());
    let rows = vec![
        vec!["NPHS1", "0.05", "2.5", "Podo"],
        vec!["NPHS1", "0.001", "3.5", "Podo"],
    ];

    let summary = RecordIngestor::new(&resolver, &mut store)
        .ingest(&SiteConfig::new("umich_sc"), rows)
        .unwrap();

    assert_eq!(summary.stats_overwritten, 1);
    let stats = store
        .record_for("NPHS1", "Podocyte")
        .and_then(|record| record.stats(&"umich_sc".into()))
        .copied()
        .unwrap();
    assert_approx_eq!(stats.adjusted_p_value, 0.001);
    assert_approx_eq!(stats.avg_log_fold_change, 3.5);
    assert_eq!(
        store
            .cell("Podocyte")
            .unwrap()
            .genes_for_site(&"umich_sc".into())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_ingest_with_custom_layout_and_sentinel() {
    let resolver = resolver();
    let mut store = AggregateStore::new(sites());
    let site = SiteConfig::new("ucsd_sn")
        .with_header_sentinel("Cell Type".to_string())
        .with_layout(
            DeTableLayout::default()
                .with_cell_col(0)
                .with_gene_col(1)
                .with_pvalue_col(2)
                .with_logfc_col(3),
        );
    let rows = vec![
        vec!["cell type", "gene", "padj", "logfc"],
        vec!["PT", " LRP2 ", "1e-8", "-0.75"],
    ];

    let summary = RecordIngestor::new(&resolver, &mut store)
        .ingest(&site, rows)
        .unwrap();

    assert_eq!(summary.header_rows, 1);
    assert_eq!(summary.records_merged, 1);
    let stats = store
        .record_for("LRP2", "Proximal Tubule")
        .and_then(|record| record.stats(&"ucsd_sn".into()))
        .unwrap();
    assert_approx_eq!(stats.avg_log_fold_change, -0.75);
}

#[test]
fn test_ingest_unknown_site_is_an_error() {
    let resolver = resolver();
    let mut store = AggregateStore::new(sites());
    let rows: Vec<Vec<&str>> = vec![];
    assert!(RecordIngestor::new(&resolver, &mut store)
        .ingest(&SiteConfig::new("jhu_sn"), rows)
        .is_err());
}

#[test]
fn test_site_combination_order() {
    let combinations = site_combinations(&["C".into(), "A".into(), "B".into()]);
    let labels = combinations
        .iter()
        .map(|combination| combination.iter().join(""))
        .collect_vec();
    assert_eq!(labels, vec!["ABC", "AB", "AC", "BC", "A", "B", "C"]);
    assert!(site_combinations(&[]).is_empty());
}

#[test]
fn test_segment_reference_example() {
    let mut cell = cell_with(&[
        ("A", &["g1", "g2"]),
        ("B", &["g2", "g3"]),
        ("C", &["g3"]),
    ]);
    let segments = segment(&mut cell, &["A".into(), "B".into(), "C".into()]);

    assert_eq!(
        sizes(&segments),
        vec![
            ("A+B+C".to_string(), 0),
            ("A+B".to_string(), 1),
            ("A+C".to_string(), 0),
            ("B+C".to_string(), 1),
            ("A".to_string(), 1),
            ("B".to_string(), 0),
            ("C".to_string(), 0),
        ]
    );
    assert_eq!(segments[1].genes()[0].as_str(), "g2");
    assert_eq!(segments[3].genes()[0].as_str(), "g3");
    assert_eq!(segments[4].genes()[0].as_str(), "g1");
    assert_eq!(segments.iter().map(VennSegment::size).sum::<usize>(), 3);
}

#[test]
fn test_segment_gene_in_every_site_counted_once() {
    let mut cell = cell_with(&[
        ("A", &["shared", "a"]),
        ("B", &["shared", "ab"]),
        ("C", &["shared"]),
    ]);
    cell.add_site_gene(&"A".into(), "ab".into());
    let segments = segment(&mut cell, &["A".into(), "B".into(), "C".into()]);

    let by_label = sizes(&segments)
        .into_iter()
        .collect::<std::collections::HashMap<_, _>>();
    assert_eq!(by_label["A+B+C"], 1);
    assert_eq!(by_label["A+B"], 1);
    assert_eq!(by_label["A"], 1);
    assert_eq!(by_label["B"], 0);
    assert_eq!(by_label["C"], 0);
    assert!(cell.genes_for_site(&"C".into()).unwrap().is_empty());
}

#[test]
fn test_segment_single_site_cell() {
    let mut cell = cell_with(&[("B", &["g1", "g2"])]);
    let segments = segment(&mut cell, &["A".into(), "B".into(), "C".into()]);

    for segment in segments.iter() {
        let expected = if segment.site_combination() == [Site::from("B")] {
            2
        }
        else {
            0
        };
        assert_eq!(segment.size(), expected, "segment {}", segment);
    }
}

#[test]
fn test_segment_missing_site_does_not_mutate() {
    let mut cell = cell_with(&[("A", &["g1"]), ("B", &["g1"])]);
    let segments = segment(&mut cell, &["A".into(), "B".into(), "C".into()]);

    assert_eq!(segments[0].size(), 0);
    assert_eq!(segments[1].size(), 1);
    for segment in segments.iter() {
        if segment.site_combination().contains(&Site::from("C")) {
            assert_eq!(segment.size(), 0);
        }
    }
}

/// Segmenting twice is misuse: the first run consumed the shared genes, so
/// the second run reports them as exclusive to single sites and loses the
/// multi-site segments.
#[test]
fn test_segmenting_twice_gives_shrunken_results() {
    let universe: Vec<Site> = vec!["A".into(), "B".into(), "C".into()];
    let mut cell = cell_with(&[
        ("A", &["g1", "g2"]),
        ("B", &["g2", "g3"]),
        ("C", &["g3"]),
    ]);

    let first = segment_cell(&mut cell, &universe).to_vec();
    let second = segment_cell(&mut cell, &universe).to_vec();

    assert_ne!(first, second);
    assert_eq!(first.iter().map(VennSegment::size).sum::<usize>(), 3);
    assert_eq!(second.iter().map(VennSegment::size).sum::<usize>(), 1);
    assert!(second
        .iter()
        .filter(|segment| !segment.is_singleton())
        .all(|segment| segment.size() == 0));
    assert_eq!(cell.venn_segments(), second.as_slice());
}

#[test]
fn test_segment_all_covers_every_cell() {
    let resolver = resolver();
    let mut store = AggregateStore::new(sites());
    {
        let mut ingestor = RecordIngestor::new(&resolver, &mut store);
        ingestor
            .ingest(
                &SiteConfig::new("umich_sc"),
                vec![
                    vec!["NPHS1", "0.01", "1", "Podo"],
                    vec!["LRP2", "0.01", "1", "PT-1"],
                ],
            )
            .unwrap();
        ingestor
            .ingest(
                &SiteConfig::new("ucsd_sn"),
                vec![vec!["NPHS1", "0.01", "1", "POD"]],
            )
            .unwrap();
    }
    segment_all(&mut store);

    for cell in store.all_cells() {
        assert_eq!(cell.venn_segments().len(), 7);
    }
    let podocyte = store.cell("Podocyte").unwrap();
    let shared = podocyte
        .venn_segments()
        .iter()
        .find(|segment| segment.size() == 1)
        .unwrap();
    assert_eq!(shared.to_string(), "{ucsd_sn,umich_sc}");
}
