#![allow(dead_code)]

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::io::Write;
use std::path::Path;

use microscopium::prelude::*;
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use rstest::fixture;

/// Routes library logs to stderr; filter with `RUST_LOG`.
#[fixture]
pub fn init_logger() {
    let _ = pretty_env_logger::formatted_builder()
        .parse_default_env()
        .is_test(true)
        .try_init();
}

pub const SITES: [&str; 3] = ["umich_sc", "ucsf_sc", "ucsd_sn"];

/// Expected per-site gene sets of every canonical cell.
pub type Truth = BTreeMap<String, BTreeMap<Site, BTreeSet<String>>>;

/// Randomly generated reconciliation and site tables with the gene sets
/// they should produce.
pub struct DemoDataset {
    pub reconciliation: Table,
    pub site_tables:    Vec<(Site, Table)>,
    pub truth:          Truth,
}

impl DemoDataset {
    pub fn write_to(
        &self,
        dir: &Path,
    ) -> anyhow::Result<PipelineConfig> {
        write_table(&dir.join("schematic_map.csv"), &self.reconciliation)?;
        for (site, table) in self.site_tables.iter() {
            write_table(&dir.join(format!("{}_v1-0.csv", site)), table)?;
        }
        Ok(PipelineConfig::default())
    }
}

pub fn write_table(
    path: &Path,
    table: &Table,
) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)?;
    for row in table.iter() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub struct DemoDatasetBuilder {
    n_cells:      usize,
    n_genes:      usize,
    report_prob:  f64,
    missing_prob: f64,
    seed:         u64,
}

impl DemoDatasetBuilder {
    pub fn new(
        n_cells: usize,
        n_genes: usize,
        report_prob: f64,
        seed: u64,
    ) -> Self {
        Self {
            n_cells,
            n_genes,
            report_prob,
            missing_prob: 0.2,
            seed,
        }
    }

    pub fn with_missing_prob(
        mut self,
        missing_prob: f64,
    ) -> Self {
        self.missing_prob = missing_prob;
        self
    }

    pub fn build(&self) -> DemoDataset {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut reconciliation = vec![row(&[
            "canon_structure",
            "canon_cell_name",
            "alt_cell_name",
            "umich_sc",
            "ucsf_sc",
            "ucsd_sn",
            "guess",
        ])];
        // alias of every (cell, site) pair that has one
        let mut aliases: BTreeMap<(usize, usize), String> = BTreeMap::new();

        for cell in 0..self.n_cells {
            let mut fields = vec![
                format!("Structure {}", cell % 3),
                format!("Cell {}", cell),
                format!("C{}", cell),
            ];
            for site in 0..SITES.len() {
                if rng.gen_bool(self.missing_prob) {
                    fields.push(String::new());
                }
                else {
                    let alias = format!("{}-cluster-{}", SITES[site], cell);
                    aliases.insert((cell, site), alias.clone());
                    fields.push(alias);
                }
            }
            fields.push(String::new());
            reconciliation.push(fields);
        }

        let mut truth = Truth::new();
        let mut site_tables = Vec::new();
        for (site_idx, site_name) in SITES.iter().enumerate() {
            let site = Site::from(*site_name);
            let mut table = vec![row(&["Gene Symbol", "p_val_adj", "avg_logFC", "cluster"])];

            for cell in 0..self.n_cells {
                let Some(alias) = aliases.get(&(cell, site_idx))
                else {
                    continue;
                };
                for gene in 0..self.n_genes {
                    if !rng.gen_bool(self.report_prob) {
                        continue;
                    }
                    let gene_name = format!("GENE{}", gene);
                    let pvalue: f64 = rng.gen_range(0.0..0.05);
                    let logfc: f64 = rng.gen_range(-3.0..3.0);
                    table.push(vec![
                        gene_name.clone(),
                        pvalue.to_string(),
                        logfc.to_string(),
                        alias.clone(),
                    ]);
                    if rng.gen_bool(0.1) {
                        table.push(vec![
                            gene_name.clone(),
                            pvalue.to_string(),
                            logfc.to_string(),
                            alias.clone(),
                        ]);
                    }
                    truth
                        .entry(format!("Cell {}", cell))
                        .or_default()
                        .entry(site.clone())
                        .or_default()
                        .insert(gene_name);
                }
            }
            table.push(row(&["GENE0", "0.01", "1.0", "unmapped cluster"]));
            table.push(row(&["GENE1", "not a number", "1.0", "unmapped cluster"]));
            site_tables.push((site, table));
        }

        DemoDataset {
            reconciliation,
            site_tables,
            truth,
        }
    }
}

pub fn row(fields: &[&str]) -> Row {
    fields
        .iter()
        .map(|field| field.to_string())
        .collect()
}

pub fn write_lines<W: Write>(
    writer: &mut W,
    lines: &[&str],
) -> anyhow::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}
