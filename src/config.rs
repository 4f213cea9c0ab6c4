//! Configuration of a pipeline run.
//!
//! A [`PipelineConfig`] names the site universe, where each table lives and
//! how its columns are laid out. It deserializes from JSON; every field except
//! a site's name may be omitted and falls back to the defaults below.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    bail,
    Context,
};
use hashbrown::HashSet;
use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::Site;
use crate::with_field_fn;

/// First field of the reconciliation table header row (case-sensitive).
pub const RECONCILIATION_HEADER: &str = "canon_structure";
/// First field of a differential expression table header row
/// (case-insensitive).
pub const DE_TABLE_HEADER: &str = "gene symbol";

pub const UMICH_SC: &str = "umich_sc";
pub const UCSF_SC: &str = "ucsf_sc";
pub const UCSD_SN: &str = "ucsd_sn";

/// Column positions of a differential expression table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeTableLayout {
    pub gene_col:   usize,
    pub pvalue_col: usize,
    pub logfc_col:  usize,
    pub cell_col:   usize,
}

impl DeTableLayout {
    with_field_fn!(gene_col, usize);
    with_field_fn!(pvalue_col, usize);
    with_field_fn!(logfc_col, usize);
    with_field_fn!(cell_col, usize);

    /// Number of fields a row needs to reach every column.
    pub fn min_width(&self) -> usize {
        [self.gene_col, self.pvalue_col, self.logfc_col, self.cell_col]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl Default for DeTableLayout {
    fn default() -> Self {
        Self {
            gene_col:   0,
            pvalue_col: 1,
            logfc_col:  2,
            cell_col:   3,
        }
    }
}

fn default_de_header() -> String { DE_TABLE_HEADER.to_string() }

/// One contributing site and its differential expression table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site:            Site,
    #[serde(default)]
    pub path:            Option<PathBuf>,
    #[serde(default = "default_de_header")]
    pub header_sentinel: String,
    #[serde(default)]
    pub layout:          DeTableLayout,
}

impl SiteConfig {
    with_field_fn!(path, Option<PathBuf>);
    with_field_fn!(header_sentinel, String);
    with_field_fn!(layout, DeTableLayout);

    pub fn new<S: Into<Site>>(site: S) -> Self {
        Self {
            site:            site.into(),
            path:            None,
            header_sentinel: default_de_header(),
            layout:          DeTableLayout::default(),
        }
    }
}

/// Column positions of the cell type reconciliation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationLayout {
    pub path:            Option<PathBuf>,
    /// Compared exactly against the untrimmed structure field.
    pub header_sentinel: String,
    pub structure_col:   usize,
    pub cell_col:        usize,
    pub alternate_col:   usize,
    pub guess_col:       usize,
    /// Column holding each site's local name for the canonical cell.
    pub site_cols:       BTreeMap<Site, usize>,
}

impl ReconciliationLayout {
    with_field_fn!(path, Option<PathBuf>);
    with_field_fn!(header_sentinel, String);
    with_field_fn!(site_cols, BTreeMap<Site, usize>);

    /// Site columns in column order.
    pub fn site_cols_ordered(&self) -> Vec<(&Site, usize)> {
        self.site_cols
            .iter()
            .map(|(site, col)| (site, *col))
            .sorted_by_key(|(_, col)| *col)
            .collect_vec()
    }
}

impl Default for ReconciliationLayout {
    fn default() -> Self {
        Self {
            path:            Some(PathBuf::from("schematic_map.csv")),
            header_sentinel: RECONCILIATION_HEADER.to_string(),
            structure_col:   0,
            cell_col:        1,
            alternate_col:   2,
            guess_col:       6,
            site_cols:       BTreeMap::from_iter([
                (Site::from(UMICH_SC), 3),
                (Site::from(UCSF_SC), 4),
                (Site::from(UCSD_SN), 5),
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub delimiter:      char,
    pub reconciliation: ReconciliationLayout,
    /// Sites in ingestion order.
    pub sites:          Vec<SiteConfig>,
}

impl PipelineConfig {
    with_field_fn!(delimiter, char);
    with_field_fn!(reconciliation, ReconciliationLayout);
    with_field_fn!(sites, Vec<SiteConfig>);

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("could not open config {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("could not parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// The site universe of the run.
    pub fn site_ids(&self) -> Vec<Site> {
        self.sites
            .iter()
            .map(|s| s.site.clone())
            .collect_vec()
    }

    pub fn site(
        &self,
        site: &Site,
    ) -> Option<&SiteConfig> {
        self.sites.iter().find(|s| &s.site == site)
    }

    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("Delimiter {:?} is not an ASCII character", self.delimiter)
        }
        Ok(self.delimiter as u8)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.delimiter_byte()?;
        if self.sites.is_empty() {
            bail!("No sites configured")
        }

        let mut seen = HashSet::new();
        for site in self.sites.iter() {
            if !seen.insert(&site.site) {
                bail!("Site {} is configured more than once", site.site)
            }
            if site.header_sentinel.trim().is_empty() {
                bail!("Site {} has an empty header sentinel", site.site)
            }
            if !self
                .reconciliation
                .site_cols
                .contains_key(&site.site)
            {
                bail!(
                    "Site {} has no column in the reconciliation table",
                    site.site
                )
            }
        }

        let layout = &self.reconciliation;
        let reserved = [
            layout.structure_col,
            layout.cell_col,
            layout.alternate_col,
            layout.guess_col,
        ];
        for (site, col) in layout.site_cols.iter() {
            if reserved.contains(col) {
                bail!(
                    "Reconciliation column {} of site {} collides with a \
                     canonical column",
                    col,
                    site
                )
            }
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter:      ',',
            reconciliation: ReconciliationLayout::default(),
            sites:          vec![
                SiteConfig::new(UMICH_SC)
                    .with_path(Some(PathBuf::from("umich_sc_v1-0.csv"))),
                SiteConfig::new(UCSF_SC)
                    .with_path(Some(PathBuf::from("ucsf_sc_v1-0.csv"))),
                SiteConfig::new(UCSD_SN)
                    .with_path(Some(PathBuf::from("ucsd_sn_v1-0.csv"))),
            ],
        }
    }
}
