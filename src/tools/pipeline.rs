use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    bail,
    Context,
};
use hashbrown::HashMap;
use indexmap::IndexMap;
use log::{
    info,
    warn,
};
use serde::Serialize;

use super::ingest::{
    IngestSummary,
    RecordIngestor,
};
use super::resolver::{
    CellDirectoryEntry,
    CellNameResolver,
};
use super::venn::segment_all;
use crate::config::{
    PipelineConfig,
    SiteConfig,
};
use crate::data_structs::typedef::CellName;
use crate::data_structs::{
    AggregateStore,
    Site,
};
use crate::io::table::{
    read_rows,
    Row,
    Table,
};

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub store:     AggregateStore,
    pub resolver:  CellNameResolver,
    /// Ingestion counters per site, in ingestion order.
    pub summaries: IndexMap<Site, IngestSummary>,
}

impl PipelineOutput {
    pub fn report(&self) -> PipelineReport<'_> {
        PipelineReport {
            store:     &self.store,
            schematic: self.resolver.directory(),
            ingestion: &self.summaries,
        }
    }
}

/// Serializable view of a run: the aggregate store's `cells` and `genes`
/// next to the cell directory and the ingestion counters.
#[derive(Debug, Serialize)]
pub struct PipelineReport<'a> {
    #[serde(flatten)]
    store:     &'a AggregateStore,
    schematic: &'a IndexMap<CellName, CellDirectoryEntry>,
    ingestion: &'a IndexMap<Site, IngestSummary>,
}

/// Runs reconciliation, ingestion and segmentation in order.
///
/// Every run starts from an empty store. Sites are ingested one after the
/// other in configuration order and segmentation starts only after the last
/// site is done.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig { &self.config }

    /// Runs on tables already split into rows.
    ///
    /// A configured site without a table is ingested as empty.
    pub fn run_rows<I>(
        &self,
        reconciliation: &[Row],
        site_tables: I,
    ) -> anyhow::Result<PipelineOutput>
    where
        I: IntoIterator<Item = (Site, Table)>, {
        let mut tables: HashMap<Site, Table> = HashMap::new();
        for (site, table) in site_tables {
            if self.config.site(&site).is_none() {
                bail!("Site {} is not configured", site)
            }
            if tables.insert(site.clone(), table).is_some() {
                bail!("Site {} was supplied more than once", site)
            }
        }

        self.run_with(reconciliation, |site| {
            Ok(tables.remove(&site.site).unwrap_or_else(|| {
                warn!("No table supplied for site {}", site.site);
                Vec::new()
            }))
        })
    }

    /// Reads the configured tables and runs. Relative paths are resolved
    /// against `base_dir` when given.
    pub fn run_files(
        &self,
        base_dir: Option<&Path>,
    ) -> anyhow::Result<PipelineOutput> {
        let delimiter = self.config.delimiter_byte()?;
        let resolve_path = |path: &Path| -> PathBuf {
            match base_dir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path.to_path_buf(),
            }
        };

        let reconciliation_path = self
            .config
            .reconciliation
            .path
            .as_deref()
            .context("No reconciliation table path configured")?;
        let reconciliation = read_rows(resolve_path(reconciliation_path), delimiter)?;

        self.run_with(&reconciliation, |site| {
            let path = site
                .path
                .as_deref()
                .with_context(|| format!("No table path configured for site {}", site.site))?;
            read_rows(resolve_path(path), delimiter)
        })
    }

    fn run_with<F>(
        &self,
        reconciliation: &[Row],
        mut load_site: F,
    ) -> anyhow::Result<PipelineOutput>
    where
        F: FnMut(&SiteConfig) -> anyhow::Result<Table>, {
        let resolver =
            CellNameResolver::from_rows(reconciliation, &self.config.reconciliation);
        let mut store = AggregateStore::new(self.config.site_ids());
        let mut summaries = IndexMap::new();

        {
            let mut ingestor = RecordIngestor::new(&resolver, &mut store);
            for site in self.config.sites.iter() {
                let rows = load_site(site)?;
                let summary = ingestor.ingest(site, &rows)?;
                summaries.insert(site.site.clone(), summary);
            }
        }

        segment_all(&mut store);
        info!(
            "Pipeline finished: {} cells, {} genes, {} records",
            store.len_cells(),
            store.len_genes(),
            store.len_records()
        );

        Ok(PipelineOutput {
            store,
            resolver,
            summaries,
        })
    }
}
