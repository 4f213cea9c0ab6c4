use std::fmt::Display;

use anyhow::bail;
use log::{
    debug,
    info,
};
use serde::Serialize;

use super::resolver::CellNameResolver;
use crate::config::SiteConfig;
use crate::data_structs::typedef::{
    GeneName,
    StatType,
};
use crate::data_structs::{
    AggregateStore,
    Site,
    SiteStats,
};
use crate::utils::{
    is_header_field,
    row_field,
};

/// Why a differential expression row was not ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The row is the table header.
    HeaderRow,
    /// The row lacks a column or the gene field is empty.
    MalformedRow,
    /// The local cell name has no canonical mapping.
    UnresolvableCellName,
    /// A statistic is not a number.
    NumericParseFailure,
}

impl Display for SkipReason {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            SkipReason::HeaderRow => write!(f, "header row"),
            SkipReason::MalformedRow => write!(f, "malformed row"),
            SkipReason::UnresolvableCellName => write!(f, "unresolvable cell name"),
            SkipReason::NumericParseFailure => write!(f, "numeric parse failure"),
        }
    }
}

/// Row counters of one site's ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub rows_read:         usize,
    pub header_rows:       usize,
    pub malformed_rows:    usize,
    pub unresolved_cells:  usize,
    pub parse_failures:    usize,
    pub records_merged:    usize,
    /// Rows that replaced stats the same site already reported.
    pub stats_overwritten: usize,
}

impl IngestSummary {
    fn count_skip(
        &mut self,
        reason: SkipReason,
    ) {
        match reason {
            SkipReason::HeaderRow => self.header_rows += 1,
            SkipReason::MalformedRow => self.malformed_rows += 1,
            SkipReason::UnresolvableCellName => self.unresolved_cells += 1,
            SkipReason::NumericParseFailure => self.parse_failures += 1,
        }
    }

    /// Data rows that were dropped (header rows excluded).
    pub fn skipped(&self) -> usize {
        self.malformed_rows + self.unresolved_cells + self.parse_failures
    }
}

impl Display for IngestSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{} rows read, {} merged ({} overwritten), {} header, {} malformed, \
             {} unresolved cell names, {} parse failures",
            self.rows_read,
            self.records_merged,
            self.stats_overwritten,
            self.header_rows,
            self.malformed_rows,
            self.unresolved_cells,
            self.parse_failures
        )
    }
}

/// Merges site differential expression rows into an [`AggregateStore`].
pub struct RecordIngestor<'a> {
    resolver: &'a CellNameResolver,
    store:    &'a mut AggregateStore,
}

impl<'a> RecordIngestor<'a> {
    pub fn new(
        resolver: &'a CellNameResolver,
        store: &'a mut AggregateStore,
    ) -> Self {
        Self { resolver, store }
    }

    /// Ingests every row of one site's table.
    ///
    /// Row-level problems never abort ingestion; they are counted in the
    /// returned summary. The only error is a site outside the store's
    /// universe.
    pub fn ingest<I, R, S>(
        &mut self,
        site: &SiteConfig,
        rows: I,
    ) -> anyhow::Result<IngestSummary>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>, {
        if !self.store.contains_site(&site.site) {
            bail!("Site {} is not part of this run", site.site)
        }

        let mut summary = IngestSummary::default();
        for (line, row) in rows.into_iter().enumerate() {
            summary.rows_read += 1;
            match self.ingest_row(site, row.as_ref()) {
                Ok(overwritten) => {
                    summary.records_merged += 1;
                    if overwritten {
                        summary.stats_overwritten += 1;
                    }
                },
                Err(reason) => {
                    if reason != SkipReason::HeaderRow {
                        debug!("{} line {}: skipped, {}", site.site, line + 1, reason);
                    }
                    summary.count_skip(reason);
                },
            }
        }

        info!("Ingested {}: {}", site.site, summary);
        Ok(summary)
    }

    /// Merges one row. Returns whether it replaced stats this site had
    /// already reported for the same gene and cell.
    fn ingest_row<S: AsRef<str>>(
        &mut self,
        site: &SiteConfig,
        row: &[S],
    ) -> Result<bool, SkipReason> {
        if is_header_field(row_field(row, 0), &site.header_sentinel) {
            return Err(SkipReason::HeaderRow);
        }

        let layout = &site.layout;
        if row.len() < layout.min_width() {
            return Err(SkipReason::MalformedRow);
        }
        let gene = row_field(row, layout.gene_col);
        if gene.is_empty() {
            return Err(SkipReason::MalformedRow);
        }

        let resolver = self.resolver;
        let canonical = resolver
            .resolve(row_field(row, layout.cell_col))
            .ok_or(SkipReason::UnresolvableCellName)?;
        let stats = SiteStats::new(
            parse_stat(row_field(row, layout.pvalue_col))?,
            parse_stat(row_field(row, layout.logfc_col))?,
        );

        Ok(self.merge(
            &site.site,
            gene,
            canonical.canonical_cell_name(),
            stats,
        ))
    }

    fn merge(
        &mut self,
        site: &Site,
        gene: &str,
        cell: &str,
        stats: SiteStats,
    ) -> bool {
        let key = self.store.upsert_record(gene, cell);
        let overwritten = self
            .store
            .record_mut(key)
            .and_then(|record| record.set_stats(site.clone(), stats))
            .is_some();
        self.store
            .get_or_create_cell(cell)
            .add_site_gene(site, GeneName::from(gene));
        overwritten
    }
}

fn parse_stat(value: &str) -> Result<StatType, SkipReason> {
    value
        .parse::<StatType>()
        .map_err(|_| SkipReason::NumericParseFailure)
}
