use std::collections::BTreeMap;

use hashbrown::{
    HashMap,
    HashSet,
};
use itertools::Itertools;
use serde::{
    Serialize,
    Serializer,
};
use slotmap::{
    new_key_type,
    SlotMap,
};

use super::aggregate::{
    CellAggregate,
    GeneAggregate,
    VennSegment,
};
use super::record::GeneCellRecord;
use super::site::Site;
use super::typedef::{
    CellName,
    GeneName,
};
use crate::utils::serialize_sorted_set;

new_key_type! {
    /// Handle of a [`GeneCellRecord`] owned by an [`AggregateStore`].
    pub struct RecordKey;
}

/// In-memory aggregate of one pipeline run.
///
/// Records live in a single arena. Cells and genes index the same records
/// by key, so an update made through one index is seen through the other.
#[derive(Debug, Clone)]
pub struct AggregateStore {
    sites:   Vec<Site>,
    records: SlotMap<RecordKey, GeneCellRecord>,
    cells:   HashMap<CellName, CellAggregate>,
    genes:   HashMap<GeneName, GeneAggregate>,
}

impl AggregateStore {
    /// Creates an empty store for the given site universe.
    pub fn new<I: IntoIterator<Item = Site>>(sites: I) -> Self {
        Self {
            sites:   sites.into_iter().sorted().dedup().collect_vec(),
            records: SlotMap::with_key(),
            cells:   HashMap::new(),
            genes:   HashMap::new(),
        }
    }

    /// Site universe of the run, in site order.
    pub fn sites(&self) -> &[Site] { &self.sites }

    pub fn contains_site(
        &self,
        site: &Site,
    ) -> bool {
        self.sites.binary_search(site).is_ok()
    }

    pub fn get_or_create_cell(
        &mut self,
        name: &str,
    ) -> &mut CellAggregate {
        self.cells
            .entry_ref(name)
            .or_insert_with(|| CellAggregate::new(CellName::from(name)))
    }

    pub fn get_or_create_gene(
        &mut self,
        name: &str,
    ) -> &mut GeneAggregate {
        self.genes
            .entry_ref(name)
            .or_insert_with(|| GeneAggregate::new(GeneName::from(name)))
    }

    pub fn cell(
        &self,
        name: &str,
    ) -> Option<&CellAggregate> {
        self.cells.get(name)
    }

    pub fn cell_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut CellAggregate> {
        self.cells.get_mut(name)
    }

    pub fn gene(
        &self,
        name: &str,
    ) -> Option<&GeneAggregate> {
        self.genes.get(name)
    }

    /// Cells sorted by name.
    pub fn all_cells(&self) -> impl Iterator<Item = &CellAggregate> {
        self.cells
            .iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, cell)| cell)
    }

    /// Genes sorted by name.
    pub fn all_genes(&self) -> impl Iterator<Item = &GeneAggregate> {
        self.genes
            .iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, gene)| gene)
    }

    pub fn cell_names(&self) -> Vec<CellName> {
        self.cells.keys().cloned().sorted().collect_vec()
    }

    pub fn record(
        &self,
        key: RecordKey,
    ) -> Option<&GeneCellRecord> {
        self.records.get(key)
    }

    pub fn record_mut(
        &mut self,
        key: RecordKey,
    ) -> Option<&mut GeneCellRecord> {
        self.records.get_mut(key)
    }

    pub fn record_for(
        &self,
        gene: &str,
        cell: &str,
    ) -> Option<&GeneCellRecord> {
        self.cell(cell)
            .and_then(|aggregate| aggregate.record_key(gene))
            .and_then(|key| self.record(key))
    }

    /// Returns the key of the record for (`gene`, `cell`), creating the
    /// record and linking it into both indices if it does not exist.
    pub fn upsert_record(
        &mut self,
        gene: &str,
        cell: &str,
    ) -> RecordKey {
        if let Some(key) = self
            .cell(cell)
            .and_then(|aggregate| aggregate.record_key(gene))
        {
            return key;
        }

        let record =
            GeneCellRecord::new(GeneName::from(gene), CellName::from(cell), &self.sites);
        let gene_name = record.gene_name().clone();
        let cell_name = record.cell_name().clone();
        let key = self.records.insert(record);

        self.get_or_create_cell(cell)
            .link_record(gene_name, key);
        self.get_or_create_gene(gene)
            .link_record(cell_name, key);
        key
    }

    pub fn len_records(&self) -> usize { self.records.len() }

    pub fn len_cells(&self) -> usize { self.cells.len() }

    pub fn len_genes(&self) -> usize { self.genes.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

struct SortedGenes<'a>(&'a HashSet<GeneName>);

impl Serialize for SortedGenes<'_> {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer, {
        serialize_sorted_set(self.0, serializer)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CellView<'a> {
    cell_name:     &'a str,
    records:       BTreeMap<&'a str, &'a GeneCellRecord>,
    site_to_genes: BTreeMap<&'a Site, SortedGenes<'a>>,
    venn_segments: &'a [VennSegment],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneView<'a> {
    gene_name: &'a str,
    by_cell:   BTreeMap<&'a str, &'a GeneCellRecord>,
}

#[derive(Serialize)]
struct StoreView<'a> {
    cells: BTreeMap<&'a str, CellView<'a>>,
    genes: BTreeMap<&'a str, GeneView<'a>>,
}

impl<'a> StoreView<'a> {
    fn new(store: &'a AggregateStore) -> Self {
        let cells = store
            .cells
            .iter()
            .map(|(name, cell)| {
                let view = CellView {
                    cell_name:     cell.cell_name(),
                    records:       cell
                        .records()
                        .iter()
                        .filter_map(|(gene, key)| {
                            store.records.get(*key).map(|r| (gene.as_str(), r))
                        })
                        .collect(),
                    site_to_genes: cell
                        .site_to_genes()
                        .iter()
                        .map(|(site, genes)| (site, SortedGenes(genes)))
                        .collect(),
                    venn_segments: cell.venn_segments(),
                };
                (name.as_str(), view)
            })
            .collect();
        let genes = store
            .genes
            .iter()
            .map(|(name, gene)| {
                let view = GeneView {
                    gene_name: gene.gene_name(),
                    by_cell:   gene
                        .by_cell()
                        .iter()
                        .filter_map(|(cell, key)| {
                            store.records.get(*key).map(|r| (cell.as_str(), r))
                        })
                        .collect(),
                };
                (name.as_str(), view)
            })
            .collect();
        Self { cells, genes }
    }
}

/// Serializes as `{cells: {..}, genes: {..}}` with records written inline
/// under both indices and every map in sorted key order.
impl Serialize for AggregateStore {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer, {
        StoreView::new(self).serialize(serializer)
    }
}
