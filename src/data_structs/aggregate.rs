use std::fmt::Display;

use hashbrown::{
    HashMap,
    HashSet,
};
use itertools::Itertools;
use serde::Serialize;

use super::site::Site;
use super::store::RecordKey;
use super::typedef::{
    CellName,
    GeneName,
};
use crate::getter_fn;

/// Number of genes reported by exactly one combination of sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VennSegment {
    site_combination: Vec<Site>,
    size:             usize,
    #[serde(skip)]
    genes:            Vec<GeneName>,
}

impl VennSegment {
    /// Creates a segment from its member genes. Genes are stored sorted.
    pub fn new(
        site_combination: Vec<Site>,
        genes: Vec<GeneName>,
    ) -> Self {
        let genes = genes.into_iter().sorted().collect_vec();
        Self {
            site_combination,
            size: genes.len(),
            genes,
        }
    }

    /// A segment with no genes.
    pub fn empty(site_combination: Vec<Site>) -> Self {
        Self::new(site_combination, Vec::new())
    }

    pub fn site_combination(&self) -> &[Site] { &self.site_combination }

    pub fn size(&self) -> usize { self.size }

    /// Genes attributed to this segment, sorted.
    pub fn genes(&self) -> &[GeneName] { &self.genes }

    pub fn is_singleton(&self) -> bool { self.site_combination.len() == 1 }
}

impl Display for VennSegment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{{{}}}", self.site_combination.iter().join(","))
    }
}

/// Everything known about one canonical cell type.
#[derive(Debug, Clone)]
pub struct CellAggregate {
    cell_name:     CellName,
    records:       HashMap<GeneName, RecordKey>,
    site_to_genes: HashMap<Site, HashSet<GeneName>>,
    venn_segments: Vec<VennSegment>,
}

impl CellAggregate {
    pub fn new(cell_name: CellName) -> Self {
        Self {
            cell_name,
            records: HashMap::new(),
            site_to_genes: HashMap::new(),
            venn_segments: Vec::new(),
        }
    }

    pub fn cell_name(&self) -> &str { self.cell_name.as_str() }

    getter_fn!(records, HashMap<GeneName, RecordKey>);

    pub fn record_key(
        &self,
        gene: &str,
    ) -> Option<RecordKey> {
        self.records.get(gene).copied()
    }

    getter_fn!(site_to_genes, HashMap<Site, HashSet<GeneName>>);

    /// Gene set of `site`, `None` if the site never reported this cell.
    pub fn genes_for_site(
        &self,
        site: &Site,
    ) -> Option<&HashSet<GeneName>> {
        self.site_to_genes.get(site)
    }

    /// Sites that reported at least one gene for this cell, in site order.
    pub fn sites_present(&self) -> Vec<&Site> {
        self.site_to_genes
            .keys()
            .sorted()
            .collect_vec()
    }

    /// Union of all per-site gene sets in their current state.
    pub fn union_genes(&self) -> HashSet<GeneName> {
        self.site_to_genes
            .values()
            .flatten()
            .cloned()
            .collect()
    }

    /// Adds `gene` to the gene set of `site`. Returns `false` if it was
    /// already there.
    pub fn add_site_gene(
        &mut self,
        site: &Site,
        gene: GeneName,
    ) -> bool {
        self.site_to_genes
            .entry(site.clone())
            .or_default()
            .insert(gene)
    }

    pub fn venn_segments(&self) -> &[VennSegment] { &self.venn_segments }

    pub fn is_segmented(&self) -> bool { !self.venn_segments.is_empty() }

    pub(crate) fn link_record(
        &mut self,
        gene: GeneName,
        key: RecordKey,
    ) {
        self.records.insert(gene, key);
    }

    pub(crate) fn site_to_genes_mut(
        &mut self,
    ) -> &mut HashMap<Site, HashSet<GeneName>> {
        &mut self.site_to_genes
    }

    pub(crate) fn set_venn_segments(
        &mut self,
        segments: Vec<VennSegment>,
    ) {
        self.venn_segments = segments;
    }
}

/// Index of one gene over the cell types it was reported for.
#[derive(Debug, Clone)]
pub struct GeneAggregate {
    gene_name: GeneName,
    by_cell:   HashMap<CellName, RecordKey>,
}

impl GeneAggregate {
    pub fn new(gene_name: GeneName) -> Self {
        Self {
            gene_name,
            by_cell: HashMap::new(),
        }
    }

    pub fn gene_name(&self) -> &str { self.gene_name.as_str() }

    getter_fn!(by_cell, HashMap<CellName, RecordKey>);

    pub fn record_key(
        &self,
        cell: &str,
    ) -> Option<RecordKey> {
        self.by_cell.get(cell).copied()
    }

    pub(crate) fn link_record(
        &mut self,
        cell: CellName,
        key: RecordKey,
    ) {
        self.by_cell.insert(cell, key);
    }
}
