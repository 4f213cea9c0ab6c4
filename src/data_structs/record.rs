use hashbrown::HashMap;
use serde::{
    Deserialize,
    Serialize,
};

use super::site::Site;
use super::typedef::{
    CellName,
    GeneName,
    StatType,
};
use crate::utils::serialize_sorted_map;

/// Statistics one site reports for a (gene, cell) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    pub adjusted_p_value:    StatType,
    pub avg_log_fold_change: StatType,
}

impl SiteStats {
    pub fn new(
        adjusted_p_value: StatType,
        avg_log_fold_change: StatType,
    ) -> Self {
        Self {
            adjusted_p_value,
            avg_log_fold_change,
        }
    }
}

/// The merged record of one gene in one canonical cell type.
///
/// Holds a slot for every site of the run; a slot stays `None` until the
/// site reports the pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneCellRecord {
    gene:           GeneName,
    cell:           CellName,
    #[serde(serialize_with = "serialize_sorted_map")]
    per_site_stats: HashMap<Site, Option<SiteStats>>,
}

impl GeneCellRecord {
    pub fn new(
        gene: GeneName,
        cell: CellName,
        sites: &[Site],
    ) -> Self {
        Self {
            gene,
            cell,
            per_site_stats: sites
                .iter()
                .map(|site| (site.clone(), None))
                .collect(),
        }
    }

    pub fn gene(&self) -> &str { self.gene.as_str() }

    pub fn cell(&self) -> &str { self.cell.as_str() }

    pub fn gene_name(&self) -> &GeneName { &self.gene }

    pub fn cell_name(&self) -> &CellName { &self.cell }

    pub fn per_site_stats(&self) -> &HashMap<Site, Option<SiteStats>> {
        &self.per_site_stats
    }

    pub fn stats(
        &self,
        site: &Site,
    ) -> Option<&SiteStats> {
        self.per_site_stats
            .get(site)
            .and_then(Option::as_ref)
    }

    /// Stores the stats of `site`, returning the previously stored value.
    /// Later calls for the same site win.
    pub fn set_stats(
        &mut self,
        site: Site,
        stats: SiteStats,
    ) -> Option<SiteStats> {
        self.per_site_stats
            .insert(site, Some(stats))
            .flatten()
    }

    /// Sites that reported this pair, in site order.
    pub fn reporting_sites(&self) -> Vec<&Site> {
        let mut sites = self
            .per_site_stats
            .iter()
            .filter_map(|(site, stats)| stats.as_ref().map(|_| site))
            .collect::<Vec<_>>();
        sites.sort();
        sites
    }
}
