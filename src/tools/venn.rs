//! Venn segmentation of per-site gene sets.
//!
//! Site combinations are visited from the largest to the smallest. Every
//! gene shared by all members of a multi-site combination is counted for
//! that combination and then removed from the members' gene sets, so a
//! smaller combination only counts genes no larger combination claimed.
//! The resulting segments partition the union of the original sets.
//!
//! Segmentation consumes the per-site gene sets of a cell. Running it a
//! second time on the same cell yields smaller, wrong sizes.

use hashbrown::{
    HashMap,
    HashSet,
};
use itertools::Itertools;
use log::{
    info,
    warn,
};

use crate::data_structs::typedef::GeneName;
use crate::data_structs::{
    AggregateStore,
    CellAggregate,
    Site,
    VennSegment,
};

/// Every non-empty combination of `sites`, largest first.
///
/// Members of a combination are in site order and combinations of equal
/// size are in lexicographic order of their members: for sites `A < B < C`
/// the order is `ABC, AB, AC, BC, A, B, C`.
pub fn site_combinations(sites: &[Site]) -> Vec<Vec<Site>> {
    let sites = sites
        .iter()
        .cloned()
        .sorted()
        .dedup()
        .collect_vec();
    (1..=sites.len())
        .rev()
        .flat_map(|size| {
            sites
                .iter()
                .cloned()
                .combinations(size)
        })
        .collect_vec()
}

/// Computes the Venn segments of `cell` over the site universe `sites`,
/// removing counted genes from the cell's per-site gene sets.
///
/// A combination with a member that never reported this cell has size 0 and
/// leaves the gene sets untouched.
pub fn segment(
    cell: &mut CellAggregate,
    sites: &[Site],
) -> Vec<VennSegment> {
    let site_to_genes = cell.site_to_genes_mut();
    site_combinations(sites)
        .into_iter()
        .map(|combination| {
            if combination
                .iter()
                .any(|site| !site_to_genes.contains_key(site))
            {
                return VennSegment::empty(combination);
            }
            let genes = match combination.as_slice() {
                [site] => {
                    site_to_genes
                        .get(site)
                        .map(|genes| genes.iter().cloned().collect_vec())
                        .unwrap_or_default()
                },
                members => take_shared_genes(site_to_genes, members),
            };
            VennSegment::new(combination, genes)
        })
        .collect_vec()
}

/// Removes the genes present in the sets of all `members` from each of
/// those sets and returns them.
fn take_shared_genes(
    site_to_genes: &mut HashMap<Site, HashSet<GeneName>>,
    members: &[Site],
) -> Vec<GeneName> {
    let Some((first, rest)) = members.split_first()
    else {
        return Vec::new();
    };
    let shared = site_to_genes
        .get(first)
        .map(|genes| {
            genes
                .iter()
                .filter(|gene| {
                    rest.iter().all(|site| {
                        site_to_genes
                            .get(site)
                            .is_some_and(|other| other.contains(*gene))
                    })
                })
                .cloned()
                .collect::<HashSet<_>>()
        })
        .unwrap_or_default();

    if !shared.is_empty() {
        for site in members {
            if let Some(genes) = site_to_genes.get_mut(site) {
                genes.retain(|gene| !shared.contains(gene));
            }
        }
    }
    shared.into_iter().collect_vec()
}

/// Segments `cell` and stores the result in its `venn_segments`.
pub fn segment_cell<'c>(
    cell: &'c mut CellAggregate,
    sites: &[Site],
) -> &'c [VennSegment] {
    if cell.is_segmented() {
        warn!(
            "Cell {:?} is segmented again, its gene sets were already consumed",
            cell.cell_name()
        );
    }
    let segments = segment(cell, sites);
    cell.set_venn_segments(segments);
    cell.venn_segments()
}

/// Segments every cell of `store` once, in cell name order.
pub fn segment_all(store: &mut AggregateStore) {
    let sites = store.sites().to_vec();
    let cell_names = store.cell_names();
    for name in cell_names.iter() {
        if let Some(cell) = store.cell_mut(name) {
            segment_cell(cell, &sites);
        }
    }
    info!(
        "Segmented {} cells over {} sites ({} combinations each)",
        cell_names.len(),
        sites.len(),
        2usize.saturating_pow(sites.len() as u32) - 1
    );
}
