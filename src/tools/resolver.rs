use std::collections::BTreeMap;

use hashbrown::HashMap;
use indexmap::IndexMap;
use log::{
    debug,
    info,
    warn,
};
use serde::Serialize;

use crate::config::ReconciliationLayout;
use crate::data_structs::typedef::CellName;
use crate::data_structs::Site;
use crate::utils::row_field;

/// One row of the reconciliation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCellRow {
    canonical_cell_name: CellName,
    local_aliases:       BTreeMap<Site, String>,
    display_structure:   String,
    alternate_label:     String,
    guess:               String,
}

impl CanonicalCellRow {
    pub fn canonical_cell_name(&self) -> &str { self.canonical_cell_name.as_str() }

    pub fn local_aliases(&self) -> &BTreeMap<Site, String> { &self.local_aliases }

    pub fn display_structure(&self) -> &str { &self.display_structure }

    pub fn alternate_label(&self) -> &str { &self.alternate_label }

    pub fn guess(&self) -> &str { &self.guess }
}

/// Display metadata of a canonical cell type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDirectoryEntry {
    pub canonical_structure: String,
    pub canonical_cell_name: CellName,
    pub alternate_label:     String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AliasTarget {
    row:  usize,
    site: Site,
}

/// Maps site-local cell type names to canonical cell types.
///
/// Aliases are global: a local name resolves to the same canonical cell
/// regardless of which site reports it. When the table maps one alias to
/// different canonical cells, the row that comes last in the table wins.
#[derive(Debug, Clone, Default)]
pub struct CellNameResolver {
    rows:      Vec<CanonicalCellRow>,
    aliases:   HashMap<String, AliasTarget>,
    directory: IndexMap<CellName, CellDirectoryEntry>,
}

impl CellNameResolver {
    /// Builds the resolver from the rows of a reconciliation table.
    pub fn from_rows<I, R, S>(
        rows: I,
        layout: &ReconciliationLayout,
    ) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>, {
        let mut resolver = Self::default();
        let site_cols = layout.site_cols_ordered();
        let mut skipped = 0usize;

        for (line, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            // Header match is exact: the raw field, untrimmed.
            let is_header = row
                .get(layout.structure_col)
                .is_some_and(|field| field.as_ref() == layout.header_sentinel);
            let structure = row_field(row, layout.structure_col);
            if is_header || structure.is_empty() {
                skipped += 1;
                continue;
            }
            let cell_name = row_field(row, layout.cell_col);
            if cell_name.is_empty() {
                warn!(
                    "Reconciliation row {} has no canonical cell name, skipping",
                    line + 1
                );
                skipped += 1;
                continue;
            }

            let local_aliases = site_cols
                .iter()
                .filter_map(|(site, col)| {
                    let alias = row_field(row, *col);
                    (!alias.is_empty())
                        .then(|| ((*site).clone(), alias.to_string()))
                })
                .collect::<Vec<_>>();

            resolver.push_row(
                CanonicalCellRow {
                    canonical_cell_name: CellName::from(cell_name),
                    local_aliases:       local_aliases.iter().cloned().collect(),
                    display_structure:   structure.to_string(),
                    alternate_label:     row_field(row, layout.alternate_col)
                        .to_string(),
                    guess:               row_field(row, layout.guess_col).to_string(),
                },
                local_aliases,
            );
        }

        info!(
            "Loaded {} canonical cell rows ({} aliases, {} rows skipped)",
            resolver.rows.len(),
            resolver.aliases.len(),
            skipped
        );
        resolver
    }

    /// Registers `row` and its aliases, in column order.
    fn push_row(
        &mut self,
        row: CanonicalCellRow,
        aliases: Vec<(Site, String)>,
    ) {
        let idx = self.rows.len();
        for (site, alias) in aliases {
            let target = AliasTarget {
                row: idx,
                site,
            };
            if let Some(previous) = self.aliases.insert(alias.clone(), target) {
                let previous_cell = self
                    .rows
                    .get(previous.row)
                    .map(CanonicalCellRow::canonical_cell_name);
                if previous.row != idx
                    && previous_cell != Some(row.canonical_cell_name())
                {
                    warn!(
                        "Alias {:?} remapped from {:?} to {:?}",
                        alias,
                        previous_cell.unwrap_or_default(),
                        row.canonical_cell_name()
                    );
                }
            }
        }

        if !self
            .directory
            .contains_key(&row.canonical_cell_name)
        {
            self.directory.insert(
                row.canonical_cell_name.clone(),
                CellDirectoryEntry {
                    canonical_structure: row.display_structure.clone(),
                    canonical_cell_name: row.canonical_cell_name.clone(),
                    alternate_label:     row.alternate_label.clone(),
                },
            );
        }
        else {
            debug!(
                "Canonical cell {:?} already in directory",
                row.canonical_cell_name.as_str()
            );
        }
        self.rows.push(row);
    }

    /// Canonical row for a site-local cell name.
    pub fn resolve(
        &self,
        local_name: &str,
    ) -> Option<&CanonicalCellRow> {
        self.aliases
            .get(local_name.trim())
            .and_then(|target| self.rows.get(target.row))
    }

    /// Canonical row for a site-local cell name together with the site whose
    /// column registered the alias.
    pub fn resolve_alias(
        &self,
        local_name: &str,
    ) -> Option<(&Site, &CanonicalCellRow)> {
        let target = self.aliases.get(local_name.trim())?;
        self.rows
            .get(target.row)
            .map(|row| (&target.site, row))
    }

    /// Display metadata by canonical cell name, in table order.
    pub fn directory(&self) -> &IndexMap<CellName, CellDirectoryEntry> {
        &self.directory
    }

    pub fn rows(&self) -> &[CanonicalCellRow] { &self.rows }

    pub fn alias_count(&self) -> usize { self.aliases.len() }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}
