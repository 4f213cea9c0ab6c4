//! Processing stages of a run.
//!
//! - [`resolver`]: reconciles site-local cell type names into canonical
//!   cell types.
//! - [`ingest`]: merges site differential expression rows into the
//!   aggregate store.
//! - [`venn`]: partitions each cell's per-site gene sets into Venn segments.
//! - [`pipeline`]: runs the stages above in order over one set of tables.

pub mod ingest;
pub mod pipeline;
pub mod resolver;
pub mod venn;

#[cfg(test)]
mod tests;
