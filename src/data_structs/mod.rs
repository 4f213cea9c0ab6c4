//! Core data structures of the aggregate produced by a pipeline run.
//!
//! - [`Site`]: identifier of a contributing research site.
//! - [`GeneCellRecord`] and [`SiteStats`]: the merged statistics of one gene
//!   in one canonical cell type, with one slot per site.
//! - [`CellAggregate`]: records, per-site gene sets and Venn segments of one
//!   canonical cell type.
//! - [`GeneAggregate`]: the per-gene index over the same records.
//! - [`AggregateStore`]: owns every record and both indices.
//! - [`typedef`]: type aliases for gene/cell names and statistics.

mod aggregate;
mod record;
mod site;
mod store;
pub mod typedef;


pub use aggregate::{
    CellAggregate,
    GeneAggregate,
    VennSegment,
};
pub use record::{
    GeneCellRecord,
    SiteStats,
};
pub use site::Site;
pub use store::{
    AggregateStore,
    RecordKey,
};
