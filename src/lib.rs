//! # microscopium
//!
//! `microscopium` merges single-cell differential expression tables reported
//! by several research sites into one gene×cell dataset and computes, for
//! every canonical cell type, how many genes were reported by exactly which
//! combination of sites (a Venn segmentation of the per-site gene sets).
//!
//! ## Structure
//!
//! * [`config`]: Site universe, table layouts and header sentinels of one
//!   run ([`PipelineConfig`]).
//! * [`data_structs`]: The aggregate model: [`Site`], [`GeneCellRecord`],
//!   [`CellAggregate`], [`GeneAggregate`] and the [`AggregateStore`] that
//!   indexes records by cell and by gene.
//! * [`io`]: Splitting delimited tables into field rows.
//! * [`tools`]: The processing stages: cell name reconciliation
//!   ([`CellNameResolver`]), record ingestion ([`RecordIngestor`]), Venn
//!   segmentation ([`segment`]) and the [`Pipeline`] that runs them in order.
//!
//! ## Usage
//!
//! ```no_run
//! use microscopium::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let pipeline = Pipeline::new(PipelineConfig::default())?;
//!     let output = pipeline.run_files(Some("public/data".as_ref()))?;
//!
//!     for cell in output.store.all_cells() {
//!         for segment in cell.venn_segments() {
//!             println!("{} {}: {}", cell.cell_name(), segment, segment.size());
//!         }
//!     }
//!     println!("{}", serde_json::to_string(&output.report())?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data_structs;
pub mod io;
pub mod prelude;
pub mod tools;
pub mod utils;

#[doc(hidden)]
pub use paste;

#[allow(unused_imports)]
use prelude::*;
