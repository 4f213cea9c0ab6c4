//! Reading of the delimited text tables consumed by the pipeline.
//!
//! The reader only splits lines into fields. Header rows are passed through
//! untouched; recognizing and discarding them is the job of the stage that
//! consumes the rows.

pub mod table;
