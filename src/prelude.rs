pub use crate::config::{
    DeTableLayout,
    PipelineConfig,
    ReconciliationLayout,
    SiteConfig,
};
pub use crate::data_structs::{
    AggregateStore,
    CellAggregate,
    GeneAggregate,
    GeneCellRecord,
    RecordKey,
    Site,
    SiteStats,
    VennSegment,
};
pub use crate::io::table::{
    read_rows,
    read_rows_from,
    Row,
    Table,
};
pub use crate::tools::ingest::{
    IngestSummary,
    RecordIngestor,
    SkipReason,
};
pub use crate::tools::pipeline::{
    Pipeline,
    PipelineOutput,
    PipelineReport,
};
pub use crate::tools::resolver::{
    CanonicalCellRow,
    CellDirectoryEntry,
    CellNameResolver,
};
pub use crate::tools::venn::{
    segment,
    segment_all,
    segment_cell,
    site_combinations,
};
