use arcstr::ArcStr;

/// Gene symbol as reported in a differential expression table.
pub type GeneName = ArcStr;
/// Canonical cell type name.
pub type CellName = ArcStr;
/// Type of the adjusted p-value and average log fold change columns.
pub type StatType = f64;
