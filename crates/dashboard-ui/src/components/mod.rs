pub mod bars;
pub mod header;
pub mod metric;
