// Adapters layer: filesystem storage and spreadsheet encodings.

pub mod sheet;
pub mod storage;
