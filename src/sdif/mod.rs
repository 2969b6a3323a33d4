//! SDIF v3 fixed-width records: layouts, the record types written for a
//! meet-results file, and a reader for checking files back.

pub mod codes;
pub mod layout;
pub mod meet_file;
pub mod reader;
pub mod records;

pub use layout::{TimeStyle, RECORD_LENGTH};
pub use meet_file::MeetFile;
pub use reader::{read_sdif, SdifReport, TrailerCheck};
pub use records::{FixedRecord, SdifRecord};
