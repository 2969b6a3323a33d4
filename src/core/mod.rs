pub mod encode;
pub mod etl;
pub mod identity;
pub mod merge;

pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
pub use encode::{EncodeOptions, EncodeSummary, EncodedMeet, MeetEncoder};
pub use etl::EtlEngine;
pub use merge::{discover_sources, merge_tables, MergeConflict, MergeOutcome};
