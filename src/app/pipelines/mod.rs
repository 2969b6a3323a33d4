pub mod build_pipeline;
pub mod merge_pipeline;

pub use build_pipeline::BuildPipeline;
pub use merge_pipeline::MergePipeline;
