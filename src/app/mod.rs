pub mod pipelines;
pub mod print;
