pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod sdif;
pub mod touchpad;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::storage::LocalStorage;
pub use app::pipelines::{BuildPipeline, MergePipeline};
pub use config::SwimTeamConfig;
pub use core::{etl::EtlEngine, Pipeline, Storage};
pub use utils::error::{ConvertError, Result};
