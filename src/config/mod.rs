pub mod toml_config;

pub use toml_config::{SwimTeamConfig, DEFAULT_CONFIG_FILE};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli {
    use crate::adapters::sheet::IntermediateFormat;
    use crate::app::print::SheetView;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_non_empty_string, Validate};
    use chrono::NaiveDate;
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "sdif-etl")]
    #[command(about = "Convert swim-meet result exports into an SDIF v3 (.sd3) results file")]
    #[command(version)]
    pub struct CliConfig {
        /// Team configuration file; built-in defaults are used if it is missing
        #[arg(long, global = true, default_value = super::DEFAULT_CONFIG_FILE)]
        pub config: PathBuf,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Log as JSON lines")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Merge <BASE>_{free,back,breast,fly,im} exports into <BASE>_concat
        Concat {
            base: String,

            #[arg(long, value_enum, default_value_t = IntermediateFormat::Csv)]
            format: IntermediateFormat,
        },
        /// Encode a consolidated table (and relay table) as an .sd3 file
        Build {
            consolidated: PathBuf,

            /// Defaults to <BASE>_relay.<ext> beside the consolidated table
            relay: Option<PathBuf>,

            #[arg(short, long)]
            output: Option<PathBuf>,

            /// File creation date (YYYY-MM-DD); defaults to today
            #[arg(long)]
            date: Option<NaiveDate>,
        },
        /// Decode an .sd3 file and check its trailer counts
        Parse { file: PathBuf },
        /// Print an .sd3 file's lines, or a spreadsheet's rows
        Print {
            file: PathBuf,

            /// How to read a spreadsheet; ignored for .sd3 files
            #[arg(long, value_enum, default_value_t = SheetView::Raw)]
            view: SheetView,
        },
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if let Command::Concat { base, .. } = &self.command {
                validate_non_empty_string("base", base)?;
            }
            Ok(())
        }
    }

}
