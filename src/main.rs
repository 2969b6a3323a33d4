use clap::Parser;
use sdif_etl::app::print::render_file;
use sdif_etl::sdif::{read_sdif, SdifReport};
use sdif_etl::utils::error::Result;
use sdif_etl::utils::{logger, validation::Validate};
use sdif_etl::{
    BuildPipeline, CliConfig, Command, EtlEngine, LocalStorage, MergePipeline, Storage,
    SwimTeamConfig,
};
use std::path::Path;

fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli) {
        tracing::error!(
            "run failed: {} (category: {:?}, severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code());
    }
}

fn run(cli: &CliConfig) -> Result<()> {
    cli.validate()?;
    let storage = LocalStorage::new(".");

    match &cli.command {
        Command::Concat { base, format } => {
            let engine = EtlEngine::new(MergePipeline::new(storage, base.clone(), *format));
            let output = engine.run()?;
            println!("✅ consolidated table written to {}", output);
        }
        Command::Build {
            consolidated,
            relay,
            output,
            date,
        } => {
            let config = SwimTeamConfig::load_or_default(&cli.config)?;
            let created_on = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let mut pipeline = BuildPipeline::new(storage, config, consolidated, created_on)?;
            if let Some(relay) = relay {
                pipeline = pipeline.with_relay(relay);
            }
            if let Some(output) = output {
                pipeline = pipeline.with_output(output);
            }
            let output = EtlEngine::new(pipeline).run()?;
            println!("✅ SDIF file written to {}", output);
        }
        Command::Print { file, view } => {
            let data = storage.read_file(file)?;
            print!("{}", render_file(file, data, *view)?);
        }
        Command::Parse { file } => {
            let report = parse_file(&storage, file)?;
            print_report(file, &report);
            let trailer_ok = report.trailer_check().is_some_and(|c| c.is_consistent());
            if !report.errors.is_empty() || !trailer_ok {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn parse_file(storage: &LocalStorage, file: &Path) -> Result<SdifReport> {
    let bytes = storage.read_file(file)?;
    Ok(read_sdif(&String::from_utf8_lossy(&bytes)))
}

fn print_report(file: &Path, report: &SdifReport) {
    println!("{}", file.display());
    for (code, count) in &report.counts {
        println!("  {}  {:>6}", code, count);
    }
    for error in &report.errors {
        println!("  ⚠️  {}", error);
    }
    match report.trailer_check() {
        Some(check) if check.is_consistent() => {
            println!("  trailer: {} result(s), matches", check.declared)
        }
        Some(check) => println!(
            "  trailer: declares {} result(s) but {} were read",
            check.declared, check.actual
        ),
        None => println!("  trailer: no readable Z0 record"),
    }
}
