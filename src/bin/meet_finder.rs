use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{ArgGroup, Parser};
use sdif_etl::adapters::storage::LocalStorage;
use sdif_etl::config::{SwimTeamConfig, DEFAULT_CONFIG_FILE};
use sdif_etl::domain::ports::Storage;
use sdif_etl::touchpad::{meets_file_name, MeetFinder, TouchPadClient};
use sdif_etl::utils::logger;
use std::path::{Path, PathBuf};

const FIRST_SEASON: i32 = 2012;

#[derive(Debug, Parser)]
#[command(name = "meet-finder")]
#[command(about = "List the TouchPad Live meets a team swam in")]
#[command(group(ArgGroup::new("who").required(true).args(["team", "team_ids"])))]
struct Args {
    /// Team name fragment, used to work out the team id
    #[arg(short, long)]
    team: Option<String>,

    /// Known TouchPad Live team id(s)
    #[arg(short = 'i', long, num_args = 1..)]
    team_ids: Vec<u64>,

    /// Single season to search; defaults to every season since 2012
    #[arg(short, long)]
    year: Option<i32>,

    #[arg(short, long, default_value = "VA")]
    state: String,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(short, long, help = "Enable verbose output")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = SwimTeamConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let finder = MeetFinder::new(TouchPadClient::from_config(&config.touchpad));

    let years: Vec<i32> = match args.year {
        Some(year) => vec![year],
        None => (FIRST_SEASON..=chrono::Local::now().year()).collect(),
    };

    let team_ids = if args.team_ids.is_empty() {
        let Some(pattern) = args.team.as_deref() else {
            bail!("pass --team or --team-ids");
        };
        tracing::info!("looking up meets for team name '{}'", pattern);
        let named = finder.fetch_meets(pattern, &args.state, &years).await?;
        vec![finder.team_id_for(pattern, &named).await?]
    } else {
        args.team_ids.clone()
    };

    tracing::info!(
        "fetching every {} meet from {} to {}",
        args.state,
        years.first().copied().unwrap_or_default(),
        years.last().copied().unwrap_or_default()
    );
    let state_meets = finder.fetch_meets("", &args.state, &years).await?;
    let meets = finder.filter_by_team_ids(state_meets, &team_ids).await?;

    let file_name = meets_file_name(&team_ids);
    let json = serde_json::to_vec_pretty(&meets)?;
    LocalStorage::new(&args.output_dir).write_file(Path::new(&file_name), &json)?;

    for meet in &meets {
        println!(
            "{}  {}  {}",
            meet.start_date.as_deref().unwrap_or("-"),
            meet.name.as_deref().unwrap_or("(unnamed)"),
            meet.url.as_deref().unwrap_or_default()
        );
    }
    println!(
        "{} meet(s) written to {}",
        meets.len(),
        args.output_dir.join(file_name).display()
    );
    Ok(())
}
