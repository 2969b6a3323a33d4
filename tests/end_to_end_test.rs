use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use sdif_etl::adapters::sheet::IntermediateFormat;
use sdif_etl::sdif::read_sdif;
use sdif_etl::{
    BuildPipeline, ConvertError, EtlEngine, LocalStorage, MergePipeline, SwimTeamConfig,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RELAY_CSV: &str = "Relay Team,Event,Final Time,Place\n\
\"WWST-A\n» Doe, Jane\n» Roe, Ann\n» Poe, Kim\n» Loe, Amy\",Girls 9-10 200 Medley Relay,2:45.10,1\n";

fn created_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
}

fn team_config() -> anyhow::Result<SwimTeamConfig> {
    Ok(SwimTeamConfig::from_toml_str(
        r#"
[team]
full_name = "Wild Wood Stingrays"
abbreviation = "Stingrays"
lsc = "OD"
code = "WWST"

[meet]
name = "Stingrays vs Sharks"
start_date = "2024-06-15"
"#,
    )?)
}

/// `meet_free.xlsx` with the single row of the reference example.
fn write_free_export(dir: &Path) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["Name", "Age", "Gender", "Event", "Final Time"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header)?;
    }
    sheet.write_string(1, 0, "Jane Doe")?;
    sheet.write_number(1, 1, 10)?;
    sheet.write_string(1, 2, "F")?;
    sheet.write_string(1, 3, "50 Freestyle")?;
    sheet.write_number(1, 4, 35.67)?;
    workbook.save(dir.join("meet_free.xlsx"))?;
    Ok(())
}

fn concat(dir: &Path, format: IntermediateFormat) -> Result<String, ConvertError> {
    EtlEngine::new(MergePipeline::new(LocalStorage::new(dir), "meet", format)).run()
}

fn build(dir: &Path, consolidated: &str, output: &str) -> Result<String, ConvertError> {
    let config = team_config().expect("config parses");
    let pipeline = BuildPipeline::new(LocalStorage::new(dir), config, consolidated, created_on())?
        .with_output(output);
    EtlEngine::new(pipeline).run()
}

fn record_lines<'a>(text: &'a str, code: &str) -> Vec<&'a str> {
    text.split("\r\n").filter(|l| l.starts_with(code)).collect()
}

#[test]
fn test_reference_example_merge_then_build() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_free_export(dir.path())?;
    fs::write(dir.path().join("meet_relay.csv"), RELAY_CSV)?;

    let consolidated = concat(dir.path(), IntermediateFormat::Csv)?;
    assert_eq!(consolidated, "meet_concat.csv");
    let output = build(dir.path(), &consolidated, "meet.sd3")?;
    assert_eq!(output, "meet.sd3");

    let text = fs::read_to_string(dir.path().join("meet.sd3"))?;
    assert!(text.ends_with("\r\n"));

    let d0 = record_lines(&text, "D0");
    assert_eq!(d0.len(), 1);
    assert_eq!(&d0[0][115..123], "  003567");
    assert!(d0[0].contains("Doe, Jane"));

    let e0 = record_lines(&text, "E0");
    assert_eq!(e0.len(), 1);
    assert_eq!(&e0[0][11..20], "AODWWST04");

    let f0 = record_lines(&text, "F0");
    assert_eq!(f0.len(), 4);
    let legs: Vec<&str> = f0.iter().map(|l| l[22..50].trim_end()).collect();
    assert_eq!(legs, vec!["Doe, Jane", "Roe, Ann", "Poe, Kim", "Loe, Amy"]);

    let report = read_sdif(&text);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    let check = report.trailer_check().expect("Z0 present");
    assert_eq!(check.declared, 2);
    assert!(check.is_consistent());
    Ok(())
}

#[test]
fn test_portal_export_layout_converts() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("meet_free.csv"),
        "\"Athlete\nName\",\"EventAge\nCurrent\",LSC-Team,Event,\"Finals\nTime\",\"Finals\nPos\"\n\
\"Doe, Jane\n010114JANXDOEX\",10,OD-WWST,\"Female (9-10) \n50 Free\",35.67,1\n",
    )?;

    concat(dir.path(), IntermediateFormat::Csv)?;
    let consolidated = fs::read_to_string(dir.path().join("meet_concat.csv"))?;
    assert!(consolidated.contains(",Female (9-10) 50 Free,"), "{consolidated}");

    build(dir.path(), "meet_concat.csv", "meet.sd3")?;
    let text = fs::read_to_string(dir.path().join("meet.sd3"))?;
    let d0 = record_lines(&text, "D0");
    assert_eq!(d0.len(), 1);
    assert!(d0[0].contains("Doe, Jane"));
    assert_eq!(&d0[0][115..123], "  003567");
    assert!(read_sdif(&text).errors.is_empty());
    Ok(())
}

#[test]
fn test_unknown_event_leaves_no_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("meet_concat.csv"),
        "Name,Age,Gender,Event,Final Time\nJane Doe,10,F,200 Medley Freestyle,35.67\n",
    )?;

    let err = build(dir.path(), "meet_concat.csv", "meet.sd3").unwrap_err();
    match err {
        ConvertError::UnknownEvent { description } => {
            assert_eq!(description, "200 Medley Freestyle")
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!dir.path().join("meet.sd3").exists());
    Ok(())
}

#[test]
fn test_three_leg_free_relay_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("meet_concat.csv"),
        "Name,Age,Gender,Event,Final Time\nJane Doe,12,F,50 Free,31.20\n",
    )?;
    fs::write(
        dir.path().join("meet_relay.csv"),
        "Relay,Event,Swimmers,Final Time\nWWST-A,Girls 11-12 200 Free Relay,Jane Doe;Ann Roe;Kim Poe,2:20.00\n",
    )?;

    let err = build(dir.path(), "meet_concat.csv", "meet.sd3").unwrap_err();
    assert!(matches!(
        err,
        ConvertError::RelayComposition {
            expected: 4,
            found: 3,
            ..
        }
    ));
    assert!(!dir.path().join("meet.sd3").exists());
    Ok(())
}

#[test]
fn test_repeated_runs_are_byte_identical() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_free_export(dir.path())?;
    fs::write(
        dir.path().join("meet_back.csv"),
        "Name,Age,Gender,Event,Final Time\nJane Doe,10,F,50 Backstroke,41.02\nAnn Roe,10,F,50 Backstroke,44.90\n",
    )?;
    fs::write(dir.path().join("meet_relay.csv"), RELAY_CSV)?;

    for format in [IntermediateFormat::Csv, IntermediateFormat::Xlsx] {
        let path = dir.path().join(format!("meet_concat.{}", format.extension()));
        concat(dir.path(), format)?;
        let first = fs::read(&path)?;
        concat(dir.path(), format)?;
        assert_eq!(first, fs::read(&path)?, "{:?} concat differs", format);
    }

    build(dir.path(), "meet_concat.xlsx", "first.sd3")?;
    build(dir.path(), "meet_concat.xlsx", "second.sd3")?;
    build(dir.path(), "meet_concat.csv", "third.sd3")?;
    let first = fs::read(dir.path().join("first.sd3"))?;
    assert_eq!(first, fs::read(dir.path().join("second.sd3"))?);
    assert_eq!(first, fs::read(dir.path().join("third.sd3"))?);
    Ok(())
}

#[test]
fn test_overlapping_exports_give_one_row_per_swim() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let header = "Name,Age,Gender,Event,Final Time\n";
    fs::write(
        dir.path().join("meet_free.csv"),
        format!("{header}Jane Doe,10,F,50 Freestyle,35.67\nAnn Roe,10,F,50 Backstroke,44.90\n"),
    )?;
    fs::write(
        dir.path().join("meet_back.csv"),
        format!("{header}Ann Roe,10,F,50 Backstroke,44.90\n"),
    )?;

    concat(dir.path(), IntermediateFormat::Csv)?;
    let text = fs::read_to_string(dir.path().join("meet_concat.csv"))?;
    assert_eq!(text.lines().count(), 3);
    assert_eq!(text.matches("Ann Roe").count(), 1);
    Ok(())
}

#[test]
fn test_missing_exports_is_empty_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let err = concat(dir.path(), IntermediateFormat::Csv).unwrap_err();
    assert!(matches!(err, ConvertError::EmptyInput { .. }));
    assert!(!dir.path().join("meet_concat.csv").exists());
    Ok(())
}
