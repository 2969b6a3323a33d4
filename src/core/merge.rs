use crate::adapters::sheet::SOURCE_EXTENSIONS;
use crate::domain::columns::parse_result_rows;
use crate::domain::event::event_match_key;
use crate::domain::model::{ResultRow, SwimmerName, Table};
use crate::domain::ports::Storage;
use crate::utils::error::{ConvertError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Per-stroke export suffixes, `<base>_<suffix>.<ext>`.
pub const STROKE_SUFFIXES: [&str; 5] = ["free", "back", "breast", "fly", "im"];
pub const RELAY_SUFFIX: &str = "relay";

fn find_export<S: Storage>(storage: &S, base: &str, suffix: &str) -> Option<PathBuf> {
    SOURCE_EXTENSIONS
        .iter()
        .map(|ext| PathBuf::from(format!("{}_{}.{}", base, suffix, ext)))
        .find(|path| storage.exists(path))
}

/// Per-stroke exports present for `base`, ordered by file name.
pub fn discover_sources<S: Storage>(storage: &S, base: &str) -> Result<Vec<PathBuf>> {
    let mut sources: Vec<PathBuf> = STROKE_SUFFIXES
        .iter()
        .filter_map(|suffix| find_export(storage, base, suffix))
        .collect();

    if sources.is_empty() {
        return Err(ConvertError::EmptyInput {
            base: base.to_string(),
            expected: format!(
                "{}_{{{}}}.{{{}}}",
                base,
                STROKE_SUFFIXES.join(","),
                SOURCE_EXTENSIONS.join(",")
            ),
        });
    }

    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    for source in &sources {
        tracing::debug!("found export {}", source.display());
    }
    Ok(sources)
}

/// `<base>_relay.<ext>`, when present.
pub fn relay_source<S: Storage>(storage: &S, base: &str) -> Option<PathBuf> {
    find_export(storage, base, RELAY_SUFFIX)
}

/// Two rows for the same swimmer and event that disagreed. The later file
/// wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub swimmer: String,
    pub event: String,
    pub kept_from: PathBuf,
    pub replaced_from: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// In first-seen order.
    pub rows: Vec<ResultRow>,
    pub conflicts: Vec<MergeConflict>,
    /// Identical repeats dropped.
    pub duplicates: usize,
    pub sources: usize,
}

/// Identity of a result across files: (swimmer, event), both normalised.
pub fn merge_key(row: &ResultRow) -> (String, String) {
    let swimmer = match SwimmerName::parse(&row.name) {
        Some(name) => name.key(),
        None => row.name.trim().to_lowercase(),
    };
    (swimmer, event_match_key(&row.event))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Combines per-stroke tables into one row set.
///
/// Tables are processed in file-name order. A row whose (swimmer, event)
/// was already seen replaces the earlier one when they differ, and is
/// dropped when identical. Bad cells in any table fail the whole merge with
/// every problem listed.
pub fn merge_tables(tables: &[Table]) -> Result<MergeOutcome> {
    let mut ordered: Vec<&Table> = tables.iter().collect();
    ordered.sort_by_key(|t| file_name(&t.source));

    let mut outcome = MergeOutcome {
        sources: ordered.len(),
        ..MergeOutcome::default()
    };
    let mut origin: Vec<PathBuf> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut issues = Vec::new();

    for table in ordered {
        let (rows, mut bad) = parse_result_rows(table)?;
        tracing::info!(
            "{}: {} row(s), {} rejected",
            table.source.display(),
            rows.len(),
            bad.len()
        );
        issues.append(&mut bad);

        for row in rows {
            let key = merge_key(&row);
            match index.get(&key) {
                Some(&slot) if outcome.rows[slot] == row => {
                    outcome.duplicates += 1;
                    tracing::debug!("dropping repeated row for {} / {}", row.name, row.event);
                }
                Some(&slot) => {
                    tracing::warn!(
                        "conflicting results for {} in \"{}\": {} replaces {}",
                        row.name,
                        row.event,
                        table.source.display(),
                        origin[slot].display()
                    );
                    outcome.conflicts.push(MergeConflict {
                        swimmer: row.name.clone(),
                        event: row.event.clone(),
                        kept_from: table.source.clone(),
                        replaced_from: origin[slot].clone(),
                    });
                    outcome.rows[slot] = row;
                    origin[slot] = table.source.clone();
                }
                None => {
                    index.insert(key, outcome.rows.len());
                    outcome.rows.push(row);
                    origin.push(table.source.clone());
                }
            }
        }
    }

    if !issues.is_empty() {
        return Err(ConvertError::MalformedInput { issues });
    }
    Ok(outcome)
}
