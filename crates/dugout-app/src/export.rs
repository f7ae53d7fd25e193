// Rendering leaderboard grids as plain text, CSV, or JSON.

use clap::ValueEnum;
use dugout_core::format::format_stat;
use dugout_core::leaderboard::{LeaderboardGrid, LeaderboardResult, Scope};
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output was not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render a full grid. `stat` is the display name used for headings and
/// number formatting.
pub fn render(grid: &LeaderboardGrid, stat: &str, format: OutputFormat) -> Result<String, ExportError> {
    match format {
        OutputFormat::Text => Ok(render_text(grid, stat)),
        OutputFormat::Csv => render_csv(grid, stat),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(grid)?),
    }
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

fn render_text(grid: &LeaderboardGrid, stat: &str) -> String {
    let mut out = String::new();
    if grid.is_empty() {
        let _ = writeln!(out, "No leaderboard for `{stat}`.");
        return out;
    }
    let _ = writeln!(out, "{stat} Leaderboards");
    for (scope, result) in grid.iter() {
        out.push('\n');
        render_card(&mut out, scope, result, stat);
    }
    out
}

fn render_card(out: &mut String, scope: Scope, result: &LeaderboardResult, stat: &str) {
    match &result.qualifier {
        Some(q) => {
            let _ = writeln!(out, "{} ({q})", scope.title());
        }
        None => {
            let _ = writeln!(out, "{}", scope.title());
        }
    }

    // Per-season cards show the team; the pooled card shows which season.
    let extra_header = match scope {
        Scope::AllTime => None,
        Scope::SingleSeason => Some("Season"),
        Scope::Season(_) => Some("Team"),
    };

    let name_width = result
        .rows
        .iter()
        .map(|e| e.player_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Player".len());

    let mut header = format!("{:>4}  {:<name_width$}", "Rank", "Player");
    if let Some(extra) = extra_header {
        let _ = write!(header, "  {extra:<6}");
    }
    let _ = write!(header, "  {stat:>8}");
    let _ = writeln!(out, "{}", header.trim_end());

    if result.rows.is_empty() && result.tie.is_none() {
        let _ = writeln!(out, "  (no qualified players)");
    }

    for entry in &result.rows {
        let mut line = format!("{:>4}  {:<name_width$}", entry.rank, entry.player_name);
        match scope {
            Scope::AllTime => {}
            Scope::SingleSeason => {
                let season = entry.season.id().map(|s| s.number().to_string()).unwrap_or_default();
                let _ = write!(line, "  {season:<6}");
            }
            Scope::Season(_) => {
                let team = entry.team.as_deref().unwrap_or("");
                let _ = write!(line, "  {team:<6}");
            }
        }
        let _ = write!(line, "  {:>8}", format_stat(stat, entry.value));
        let _ = writeln!(out, "{line}");
    }

    if let Some(tie) = result.tie {
        let _ = writeln!(
            out,
            "  {} players tied with {}",
            tie.count,
            format_stat(stat, Some(tie.value))
        );
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// One record per shown row. Tie overflow is not a row and is left out.
fn render_csv(grid: &LeaderboardGrid, stat: &str) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["scope", "rank", "player_id", "player", "season", "team", stat])?;
    for (scope, result) in grid.iter() {
        for entry in &result.rows {
            writer.write_record([
                scope.key(),
                entry.rank.to_string(),
                entry.player_id.to_string(),
                entry.player_name.clone(),
                entry.season.to_string(),
                entry.team.clone().unwrap_or_default(),
                format_stat(stat, entry.value),
            ])?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
