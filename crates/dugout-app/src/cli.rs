// Command-line front end: argument parsing and command execution.

use anyhow::bail;
use clap::{Parser, Subcommand};
use dugout_core::catalog::{StatCatalog, StatKind};
use dugout_core::dataset::LeagueSnapshot;
use dugout_core::format::format_stat;
use dugout_core::leaderboard::{LeaderboardBuilder, LeaderboardGridAssembler, LeaderboardQuery};
use dugout_core::qualification::QualificationPolicy;
use dugout_core::stats::Role;
use std::fmt::Write as _;
use tracing::debug;

use crate::config::Config;
use crate::export::{self, OutputFormat};

/// Columns shown on a player page.
const HITTING_LINE: &[&str] = &["G", "PA", "H", "HR", "RBI", "BB", "SO", "BA", "OBP", "SLG", "OPS", "WAR"];
const PITCHING_LINE: &[&str] = &["W", "L", "ERA", "G", "GS", "SV", "IP", "SO", "BB", "WHIP", "WAR"];

#[derive(Parser, Debug)]
#[command(name = "dugout")]
#[command(author, version, about = "Leaderboards and player pages for a simulated baseball league")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show every leaderboard card for one stat.
    Leaders {
        /// Stat display name, e.g. HR, BA, ERA, W-L%.
        stat: String,
        /// Rank pitchers instead of hitters.
        #[arg(long)]
        pitching: bool,
        /// Limit to one franchise, following its lineage across renames.
        #[arg(long)]
        franchise: Option<String>,
        /// Flip the stat's natural order.
        #[arg(long)]
        reverse: bool,
        /// Rows per card; defaults to the configured page size.
        #[arg(long)]
        top: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show a player's season lines, looked up by current or former name.
    Player {
        name: String,
        #[arg(long)]
        pitching: bool,
    },
    /// List leaderboard stats for a role.
    Stats {
        #[arg(long)]
        pitching: bool,
    },
}

fn role(pitching: bool) -> Role {
    if pitching {
        Role::Pitching
    } else {
        Role::Hitting
    }
}

/// Run a command against a loaded snapshot and return what to print.
pub fn execute(command: &Command, config: &Config, snapshot: &LeagueSnapshot) -> anyhow::Result<String> {
    let catalog = StatCatalog::standard();
    debug!("using stat catalog v{}", catalog.version());
    match command {
        Command::Leaders {
            stat,
            pitching,
            franchise,
            reverse,
            top,
            format,
        } => {
            let role = role(*pitching);
            if catalog.definition(stat, role).is_none() {
                bail!("`{stat}` is not a {role} leaderboard stat (see `dugout stats`)");
            }
            let mut query = LeaderboardQuery::new(stat.clone(), role)
                .reversed(*reverse)
                .with_page_size(top.unwrap_or(config.leaderboard.page_size));
            if let Some(label) = franchise {
                query = query.with_franchise(label.clone());
            }

            let policy = QualificationPolicy::new(config.qualification);
            let builder = LeaderboardBuilder::new(snapshot, &catalog, &policy, &config.franchises);
            let grid = LeaderboardGridAssembler::new(builder).build_grid(&query);
            Ok(export::render(&grid, stat, *format)?)
        }
        Command::Player { name, pitching } => player_page(snapshot, &catalog, name, role(*pitching)),
        Command::Stats { pitching } => Ok(stat_list(snapshot, &catalog, role(*pitching))),
    }
}

fn player_page(snapshot: &LeagueSnapshot, catalog: &StatCatalog, name: &str, role: Role) -> anyhow::Result<String> {
    let players = snapshot.players();
    let Some(id) = players.find_by_name(name) else {
        bail!("no player named `{name}`");
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} (#{id})", players.display_name(id));
    if let Some(player) = players.get(id) {
        if !player.former_names.is_empty() {
            let _ = writeln!(out, "Formerly: {}", player.former_names.join(", "));
        }
    }

    let rows = snapshot.player_rows(id, role);
    if rows.is_empty() {
        let _ = writeln!(out, "No {role} stats.");
        return Ok(out);
    }

    let columns = match role {
        Role::Hitting => HITTING_LINE,
        Role::Pitching => PITCHING_LINE,
    };
    let mut header = format!("{:<8} {:<5}", "Season", "Team");
    for column in columns {
        let _ = write!(header, " {column:>6}");
    }
    let _ = writeln!(out, "\n{header}");

    for row in rows {
        let season = if row.is_sub_row {
            format!("  {}", row.season)
        } else {
            row.season.to_string()
        };
        let mut line = format!("{:<8} {:<5}", season, row.team.as_deref().unwrap_or(""));
        for column in columns {
            let value = row.stat(catalog.storage_key(column, role));
            let _ = write!(line, " {:>6}", format_stat(column, value));
        }
        let _ = writeln!(out, "{line}");
    }
    Ok(out)
}

fn stat_list(snapshot: &LeagueSnapshot, catalog: &StatCatalog, role: Role) -> String {
    let glossary = snapshot.glossary();
    let mut out = String::new();
    for name in catalog.stats_for(role) {
        let Some(definition) = catalog.definition(name, role) else {
            continue;
        };
        let kind = match definition.kind {
            StatKind::Counting => "counting",
            StatKind::Rate => "rate",
            StatKind::WinLossPct => "decisions",
        };
        let order = if definition.lower_is_better { "low" } else { "high" };
        let mut line = format!("{name:<9} {kind:<9} {order:<4}");
        if let Some(text) = glossary.and_then(|g| g.get(*name)).and_then(|v| v.as_str()) {
            let _ = write!(line, " {text}");
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
