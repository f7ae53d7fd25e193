// Stat registry: display names, storage keys, counting vs. rate, and sort
// polarity.

use serde::Serialize;

use crate::stats::Role;

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

/// Leaderboard-eligible hitting stats, in selector order.
const HITTING_STATS: &[&str] = &[
    "WAR", "G", "PA", "AB", "R", "H", "2B", "3B", "HR", "RBI", "SB", "CS", "BB", "IBB", "SO",
    "Auto K", "BA", "OBP", "SLG", "OPS", "OPS+", "TB", "GIDP", "SH", "SF", "BABIP", "ISO", "HR%",
    "SO%", "BB%", "GB%", "FB%", "GB/FB", "WPA", "RE24", "SB%", "Avg Diff", "1B", "RGO", "LGO",
    "GO", "FO", "PO", "LO",
];

/// Leaderboard-eligible pitching stats, in selector order.
const PITCHING_STATS: &[&str] = &[
    "WAR", "W", "L", "W-L%", "ERA", "G", "GS", "GF", "CG", "SHO", "SV", "HLD", "IP", "H", "ER",
    "HR", "BB", "IBB", "Auto BB", "SO", "BF", "ERA+", "FIP", "WHIP", "H6", "HR6", "BB6", "SO6",
    "SO/BB", "HR%", "K%", "BB%", "GB%", "FB%", "GB/FB", "WPA", "RE24", "Avg Diff", "BA", "OBP",
    "SLG", "OPS", "BABIP", "SB", "CS", "SB%", "1B", "RGO", "LGO", "GO", "FO", "PO", "LO",
];

/// Stats that sum across games and seasons.
const COUNTING_STATS: &[&str] = &[
    "G", "PA", "AB", "R", "H", "2B", "3B", "HR", "RBI", "SB", "CS", "BB", "IBB", "SO", "Auto K",
    "TB", "GIDP", "SH", "SF", "W", "L", "GS", "GF", "CG", "SHO", "SV", "HLD", "IP", "ER", "BF",
    "1B", "RGO", "LGO", "GO", "FO", "PO", "LO",
];

const HITTING_STORAGE_KEYS: &[(&str, &str)] = &[("SO", "K"), ("BA", "AVG")];

/// Pitching stats are stored as what the pitcher allowed.
const PITCHING_STORAGE_KEYS: &[(&str, &str)] = &[
    ("SO", "K"),
    ("ER", "R"),
    ("H6", "H/6"),
    ("HR6", "HR/6"),
    ("BB6", "BB/6"),
    ("SO6", "K/6"),
    ("SO/BB", "K/BB"),
    ("GB%", "GB%_A"),
    ("FB%", "FB%_A"),
    ("GB/FB", "GB/FB_A"),
    ("BA", "BAA"),
    ("OBP", "OBPA"),
    ("SLG", "SLGA"),
    ("OPS", "OPSA"),
    ("BABIP", "BABIP_A"),
    ("HR%", "HR%_A"),
    ("K%", "K%_A"),
    ("BB%", "BB%_A"),
    ("SB", "SB_A"),
    ("CS", "CS_A"),
    ("SB%", "SB%_A"),
];

const HITTING_LOWER_IS_BETTER: &[&str] = &["Avg Diff"];

const PITCHING_LOWER_IS_BETTER: &[&str] = &[
    "ERA", "WHIP", "FIP", "RE24", "BAA", "OBPA", "SLGA", "OPSA", "BABIP_A", "H6", "HR6", "BB6",
    "H/6", "HR/6", "BB/6", "BA", "OBP", "SLG", "OPS", "BABIP", "HR%", "K%", "BB%", "GB%", "FB%",
    "GB/FB",
];

/// Win-loss percentage; qualifies on decisions instead of PA/IP.
pub const WIN_LOSS_PCT: &str = "W-L%";

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// How a stat is screened before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatKind {
    /// Additive; no qualifier, but zero values are dropped.
    Counting,
    /// Ratio or average; gated by a PA/IP qualifier.
    Rate,
    /// `W-L%`, gated by decisions.
    WinLossPct,
}

/// Everything the engine needs to know about one stat for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatDefinition {
    pub name: &'static str,
    pub storage_key: &'static str,
    pub kind: StatKind,
    pub lower_is_better: bool,
    pub role: Role,
}

impl StatDefinition {
    pub fn is_counting(&self) -> bool {
        self.kind == StatKind::Counting
    }
}

// ---------------------------------------------------------------------------
// StatCatalog
// ---------------------------------------------------------------------------

/// Versioned, read-only stat registry shared by every leaderboard query.
#[derive(Debug, Clone, Copy)]
pub struct StatCatalog {
    version: u32,
    hitting: &'static [&'static str],
    pitching: &'static [&'static str],
    counting: &'static [&'static str],
    hitting_keys: &'static [(&'static str, &'static str)],
    pitching_keys: &'static [(&'static str, &'static str)],
    hitting_lower: &'static [&'static str],
    pitching_lower: &'static [&'static str],
}

impl Default for StatCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl StatCatalog {
    pub const CURRENT_VERSION: u32 = 1;

    /// The registry the league's datasets are exported against.
    pub const fn standard() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            hitting: HITTING_STATS,
            pitching: PITCHING_STATS,
            counting: COUNTING_STATS,
            hitting_keys: HITTING_STORAGE_KEYS,
            pitching_keys: PITCHING_STORAGE_KEYS,
            hitting_lower: HITTING_LOWER_IS_BETTER,
            pitching_lower: PITCHING_LOWER_IS_BETTER,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Leaderboard-eligible display names for `role`.
    pub fn stats_for(&self, role: Role) -> &'static [&'static str] {
        match role {
            Role::Hitting => self.hitting,
            Role::Pitching => self.pitching,
        }
    }

    /// Field name a display stat is stored under. Unmapped stats map to
    /// themselves.
    pub fn storage_key<'a>(&self, display: &'a str, role: Role) -> &'a str {
        let table = match role {
            Role::Hitting => self.hitting_keys,
            Role::Pitching => self.pitching_keys,
        };
        table
            .iter()
            .find(|(from, _)| *from == display)
            .map(|(_, to)| *to)
            .unwrap_or(display)
    }

    pub fn is_counting_stat(&self, display: &str) -> bool {
        self.counting.contains(&display)
    }

    /// Whether smaller values rank higher. Affects ordering only.
    pub fn is_lower_better(&self, display: &str, role: Role) -> bool {
        match role {
            Role::Hitting => self.hitting_lower.contains(&display),
            Role::Pitching => self.pitching_lower.contains(&display),
        }
    }

    /// Full definition, or `None` when `display` is not a leaderboard stat
    /// for `role`.
    pub fn definition(&self, display: &str, role: Role) -> Option<StatDefinition> {
        let name = *self.stats_for(role).iter().find(|s| **s == display)?;
        let kind = if name == WIN_LOSS_PCT {
            StatKind::WinLossPct
        } else if self.is_counting_stat(name) {
            StatKind::Counting
        } else {
            StatKind::Rate
        };
        Some(StatDefinition {
            name,
            storage_key: self.storage_key(name, role),
            kind,
            lower_is_better: self.is_lower_better(name, role),
            role,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
