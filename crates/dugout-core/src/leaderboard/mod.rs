// Leaderboard construction: scopes, queries, and ranked results.

mod builder;
mod grid;
mod ranking;

pub use builder::LeaderboardBuilder;
pub use grid::{LeaderboardGrid, LeaderboardGridAssembler};
pub use ranking::{competition_ranks, compare_values, paginate, Page};

use serde::{Serialize, Serializer};
use std::fmt;

use crate::stats::{PlayerId, Role, Season, SeasonId};

/// Rows shown per card unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Aggregation window for one leaderboard card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Career rows.
    AllTime,
    /// Every individual season pooled, one entry per player-season.
    SingleSeason,
    /// One specific season.
    Season(SeasonId),
}

impl Scope {
    /// Grid key: `All-Time`, `Single Season`, or the season identifier.
    pub fn key(&self) -> String {
        match self {
            Scope::AllTime => "All-Time".to_string(),
            Scope::SingleSeason => "Single Season".to_string(),
            Scope::Season(id) => id.to_string(),
        }
    }

    /// Card heading.
    pub fn title(&self) -> String {
        match self {
            Scope::AllTime => "All-Time".to_string(),
            Scope::SingleSeason => "Single Season".to_string(),
            Scope::Season(id) => format!("Season {}", id.number()),
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self {
            Scope::AllTime => "all-time",
            Scope::SingleSeason => "single-season",
            Scope::Season(_) => "season",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// What the caller selected: a stat, a role, and optional filters.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardQuery {
    pub stat: String,
    pub role: Role,
    /// Franchise label. Labels with no configured lineage are treated as a
    /// plain team abbreviation.
    pub franchise: Option<String>,
    /// Flip the stat's natural order.
    pub reverse: bool,
    pub page_size: usize,
}

impl LeaderboardQuery {
    pub fn new(stat: impl Into<String>, role: Role) -> Self {
        Self {
            stat: stat.into(),
            role,
            franchise: None,
            reverse: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_franchise(mut self, label: impl Into<String>) -> Self {
        self.franchise = Some(label.into());
        self
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// Competition rank: tied rows share the rank of the first row in
    /// their group.
    pub rank: usize,
    pub player_id: PlayerId,
    pub player_name: String,
    pub season: Season,
    pub team: Option<String>,
    pub value: Option<f64>,
}

/// Tied block cut from the bottom of a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TieOverflow {
    /// Every qualified row sharing the value, shown or not.
    pub count: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardResult {
    pub scope: Scope,
    pub scope_type: &'static str,
    pub stat: String,
    pub storage_key: String,
    pub rows: Vec<LeaderboardEntry>,
    pub tie: Option<TieOverflow>,
    /// e.g. `100 PA min`; absent for counting stats and per-row qualifiers.
    pub qualifier: Option<String>,
    pub is_counting_stat: bool,
    /// Rows that passed qualification before pagination.
    pub qualified_count: usize,
}

impl LeaderboardResult {
    pub fn empty(scope: Scope, stat: &str) -> Self {
        Self {
            scope,
            scope_type: scope.type_label(),
            stat: stat.to_string(),
            storage_key: stat.to_string(),
            rows: Vec::new(),
            tie: None,
            qualifier: None,
            is_counting_stat: false,
            qualified_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.tie.is_none()
    }
}
