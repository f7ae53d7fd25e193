// Stat rows, season identifiers, and the hitting/pitching role split.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Which stat table a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Hitting,
    Pitching,
}

impl Role {
    /// Column holding the player id in this role's stat table.
    pub fn id_column(&self) -> &'static str {
        match self {
            Role::Hitting => "Hitter ID",
            Role::Pitching => "Pitcher ID",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Hitting => "hitting",
            Role::Pitching => "pitching",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Player and season identifiers
// ---------------------------------------------------------------------------

/// Integer player identity shared by both stat tables and the player map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid season identifier `{0}`")]
pub struct ParseSeasonError(pub String);

/// Ordinal season number, written `S<n>` in the datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct SeasonId(pub u32);

impl SeasonId {
    pub fn number(&self) -> u32 {
        self.0
    }
}

impl FromStr for SeasonId {
    type Err = ParseSeasonError;

    /// Accepts `S12`, `s12`, or a bare `12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('S')
            .or_else(|| trimmed.strip_prefix('s'))
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(SeasonId)
            .map_err(|_| ParseSeasonError(s.to_string()))
    }
}

impl TryFrom<String> for SeasonId {
    type Error = ParseSeasonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

impl Serialize for SeasonId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The season a row belongs to: one specific season or the career aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Career,
    Regular(SeasonId),
}

impl Season {
    pub const CAREER_LABEL: &'static str = "Career";

    pub fn is_career(&self) -> bool {
        matches!(self, Season::Career)
    }

    pub fn id(&self) -> Option<SeasonId> {
        match self {
            Season::Career => None,
            Season::Regular(id) => Some(*id),
        }
    }
}

impl FromStr for Season {
    type Err = ParseSeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Self::CAREER_LABEL) {
            return Ok(Season::Career);
        }
        s.parse().map(Season::Regular)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Career => f.write_str(Self::CAREER_LABEL),
            Season::Regular(id) => fmt::Display::fmt(id, f),
        }
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// StatRow
// ---------------------------------------------------------------------------

/// One hitter-season or pitcher-season line, a career aggregate, or a
/// partial-season stint after a mid-season team change.
///
/// Stat values live in a sparse map. An absent key reads as zero through
/// [`StatRow::counting`] and as "no data" through [`StatRow::stat`]; which
/// reading applies is decided by the caller, not scattered through the row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub season: Season,
    pub team: Option<String>,
    pub player_id: PlayerId,
    pub is_sub_row: bool,
    stats: HashMap<String, f64>,
}

impl StatRow {
    pub fn new(player_id: PlayerId, season: Season) -> Self {
        Self {
            season,
            team: None,
            player_id,
            is_sub_row: false,
            stats: HashMap::new(),
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn as_sub_row(mut self) -> Self {
        self.is_sub_row = true;
        self
    }

    pub fn with_stat(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert_stat(key, value);
        self
    }

    pub(crate) fn insert_stat(&mut self, key: impl Into<String>, value: f64) {
        self.stats.insert(key.into(), value);
    }

    /// The raw value for `key`, or `None` when the row carries no such field.
    pub fn stat(&self, key: &str) -> Option<f64> {
        self.stats.get(key).copied()
    }

    /// The value for `key`, reading an absent field as zero.
    pub fn counting(&self, key: &str) -> f64 {
        self.stat(key).unwrap_or(0.0)
    }

    /// Wins plus losses.
    pub fn decisions(&self) -> f64 {
        self.counting("W") + self.counting("L")
    }

    pub fn stats(&self) -> impl Iterator<Item = (&str, f64)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

// ---------------------------------------------------------------------------
// SeasonInfo
// ---------------------------------------------------------------------------

/// Games scheduled in each season, keyed by season identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SeasonInfo {
    games: BTreeMap<SeasonId, u32>,
}

impl SeasonInfo {
    pub fn new(games: BTreeMap<SeasonId, u32>) -> Self {
        Self { games }
    }

    pub fn games_in(&self, season: SeasonId) -> Option<u32> {
        self.games.get(&season).copied()
    }

    /// Every known season, most recent first.
    pub fn seasons_newest_first(&self) -> Vec<SeasonId> {
        self.games.keys().rev().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl FromIterator<(SeasonId, u32)> for SeasonInfo {
    fn from_iter<I: IntoIterator<Item = (SeasonId, u32)>>(iter: I) -> Self {
        Self {
            games: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_id_accepts_prefixed_and_bare_numbers() {
        assert_eq!("S12".parse::<SeasonId>().unwrap(), SeasonId(12));
        assert_eq!("s3".parse::<SeasonId>().unwrap(), SeasonId(3));
        assert_eq!(" 7 ".parse::<SeasonId>().unwrap(), SeasonId(7));
        assert!("Spring".parse::<SeasonId>().is_err());
        assert!("".parse::<SeasonId>().is_err());
    }

    #[test]
    fn season_parses_career_sentinel() {
        assert_eq!("Career".parse::<Season>().unwrap(), Season::Career);
        assert_eq!("S4".parse::<Season>().unwrap(), Season::Regular(SeasonId(4)));
        assert_eq!(Season::Regular(SeasonId(4)).to_string(), "S4");
        assert_eq!(Season::Career.to_string(), "Career");
    }

    #[test]
    fn absent_stat_reads_as_zero_only_when_counting() {
        let row = StatRow::new(PlayerId(1), Season::Career).with_stat("HR", 12.0);
        assert_eq!(row.stat("HR"), Some(12.0));
        assert_eq!(row.stat("AVG"), None);
        assert_eq!(row.counting("AVG"), 0.0);
    }

    #[test]
    fn decisions_sum_wins_and_losses() {
        let row = StatRow::new(PlayerId(1), Season::Career)
            .with_stat("W", 7.0)
            .with_stat("L", 4.0);
        assert_eq!(row.decisions(), 11.0);
    }

    #[test]
    fn season_info_orders_newest_first() {
        let info: SeasonInfo = serde_json::from_str(r#"{"S2": 40, "S10": 60, "S1": 30}"#).unwrap();
        assert_eq!(
            info.seasons_newest_first(),
            vec![SeasonId(10), SeasonId(2), SeasonId(1)]
        );
        assert_eq!(info.games_in(SeasonId(10)), Some(60));
        assert_eq!(info.games_in(SeasonId(5)), None);
    }
}
