// Minimum-sample rules that keep small-sample rate stats off leaderboards.

use serde::{Deserialize, Serialize};

use crate::catalog::StatKind;
use crate::leaderboard::Scope;
use crate::stats::{Role, SeasonInfo, StatRow};

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Tunable thresholds. Defaults match the league's published qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationRules {
    /// Career plate appearances for hitting rate stats.
    pub career_min_pa: f64,
    /// Career innings pitched for pitching rate stats.
    pub career_min_ip: f64,
    /// Plate appearances required per scheduled game in a season.
    pub season_pa_per_game: f64,
    /// Innings pitched required per scheduled game in a season.
    pub season_ip_per_game: f64,
    pub career_min_decisions: f64,
    pub season_min_decisions: f64,
}

impl Default for QualificationRules {
    fn default() -> Self {
        Self {
            career_min_pa: 100.0,
            career_min_ip: 50.0,
            season_pa_per_game: 2.0,
            season_ip_per_game: 1.0,
            career_min_decisions: 10.0,
            season_min_decisions: 3.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Qualifier
// ---------------------------------------------------------------------------

/// The sample-size measure a qualifier is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierStat {
    PlateAppearances,
    InningsPitched,
    Decisions,
}

impl QualifierStat {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Hitting => QualifierStat::PlateAppearances,
            Role::Pitching => QualifierStat::InningsPitched,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualifierStat::PlateAppearances => "PA",
            QualifierStat::InningsPitched => "IP",
            QualifierStat::Decisions => "Decisions",
        }
    }

    /// The row's sample size; absent fields count as zero.
    pub fn value(&self, row: &StatRow) -> f64 {
        match self {
            QualifierStat::PlateAppearances => row.counting("PA"),
            QualifierStat::InningsPitched => row.counting("IP"),
            QualifierStat::Decisions => row.decisions(),
        }
    }
}

/// Resolved qualifier for one scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Qualifier {
    /// Everything qualifies.
    Open,
    /// A single fixed threshold.
    Minimum { stat: QualifierStat, threshold: f64 },
    /// Threshold scales with the row's own season length.
    PerSeasonGames { stat: QualifierStat, per_game: f64 },
}

impl Qualifier {
    /// Whether `row` meets the qualifier. Seasons missing from `seasons`
    /// count as zero games.
    pub fn admits(&self, row: &StatRow, seasons: &SeasonInfo) -> bool {
        match *self {
            Qualifier::Open => true,
            Qualifier::Minimum { stat, threshold } => stat.value(row) >= threshold,
            Qualifier::PerSeasonGames { stat, per_game } => {
                let games = row
                    .season
                    .id()
                    .and_then(|id| seasons.games_in(id))
                    .unwrap_or(0);
                stat.value(row) >= f64::from(games) * per_game
            }
        }
    }

    /// Display text such as `100 PA min`. Per-row qualifiers have no single
    /// number to show.
    pub fn description(&self) -> Option<String> {
        match self {
            Qualifier::Minimum { stat, threshold } => {
                Some(format!("{} {} min", format_threshold(*threshold), stat.label()))
            }
            Qualifier::Open | Qualifier::PerSeasonGames { .. } => None,
        }
    }
}

fn format_threshold(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

// ---------------------------------------------------------------------------
// QualificationPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct QualificationPolicy {
    rules: QualificationRules,
}

impl QualificationPolicy {
    pub fn new(rules: QualificationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &QualificationRules {
        &self.rules
    }

    /// Qualifier for a stat of `kind` in `scope`.
    ///
    /// - counting stats: none
    /// - `W-L%`: decisions, career or season minimum, for either role
    /// - rate stats: fixed career minimum for All-Time, season length times
    ///   the per-game rate otherwise (per row for Single Season)
    pub fn minimum_qualifier(
        &self,
        scope: Scope,
        role: Role,
        kind: StatKind,
        seasons: &SeasonInfo,
    ) -> Qualifier {
        let rules = &self.rules;
        match kind {
            StatKind::Counting => Qualifier::Open,
            StatKind::WinLossPct => Qualifier::Minimum {
                stat: QualifierStat::Decisions,
                threshold: match scope {
                    Scope::AllTime => rules.career_min_decisions,
                    Scope::SingleSeason | Scope::Season(_) => rules.season_min_decisions,
                },
            },
            StatKind::Rate => {
                let stat = QualifierStat::for_role(role);
                let per_game = match role {
                    Role::Hitting => rules.season_pa_per_game,
                    Role::Pitching => rules.season_ip_per_game,
                };
                match scope {
                    Scope::AllTime => Qualifier::Minimum {
                        stat,
                        threshold: match role {
                            Role::Hitting => rules.career_min_pa,
                            Role::Pitching => rules.career_min_ip,
                        },
                    },
                    Scope::SingleSeason => Qualifier::PerSeasonGames { stat, per_game },
                    Scope::Season(id) => Qualifier::Minimum {
                        stat,
                        threshold: f64::from(seasons.games_in(id).unwrap_or(0)) * per_game,
                    },
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{PlayerId, Season, SeasonId};

    fn seasons() -> SeasonInfo {
        [(SeasonId(1), 50), (SeasonId(2), 30)].into_iter().collect()
    }

    fn season_row(season: u32) -> StatRow {
        StatRow::new(PlayerId(1), Season::Regular(SeasonId(season)))
    }

    #[test]
    fn counting_stats_have_no_qualifier() {
        let policy = QualificationPolicy::default();
        let q = policy.minimum_qualifier(Scope::AllTime, Role::Hitting, StatKind::Counting, &seasons());
        assert_eq!(q, Qualifier::Open);
        assert_eq!(q.description(), None);
    }

    #[test]
    fn career_thresholds_are_fixed() {
        let policy = QualificationPolicy::default();
        let hit = policy.minimum_qualifier(Scope::AllTime, Role::Hitting, StatKind::Rate, &seasons());
        assert_eq!(hit.description().as_deref(), Some("100 PA min"));
        let pitch = policy.minimum_qualifier(Scope::AllTime, Role::Pitching, StatKind::Rate, &seasons());
        assert_eq!(pitch.description().as_deref(), Some("50 IP min"));
    }

    #[test]
    fn season_threshold_scales_with_games() {
        let policy = QualificationPolicy::default();
        let q = policy.minimum_qualifier(Scope::Season(SeasonId(1)), Role::Hitting, StatKind::Rate, &seasons());
        assert!(!q.admits(&season_row(1).with_stat("PA", 99.0), &seasons()));
        assert!(q.admits(&season_row(1).with_stat("PA", 100.0), &seasons()));

        let q = policy.minimum_qualifier(Scope::Season(SeasonId(1)), Role::Pitching, StatKind::Rate, &seasons());
        assert!(q.admits(&season_row(1).with_stat("IP", 50.0), &seasons()));
        assert!(!q.admits(&season_row(1).with_stat("IP", 49.9), &seasons()));
    }

    #[test]
    fn single_season_pool_uses_each_rows_own_season() {
        let policy = QualificationPolicy::default();
        let q = policy.minimum_qualifier(Scope::SingleSeason, Role::Hitting, StatKind::Rate, &seasons());
        // 60 PA clears season 2 (30 games) but not season 1 (50 games).
        assert!(q.admits(&season_row(2).with_stat("PA", 60.0), &seasons()));
        assert!(!q.admits(&season_row(1).with_stat("PA", 60.0), &seasons()));
        assert_eq!(q.description(), None);
    }

    #[test]
    fn unknown_season_length_admits_everyone() {
        let policy = QualificationPolicy::default();
        let q = policy.minimum_qualifier(Scope::Season(SeasonId(9)), Role::Hitting, StatKind::Rate, &seasons());
        assert!(q.admits(&season_row(9), &seasons()));
    }

    #[test]
    fn win_loss_pct_uses_decisions_for_any_role() {
        let policy = QualificationPolicy::default();
        let career = policy.minimum_qualifier(Scope::AllTime, Role::Hitting, StatKind::WinLossPct, &seasons());
        assert_eq!(career.description().as_deref(), Some("10 Decisions min"));
        let season = policy.minimum_qualifier(Scope::SingleSeason, Role::Pitching, StatKind::WinLossPct, &seasons());
        let row = season_row(1).with_stat("W", 2.0).with_stat("L", 1.0);
        assert!(season.admits(&row, &seasons()));
        assert!(!season.admits(&season_row(1).with_stat("W", 2.0), &seasons()));
    }

    #[test]
    fn missing_qualifier_field_counts_as_zero() {
        let policy = QualificationPolicy::default();
        let q = policy.minimum_qualifier(Scope::AllTime, Role::Hitting, StatKind::Rate, &seasons());
        assert!(!q.admits(&StatRow::new(PlayerId(1), Season::Career), &seasons()));
    }
}
