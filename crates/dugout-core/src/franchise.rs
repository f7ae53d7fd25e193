// Franchise lineage: which team abbreviation a franchise played under in a
// given season.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::stats::{PlayerId, Season, SeasonId, StatRow};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One stretch of seasons a franchise spent under a single abbreviation.
/// Both bounds are inclusive; a missing `last_season` means "still current".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FranchiseEra {
    pub abbreviation: String,
    pub first_season: u32,
    #[serde(default)]
    pub last_season: Option<u32>,
}

impl FranchiseEra {
    pub fn contains(&self, season: u32) -> bool {
        season >= self.first_season && self.last_season.map_or(true, |last| season <= last)
    }
}

/// A franchise label and its eras, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Franchise {
    pub label: String,
    pub eras: Vec<FranchiseEra>,
}

impl Franchise {
    pub fn abbreviation_for(&self, season: u32) -> Option<&str> {
        self.eras
            .iter()
            .find(|era| era.contains(season))
            .map(|era| era.abbreviation.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FranchiseError {
    #[error("franchise `{label}` has no eras")]
    NoEras { label: String },

    #[error("franchise `{label}`: era `{abbreviation}` ends before it starts")]
    InvertedEra { label: String, abbreviation: String },

    #[error("franchise `{label}`: eras `{first}` and `{second}` overlap")]
    OverlappingEras {
        label: String,
        first: String,
        second: String,
    },

    #[error("franchise `{label}`: only the latest era may be open-ended, but `{abbreviation}` is not the latest")]
    OpenEndedEra { label: String, abbreviation: String },

    #[error("franchise `{0}` is defined more than once")]
    DuplicateLabel(String),
}

// ---------------------------------------------------------------------------
// FranchiseResolver
// ---------------------------------------------------------------------------

/// Resolves franchise labels against season-by-season team abbreviations.
///
/// Labels not in the lineage table are treated as a plain team abbreviation
/// that never changed.
#[derive(Debug, Clone, Default)]
pub struct FranchiseResolver {
    franchises: Vec<Franchise>,
}

impl FranchiseResolver {
    /// Validate and index the lineage table. Eras are sorted by start season.
    pub fn new(franchises: Vec<Franchise>) -> Result<Self, FranchiseError> {
        let mut seen = HashSet::new();
        let mut validated = Vec::with_capacity(franchises.len());

        for mut franchise in franchises {
            if !seen.insert(franchise.label.clone()) {
                return Err(FranchiseError::DuplicateLabel(franchise.label));
            }
            validate_eras(&mut franchise)?;
            validated.push(franchise);
        }

        Ok(Self {
            franchises: validated,
        })
    }

    pub fn get(&self, label: &str) -> Option<&Franchise> {
        self.franchises.iter().find(|f| f.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.franchises.iter().map(|f| f.label.as_str())
    }

    /// Abbreviation `label` played under in `season`, or `None` when the
    /// franchise did not exist that season.
    pub fn abbreviation_for_season<'a>(&'a self, label: &'a str, season: SeasonId) -> Option<&'a str> {
        match self.get(label) {
            Some(franchise) => franchise.abbreviation_for(season.number()),
            None => Some(label),
        }
    }

    /// Whether a row's `(team, season)` pair belongs to the franchise.
    /// Career rows carry no team and never match.
    pub fn matches(&self, label: &str, row: &StatRow) -> bool {
        let (Some(team), Some(season)) = (row.team.as_deref(), row.season.id()) else {
            return false;
        };
        self.abbreviation_for_season(label, season) == Some(team)
    }

    /// Rows from any season that belong to the franchise.
    ///
    /// When a player has stint rows for a season, those stints stand in for
    /// the player's whole-season row so a traded player is credited only for
    /// time spent with the franchise.
    pub fn filter_by_franchise<'r, I>(&self, rows: I, label: &str) -> Vec<&'r StatRow>
    where
        I: IntoIterator<Item = &'r StatRow>,
    {
        let rows: Vec<&StatRow> = rows.into_iter().collect();
        let split = split_seasons(&rows);
        rows.into_iter()
            .filter(|row| row.is_sub_row || !split.contains(&(row.player_id, row.season)))
            .filter(|row| self.matches(label, row))
            .collect()
    }

    /// Rows from one season that belong to the franchise. Resolves the
    /// season's abbreviation once; an unmatched season yields no rows.
    pub fn filter_season<'r, I>(&self, rows: I, label: &str, season: SeasonId) -> Vec<&'r StatRow>
    where
        I: IntoIterator<Item = &'r StatRow>,
    {
        let Some(abbreviation) = self.abbreviation_for_season(label, season) else {
            return Vec::new();
        };
        let rows: Vec<&StatRow> = rows
            .into_iter()
            .filter(|row| row.season == Season::Regular(season))
            .collect();
        let split = split_seasons(&rows);
        rows.into_iter()
            .filter(|row| row.is_sub_row || !split.contains(&(row.player_id, row.season)))
            .filter(|row| row.team.as_deref() == Some(abbreviation))
            .collect()
    }
}

/// `(player, season)` pairs that have stint rows.
fn split_seasons(rows: &[&StatRow]) -> HashSet<(PlayerId, Season)> {
    rows.iter()
        .filter(|row| row.is_sub_row)
        .map(|row| (row.player_id, row.season))
        .collect()
}

fn validate_eras(franchise: &mut Franchise) -> Result<(), FranchiseError> {
    let label = &franchise.label;
    if franchise.eras.is_empty() {
        return Err(FranchiseError::NoEras {
            label: label.clone(),
        });
    }

    for era in &franchise.eras {
        if era.last_season.is_some_and(|last| last < era.first_season) {
            return Err(FranchiseError::InvertedEra {
                label: label.clone(),
                abbreviation: era.abbreviation.clone(),
            });
        }
    }

    franchise.eras.sort_by_key(|era| era.first_season);

    for pair in franchise.eras.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        match earlier.last_season {
            None => {
                return Err(FranchiseError::OpenEndedEra {
                    label: label.clone(),
                    abbreviation: earlier.abbreviation.clone(),
                });
            }
            Some(last) if last >= later.first_season => {
                return Err(FranchiseError::OverlappingEras {
                    label: label.clone(),
                    first: earlier.abbreviation.clone(),
                    second: later.abbreviation.clone(),
                });
            }
            Some(_) => {}
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
