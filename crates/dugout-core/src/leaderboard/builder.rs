// Single-scope leaderboard construction.

use std::borrow::Cow;
use tracing::debug;

use super::ranking::{compare_values, competition_ranks, paginate};
use super::{LeaderboardEntry, LeaderboardQuery, LeaderboardResult, Scope};
use crate::career;
use crate::catalog::{StatCatalog, StatDefinition, StatKind};
use crate::dataset::LeagueSnapshot;
use crate::franchise::FranchiseResolver;
use crate::qualification::QualificationPolicy;
use crate::stats::{Role, Season, StatRow};

/// Builds one ranked leaderboard from a loaded snapshot.
///
/// Borrowing everything keeps queries free of shared mutable state:
/// repeated calls with the same query return identical results.
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardBuilder<'a> {
    snapshot: &'a LeagueSnapshot,
    catalog: &'a StatCatalog,
    policy: &'a QualificationPolicy,
    franchises: &'a FranchiseResolver,
}

impl<'a> LeaderboardBuilder<'a> {
    pub fn new(
        snapshot: &'a LeagueSnapshot,
        catalog: &'a StatCatalog,
        policy: &'a QualificationPolicy,
        franchises: &'a FranchiseResolver,
    ) -> Self {
        Self {
            snapshot,
            catalog,
            policy,
            franchises,
        }
    }

    pub fn snapshot(&self) -> &'a LeagueSnapshot {
        self.snapshot
    }

    pub fn catalog(&self) -> &'a StatCatalog {
        self.catalog
    }

    /// Rank `query.stat` within `scope`. Unknown stats give an empty result.
    pub fn build(&self, query: &LeaderboardQuery, scope: Scope) -> LeaderboardResult {
        let Some(definition) = self.catalog.definition(&query.stat, query.role) else {
            debug!("unknown {} stat `{}`", query.role, query.stat);
            return LeaderboardResult::empty(scope, &query.stat);
        };
        self.build_with(&definition, query, scope)
    }

    pub(crate) fn build_with(
        &self,
        definition: &StatDefinition,
        query: &LeaderboardQuery,
        scope: Scope,
    ) -> LeaderboardResult {
        let key = definition.storage_key;
        let seasons = self.snapshot.seasons();
        let qualifier = self
            .policy
            .minimum_qualifier(scope, query.role, definition.kind, seasons);

        let mut qualified: Vec<Cow<'a, StatRow>> = self
            .select_rows(scope, query.role, query.franchise.as_deref())
            .into_iter()
            .filter(|row| match definition.kind {
                StatKind::Counting => row.stat(key).is_some_and(|v| v != 0.0),
                StatKind::Rate | StatKind::WinLossPct => {
                    row.stat(key).is_some() && qualifier.admits(row, seasons)
                }
            })
            .collect();

        // Stable sort keeps dataset order among equal values.
        qualified.sort_by(|a, b| {
            compare_values(a.stat(key), b.stat(key), definition.lower_is_better, query.reverse)
        });

        let values: Vec<Option<f64>> = qualified.iter().map(|row| row.stat(key)).collect();
        let page = paginate(&values, query.page_size);
        let ranks = competition_ranks(&values[..page.shown]);

        let players = self.snapshot.players();
        let rows = qualified
            .iter()
            .zip(ranks)
            .map(|(row, rank)| LeaderboardEntry {
                rank,
                player_id: row.player_id,
                player_name: players.display_name(row.player_id).to_string(),
                season: row.season,
                team: row.team.clone(),
                value: row.stat(key),
            })
            .collect();

        debug!(
            "{} {} {}: {} qualified, {} shown",
            query.role,
            definition.name,
            scope,
            qualified.len(),
            page.shown
        );

        LeaderboardResult {
            scope,
            scope_type: scope.type_label(),
            stat: definition.name.to_string(),
            storage_key: key.to_string(),
            rows,
            tie: page.tie,
            qualifier: qualifier.description(),
            is_counting_stat: definition.is_counting(),
            qualified_count: qualified.len(),
        }
    }

    /// Working rows for a scope before qualification.
    ///
    /// Without a franchise, stints are left out so each player-season
    /// appears once. With one, stints stand in for their season's whole
    /// row, and All-Time uses careers aggregated from franchise seasons only.
    fn select_rows(&self, scope: Scope, role: Role, franchise: Option<&str>) -> Vec<Cow<'a, StatRow>> {
        let rows = self.snapshot.rows(role);
        match (franchise, scope) {
            (None, Scope::AllTime) => rows
                .iter()
                .filter(|r| r.season.is_career())
                .map(Cow::Borrowed)
                .collect(),
            (None, Scope::SingleSeason) => rows
                .iter()
                .filter(|r| !r.season.is_career() && !r.is_sub_row)
                .map(Cow::Borrowed)
                .collect(),
            (None, Scope::Season(id)) => rows
                .iter()
                .filter(|r| r.season == Season::Regular(id) && !r.is_sub_row)
                .map(Cow::Borrowed)
                .collect(),
            (Some(label), Scope::AllTime) => {
                let seasons = self.franchises.filter_by_franchise(rows, label);
                career::aggregate_careers(seasons, role)
                    .into_iter()
                    .map(Cow::Owned)
                    .collect()
            }
            (Some(label), Scope::SingleSeason) => self
                .franchises
                .filter_by_franchise(rows, label)
                .into_iter()
                .map(Cow::Borrowed)
                .collect(),
            (Some(label), Scope::Season(id)) => self
                .franchises
                .filter_season(rows, label, id)
                .into_iter()
                .map(Cow::Borrowed)
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
