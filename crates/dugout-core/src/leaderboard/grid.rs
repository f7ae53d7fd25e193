// All scopes for one stat: All-Time, Single Season, then every season.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tracing::debug;

use super::{LeaderboardBuilder, LeaderboardQuery, LeaderboardResult, Scope};

/// Results keyed by scope, plus the order cards are shown in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardGrid {
    results: HashMap<Scope, LeaderboardResult>,
    display_order: Vec<Scope>,
}

impl LeaderboardGrid {
    pub fn get(&self, scope: Scope) -> Option<&LeaderboardResult> {
        self.results.get(&scope)
    }

    /// `All-Time`, `Single Season`, then seasons newest first.
    pub fn display_order(&self) -> &[Scope] {
        &self.display_order
    }

    pub fn iter(&self) -> impl Iterator<Item = (Scope, &LeaderboardResult)> {
        self.display_order
            .iter()
            .filter_map(|scope| self.results.get(scope).map(|r| (*scope, r)))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn insert(&mut self, result: LeaderboardResult) {
        self.display_order.push(result.scope);
        self.results.insert(result.scope, result);
    }
}

impl Serialize for LeaderboardGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(scope, result)| (scope.key(), result)))
    }
}

/// Runs one query across every scope the league has.
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardGridAssembler<'a> {
    builder: LeaderboardBuilder<'a>,
}

impl<'a> LeaderboardGridAssembler<'a> {
    pub fn new(builder: LeaderboardBuilder<'a>) -> Self {
        Self { builder }
    }

    /// Build every card. An unknown stat yields an empty grid.
    pub fn build_grid(&self, query: &LeaderboardQuery) -> LeaderboardGrid {
        let mut grid = LeaderboardGrid::default();
        let Some(definition) = self.builder.catalog().definition(&query.stat, query.role) else {
            debug!("unknown {} stat `{}`, empty grid", query.role, query.stat);
            return grid;
        };

        let seasons = self.builder.snapshot().seasons().seasons_newest_first();
        let scopes = [Scope::AllTime, Scope::SingleSeason]
            .into_iter()
            .chain(seasons.into_iter().map(Scope::Season));
        for scope in scopes {
            grid.insert(self.builder.build_with(&definition, query, scope));
        }
        grid
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
