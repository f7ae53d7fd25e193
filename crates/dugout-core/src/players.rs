// Player identity map and name lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dataset::DatasetError;
use crate::stats::PlayerId;

/// Name shown for ids missing from the identity map.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Display identity for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub current_name: String,
    /// Earlier names, kept in the order the dataset lists them.
    #[serde(default)]
    pub former_names: Vec<String>,
}

/// Older exports map ids straight to a name string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPlayer {
    Full(Player),
    Name(String),
}

impl From<RawPlayer> for Player {
    fn from(raw: RawPlayer) -> Self {
        match raw {
            RawPlayer::Full(player) => player,
            RawPlayer::Name(current_name) => Player {
                current_name,
                former_names: Vec::new(),
            },
        }
    }
}

/// All known players plus a case-insensitive index over current and former
/// names.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: HashMap<PlayerId, Player>,
    name_index: HashMap<String, PlayerId>,
}

impl PlayerDirectory {
    /// Build the directory and its name index.
    ///
    /// Current names always win over former names when two players share a
    /// name; among equal kinds, the lower id wins.
    pub fn new(players: HashMap<PlayerId, Player>) -> Self {
        let mut ids: Vec<PlayerId> = players.keys().copied().collect();
        ids.sort();

        let mut name_index = HashMap::new();
        for id in &ids {
            for name in &players[id].former_names {
                name_index.entry(name.to_lowercase()).or_insert(*id);
            }
        }
        let mut current: HashMap<String, PlayerId> = HashMap::new();
        for id in &ids {
            current
                .entry(players[id].current_name.to_lowercase())
                .or_insert(*id);
        }
        name_index.extend(current);

        Self {
            players,
            name_index,
        }
    }

    /// Parse the player identity map (`{"<id>": {currentName, formerNames?}}`).
    pub fn from_json(bytes: &[u8]) -> Result<Self, DatasetError> {
        let raw: HashMap<String, RawPlayer> =
            serde_json::from_slice(bytes).map_err(|source| DatasetError::Json {
                dataset: "players",
                source,
            })?;

        let mut players = HashMap::with_capacity(raw.len());
        for (key, player) in raw {
            let id = key
                .trim()
                .parse::<u32>()
                .map_err(|_| DatasetError::InvalidPlayerKey(key.clone()))?;
            players.insert(PlayerId(id), player.into());
        }
        Ok(Self::new(players))
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Current name for `id`, or [`UNKNOWN_PLAYER`].
    pub fn display_name(&self, id: PlayerId) -> &str {
        self.players
            .get(&id)
            .map(|p| p.current_name.as_str())
            .unwrap_or(UNKNOWN_PLAYER)
    }

    /// Resolve a current or former name, ignoring case and surrounding space.
    pub fn find_by_name(&self, name: &str) -> Option<PlayerId> {
        self.name_index.get(&name.trim().to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
