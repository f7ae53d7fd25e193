// Dataset parsing and the immutable league snapshot the engine queries.
//
// Stat tables arrive either as an array of row objects or in the compact
// columnar form `{columns: [...], data: [[...], ...]}`. Both are normalized
// here, once, into typed `StatRow`s.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::career;
use crate::players::PlayerDirectory;
use crate::stats::{PlayerId, Role, Season, SeasonId, SeasonInfo, StatRow};

/// Column some exports use for the player id in either table.
const GENERIC_ID_COLUMN: &str = "Player ID";

/// Fields that identify a row rather than measure it.
const IDENTITY_FIELDS: &[&str] = &[
    "Season",
    "Team",
    "Hitter ID",
    "Pitcher ID",
    GENERIC_ID_COLUMN,
    "isSubRow",
    "is_sub_row",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to parse {dataset} dataset: {source}")]
    Json {
        dataset: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("player map key `{0}` is not an integer id")]
    InvalidPlayerKey(String),

    #[error("{dataset} table has no `{column}` column")]
    MissingIdColumn {
        dataset: &'static str,
        column: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Table parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawStatTable {
    Compact {
        columns: Vec<String>,
        data: Vec<Vec<Value>>,
    },
    Records(Vec<Map<String, Value>>),
}

/// Expand the compact columnar encoding into row objects. Short data rows
/// leave trailing columns absent; extra cells are ignored.
pub fn expand_compact(columns: &[String], data: Vec<Vec<Value>>) -> Vec<Map<String, Value>> {
    data.into_iter()
        .map(|cells| {
            columns
                .iter()
                .cloned()
                .zip(cells)
                .collect::<Map<String, Value>>()
        })
        .collect()
}

/// Parse and normalize one stat table.
///
/// Rows without a usable player id or season are skipped with a warning.
/// Structural problems (not JSON, wrong shape, no id column at all) fail
/// the whole table.
pub fn parse_stat_table(bytes: &[u8], role: Role, dataset: &'static str) -> Result<Vec<StatRow>, DatasetError> {
    let raw: RawStatTable =
        serde_json::from_slice(bytes).map_err(|source| DatasetError::Json { dataset, source })?;

    let records = match raw {
        RawStatTable::Compact { columns, data } => {
            if !data.is_empty() && !has_id_column(columns.iter().map(String::as_str), role) {
                return Err(DatasetError::MissingIdColumn {
                    dataset,
                    column: role.id_column(),
                });
            }
            expand_compact(&columns, data)
        }
        RawStatTable::Records(records) => {
            if let Some(first) = records.first() {
                if !has_id_column(first.keys().map(String::as_str), role) {
                    return Err(DatasetError::MissingIdColumn {
                        dataset,
                        column: role.id_column(),
                    });
                }
            }
            records
        }
    };

    let mut rows = Vec::with_capacity(records.len());
    let mut dropped_fields = 0usize;
    for (index, record) in records.iter().enumerate() {
        match normalize_row(record, role, &mut dropped_fields) {
            Ok(row) => rows.push(row),
            Err(reason) => warn!("skipping {dataset} row {index}: {reason}"),
        }
    }
    if dropped_fields > 0 {
        warn!("dropped {dropped_fields} non-numeric stat fields from {dataset} table");
    }
    info!("parsed {} {dataset} rows", rows.len());
    Ok(rows)
}

fn has_id_column<'a>(mut columns: impl Iterator<Item = &'a str>, role: Role) -> bool {
    columns.any(|c| c == role.id_column() || c == GENERIC_ID_COLUMN)
}

/// Build a typed row from one record, materializing derived fields.
fn normalize_row(record: &Map<String, Value>, role: Role, dropped: &mut usize) -> Result<StatRow, String> {
    let id_value = record
        .get(role.id_column())
        .or_else(|| record.get(GENERIC_ID_COLUMN))
        .ok_or_else(|| format!("missing `{}`", role.id_column()))?;
    let player_id = parse_player_id(id_value).ok_or_else(|| format!("invalid player id {id_value}"))?;

    let season = match record.get("Season") {
        Some(Value::String(s)) => Season::from_str(s).map_err(|e| e.to_string())?,
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(|n| Season::Regular(SeasonId(n)))
            .ok_or_else(|| format!("invalid season {n}"))?,
        Some(other) => return Err(format!("invalid season {other}")),
        None => return Err("missing `Season`".to_string()),
    };

    let mut row = StatRow::new(player_id, season);
    if let Some(Value::String(team)) = record.get("Team") {
        let team = team.trim();
        if !team.is_empty() {
            row = row.with_team(team);
        }
    }
    if record
        .get("isSubRow")
        .or_else(|| record.get("is_sub_row"))
        .is_some_and(truthy)
    {
        row = row.as_sub_row();
    }

    for (key, value) in record {
        if IDENTITY_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) if v.is_finite() => row.insert_stat(key.as_str(), v),
                _ => *dropped += 1,
            },
            Value::Null => {}
            other => {
                debug!("dropping non-numeric field `{key}` = {other}");
                *dropped += 1;
            }
        }
    }

    // Ground outs are exported split by side.
    let ground_outs = row.counting("LGO") + row.counting("RGO");
    row.insert_stat("GO", ground_outs);

    Ok(row)
}

fn parse_player_id(value: &Value) -> Option<PlayerId> {
    let id = match value {
        Value::Number(n) => match n.as_u64() {
            Some(id) => id,
            None => {
                let f = n.as_f64()?;
                if f < 0.0 || f.fract() != 0.0 {
                    return None;
                }
                f as u64
            }
        },
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u32::try_from(id).ok().map(PlayerId)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

/// Parse the season length map (`{"S1": 30, ...}`).
pub fn parse_seasons(bytes: &[u8]) -> Result<SeasonInfo, DatasetError> {
    serde_json::from_slice(bytes).map_err(|source| DatasetError::Json {
        dataset: "seasons",
        source,
    })
}

fn parse_opaque(bytes: &[u8], dataset: &'static str) -> Result<Value, DatasetError> {
    serde_json::from_slice(bytes).map_err(|source| DatasetError::Json { dataset, source })
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Raw bytes of every dataset, as fetched.
#[derive(Debug, Clone, Default)]
pub struct RawDatasets {
    pub hitting: Vec<u8>,
    pub pitching: Vec<u8>,
    pub players: Vec<u8>,
    pub seasons: Vec<u8>,
    pub scouting: Vec<u8>,
    pub glossary: Option<Vec<u8>>,
}

/// Everything the engine reads, fully loaded and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct LeagueSnapshot {
    hitting: Vec<StatRow>,
    pitching: Vec<StatRow>,
    players: PlayerDirectory,
    seasons: SeasonInfo,
    scouting: Value,
    glossary: Option<Value>,
}

impl LeagueSnapshot {
    /// Assemble a snapshot, synthesizing career rows for any table that
    /// ships without them.
    pub fn new(
        mut hitting: Vec<StatRow>,
        mut pitching: Vec<StatRow>,
        players: PlayerDirectory,
        seasons: SeasonInfo,
    ) -> Self {
        career::ensure_career_rows(&mut hitting, Role::Hitting);
        career::ensure_career_rows(&mut pitching, Role::Pitching);
        Self {
            hitting,
            pitching,
            players,
            seasons,
            scouting: Value::Null,
            glossary: None,
        }
    }

    pub fn with_scouting(mut self, scouting: Value) -> Self {
        self.scouting = scouting;
        self
    }

    pub fn with_glossary(mut self, glossary: Value) -> Self {
        self.glossary = Some(glossary);
        self
    }

    /// Parse every dataset. A glossary that fails to parse is dropped with
    /// a warning; any other failure is fatal.
    pub fn from_raw(raw: &RawDatasets) -> Result<Self, DatasetError> {
        let hitting = parse_stat_table(&raw.hitting, Role::Hitting, "hitting")?;
        let pitching = parse_stat_table(&raw.pitching, Role::Pitching, "pitching")?;
        let players = PlayerDirectory::from_json(&raw.players)?;
        let seasons = parse_seasons(&raw.seasons)?;
        let scouting = parse_opaque(&raw.scouting, "scouting")?;

        let mut snapshot = Self::new(hitting, pitching, players, seasons).with_scouting(scouting);
        if let Some(bytes) = &raw.glossary {
            match parse_opaque(bytes, "glossary") {
                Ok(glossary) => snapshot = snapshot.with_glossary(glossary),
                Err(e) => warn!("ignoring glossary: {e}"),
            }
        }

        info!(
            "snapshot ready: {} hitting rows, {} pitching rows, {} players, {} seasons",
            snapshot.hitting.len(),
            snapshot.pitching.len(),
            snapshot.players.len(),
            snapshot.seasons.len()
        );
        Ok(snapshot)
    }

    pub fn rows(&self, role: Role) -> &[StatRow] {
        match role {
            Role::Hitting => &self.hitting,
            Role::Pitching => &self.pitching,
        }
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    pub fn seasons(&self) -> &SeasonInfo {
        &self.seasons
    }

    pub fn scouting(&self) -> &Value {
        &self.scouting
    }

    pub fn glossary(&self) -> Option<&Value> {
        self.glossary.as_ref()
    }

    /// A player's rows for `role`: seasons in order (stints after their
    /// season's main row), then the career line.
    pub fn player_rows(&self, id: PlayerId, role: Role) -> Vec<&StatRow> {
        let mut rows: Vec<&StatRow> = self.rows(role).iter().filter(|r| r.player_id == id).collect();
        rows.sort_by_key(|r| (r.season.id().map_or(u32::MAX, |s| s.number()), r.is_sub_row));
        rows
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn compact_and_record_tables_normalize_identically() {
        let compact = bytes(json!({
            "columns": ["Season", "Team", "Hitter ID", "HR", "AVG"],
            "data": [["S1", "TEX", 7, 12, 0.301]]
        }));
        let records = bytes(json!([
            {"Season": "S1", "Team": "TEX", "Hitter ID": 7, "HR": 12, "AVG": 0.301}
        ]));
        let a = parse_stat_table(&compact, Role::Hitting, "hitting").unwrap();
        let b = parse_stat_table(&records, Role::Hitting, "hitting").unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].player_id, PlayerId(7));
        assert_eq!(a[0].team.as_deref(), Some("TEX"));
        assert_eq!(a[0].stat("HR"), Some(12.0));
    }

    #[test]
    fn short_compact_rows_leave_fields_absent() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let rows = expand_compact(&columns, vec![vec![json!(1)], vec![json!(1), json!(2), json!(3)]]);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 2);
    }

    #[test]
    fn ground_outs_materialized_from_sides() {
        let table = bytes(json!([
            {"Season": "S2", "Pitcher ID": 3, "LGO": 4, "RGO": 5},
            {"Season": "S2", "Pitcher ID": 4}
        ]));
        let rows = parse_stat_table(&table, Role::Pitching, "pitching").unwrap();
        assert_eq!(rows[0].stat("GO"), Some(9.0));
        assert_eq!(rows[1].stat("GO"), Some(0.0));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let table = bytes(json!([
            {"Season": "S1", "Hitter ID": 1, "HR": 1},
            {"Season": "bogus", "Hitter ID": 2},
            {"Season": "S1"},
            {"Season": "Career", "Hitter ID": 1, "HR": 1, "Name": "x", "WAR": null}
        ]));
        let rows = parse_stat_table(&table, Role::Hitting, "hitting").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].season.is_career());
        assert_eq!(rows[1].stat("Name"), None);
        assert_eq!(rows[1].stat("WAR"), None);
    }

    #[test]
    fn sub_row_flag_accepts_bool_or_number() {
        let table = bytes(json!([
            {"Season": "S1", "Hitter ID": 1, "isSubRow": true},
            {"Season": "S1", "Hitter ID": 1, "is_sub_row": 1},
            {"Season": "S1", "Hitter ID": 1, "isSubRow": 0}
        ]));
        let rows = parse_stat_table(&table, Role::Hitting, "hitting").unwrap();
        let flags: Vec<bool> = rows.iter().map(|r| r.is_sub_row).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn float_and_string_ids_accepted() {
        assert_eq!(parse_player_id(&json!(12.0)), Some(PlayerId(12)));
        assert_eq!(parse_player_id(&json!("12")), Some(PlayerId(12)));
        assert_eq!(parse_player_id(&json!(1.5)), None);
        assert_eq!(parse_player_id(&json!(-1)), None);
    }

    #[test]
    fn missing_id_column_is_fatal() {
        let table = bytes(json!({"columns": ["Season", "HR"], "data": [["S1", 1]]}));
        let err = parse_stat_table(&table, Role::Pitching, "pitching").unwrap_err();
        assert!(matches!(err, DatasetError::MissingIdColumn { column: "Pitcher ID", .. }));
    }

    #[test]
    fn generic_id_column_fallback() {
        let table = bytes(json!([{"Season": "S1", "Player ID": 5, "W": 2}]));
        let rows = parse_stat_table(&table, Role::Pitching, "pitching").unwrap();
        assert_eq!(rows[0].player_id, PlayerId(5));
    }

    #[test]
    fn not_a_table_is_a_json_error() {
        let err = parse_stat_table(b"{\"nope\": 1}", Role::Hitting, "hitting").unwrap_err();
        assert!(matches!(err, DatasetError::Json { dataset: "hitting", .. }));
    }

    fn raw() -> RawDatasets {
        RawDatasets {
            hitting: bytes(json!([
                {"Season": "S1", "Team": "TEX", "Hitter ID": 1, "HR": 3, "PA": 10},
                {"Season": "S2", "Team": "CLE", "Hitter ID": 1, "HR": 4, "PA": 12}
            ])),
            pitching: bytes(json!([])),
            players: bytes(json!({"1": {"currentName": "Ada", "formerNames": ["Ace"]}})),
            seasons: bytes(json!({"S1": 20, "S2": 24})),
            scouting: bytes(json!({"1": {"note": "x"}})),
            glossary: Some(b"not json".to_vec()),
        }
    }

    #[test]
    fn snapshot_synthesizes_careers_and_tolerates_bad_glossary() {
        let snapshot = LeagueSnapshot::from_raw(&raw()).unwrap();
        let career: Vec<&StatRow> = snapshot
            .rows(Role::Hitting)
            .iter()
            .filter(|r| r.season.is_career())
            .collect();
        assert_eq!(career.len(), 1);
        assert_eq!(career[0].stat("HR"), Some(7.0));
        assert!(snapshot.glossary().is_none());
        assert_eq!(snapshot.seasons().games_in(SeasonId(2)), Some(24));
        assert!(snapshot.rows(Role::Pitching).is_empty());
    }

    #[test]
    fn player_rows_end_with_career() {
        let snapshot = LeagueSnapshot::from_raw(&raw()).unwrap();
        let rows = snapshot.player_rows(PlayerId(1), Role::Hitting);
        let seasons: Vec<String> = rows.iter().map(|r| r.season.to_string()).collect();
        assert_eq!(seasons, vec!["S1", "S2", "Career"]);
    }

    #[test]
    fn bad_seasons_map_is_fatal() {
        let mut datasets = raw();
        datasets.seasons = bytes(json!({"opening": 20}));
        let err = LeagueSnapshot::from_raw(&datasets).unwrap_err();
        assert!(matches!(err, DatasetError::Json { dataset: "seasons", .. }));
    }
}
