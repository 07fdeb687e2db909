use dynasty_engine::{PlayerStatRecord, PlayerStats, Position};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A player record as emitted by a source adapter, before normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlayerRecord {
    /// Source player id; some sources send it as a number
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,

    pub name: Option<String>,

    /// Offensive adapters report the position directly
    pub position: Option<String>,

    /// Defensive adapters report the fantasy position (DL/LB/DB)
    pub fantasy_position: Option<String>,

    /// Raw roster position (DE, OLB, FS, ...)
    pub espn_position: Option<String>,

    pub age: Option<u32>,

    pub team: Option<String>,
    pub team_abbr: Option<String>,

    /// Unknown stat names are ignored
    pub stats: PlayerStats,
}

/// Why a raw record did not make it into the registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    #[error("record has no player id")]
    MissingId,

    #[error("record {id} has no position")]
    MissingPosition { id: String },

    #[error("record {id} has unsupported position {position}")]
    UnknownPosition { id: String, position: String },
}

impl RawPlayerRecord {
    /// Convert into an engine record. Records without an id or with a position outside the
    /// modeled set are rejected.
    pub fn normalize(self) -> Result<PlayerStatRecord, RecordRejection> {
        let id = non_empty(self.id).ok_or(RecordRejection::MissingId)?;

        let code = non_empty(self.fantasy_position)
            .or_else(|| non_empty(self.position))
            .or_else(|| non_empty(self.espn_position))
            .ok_or_else(|| RecordRejection::MissingPosition { id: id.clone() })?;

        let position = normalize_position(&code)
            .ok_or_else(|| RecordRejection::UnknownPosition { id: id.clone(), position: code })?;

        let name = non_empty(self.name).unwrap_or_else(|| "Unknown".to_string());

        Ok(PlayerStatRecord {
            id,
            name,
            position,
            age: self.age,
            team: non_empty(self.team).or_else(|| non_empty(self.team_abbr)),
            stats: self.stats,
        })
    }
}

/// Map a roster position onto the fantasy positions the engine models.
///
/// Defensive roster positions collapse into DL, LB and DB. Everything else must already be a
/// fantasy position (FB, P, LS, ... are not modeled).
pub fn normalize_position(code: &str) -> Option<Position> {
    match code.trim().to_ascii_uppercase().as_str() {
        "DE" | "DT" | "NT" | "DL" => Some(Position::DL),
        "LB" | "ILB" | "OLB" | "MLB" => Some(Position::LB),
        "CB" | "S" | "FS" | "SS" | "DB" => Some(Position::DB),
        "PK" => Some(Position::K),
        other => Position::parse(other),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(value)) => Ok(Some(value)),
        Some(serde_json::Value::Number(value)) => Ok(Some(value.to_string())),
        _ => Ok(None),
    }
}
