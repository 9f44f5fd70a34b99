use crate::normalize::name_key;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Row fields a provider may carry its display name under, in preference order
pub const NAME_FIELDS: [&str; 3] = ["name", "player_name", "full_name"];

/// A provider identifier value
///
/// Providers disagree on native types for the same namespace (Sleeper ships
/// `espn_id` as a number, FantasyPros as a string), so both are accepted and
/// compared through their string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Number(serde_json::Number),
    Text(String),
}

impl ExternalId {
    /// Identifier from a raw JSON value; anything but a string or number is no identifier
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Some(ExternalId::Number(number.clone())),
            Value::String(text) => Some(ExternalId::Text(text.clone())),
            _ => None,
        }
    }

    /// String form used as an index key, or `None` when the value is blank
    pub fn as_key(&self) -> Option<String> {
        let key = match self {
            ExternalId::Number(number) => number.to_string(),
            ExternalId::Text(text) => text.trim().to_string(),
        };

        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

impl From<&str> for ExternalId {
    fn from(value: &str) -> Self {
        ExternalId::Text(value.to_string())
    }
}

impl From<String> for ExternalId {
    fn from(value: String) -> Self {
        ExternalId::Text(value)
    }
}

impl From<u64> for ExternalId {
    fn from(value: u64) -> Self {
        ExternalId::Number(value.into())
    }
}

/// A malformed identifier makes its tier unavailable instead of failing the row
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<ExternalId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ExternalId::from_value(&Value::deserialize(deserializer)?))
}

/// Secondary identifiers shared by canonical players and provider rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalIds {
    /// NFL Game Statistics & Information System ID (e.g., "00-0036900")
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub gsis_id: Option<ExternalId>,

    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub espn_id: Option<ExternalId>,

    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub yahoo_id: Option<ExternalId>,

    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub rotowire_id: Option<ExternalId>,

    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub rotoworld_id: Option<ExternalId>,
}

impl ExternalIds {
    /// Pick identifiers out of a raw row, ignoring values of the wrong type
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let id = |key: &str| fields.get(key).and_then(ExternalId::from_value);
        Self {
            gsis_id: id("gsis_id"),
            espn_id: id("espn_id"),
            yahoo_id: id("yahoo_id"),
            rotowire_id: id("rotowire_id"),
            rotoworld_id: id("rotoworld_id"),
        }
    }

    /// Identifier stored for a tier (`None` for the name tier)
    pub fn get(&self, method: MatchMethod) -> Option<&ExternalId> {
        match method {
            MatchMethod::GsisId => self.gsis_id.as_ref(),
            MatchMethod::EspnId => self.espn_id.as_ref(),
            MatchMethod::YahooId => self.yahoo_id.as_ref(),
            MatchMethod::RotowireId => self.rotowire_id.as_ref(),
            MatchMethod::RotoworldId => self.rotoworld_id.as_ref(),
            MatchMethod::Name => None,
        }
    }

    /// Usable key for a tier, if the identifier is present and non-blank
    pub fn key(&self, method: MatchMethod) -> Option<String> {
        self.get(method).and_then(ExternalId::as_key)
    }
}

/// The authoritative player record, keyed by Sleeper player ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPlayer {
    /// Sleeper player ID (e.g., "6794")
    pub player_id: String,

    #[serde(flatten)]
    pub ids: ExternalIds,

    /// Sleeper's precomputed search name (e.g., "justinjefferson")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_full_name: Option<String>,

    /// Everything else the source carried (name, position, team, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalPlayer {
    /// Create a player with no secondary identifiers
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            ids: ExternalIds::default(),
            search_full_name: None,
            extra: Map::new(),
        }
    }

    /// Key this player contributes to a tier's index table
    pub fn identity_key(&self, method: MatchMethod) -> Option<String> {
        match method {
            MatchMethod::Name => name_key(self.search_full_name.as_deref()),
            _ => self.ids.key(method),
        }
    }
}

/// A provider row (projection, ranking, stat line) to be reconciled
///
/// Decoding never fails: `name` and `ids` are read out of the row where they
/// are usable and left empty where they are not. The row itself is kept
/// verbatim and is what the record serializes as.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForeignRecord {
    /// Display name as the provider spells it (first non-blank of [`NAME_FIELDS`])
    pub name: Option<String>,

    pub ids: ExternalIds,

    /// The provider row exactly as received
    pub row: Value,
}

impl ForeignRecord {
    pub fn from_row(row: Value) -> Self {
        let (name, ids) = match &row {
            Value::Object(fields) => (display_name(fields), ExternalIds::from_fields(fields)),
            _ => (None, ExternalIds::default()),
        };
        Self { name, ids, row }
    }

    /// Key this record offers for a tier
    pub fn identity_key(&self, method: MatchMethod) -> Option<String> {
        match method {
            MatchMethod::Name => name_key(self.name.as_deref()),
            _ => self.ids.key(method),
        }
    }
}

fn display_name(fields: &Map<String, Value>) -> Option<String> {
    NAME_FIELDS
        .iter()
        .filter_map(|key| fields.get(*key)?.as_str())
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

impl Serialize for ForeignRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.row.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ForeignRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_row)
    }
}

/// Identity tier that resolved a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    GsisId,
    EspnId,
    YahooId,
    RotowireId,
    RotoworldId,
    Name,
}

impl MatchMethod {
    /// Tiers in matching order, most trusted first
    pub const PRIORITY: [MatchMethod; 6] = [
        MatchMethod::GsisId,
        MatchMethod::EspnId,
        MatchMethod::YahooId,
        MatchMethod::RotowireId,
        MatchMethod::RotoworldId,
        MatchMethod::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::GsisId => "gsis_id",
            MatchMethod::EspnId => "espn_id",
            MatchMethod::YahooId => "yahoo_id",
            MatchMethod::RotowireId => "rotowire_id",
            MatchMethod::RotoworldId => "rotoworld_id",
            MatchMethod::Name => "name",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of matching a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult<'a> {
    Matched { player_id: &'a str, method: MatchMethod },
    Unmatched,
}

impl MatchResult<'_> {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }
}

/// A provider row resolved onto a canonical player
///
/// Serializes as `{"sleeper_id", "match_method", "record"}` with the provider
/// row nested under `record`, so no provider field can shadow the resolved
/// key. The key is not called `player_id` because FantasyPros already uses
/// that field for its own FPID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedRecord {
    pub sleeper_id: String,
    pub match_method: MatchMethod,
    pub record: ForeignRecord,
}
