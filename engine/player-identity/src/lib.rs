//! Player Identity - Reconciles provider player rows onto Sleeper player IDs
//!
//! Provider rows (FantasyPros projections, rankings, stat lines) identify
//! players by a mix of external IDs and display names. This crate builds
//! lookup tables from the canonical Sleeper player set and resolves each
//! row through a fixed priority of identity tiers, falling back to a
//! normalized name.

pub mod error;
pub mod index;
pub mod matcher;
pub mod normalize;
pub mod source;
pub mod types;


pub use error::{IdentityError, Result};
pub use index::{IdentityIndex, IndexStats};
pub use matcher::{match_record, match_records, MatchOutcome, MatchStats};
pub use normalize::{normalize, normalize_str};
pub use source::{parse_players, parse_records};
pub use types::{
    CanonicalPlayer, ExternalId, ExternalIds, ForeignRecord, MatchMethod, MatchResult,
    MatchedRecord,
};
