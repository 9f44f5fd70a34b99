use crate::types::{CanonicalPlayer, MatchMethod};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Identity Index - lookup tables from every identity tier to Sleeper IDs
///
/// Built once per ingestion run from a consistent snapshot of canonical
/// players and dropped when the run finishes.
#[derive(Debug, Clone, Default)]
pub struct IdentityIndex {
    /// One table per tier: identity key -> Sleeper player ID
    tables: HashMap<MatchMethod, HashMap<String, String>>,

    /// Number of players the index was built from
    player_count: usize,

    /// Overwritten entries per tier
    collisions: BTreeMap<MatchMethod, usize>,
}

/// Summary of a built index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub players: usize,
    pub entries: BTreeMap<MatchMethod, usize>,
    pub collisions: BTreeMap<MatchMethod, usize>,
}

impl IndexStats {
    pub fn total_collisions(&self) -> usize {
        self.collisions.values().sum()
    }
}

impl IdentityIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from canonical players
    ///
    /// Players sharing a key within one tier resolve to whichever comes
    /// last in `players`. Overwrites are counted in [`IndexStats::collisions`].
    pub fn build(players: &[CanonicalPlayer]) -> Self {
        let mut index = Self::new();
        for player in players {
            index.insert(player);
        }
        index.player_count = players.len();

        let stats = index.stats();
        info!(
            "Built identity index from {} players ({} entries, {} collisions)",
            stats.players,
            stats.entries.values().sum::<usize>(),
            stats.total_collisions()
        );

        index
    }

    fn insert(&mut self, player: &CanonicalPlayer) {
        for method in MatchMethod::PRIORITY {
            if let Some(key) = player.identity_key(method) {
                self.insert_key(method, key, &player.player_id);
            }
        }
    }

    fn insert_key(&mut self, method: MatchMethod, key: String, player_id: &str) {
        match self.tables.entry(method).or_default().entry(key) {
            Entry::Occupied(mut slot) => {
                if slot.get() != player_id {
                    let previous = slot.insert(player_id.to_string());
                    *self.collisions.entry(method).or_default() += 1;
                    debug!(
                        "Identity collision on {} '{}': {} replaces {}",
                        method,
                        slot.key(),
                        player_id,
                        previous
                    );
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(player_id.to_string());
            }
        }
    }

    /// Look up a Sleeper ID by tier and already-coerced key
    pub fn lookup(&self, method: MatchMethod, key: &str) -> Option<&str> {
        if key.is_empty() {
            return None;
        }
        self.tables.get(&method)?.get(key).map(String::as_str)
    }

    /// Number of keys in a tier's table
    pub fn len(&self, method: MatchMethod) -> usize {
        self.tables.get(&method).map_or(0, HashMap::len)
    }

    /// Check if no tier holds any key
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(HashMap::is_empty)
    }

    /// Number of players the index was built from
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            players: self.player_count,
            entries: MatchMethod::PRIORITY.iter().map(|&method| (method, self.len(method))).collect(),
            collisions: self.collisions.clone(),
        }
    }
}
