//! Bounded, deduplicating recency list of search terms with durable persistence.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use gitsearch_logging::{gs_debug, gs_error, gs_info, gs_warn};
use serde::{Deserialize, Serialize};

use crate::{DurableStore, HistoryError};

/// Key under which the history payload is kept in the durable store.
pub const HISTORY_KEY: &str = "history";
pub const DEFAULT_CAPACITY: usize = 50;

/// Wall-clock source in milliseconds since the Unix epoch.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp_millis())
}

/// A single remembered search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    text: String,
    #[serde(rename = "timestamp")]
    inserted_at_millis: i64,
}

impl SearchEntry {
    fn new(text: &str, inserted_at_millis: i64) -> Self {
        Self {
            text: text.to_string(),
            inserted_at_millis,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn inserted_at_millis(&self) -> i64 {
        self.inserted_at_millis
    }
}

/// Plain transfer form of the store. Unused capacity is kept as `None` slots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub list: Vec<Option<SearchEntry>>,
}

impl HistorySnapshot {
    pub fn encode(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(payload: &str) -> Result<Self, HistoryError> {
        Ok(serde_json::from_str(payload)?)
    }
}

pub struct HistoryStore<S: DurableStore> {
    slots: VecDeque<Option<SearchEntry>>,
    capacity: usize,
    store: S,
    clock: Clock,
}

impl<S: DurableStore> HistoryStore<S> {
    pub fn open(store: S, capacity: usize) -> Self {
        Self::open_with_clock(store, capacity, system_clock())
    }

    /// Loads persisted history from `store`, falling back to an empty list when the
    /// payload is absent, unreadable or malformed.
    pub fn open_with_clock(store: S, capacity: usize, clock: Clock) -> Self {
        let capacity = capacity.max(1);
        let slots = match load_snapshot(&store) {
            Ok(Some(snapshot)) => {
                let slots = slots_from_snapshot(snapshot, capacity);
                gs_info!(
                    "Loaded {} history entries",
                    slots.iter().filter(|slot| slot.is_some()).count()
                );
                slots
            }
            Ok(None) => empty_slots(capacity),
            Err(err) => {
                gs_warn!("Discarding persisted history: {}", err);
                empty_slots(capacity)
            }
        };

        Self {
            slots,
            capacity,
            store,
            clock,
        }
    }

    /// Records `text` as the most recent search and persists the list.
    pub fn insert(&mut self, text: &str) {
        self.slots
            .retain(|slot| slot.as_ref().map_or(true, |entry| entry.text != text));
        self.slots
            .push_front(Some(SearchEntry::new(text, (self.clock)())));
        self.slots.truncate(self.capacity);
        self.commit();
    }

    /// Populated entries, most recent first.
    pub fn retrieve(&self) -> Vec<SearchEntry> {
        self.slots.iter().flatten().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn to_serializable(&self) -> HistorySnapshot {
        HistorySnapshot {
            list: self.slots.iter().cloned().collect(),
        }
    }

    /// Builds a store from a snapshot without reading `store`; the snapshot is
    /// written back on the next `insert`.
    pub fn from_serializable(snapshot: HistorySnapshot, store: S, capacity: usize) -> Self {
        Self::from_serializable_with_clock(snapshot, store, capacity, system_clock())
    }

    pub fn from_serializable_with_clock(
        snapshot: HistorySnapshot,
        store: S,
        capacity: usize,
        clock: Clock,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: slots_from_snapshot(snapshot, capacity),
            capacity,
            store,
            clock,
        }
    }

    fn commit(&mut self) {
        let payload = match self.to_serializable().encode() {
            Ok(payload) => payload,
            Err(err) => {
                gs_error!("Failed to serialize search history: {}", err);
                return;
            }
        };
        if let Err(err) = self.store.set(HISTORY_KEY, &payload) {
            gs_error!("Failed to persist search history: {}", err);
        }
    }
}

impl<S: DurableStore> fmt::Debug for HistoryStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("capacity", &self.capacity)
            .field("entries", &self.retrieve())
            .finish()
    }
}

fn load_snapshot<S: DurableStore>(store: &S) -> Result<Option<HistorySnapshot>, HistoryError> {
    match store.get(HISTORY_KEY)? {
        Some(payload) => Ok(Some(HistorySnapshot::decode(&payload)?)),
        None => Ok(None),
    }
}

fn empty_slots(capacity: usize) -> VecDeque<Option<SearchEntry>> {
    let mut slots = VecDeque::with_capacity(capacity);
    slots.resize(capacity, None);
    slots
}

/// Placeholders are dropped, later duplicates of a term are ignored and the result is
/// cut to `capacity`, then padded with empty slots.
fn slots_from_snapshot(
    snapshot: HistorySnapshot,
    capacity: usize,
) -> VecDeque<Option<SearchEntry>> {
    let mut slots: VecDeque<Option<SearchEntry>> = VecDeque::with_capacity(capacity);
    for entry in snapshot.list.into_iter().flatten() {
        if slots.len() == capacity {
            break;
        }
        let seen = slots
            .iter()
            .flatten()
            .any(|existing| existing.text == entry.text);
        if seen {
            gs_debug!("Dropping duplicate history entry {:?}", entry.text);
            continue;
        }
        slots.push_back(Some(entry));
    }
    slots.resize(capacity, None);
    slots
}
