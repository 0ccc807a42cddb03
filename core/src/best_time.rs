use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::convert::Infallible;
use core::fmt;
use serde::Serialize;
use serde_json::Value;

use crate::*;

/// Names the storage key a persisted type lives under.
pub trait StorageKey {
    const KEY: &'static str;
}

/// Minimal string key-value persistence provided by the host.
pub trait KeyValueStore {
    type Error: fmt::Display;

    fn get(&self, key: &str) -> core::result::Result<Option<String>, Self::Error>;

    fn set(&mut self, key: &str, value: String) -> core::result::Result<(), Self::Error>;
}

/// In-memory store, for tests and hosts without persistence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> core::result::Result<Option<String>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> core::result::Result<(), Self::Error> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Fastest recorded win per difficulty, in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BestTimes {
    beginner: Option<u32>,
    intermediate: Option<u32>,
    expert: Option<u32>,
}

impl BestTimes {
    pub const fn get(&self, difficulty: Difficulty) -> Option<u32> {
        use Difficulty::*;
        match difficulty {
            Beginner => self.beginner,
            Intermediate => self.intermediate,
            Expert => self.expert,
        }
    }

    fn slot_mut(&mut self, difficulty: Difficulty) -> &mut Option<u32> {
        use Difficulty::*;
        match difficulty {
            Beginner => &mut self.beginner,
            Intermediate => &mut self.intermediate,
            Expert => &mut self.expert,
        }
    }

    /// Records `secs` if it beats the current entry, returning whether it did.
    pub fn improve(&mut self, difficulty: Difficulty, secs: u32) -> bool {
        let slot = self.slot_mut(difficulty);
        match *slot {
            Some(best) if best <= secs => false,
            _ => {
                *slot = Some(secs);
                true
            }
        }
    }

    /// Reads the persisted JSON object. Anything unreadable becomes "no record", per difficulty
    /// where possible.
    pub fn decode(text: &str) -> Self {
        let mut times = Self::default();

        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Discarding unreadable best times: {}", err);
                return times;
            }
        };
        let Some(entries) = value.as_object() else {
            log::warn!("Discarding best times, expected an object but got {}", value);
            return times;
        };

        for difficulty in Difficulty::ALL {
            match entries.get(difficulty.name()) {
                None | Some(Value::Null) => {}
                Some(entry) => match entry.as_u64().and_then(|secs| u32::try_from(secs).ok()) {
                    Some(secs) => *times.slot_mut(difficulty) = Some(secs),
                    None => log::warn!("Discarding best time for {}: {}", difficulty, entry),
                },
            }
        }

        times
    }
}

impl StorageKey for BestTimes {
    const KEY: &'static str = "sweeper:best-times";
}

/// Best times backed by a [`KeyValueStore`], loaded once and rewritten in full on every improvement.
#[derive(Clone, Debug)]
pub struct BestTimeStore<S> {
    store: S,
    times: BestTimes,
}

impl<S: KeyValueStore> BestTimeStore<S> {
    pub fn load(store: S) -> Self {
        let times = match store.get(BestTimes::KEY) {
            Ok(Some(text)) => BestTimes::decode(&text),
            Ok(None) => BestTimes::default(),
            Err(err) => {
                log::warn!("Could not read best times: {}", err);
                BestTimes::default()
            }
        };
        log::debug!("Loaded best times: {:?}", times);
        Self { store, times }
    }

    pub fn best(&self, difficulty: Difficulty) -> Option<u32> {
        self.times.get(difficulty)
    }

    pub fn times(&self) -> &BestTimes {
        &self.times
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Keeps `secs` only when there is no record yet or it is strictly faster. A failed write is
    /// logged; the improved time is kept in memory either way.
    pub fn offer(&mut self, difficulty: Difficulty, secs: u32) -> bool {
        if !self.times.improve(difficulty, secs) {
            return false;
        }
        log::info!("New best time for {}: {}s", difficulty, secs);

        match serde_json::to_string(&self.times) {
            Ok(text) => {
                if let Err(err) = self.store.set(BestTimes::KEY, text) {
                    log::error!("Could not save best times: {}", err);
                }
            }
            Err(err) => log::error!("Could not encode best times: {}", err),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(store: &MemoryStore) -> Option<String> {
        store.get(BestTimes::KEY).unwrap()
    }

    #[test]
    fn missing_record_loads_empty() {
        let times = BestTimeStore::load(MemoryStore::new());
        assert_eq!(times.times(), &BestTimes::default());
    }

    #[test]
    fn corrupt_record_loads_empty() {
        for text in ["not json", "[1, 2]", "42", ""] {
            let times = BestTimeStore::load(MemoryStore::with_entry(BestTimes::KEY, text));
            assert_eq!(times.times(), &BestTimes::default(), "{text}");
        }
    }

    #[test]
    fn bad_entry_only_drops_that_difficulty() {
        let text = r#"{"beginner": 31, "intermediate": "fast", "expert": -4}"#;
        let times = BestTimeStore::load(MemoryStore::with_entry(BestTimes::KEY, text));

        assert_eq!(times.best(Difficulty::Beginner), Some(31));
        assert_eq!(times.best(Difficulty::Intermediate), None);
        assert_eq!(times.best(Difficulty::Expert), None);
    }

    #[test]
    fn first_offer_is_recorded_and_persisted() {
        let mut times = BestTimeStore::load(MemoryStore::new());

        assert!(times.offer(Difficulty::Expert, 300));
        assert_eq!(times.best(Difficulty::Expert), Some(300));
        assert_eq!(
            stored(times.store()).as_deref(),
            Some(r#"{"beginner":null,"intermediate":null,"expert":300}"#)
        );
    }

    #[test]
    fn only_strictly_faster_times_replace_record() {
        let mut times = BestTimeStore::load(MemoryStore::new());
        times.offer(Difficulty::Beginner, 50);
        let persisted = stored(times.store());

        assert!(!times.offer(Difficulty::Beginner, 50));
        assert!(!times.offer(Difficulty::Beginner, 51));
        assert_eq!(stored(times.store()), persisted);

        assert!(times.offer(Difficulty::Beginner, 49));
        assert_eq!(times.best(Difficulty::Beginner), Some(49));
    }

    #[test]
    fn persisted_record_survives_reload() {
        let mut times = BestTimeStore::load(MemoryStore::new());
        times.offer(Difficulty::Intermediate, 120);
        times.offer(Difficulty::Beginner, 9);

        let reloaded = BestTimeStore::load(times.into_store());
        assert_eq!(reloaded.best(Difficulty::Intermediate), Some(120));
        assert_eq!(reloaded.best(Difficulty::Beginner), Some(9));
        assert_eq!(reloaded.best(Difficulty::Expert), None);
    }

    #[test]
    fn keys_follow_difficulty_names() {
        let value = serde_json::to_value(BestTimes::default()).unwrap();
        let object = value.as_object().unwrap();
        for difficulty in Difficulty::ALL {
            assert!(object.contains_key(difficulty.name()));
        }
    }
}
