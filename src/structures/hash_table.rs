//! Separate-chaining hash table with string keys
//!
//! Keys hash with the classic `h * 31 + unit` fold over UTF-16 code units in
//! 32-bit wrapping arithmetic. Once the load factor exceeds the configured
//! threshold after an insert, the table doubles and rehashes every entry.

use super::Op;
use crate::config::EngineConfig;
use crate::engine::{Driver, Result, StateContainer, Visualization};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HashView {
    pub buckets: Vec<Vec<Entry>>,
    pub size: usize,
    pub collisions: usize,
    pub highlight_buckets: Vec<usize>,
    /// Keys of the highlighted entries
    pub highlight_keys: Vec<String>,
}

impl HashView {
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        if self.buckets.is_empty() {
            return 0.0;
        }
        self.size as f64 / self.capacity() as f64
    }
}

/// Bucket index of `key` in a table of `capacity` buckets
pub fn hash_key(key: &str, capacity: usize) -> usize {
    let hash = key
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs() as usize % capacity.max(1)
}

#[derive(Debug, Clone, Copy)]
pub struct HashTableFamily;

impl Visualization for HashTableFamily {
    type Kind = Op;
    type Snapshot = HashView;
    type Output = ();
    type Solution = ();
    type View = HashView;
}

pub struct HashTableDriver {
    threshold: f64,
    state: StateContainer<HashTableFamily>,
}

impl HashTableDriver {
    pub fn new(capacity: usize) -> Self {
        Self::build(capacity, &EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self::build(config.hash_capacity, config)
    }

    fn build(capacity: usize, config: &EngineConfig) -> Self {
        let view = HashView {
            buckets: vec![Vec::new(); capacity.max(1)],
            ..Default::default()
        };
        HashTableDriver {
            threshold: config.load_factor_threshold,
            state: StateContainer::new(view, config.delay),
        }
    }

    pub fn view(&self) -> &HashView {
        self.state.view()
    }

    pub fn size(&self) -> usize {
        self.view().size
    }

    pub fn capacity(&self) -> usize {
        self.view().capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.view().load_factor()
    }

    pub fn collisions(&self) -> usize {
        self.view().collisions
    }

    /// Insert or overwrite `key`. Always succeeds.
    pub async fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        let run = self.state.continue_run();
        let bucket = self.hash_step(key);
        self.state.wait(&run).await?;

        let view = self.state.view_mut();
        let chain = &mut view.buckets[bucket];
        let op = match chain.iter().position(|e| e.key == key) {
            Some(index) => {
                chain[index].value = value.to_string();
                Op::Update
            }
            None => {
                if !chain.is_empty() {
                    view.collisions += 1;
                }
                chain.push(Entry {
                    key: key.to_string(),
                    value: value.to_string(),
                });
                view.size += 1;
                Op::Insert
            }
        };
        view.highlight_keys = vec![key.to_string()];
        let description = match op {
            Op::Update => format!("Update \"{}\" in bucket {}", key, bucket),
            _ => format!("Add \"{}\" to bucket {}", key, bucket),
        };
        self.record(op, description);
        self.state.wait(&run).await?;

        if self.load_factor() > self.threshold {
            let from = self.capacity();
            self.record(
                Op::Resize,
                format!("Load factor {:.2} exceeds {}", self.load_factor(), self.threshold),
            );
            self.rehash(from * 2);
            self.record(Op::Resize, format!("Resized from {} to {} buckets", from, from * 2));
            self.state.wait(&run).await?;
        }

        self.done(format!("Set \"{}\"", key));
        Ok(true)
    }

    pub async fn get(&mut self, key: &str) -> Result<Option<String>> {
        let run = self.state.continue_run();
        let bucket = self.hash_step(key);
        self.state.wait(&run).await?;

        let found = self.view().buckets[bucket]
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.clone());
        match &found {
            Some(_) => {
                self.state.view_mut().highlight_keys = vec![key.to_string()];
                self.record(Op::Found, format!("Found \"{}\" in bucket {}", key, bucket));
                self.state.wait(&run).await?;
            }
            None => {
                self.state.view_mut().highlight_buckets.clear();
                self.record(Op::NotFound, format!("\"{}\" is not in the table", key));
            }
        }
        self.done(format!("Lookup of \"{}\" finished", key));
        Ok(found)
    }

    /// Returns `false` when the key is absent
    pub async fn delete(&mut self, key: &str) -> Result<bool> {
        let run = self.state.continue_run();
        let bucket = self.hash_step(key);
        self.state.wait(&run).await?;

        let Some(index) = self.view().buckets[bucket].iter().position(|e| e.key == key) else {
            self.state.view_mut().highlight_buckets.clear();
            self.record(Op::NotFound, format!("\"{}\" is not in the table", key));
            self.done(format!("Nothing to delete for \"{}\"", key));
            return Ok(false);
        };

        self.state.view_mut().highlight_keys = vec![key.to_string()];
        self.record(Op::Delete, format!("Delete \"{}\" from bucket {}", key, bucket));
        self.state.wait(&run).await?;

        let view = self.state.view_mut();
        view.buckets[bucket].remove(index);
        view.size -= 1;
        if !view.buckets[bucket].is_empty() {
            view.collisions = view.collisions.saturating_sub(1);
        }
        view.highlight_keys.clear();
        self.record(Op::Done, format!("Removed \"{}\" from bucket {}", key, bucket));
        self.done(format!("Deleted \"{}\"", key));
        Ok(true)
    }

    /// Drop every entry, keeping the current capacity
    pub fn clear(&mut self) {
        self.state.continue_run();
        let view = self.state.view_mut();
        for chain in &mut view.buckets {
            chain.clear();
        }
        view.size = 0;
        view.collisions = 0;
        view.highlight_buckets.clear();
        view.highlight_keys.clear();
        self.record(Op::Clear, "Table cleared".to_string());
        self.done("Table cleared".to_string());
    }

    fn hash_step(&mut self, key: &str) -> usize {
        let bucket = hash_key(key, self.capacity());
        let view = self.state.view_mut();
        view.highlight_buckets = vec![bucket];
        view.highlight_keys.clear();
        self.record(Op::Hash, format!("hash(\"{}\") = {}", key, bucket));
        bucket
    }

    /// Move every entry into a table of `capacity` buckets, recounting collisions
    fn rehash(&mut self, capacity: usize) {
        let view = self.state.view_mut();
        let old = std::mem::replace(&mut view.buckets, vec![Vec::new(); capacity]);
        view.collisions = 0;
        for entry in old.into_iter().flatten() {
            let chain = &mut view.buckets[hash_key(&entry.key, capacity)];
            if !chain.is_empty() {
                view.collisions += 1;
            }
            chain.push(entry);
        }
        view.highlight_buckets.clear();
        view.highlight_keys.clear();
    }

    fn record(&mut self, op: Op, description: String) {
        let snapshot = self.state.view().clone();
        self.state.add_step(op, 0, snapshot, description, None);
    }

    fn done(&mut self, message: String) {
        let view = self.state.view_mut();
        view.highlight_buckets.clear();
        view.highlight_keys.clear();
        self.state.finish(None, message);
    }
}

impl Driver for HashTableDriver {
    type Family = HashTableFamily;

    fn container(&self) -> &StateContainer<HashTableFamily> {
        &self.state
    }

    fn container_mut(&mut self) -> &mut StateContainer<HashTableFamily> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> HashTableDriver {
        HashTableDriver::with_config(&EngineConfig::instant())
    }

    #[test]
    fn test_hash_key() {
        assert_eq!(hash_key("", 8), 0);
        assert_eq!(hash_key("a", 8), 97 % 8);
        // 97 * 31 + 98
        assert_eq!(hash_key("ab", 16), 3105 % 16);
    }

    #[test]
    fn test_hash_key_wraps() {
        let long = "z".repeat(64);
        assert!(hash_key(&long, 13) < 13);
    }

    #[tokio::test]
    async fn test_set_get_update() {
        let mut t = table();
        t.set("apple", "red").await.unwrap();
        t.set("apple", "green").await.unwrap();

        assert_eq!(t.size(), 1);
        assert_eq!(t.get("apple").await.unwrap(), Some("green".to_string()));
        assert_eq!(t.get("pear").await.unwrap(), None);

        let state = t.get_state();
        assert_eq!(state.log.count_kind(Op::Insert), 1);
        assert_eq!(state.log.count_kind(Op::Update), 1);
    }

    #[tokio::test]
    async fn test_collisions_tracked() {
        let mut t = HashTableDriver::new(1);
        t.set_delay(std::time::Duration::ZERO);
        t.set("a", "1").await.unwrap();
        assert_eq!(t.collisions(), 0);
        assert_eq!(t.capacity(), 2);

        // 'a' (97) and 'e' (101) share a bucket at capacity 2 and 4
        t.set("e", "5").await.unwrap();
        assert_eq!(t.capacity(), 4);
        assert_eq!(t.collisions(), 1);
        assert!(t.delete("a").await.unwrap());
        assert_eq!(t.collisions(), 0);
        assert!(!t.delete("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_keeps_capacity() {
        let mut t = table();
        t.set("k", "v").await.unwrap();
        t.clear();
        assert_eq!(t.size(), 0);
        assert_eq!(t.capacity(), 8);
        assert_eq!(t.get_state().log.current_step().map(|s| s.kind), Some(Op::Clear));
    }
}
