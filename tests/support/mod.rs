//! Shared test doubles for pipeline integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use jokebox::cache::{DistributedCache, TierError};
use jokebox::storage::{ObjectEntry, ObjectStream, OriginError, OriginStore};

/// In-memory origin store that counts enumerations and object fetches.
pub struct CountingOriginStore {
    objects: Vec<(String, Bytes, Option<String>)>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl CountingOriginStore {
    pub fn new(objects: Vec<(&str, &[u8], Option<&str>)>) -> Self {
        let mut objects: Vec<(String, Bytes, Option<String>)> = objects
            .into_iter()
            .map(|(name, bytes, content_type)| {
                (
                    name.to_string(),
                    Bytes::copy_from_slice(bytes),
                    content_type.map(str::to_string),
                )
            })
            .collect();
        objects.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            objects,
            list_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OriginStore for CountingOriginStore {
    async fn list(&self, _bucket: &str) -> Result<Vec<ObjectEntry>, OriginError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .objects
            .iter()
            .map(|(name, bytes, content_type)| ObjectEntry {
                name: name.clone(),
                size: bytes.len() as u64,
                content_type: content_type.clone(),
            })
            .collect())
    }

    async fn fetch(&self, _bucket: &str, name: &str) -> Result<ObjectStream, OriginError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let Some((_, bytes, _)) = self.objects.iter().find(|(object, ..)| object == name) else {
            return Err(OriginError::fetch(name, "object not present"));
        };
        let chunk = bytes.clone();
        Ok(Box::pin(stream::once(async move {
            Ok::<_, OriginError>(chunk)
        })))
    }
}

/// Map-backed distributed tier whose reads and writes can be failed
/// independently.
#[derive(Default)]
pub struct FakeSharedCache {
    entries: Mutex<HashMap<String, String>>,
    failing_reads: AtomicBool,
    failing_writes: AtomicBool,
}

impl FakeSharedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl DistributedCache for FakeSharedCache {
    async fn get(&self, key: &str) -> Result<Option<String>, TierError> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(TierError::transport("distributed tier unreachable"));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String, _ttl: Duration) -> Result<(), TierError> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(TierError::transport("distributed tier unreachable"));
        }
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

/// Distributed tier that never answers within any sane budget.
pub struct StalledSharedCache;

#[async_trait]
impl DistributedCache for StalledSharedCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, TierError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), TierError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// Poll until `condition` holds, giving background population tasks a
/// chance to run.
pub async fn wait_for(condition: impl Fn() -> bool, what: &str) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for {what}");
}
