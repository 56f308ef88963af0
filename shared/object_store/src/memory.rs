//! In-memory [`ObjectStore`] used as a stand-in for S3 in tests

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::{ObjectRef, ObjectStore, StoreError, StoreResult};

/// In-memory store keyed by (bucket, key); writes overwrite unconditionally
#[derive(Default)]
pub struct InMemoryStore {
    objects: RwLock<HashMap<(String, String), Bytes>>,
}

impl InMemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object, bypassing the [`ObjectStore`] interface
    pub async fn insert(&self, reference: &ObjectRef, body: Bytes) {
        self.objects
            .write()
            .await
            .insert((reference.bucket.clone(), reference.key.clone()), body);
    }

    /// Returns the stored content for a reference, if any
    pub async fn content(&self, reference: &ObjectRef) -> Option<Bytes> {
        self.objects
            .read()
            .await
            .get(&(reference.bucket.clone(), reference.key.clone()))
            .cloned()
    }

    /// Number of objects currently held
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn get(&self, reference: &ObjectRef) -> StoreResult<Bytes> {
        self.content(reference)
            .await
            .ok_or_else(|| StoreError::NotFound {
                bucket: reference.bucket.clone(),
                key: reference.key.clone(),
            })
    }

    async fn put(
        &self,
        reference: &ObjectRef,
        body: Bytes,
        _content_type: Option<&str>,
    ) -> StoreResult<()> {
        self.insert(reference, body).await;
        Ok(())
    }
}
