//! In-memory gateway doubles used by the test suite. They mirror the
//! behavior of the managed backend closely enough for the wizard and
//! sub-entity flows to be exercised end to end.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bson::Document;
use uuid::Uuid;

use crate::gateway::{
    BlobStore, CollectionPath, DocumentStore, GatewayError, IdentityProvider, SessionUser,
};

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Document>>>,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, for commit-ordering tests.
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), GatewayError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(GatewayError::Persistence("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn set(
        &self,
        path: &CollectionPath,
        id: &str,
        mut doc: Document,
    ) -> Result<(), GatewayError> {
        self.check_writable()?;
        doc.insert("id", id);
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(path.key())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn create(&self, path: &CollectionPath, mut doc: Document) -> Result<String, GatewayError> {
        self.check_writable()?;
        let id = Uuid::new_v4().simple().to_string();
        doc.insert("id", id.as_str());
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(path.key())
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    async fn patch(
        &self,
        path: &CollectionPath,
        id: &str,
        fields: Document,
    ) -> Result<(), GatewayError> {
        self.check_writable()?;
        let mut collections = self.collections.lock().unwrap();
        let doc = collections
            .get_mut(&path.key())
            .and_then(|coll| coll.get_mut(id))
            .ok_or(GatewayError::NotFound)?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, GatewayError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(&path.key())
            .and_then(|coll| coll.get(id))
            .cloned())
    }

    async fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, GatewayError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(&path.key())
            .map(|coll| coll.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn query_by_owner(
        &self,
        path: &CollectionPath,
        user_id: &str,
    ) -> Result<Vec<Document>, GatewayError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(&path.key())
            .map(|coll| {
                coll.values()
                    .filter(|doc| doc.get_str("owner_user_id") == Ok(user_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), GatewayError> {
        self.check_writable()?;
        let mut collections = self.collections.lock().unwrap();
        if let Some(coll) = collections.get_mut(&path.key()) {
            coll.remove(id);
        }
        Ok(())
    }
}

pub struct MemoryBlobStore {
    base_url: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    deleted: Mutex<Vec<String>>,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            base_url: "https://storage.example.com/test-bucket".to_string(),
            objects: Mutex::new(HashMap::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }

    pub fn contains_url(&self, url: &str) -> bool {
        match self.path_for_url(url) {
            Some(path) => self.contains(&path),
            None => false,
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Every path a delete was issued for, in order.
    pub fn deleted_paths(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), GatewayError> {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes);
        Ok(())
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn path_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/", self.base_url))
            .map(str::to_string)
    }

    async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        self.deleted.lock().unwrap().push(path.to_string());
        match self.objects.lock().unwrap().remove(path) {
            Some(_) => Ok(()),
            None => Err(GatewayError::Storage(format!("no object at {}", path))),
        }
    }
}

pub struct MemoryIdentity {
    user: Mutex<Option<SessionUser>>,
}

impl MemoryIdentity {
    /// A provider with `user_id` already signed in.
    pub fn signed_in(user_id: &str) -> Self {
        Self {
            user: Mutex::new(Some(SessionUser {
                user_id: user_id.to_string(),
                email: None,
                display_name: None,
            })),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: Mutex::new(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn current_user(&self) -> Result<SessionUser, GatewayError> {
        self.user
            .lock()
            .unwrap()
            .clone()
            .ok_or(GatewayError::NotSignedIn)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<SessionUser, GatewayError> {
        let user = SessionUser {
            user_id: format!("user-{}", email),
            email: Some(email.to_string()),
            display_name: None,
        };
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}
