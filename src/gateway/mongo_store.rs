use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use std::sync::Arc;
use uuid::Uuid;

use crate::gateway::{CollectionPath, DocumentStore, GatewayError};

/// Document store backed by a managed MongoDB deployment. Listing
/// subcollections are flattened into dotted collection names with a
/// `parent_id` discriminator field.
pub struct MongoDocumentStore {
    client: Arc<Client>,
    database: String,
}

impl MongoDocumentStore {
    pub fn new(client: Arc<Client>, database: &str) -> Self {
        Self {
            client,
            database: database.to_string(),
        }
    }

    fn collection(&self, path: &CollectionPath) -> Collection<Document> {
        let name = match path {
            CollectionPath::Top(name) => name.clone(),
            CollectionPath::Sub {
                collection, child, ..
            } => format!("{}.{}", collection, child),
        };
        self.client.database(&self.database).collection(&name)
    }

    fn scope(&self, path: &CollectionPath, mut filter: Document) -> Document {
        if let CollectionPath::Sub { parent_id, .. } = path {
            filter.insert("parent_id", parent_id.as_str());
        }
        filter
    }

    fn brand(&self, path: &CollectionPath, mut doc: Document) -> Document {
        if let CollectionPath::Sub { parent_id, .. } = path {
            doc.insert("parent_id", parent_id.as_str());
        }
        doc
    }
}

fn persistence_err(err: mongodb::error::Error) -> GatewayError {
    GatewayError::Persistence(err.to_string())
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn set(
        &self,
        path: &CollectionPath,
        id: &str,
        mut doc: Document,
    ) -> Result<(), GatewayError> {
        doc.insert("id", id);
        let doc = self.brand(path, doc);
        self.collection(path)
            .replace_one(self.scope(path, doc! { "id": id }), doc)
            .upsert(true)
            .await
            .map_err(persistence_err)?;
        Ok(())
    }

    async fn create(&self, path: &CollectionPath, mut doc: Document) -> Result<String, GatewayError> {
        let id = Uuid::new_v4().simple().to_string();
        doc.insert("id", id.as_str());
        let doc = self.brand(path, doc);
        self.collection(path)
            .insert_one(doc)
            .await
            .map_err(persistence_err)?;
        Ok(id)
    }

    async fn patch(
        &self,
        path: &CollectionPath,
        id: &str,
        fields: Document,
    ) -> Result<(), GatewayError> {
        let result = self
            .collection(path)
            .update_one(self.scope(path, doc! { "id": id }), doc! { "$set": fields })
            .await
            .map_err(persistence_err)?;
        if result.matched_count == 0 {
            return Err(GatewayError::NotFound);
        }
        Ok(())
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, GatewayError> {
        self.collection(path)
            .find_one(self.scope(path, doc! { "id": id }))
            .await
            .map_err(persistence_err)
    }

    async fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, GatewayError> {
        let mut cursor = self
            .collection(path)
            .find(self.scope(path, doc! {}))
            .await
            .map_err(persistence_err)?;
        let mut docs = Vec::new();
        while let Some(doc) = cursor.try_next().await.map_err(persistence_err)? {
            docs.push(doc);
        }
        Ok(docs)
    }

    async fn query_by_owner(
        &self,
        path: &CollectionPath,
        user_id: &str,
    ) -> Result<Vec<Document>, GatewayError> {
        let mut cursor = self
            .collection(path)
            .find(self.scope(path, doc! { "owner_user_id": user_id }))
            .await
            .map_err(persistence_err)?;
        let mut docs = Vec::new();
        while let Some(doc) = cursor.try_next().await.map_err(persistence_err)? {
            docs.push(doc);
        }
        Ok(docs)
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), GatewayError> {
        self.collection(path)
            .delete_one(self.scope(path, doc! { "id": id }))
            .await
            .map_err(persistence_err)?;
        Ok(())
    }
}
