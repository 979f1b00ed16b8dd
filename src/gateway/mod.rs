use async_trait::async_trait;
use bson::Document;

pub mod gcs_store;
pub mod memory;
pub mod mongo_store;

/// Address of a keyed collection in the document store: either a
/// top-level listing collection or a per-listing subcollection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectionPath {
    Top(String),
    Sub {
        collection: String,
        parent_id: String,
        child: String,
    },
}

impl CollectionPath {
    pub fn top(name: &str) -> Self {
        CollectionPath::Top(name.to_string())
    }

    pub fn sub(collection: &str, parent_id: &str, child: &str) -> Self {
        CollectionPath::Sub {
            collection: collection.to_string(),
            parent_id: parent_id.to_string(),
            child: child.to_string(),
        }
    }

    pub fn key(&self) -> String {
        match self {
            CollectionPath::Top(name) => name.clone(),
            CollectionPath::Sub {
                collection,
                parent_id,
                child,
            } => format!("{}/{}/{}", collection, parent_id, child),
        }
    }
}

#[derive(Debug)]
pub enum GatewayError {
    NotFound,
    NotSignedIn,
    Persistence(String),
    Storage(String),
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::NotFound => write!(f, "document not found"),
            GatewayError::NotSignedIn => write!(f, "no user is signed in"),
            GatewayError::Persistence(err) => write!(f, "document store error: {}", err),
            GatewayError::Storage(err) => write!(f, "blob store error: {}", err),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Remote document database. Documents carry their own `id` field;
/// owner queries filter on `owner_user_id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or fully replace the document stored under `id`.
    async fn set(&self, path: &CollectionPath, id: &str, doc: Document)
        -> Result<(), GatewayError>;

    /// Store a document under a generated id and return that id.
    async fn create(&self, path: &CollectionPath, doc: Document) -> Result<String, GatewayError>;

    /// Merge `fields` into the document stored under `id`.
    async fn patch(
        &self,
        path: &CollectionPath,
        id: &str,
        fields: Document,
    ) -> Result<(), GatewayError>;

    async fn get(&self, path: &CollectionPath, id: &str)
        -> Result<Option<Document>, GatewayError>;

    async fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, GatewayError>;

    async fn query_by_owner(
        &self,
        path: &CollectionPath,
        user_id: &str,
    ) -> Result<Vec<Document>, GatewayError>;

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), GatewayError>;
}

/// Remote binary object storage, keyed by path.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), GatewayError>;

    /// Public URL a stored object resolves to.
    fn url_for(&self, path: &str) -> String;

    /// Reverse of `url_for`; `None` when the URL does not belong to
    /// this store.
    fn path_for_url(&self, url: &str) -> Option<String>;

    async fn delete(&self, path: &str) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Hosted identity service. The wizard only ever consumes the user id
/// for ownership checks.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Result<SessionUser, GatewayError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, GatewayError>;

    async fn sign_out(&self) -> Result<(), GatewayError>;
}
