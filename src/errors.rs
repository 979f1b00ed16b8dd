use std::collections::BTreeMap;

use crate::gateway::GatewayError;

/// Per-field validation messages, keyed by field name. Validation
/// failures are resolved inline in the panels and never become fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, field: &str) {
        self.insert(field, "This field is required");
    }

    pub fn insert(&mut self, field: &str, message: &str) {
        self.fields.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug)]
pub enum AdminError {
    NotFound,
    Unauthorized,
    Validation(ValidationErrors),
    Persistence(String),
    Storage(String),
}

impl std::fmt::Display for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminError::NotFound => write!(f, "listing not found"),
            AdminError::Unauthorized => write!(f, "not authorized to access this listing"),
            AdminError::Validation(errors) => {
                write!(f, "validation failed for {} field(s)", errors.len())
            }
            AdminError::Persistence(err) => write!(f, "document store error: {}", err),
            AdminError::Storage(err) => write!(f, "blob store error: {}", err),
        }
    }
}

impl std::error::Error for AdminError {}

impl From<GatewayError> for AdminError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound => AdminError::NotFound,
            GatewayError::NotSignedIn => AdminError::Unauthorized,
            GatewayError::Persistence(msg) => AdminError::Persistence(msg),
            GatewayError::Storage(msg) => AdminError::Storage(msg),
        }
    }
}
