use serde::{Deserialize, Serialize};

/// A locally selected file that has not been uploaded yet.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }
}

/// An image slot is either a pending local file or a URL already
/// resolved by the blob store. The discriminant is explicit rather than
/// inferred from the value shape.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub enum ImageSlot {
    Pending(LocalFile),
    Persisted(String),
}

impl ImageSlot {
    pub fn is_pending(&self) -> bool {
        matches!(self, ImageSlot::Pending(_))
    }

    /// The resolved URL, if this slot has been persisted.
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageSlot::Persisted(url) => Some(url.as_str()),
            ImageSlot::Pending(_) => None,
        }
    }
}
