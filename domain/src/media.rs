use time::OffsetDateTime;

use crate::error::{DomainError, DomainResult};
use crate::user::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaAssetId(pub i64);

impl MediaAssetId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub id: MediaAssetId,
    pub owner: UserId,
    pub filename: String,
    pub content_type: String,
    pub url: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaAsset {
    pub owner: UserId,
    pub filename: String,
    pub content_type: String,
    pub url: String,
}

/// Identifier the generation engine hands back for a finished video.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedAssetRef(String);

impl GeneratedAssetRef {
    pub fn new(reference: impl Into<String>) -> DomainResult<Self> {
        let reference = reference.into();
        let trimmed = reference.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidAssetReference(
                "reference is empty".to_string(),
            ));
        }

        if trimmed.contains(['/', '?', '#']) {
            return Err(DomainError::InvalidAssetReference(format!(
                "reference '{trimmed}' contains URL delimiters"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where generated assets become publicly reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocation {
    base_url: String,
    extension: String,
    content_type: String,
}

impl AssetLocation {
    pub fn new(
        base_url: impl Into<String>,
        extension: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            extension: extension.into(),
            content_type: content_type.into(),
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn url_for(&self, reference: &GeneratedAssetRef) -> String {
        format!(
            "{}/{}.{}",
            self.base_url.trim_end_matches('/'),
            reference.as_str(),
            self.extension.trim_start_matches('.')
        )
    }

    pub fn new_asset(&self, owner: UserId, reference: &GeneratedAssetRef) -> NewMediaAsset {
        NewMediaAsset {
            owner,
            filename: reference.as_str().to_string(),
            content_type: self.content_type.clone(),
            url: self.url_for(reference),
        }
    }
}
