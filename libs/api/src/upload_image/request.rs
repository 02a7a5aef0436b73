use serde::Deserialize;
use utoipa::ToSchema;

/// JSON form of an upload. At least one field must be set.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UploadRequest {
    /// Image data, optionally as a `data:` URL
    pub base64: Option<String>,
    /// Remote image for the store to fetch
    pub url: Option<String>,
}

impl UploadRequest {
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, str::is_empty);
        blank(&self.base64) && blank(&self.url)
    }
}
