//! Waste-report drafts and the checks that must pass before any write is
//! issued: required title and location, and the 5 MiB photo ceiling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo: Option<PhotoAttachment>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhotoAttachment {
    pub file_name: String,
    pub size_bytes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please fill in title and location")]
    MissingRequiredFields,
    #[error("please select a photo under 5MB")]
    PhotoTooLarge,
}

pub fn validate(draft: &ReportDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() || draft.location.trim().is_empty() {
        return Err(ValidationError::MissingRequiredFields);
    }
    if let Some(photo) = &draft.photo {
        if photo.size_bytes > MAX_PHOTO_BYTES {
            return Err(ValidationError::PhotoTooLarge);
        }
    }
    Ok(())
}

/// Storage object name for an attached photo: `<user_id>/<millis>.<ext>`.
/// The upload itself belongs to the hosted storage layer; only the name is
/// recorded on the report row.
pub fn photo_storage_name(user_id: &str, file_name: &str, now_millis: i64) -> String {
    let ext = file_name.rsplit('.').next().unwrap_or("jpg");
    format!("{user_id}/{now_millis}.{ext}")
}
