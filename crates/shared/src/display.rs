//! Display values handed from the view model to whatever renders them.

use serde::{Deserialize, Serialize};

use crate::domain::UserRecord;

pub const FALLBACK_IMAGE_URL: &str =
    "https://cdn1.iconfinder.com/data/icons/user-fill-icons-set/144/User003_Error-512.png";
pub const FALLBACK_EMAIL: &str = "No user found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    pub image_url: String,
    pub email: String,
}

impl DisplayPayload {
    /// Payload shown when no user could be fetched.
    pub fn fallback() -> Self {
        Self {
            image_url: FALLBACK_IMAGE_URL.to_string(),
            email: FALLBACK_EMAIL.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.image_url == FALLBACK_IMAGE_URL && self.email == FALLBACK_EMAIL
    }
}

impl From<&UserRecord> for DisplayPayload {
    fn from(record: &UserRecord) -> Self {
        Self {
            image_url: record.avatar_url.clone(),
            email: record.email.clone(),
        }
    }
}

/// Projects a fetch result into what the view shows. Any error collapses
/// into [`DisplayPayload::fallback`].
pub fn project<E>(outcome: &Result<UserRecord, E>) -> DisplayPayload {
    match outcome {
        Ok(record) => DisplayPayload::from(record),
        Err(_) => DisplayPayload::fallback(),
    }
}
