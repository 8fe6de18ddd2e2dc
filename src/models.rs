use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const MIN_TEXT_LEN: usize = 3;
pub const MAX_TEXT_LEN: usize = 50;

/// A stored keyword and how many alerts it has triggered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Keyword {
    /// Storage-assigned identifier, opaque to clients
    pub id: String,
    pub text: String,
    #[serde(rename = "alertCount")]
    pub alert_count: i64,
}

impl Keyword {
    /// A fresh record with a generated id and no alerts
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            alert_count: 0,
        }
    }
}

/// Request body for POST /api/keywords
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateKeywordRequest {
    pub text: Option<String>,
}

impl CreateKeywordRequest {
    /// Returns the keyword text if it is present and 3 to 50 UTF-16 code units long
    pub fn into_text(self) -> Result<String, ApiError> {
        match self.text {
            Some(text) if (MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&text.encode_utf16().count()) => {
                Ok(text)
            }
            _ => Err(ApiError::InvalidKeywordText),
        }
    }
}
