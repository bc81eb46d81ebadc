use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, AdminResult};

/// A registered bot instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub id: String,
    pub token: String,
    pub username: String,
    pub client_name: String,
    pub channel_id: String,
    pub channel_name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Request body for registering a bot.
///
/// Identifier, flags and timestamps are assigned by the registry; any such
/// fields in the payload are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewBot {
    pub token: String,
    pub username: String,
    pub client_name: String,
    pub channel_id: String,
    pub channel_name: String,
    pub description: String,
}

impl NewBot {
    pub fn validate(&self) -> AdminResult<()> {
        if self.token.trim().is_empty() {
            return Err(AdminError::InvalidInput("token is required".to_string()));
        }
        if self.channel_id.trim().is_empty() {
            return Err(AdminError::InvalidInput("channel_id is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_token_and_channel() {
        let mut input = NewBot {
            token: "123:abc".to_string(),
            channel_id: "-100200".to_string(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        input.channel_id = "  ".to_string();
        assert!(matches!(input.validate(), Err(AdminError::InvalidInput(_))));

        input.channel_id = "-100200".to_string();
        input.token = String::new();
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "token is required");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let input: NewBot =
            serde_json::from_str(r#"{"token": "t", "id": "client-chosen"}"#).unwrap();
        assert_eq!(input.token, "t");
        assert!(input.username.is_empty());
        assert!(input.channel_id.is_empty());
    }
}
