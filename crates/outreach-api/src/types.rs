//! Backend API request and response records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated outreach message with its checklist state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageHistoryItem {
    /// Message record id.
    pub id: String,
    /// Id of the contact the message targets, used for status updates.
    pub contact_id: String,
    /// Contact's full name.
    pub target_name: String,
    /// Contact's role or title.
    pub target_role: String,
    /// Contact's LinkedIn profile URL.
    pub linkedin_url: String,
    /// Contact's company, if known.
    #[serde(default)]
    pub company: Option<String>,
    /// The goal the message was generated for.
    #[serde(default)]
    pub goal_prompt: Option<String>,
    /// The generated message text.
    pub generated_message: String,
    /// When the message was generated.
    pub created_at: DateTime<Utc>,
    /// Whether the user has reached out to this contact.
    #[serde(default)]
    pub contacted: bool,
    /// Whether the contact has replied.
    #[serde(default)]
    pub replied: bool,
}

/// Inputs for message generation.
///
/// Field length caps match what the backend enforces; callers validate
/// before sending so the user gets an inline message instead of a 422.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub target_name: String,
    pub target_role: String,
    pub linkedin_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_post: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_notes: Option<String>,
    pub goal_prompt: String,
}

/// Partial checklist update for a contact.
///
/// Only the provided fields change; the other flag keeps its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactStatusUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied: Option<bool>,
}

impl ContactStatusUpdate {
    /// Update only the contacted flag.
    pub fn contacted(value: bool) -> Self {
        Self {
            contacted: Some(value),
            replied: None,
        }
    }

    /// Update only the replied flag.
    pub fn replied(value: bool) -> Self {
        Self {
            contacted: None,
            replied: Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_item_deserializes_with_missing_flags() {
        // Rows created before checklist tracking have no flags
        let json = r#"{
            "id": "msg-1",
            "contact_id": "contact-1",
            "target_name": "Ada Lovelace",
            "target_role": "Engineer",
            "linkedin_url": "https://www.linkedin.com/in/ada",
            "generated_message": "Hi Ada!",
            "created_at": "2024-01-15T10:00:00Z"
        }"#;

        let item: MessageHistoryItem = serde_json::from_str(json).unwrap();
        assert!(!item.contacted);
        assert!(!item.replied);
        assert!(item.company.is_none());
    }

    #[test]
    fn test_generate_request_skips_empty_optionals() {
        let request = GenerateRequest {
            target_name: "Ada Lovelace".to_string(),
            target_role: "Engineer".to_string(),
            linkedin_url: "https://www.linkedin.com/in/ada".to_string(),
            company: None,
            experiences: None,
            education: None,
            recent_post: None,
            other_notes: None,
            goal_prompt: "Ask about mentorship".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("company").is_none());
        assert!(json.get("experiences").is_none());
        assert_eq!(json["target_name"], "Ada Lovelace");
    }

    #[test]
    fn test_contact_status_update_serializes_only_set_field() {
        let update = ContactStatusUpdate::contacted(true);
        let json = serde_json::to_value(update).unwrap();
        assert_eq!(json, serde_json::json!({"contacted": true}));

        let update = ContactStatusUpdate::replied(false);
        let json = serde_json::to_value(update).unwrap();
        assert_eq!(json, serde_json::json!({"replied": false}));
    }
}
