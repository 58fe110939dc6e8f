//! HTTP client for the outreach backend.

use crate::{BackendError, BackendResult, ContactStatusUpdate, GenerateRequest, MessageHistoryItem};
use reqwest::Client;
use tracing::{debug, warn};

/// ColdConnect backend client.
///
/// Holds no session state; callers pass the access token of the session
/// they hold. The dashboard is the only caller, so every token here comes
/// from an admitted, confirmed session.
pub struct BackendClient {
    http_client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for a backend at the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the user's message history, newest first.
    pub async fn fetch_history(&self, access_token: &str) -> BackendResult<Vec<MessageHistoryItem>> {
        let url = format!("{}/history", self.base_url);

        debug!(url = %url, "Fetching message history");

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status = status, body = %body, "History fetch failed");
            return Err(BackendError::Status { status, body });
        }

        let items: Vec<MessageHistoryItem> = response.json().await?;
        debug!(count = items.len(), "Fetched message history");

        Ok(items)
    }

    /// Generate an outreach message for a contact.
    pub async fn generate(
        &self,
        access_token: &str,
        request: &GenerateRequest,
    ) -> BackendResult<MessageHistoryItem> {
        let url = format!("{}/generate", self.base_url);

        debug!(url = %url, target_name = %request.target_name, "Generating message");

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status = status, body = %body, "Message generation failed");
            return Err(BackendError::Status { status, body });
        }

        let item: MessageHistoryItem = response.json().await?;
        debug!(message_id = %item.id, "Message generated");

        Ok(item)
    }

    /// Update a contact's checklist flags.
    pub async fn update_contact_status(
        &self,
        access_token: &str,
        contact_id: &str,
        update: &ContactStatusUpdate,
    ) -> BackendResult<()> {
        let url = format!("{}/contacts/{}/status", self.base_url, contact_id);

        debug!(url = %url, contact_id = %contact_id, "Updating contact status");

        let response = self
            .http_client
            .patch(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(update)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status = status, contact_id = %contact_id, "Contact status update failed");
            return Err(BackendError::Status { status, body });
        }

        Ok(())
    }
}
