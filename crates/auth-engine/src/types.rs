//! Normalized session and user records.
//!
//! The `Raw*` structs mirror GoTrue wire payloads and stay private to this
//! crate. Conversion into the public records happens exactly once, right
//! after deserialization, so malformed provider data is caught at the
//! facade boundary.

use crate::{AuthError, AuthResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A linked identity on the user's account (email, oauth provider, etc).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identity id assigned by the provider.
    pub id: String,
    /// Provider name ("email", "google", ...).
    pub provider: String,
}

/// Normalized user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id assigned by the provider.
    pub id: String,
    /// Email address, if the account has one.
    pub email: Option<String>,
    /// When the email address was confirmed. `None` means unconfirmed.
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// Identities linked to this account. GoTrue returns an empty list
    /// when a signup targets an email that already has an account.
    pub identities: Vec<Identity>,
}

impl User {
    /// Returns true if the user has confirmed their email address.
    pub fn is_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

/// Normalized session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Access token for bearer-authenticated requests.
    pub access_token: String,
    /// Refresh token issued alongside the access token.
    pub refresh_token: String,
    /// Absolute expiry of the access token.
    pub expires_at: DateTime<Utc>,
    /// The user this session belongs to.
    pub user: User,
}

impl Session {
    /// Returns true if the access token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// GoTrue identity payload.
#[derive(Debug, Deserialize)]
pub(crate) struct RawIdentity {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    provider: Option<String>,
}

/// GoTrue user payload.
#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    identities: Option<Vec<RawIdentity>>,
}

impl RawUser {
    /// Normalize into a [`User`], rejecting payloads without a user id.
    pub(crate) fn normalize(self) -> AuthResult<User> {
        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => {
                return Err(AuthError::Provider(
                    "user payload missing id".to_string(),
                ))
            }
        };

        let identities = self
            .identities
            .unwrap_or_default()
            .into_iter()
            .map(|raw| Identity {
                id: raw.id.unwrap_or_default(),
                provider: raw.provider.unwrap_or_default(),
            })
            .collect();

        Ok(User {
            id,
            email: self.email,
            email_confirmed_at: self.email_confirmed_at,
            identities,
        })
    }
}

/// GoTrue token grant payload (password grant and refresh grant share it).
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: RawUser,
}

impl TokenResponse {
    /// Normalize into a [`Session`], computing the absolute expiry from the
    /// relative `expires_in` the provider reports.
    pub(crate) fn normalize(self) -> AuthResult<Session> {
        let expires_at = Utc::now() + Duration::seconds(self.expires_in);
        Ok(Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.normalize()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_is_confirmed() {
        let confirmed = User {
            id: "user-1".to_string(),
            email: Some("a@example.com".to_string()),
            email_confirmed_at: Some(Utc::now()),
            identities: vec![],
        };
        assert!(confirmed.is_confirmed());

        let unconfirmed = User {
            email_confirmed_at: None,
            ..confirmed
        };
        assert!(!unconfirmed.is_confirmed());
    }

    #[test]
    fn test_session_is_expired() {
        let user = User {
            id: "user-1".to_string(),
            email: None,
            email_confirmed_at: None,
            identities: vec![],
        };

        let live = Session {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            user: user.clone(),
        };
        assert!(!live.is_expired());

        let stale = Session {
            expires_at: Utc::now() - Duration::seconds(1),
            ..live
        };
        assert!(stale.is_expired());
    }

    #[test]
    fn test_token_response_normalization() {
        let json = r#"{
            "access_token": "at-123",
            "refresh_token": "rt-456",
            "expires_in": 3600,
            "user": {
                "id": "user-1",
                "email": "a@example.com",
                "email_confirmed_at": "2024-01-15T10:00:00Z",
                "identities": [{"id": "ident-1", "provider": "email"}]
            }
        }"#;

        let raw: TokenResponse = serde_json::from_str(json).unwrap();
        let session = raw.normalize().unwrap();

        assert_eq!(session.access_token, "at-123");
        assert_eq!(session.refresh_token, "rt-456");
        assert!(session.expires_at > Utc::now());
        assert!(session.user.is_confirmed());
        assert_eq!(session.user.identities.len(), 1);
        assert_eq!(session.user.identities[0].provider, "email");
    }

    #[test]
    fn test_unconfirmed_user_normalization() {
        let json = r#"{"id": "user-2", "email": "b@example.com"}"#;

        let raw: RawUser = serde_json::from_str(json).unwrap();
        let user = raw.normalize().unwrap();

        assert!(!user.is_confirmed());
        assert!(user.identities.is_empty());
    }

    #[test]
    fn test_missing_user_id_is_rejected() {
        let json = r#"{"email": "c@example.com"}"#;

        let raw: RawUser = serde_json::from_str(json).unwrap();
        let result = raw.normalize();

        assert!(matches!(result, Err(AuthError::Provider(_))));
    }

    #[test]
    fn test_empty_identities_survive_normalization() {
        // The shape GoTrue returns for a duplicate signup
        let json = r#"{"id": "user-3", "email": "d@example.com", "identities": []}"#;

        let raw: RawUser = serde_json::from_str(json).unwrap();
        let user = raw.normalize().unwrap();

        assert!(user.identities.is_empty());
    }
}
