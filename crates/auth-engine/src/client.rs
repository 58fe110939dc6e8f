//! GoTrue REST client.
//!
//! All requests carry the project's publishable key in the `apikey` header.
//! Session-scoped requests additionally carry a bearer token. The client
//! emits an [`AuthChangeEvent`] on every session change so the state
//! machine above it can react uniformly, whether a change came from a local
//! call or a recovery link.

use crate::events::{AuthChangeEvent, AuthEventBus, Subscription};
use crate::types::{RawUser, TokenResponse};
use crate::{AuthError, AuthResult, Session, User};
use reqwest::Client;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Supabase authentication client.
pub struct AuthClient {
    http_client: Client,
    supabase_url: String,
    publishable_key: String,
    /// Where confirmation and recovery emails link back to, typically the
    /// app's own origin.
    email_redirect_url: Option<String>,
    /// Transient in-memory copy of the current session. Never persisted.
    session: Mutex<Option<Session>>,
    events: AuthEventBus,
}

impl AuthClient {
    /// Create a new auth client for a Supabase project.
    pub fn new(supabase_url: &str, publishable_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            publishable_key: publishable_key.to_string(),
            email_redirect_url: None,
            session: Mutex::new(None),
            events: AuthEventBus::new(),
        }
    }

    /// Create a new auth client whose confirmation emails link back to the
    /// given URL.
    pub fn with_email_redirect(
        supabase_url: &str,
        publishable_key: &str,
        email_redirect_url: &str,
    ) -> Self {
        Self {
            email_redirect_url: Some(email_redirect_url.to_string()),
            ..Self::new(supabase_url, publishable_key)
        }
    }

    /// Register a callback for auth change events.
    pub fn subscribe(
        &self,
        callback: impl Fn(AuthChangeEvent, Option<Session>) + Send + Sync + 'static,
    ) -> Subscription {
        self.events.subscribe(callback)
    }

    /// Get the current session, if one is attached and not expired.
    ///
    /// Never touches the network.
    pub fn current_session(&self) -> Option<Session> {
        let session = self.session.lock().unwrap();
        session.as_ref().filter(|s| !s.is_expired()).cloned()
    }

    /// Create a new account.
    ///
    /// On success the account is pending email confirmation; no session is
    /// established. GoTrue reports a signup against an existing email as a
    /// success with an empty `identities` list, which is surfaced here as
    /// [`AuthError::DuplicateAccount`].
    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult<User> {
        let signup_url = format!("{}/auth/v1/signup", self.supabase_url);

        debug!(url = %signup_url, email = %email, "Attempting signup");

        let mut request = self
            .http_client
            .post(&signup_url)
            .header("apikey", &self.publishable_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }));

        if let Some(redirect) = &self.email_redirect_url {
            request = request.query(&[("redirect_to", redirect.as_str())]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Signup failed");
            return Err(AuthError::Provider(format!("HTTP {}: {}", status, body)));
        }

        let raw: RawUser = response.json().await?;
        let user = raw.normalize()?;

        if user.identities.is_empty() {
            info!(email = %email, "Signup targeted an existing account");
            return Err(AuthError::DuplicateAccount);
        }

        info!(user_id = %user.id, "Signup successful, confirmation email sent");
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// On success the session is cached and `SignedIn` is emitted. The
    /// caller is responsible for the email-confirmation gate; the provider
    /// mints sessions for unconfirmed accounts too.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session> {
        let login_url = format!("{}/auth/v1/token?grant_type=password", self.supabase_url);

        debug!(url = %login_url, email = %email, "Attempting email/password sign-in");

        let response = self
            .http_client
            .post(&login_url)
            .header("apikey", &self.publishable_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Sign-in failed");
            return Err(AuthError::InvalidCredentials(provider_error_message(&body)));
        }

        let raw: TokenResponse = response.json().await?;
        let session = raw.normalize()?;

        {
            let mut current = self.session.lock().unwrap();
            *current = Some(session.clone());
        }

        info!(user_id = %session.user.id, "Sign-in successful");
        self.events.emit(AuthChangeEvent::SignedIn, Some(&session));

        Ok(session)
    }

    /// Sign out, clearing the cached session.
    ///
    /// The provider-side logout is best effort; the local session is
    /// cleared and `SignedOut` emitted regardless.
    pub async fn sign_out(&self) -> AuthResult<()> {
        let session = {
            let mut current = self.session.lock().unwrap();
            current.take()
        };

        if let Some(session) = session {
            let logout_url = format!("{}/auth/v1/logout", self.supabase_url);

            debug!(url = %logout_url, "Signing out");

            let result = self
                .http_client
                .post(&logout_url)
                .header("apikey", &self.publishable_key)
                .header("Authorization", format!("Bearer {}", session.access_token))
                .send()
                .await;

            match result {
                Ok(response) if !response.status().is_success() => {
                    warn!(status = %response.status(), "Provider logout rejected, session cleared locally");
                }
                Err(e) => {
                    warn!(error = %e, "Provider logout failed, session cleared locally");
                }
                Ok(_) => {}
            }
        }

        info!("Signed out");
        self.events.emit(AuthChangeEvent::SignedOut, None);
        Ok(())
    }

    /// Request a password-recovery email.
    pub async fn send_password_reset(&self, email: &str) -> AuthResult<()> {
        let recover_url = format!("{}/auth/v1/recover", self.supabase_url);

        debug!(url = %recover_url, email = %email, "Requesting password recovery email");

        let response = self
            .http_client
            .post(&recover_url)
            .header("apikey", &self.publishable_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Password recovery request failed");
            return Err(AuthError::Provider(provider_error_message(&body)));
        }

        info!("Password recovery email requested");
        Ok(())
    }

    /// Update the current user's password.
    ///
    /// Requires an attached session (typically a recovery session).
    pub async fn update_password(&self, new_password: &str) -> AuthResult<User> {
        let access_token = {
            let session = self.session.lock().unwrap();
            match session.as_ref() {
                Some(s) => s.access_token.clone(),
                None => return Err(AuthError::NotAuthenticated),
            }
        };

        let user_url = format!("{}/auth/v1/user", self.supabase_url);

        debug!(url = %user_url, "Updating password");

        let response = self
            .http_client
            .put(&user_url)
            .header("apikey", &self.publishable_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "password": new_password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Password update failed");
            return Err(AuthError::Provider(provider_error_message(&body)));
        }

        let raw: RawUser = response.json().await?;
        let user = raw.normalize()?;

        let updated = {
            let mut session = self.session.lock().unwrap();
            if let Some(s) = session.as_mut() {
                s.user = user.clone();
            }
            session.clone()
        };

        info!(user_id = %user.id, "Password updated");
        self.events
            .emit(AuthChangeEvent::UserUpdated, updated.as_ref());

        Ok(user)
    }

    /// Attach a session the provider minted from a recovery link.
    ///
    /// The link's token exchange happens out-of-band in the host page; this
    /// installs the result and emits `PasswordRecovery`.
    pub fn accept_recovery_session(&self, session: Session) {
        {
            let mut current = self.session.lock().unwrap();
            *current = Some(session.clone());
        }

        info!(user_id = %session.user.id, "Recovery session attached");
        self.events
            .emit(AuthChangeEvent::PasswordRecovery, Some(&session));
    }
}

/// Extract the human-readable message from a GoTrue error body, falling
/// back to the raw body.
fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("msg")
                .or_else(|| v.get("error_description"))
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}
