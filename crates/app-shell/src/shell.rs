//! The application shell.
//!
//! `AppShell` wires the auth client's event stream into the view machine
//! and exposes the user-triggered edges as async methods. It also owns the
//! dashboard's history list, applying checklist toggles optimistically and
//! reverting them if the backend rejects the update.
//!
//! Locking discipline: the state mutex is never held across an `.await` or
//! across event emission. Every suspension point re-acquires the lock and
//! works from current state, which is what makes teardown safe: once
//! `unmount` flips the `closed` flag, late event callbacks return before
//! touching anything, and UI-triggered continuations that resolve after
//! the flip discard their results with [`ShellError::Unmounted`] instead
//! of mutating.

use crate::navigation::NavigationTarget;
use crate::validate::{validate_generate_request, validate_password};
use crate::view_fsm::{View, ViewMachine, ViewMachineInput, ViewMachineState};
use crate::{ShellError, ShellResult, ValidationError};
use auth_engine::{AuthChangeEvent, AuthClient, AuthError, Session, Subscription};
use outreach_api::{BackendClient, ContactStatusUpdate, GenerateRequest, MessageHistoryItem};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Which checklist flag a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    Contacted,
    Replied,
}

/// Mutable shell state behind one lock.
struct ShellState {
    machine: ViewMachine,
    session: Option<Session>,
    history: Vec<MessageHistoryItem>,
    latest_message: Option<MessageHistoryItem>,
}

impl ShellState {
    fn new() -> Self {
        Self {
            machine: ViewMachine::new(),
            session: None,
            history: Vec::new(),
            latest_message: None,
        }
    }
}

/// Point-in-time view of the shell for presentation layers.
#[derive(Debug, Clone)]
pub struct ShellSnapshot {
    /// The view to render.
    pub view: View,
    /// Signup succeeded and the confirmation email notice should show.
    pub verification_pending: bool,
    /// The recovery email was sent and the notice should show.
    pub reset_link_sent: bool,
    /// Email of the attached session's user, if any.
    pub user_email: Option<String>,
    /// The most recently generated message, if any.
    pub latest_message: Option<MessageHistoryItem>,
}

/// The application shell.
pub struct AppShell {
    auth: Arc<AuthClient>,
    backend: Arc<BackendClient>,
    state: Arc<Mutex<ShellState>>,
    subscription: Mutex<Option<Subscription>>,
    closed: Arc<AtomicBool>,
}

impl AppShell {
    /// Create a shell over the given clients. Call [`mount`](Self::mount)
    /// before anything else.
    pub fn new(auth: Arc<AuthClient>, backend: Arc<BackendClient>) -> Self {
        Self {
            auth,
            backend,
            state: Arc::new(Mutex::new(ShellState::new())),
            subscription: Mutex::new(None),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Initialize the shell.
    ///
    /// Subscribes to the auth event stream first, then resolves the initial
    /// view:
    /// - a recovery marker wins outright and skips session inspection;
    /// - a confirmed existing session is attached and admitted;
    /// - an unconfirmed existing session is signed out (it must not reach
    ///   the dashboard);
    /// - no session lands on the login view.
    pub async fn mount(&self, nav: &NavigationTarget) -> ShellResult<View> {
        let state = Arc::clone(&self.state);
        let closed = Arc::clone(&self.closed);
        let subscription = self.auth.subscribe(move |event, session| {
            if closed.load(Ordering::SeqCst) {
                debug!(event = ?event, "Ignoring auth event after unmount");
                return;
            }
            handle_auth_event(&state, event, session);
        });
        *self.subscription.lock().unwrap() = Some(subscription);

        if nav.has_recovery_marker() {
            info!("Recovery link detected, skipping session inspection");
            return self.apply(&ViewMachineInput::RecoveryLinkDetected);
        }

        match self.auth.current_session() {
            Some(session) if session.user.is_confirmed() => {
                debug!(user_id = %session.user.id, "Existing confirmed session found");
                {
                    let mut state = self.state.lock().unwrap();
                    state.session = Some(session);
                }
                self.apply(&ViewMachineInput::SessionAdmitted)
            }
            Some(session) => {
                warn!(user_id = %session.user.id, "Existing session is unconfirmed, signing out");
                self.auth.sign_out().await?;
                self.ensure_mounted()?;
                // The SignedOut event already moved the machine to Login
                Ok(self.view())
            }
            None => {
                debug!("No existing session");
                self.apply(&ViewMachineInput::NoSession)
            }
        }
    }

    /// Tear the shell down. The subscription is released and any auth
    /// events that were already in flight are silently discarded.
    pub fn unmount(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(subscription) = self.subscription.lock().unwrap().take() {
            subscription.unsubscribe();
        }
        debug!("Shell unmounted");
    }

    /// The view to render.
    pub fn view(&self) -> View {
        let state = self.state.lock().unwrap();
        View::from(state.machine.state())
    }

    /// Point-in-time view of the shell.
    pub fn snapshot(&self) -> ShellSnapshot {
        let state = self.state.lock().unwrap();
        ShellSnapshot {
            view: View::from(state.machine.state()),
            verification_pending: matches!(
                state.machine.state(),
                ViewMachineState::SignupPendingVerification
            ),
            reset_link_sent: matches!(
                state.machine.state(),
                ViewMachineState::ForgotPasswordSent
            ),
            user_email: state
                .session
                .as_ref()
                .and_then(|s| s.user.email.clone()),
            latest_message: state.latest_message.clone(),
        }
    }

    /// The dashboard's history list, newest first.
    pub fn history(&self) -> Vec<MessageHistoryItem> {
        self.state.lock().unwrap().history.clone()
    }

    /// Submit the login form.
    ///
    /// An unconfirmed account is rejected here no matter what the provider
    /// streamed: the session is torn down and the user stays off the
    /// dashboard.
    pub async fn submit_login(&self, email: &str, password: &str) -> ShellResult<View> {
        let session = self.auth.sign_in(email, password).await?;
        self.ensure_mounted()?;

        if !session.user.is_confirmed() {
            info!(user_id = %session.user.id, "Login rejected, email not confirmed");
            self.auth.sign_out().await?;
            return Err(ShellError::Auth(AuthError::EmailNotConfirmed));
        }

        // The SignedIn event already admitted the session; re-applying is a
        // Dashboard self-edge, so a missed event still lands correctly.
        {
            let mut state = self.state.lock().unwrap();
            state.session = Some(session);
        }
        self.apply(&ViewMachineInput::SessionAdmitted)
    }

    /// Submit the signup form.
    ///
    /// Password checks run before any network call. A duplicate account is
    /// an error with no view change; success moves to the
    /// pending-verification notice.
    pub async fn submit_signup(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> ShellResult<View> {
        validate_password(password, confirm_password)?;

        // Reject before the provider call so no account is created when
        // the transition could not be applied anyway
        {
            let state = self.state.lock().unwrap();
            if !matches!(state.machine.state(), ViewMachineState::Signup) {
                return Err(ShellError::InvalidTransition(
                    "Cannot submit a signup outside the signup form".to_string(),
                ));
            }
        }

        let user = self.auth.sign_up(email, password).await?;
        info!(user_id = %user.id, "Signup accepted, awaiting email confirmation");

        self.apply(&ViewMachineInput::SignupAwaitingConfirmation)
    }

    /// Submit the forgot-password form.
    pub async fn request_password_reset(&self, email: &str) -> ShellResult<View> {
        if email.trim().is_empty() {
            return Err(ShellError::Validation(ValidationError::Required("Email")));
        }

        // Reject before the provider call so no recovery email goes out
        // when the transition could not be applied anyway
        {
            let state = self.state.lock().unwrap();
            if !matches!(
                state.machine.state(),
                ViewMachineState::ForgotPassword | ViewMachineState::ForgotPasswordSent
            ) {
                return Err(ShellError::InvalidTransition(
                    "Cannot request a password reset outside the forgot-password form"
                        .to_string(),
                ));
            }
        }

        self.auth.send_password_reset(email).await?;
        self.apply(&ViewMachineInput::ResetLinkSent)
    }

    /// Submit the reset-password form.
    ///
    /// On success the recovery session is torn down and the user signs in
    /// again with the new password from the login view.
    pub async fn complete_password_reset(
        &self,
        new_password: &str,
        confirm_password: &str,
    ) -> ShellResult<View> {
        validate_password(new_password, confirm_password)?;

        if self.view() != View::ResetPassword {
            return Err(ShellError::InvalidTransition(
                "Cannot complete a password reset outside the reset view".to_string(),
            ));
        }

        self.auth.update_password(new_password).await?;
        self.ensure_mounted()?;
        let view = self.apply(&ViewMachineInput::PasswordResetCompleted)?;

        // The trailing SignedOut notification is absorbed by Login's
        // self-edge.
        self.auth.sign_out().await?;

        Ok(view)
    }

    /// Log out from the dashboard.
    pub async fn logout(&self) -> ShellResult<View> {
        self.auth.sign_out().await?;
        self.ensure_mounted()?;
        Ok(self.view())
    }

    /// Navigate from the login view to the signup form.
    pub fn go_to_signup(&self) -> ShellResult<View> {
        self.apply(&ViewMachineInput::NavSignup)
    }

    /// Navigate back to the login form.
    pub fn go_to_login(&self) -> ShellResult<View> {
        self.apply(&ViewMachineInput::NavLogin)
    }

    /// Navigate from the login view to the forgot-password form.
    pub fn go_to_forgot_password(&self) -> ShellResult<View> {
        self.apply(&ViewMachineInput::NavForgotPassword)
    }

    /// Load the message history into the dashboard.
    pub async fn load_history(&self) -> ShellResult<usize> {
        let token = self.dashboard_token()?;
        let items = self.backend.fetch_history(&token).await?;
        self.ensure_mounted()?;
        let count = items.len();

        let mut state = self.state.lock().unwrap();
        state.history = items;

        Ok(count)
    }

    /// Generate an outreach message and prepend it to the history.
    pub async fn generate_message(
        &self,
        request: GenerateRequest,
    ) -> ShellResult<MessageHistoryItem> {
        validate_generate_request(&request)?;
        let token = self.dashboard_token()?;

        let item = self.backend.generate(&token, &request).await?;
        self.ensure_mounted()?;

        {
            let mut state = self.state.lock().unwrap();
            state.history.insert(0, item.clone());
            state.latest_message = Some(item.clone());
        }

        Ok(item)
    }

    /// Toggle a contact's checklist flag, optimistically.
    ///
    /// The local flag flips immediately; if the backend rejects the update
    /// the flip is reverted and the error returned. The view never changes
    /// either way.
    pub async fn toggle_contact_status(
        &self,
        contact_id: &str,
        field: StatusField,
    ) -> ShellResult<bool> {
        let token = self.dashboard_token()?;

        let (update, new_value) = {
            let mut state = self.state.lock().unwrap();
            let item = state
                .history
                .iter_mut()
                .find(|i| i.contact_id == contact_id)
                .ok_or_else(|| ShellError::UnknownContact(contact_id.to_string()))?;

            match field {
                StatusField::Contacted => {
                    item.contacted = !item.contacted;
                    (ContactStatusUpdate::contacted(item.contacted), item.contacted)
                }
                StatusField::Replied => {
                    item.replied = !item.replied;
                    (ContactStatusUpdate::replied(item.replied), item.replied)
                }
            }
        };

        let result = self
            .backend
            .update_contact_status(&token, contact_id, &update)
            .await;
        // Once unmounted the list is dead state; neither commit nor revert
        self.ensure_mounted()?;

        if let Err(e) = result {
            warn!(contact_id = %contact_id, error = %e, "Status update failed, reverting");

            let mut state = self.state.lock().unwrap();
            if let Some(item) = state
                .history
                .iter_mut()
                .find(|i| i.contact_id == contact_id)
            {
                match field {
                    StatusField::Contacted => item.contacted = !new_value,
                    StatusField::Replied => item.replied = !new_value,
                }
            }

            return Err(e.into());
        }

        Ok(new_value)
    }

    /// Transition the view machine.
    fn apply(&self, input: &ViewMachineInput) -> ShellResult<View> {
        self.ensure_mounted()?;
        apply_input(&self.state, input)
    }

    /// Reject work that resolves after [`unmount`](Self::unmount).
    fn ensure_mounted(&self) -> ShellResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ShellError::Unmounted);
        }
        Ok(())
    }

    /// Access token of the attached session, only while on the dashboard.
    fn dashboard_token(&self) -> ShellResult<String> {
        let state = self.state.lock().unwrap();
        if View::from(state.machine.state()) != View::Dashboard {
            return Err(ShellError::NotOnDashboard);
        }
        state
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
            .ok_or(ShellError::Auth(AuthError::NotAuthenticated))
    }
}

/// Transition the view machine, mapping rejected inputs to a typed error.
fn apply_input(state: &Mutex<ShellState>, input: &ViewMachineInput) -> ShellResult<View> {
    let mut state = state.lock().unwrap();
    let old_view = View::from(state.machine.state());

    state.machine.consume(input).map_err(|_| {
        ShellError::InvalidTransition(format!(
            "Cannot apply {:?} in state {:?}",
            input,
            state.machine.state()
        ))
    })?;

    let new_view = View::from(state.machine.state());
    drop(state);

    if old_view != new_view {
        debug!(old_view = ?old_view, new_view = ?new_view, "View transition");
    }

    Ok(new_view)
}

/// React to an auth change event from the provider's stream.
///
/// The unconfirmed sign-in arm is the tie-break rule: the provider streams
/// `SignedIn` even for unconfirmed accounts, and the login path handles
/// rejection itself, so the event is ignored rather than admitted.
fn handle_auth_event(
    state: &Mutex<ShellState>,
    event: AuthChangeEvent,
    session: Option<Session>,
) {
    match event {
        AuthChangeEvent::SignedIn => match session {
            Some(session) if session.user.is_confirmed() => {
                {
                    let mut state = state.lock().unwrap();
                    state.session = Some(session);
                }
                let _ = apply_input(state, &ViewMachineInput::SessionAdmitted);
            }
            _ => {
                debug!("Ignoring sign-in event for unconfirmed session");
            }
        },
        AuthChangeEvent::PasswordRecovery => {
            if let Some(session) = session {
                let mut state = state.lock().unwrap();
                state.session = Some(session);
            }
            let _ = apply_input(state, &ViewMachineInput::RecoveryLinkDetected);
        }
        AuthChangeEvent::SignedOut => {
            {
                let mut state = state.lock().unwrap();
                state.session = None;
                state.history.clear();
                state.latest_message = None;
            }
            let _ = apply_input(state, &ViewMachineInput::SignedOut);
        }
        AuthChangeEvent::TokenRefreshed | AuthChangeEvent::UserUpdated => {
            debug!(event = ?event, "Ignoring auth event");
        }
    }
}
