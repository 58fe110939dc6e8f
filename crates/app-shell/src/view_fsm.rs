//! View state machine using rust-fsm.
//!
//! The machine's states are the app's views plus two sub-states
//! (`SignupPendingVerification`, `ForgotPasswordSent`) that render inside
//! their parent view. The public [`View`] enum collapses the sub-states.
//!
//! Three inputs are accepted from every state:
//! - `RecoveryLinkDetected` always wins and lands on `ResetPassword`,
//!   including from `Dashboard` (a signed-in user may still follow a
//!   recovery link).
//! - `SessionAdmitted` lands on `Dashboard`. The shell applies the
//!   email-confirmation gate before consuming this input, so the machine
//!   never sees an unconfirmed admission.
//! - `SignedOut` lands on `Login` (a self-edge there, so duplicate
//!   sign-out notifications are harmless).

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub view_machine(Loading)

    Loading => {
        RecoveryLinkDetected => ResetPassword,
        SessionAdmitted => Dashboard,
        SignedOut => Login,
        NoSession => Login
    },
    Login => {
        RecoveryLinkDetected => ResetPassword,
        SessionAdmitted => Dashboard,
        SignedOut => Login,
        NavSignup => Signup,
        NavForgotPassword => ForgotPassword
    },
    Signup => {
        RecoveryLinkDetected => ResetPassword,
        SessionAdmitted => Dashboard,
        SignedOut => Login,
        NavLogin => Login,
        SignupAwaitingConfirmation => SignupPendingVerification
    },
    SignupPendingVerification => {
        RecoveryLinkDetected => ResetPassword,
        SessionAdmitted => Dashboard,
        SignedOut => Login,
        NavLogin => Login
    },
    ForgotPassword => {
        RecoveryLinkDetected => ResetPassword,
        SessionAdmitted => Dashboard,
        SignedOut => Login,
        NavLogin => Login,
        ResetLinkSent => ForgotPasswordSent
    },
    ForgotPasswordSent => {
        RecoveryLinkDetected => ResetPassword,
        SessionAdmitted => Dashboard,
        SignedOut => Login,
        NavLogin => Login,
        ResetLinkSent => ForgotPasswordSent
    },
    ResetPassword => {
        RecoveryLinkDetected => ResetPassword,
        SessionAdmitted => Dashboard,
        SignedOut => Login,
        PasswordResetCompleted => Login
    },
    Dashboard => {
        RecoveryLinkDetected => ResetPassword,
        SessionAdmitted => Dashboard,
        SignedOut => Login
    }
}

// Re-export the generated types with clearer names
pub use view_machine::Input as ViewMachineInput;
pub use view_machine::State as ViewMachineState;
pub use view_machine::StateMachine as ViewMachine;

/// The view the app shows, for external consumption.
///
/// Sub-states render inside their parent view, so they collapse here;
/// [`crate::ShellSnapshot`] exposes them as flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Initial state while the existing session is inspected.
    Loading,
    /// Login form.
    Login,
    /// Signup form.
    Signup,
    /// Password-recovery request form.
    ForgotPassword,
    /// New-password form, reached from a recovery link.
    ResetPassword,
    /// The authenticated app.
    Dashboard,
}

impl View {
    /// Returns true only for the authenticated view.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, View::Dashboard)
    }
}

impl From<&ViewMachineState> for View {
    fn from(state: &ViewMachineState) -> Self {
        match state {
            ViewMachineState::Loading => View::Loading,
            ViewMachineState::Login => View::Login,
            ViewMachineState::Signup => View::Signup,
            ViewMachineState::SignupPendingVerification => View::Signup,
            ViewMachineState::ForgotPassword => View::ForgotPassword,
            ViewMachineState::ForgotPasswordSent => View::ForgotPassword,
            ViewMachineState::ResetPassword => View::ResetPassword,
            ViewMachineState::Dashboard => View::Dashboard,
        }
    }
}
