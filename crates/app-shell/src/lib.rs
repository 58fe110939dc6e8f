//! Application shell for the ColdConnect client.
//!
//! This crate owns which view the app shows and when. A finite state
//! machine tracks the current view; transitions come from three sources
//! that all funnel through the same machine:
//!
//! - initialization (recovery link detection, existing session inspection)
//! - the auth provider's change event stream
//! - user-triggered edges (form submissions, navigation links)
//!
//! The load-bearing invariant: the dashboard is reachable only with a
//! session whose user has confirmed their email. Everything else is a
//! consequence of that rule.

mod error;
mod navigation;
mod shell;
mod validate;
mod view_fsm;

pub use error::{ShellError, ShellResult};
pub use navigation::NavigationTarget;
pub use shell::{AppShell, ShellSnapshot, StatusField};
pub use validate::{validate_generate_request, validate_password, ValidationError};
pub use view_fsm::View;
