//! Supabase authentication client for the ColdConnect app.
//!
//! This crate wraps the GoTrue REST API behind a typed facade. Raw provider
//! payloads are normalized into [`User`] and [`Session`] records at this
//! boundary; nothing above this crate ever sees provider JSON.
//!
//! The client keeps at most a transient in-memory copy of the current
//! session. Nothing is persisted.
//!
//! ## Operations
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | `sign_up` | `POST /auth/v1/signup` |
//! | `sign_in` | `POST /auth/v1/token?grant_type=password` |
//! | `sign_out` | `POST /auth/v1/logout` |
//! | `send_password_reset` | `POST /auth/v1/recover` |
//! | `update_password` | `PUT /auth/v1/user` |
//! | `current_session` | (cached copy, no network) |
//! | `subscribe` | (auth change event stream) |

mod client;
mod error;
mod events;
mod types;

pub use client::AuthClient;
pub use error::{AuthError, AuthResult};
pub use events::{AuthChangeEvent, AuthEventBus, Subscription};
pub use types::{Identity, Session, User};
