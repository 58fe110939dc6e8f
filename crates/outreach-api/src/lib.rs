//! ColdConnect backend API client.
//!
//! Thin typed facade over the outreach backend. Every request is
//! bearer-authenticated with the caller's access token; the backend owns
//! prompting, persistence, and ordering (history comes back newest-first).
//!
//! ## Operations
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | `fetch_history` | `GET /history` |
//! | `generate` | `POST /generate` |
//! | `update_contact_status` | `PATCH /contacts/{id}/status` |

mod client;
mod error;
mod types;

pub use client::BackendClient;
pub use error::{BackendError, BackendResult};
pub use types::{ContactStatusUpdate, GenerateRequest, MessageHistoryItem};
