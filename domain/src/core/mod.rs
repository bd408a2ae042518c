//! Core domain concepts shared across all subdomains.
//!
//! - [`identity::ProviderId`] — the fixed provider identities that can sit on the council
//! - [`question::Question`] — a validated question put to the council
//! - [`error::DebateError`] — structural errors that end a debate

pub mod error;
pub mod identity;
pub mod question;
