//! Shared utilities.
//!
//! - [`email`]: Confirmation mail delivery over SMTP, or to the log when SMTP is disabled

pub mod email;
