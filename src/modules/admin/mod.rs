//! Staff-only endpoints behind the role stage.

pub mod controller;
pub mod router;
