//! Utility module — validation helpers and logging setup

pub mod logger;
pub mod validation;
