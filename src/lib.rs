// Pedantic: suppress noise for internal crate code.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod aggregator;
pub mod azdo;
pub mod config;
pub mod report;
