//! Per-container Kubernetes log tailing.
//!
//! A [`session::TailSession`] follows the log stream of one container,
//! drops lines matching exclusion patterns, optionally flattens JSON
//! records and writes colorized output to a sink. Callers start one
//! session per container and share a single [`color::ColorRegistry`].

pub mod color;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod kubernetes;
pub mod session;
pub mod types;
