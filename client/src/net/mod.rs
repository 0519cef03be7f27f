//! Networking modules for the journal REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs HTTP calls and classifies failures; `types` defines the
//! JSON schema shared with the server.

pub mod api;
pub mod types;
