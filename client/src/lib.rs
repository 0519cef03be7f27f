//! # client
//!
//! Native session client for the JournalMind journaling service.
//!
//! This crate contains the session gate (credential store, auth provider and
//! route guard), the REST API client, the transient notifier, and the page
//! controllers that drive login, signup, dashboard and settings flows. The
//! `journalmind` binary wires these together behind a command-line surface.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod router;
pub mod state;
