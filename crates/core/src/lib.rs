//! Core domain logic for Vantage.
//!
//! This crate has ZERO web dependencies. The dashboard's HTTP layer drives
//! everything through the types exported here.
//!
//! # Modules
//!
//! - `deferred` - Placeholder-then-content loading of heavyweight widgets
//! - `assets` - Object storage holding widget bundles
//! - `account` - Account metric snapshots and their sources

pub mod account;
pub mod assets;
pub mod deferred;
