//! Admin dashboard for a services marketplace.
//!
//! The `data` feature exposes the persistence and query layers on their own
//! (`domain`, `models`, `schema`, `repository`, `listing_query`, `snapshot`).
//! The default `server` feature adds forms, services, routes and the
//! collaborator clients used by the Actix-web application.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod listing_query;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod shell;
#[cfg(feature = "data")]
pub mod snapshot;

#[cfg(feature = "server")]
pub mod asset_host;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod identity;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod session;
