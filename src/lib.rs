//! NEMT Records Library
//!
//! Record keeping for a non-emergency medical transportation provider:
//! clients, drivers, vehicles and trips (fleet deployment), or clients with
//! uploaded documents and drop-off addresses (intake deployment), all kept in
//! a single SQLite file and edited through server-rendered forms.
//!
//! # Modules
//!
//! - `api`: HTTP-facing handlers grouped by deployment.
//! - `core`: Models, storage and errors.
//! - `config`: Configuration management.
//! - `db`: Store file handle and schema bootstrap.
//! - `db_storage`: Per-request list/create operations.
//! - `errors`: Error handling types.
//! - `export`: Client trip log CSV.
//! - `handlers`: Fleet HTTP handlers and shared state.
//! - `intake_handler`: Intake HTTP handlers and multipart decoding.
//! - `models`: Row and form types.
//! - `routes`: Router assembly.
//! - `schema`: Table definitions.
//! - `uploads`: Document upload storage.
//! - `views`: HTML rendering.

pub mod api;
pub mod core;

pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod intake_handler;
pub mod models;
pub mod routes;
pub mod schema;
pub mod uploads;
pub mod views;
