// swipr.ai API core
//
// Waitlist ledger, form intake and auth backed by Postgres (or memory), with a
// one-way mirror of the ledger and forms into Google Sheets.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
