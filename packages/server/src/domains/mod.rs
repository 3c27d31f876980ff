// Business domains
pub mod admin;
pub mod analytics;
pub mod applications;
pub mod auth;
pub mod chat;
pub mod contacts;
pub mod portfolio;
pub mod social;
pub mod stocks;
pub mod waitlist;

// External mirror of the ledger and form submissions
pub mod sync;
