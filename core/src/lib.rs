//! rego-core: reconciles two snapshots of a certificate registry.
//!
//! Given a previous and a latest export, infers which blocks of
//! certificates changed hands (seller, buyer, MWh) and how much each
//! company currently holds.

pub mod cert_id;
pub mod cohort;
pub mod config;
pub mod error;
pub mod issue_date;
pub mod ownership;
pub mod range_index;
pub mod reconcile;
pub mod rng;
pub mod synthetic;
pub mod table;
pub mod transfer;
pub mod types;
