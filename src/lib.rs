//! RSVP form state, a local append-only entry log, spreadsheet relay and CSV
//! export.
//!
//! # Examples
//!
//! Editing and finalizing a draft:
//! ```
//! use rsvplog::{
//!     core::draft::Draft,
//!     export::to_csv,
//!     types::{DraftField, GuestField},
//! };
//!
//! let mut draft = Draft::new();
//! draft.set_field(DraftField::FullName("Alex Doe".to_string()));
//! draft.set_field(DraftField::Email("alex@example.com".to_string()));
//! draft.set_guest_count("2");
//! draft.set_guest_field(0, GuestField::Name, "Sam");
//! draft.set_guest_field(1, GuestField::Name, "Kit");
//!
//! let entry = draft.finalize("doc-test").expect("valid draft");
//! assert_eq!(entry.guests.len(), 2);
//! assert!(to_csv(&[entry]).starts_with("submittedAt,fullName"));
//! ```
//!
//! Desk usage with a SQLite log and webhook relay:
//! ```no_run
//! use rsvplog::{
//!     config::RsvpConfig,
//!     core::draft::Draft,
//!     persist::sqlite::SqliteEntryLog,
//!     runtime::handle::{intake_from_config, spawn_rsvp_desk},
//!     types::DraftField,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cfg = RsvpConfig {
//!     webhook_url: Some("https://script.example.com/exec".to_string()),
//!     ..RsvpConfig::default()
//! };
//! let log = SqliteEntryLog::open("rsvps.db", cfg.storage_key.clone()).expect("open sqlite");
//! let handle = spawn_rsvp_desk(Box::new(log), intake_from_config(&cfg), cfg);
//!
//! let mut draft = Draft::new();
//! draft.set_field(DraftField::FullName("Alex Doe".to_string()));
//! draft.set_field(DraftField::Email("alex@example.com".to_string()));
//! draft.set_guest_count("0");
//! let receipt = handle.submit(draft).await.expect("submit");
//! println!("stored #{}", receipt.id);
//!
//! let _path = handle.export_to(".").await.expect("export");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Runtime and form configuration.
pub mod config;
/// Form draft state and validation.
pub mod core;
/// Finalized entry records.
pub mod entry;
/// CSV export.
pub mod export;
/// Remote intake abstraction and webhook implementation.
pub mod intake;
/// Persistence abstraction, in-memory and SQLite logs.
pub mod persist;
/// Single-writer desk handle and events.
pub mod runtime;
/// Shared primitive types and field keys.
pub mod types;
