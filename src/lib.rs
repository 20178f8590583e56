//! Library crate for library-staff-tool.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, settings and the update loop (`app`)
//! - Book records and the in-memory catalog (`catalog`)
//! - Error and result types for file access (`error`)
//! - The catalog bound to its data files (`library`)
//! - Keyword search over the catalog (`search`)
//! - Flat-file formats for books and the borrower log (`store`)
//! - UI rendering (`ui`)
//! - Borrow, return and add-books state machines (`workflow`)
//!
//! It is used by the `library-staff-tool` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod catalog;
pub mod error;
pub mod library;
pub mod search;
pub mod store;
pub mod ui;
pub mod workflow;

/// Convenient error and result types shared across the crate.
pub use error::{Result, StoreError};
