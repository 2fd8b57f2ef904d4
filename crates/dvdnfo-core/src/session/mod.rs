//! Catalog session module
//!
//! A session owns the cookie set, drives one browsing context per operation
//! and keeps the most recently loaded detail page for field extraction.
//!
//! # Example
//!
//! ```ignore
//! use dvdnfo_core::session::{CatalogSession, SessionSettings};
//!
//! let mut session = CatalogSession::new(loader, &cookie_file, SessionSettings::default());
//! session.search("Alice in Wonderland", Some(2010))?;
//! println!("{}", session.synopsis()?);
//! ```

mod catalog;
pub mod extract;
pub mod layout;

pub use catalog::{CatalogSession, ManualChoice, SessionSettings, SessionState};
