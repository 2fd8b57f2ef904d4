//! dvdnfo-core - Core library for dvdnfo
//!
//! This crate provides the catalog session (search, candidate matching,
//! detail page extraction), the configuration model and the planning side
//! of descriptor updates.

pub mod config;
pub mod document;
pub mod error;
pub mod links;
pub mod loader;
pub mod matching;
pub mod observer;
pub mod session;
pub mod types;
pub mod updater;

pub use error::{DvdNfoError, Result};
pub use types::*;
