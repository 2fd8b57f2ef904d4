//! dvdnfo-storage - Storage library for dvdnfo
//!
//! This crate provides the on-disk pieces: cookie export files, the
//! configuration file and Kodi NFO descriptors.

mod atomic;
mod config_store;
mod cookie_store;
mod location;
mod nfo;

pub use config_store::ConfigStore;
pub use cookie_store::CookieFile;
pub use location::{config_dir, default_config_path, default_cookie_path};
pub use nfo::NfoDocument;
