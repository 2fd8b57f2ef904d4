//! dvdnfo-integration - Catalog site integration for dvdnfo
//!
//! This crate provides the network side of a catalog session.
//!
//! ## Features
//!
//! - `HttpPageLoader`, a [`PageLoader`](dvdnfo_core::loader::PageLoader)
//!   backed by a `ureq` agent with bounded timeouts
//! - Cookie header assembly from an exported cookie jar
//! - Cover image download
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dvdnfo_core::config::CatalogConfig;
//! use dvdnfo_core::loader::NoCookies;
//! use dvdnfo_core::session::{CatalogSession, SessionSettings};
//! use dvdnfo_integration::HttpPageLoader;
//!
//! let config = CatalogConfig::default();
//! let loader = HttpPageLoader::from_config(&config);
//! let mut session = CatalogSession::new(loader, &NoCookies, SessionSettings::from(&config));
//! session.search("Deliverance", Some(1972))?;
//! ```

pub mod http;
pub mod image;

pub use http::{HttpPageLoader, HttpSettings};
pub use image::download_image;
