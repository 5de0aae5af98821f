//! # Orgmap
//!
//! An org chart server, usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use orgmap::server::{AppState, create_router};
//! use orgmap::store::SqliteStore;
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/orgmap.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store)));
//! let router = create_router(state);
//! // Serve with axum...
//! ```

pub mod assignments;
pub mod config;
pub mod css;
pub mod error;
pub mod server;
pub mod store;
pub mod themes;
pub mod types;
pub mod validation;
