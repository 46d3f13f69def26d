//! # Data Loader Crate
//!
//! Loads the user population into an id-addressed, read-only [`UserStore`].
//!
//! ## Main Components
//!
//! - **types**: Core domain types (User, UserStore)
//! - **parser**: Parse the `::`-delimited .dat files into Rust structs
//! - **index**: Build and validate the store
//! - **embedding**: Fit-once, query-many [`EmbeddingModel`] for users without
//!   precomputed embeddings
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::UserStore;
//! use std::path::Path;
//!
//! let store = UserStore::load_from_files(Path::new("data/population"))?;
//! let user = store.get_user(0).unwrap();
//! println!("{} lives at ({}, {})", user.name, user.latitude, user.longitude);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod embedding;

pub use error::{DataLoadError, Result};
pub use types::{Embedding, User, UserId, UserStore};
pub use embedding::EmbeddingModel;
