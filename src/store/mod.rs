//! Client State Store
//!
//! Single source of truth for the session and the cached profile/team
//! payloads.
//!
//! - **data_store**: [`Store`] and its actions
//! - **state**: in-memory state and the persisted [`Snapshot`]
//! - **error**: [`StoreError`]
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use teamhub::api::{ApiClient, Credentials};
//! use teamhub::storage::FileStorage;
//! use teamhub::store::Store;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::http("http://localhost:5000", Duration::from_secs(30))?;
//!     let storage = Arc::new(FileStorage::open("./teamhub_data")?);
//!     let store = Store::restore(api, storage);
//!
//!     store
//!         .login(&Credentials {
//!             username: "@alice".into(),
//!             password: "secret".into(),
//!         })
//!         .await?;
//!
//!     store.fetch_profile().await;
//!     println!("{}", store.profile());
//!     Ok(())
//! }
//! ```

pub mod data_store;
pub mod error;
pub mod state;

pub use data_store::Store;
pub use error::{StoreError, StoreResult};
pub use state::{Cached, Snapshot, StoreState, STORE_KEY, TOKEN_KEY};
