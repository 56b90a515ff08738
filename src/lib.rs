//! # TeamHub
//!
//! Client core for the team and jury platform: a route table with a
//! navigation guard, and a state store that talks to the platform API and
//! caches what it returns.
//!
//! ## Modules
//!
//! - [`router`]: Route table and navigation guard
//! - [`store`]: Session plus cached profile/team data, and the actions that change them
//! - [`api`]: Typed client for the platform REST API
//! - [`storage`]: Durable key-value persistence
//! - [`session`]: Authentication state
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use teamhub::{ApiClient, FileStorage, Navigation, Router, Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::http("http://localhost:5000", Duration::from_secs(30))?;
//!     let store = Store::restore(api, Arc::new(FileStorage::open("./teamhub_data")?));
//!     let router = Router::new();
//!
//!     match router.navigate("/team-account", &store.session()) {
//!         Navigation::Allow => {
//!             store.fetch_my_team().await;
//!             println!("{}", store.team());
//!         }
//!         Navigation::Redirect(to) => println!("redirected to {}", to),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod router;
pub mod session;
pub mod storage;
pub mod store;

pub use api::{
    ApiClient, ApiError, ApiRequest, ApiResult, ArtifactReview, Credentials, HttpTransport,
    NewTeam, NewUser, RoleChange, TeamArtifacts, TeamInvite, Transport,
};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, StorageConfig};

pub use router::{guard, Navigation, Route, Router, View};

pub use session::Session;

pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError, StorageResult};

pub use store::{Snapshot, Store, StoreError, StoreResult};
