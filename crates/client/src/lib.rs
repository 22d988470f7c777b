//! Client side of the dashboard: talks to the layout backend over HTTP and
//! drives an editing session on top of the core layout engine.

pub mod config;
pub mod error;
pub mod persistence;
pub mod session;
pub mod setup;

pub use config::ClientConfig;
pub use error::PersistenceError;
pub use persistence::{HttpLayoutBackend, LayoutBackend, LayoutPersistence, RequestSequencer};
pub use session::EditSession;
pub use setup::SetupClient;
