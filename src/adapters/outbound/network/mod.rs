pub mod caching_client;
pub mod client_lifecycle;
pub mod deps_dev_client;

pub use caching_client::CachingDependencyRepository;
pub use client_lifecycle::{ClientLifecycle, ClientState};
pub use deps_dev_client::{ClientConfig, DepsDevClient, DEFAULT_BASE_URL};
