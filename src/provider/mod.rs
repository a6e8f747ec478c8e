//! Source-control provider boundary
//!
//! Everything that touches the provider's API lives here: the client trait,
//! the GitHub REST implementation, repository name resolution and the typed
//! views the normalizer decodes raw records into.

pub mod error;
pub mod github;
pub mod records;
pub mod resolver;
pub mod traits;

pub use error::{ProviderError, ProviderResult};
pub use github::GitHubClient;
pub use resolver::OwnerResolver;
pub use traits::{ProviderClient, RawRecord, RepositoryResolver};
