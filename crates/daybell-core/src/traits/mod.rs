//! Seams between the pipeline and the outside world.

pub mod channel;
pub mod credentials;
pub mod provider;

pub use channel::Channel;
pub use credentials::CredentialProvider;
pub use provider::{ContactsProvider, EventProvider, FetchOutcome};
