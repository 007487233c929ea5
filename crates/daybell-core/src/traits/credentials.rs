//! Credential provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// Supplies bearer tokens for the Google adapters.
///
/// Acquiring and refreshing tokens happens outside Daybell; a provider only
/// hands out what it has or reports that it has nothing usable.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}
