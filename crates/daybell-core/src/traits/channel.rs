//! Channel trait: where finished notifications go.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::NotificationMessage;

/// A messaging sink.
///
/// Implementations send whatever they are given. Callers never hand over an
/// empty notification; suppressing those is the orchestrator's job.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one notification. Transport failures surface as
    /// [`DaybellError::Delivery`](crate::error::DaybellError::Delivery).
    async fn deliver(&self, message: &NotificationMessage) -> Result<()>;
}
