//! DialogRuntime trait definition.

use octochat_types::chat::{DialogReply, DialogRequest};
use octochat_types::error::ServiceError;

/// The managed runtime that executes a provisioned bot.
///
/// Implementations report a bot that exists but cannot serve yet as
/// [`ServiceError::NotReady`].
pub trait DialogRuntime: Send + Sync {
    fn post_text(
        &self,
        request: &DialogRequest,
    ) -> impl std::future::Future<Output = Result<DialogReply, ServiceError>> + Send;
}
