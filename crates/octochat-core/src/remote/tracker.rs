//! BotTracker trait definition.

use octochat_types::bot::BotStatusReport;
use octochat_types::error::ServiceError;

/// Provisioning tracker keyed by source URL.
pub trait BotTracker: Send + Sync {
    /// Look up the provisioning stage of the bot built from `source_url`.
    fn describe(
        &self,
        source_url: &str,
    ) -> impl std::future::Future<Output = Result<BotStatusReport, ServiceError>> + Send;

    /// Schedule deletion of the bot built from `source_url`.
    fn delete(
        &self,
        source_url: &str,
    ) -> impl std::future::Future<Output = Result<(), ServiceError>> + Send;
}
