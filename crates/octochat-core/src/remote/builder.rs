//! KnowledgeBaseBuilder trait definition.

use octochat_types::build::{BuildRequest, BuildResult};
use octochat_types::error::ServiceError;

/// The remote function that turns a source URL into a bot.
///
/// A reachable builder that refuses the URL answers `Ok` with a failed
/// [`BuildResult`]; `Err` is reserved for transport-level problems.
pub trait KnowledgeBaseBuilder: Send + Sync {
    fn build(
        &self,
        request: &BuildRequest,
    ) -> impl std::future::Future<Output = Result<BuildResult, ServiceError>> + Send;
}
