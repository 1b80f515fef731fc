//! Year insight: request building and the cancelable reveal session

mod request;
mod session;

pub use request::{
    InsightContext, InsightRequest, Pillar, UNKNOWN_PATTERN, UserBazi, fallback_text,
};
pub use session::{
    InsightSession, InsightState, InsightTiming, InsightView, SessionId, TextSource,
};

use async_trait::async_trait;

use crate::error::ApiError;

/// Source of interpretation text for a year
#[async_trait]
pub trait InsightAnalyzer: Send + Sync {
    /// Return the full analysis text. Errors make the session show fallback text.
    async fn analyze(&self, request: &InsightRequest) -> Result<String, ApiError>;
}

#[cfg(test)]
mod tests;
