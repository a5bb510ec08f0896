use crate::domain::model::{Coordinates, IrradianceSummary};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Month;

/// Source of long-run solar irradiance for a point.
///
/// Implementations make at most one outbound call per `fetch` and hold no
/// cross-request state. Every failure is reported as
/// [`QuoteError::DataUnavailable`](crate::utils::error::QuoteError::DataUnavailable)
/// so callers can fall back to a default.
#[async_trait]
pub trait IrradianceProvider: Send + Sync {
    async fn fetch(&self, point: Coordinates, month: Option<Month>) -> Result<IrradianceSummary>;
}
