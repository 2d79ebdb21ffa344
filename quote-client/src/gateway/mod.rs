//! Draft Persistence Gateway
//!
//! Stateless access to the remote draft store. The engine only ever sees the
//! [`DraftGateway`] trait; [`HttpDraftGateway`] talks to the quote API and
//! [`MemoryDraftGateway`] keeps records in-process.

mod http;
mod memory;

pub use http::HttpDraftGateway;
pub use memory::{GatewayCall, GatewayOp, MemoryDraftGateway};

use async_trait::async_trait;
use shared::quote::{CreateDraftResponse, DraftPatch, QuoteDraft, SubmitDraftResponse, TripType};

use crate::ClientResult;

/// Remote draft store operations
#[async_trait]
pub trait DraftGateway: Send + Sync + 'static {
    /// Create a new draft for the chosen trip type
    async fn create(&self, trip_type: TripType) -> ClientResult<CreateDraftResponse>;

    /// Overwrite the fields present in `patch`, returning the full record
    async fn update(&self, quote_id: &str, patch: &DraftPatch) -> ClientResult<QuoteDraft>;

    async fn fetch(&self, quote_id: &str) -> ClientResult<QuoteDraft>;

    async fn delete(&self, quote_id: &str) -> ClientResult<()>;

    /// Hand the draft over to the submission workflow
    async fn submit(&self, quote_id: &str) -> ClientResult<SubmitDraftResponse>;
}
