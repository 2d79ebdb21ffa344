use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::quote::{
    CreateDraftResponse, DraftPatch, QuoteDraft, QuoteStatus, SubmitDraftResponse, TripType,
};

use super::DraftGateway;
use crate::{ClientError, ClientResult};

/// Gateway operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    Create,
    Update,
    Fetch,
    Delete,
    Submit,
}

/// One recorded gateway invocation
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Create(TripType),
    Update { quote_id: String, patch: DraftPatch },
    Fetch(String),
    Delete(String),
    Submit(String),
}

impl GatewayCall {
    pub fn op(&self) -> GatewayOp {
        match self {
            Self::Create(_) => GatewayOp::Create,
            Self::Update { .. } => GatewayOp::Update,
            Self::Fetch(_) => GatewayOp::Fetch,
            Self::Delete(_) => GatewayOp::Delete,
            Self::Submit(_) => GatewayOp::Submit,
        }
    }
}

/// In-process draft store
///
/// Records every call it receives, which makes it the gateway of choice for
/// offline sessions and for exercising the engine. Individual operations can
/// be switched to fail with [`MemoryDraftGateway::set_unavailable`].
#[derive(Debug, Default)]
pub struct MemoryDraftGateway {
    drafts: Mutex<HashMap<String, QuoteDraft>>,
    calls: Mutex<Vec<GatewayCall>>,
    unavailable: Mutex<HashSet<GatewayOp>>,
    next_id: AtomicU64,
}

impl MemoryDraftGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored record (e.g. a draft left over from an earlier session)
    pub fn insert(&self, draft: QuoteDraft) {
        self.drafts.lock().insert(draft.quote_id.clone(), draft);
    }

    pub fn get(&self, quote_id: &str) -> Option<QuoteDraft> {
        self.drafts.lock().get(quote_id).cloned()
    }

    /// Make an operation fail (or recover) from now on
    pub fn set_unavailable(&self, op: GatewayOp, unavailable: bool) {
        let mut set = self.unavailable.lock();
        if unavailable {
            set.insert(op);
        } else {
            set.remove(&op);
        }
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, op: GatewayOp) -> usize {
        self.calls.lock().iter().filter(|c| c.op() == op).count()
    }

    /// Patches received through `update`, in arrival order
    pub fn updates(&self) -> Vec<(String, DraftPatch)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                GatewayCall::Update { quote_id, patch } => Some((quote_id.clone(), patch.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: GatewayCall) -> ClientResult<()> {
        let op = call.op();
        self.calls.lock().push(call);
        if self.unavailable.lock().contains(&op) {
            return Err(ClientError::Internal(format!(
                "draft store unavailable for {:?}",
                op
            )));
        }
        Ok(())
    }

    fn not_found(quote_id: &str) -> ClientError {
        ClientError::NotFound(format!("draft {}", quote_id))
    }
}

#[async_trait]
impl DraftGateway for MemoryDraftGateway {
    async fn create(&self, trip_type: TripType) -> ClientResult<CreateDraftResponse> {
        self.record(GatewayCall::Create(trip_type))?;
        let seq = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let draft = QuoteDraft::new(format!("draft-{}", seq), trip_type);
        let resp = CreateDraftResponse {
            quote_id: draft.quote_id.clone(),
            status: draft.status,
            current_step: draft.current_step,
        };
        self.insert(draft);
        Ok(resp)
    }

    async fn update(&self, quote_id: &str, patch: &DraftPatch) -> ClientResult<QuoteDraft> {
        self.record(GatewayCall::Update {
            quote_id: quote_id.to_string(),
            patch: patch.clone(),
        })?;
        let mut drafts = self.drafts.lock();
        let draft = drafts
            .get_mut(quote_id)
            .ok_or_else(|| Self::not_found(quote_id))?;
        draft.apply_patch(patch);
        Ok(draft.clone())
    }

    async fn fetch(&self, quote_id: &str) -> ClientResult<QuoteDraft> {
        self.record(GatewayCall::Fetch(quote_id.to_string()))?;
        self.get(quote_id).ok_or_else(|| Self::not_found(quote_id))
    }

    async fn delete(&self, quote_id: &str) -> ClientResult<()> {
        self.record(GatewayCall::Delete(quote_id.to_string()))?;
        self.drafts
            .lock()
            .remove(quote_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(quote_id))
    }

    async fn submit(&self, quote_id: &str) -> ClientResult<SubmitDraftResponse> {
        self.record(GatewayCall::Submit(quote_id.to_string()))?;
        let mut drafts = self.drafts.lock();
        let draft = drafts
            .get_mut(quote_id)
            .ok_or_else(|| Self::not_found(quote_id))?;
        draft.status = QuoteStatus::Submitted;
        Ok(SubmitDraftResponse {
            quote_id: draft.quote_id.clone(),
            status: draft.status,
            pricing: None,
        })
    }
}
