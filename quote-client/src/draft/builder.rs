//! Draft state container
//!
//! [`DraftBuilder`] owns every quote-builder field plus the draft id and the
//! step pointer. Setters apply locally first and return at once; when a draft
//! exists they hand the changed fields to the autosave scheduler. Step
//! changes are written immediately.
//!
//! # Lifecycle
//!
//! ```text
//! open(id?) ──fetch──▶ Ready
//!     │
//!     └─ no id ─▶ Idle ──set_trip_type + go_to_next_step──▶ create ─▶ Ready (step 2)
//!                                                                   │
//!                          edits ─▶ autosave ─▶ update ◀────────────┘
//!                          submit() / discard_draft()
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use reqwest::Url;
use shared::quote::{
    DraftPatch, FIRST_STEP, Itinerary, OTHER_EVENT_TYPE, Passenger, SelectedVehicle,
    SubmitDraftResponse, TripType,
};
use tokio::sync::watch;
use tokio::time::Duration;

use super::autosave::AutosaveScheduler;
use super::error::{BuilderError, BuilderResult};
use super::navigation::{NavigationController, Transition};
use super::state::DraftState;
use super::validation::{StepRules, StepValidation};
use crate::ClientConfig;
use crate::gateway::DraftGateway;

/// Query parameter carrying the draft id of a resumed session
pub const QUOTE_ID_PARAM: &str = "quoteId";

/// Container-level status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderStatus {
    /// Fresh builder, no draft yet
    Idle,
    /// Bootstrap fetch in flight
    Loading,
    /// A draft exists and is being edited
    Ready,
    /// Bootstrap failed; the builder cannot proceed until a retry succeeds
    Failed(String),
}

/// Extract the draft id from a query string such as `?quoteId=abc&x=1`
///
/// Values are percent-decoded.
pub fn quote_id_from_query(query: &str) -> Option<String> {
    let mut url = Url::parse("http://localhost/").ok()?;
    url.set_query(Some(query.trim_start_matches('?')));
    url.query_pairs()
        .find(|(key, _)| key == QUOTE_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Quote builder session
pub struct DraftBuilder {
    gateway: Arc<dyn DraftGateway>,
    state: RwLock<DraftState>,
    quote_id: watch::Sender<Option<String>>,
    autosave: AutosaveScheduler,
    status: RwLock<BuilderStatus>,
    load_target: Mutex<Option<String>>,
    create_lock: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for DraftBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftBuilder")
            .field("quote_id", &*self.quote_id.borrow())
            .field("status", &*self.status.read())
            .field("current_step", &self.current_step())
            .finish()
    }
}

impl DraftBuilder {
    /// Create an empty builder. Must be called inside a tokio runtime.
    pub fn new(gateway: Arc<dyn DraftGateway>, config: &ClientConfig) -> Self {
        Self::with_autosave_delay(gateway, config.autosave_delay())
    }

    pub fn with_autosave_delay(gateway: Arc<dyn DraftGateway>, delay: Duration) -> Self {
        let (quote_id, quote_id_rx) = watch::channel(None);
        let autosave = AutosaveScheduler::spawn(gateway.clone(), quote_id_rx, delay);
        Self {
            gateway,
            state: RwLock::new(DraftState::default()),
            quote_id,
            autosave,
            status: RwLock::new(BuilderStatus::Idle),
            load_target: Mutex::new(None),
            create_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Create a builder and, when `quote_id` is given, load that draft
    ///
    /// A failed load leaves the builder in [`BuilderStatus::Failed`].
    pub async fn open(
        gateway: Arc<dyn DraftGateway>,
        config: &ClientConfig,
        quote_id: Option<&str>,
    ) -> Self {
        let builder = Self::new(gateway, config);
        if let Some(id) = quote_id {
            // Error is kept in `status`; the caller decides how to show it
            let _ = builder.bootstrap(id).await;
        }
        builder
    }

    // ========== Bootstrap ==========

    /// Replace local state with the stored draft `quote_id`
    pub async fn bootstrap(&self, quote_id: &str) -> BuilderResult<()> {
        *self.load_target.lock() = Some(quote_id.to_string());
        self.set_status(BuilderStatus::Loading);

        match self.gateway.fetch(quote_id).await {
            Ok(record) => {
                let mut state = DraftState::from_record(&record);
                state.validation = StepRules::evaluate(&state);
                let step = state.current_step();

                self.autosave.discard_pending();
                *self.state.write() = state;
                self.quote_id.send_replace(Some(record.quote_id));
                self.set_status(BuilderStatus::Ready);
                tracing::info!(quote_id, step, "Draft restored");
                Ok(())
            }
            Err(e) => {
                tracing::error!(quote_id, "Failed to load draft: {e}");
                self.set_status(BuilderStatus::Failed(e.to_string()));
                Err(BuilderError::Bootstrap {
                    quote_id: quote_id.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Retry the last bootstrap target
    pub async fn retry_bootstrap(&self) -> BuilderResult<()> {
        let target = self.load_target.lock().clone();
        let quote_id = target.ok_or(BuilderError::NothingToLoad)?;
        self.bootstrap(&quote_id).await
    }

    // ========== Accessors ==========

    pub fn quote_id(&self) -> Option<String> {
        self.quote_id.borrow().clone()
    }

    pub fn status(&self) -> BuilderStatus {
        self.status.read().clone()
    }

    pub fn current_step(&self) -> u8 {
        self.state.read().current_step()
    }

    pub fn max_reachable(&self) -> u8 {
        let state = self.state.read();
        state.navigation.max_reachable(&state.validation)
    }

    /// Copy of the current local state
    pub fn snapshot(&self) -> DraftState {
        self.state.read().clone()
    }

    fn set_status(&self, status: BuilderStatus) {
        *self.status.write() = status;
    }

    // ========== Field setters ==========

    pub fn set_trip_type(&self, trip_type: TripType) {
        let patch = {
            let mut state = self.state.write();
            state.trip_type = Some(trip_type);
            let mut patch = DraftPatch {
                trip_type: Some(trip_type),
                ..Default::default()
            };
            // A one-way trip has no return leg
            if !trip_type.has_return()
                && let Some(itinerary) = state.itinerary.as_mut()
                && itinerary.return_leg.take().is_some()
            {
                patch.itinerary = state.transport_itinerary();
            }
            patch
        };
        self.persist_later(patch);
    }

    /// Replace the itinerary; persisted only once it is save-ready
    pub fn set_itinerary(&self, itinerary: Itinerary) {
        let transport = {
            let mut state = self.state.write();
            state.itinerary = Some(itinerary);
            state.transport_itinerary()
        };
        match transport {
            Some(itinerary) => self.persist_later(DraftPatch {
                itinerary: Some(itinerary),
                ..Default::default()
            }),
            None => tracing::debug!("Itinerary incomplete, not autosaving"),
        }
    }

    pub fn set_trip_name(&self, trip_name: impl Into<String>) {
        let trip_name = trip_name.into();
        self.state.write().trip_name = trip_name.clone();
        self.persist_later(DraftPatch {
            trip_name: Some(trip_name),
            ..Default::default()
        });
    }

    /// Set the event type; `custom` is kept only for the "other" type
    pub fn set_event_type(&self, event_type: impl Into<String>, custom: Option<String>) {
        let event_type = event_type.into();
        let custom = custom.filter(|_| event_type == OTHER_EVENT_TYPE);
        {
            let mut state = self.state.write();
            state.event_type = Some(event_type.clone());
            state.custom_event_type = custom.clone();
        }
        self.persist_later(DraftPatch {
            event_type: Some(event_type),
            custom_event_type: Some(custom),
            ..Default::default()
        });
    }

    pub fn set_custom_event_type(&self, custom: Option<String>) {
        self.state.write().custom_event_type = custom.clone();
        self.persist_later(DraftPatch {
            custom_event_type: Some(custom),
            ..Default::default()
        });
    }

    pub fn set_passengers(&self, passengers: Vec<Passenger>) {
        self.state.write().passengers = passengers.clone();
        self.persist_later(DraftPatch {
            passengers: Some(passengers),
            ..Default::default()
        });
    }

    /// Replace the vehicle selection (one entry per vehicle, zero quantities dropped)
    pub fn set_selected_vehicles(&self, vehicles: Vec<SelectedVehicle>) {
        let vehicles = normalize_vehicles(vehicles);
        self.state.write().selected_vehicles = vehicles.clone();
        self.persist_later(DraftPatch {
            selected_vehicles: Some(vehicles),
            ..Default::default()
        });
    }

    pub fn set_selected_amenities<I, S>(&self, amenities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let amenities: BTreeSet<String> = amenities.into_iter().map(Into::into).collect();
        self.state.write().selected_amenities = amenities.clone();
        self.persist_later(DraftPatch {
            selected_amenities: Some(amenities),
            ..Default::default()
        });
    }

    /// Local-only until the draft exists
    fn persist_later(&self, patch: DraftPatch) {
        if self.quote_id.borrow().is_some() {
            self.autosave.schedule(patch);
        }
    }

    // ========== Step validation ==========

    pub fn set_step_valid(&self, step: u8, valid: bool) {
        self.state.write().validation.set_step_valid(step, valid);
    }

    pub fn step_validation(&self) -> StepValidation {
        self.state.read().validation
    }

    /// Re-run the default step predicates over the current fields and store the result
    pub fn recompute_validation(&self) -> StepValidation {
        let mut state = self.state.write();
        state.validation = StepRules::evaluate(&state);
        state.validation
    }

    // ========== Navigation ==========

    /// Move to `target` if allowed; refused moves are silent no-ops
    ///
    /// Leaving step 1 before the draft exists creates it first. Returns
    /// whether the step changed.
    pub async fn go_to_step(&self, target: u8) -> BuilderResult<bool> {
        if self.leaves_first_step(target) && self.quote_id().is_none() {
            self.create_draft().await?;
        }
        Ok(self.apply_move(|nav, validation| nav.go_to(target, validation)).await)
    }

    /// Advance one step
    pub async fn go_to_next_step(&self) -> BuilderResult<bool> {
        let target = self.current_step().saturating_add(1);
        if self.leaves_first_step(target) && self.quote_id().is_none() {
            self.create_draft().await?;
        }
        Ok(self.apply_move(|nav, validation| nav.next(validation)).await)
    }

    pub async fn go_to_previous_step(&self) -> bool {
        self.apply_move(|nav, validation| nav.previous(validation)).await
    }

    /// True when moving to `target` is an allowed move off step 1
    fn leaves_first_step(&self, target: u8) -> bool {
        let state = self.state.read();
        state.current_step() == FIRST_STEP
            && target > FIRST_STEP
            && state.navigation.can_go_to(target, &state.validation)
    }

    async fn apply_move<F>(&self, step: F) -> bool
    where
        F: FnOnce(&mut NavigationController, &StepValidation) -> Option<Transition>,
    {
        let transition = {
            let mut state = self.state.write();
            let validation = state.validation;
            step(&mut state.navigation, &validation)
        };
        match transition {
            Some(transition) => {
                self.persist_step(transition).await;
                true
            }
            None => {
                tracing::debug!(step = self.current_step(), "Step change refused");
                false
            }
        }
    }

    async fn persist_step(&self, transition: Transition) {
        match self.autosave.write_now(DraftPatch::step(transition.to)).await {
            Ok(Some(_)) => {
                tracing::debug!(from = transition.from, to = transition.to, "Step saved");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(to = transition.to, "Failed to save step: {e}");
            }
        }
    }

    // ========== Draft lifecycle ==========

    /// Create the remote draft and move to step 2
    ///
    /// Needs a trip type. Does nothing but return the id when the draft
    /// already exists. On failure nothing changes, so the call can be retried.
    pub async fn start_draft(&self) -> BuilderResult<String> {
        let quote_id = self.create_draft().await?;
        if self.current_step() == FIRST_STEP {
            self.apply_move(|nav, validation| nav.next(validation)).await;
        }
        Ok(quote_id)
    }

    async fn create_draft(&self) -> BuilderResult<String> {
        let _guard = self.create_lock.lock().await;
        if let Some(quote_id) = self.quote_id() {
            return Ok(quote_id);
        }

        let trip_type = self.state.read().trip_type.ok_or(BuilderError::MissingTripType)?;
        let created = self.gateway.create(trip_type).await.map_err(|e| {
            tracing::error!(%trip_type, "Failed to create draft: {e}");
            BuilderError::Creation(e)
        })?;
        tracing::info!(quote_id = %created.quote_id, %trip_type, "Draft created");

        {
            let mut state = self.state.write();
            state.status = created.status;
            state.validation.set_step_valid(FIRST_STEP, true);
        }
        self.quote_id.send_replace(Some(created.quote_id.clone()));
        self.set_status(BuilderStatus::Ready);
        Ok(created.quote_id)
    }

    /// Write every persisted field now, bypassing the debounce
    pub async fn save_draft(&self) -> BuilderResult<()> {
        if self.quote_id().is_none() {
            return Err(BuilderError::NoDraft);
        }
        let patch = self.state.read().full_patch();
        self.autosave
            .write_now(patch)
            .await
            .map_err(BuilderError::Save)?;
        // Everything pending is contained in the full write
        self.autosave.discard_pending();
        Ok(())
    }

    /// Save the draft, then hand it to the submission workflow
    pub async fn submit(&self) -> BuilderResult<SubmitDraftResponse> {
        let quote_id = self.quote_id().ok_or(BuilderError::NoDraft)?;
        self.save_draft().await?;
        let response = self
            .gateway
            .submit(&quote_id)
            .await
            .map_err(BuilderError::Submit)?;
        self.state.write().status = response.status;
        tracing::info!(quote_id = %quote_id, status = ?response.status, "Draft submitted");
        Ok(response)
    }

    /// Delete the remote draft and reset to a fresh builder
    pub async fn discard_draft(&self) -> BuilderResult<()> {
        if let Some(quote_id) = self.quote_id() {
            self.gateway
                .delete(&quote_id)
                .await
                .map_err(BuilderError::Delete)?;
            tracing::info!(quote_id = %quote_id, "Draft deleted");
        }
        self.autosave.discard_pending();
        self.quote_id.send_replace(None);
        *self.state.write() = DraftState::default();
        *self.load_target.lock() = None;
        self.set_status(BuilderStatus::Idle);
        Ok(())
    }

    /// Tear the session down; pending autosaves are abandoned
    pub fn dispose(self) {
        self.autosave.dispose();
        tracing::debug!(quote_id = ?self.quote_id(), "Draft builder disposed");
    }
}

/// Keep the last entry per vehicle id and drop zero quantities
fn normalize_vehicles(vehicles: Vec<SelectedVehicle>) -> Vec<SelectedVehicle> {
    let mut selected: Vec<SelectedVehicle> = Vec::with_capacity(vehicles.len());
    for vehicle in vehicles {
        selected.retain(|v| v.vehicle_id != vehicle.vehicle_id);
        if vehicle.quantity > 0 {
            selected.push(vehicle);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_id_from_query() {
        assert_eq!(quote_id_from_query("?quoteId=q-17"), Some("q-17".to_string()));
        assert_eq!(
            quote_id_from_query("step=2&quoteId=abc&lang=es"),
            Some("abc".to_string())
        );
        assert_eq!(quote_id_from_query("?quoteId="), None);
        assert_eq!(quote_id_from_query("?other=1"), None);
        assert_eq!(quote_id_from_query(""), None);
    }

    #[test]
    fn test_quote_id_from_query_is_decoded() {
        assert_eq!(quote_id_from_query("?quoteId=q%2D17"), Some("q-17".to_string()));
        assert_eq!(
            quote_id_from_query("lang=es&quoteId=a%2Fb%20c"),
            Some("a/b c".to_string())
        );
    }

    #[test]
    fn test_normalize_vehicles() {
        let vehicles = normalize_vehicles(vec![
            SelectedVehicle::new("minibus-19", 1),
            SelectedVehicle::new("coach-55", 2),
            SelectedVehicle::new("minibus-19", 3),
            SelectedVehicle::new("van-8", 0),
        ]);
        assert_eq!(
            vehicles,
            vec![
                SelectedVehicle::new("coach-55", 2),
                SelectedVehicle::new("minibus-19", 3),
            ]
        );
    }

    #[test]
    fn test_zero_quantity_removes_earlier_entry() {
        let vehicles = normalize_vehicles(vec![
            SelectedVehicle::new("coach-55", 2),
            SelectedVehicle::new("coach-55", 0),
        ]);
        assert!(vehicles.is_empty());
    }
}
