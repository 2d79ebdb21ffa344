//! Quote drafting engine
//!
//! Builds a quote over five steps (trip type, itinerary, details, vehicles,
//! amenities) while persisting partial state to the remote draft store.
//!
//! - [`DraftBuilder`]: the state container every other part composes against
//! - [`AutosaveScheduler`]: debounced and immediate writes
//! - [`NavigationController`] / [`StepValidation`]: step policy and flags
//! - [`itinerary`]: save-readiness and transport sanitizing

mod autosave;
mod builder;
mod error;
pub mod itinerary;
mod navigation;
mod state;
mod validation;

pub use autosave::AutosaveScheduler;
pub use builder::{BuilderStatus, DraftBuilder, QUOTE_ID_PARAM, quote_id_from_query};
pub use error::{BuilderError, BuilderResult};
pub use itinerary::{is_save_ready, sanitize_for_transport};
pub use navigation::{NavigationController, Transition};
pub use state::DraftState;
pub use validation::{StepRules, StepValidation};
