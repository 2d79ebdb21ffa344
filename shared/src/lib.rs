//! Shared types for the quote builder
//!
//! Wire models exchanged with the remote draft store and the
//! standard API response envelope.

pub mod quote;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use quote::{
    Coordinates, CreateDraftRequest, CreateDraftResponse, DraftPatch, Itinerary, Passenger,
    QuoteDraft, QuoteStatus, SelectedVehicle, Stop, StopType, SubmitDraftResponse, TripType,
};
pub use response::ApiResponse;
