//! Quote Client - drafting engine and HTTP client for the quote API
//!
//! Provides the multi-step quote builder with debounced autosave, and the
//! gateway it uses to reach the remote draft store.

pub mod config;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod http;
pub mod logger;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};

// Engine
pub use draft::{BuilderError, BuilderResult, BuilderStatus, DraftBuilder, DraftState};
pub use gateway::{DraftGateway, HttpDraftGateway, MemoryDraftGateway};

// Re-export shared types for convenience
pub use shared::quote::{
    Itinerary, Passenger, QuoteDraft, SelectedVehicle, Stop, SubmitDraftResponse, TripType,
};
