//! Quote draft models
//!
//! Wire types for the multi-step quote builder and its remote draft store.
//! All JSON field names are camelCase.

pub mod draft;
pub mod itinerary;
pub mod patch;
pub mod types;

// Re-exports
pub use draft::*;
pub use itinerary::*;
pub use patch::*;
pub use types::*;
