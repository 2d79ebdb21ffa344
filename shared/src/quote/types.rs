//! Enumerations and constants shared by the quote builder

use serde::{Deserialize, Serialize};

/// First editable builder step (trip type selection)
pub const FIRST_STEP: u8 = 1;

/// Last editable builder step (amenities)
pub const LAST_STEP: u8 = 5;

/// Number of builder steps
pub const STEP_COUNT: usize = LAST_STEP as usize;

/// Event type value that requires a free-text `customEventType`
pub const OTHER_EVENT_TYPE: &str = "other";

/// Trip type chosen in step 1
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    OneWay,
    TwoWay,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneWay => "one_way",
            Self::TwoWay => "two_way",
        }
    }

    /// Whether the itinerary carries a return leg
    pub fn has_return(&self) -> bool {
        matches!(self, Self::TwoWay)
    }
}

impl std::fmt::Display for TripType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow status of a quote record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Submitted,
    Quoted,
    Confirmed,
    Cancelled,
    /// Status introduced server-side that this client does not know yet
    #[serde(other)]
    Unknown,
}

impl QuoteStatus {
    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }
}
