//! Quote Draft Model

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{DraftPatch, Itinerary, QuoteStatus, TripType, FIRST_STEP};

/// Passenger entry collected in step 3
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(length(min = 6, max = 20))]
    pub phone_number: String,
    #[validate(range(max = 120))]
    pub age: u32,
}

impl Passenger {
    pub fn new(full_name: impl Into<String>, phone_number: impl Into<String>, age: u32) -> Self {
        Self {
            full_name: full_name.into(),
            phone_number: phone_number.into(),
            age,
        }
    }
}

/// Vehicle chosen in step 4
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedVehicle {
    pub vehicle_id: String,
    pub quantity: u32,
}

impl SelectedVehicle {
    pub fn new(vehicle_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            quantity,
        }
    }
}

/// Full draft record as stored remotely
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    pub quote_id: String,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default)]
    pub trip_type: Option<TripType>,
    #[serde(default)]
    pub itinerary: Option<Itinerary>,
    #[serde(default)]
    pub trip_name: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub custom_event_type: Option<String>,
    #[serde(default)]
    pub passengers: Vec<Passenger>,
    #[serde(default)]
    pub selected_vehicles: Vec<SelectedVehicle>,
    #[serde(default)]
    pub selected_amenities: BTreeSet<String>,
    #[serde(default = "default_step")]
    pub current_step: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_step() -> u8 {
    FIRST_STEP
}

impl QuoteDraft {
    /// Freshly created record, as returned right after `create`
    pub fn new(quote_id: impl Into<String>, trip_type: TripType) -> Self {
        Self {
            quote_id: quote_id.into(),
            status: QuoteStatus::Draft,
            trip_type: Some(trip_type),
            itinerary: None,
            trip_name: None,
            event_type: None,
            custom_event_type: None,
            passengers: Vec::new(),
            selected_vehicles: Vec::new(),
            selected_amenities: BTreeSet::new(),
            current_step: FIRST_STEP,
            updated_at: None,
        }
    }

    /// Apply a partial update the way the draft store does (per-field overwrite)
    pub fn apply_patch(&mut self, patch: &DraftPatch) {
        if let Some(trip_type) = patch.trip_type {
            self.trip_type = Some(trip_type);
        }
        if let Some(step) = patch.current_step {
            self.current_step = step;
        }
        if let Some(itinerary) = &patch.itinerary {
            self.itinerary = Some(itinerary.clone());
        }
        if let Some(name) = &patch.trip_name {
            self.trip_name = Some(name.clone());
        }
        if let Some(event_type) = &patch.event_type {
            self.event_type = Some(event_type.clone());
        }
        if let Some(custom) = &patch.custom_event_type {
            self.custom_event_type = custom.clone();
        }
        if let Some(passengers) = &patch.passengers {
            self.passengers = passengers.clone();
        }
        if let Some(vehicles) = &patch.selected_vehicles {
            self.selected_vehicles = vehicles.clone();
        }
        if let Some(amenities) = &patch.selected_amenities {
            self.selected_amenities = amenities.clone();
        }
    }
}

/// Body of the create call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftRequest {
    pub trip_type: TripType,
}

/// Result of the create call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftResponse {
    pub quote_id: String,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default = "default_step")]
    pub current_step: u8,
}

/// Result of handing a draft over to the submission workflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDraftResponse {
    pub quote_id: String,
    pub status: QuoteStatus,
    /// Opaque pricing breakdown computed server-side
    #[serde(default)]
    pub pricing: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults_on_sparse_record() {
        let draft: QuoteDraft =
            serde_json::from_str(r#"{"quoteId":"q-1","tripType":"one_way"}"#).unwrap();
        assert_eq!(draft.quote_id, "q-1");
        assert_eq!(draft.status, QuoteStatus::Draft);
        assert_eq!(draft.current_step, FIRST_STEP);
        assert!(draft.passengers.is_empty());
        assert!(draft.itinerary.is_none());
    }

    #[test]
    fn test_apply_patch_overwrites_only_present_fields() {
        let mut draft = QuoteDraft::new("q-1", TripType::OneWay);
        draft.trip_name = Some("Old".to_string());
        draft.event_type = Some("wedding".to_string());

        let patch = DraftPatch {
            current_step: Some(3),
            trip_name: Some("New".to_string()),
            ..Default::default()
        };
        draft.apply_patch(&patch);

        assert_eq!(draft.current_step, 3);
        assert_eq!(draft.trip_name.as_deref(), Some("New"));
        assert_eq!(draft.event_type.as_deref(), Some("wedding"));
    }

    #[test]
    fn test_apply_patch_clears_custom_event_type() {
        let mut draft = QuoteDraft::new("q-1", TripType::OneWay);
        draft.custom_event_type = Some("Reunion".to_string());

        let patch = DraftPatch {
            event_type: Some("wedding".to_string()),
            custom_event_type: Some(None),
            ..Default::default()
        };
        draft.apply_patch(&patch);

        assert!(draft.custom_event_type.is_none());
    }

    #[test]
    fn test_passenger_validation() {
        assert!(Passenger::new("Ana Ruiz", "+34600111222", 34).validate().is_ok());
        assert!(Passenger::new("", "+34600111222", 34).validate().is_err());
        assert!(Passenger::new("Ana Ruiz", "12", 34).validate().is_err());
        assert!(Passenger::new("Ana Ruiz", "+34600111222", 130).validate().is_err());
    }
}
