//! Partial draft updates

use std::collections::BTreeSet;

use serde::Serialize;

use super::{Itinerary, Passenger, SelectedVehicle, TripType};

/// Subset of draft fields sent with an `update` call
///
/// Absent fields are left untouched by the draft store. `custom_event_type`
/// is doubly optional: `Some(None)` is sent as an explicit `null` to clear it.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_type: Option<TripType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<Itinerary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_event_type: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passengers: Option<Vec<Passenger>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_vehicles: Option<Vec<SelectedVehicle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_amenities: Option<BTreeSet<String>>,
}

impl DraftPatch {
    pub fn step(step: u8) -> Self {
        Self {
            current_step: Some(step),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fold `other` into `self`; fields present in `other` win
    pub fn merge(&mut self, other: DraftPatch) {
        if other.trip_type.is_some() {
            self.trip_type = other.trip_type;
        }
        if other.current_step.is_some() {
            self.current_step = other.current_step;
        }
        if other.itinerary.is_some() {
            self.itinerary = other.itinerary;
        }
        if other.trip_name.is_some() {
            self.trip_name = other.trip_name;
        }
        if other.event_type.is_some() {
            self.event_type = other.event_type;
        }
        if other.custom_event_type.is_some() {
            self.custom_event_type = other.custom_event_type;
        }
        if other.passengers.is_some() {
            self.passengers = other.passengers;
        }
        if other.selected_vehicles.is_some() {
            self.selected_vehicles = other.selected_vehicles;
        }
        if other.selected_amenities.is_some() {
            self.selected_amenities = other.selected_amenities;
        }
    }

    /// Names of the fields carried, in wire spelling (for logs)
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.trip_type.is_some() {
            names.push("tripType");
        }
        if self.current_step.is_some() {
            names.push("currentStep");
        }
        if self.itinerary.is_some() {
            names.push("itinerary");
        }
        if self.trip_name.is_some() {
            names.push("tripName");
        }
        if self.event_type.is_some() {
            names.push("eventType");
        }
        if self.custom_event_type.is_some() {
            names.push("customEventType");
        }
        if self.passengers.is_some() {
            names.push("passengers");
        }
        if self.selected_vehicles.is_some() {
            names.push("selectedVehicles");
        }
        if self.selected_amenities.is_some() {
            names.push("selectedAmenities");
        }
        names
    }
}
