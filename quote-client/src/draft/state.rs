//! Local builder state

use std::collections::BTreeSet;

use shared::quote::{
    DraftPatch, FIRST_STEP, Itinerary, LAST_STEP, Passenger, QuoteDraft, QuoteStatus,
    SelectedVehicle, TripType,
};

use super::itinerary::{is_save_ready, sanitize_for_transport};
use super::navigation::NavigationController;
use super::validation::StepValidation;

/// Every builder field as the user currently sees it
///
/// Times inside `itinerary` may hold empty strings (not yet entered).
#[derive(Debug, Clone, PartialEq)]
pub struct DraftState {
    pub status: QuoteStatus,
    pub trip_type: Option<TripType>,
    pub itinerary: Option<Itinerary>,
    pub trip_name: String,
    pub event_type: Option<String>,
    pub custom_event_type: Option<String>,
    pub passengers: Vec<Passenger>,
    pub selected_vehicles: Vec<SelectedVehicle>,
    pub selected_amenities: BTreeSet<String>,
    pub navigation: NavigationController,
    pub validation: StepValidation,
}

impl Default for DraftState {
    fn default() -> Self {
        Self {
            status: QuoteStatus::Draft,
            trip_type: None,
            itinerary: None,
            trip_name: String::new(),
            event_type: None,
            custom_event_type: None,
            passengers: Vec::new(),
            selected_vehicles: Vec::new(),
            selected_amenities: BTreeSet::new(),
            navigation: NavigationController::new(),
            validation: StepValidation::new(),
        }
    }
}

impl DraftState {
    /// Rebuild local state from a stored record
    pub fn from_record(record: &QuoteDraft) -> Self {
        Self {
            status: record.status,
            trip_type: record.trip_type,
            itinerary: record.itinerary.clone(),
            trip_name: record.trip_name.clone().unwrap_or_default(),
            event_type: record.event_type.clone(),
            custom_event_type: record.custom_event_type.clone(),
            passengers: record.passengers.clone(),
            selected_vehicles: record.selected_vehicles.clone(),
            selected_amenities: record.selected_amenities.clone(),
            navigation: NavigationController::at(record.current_step.clamp(FIRST_STEP, LAST_STEP)),
            validation: StepValidation::new(),
        }
    }

    pub fn current_step(&self) -> u8 {
        self.navigation.current_step()
    }

    /// Itinerary in wire form, only when it may be persisted
    pub fn transport_itinerary(&self) -> Option<Itinerary> {
        self.itinerary
            .as_ref()
            .filter(|it| is_save_ready(Some(it)))
            .map(sanitize_for_transport)
    }

    /// Every persisted field, for an explicit full save
    pub fn full_patch(&self) -> DraftPatch {
        DraftPatch {
            trip_type: self.trip_type,
            current_step: Some(self.current_step()),
            itinerary: self.transport_itinerary(),
            trip_name: Some(self.trip_name.clone()),
            event_type: self.event_type.clone(),
            custom_event_type: Some(self.custom_event_type.clone()),
            passengers: Some(self.passengers.clone()),
            selected_vehicles: Some(self.selected_vehicles.clone()),
            selected_amenities: Some(self.selected_amenities.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::quote::Stop;

    #[test]
    fn test_from_record_restores_step_and_fields() {
        let mut record = QuoteDraft::new("q-9", TripType::TwoWay);
        record.current_step = 4;
        record.trip_name = Some("Graduation".to_string());
        record.passengers = vec![Passenger::new("Li Wei", "+34600999888", 22)];

        let state = DraftState::from_record(&record);

        assert_eq!(state.current_step(), 4);
        assert_eq!(state.trip_type, Some(TripType::TwoWay));
        assert_eq!(state.trip_name, "Graduation");
        assert_eq!(state.passengers.len(), 1);
    }

    #[test]
    fn test_from_record_clamps_bad_step() {
        let mut record = QuoteDraft::new("q-9", TripType::OneWay);
        record.current_step = 9;
        assert_eq!(DraftState::from_record(&record).current_step(), LAST_STEP);

        record.current_step = 0;
        assert_eq!(DraftState::from_record(&record).current_step(), FIRST_STEP);
    }

    #[test]
    fn test_full_patch_skips_incomplete_itinerary() {
        let state = DraftState {
            trip_type: Some(TripType::OneWay),
            itinerary: Some(Itinerary::one_way(vec![Stop::pickup("A").with_arrival("")])),
            trip_name: "Trip".to_string(),
            ..Default::default()
        };

        let patch = state.full_patch();
        assert!(patch.itinerary.is_none());
        assert_eq!(patch.trip_name.as_deref(), Some("Trip"));
        assert_eq!(patch.current_step, Some(FIRST_STEP));
        assert_eq!(patch.custom_event_type, Some(None));
    }
}
