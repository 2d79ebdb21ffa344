//! Step validation tracker
//!
//! One completion flag per builder step. Flags only change when a caller
//! reports them; nothing here reacts to field edits on its own.

use shared::quote::{FIRST_STEP, LAST_STEP, OTHER_EVENT_TYPE, STEP_COUNT, TripType};
use validator::Validate;

use super::itinerary::{is_leg_save_ready, is_save_ready};
use super::state::DraftState;

/// Completion flags for steps 1..=5
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepValidation {
    flags: [bool; STEP_COUNT],
}

impl StepValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flags(flags: [bool; STEP_COUNT]) -> Self {
        Self { flags }
    }

    /// Record a step's validity. Out-of-range steps are ignored.
    pub fn set_step_valid(&mut self, step: u8, valid: bool) {
        match Self::index(step) {
            Some(i) => self.flags[i] = valid,
            None => tracing::warn!(step, "Ignoring validity for unknown step"),
        }
    }

    pub fn is_valid(&self, step: u8) -> bool {
        Self::index(step).is_some_and(|i| self.flags[i])
    }

    /// Highest step flagged valid, or 0 when none is
    pub fn highest_valid(&self) -> u8 {
        (FIRST_STEP..=LAST_STEP)
            .rev()
            .find(|&step| self.is_valid(step))
            .unwrap_or(0)
    }

    pub fn flags(&self) -> [bool; STEP_COUNT] {
        self.flags
    }

    fn index(step: u8) -> Option<usize> {
        (FIRST_STEP..=LAST_STEP)
            .contains(&step)
            .then(|| usize::from(step - FIRST_STEP))
    }
}

/// Default completion predicates used by the builder steps
pub struct StepRules;

impl StepRules {
    pub fn evaluate(state: &DraftState) -> StepValidation {
        let earlier = [
            Self::trip_type(state),
            Self::itinerary(state),
            Self::details(state),
            Self::vehicles(state),
        ];
        let [trip_type, itinerary, details, vehicles] = earlier;
        StepValidation::from_flags([
            trip_type,
            itinerary,
            details,
            vehicles,
            Self::amenities(&earlier),
        ])
    }

    /// Step 1: a trip type has been chosen
    pub fn trip_type(state: &DraftState) -> bool {
        state.trip_type.is_some()
    }

    /// Step 2: outbound leg save-ready; return leg too when a two-way trip has one
    pub fn itinerary(state: &DraftState) -> bool {
        let Some(itinerary) = state.itinerary.as_ref() else {
            return false;
        };
        if !is_save_ready(Some(itinerary)) {
            return false;
        }
        match (state.trip_type, itinerary.return_leg.as_deref()) {
            (Some(TripType::TwoWay), Some(stops)) => is_leg_save_ready(stops),
            _ => true,
        }
    }

    /// Step 3: trip name, event type (custom text when "other") and passengers
    pub fn details(state: &DraftState) -> bool {
        if state.trip_name.trim().is_empty() {
            return false;
        }
        let event_ok = match state.event_type.as_deref() {
            None | Some("") => false,
            Some(OTHER_EVENT_TYPE) => state
                .custom_event_type
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty()),
            Some(_) => true,
        };
        event_ok
            && !state.passengers.is_empty()
            && state.passengers.iter().all(|p| p.validate().is_ok())
    }

    /// Step 4: at least one vehicle with a positive quantity
    pub fn vehicles(state: &DraftState) -> bool {
        state.selected_vehicles.iter().any(|v| v.quantity > 0)
    }

    /// Step 5: amenities are optional, so it is complete once steps 1-4 are
    pub fn amenities(earlier: &[bool; 4]) -> bool {
        earlier.iter().all(|&valid| valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::quote::{Itinerary, Passenger, SelectedVehicle, Stop};

    #[test]
    fn test_flags_start_invalid() {
        let validation = StepValidation::new();
        assert_eq!(validation.highest_valid(), 0);
        assert!((FIRST_STEP..=LAST_STEP).all(|s| !validation.is_valid(s)));
    }

    #[test]
    fn test_set_and_highest() {
        let mut validation = StepValidation::new();
        validation.set_step_valid(1, true);
        validation.set_step_valid(3, true);
        assert_eq!(validation.highest_valid(), 3);

        validation.set_step_valid(3, false);
        assert_eq!(validation.highest_valid(), 1);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut validation = StepValidation::new();
        validation.set_step_valid(0, true);
        validation.set_step_valid(6, true);
        assert_eq!(validation, StepValidation::new());
        assert!(!validation.is_valid(6));
    }

    fn detailed_state() -> DraftState {
        DraftState {
            trip_type: Some(TripType::OneWay),
            trip_name: "Team offsite".to_string(),
            event_type: Some("corporate".to_string()),
            passengers: vec![Passenger::new("Ana Ruiz", "+34600111222", 34)],
            ..Default::default()
        }
    }

    #[test]
    fn test_details_rules() {
        let mut state = detailed_state();
        assert!(StepRules::details(&state));

        state.event_type = Some(OTHER_EVENT_TYPE.to_string());
        assert!(!StepRules::details(&state));
        state.custom_event_type = Some("Reunion".to_string());
        assert!(StepRules::details(&state));

        state.passengers.clear();
        assert!(!StepRules::details(&state));
    }

    #[test]
    fn test_itinerary_rules_check_return_leg_for_two_way() {
        let outbound = vec![Stop::pickup("A").with_arrival("08:00"), Stop::dropoff("B")];
        let mut state = DraftState {
            trip_type: Some(TripType::TwoWay),
            itinerary: Some(Itinerary::round_trip(outbound.clone(), vec![Stop::pickup("B")])),
            ..Default::default()
        };
        assert!(!StepRules::itinerary(&state));

        state.itinerary = Some(Itinerary::round_trip(
            outbound,
            vec![Stop::pickup("B").with_arrival("18:00"), Stop::dropoff("A")],
        ));
        assert!(StepRules::itinerary(&state));
    }

    #[test]
    fn test_evaluate_all_steps() {
        let mut state = detailed_state();
        state.selected_vehicles = vec![SelectedVehicle::new("coach-55", 1)];

        let validation = StepRules::evaluate(&state);
        assert_eq!(validation.flags(), [true, false, true, true, false]);

        state.itinerary = Some(Itinerary::one_way(vec![
            Stop::pickup("Hotel").with_arrival("09:00"),
            Stop::dropoff("Venue"),
        ]));
        assert_eq!(StepRules::evaluate(&state).flags(), [true; STEP_COUNT]);
    }
}
