//! Itinerary sanitizer
//!
//! The editor keeps unset times as empty strings so inputs stay controlled;
//! the draft store rejects those, and also rejects itineraries without a
//! pickup and a dropoff. These helpers decide when an itinerary may be sent
//! and normalise it for the wire.

use shared::quote::{Itinerary, Stop, StopType};

/// Whether an itinerary is complete enough to be persisted
///
/// Requires at least one pickup and one dropoff on the outbound leg, an
/// arrival time on every pickup, and both times on every intermediate stop.
pub fn is_save_ready(itinerary: Option<&Itinerary>) -> bool {
    itinerary.is_some_and(|it| is_leg_save_ready(&it.outbound))
}

/// Same rules as [`is_save_ready`], applied to a single leg
pub fn is_leg_save_ready(stops: &[Stop]) -> bool {
    let has_pickup = stops.iter().any(|s| s.stop_type == StopType::Pickup);
    let has_dropoff = stops.iter().any(|s| s.stop_type == StopType::Dropoff);
    has_pickup && has_dropoff && stops.iter().all(has_required_times)
}

fn has_required_times(stop: &Stop) -> bool {
    match stop.stop_type {
        StopType::Pickup => stop.has_arrival(),
        StopType::Intermediate => stop.has_arrival() && stop.has_departure(),
        StopType::Dropoff => true,
    }
}

/// Replace every empty time with an explicit `None`
///
/// Idempotent; non-empty values are kept verbatim.
pub fn sanitize_for_transport(itinerary: &Itinerary) -> Itinerary {
    Itinerary {
        outbound: sanitize_leg(&itinerary.outbound),
        return_leg: itinerary.return_leg.as_deref().map(sanitize_leg),
    }
}

fn sanitize_leg(stops: &[Stop]) -> Vec<Stop> {
    stops
        .iter()
        .map(|stop| Stop {
            arrival_time: non_empty(&stop.arrival_time),
            departure_time: non_empty(&stop.departure_time),
            ..stop.clone()
        })
        .collect()
}

fn non_empty(time: &Option<String>) -> Option<String> {
    time.as_ref().filter(|t| !t.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_outbound() -> Vec<Stop> {
        vec![
            Stop::pickup("Hotel Arts").with_arrival("08:00"),
            Stop::intermediate("Montserrat")
                .with_arrival("09:30")
                .with_departure("12:00"),
            Stop::dropoff("Sitges"),
        ]
    }

    #[test]
    fn test_absent_itinerary_not_ready() {
        assert!(!is_save_ready(None));
    }

    #[test]
    fn test_complete_itinerary_ready() {
        let itinerary = Itinerary::one_way(complete_outbound());
        assert!(is_save_ready(Some(&itinerary)));
    }

    #[test]
    fn test_missing_pickup_or_dropoff() {
        let only_dropoff = Itinerary::one_way(vec![Stop::dropoff("Sitges")]);
        assert!(!is_save_ready(Some(&only_dropoff)));

        let only_pickup = Itinerary::one_way(vec![Stop::pickup("Hotel").with_arrival("08:00")]);
        assert!(!is_save_ready(Some(&only_pickup)));

        assert!(!is_save_ready(Some(&Itinerary::default())));
    }

    #[test]
    fn test_pickup_needs_arrival() {
        let itinerary = Itinerary::one_way(vec![
            Stop::pickup("Hotel").with_arrival(""),
            Stop::dropoff("Airport"),
        ]);
        assert!(!is_save_ready(Some(&itinerary)));

        let itinerary = Itinerary::one_way(vec![Stop::pickup("Hotel"), Stop::dropoff("Airport")]);
        assert!(!is_save_ready(Some(&itinerary)));
    }

    #[test]
    fn test_intermediate_needs_both_times() {
        let mut stops = complete_outbound();
        stops[1].departure_time = Some(String::new());
        assert!(!is_save_ready(Some(&Itinerary::one_way(stops.clone()))));

        stops[1].departure_time = Some("12:00".to_string());
        stops[1].arrival_time = None;
        assert!(!is_save_ready(Some(&Itinerary::one_way(stops))));
    }

    #[test]
    fn test_return_leg_not_required_for_readiness() {
        let itinerary = Itinerary::round_trip(complete_outbound(), vec![Stop::pickup("Sitges")]);
        assert!(is_save_ready(Some(&itinerary)));
        assert!(!is_leg_save_ready(itinerary.return_leg.as_deref().unwrap()));
    }

    #[test]
    fn test_sanitize_maps_empty_times_to_none() {
        let itinerary = Itinerary::round_trip(
            vec![
                Stop::pickup("Hotel").with_arrival("08:00").with_departure(""),
                Stop::dropoff("Airport").with_arrival(""),
            ],
            vec![Stop::pickup("Airport").with_arrival(""), Stop::dropoff("Hotel")],
        );

        let clean = sanitize_for_transport(&itinerary);

        assert_eq!(clean.outbound[0].arrival_time.as_deref(), Some("08:00"));
        assert_eq!(clean.outbound[0].departure_time, None);
        assert_eq!(clean.outbound[1].arrival_time, None);
        let back = clean.return_leg.as_ref().unwrap();
        assert_eq!(back[0].arrival_time, None);
        assert_eq!(back[0].location, "Airport");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let itinerary = Itinerary::one_way(vec![
            Stop::pickup("Hotel").with_arrival("").with_driver_staying(30),
            Stop::intermediate("Museum").with_arrival("10:00").with_departure(""),
            Stop::dropoff("Port"),
        ]);

        let once = sanitize_for_transport(&itinerary);
        let twice = sanitize_for_transport(&once);

        assert_eq!(once, twice);
        assert_eq!(once.outbound[0].driver_staying_minutes, Some(30));
        assert!(once.stops().all(|s| s.arrival_time.as_deref() != Some("")
            && s.departure_time.as_deref() != Some("")));
    }
}
