//! Itinerary Model

use serde::{Deserialize, Serialize};

/// Role of a stop within a leg
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Pickup,
    Intermediate,
    Dropoff,
}

/// Geographic position of a stop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A single stop of an itinerary leg
///
/// Time fields are `HH:MM` strings. While editing, `Some("")` means
/// "not yet entered"; on the wire an unset time is always `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(rename = "type")]
    pub stop_type: StopType,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    /// Only meaningful for intermediate stops
    #[serde(default)]
    pub departure_time: Option<String>,
    /// How long the driver stays with the group at this stop, in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_staying_minutes: Option<u32>,
}

impl Stop {
    pub fn new(stop_type: StopType, location: impl Into<String>) -> Self {
        Self {
            stop_type,
            location: location.into(),
            coordinates: None,
            arrival_time: None,
            departure_time: None,
            driver_staying_minutes: None,
        }
    }

    pub fn pickup(location: impl Into<String>) -> Self {
        Self::new(StopType::Pickup, location)
    }

    pub fn intermediate(location: impl Into<String>) -> Self {
        Self::new(StopType::Intermediate, location)
    }

    pub fn dropoff(location: impl Into<String>) -> Self {
        Self::new(StopType::Dropoff, location)
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates { lat, lng });
        self
    }

    pub fn with_arrival(mut self, time: impl Into<String>) -> Self {
        self.arrival_time = Some(time.into());
        self
    }

    pub fn with_departure(mut self, time: impl Into<String>) -> Self {
        self.departure_time = Some(time.into());
        self
    }

    pub fn with_driver_staying(mut self, minutes: u32) -> Self {
        self.driver_staying_minutes = Some(minutes);
        self
    }

    /// Arrival time entered (non-empty)
    pub fn has_arrival(&self) -> bool {
        is_filled(self.arrival_time.as_deref())
    }

    /// Departure time entered (non-empty)
    pub fn has_departure(&self) -> bool {
        is_filled(self.departure_time.as_deref())
    }
}

fn is_filled(time: Option<&str>) -> bool {
    time.is_some_and(|t| !t.is_empty())
}

/// Outbound leg plus optional return leg
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    pub outbound: Vec<Stop>,
    #[serde(rename = "return", default, skip_serializing_if = "Option::is_none")]
    pub return_leg: Option<Vec<Stop>>,
}

impl Itinerary {
    pub fn one_way(outbound: Vec<Stop>) -> Self {
        Self {
            outbound,
            return_leg: None,
        }
    }

    pub fn round_trip(outbound: Vec<Stop>, return_leg: Vec<Stop>) -> Self {
        Self {
            outbound,
            return_leg: Some(return_leg),
        }
    }

    /// Iterate every stop of both legs
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.outbound
            .iter()
            .chain(self.return_leg.iter().flatten())
    }
}
