//! Flight route records as produced by ingestion.

use serde::Serialize;

/// One entry of the routes dataset.
///
/// Optional columns hold an empty string when the source row carried the
/// `\N` sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Route {
    pub airline: String,
    pub airline_id: String,
    pub source_airport: String,
    pub source_airport_id: String,
    pub destination_airport: String,
    pub destination_airport_id: String,
    pub codeshare: String,
    pub stops: i64,
    pub equipment: String,
}

impl Route {
    /// Builds a route from the three keys the rankings care about.
    pub fn new(airline: &str, source: &str, destination: &str, stops: i64) -> Self {
        Route {
            airline: airline.to_string(),
            source_airport: source.to_string(),
            destination_airport: destination.to_string(),
            stops,
            ..Default::default()
        }
    }

    /// Only an explicit zero counts; negative or saturated values do not.
    pub fn is_direct(&self) -> bool {
        self.stops == 0
    }

    /// Direction-independent key for the airport pair, e.g. `JFK:LAX`.
    pub fn city_pair(&self) -> String {
        let (a, b) = if self.source_airport <= self.destination_airport {
            (&self.source_airport, &self.destination_airport)
        } else {
            (&self.destination_airport, &self.source_airport)
        };
        format!("{}:{}", a, b)
    }
}
