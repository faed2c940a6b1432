//! Data types used by the ranking pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::rank::RankedList;

/// How many entries each ranking keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankLimits {
    pub airlines_by_cities: usize,
    pub airlines_by_direct_routes: usize,
    pub cities_by_airlines: usize,
}

impl Default for RankLimits {
    fn default() -> Self {
        Self {
            airlines_by_cities: 3,
            airlines_by_direct_routes: 3,
            cities_by_airlines: 10,
        }
    }
}

/// The three rankings computed over one routes dataset, in fixed order.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub generated_at: DateTime<Utc>,
    pub routes_analyzed: usize,
    pub limits: RankLimits,
    /// Airlines serving the most distinct airports.
    pub airlines_by_cities: RankedList,
    /// Airlines with the most distinct zero-stop airport pairs.
    pub airlines_by_direct_routes: RankedList,
    /// Airports served by the most distinct airlines.
    pub cities_by_airlines: RankedList,
}

impl RouteReport {
    /// Iterates over `(ranking name, ranked list)` in report order.
    pub fn rankings(&self) -> [(&'static str, &RankedList); 3] {
        [
            ("airlines_by_cities", &self.airlines_by_cities),
            ("airlines_by_direct_routes", &self.airlines_by_direct_routes),
            ("cities_by_airlines", &self.cities_by_airlines),
        ]
    }
}
