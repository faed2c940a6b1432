//! The three route rankings built on [`DistinctGroups`].

use crate::analyzers::types::{RankLimits, RouteReport};
use crate::rank::{DistinctGroups, RankedEntry, RankedList};
use crate::record::Route;
use chrono::Utc;
use tracing::debug;

/// Ranks airlines by the number of distinct airports they fly from or to.
pub fn top_airlines_by_cities(routes: &[Route], n: usize) -> RankedList {
    let mut cities: DistinctGroups<&str, &str> = DistinctGroups::new();

    for route in routes {
        cities.insert(&route.airline, &route.source_airport);
        cities.insert(&route.airline, &route.destination_airport);
    }

    into_owned(cities.top_n(n))
}

/// Ranks airlines by the number of distinct airport pairs they fly without stops.
///
/// `A -> B` and `B -> A` count as the same pair.
pub fn top_airlines_by_direct_routes(routes: &[Route], n: usize) -> RankedList {
    let mut pairs: DistinctGroups<&str, String> = DistinctGroups::new();

    for route in routes.iter().filter(|r| r.is_direct()) {
        pairs.insert(&route.airline, route.city_pair());
    }

    into_owned(pairs.top_n(n))
}

/// Ranks airports by the number of distinct airlines flying from or to them.
pub fn top_cities_by_airlines(routes: &[Route], n: usize) -> RankedList {
    let mut airlines: DistinctGroups<&str, &str> = DistinctGroups::new();

    for route in routes {
        airlines.insert(&route.source_airport, &route.airline);
        airlines.insert(&route.destination_airport, &route.airline);
    }

    into_owned(airlines.top_n(n))
}

/// Computes all three rankings over `routes`.
#[tracing::instrument(skip(routes), fields(route_count = routes.len()))]
pub fn analyze_routes(routes: &[Route], limits: RankLimits) -> RouteReport {
    let airlines_by_cities = top_airlines_by_cities(routes, limits.airlines_by_cities);
    let airlines_by_direct_routes =
        top_airlines_by_direct_routes(routes, limits.airlines_by_direct_routes);
    let cities_by_airlines = top_cities_by_airlines(routes, limits.cities_by_airlines);

    debug!(
        airlines_by_cities = airlines_by_cities.len(),
        airlines_by_direct_routes = airlines_by_direct_routes.len(),
        cities_by_airlines = cities_by_airlines.len(),
        "Rankings computed"
    );

    RouteReport {
        generated_at: Utc::now(),
        routes_analyzed: routes.len(),
        limits,
        airlines_by_cities,
        airlines_by_direct_routes,
        cities_by_airlines,
    }
}

fn into_owned(ranked: RankedList<&str>) -> RankedList {
    ranked
        .into_iter()
        .map(|e| RankedEntry::new(e.key.to_string(), e.count))
        .collect()
}
