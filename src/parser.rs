//! Line-oriented parser for the comma-separated routes dataset.
//!
//! Each line holds nine fields:
//! `airline,airline_id,source,source_id,destination,destination_id,codeshare,stops,equipment`.
//! Fields are split on bare commas with no quoting. Lines with any other
//! field count are skipped, and the `\N` sentinel becomes an empty string.
//! Bytes that are not valid UTF-8 are replaced rather than dropping the line.

use anyhow::Result;
use csv::{ByteRecord, ReaderBuilder};
use std::borrow::Cow;
use std::num::IntErrorKind;
use tracing::{debug, warn};

use crate::record::Route;

/// Token used by the dataset for a missing value.
pub const NULL_SENTINEL: &str = "\\N";

/// Number of fields in a well-formed line.
pub const FIELD_COUNT: usize = 9;

const STOPS_FIELD: usize = 7;

/// Routes read from a dataset plus counters describing what was dropped.
#[derive(Debug, Default)]
pub struct ParsedRoutes {
    pub routes: Vec<Route>,
    /// Non-empty lines seen.
    pub lines_read: usize,
    /// Lines skipped because they did not have exactly [`FIELD_COUNT`] fields.
    pub malformed_lines: usize,
    /// Routes kept with invalid UTF-8 replaced by `U+FFFD`.
    pub lossy_lines: usize,
    /// Routes whose stops field was not a valid integer.
    pub invalid_stops: usize,
}

impl ParsedRoutes {
    pub fn skipped_lines(&self) -> usize {
        self.malformed_lines
    }
}

/// Parses raw dataset bytes into routes.
///
/// # Errors
///
/// Returns an error only if the underlying reader fails; lines with the
/// wrong field count are counted and skipped.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn parse_routes(bytes: &[u8]) -> Result<ParsedRoutes> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(bytes);

    let mut parsed = ParsedRoutes {
        routes: Vec::with_capacity(bytes.len() / 64),
        ..Default::default()
    };

    for result in rdr.byte_records() {
        let record = result?;
        parsed.lines_read += 1;

        match route_from_record(&record) {
            Some(line) => {
                if line.lossy {
                    parsed.lossy_lines += 1;
                    debug!(line = parsed.lines_read, "Replaced invalid UTF-8 in line");
                }
                if !line.stops_ok {
                    parsed.invalid_stops += 1;
                }
                parsed.routes.push(line.route);
            }
            None => {
                parsed.malformed_lines += 1;
                debug!(
                    line = parsed.lines_read,
                    fields = record.len(),
                    "Skipping line with wrong field count"
                );
            }
        }
    }

    debug!(
        routes = parsed.routes.len(),
        skipped = parsed.skipped_lines(),
        invalid_stops = parsed.invalid_stops,
        "Routes parsed"
    );

    Ok(parsed)
}

struct ParsedLine {
    route: Route,
    stops_ok: bool,
    lossy: bool,
}

/// Converts one split line into a [`Route`].
///
/// Returns `None` for a wrong field count.
fn route_from_record(record: &ByteRecord) -> Option<ParsedLine> {
    if record.len() != FIELD_COUNT {
        return None;
    }

    let mut lossy = false;
    let mut field = |i: usize| -> String {
        let value = String::from_utf8_lossy(&record[i]);
        if matches!(value, Cow::Owned(_)) {
            lossy = true;
        }
        if value == NULL_SENTINEL {
            String::new()
        } else {
            value.into_owned()
        }
    };

    let raw_stops = String::from_utf8_lossy(&record[STOPS_FIELD]);
    let (stops, stops_ok) = parse_stops(&raw_stops);
    if !stops_ok {
        warn!(value = %raw_stops, stops, "Cannot convert stops to integer");
    }

    let route = Route {
        airline: field(0),
        airline_id: field(1),
        source_airport: field(2),
        source_airport_id: field(3),
        destination_airport: field(4),
        destination_airport_id: field(5),
        codeshare: field(6),
        stops,
        equipment: field(8),
    };

    Some(ParsedLine {
        route,
        stops_ok,
        lossy,
    })
}

/// Parses the stops column. Signed values are kept as-is; out-of-range
/// values saturate and anything else becomes 0. The flag is `false` when
/// the value was not a valid integer.
fn parse_stops(value: &str) -> (i64, bool) {
    match value.parse::<i64>() {
        Ok(stops) => (stops, true),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => (i64::MAX, false),
            IntErrorKind::NegOverflow => (i64::MIN, false),
            _ => (0, false),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_bytes() {
        let parsed = parse_routes(&[]).unwrap();
        assert!(parsed.routes.is_empty());
        assert_eq!(parsed.lines_read, 0);
    }

    #[test]
    fn test_parse_valid_line() {
        let data = b"2B,410,AER,2965,KZN,2990,,0,CR2\n";
        let parsed = parse_routes(data).unwrap();

        assert_eq!(parsed.routes.len(), 1);
        let route = &parsed.routes[0];
        assert_eq!(route.airline, "2B");
        assert_eq!(route.airline_id, "410");
        assert_eq!(route.source_airport, "AER");
        assert_eq!(route.source_airport_id, "2965");
        assert_eq!(route.destination_airport, "KZN");
        assert_eq!(route.destination_airport_id, "2990");
        assert_eq!(route.codeshare, "");
        assert_eq!(route.stops, 0);
        assert_eq!(route.equipment, "CR2");
    }

    #[test]
    fn test_null_sentinel_becomes_empty() {
        let data = b"AA,\\N,JFK,\\N,LAX,\\N,Y,1,\\N\n";
        let parsed = parse_routes(data).unwrap();

        let route = &parsed.routes[0];
        assert_eq!(route.airline_id, "");
        assert_eq!(route.source_airport_id, "");
        assert_eq!(route.destination_airport_id, "");
        assert_eq!(route.codeshare, "Y");
        assert_eq!(route.stops, 1);
        assert_eq!(route.equipment, "");
    }

    #[test]
    fn test_wrong_field_count_is_skipped() {
        let data = b"AA,1,JFK,2,LAX,3,,0\nAA,1,JFK,2,LAX,3,,0,738,extra\nBB,1,JFK,2,ORD,3,,0,738\n";
        let parsed = parse_routes(data).unwrap();

        assert_eq!(parsed.lines_read, 3);
        assert_eq!(parsed.malformed_lines, 2);
        assert_eq!(parsed.routes.len(), 1);
        assert_eq!(parsed.routes[0].airline, "BB");
    }

    #[test]
    fn test_quotes_are_not_special() {
        let data = b"\"A,A\",1,JFK,2,LAX,3,,0,738\n";
        let parsed = parse_routes(data).unwrap();

        // The quoted comma still splits, giving ten fields.
        assert!(parsed.routes.is_empty());
        assert_eq!(parsed.malformed_lines, 1);
    }

    #[test]
    fn test_invalid_stops_defaults_to_zero() {
        let data = b"AA,1,JFK,2,LAX,3,,x,738\nAA,1,JFK,2,ORD,3,,\\N,738\nAA,1,JFK,2,SFO,3,,,738\n";
        let parsed = parse_routes(data).unwrap();

        assert_eq!(parsed.routes.len(), 3);
        assert_eq!(parsed.invalid_stops, 3);
        assert!(parsed.routes.iter().all(|r| r.stops == 0));
    }

    #[test]
    fn test_negative_stops_kept() {
        let data = b"AA,1,JFK,2,LAX,3,,-1,738\n";
        let parsed = parse_routes(data).unwrap();

        assert_eq!(parsed.routes[0].stops, -1);
        assert_eq!(parsed.invalid_stops, 0);
        assert!(!parsed.routes[0].is_direct());
    }

    #[test]
    fn test_out_of_range_stops_saturate() {
        assert_eq!(parse_stops("99999999999999999999"), (i64::MAX, false));
        assert_eq!(parse_stops("-99999999999999999999"), (i64::MIN, false));
        assert_eq!(parse_stops("x"), (0, false));
        assert_eq!(parse_stops("2"), (2, true));
    }

    #[test]
    fn test_invalid_utf8_line_is_kept() {
        let mut data = b"AA,1,JFK,2,LAX,3,,0,738\n".to_vec();
        data.extend_from_slice(b"BB,1,J\xc9K,2,LAX,3,,0,738\n");
        data.extend_from_slice(b"CC,1,JFK,2,LAX,3,,0,738\n");

        let parsed = parse_routes(&data).unwrap();

        assert_eq!(parsed.routes.len(), 3);
        assert_eq!(parsed.lossy_lines, 1);
        assert_eq!(parsed.skipped_lines(), 0);
        assert_eq!(parsed.routes[1].airline, "BB");
        assert_eq!(parsed.routes[1].source_airport, "J\u{FFFD}K");
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let data = b"AA,1,JFK,2,LAX,3,,0,738\r\n\r\nBB,1,JFK,2,ORD,3,,2,738\r\n";
        let parsed = parse_routes(data).unwrap();

        assert_eq!(parsed.routes.len(), 2);
        assert_eq!(parsed.routes[0].equipment, "738");
        assert_eq!(parsed.routes[1].stops, 2);
    }
}
