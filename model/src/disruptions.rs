use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::io::{BufRead, BufReader, Read};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::coords::LonLat;
use crate::fields::split_line;
use crate::{Error, Result};

/// A service disruption: where it is and when it's expected to clear.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Disruption {
    pub finish_date: NaiveDate,
    pub location: LonLat,
}

// Full-value ordering, so the set collapses duplicate rows. f64 has no
// total order of its own; total_cmp supplies one.
impl Ord for Disruption {
    fn cmp(&self, other: &Self) -> Ordering {
        self.finish_date
            .cmp(&other.finish_date)
            .then_with(|| self.location.lon.total_cmp(&other.location.lon))
            .then_with(|| self.location.lat.total_cmp(&other.location.lat))
    }
}

impl PartialOrd for Disruption {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Disruption {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Disruption {}

/// Parses the `"Mon DD, YYYY"` finish dates used by the disruptions file.
/// An unknown month abbreviation fails, and so does an impossible date
/// like "Feb 30, 2024"; nothing is clamped.
pub fn parse_finish_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%b %d, %Y").map_err(|source| Error::InvalidDate {
        text: raw.to_string(),
        source,
    })
}

/// Reads the disruptions file. Unlike the GTFS sources its fields can
/// carry commas inside quotes, so every row goes through the quoted-field
/// splitter. Field 3 is the finish date; the last field is a WKT point.
pub fn load<R: Read>(reader: R) -> Result<BTreeSet<Disruption>> {
    let mut disruptions = BTreeSet::new();
    let mut lines = BufReader::new(reader).lines();
    lines.next().transpose()?;
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let fields = split_line(&line)?;
        let (date_field, point_field) = match (fields.get(3), fields.last()) {
            (Some(date), Some(point)) => (date, point),
            _ => {
                return Err(Error::MalformedRecord {
                    line: idx + 2,
                    reason: format!("expected at least 4 fields, got {}", fields.len()),
                })
            }
        };
        disruptions.insert(Disruption {
            finish_date: parse_finish_date(date_field)?,
            location: LonLat::parse_wkt(point_field)?,
        });
    }
    Ok(disruptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_finish_date() {
        assert_eq!(
            parse_finish_date("Jan 5, 2025").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
        );
        assert_eq!(
            parse_finish_date("Sep 17, 2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 17).unwrap()
        );
    }

    #[test]
    fn impossible_dates_are_rejected() {
        assert!(matches!(
            parse_finish_date("Feb 30, 2024"),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn unknown_month_is_rejected() {
        assert!(matches!(
            parse_finish_date("Foo 5, 2025"),
            Err(Error::InvalidDate { .. })
        ));
    }

    // Both the street description and the date are quoted in the real
    // file; the embedded commas are the whole reason the splitter exists.
    const SAMPLE: &str = "\
id,activity_type,details,finish_date,impact,geometry
1,Construction,\"102 Avenue, west of 124 Street\",\"Sep 17, 2024\",Lane closed,POINT (-113.545089 53.546592)
2,Construction,Whitemud Drive,\"Jul 3, 2025\",Closed,POINT (-113.563337 53.462024)
";

    #[test]
    fn rows_with_quoted_commas_load() {
        let disruptions = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(disruptions.len(), 2);
        let first = disruptions.iter().next().unwrap();
        assert_eq!(first.finish_date, NaiveDate::from_ymd_opt(2024, 9, 17).unwrap());
        assert_eq!(first.location.lon, -113.545089);
        assert_eq!(first.location.lat, 53.546592);
    }

    #[test]
    fn duplicate_rows_collapse() {
        let row = "1,Construction,\"102 Avenue, west of 124 Street\",\"Sep 17, 2024\",Lane closed,POINT (-113.545089 53.546592)\n";
        let source = format!("header\n{row}{row}");
        let disruptions = load(source.as_bytes()).unwrap();
        assert_eq!(disruptions.len(), 1);
    }

    #[test]
    fn unterminated_quote_aborts_the_load() {
        let bad = "header\n1,Construction,\"102 Avenue,Sep 17 2024,x,POINT (-113.5 53.5)\n";
        assert!(matches!(
            load(bad.as_bytes()),
            Err(Error::UnterminatedQuote)
        ));
    }
}
