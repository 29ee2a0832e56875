use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A geographic position. The field names spell out the ordering because
/// the source files disagree: shapes.txt stores latitude first, while the
/// well-known-text points in the disruptions file store longitude first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Parses a well-known-text point, `POINT (<lon> <lat>)`. No recovery:
    /// a mangled prefix, a missing paren, or a non-numeric coordinate all
    /// fail.
    pub fn parse_wkt(raw: &str) -> Result<Self> {
        let malformed = || Error::MalformedPoint {
            text: raw.to_string(),
        };
        let inner = raw
            .trim()
            .strip_prefix("POINT (")
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(malformed)?;
        let mut parts = inner.split_whitespace();
        let lon = parts
            .next()
            .ok_or_else(malformed)?
            .parse::<f64>()
            .map_err(|_| malformed())?;
        let lat = parts
            .next()
            .ok_or_else(malformed)?
            .parse::<f64>()
            .map_err(|_| malformed())?;
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(Self { lon, lat })
    }
}
