use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, BufReader, Read};

use serde::{Deserialize, Serialize};

use crate::coords::LonLat;
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeID(String);

impl ShapeID {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShapeID {
    fn from(x: &str) -> Self {
        Self(x.to_string())
    }
}

impl Borrow<str> for ShapeID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One physical path a bus can follow, as an ordered polyline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shape {
    pub shape_id: ShapeID,
    /// In file order; consecutive rows for the same shape append here.
    pub points: Vec<LonLat>,
}

/// Reads shapes.txt: column 0 is the shape ID, columns 1 and 2 are
/// latitude then longitude. A shape is created the first time its ID shows
/// up and grows a point per row after that.
pub fn load<R: Read>(reader: R) -> Result<BTreeMap<ShapeID, Shape>> {
    let mut shapes: BTreeMap<ShapeID, Shape> = BTreeMap::new();
    let mut lines = BufReader::new(reader).lines();
    // The header is skipped without inspection
    lines.next().transpose()?;
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let line_number = idx + 2;
        let fields: Vec<&str> = line.trim().split(',').collect();
        if fields.len() < 3 {
            return Err(Error::MalformedRecord {
                line: line_number,
                reason: format!("expected at least 3 fields, got {}", fields.len()),
            });
        }
        let lat = parse_coord(fields[1], line_number)?;
        let lon = parse_coord(fields[2], line_number)?;
        let shape_id = ShapeID::from(fields[0]);
        shapes
            .entry(shape_id.clone())
            .or_insert_with(|| Shape {
                shape_id,
                points: Vec::new(),
            })
            .points
            .push(LonLat::new(lon, lat));
    }
    Ok(shapes)
}

fn parse_coord(field: &str, line: usize) -> Result<f64> {
    field.trim().parse::<f64>().map_err(|_| Error::MalformedRecord {
        line,
        reason: format!("not a coordinate: {field:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence
117-35-West,53.602366,-113.412183,1
117-35-West,53.602160,-113.412500,2
117-34-East,53.611775,-113.501856,1
";

    #[test]
    fn points_append_in_file_order() {
        let shapes = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(shapes.len(), 2);
        let west = &shapes["117-35-West"];
        assert_eq!(
            west.points,
            vec![
                LonLat::new(-113.412183, 53.602366),
                LonLat::new(-113.412500, 53.602160),
            ]
        );
    }

    #[test]
    fn header_only_source_yields_an_empty_table() {
        let shapes = load("shape_id,shape_pt_lat,shape_pt_lon\n".as_bytes()).unwrap();
        assert!(shapes.is_empty());
    }

    #[test]
    fn short_row_aborts_the_load() {
        let err = load("header\n117-35-West,53.6\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn non_numeric_coordinate_aborts_the_load() {
        let err = load("header\nok,53.6,-113.4\nbad,north,-113.4\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 3, .. }));
    }
}
