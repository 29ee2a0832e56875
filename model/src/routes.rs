use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{BufRead, BufReader, Read};

use serde::{Deserialize, Serialize};

use crate::shapes::ShapeID;
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteID(String);

impl RouteID {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteID {
    fn from(x: &str) -> Self {
        Self(x.to_string())
    }
}

impl Borrow<str> for RouteID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One bus route. `long_name` stays `None` until `attach_names` sees the
/// route in routes.txt, which keeps a never-named route distinguishable
/// from one whose name is literally empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub route_id: RouteID,
    pub long_name: Option<String>,
    pub shape_ids: BTreeSet<ShapeID>,
}

/// Builds the route table from trips.txt: column 0 is the route, column 6
/// the shape the trip follows. Every route ID the rest of the data set may
/// legally mention comes from here.
pub fn load_trips<R: Read>(reader: R) -> Result<BTreeMap<RouteID, Route>> {
    let mut routes: BTreeMap<RouteID, Route> = BTreeMap::new();
    let mut lines = BufReader::new(reader).lines();
    lines.next().transpose()?;
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.trim().split(',').collect();
        if fields.len() < 7 {
            return Err(Error::MalformedRecord {
                line: idx + 2,
                reason: format!("expected at least 7 fields, got {}", fields.len()),
            });
        }
        let route_id = RouteID::from(fields[0]);
        let shape_id = ShapeID::from(fields[6]);
        routes
            .entry(route_id.clone())
            .or_insert_with(|| Route {
                route_id,
                long_name: None,
                shape_ids: BTreeSet::new(),
            })
            .shape_ids
            .insert(shape_id);
    }
    Ok(routes)
}

/// Second phase: reads routes.txt and fills in long names. Column 3 holds
/// the name, usually double-quoted; the quotes are dropped. Naming a route
/// that trips.txt never mentioned is a data-integrity fault, since trips
/// are the authoritative universe of route IDs.
pub fn attach_names<R: Read>(
    reader: R,
    routes: &mut BTreeMap<RouteID, Route>,
) -> Result<()> {
    let mut lines = BufReader::new(reader).lines();
    lines.next().transpose()?;
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.trim().split(',').collect();
        if fields.len() < 4 {
            return Err(Error::MalformedRecord {
                line: idx + 2,
                reason: format!("expected at least 4 fields, got {}", fields.len()),
            });
        }
        let route = routes
            .get_mut(fields[0])
            .ok_or_else(|| Error::UnknownRoute(RouteID::from(fields[0])))?;
        route.long_name = Some(fields[3].replace('"', ""));
    }

    let unnamed = routes.values().filter(|r| r.long_name.is_none()).count();
    if unnamed > 0 {
        warn!("{unnamed} routes appear in trips.txt but never got a name");
    }
    Ok(())
}
