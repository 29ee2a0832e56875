//! In-memory model of the Edmonton Transit System open data: the routes
//! and shapes from the GTFS-style feed, plus the city's traffic
//! disruption points, with lookups layered on top.

#[macro_use]
extern crate log;

mod coords;
mod disruptions;
mod error;
mod export;
mod fields;
mod routes;
mod shapes;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use crate::coords::LonLat;
pub use crate::disruptions::{parse_finish_date, Disruption};
pub use crate::error::{Error, Result};
pub use crate::export::write_route_geojson;
pub use crate::fields::split_line;
pub use crate::routes::{Route, RouteID};
pub use crate::shapes::{Shape, ShapeID};

/// The whole data set: routes keyed by ID, shapes keyed by ID, and the
/// disruption set. Each table loads independently and nothing validates
/// cross-references at load time, so a route may name a shape the shapes
/// table has never heard of; queries resolve that lazily.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RouteData {
    routes: BTreeMap<RouteID, Route>,
    shapes: BTreeMap<ShapeID, Shape>,
    disruptions: BTreeSet<Disruption>,
    // Loaded is tracked separately from emptiness: a source with only a
    // header line loads fine and leaves an empty table behind.
    routes_loaded: bool,
    shapes_loaded: bool,
    disruptions_loaded: bool,
}

impl RouteData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads trips.txt, then routes.txt. Trips define which route IDs
    /// exist and which shapes each one follows; routes.txt only attaches
    /// long names, so it comes second and may not mention unknown routes.
    /// On any failure the previous table is left untouched.
    pub fn load_routes(
        &mut self,
        trips_path: impl AsRef<Path>,
        routes_path: impl AsRef<Path>,
    ) -> Result<()> {
        let mut routes = routes::load_trips(open(trips_path.as_ref())?)?;
        routes::attach_names(open(routes_path.as_ref())?, &mut routes)?;
        info!("loaded {} routes", routes.len());
        self.routes = routes;
        self.routes_loaded = true;
        Ok(())
    }

    pub fn load_shapes(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let shapes = shapes::load(open(path.as_ref())?)?;
        info!("loaded {} shapes", shapes.len());
        self.shapes = shapes;
        self.shapes_loaded = true;
        Ok(())
    }

    pub fn load_disruptions(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let disruptions = disruptions::load(open(path.as_ref())?)?;
        info!("loaded {} disruptions", disruptions.len());
        self.disruptions = disruptions;
        self.disruptions_loaded = true;
        Ok(())
    }

    pub fn routes_loaded(&self) -> bool {
        self.routes_loaded
    }

    pub fn shapes_loaded(&self) -> bool {
        self.shapes_loaded
    }

    pub fn disruptions_loaded(&self) -> bool {
        self.disruptions_loaded
    }

    pub fn routes(&self) -> &BTreeMap<RouteID, Route> {
        &self.routes
    }

    pub fn shapes(&self) -> &BTreeMap<ShapeID, Shape> {
        &self.shapes
    }

    pub fn disruptions(&self) -> &BTreeSet<Disruption> {
        &self.disruptions
    }

    /// The route's long name, if the route exists and routes.txt named it.
    pub fn route_long_name(&self, route_id: &str) -> Option<&str> {
        self.routes.get(route_id)?.long_name.as_deref()
    }

    pub fn shape_ids_for_route(&self, route_id: &str) -> Option<&BTreeSet<ShapeID>> {
        self.routes.get(route_id).map(|route| &route.shape_ids)
    }

    pub fn coords_for_shape(&self, shape_id: &str) -> Option<&[LonLat]> {
        self.shapes.get(shape_id).map(|shape| shape.points.as_slice())
    }

    /// Reverse lookup by long name, used by the map search box.
    pub fn route_id_for_name(&self, long_name: &str) -> Option<&RouteID> {
        self.routes
            .values()
            .find(|route| route.long_name.as_deref() == Some(long_name))
            .map(|route| &route.route_id)
    }

    /// The shape with the most coordinates among the route's shapes,
    /// along with that count. Shape IDs are scanned in sorted order and a
    /// tie keeps the first, so the answer is stable across runs.
    /// `Ok(None)` when the route is unknown or has no shapes; an error
    /// when one of its shape IDs dangles outside the shapes table.
    pub fn longest_shape_for_route(
        &self,
        route_id: &str,
    ) -> Result<Option<(&ShapeID, usize)>> {
        let Some(route) = self.routes.get(route_id) else {
            return Ok(None);
        };
        let mut longest: Option<(&ShapeID, usize)> = None;
        for shape_id in &route.shape_ids {
            let shape = self
                .shapes
                .get(shape_id)
                .ok_or_else(|| Error::UnknownShape(shape_id.clone()))?;
            let count = shape.points.len();
            if longest.map_or(true, |(_, best)| count > best) {
                longest = Some((&shape.shape_id, count));
            }
        }
        Ok(longest)
    }

    /// Writes the whole data set, loaded flags included, to one snapshot
    /// file. The format is an implementation detail; the only promise is
    /// that `load` round-trips it exactly.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a snapshot produced by `save`, replacing everything.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = serde_json::from_reader(BufReader::new(open(path.as_ref())?))?;
        Ok(data)
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}
