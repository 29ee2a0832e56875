use std::io::Write;

use geojson::{Feature, FeatureCollection, GeoJson};

use crate::routes::RouteID;
use crate::{Error, Result, RouteData};

/// Writes one route as GeoJSON: a LineString per shape the route follows
/// plus a Point per known disruption. The output drops straight onto a
/// web map, standing in for the old desktop map window.
pub fn write_route_geojson<W: Write>(
    data: &RouteData,
    route_id: &str,
    writer: &mut W,
) -> Result<()> {
    let shape_ids = data
        .shape_ids_for_route(route_id)
        .ok_or_else(|| Error::UnknownRoute(RouteID::from(route_id)))?;

    let mut features = Vec::new();
    for shape_id in shape_ids {
        let points = data
            .coords_for_shape(shape_id.as_str())
            .ok_or_else(|| Error::UnknownShape(shape_id.clone()))?;
        let coordinates = points.iter().map(|pt| vec![pt.lon, pt.lat]).collect();
        let mut feature = Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::LineString(
                coordinates,
            ))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("shape_id", shape_id.as_str());
        features.push(feature);
    }

    for disruption in data.disruptions() {
        let mut feature = Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
                disruption.location.lon,
                disruption.location.lat,
            ]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("finish_date", disruption.finish_date.to_string());
        features.push(feature);
    }

    let gj = GeoJson::FeatureCollection(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    });
    writer.write_all(serde_json::to_string_pretty(&gj)?.as_bytes())?;
    Ok(())
}
