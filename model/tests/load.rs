use std::fs;
use std::path::{Path, PathBuf};

use model::{Error, LonLat, RouteData};

const TRIPS: &str = "\
route_id,service_id,trip_id,trip_headsign,trip_short_name,direction_id,shape_id
117,1,1081826,To Eaux Claires,,0,117-34-East
117,1,1081827,To West Clareview,,1,117-35-West
";

const ROUTES: &str = "\
route_id,agency_id,route_short_name,route_long_name,route_type
117,1,117,\"Eaux Claires - West Clareview\",3
";

const SHAPES: &str = "\
shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence
117-34-East,53.611775,-113.501856,1
117-35-West,53.602366,-113.412183,1
117-35-West,53.602160,-113.412500,2
";

const DISRUPTIONS: &str = "\
id,activity_type,details,finish_date,impact,geometry
1,Construction,\"102 Avenue, west of 124 Street\",\"Sep 17, 2024\",Lane closed,POINT (-113.545089 53.546592)
";

fn write_data_dir(dir: &Path) -> (PathBuf, PathBuf, PathBuf, PathBuf) {
    let trips = dir.join("trips.txt");
    let routes = dir.join("routes.txt");
    let shapes = dir.join("shapes.txt");
    let disruptions = dir.join("traffic_disruptions.txt");
    fs::write(&trips, TRIPS).unwrap();
    fs::write(&routes, ROUTES).unwrap();
    fs::write(&shapes, SHAPES).unwrap();
    fs::write(&disruptions, DISRUPTIONS).unwrap();
    (trips, routes, shapes, disruptions)
}

#[test]
fn loads_a_full_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let (trips, routes, shapes, disruptions) = write_data_dir(dir.path());

    let mut data = RouteData::new();
    data.load_routes(&trips, &routes).unwrap();
    data.load_shapes(&shapes).unwrap();
    data.load_disruptions(&disruptions).unwrap();

    assert!(data.routes_loaded());
    assert!(data.shapes_loaded());
    assert!(data.disruptions_loaded());
    assert_eq!(
        data.route_long_name("117"),
        Some("Eaux Claires - West Clareview")
    );
    assert_eq!(data.disruptions().len(), 1);
    let (longest, count) = data.longest_shape_for_route("117").unwrap().unwrap();
    assert_eq!(longest.as_str(), "117-35-West");
    assert_eq!(count, 2);
}

#[test]
fn missing_file_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = RouteData::new();
    let err = data.load_shapes(dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
    assert!(!data.shapes_loaded());
}

#[test]
fn header_only_source_counts_as_loaded_but_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shapes.txt");
    fs::write(&path, "shape_id,shape_pt_lat,shape_pt_lon\n").unwrap();

    let mut data = RouteData::new();
    data.load_shapes(&path).unwrap();
    assert!(data.shapes_loaded());
    assert!(data.shapes().is_empty());
    assert_eq!(data.coords_for_shape("117-35-West"), None);
}

#[test]
fn failed_reload_keeps_the_previous_table() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, shapes, _) = write_data_dir(dir.path());

    let mut data = RouteData::new();
    data.load_shapes(&shapes).unwrap();

    let bad = dir.path().join("bad_shapes.txt");
    fs::write(&bad, "header\n117-35-West,not-a-number,-113.4\n").unwrap();
    let err = data.load_shapes(&bad).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { .. }));

    // Parse failed partway, so the earlier load still answers.
    assert_eq!(
        data.coords_for_shape("117-35-West"),
        Some(
            &[
                LonLat::new(-113.412183, 53.602366),
                LonLat::new(-113.412500, 53.602160),
            ][..]
        )
    );
}

#[test]
fn snapshot_round_trips_all_three_tables() {
    let dir = tempfile::tempdir().unwrap();
    let (trips, routes, shapes, disruptions) = write_data_dir(dir.path());

    let mut data = RouteData::new();
    data.load_routes(&trips, &routes).unwrap();
    data.load_shapes(&shapes).unwrap();
    data.load_disruptions(&disruptions).unwrap();

    let snapshot = dir.path().join("etsdata.json");
    data.save(&snapshot).unwrap();
    let restored = RouteData::load(&snapshot).unwrap();

    assert!(restored.routes_loaded());
    assert!(restored.shapes_loaded());
    assert!(restored.disruptions_loaded());
    assert_eq!(
        restored.route_long_name("117"),
        data.route_long_name("117")
    );
    assert_eq!(
        restored.coords_for_shape("117-35-West"),
        data.coords_for_shape("117-35-West")
    );
    assert_eq!(restored.disruptions(), data.disruptions());
}

#[test]
fn corrupt_snapshot_is_a_snapshot_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("etsdata.json");
    fs::write(&path, "{ not json").unwrap();
    let err = RouteData::load(&path).unwrap_err();
    assert!(matches!(err, Error::Snapshot(_)));
}
