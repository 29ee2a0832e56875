use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use structopt::StructOpt;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use model::RouteData;

const MENU: &str = "
Edmonton Transit System
---------------------------------
(1) Load route data
(2) Load shapes data
(3) Load disruptions data

(4) Print shape IDs for a route
(5) Print coordinates for a shape ID
(6) Find longest shape for route

(7) Save routes and shapes to a snapshot
(8) Load routes and shapes from a snapshot

(9) Export a route as GeoJSON
(0) Quit
";

#[derive(StructOpt)]
#[structopt(name = "ets", about = "Browse ETS routes, shapes and disruptions.")]
struct Args {
    /// Directory the filename prompts default into
    #[structopt(long, default_value = "data")]
    data_dir: PathBuf,
}

fn main() {
    init_logger();
    if let Err(err) = run(Args::from_args()) {
        for cause in err.chain() {
            eprintln!("{cause}");
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut data = RouteData::new();
    loop {
        println!("{MENU}");
        // EOF means quit, same as (0)
        let Some(command) = prompt("Enter Command: ")? else {
            return Ok(());
        };
        match command.as_str() {
            "0" => return Ok(()),
            "1" => load_routes(&mut data, &args.data_dir)?,
            "2" => load_shapes(&mut data, &args.data_dir)?,
            "3" => load_disruptions(&mut data, &args.data_dir)?,
            "4" => print_shape_ids(&data)?,
            "5" => print_coordinates(&data)?,
            "6" => find_longest_shape(&data)?,
            "7" => save_snapshot(&data, &args.data_dir)?,
            "8" => {
                if let Some(loaded) = load_snapshot(&args.data_dir)? {
                    data = loaded;
                }
            }
            "9" => export_geojson(&data, &args.data_dir)?,
            _ => println!("Invalid Option"),
        }
    }
}

fn load_routes(data: &mut RouteData, dir: &Path) -> Result<()> {
    let Some(trips) = prompt_path("Enter a trips filename: ", dir, "trips.txt")? else {
        return Ok(());
    };
    let Some(routes) = prompt_path("Enter a routes filename: ", dir, "routes.txt")? else {
        return Ok(());
    };
    match data.load_routes(&trips, &routes) {
        Ok(()) => println!("Data from {} loaded", routes.display()),
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn load_shapes(data: &mut RouteData, dir: &Path) -> Result<()> {
    let Some(path) = prompt_path("Enter a filename: ", dir, "shapes.txt")? else {
        return Ok(());
    };
    match data.load_shapes(&path) {
        Ok(()) => println!("Data from {} loaded", path.display()),
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn load_disruptions(data: &mut RouteData, dir: &Path) -> Result<()> {
    let Some(path) = prompt_path("Enter a filename: ", dir, "traffic_disruptions.txt")? else {
        return Ok(());
    };
    match data.load_disruptions(&path) {
        Ok(()) => println!("Data from {} loaded", path.display()),
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn print_shape_ids(data: &RouteData) -> Result<()> {
    if !data.routes_loaded() {
        println!("Route data hasn't been loaded yet");
        return Ok(());
    }
    let Some(route_id) = prompt("Enter route: ")? else {
        return Ok(());
    };
    match data.shape_ids_for_route(&route_id) {
        Some(shape_ids) if !shape_ids.is_empty() => {
            let name = data.route_long_name(&route_id).unwrap_or("unnamed");
            println!("Shape ids for route [{name}]");
            for shape_id in shape_ids {
                println!("\t{shape_id}");
            }
        }
        _ => println!("\t** NOT FOUND **"),
    }
    Ok(())
}

fn print_coordinates(data: &RouteData) -> Result<()> {
    if !data.shapes_loaded() {
        println!("Shape ID data hasn't been loaded yet");
        return Ok(());
    }
    let Some(shape_id) = prompt("Enter shape ID: ")? else {
        return Ok(());
    };
    match data.coords_for_shape(&shape_id) {
        Some(coords) if !coords.is_empty() => {
            println!("Shape ID coordinates for {shape_id} are:");
            for pt in coords {
                println!("\t({}, {})", pt.lat, pt.lon);
            }
        }
        _ => println!("\t** NOT FOUND **"),
    }
    Ok(())
}

fn find_longest_shape(data: &RouteData) -> Result<()> {
    if !data.routes_loaded() {
        println!("Route data hasn't been loaded yet");
        return Ok(());
    }
    if !data.shapes_loaded() {
        println!("Shape ID data hasn't been loaded yet");
        return Ok(());
    }
    let Some(route_id) = prompt("Enter route ID: ")? else {
        return Ok(());
    };
    match data.longest_shape_for_route(&route_id) {
        Ok(Some((shape_id, count))) => {
            println!("The longest shape for {route_id} is {shape_id} with {count} coordinates")
        }
        Ok(None) => println!("\t** NOT FOUND **"),
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn save_snapshot(data: &RouteData, dir: &Path) -> Result<()> {
    let Some(path) = prompt_path("Enter a filename: ", dir, "etsdata.json")? else {
        return Ok(());
    };
    match data.save(&path) {
        Ok(()) => println!("Data structures successfully written to {}", path.display()),
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn load_snapshot(dir: &Path) -> Result<Option<RouteData>> {
    let Some(path) = prompt_path("Enter a filename: ", dir, "etsdata.json")? else {
        return Ok(None);
    };
    match RouteData::load(&path) {
        Ok(data) => {
            println!(
                "Routes and shapes successfully loaded from {}",
                path.display()
            );
            Ok(Some(data))
        }
        Err(err) => {
            println!("{err}");
            Ok(None)
        }
    }
}

fn export_geojson(data: &RouteData, dir: &Path) -> Result<()> {
    if !data.routes_loaded() {
        println!("Route data hasn't been loaded yet");
        return Ok(());
    }
    if !data.shapes_loaded() {
        println!("Shape ID data hasn't been loaded yet");
        return Ok(());
    }
    let Some(route_id) = prompt("Enter route ID: ")? else {
        return Ok(());
    };
    let Some(path) = prompt_path("Enter an output filename: ", dir, "route.geojson")? else {
        return Ok(());
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            println!("Couldn't create {}: {err}", path.display());
            return Ok(());
        }
    };
    let mut writer = BufWriter::new(file);
    match model::write_route_geojson(data, &route_id, &mut writer) {
        Ok(()) => {
            writer.flush()?;
            println!("GeoJSON written to {}", path.display());
        }
        Err(err) => println!("{err}"),
    }
    Ok(())
}

/// Reads one trimmed line from stdin; `None` on EOF.
fn prompt(text: &str) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Like `prompt`, but an empty answer falls back to `dir/<default>`.
fn prompt_path(text: &str, dir: &Path, default: &str) -> Result<Option<PathBuf>> {
    Ok(prompt(text)?.map(|answer| {
        if answer.is_empty() {
            dir.join(default)
        } else {
            PathBuf::from(answer)
        }
    }))
}

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });
    // The model crate logs through the `log` facade
    tracing_log::LogTracer::init().expect("another logger is already installed");
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}
