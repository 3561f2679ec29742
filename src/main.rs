use clap::{Parser, Subcommand};
use hifitime::{Epoch, Unit};
use tracing::info;
use tracing_subscriber::EnvFilter;

use orrery::config::Config;
use orrery::download::{download_mpcorb, mpcorb_path};
use orrery::epoch::parse_date_mjd;
use orrery::errors::OrreryError;
use orrery::observer::Observer;
use orrery::query::{parse_constraint, parse_order_by};
use orrery::store::AsteroidStore;
use orrery::visibility::{compute_visibility, VisibilityParams};

#[derive(Parser, Debug)]
#[command(name = "orrery")]
#[command(about = "Asteroid visibility planning from MPC orbital elements", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch MPCORB.DAT from the Minor Planet Center into the local cache.
    Download {
        /// Re-download even if a cached copy exists.
        #[arg(long)]
        force: bool,
        /// Ingest the downloaded catalog into the database afterwards.
        #[arg(long)]
        load: bool,
        /// Ingest at most this many records.
        #[arg(long, value_name = "N")]
        limit: Option<u64>,
    },
    /// List asteroids observable from a site on a given night.
    Visible {
        /// Observer latitude, degrees north.
        #[arg(long, allow_hyphen_values = true, value_name = "deg")]
        lat: f64,
        /// Observer longitude, degrees east.
        #[arg(long, allow_hyphen_values = true, value_name = "deg")]
        lon: f64,
        /// Observer elevation, meters. Not yet used by the altitude model.
        #[arg(long, default_value_t = 0.0, value_name = "m")]
        alt: f64,
        /// Calendar date of the night, YYYY-MM-DD.
        #[arg(long, value_name = "date")]
        date: String,
        /// Bright limit, apparent magnitude.
        #[arg(long, default_value_t = 8.0, value_name = "mag")]
        mag_min: f64,
        /// Faint limit, apparent magnitude.
        #[arg(long, default_value_t = 16.0, value_name = "mag")]
        mag_max: f64,
        /// Minimum peak altitude, degrees.
        #[arg(long, default_value_t = 20.0, value_name = "deg")]
        alt_min: f64,
        /// Extra catalog filter, e.g. "mag_lt_15" or "number < 1000".
        #[arg(long, value_name = "expr")]
        constraint: Option<String>,
        /// Sort column, optionally with "desc", e.g. "mag desc".
        #[arg(long, value_name = "col")]
        order_by: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), OrreryError> {
    let config = Config::load()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Download { force, load, limit } => {
            let path = download_mpcorb(&config, force).await?;
            if load {
                let store = AsteroidStore::open(&config.database.url).await?;
                store.load_mpcorb(&path, limit).await?;
                info!("Database now holds {} bodies", store.count().await?);
            }
        }
        Command::Visible {
            lat,
            lon,
            alt,
            date,
            mag_min,
            mag_max,
            alt_min,
            constraint,
            order_by,
        } => {
            let date_mjd = parse_date_mjd(&date)?;
            let observer = Observer::new(lat, lon, alt);
            let params = VisibilityParams {
                mag_min,
                mag_max,
                alt_min,
            };
            let predicate = constraint.as_deref().and_then(parse_constraint);
            let order_by = parse_order_by(order_by.as_deref());

            let store = AsteroidStore::open(&config.database.url).await?;
            if store.count().await? == 0 {
                info!(
                    "Catalog is empty; run `orrery download --load` first (cache: {})",
                    mpcorb_path(&config)
                );
            }
            let rows = store
                .query_elements(mag_min, mag_max, predicate.as_ref(), &order_by)
                .await?;
            info!("{} candidate bodies after catalog cuts", rows.len());

            let visible = compute_visibility(&rows, &observer, date_mjd, &params);
            for body in &visible {
                let number = body
                    .number
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                let best = Epoch::from_mjd_utc(body.best_time).round(Unit::Second * 1);
                println!(
                    "  {number:>6} {designation:<12} mag={mag:.2} max_alt={alt:.1}\u{b0} at {best}",
                    designation = body.designation,
                    mag = body.magnitude,
                    alt = body.max_altitude,
                );
            }
            println!("Found {} visible asteroid(s)", visible.len());
        }
    }
    Ok(())
}
