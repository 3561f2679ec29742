//! SQLite persistence for the asteroid catalog.
//!
//! One table, keyed on the designation string. Ingestion re-runs are
//! idempotent: records are upserted so a refreshed MPCORB download updates
//! elements in place instead of duplicating bodies. Readers take a plain
//! SELECT snapshot; SQLite's own locking is the only concurrency control,
//! which is enough for a tool where ingestion and querying are separate
//! commands.

use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::QueryBuilder;
use tracing::{debug, info};

use crate::errors::OrreryError;
use crate::mpcorb::{looks_like_record, parse_mpcorb_line, ElementRecord};
use crate::query::{BindValue, Predicate};

/// Rows per ingestion transaction.
const BATCH_SIZE: usize = 1000;

/// Hard cap on the progress-log interval, rows.
const MAX_PROGRESS_INTERVAL: u64 = 50_000;

/// Half-width of the absolute-magnitude pre-filter, magnitudes. Apparent
/// magnitude differs from H by the distance and phase terms; five magnitudes
/// of slack keeps every plausibly visible body in the candidate set.
const MAG_PREFILTER_MARGIN: f64 = 5.0;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS asteroids (
    designation        TEXT PRIMARY KEY,
    number             INTEGER,
    epoch              TEXT NOT NULL,
    mean_anomaly       REAL NOT NULL,
    perihelion_arg     REAL NOT NULL,
    ascending_node     REAL NOT NULL,
    inclination        REAL NOT NULL,
    eccentricity       REAL,
    mean_motion        REAL NOT NULL,
    semimajor_axis     REAL,
    absolute_magnitude REAL,
    slope_parameter    REAL NOT NULL
)
"#;

const UPSERT: &str = r#"
INSERT INTO asteroids (
    designation, number, epoch, mean_anomaly, perihelion_arg, ascending_node,
    inclination, eccentricity, mean_motion, semimajor_axis,
    absolute_magnitude, slope_parameter
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(designation) DO UPDATE SET
    number             = excluded.number,
    epoch              = excluded.epoch,
    mean_anomaly       = excluded.mean_anomaly,
    perihelion_arg     = excluded.perihelion_arg,
    ascending_node     = excluded.ascending_node,
    inclination        = excluded.inclination,
    eccentricity       = excluded.eccentricity,
    mean_motion        = excluded.mean_motion,
    semimajor_axis     = excluded.semimajor_axis,
    absolute_magnitude = excluded.absolute_magnitude,
    slope_parameter    = excluded.slope_parameter
"#;

const SELECT_COLUMNS: &str = "SELECT number, designation, epoch, mean_anomaly, \
    perihelion_arg, ascending_node, inclination, eccentricity, mean_motion, \
    semimajor_axis, absolute_magnitude, slope_parameter FROM asteroids";

/// One catalog row as stored.
///
/// `eccentricity` and `semimajor_axis` stay optional: the schema tolerates
/// NULLs from partial writes, and the visibility pipeline treats a missing
/// value like an unbound orbit and rejects the body instead of failing.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct AsteroidRow {
    pub number: Option<i64>,
    pub designation: String,
    pub epoch: String,
    pub mean_anomaly: f64,
    pub perihelion_arg: f64,
    pub ascending_node: f64,
    pub inclination: f64,
    pub eccentricity: Option<f64>,
    pub mean_motion: f64,
    pub semimajor_axis: Option<f64>,
    pub absolute_magnitude: Option<f64>,
    pub slope_parameter: f64,
}

/// Handle to the catalog database.
#[derive(Debug, Clone)]
pub struct AsteroidStore {
    pool: SqlitePool,
}

impl AsteroidStore {
    /// Open (creating if needed) the database at the given sqlx URL.
    pub async fn open(url: &str) -> Result<Self, OrreryError> {
        let options: SqliteConnectOptions = url
            .parse::<SqliteConnectOptions>()?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(AsteroidStore { pool })
    }

    /// Fresh in-memory database. Used by the tests.
    pub async fn in_memory() -> Result<Self, OrreryError> {
        AsteroidStore::open("sqlite::memory:").await
    }

    /// Number of stored bodies.
    pub async fn count(&self) -> Result<i64, OrreryError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM asteroids")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Insert or update one body, keyed on its designation.
    pub async fn upsert(&self, record: &ElementRecord) -> Result<(), OrreryError> {
        bind_record(sqlx::query(UPSERT), record)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Ingest an MPCORB.DAT file.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: decompressed catalog file.
    /// * `limit`: stop after this many parsed records; `None` ingests all.
    ///
    /// Return
    /// ----------
    /// * Number of records upserted. Unparseable lines are skipped, not
    ///   errors; a missing file is [`OrreryError::MpcorbNotFound`].
    pub async fn load_mpcorb(
        &self,
        path: &Utf8Path,
        limit: Option<u64>,
    ) -> Result<u64, OrreryError> {
        let file = File::open(path)
            .map_err(|_| OrreryError::MpcorbNotFound(path.to_path_buf()))?;

        // Cheap pre-pass for the progress denominator.
        let mut total: u64 = 0;
        let mut reader = BufReader::new(&file);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if looks_like_record(&decode_line(&buf)) {
                total += 1;
            }
        }
        if let Some(limit) = limit {
            total = total.min(limit);
        }
        let progress_interval = (total / 20).clamp(1, MAX_PROGRESS_INTERVAL);
        info!("Ingesting up to {total} records from {path}");

        let file = File::open(path)
            .map_err(|_| OrreryError::MpcorbNotFound(path.to_path_buf()))?;
        let mut loaded: u64 = 0;
        let mut skipped: u64 = 0;
        let mut tx = self.pool.begin().await?;
        let mut reader = BufReader::new(file);
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = decode_line(&buf);
            if !looks_like_record(&line) {
                continue;
            }
            let record = match parse_mpcorb_line(&line) {
                Some(record) => record,
                None => {
                    skipped += 1;
                    continue;
                }
            };

            bind_record(sqlx::query(UPSERT), &record)
                .execute(&mut *tx)
                .await?;
            loaded += 1;

            if loaded % BATCH_SIZE as u64 == 0 {
                tx.commit().await?;
                tx = self.pool.begin().await?;
            }
            if loaded % progress_interval == 0 {
                info!("  {loaded}/{total} records");
            }
            if limit.is_some_and(|limit| loaded >= limit) {
                break;
            }
        }
        tx.commit().await?;

        if skipped > 0 {
            debug!("skipped {skipped} unparseable record lines");
        }
        info!("Ingested {loaded} records");
        Ok(loaded)
    }

    /// Candidate bodies for a visibility run.
    ///
    /// Arguments
    /// -----------------
    /// * `mag_min`, `mag_max`: the apparent-magnitude window; the SELECT
    ///   pre-filters on H widened by [`MAG_PREFILTER_MARGIN`].
    /// * `predicate`: optional extra filter from [`crate::query`].
    /// * `order_by`: validated ORDER BY fragment from
    ///   [`crate::query::parse_order_by`].
    pub async fn query_elements(
        &self,
        mag_min: f64,
        mag_max: f64,
        predicate: Option<&Predicate>,
        order_by: &str,
    ) -> Result<Vec<AsteroidRow>, OrreryError> {
        let mut builder: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(SELECT_COLUMNS);
        builder.push(" WHERE absolute_magnitude BETWEEN ");
        builder.push_bind(mag_min - MAG_PREFILTER_MARGIN);
        builder.push(" AND ");
        builder.push_bind(mag_max + MAG_PREFILTER_MARGIN);

        if let Some(predicate) = predicate {
            builder.push(" AND ");
            builder.push(predicate.column);
            builder.push(" ");
            builder.push(predicate.op);
            builder.push(" ");
            match &predicate.value {
                BindValue::Int(v) => builder.push_bind(*v),
                BindValue::Float(v) => builder.push_bind(*v),
                BindValue::Text(v) => builder.push_bind(v.clone()),
            };
        }

        builder.push(" ORDER BY ");
        builder.push(order_by);

        let rows = builder
            .build_query_as::<AsteroidRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Decode one raw catalog line. MPCORB is ASCII in practice, but a stray
/// byte must cost one record, not the whole ingest, so invalid sequences are
/// replaced and the damaged record then fails field parsing.
fn decode_line(buf: &[u8]) -> String {
    let mut line = String::from_utf8_lossy(buf).into_owned();
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

fn bind_record<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    record: &'q ElementRecord,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(record.designation.as_str())
        .bind(record.number)
        .bind(record.epoch.as_str())
        .bind(record.mean_anomaly)
        .bind(record.perihelion_arg)
        .bind(record.ascending_node)
        .bind(record.inclination)
        .bind(record.eccentricity)
        .bind(record.mean_motion)
        .bind(record.semimajor_axis)
        .bind(record.absolute_magnitude)
        .bind(record.slope_parameter)
}
