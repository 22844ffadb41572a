use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{AircraftRepository, PositionStore, StoreError};
use crate::types::{
    Aircraft, AircraftId, AircraftKey, NewPosition, PositionId, PositionRecord, PositionReport,
};

// position times are microseconds since the epoch
const SCHEMA: [&str; 3] = [
    "create table if not exists aircraft (
        id integer primary key not null,
        icao_type text not null,
        registration text not null,
        unique (icao_type, registration)
    )",
    "create table if not exists position (
        id integer primary key not null,
        time_us integer not null,
        aircraft_id integer not null references aircraft (id),
        latitude real not null,
        longitude real not null,
        altitude integer not null,
        track integer not null,
        ground_speed integer not null,
        air_speed integer not null,
        vertical_speed integer not null
    )",
    "create index if not exists position_time on position (time_us)",
];

const SELECT_POSITION: &str = "select p.id, p.time_us, p.aircraft_id, a.icao_type, a.registration,
        p.latitude, p.longitude, p.altitude, p.track, p.ground_speed, p.air_speed, p.vertical_speed
    from position p join aircraft a on a.id = p.aircraft_id";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

#[derive(sqlx::FromRow)]
struct PositionRow {
    id: i64,
    time_us: i64,
    aircraft_id: i64,
    icao_type: String,
    registration: String,
    latitude: f64,
    longitude: f64,
    altitude: i32,
    track: i32,
    ground_speed: i32,
    air_speed: i32,
    vertical_speed: i32,
}

impl TryFrom<PositionRow> for PositionRecord {
    type Error = StoreError;

    fn try_from(row: PositionRow) -> Result<Self, Self::Error> {
        let time = chrono::DateTime::from_timestamp_micros(row.time_us).ok_or_else(|| {
            StoreError::Database(format!("position {} has invalid time {}", row.id, row.time_us))
        })?;
        Ok(PositionRecord {
            id: PositionId::new(row.id),
            time,
            aircraft: Aircraft::new(
                AircraftId::new(row.aircraft_id),
                AircraftKey::new(row.icao_type, row.registration),
            ),
            report: PositionReport {
                latitude: row.latitude,
                longitude: row.longitude,
                altitude: row.altitude,
                track: row.track,
                ground_speed: row.ground_speed,
                air_speed: row.air_speed,
                vertical_speed: row.vertical_speed,
            },
        })
    }
}

/// Durable store in a SQLite database. Stored times have microsecond resolution.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url`, e.g. `sqlite://xplogd_web.db`
    /// or `sqlite::memory:`, and makes sure the tables exist.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // an in-memory database only lives as long as a connection to it
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let store = SqliteStore {
            db: pool_options.connect_with(options).await?,
        };
        store.create_schema().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.db).await?;
        }
        Ok(())
    }

    pub async fn aircraft_count(&self) -> Result<i64, StoreError> {
        Ok(sqlx::query_scalar("select count(*) from aircraft")
            .fetch_one(&self.db)
            .await?)
    }

    pub async fn position_count(&self) -> Result<i64, StoreError> {
        Ok(sqlx::query_scalar("select count(*) from position")
            .fetch_one(&self.db)
            .await?)
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

#[async_trait::async_trait]
impl AircraftRepository for SqliteStore {
    async fn find_aircraft(&self, key: &AircraftKey) -> Result<Option<Aircraft>, StoreError> {
        let id: Option<i64> =
            sqlx::query_scalar("select id from aircraft where icao_type = ? and registration = ?")
                .bind(key.icao_type.as_str())
                .bind(key.registration.as_str())
                .fetch_optional(&self.db)
                .await?;
        Ok(id.map(|id| Aircraft::new(AircraftId::new(id), key.clone())))
    }

    async fn insert_aircraft(&self, key: &AircraftKey) -> Result<Aircraft, StoreError> {
        let result = sqlx::query("insert into aircraft (icao_type, registration) values (?, ?)")
            .bind(key.icao_type.as_str())
            .bind(key.registration.as_str())
            .execute(&self.db)
            .await;

        match result {
            Ok(done) => Ok(Aircraft::new(
                AircraftId::new(done.last_insert_rowid()),
                key.clone(),
            )),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(StoreError::DuplicateAircraft(key.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait::async_trait]
impl PositionStore for SqliteStore {
    async fn append(&self, position: NewPosition) -> Result<PositionId, StoreError> {
        let time = position.time.unwrap_or_else(chrono::Utc::now);
        let report = &position.report;
        let result = sqlx::query(
            "insert into position (time_us, aircraft_id, latitude, longitude, altitude, track,
                ground_speed, air_speed, vertical_speed) values (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(time.timestamp_micros())
        .bind(position.aircraft.id.value())
        .bind(report.latitude)
        .bind(report.longitude)
        .bind(report.altitude)
        .bind(report.track)
        .bind(report.ground_speed)
        .bind(report.air_speed)
        .bind(report.vertical_speed)
        .execute(&self.db)
        .await;

        match result {
            Ok(done) => Ok(PositionId::new(done.last_insert_rowid())),
            Err(sqlx::Error::Database(err)) if err.is_foreign_key_violation() => {
                Err(StoreError::UnknownAircraft(position.aircraft.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn most_recent_since(
        &self,
        instant: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<PositionRecord>, StoreError> {
        let row: Option<PositionRow> = sqlx::query_as(&format!(
            "{SELECT_POSITION} where p.time_us >= ? order by p.time_us desc, p.id desc limit 1"
        ))
        .bind(instant.timestamp_micros())
        .fetch_optional(&self.db)
        .await?;
        row.map(PositionRecord::try_from).transpose()
    }

    async fn positions_for(&self, aircraft: &Aircraft) -> Result<Vec<PositionRecord>, StoreError> {
        let rows: Vec<PositionRow> = sqlx::query_as(&format!(
            "{SELECT_POSITION} where p.aircraft_id = ? order by p.time_us, p.id"
        ))
        .bind(aircraft.id.value())
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(PositionRecord::try_from).collect()
    }
}
