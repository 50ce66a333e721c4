use crate::db::{
    date_range::{format_date, DateRange, InvalidDate},
    schema::{SchemaMismatch, TABLES},
};
use async_trait::async_trait;
use log::{debug, info};
use regex::Regex;
use scooby::postgres::{select, Aliasable, Orderable, Parameters, Select};
use serde::{Deserialize, Serialize};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    FromRow, SqliteConnection,
};
use std::{str::FromStr, time::Duration};
use utoipa::ToSchema;

pub struct ClimateAccess {
    pool: SqlitePool,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to rewrite query placeholders: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Failed to parse date string: {0}")]
    TimeParse(#[from] time::error::Parse),
    #[error("Failed to format date string: {0}")]
    TimeFormat(#[from] time::error::Format),
    #[error("Unexpected database schema: {0}")]
    Schema(#[from] SchemaMismatch),
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),
    #[error("no observations are available")]
    NoObservations,
}

/// Requested bounds for the temperature aggregate routes
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TemperatureRequest {
    pub start: String,
    pub end: Option<String>,
}

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Earliest and latest observation dates, `None` when the dataset is empty
    async fn date_range(&self) -> Result<Option<DateRange>, Error>;
    /// Every observation in the trailing-year window
    async fn precipitation(&self) -> Result<Vec<Precipitation>, Error>;
    /// Distinct station identifiers, ascending
    async fn stations(&self) -> Result<Vec<String>, Error>;
    /// Trailing-year temperatures of the station with the most observations
    async fn most_active_station_temperatures(
        &self,
    ) -> Result<Vec<TemperatureObservation>, Error>;
    /// Per-date min/avg/max temperature, after validating the requested bounds
    async fn temperature_summary(
        &self,
        req: &TemperatureRequest,
    ) -> Result<Vec<TemperatureSummary>, Error>;
    async fn health_check(&self) -> Result<(), Error>;
}

/// scooby renders postgres style `$N` placeholders, sqlite wants `?N`
pub fn to_sqlite_placeholders(sql: &str) -> Result<String, regex::Error> {
    let re = Regex::new(r"\$(\d+)")?;
    Ok(re.replace_all(sql, "?$1").into_owned())
}

impl ClimateAccess {
    /// Opens a read-only pool over the dataset and checks the table layouts.
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        let access = Self { pool };
        access.verify_schema().await?;
        info!("climate dataset opened: {}", database_url);

        Ok(access)
    }

    pub async fn verify_schema(&self) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        for table in TABLES {
            let columns: Vec<String> =
                sqlx::query_scalar("SELECT name FROM pragma_table_info(?1)")
                    .bind(table.name)
                    .fetch_all(&mut *conn)
                    .await?;
            table.check_columns(&columns)?;
            debug!("table {} matches: {:?}", table.name, table.columns);
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn query<T>(
        conn: &mut SqliteConnection,
        select: Select,
        params: Vec<String>,
    ) -> Result<Vec<T>, Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let sql = to_sqlite_placeholders(&select.to_string())?;
        debug!("query: {} params: {:?}", sql, params);
        let mut query = sqlx::query_as::<_, T>(&sql);
        for param in params {
            query = query.bind(param);
        }
        Ok(query.fetch_all(conn).await?)
    }

    async fn fetch_date_range(conn: &mut SqliteConnection) -> Result<Option<DateRange>, Error> {
        let bounds_query = select((
            "MIN(date)".as_("first_date"),
            "MAX(date)".as_("last_date"),
        ))
        .from("measurement");

        let bounds: Vec<(Option<String>, Option<String>)> =
            Self::query(conn, bounds_query, vec![]).await?;
        match bounds.into_iter().next() {
            Some((Some(first), Some(last))) => Ok(Some(DateRange::parse(&first, &last)?)),
            _ => Ok(None),
        }
    }

    async fn most_active_station(conn: &mut SqliteConnection) -> Result<Option<String>, Error> {
        // ties on the count resolve to the lowest station id
        let active_query = select(("station", "COUNT(station)".as_("observations")))
            .from("measurement")
            .group_by("station")
            .order_by(("observations".desc(), "station".asc()))
            .limit(1);

        let busiest: Vec<(String, i64)> = Self::query(conn, active_query, vec![]).await?;
        Ok(busiest.into_iter().next().map(|(station, observations)| {
            debug!(
                "most active station: {} ({} observations)",
                station, observations
            );
            station
        }))
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn date_range(&self) -> Result<Option<DateRange>, Error> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_date_range(&mut conn).await
    }

    async fn precipitation(&self) -> Result<Vec<Precipitation>, Error> {
        let mut conn = self.pool.acquire().await?;
        let Some(range) = Self::fetch_date_range(&mut conn).await? else {
            return Ok(vec![]);
        };

        let mut placeholders = Parameters::new();
        let window_query = select(("date", "prcp"))
            .from("measurement")
            .where_(format!("date >= {}", placeholders.next()))
            .where_(format!("date <= {}", placeholders.next()));
        let values = vec![
            format_date(range.trailing_year_start())?,
            format_date(range.last())?,
        ];

        Self::query(&mut conn, window_query, values).await
    }

    async fn stations(&self) -> Result<Vec<String>, Error> {
        let mut conn = self.pool.acquire().await?;
        let stations_query = select("station")
            .from("station")
            .group_by("station")
            .order_by("station".asc());

        let stations: Vec<(String,)> = Self::query(&mut conn, stations_query, vec![]).await?;
        Ok(stations.into_iter().map(|(station,)| station).collect())
    }

    async fn most_active_station_temperatures(
        &self,
    ) -> Result<Vec<TemperatureObservation>, Error> {
        let mut conn = self.pool.acquire().await?;
        let Some(range) = Self::fetch_date_range(&mut conn).await? else {
            return Ok(vec![]);
        };
        let Some(station) = Self::most_active_station(&mut conn).await? else {
            return Ok(vec![]);
        };

        let mut placeholders = Parameters::new();
        let tobs_query = select(("date", "tobs"))
            .from("measurement")
            .where_(format!("station = {}", placeholders.next()))
            .where_(format!("date >= {}", placeholders.next()))
            .where_(format!("date <= {}", placeholders.next()));
        let values = vec![
            station,
            format_date(range.trailing_year_start())?,
            format_date(range.last())?,
        ];

        Self::query(&mut conn, tobs_query, values).await
    }

    async fn temperature_summary(
        &self,
        req: &TemperatureRequest,
    ) -> Result<Vec<TemperatureSummary>, Error> {
        let mut conn = self.pool.acquire().await?;
        let range = Self::fetch_date_range(&mut conn)
            .await?
            .ok_or(Error::NoObservations)?;
        if let Some(violation) = range.check(&req.start, req.end.as_deref())? {
            return Err(violation.into());
        }

        let mut placeholders = Parameters::new();
        let mut values = vec![req.start.clone()];
        let mut summary_query = select((
            "date",
            "MIN(tobs)".as_("t_min"),
            "AVG(tobs)".as_("t_avg"),
            "MAX(tobs)".as_("t_max"),
        ))
        .from("measurement")
        .where_(format!("date >= {}", placeholders.next()));

        if let Some(end) = &req.end {
            summary_query = summary_query.where_(format!("date <= {}", placeholders.next()));
            values.push(end.clone());
        }

        let summary_query = summary_query.group_by("date").order_by("date".asc());
        Self::query(&mut conn, summary_query, values).await
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Precipitation {
    #[serde(rename = "Date")]
    pub date: String,
    /// Daily precipitation, null when the station did not report it
    #[serde(rename = "Prcp")]
    pub prcp: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TemperatureObservation {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Tobs")]
    pub tobs: f64,
}

/// Temperature aggregate across every station reporting on a date
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TemperatureSummary {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "T-Min")]
    pub t_min: f64,
    #[serde(rename = "T-Avg")]
    pub t_avg: f64,
    #[serde(rename = "T-Max")]
    pub t_max: f64,
}
