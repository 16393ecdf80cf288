use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Serialize;
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlConnection},
    Connection,
};

/// Body of every `/health` response.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus {
    Ok { mysql_time: DateTime<Utc> },
    Error { error: String },
}

pub async fn handler(
    Extension(options): Extension<MySqlConnectOptions>,
) -> Result<Json<HealthStatus>, Error> {
    let mysql_time = fetch_server_time(&options).await?;
    Ok(Json(HealthStatus::Ok { mysql_time }))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to MySQL")]
    Connect(#[source] sqlx::Error),
    #[error("failed to query the MySQL server time")]
    Query(#[source] sqlx::Error),
    #[error("failed to close the MySQL connection")]
    Close(#[source] sqlx::Error),
}

impl Error {
    fn database_error(&self) -> &sqlx::Error {
        match self {
            Error::Connect(source) | Error::Query(source) | Error::Close(source) => source,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let error = self.database_error().to_string();

        tracing::error!(error.message = %self, error.cause = %error, "health check failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthStatus::Error { error }),
        )
            .into_response()
    }
}

/// Open a dedicated connection, read `NOW()` and close the connection again.
#[tracing::instrument(name = "Read the MySQL server time", skip(options))]
async fn fetch_server_time(options: &MySqlConnectOptions) -> Result<DateTime<Utc>, Error> {
    let mut connection = MySqlConnection::connect_with(options)
        .await
        .map_err(Error::Connect)?;

    // sqlx pins the session time zone to UTC, so NOW() is a UTC DATETIME
    let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW() AS now")
        .fetch_one(&mut connection)
        .await;

    match now {
        Ok(now) => {
            connection.close().await.map_err(Error::Close)?;
            Ok(now)
        }
        Err(e) => {
            if let Err(close_error) = connection.close().await {
                tracing::warn!(error = %close_error, "failed to close the MySQL connection");
            }
            Err(Error::Query(e))
        }
    }
}
