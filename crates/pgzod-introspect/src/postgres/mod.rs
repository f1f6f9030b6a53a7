use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{ConnectOptions, Connection, PgConnection};
use tracing::{debug, info, warn};

use pgzod_core::{
    ConnectionConfig, Error, FilterConfig, IntrospectHooks, Result, SchemaDescriptor,
    describe_connection,
};

use crate::connector::Connector;

mod mapper;
mod queries;

pub use mapper::{assemble_schema, describe_column};
pub use queries::CatalogRow;

/// Connector for PostgreSQL databases.
///
/// Opens one connection per `fetch_schema` call and closes it before returning.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresConnector;

impl PostgresConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Connector for PostgresConnector {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn fetch_schema(
        &self,
        connection: &ConnectionConfig,
        schema: &str,
        filter: &FilterConfig,
        hooks: &dyn IntrospectHooks,
    ) -> Result<SchemaDescriptor> {
        let table_filter = filter.compile()?;
        connection.validate()?;
        let options = connect_options(connection)?;

        debug!(target = %describe_connection(connection), "opening catalog connection");
        let mut conn = PgConnection::connect_with(&options)
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;

        let fetched = queries::fetch_catalog_rows(&mut conn, schema).await;
        if let Err(err) = conn.close().await {
            warn!(error = %err, "failed to close catalog connection");
        }
        let rows = fetched?;

        info!(schema = %schema, columns = rows.len(), "catalog rows fetched");
        let raw = rows.into_iter().map(CatalogRow::into_raw).collect();
        mapper::assemble_schema(schema, raw, &table_filter, hooks).await
    }
}

/// Build sqlx connect options from either a URL or the discrete fields.
pub fn connect_options(connection: &ConnectionConfig) -> Result<PgConnectOptions> {
    let options = match connection
        .connection_string
        .as_deref()
        .filter(|value| !value.trim().is_empty())
    {
        Some(url) => PgConnectOptions::from_str(url).map_err(|err| {
            Error::Configuration(format!("invalid connection string: {err}"))
        })?,
        None => {
            let mut options = PgConnectOptions::new().port(connection.port);
            if let Some(host) = connection.host.as_deref() {
                options = options.host(host);
            }
            if let Some(database) = connection.database.as_deref() {
                options = options.database(database);
            }
            if let Some(user) = connection.user.as_deref() {
                options = options.username(user);
            }
            if let Some(password) = connection.password.as_deref() {
                options = options.password(password);
            }
            options
        }
    };

    let options = match connection.ssl_mode.as_deref() {
        Some(mode) => options.ssl_mode(
            PgSslMode::from_str(mode)
                .map_err(|err| Error::Configuration(format!("invalid ssl_mode '{mode}': {err}")))?,
        ),
        None => options,
    };

    Ok(options.disable_statement_logging())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_options_from_fields() {
        let connection = ConnectionConfig {
            host: Some("db.internal".to_string()),
            port: 6543,
            database: Some("app".to_string()),
            user: Some("reader".to_string()),
            password: Some("secret".to_string()),
            ssl_mode: Some("require".to_string()),
            connection_string: None,
        };
        let options = connect_options(&connection).expect("options");
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("app"));
        assert_eq!(options.get_username(), "reader");
    }

    #[test]
    fn rejects_unknown_ssl_mode() {
        let connection = ConnectionConfig {
            connection_string: Some("postgres://reader@localhost/app".to_string()),
            ssl_mode: Some("sometimes".to_string()),
            ..ConnectionConfig::default()
        };
        assert!(matches!(
            connect_options(&connection),
            Err(Error::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn invalid_filter_fails_before_connecting() {
        let filter = FilterConfig {
            include: Some(pgzod_core::FilterSpec::Pattern("(".to_string())),
            exclude: None,
        };
        let err = PostgresConnector::new()
            .fetch_schema(
                &ConnectionConfig::default(),
                "public",
                &filter,
                &NoHooks,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    struct NoHooks;

    impl IntrospectHooks for NoHooks {}
}
