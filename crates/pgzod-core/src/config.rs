use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::TableFilter;

pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_PORT: u16 = 5432;

/// Parameters used to reach the database.
///
/// Either `connection_string` or the discrete `host`/`database`/`user` fields
/// must be present.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: Option<String>,
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Postgres `sslmode` value (`disable`, `prefer`, `require`, ...).
    pub ssl_mode: Option<String>,
    /// Pre-built connection URL; takes precedence over the discrete fields.
    pub connection_string: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            database: None,
            user: None,
            password: None,
            ssl_mode: None,
            connection_string: None,
        }
    }
}

impl ConnectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self
            .connection_string
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
        {
            return Ok(());
        }

        let missing: Vec<&str> = [
            ("host", &self.host),
            ("database", &self.database),
            ("user", &self.user),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Configuration(format!(
                "missing connection field(s): {} (or provide a connection string)",
                missing.join(", ")
            )))
        }
    }
}

/// A relation filter: a single regular expression or an explicit name list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FilterSpec {
    Pattern(String),
    Names(Vec<String>),
}

/// Include/exclude filters applied to relation names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<FilterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<FilterSpec>,
}

impl FilterConfig {
    pub fn compile(&self) -> Result<TableFilter> {
        TableFilter::new(self.include.as_ref(), self.exclude.as_ref())
    }
}

/// Case style applied to generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Casing {
    #[serde(alias = "camelCase")]
    Camel,
    #[serde(alias = "PascalCase")]
    Pascal,
    #[serde(alias = "snake_case")]
    Snake,
    #[serde(alias = "kebab-case")]
    Kebab,
    Passthrough,
}

/// Output dialect of the target validation library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Default,
    #[serde(alias = "3")]
    Zod3,
    #[serde(alias = "4")]
    Zod4,
    #[serde(alias = "4-mini", alias = "zod4-mini")]
    Zod4Mini,
}

/// Write-side string transforms, applied before length constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StringTransforms {
    pub trim: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub normalize: bool,
}

/// Fully resolved generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GeneratorConfig {
    pub connection: ConnectionConfig,
    /// Database schema to introspect.
    pub schema: String,
    #[serde(flatten)]
    pub filter: FilterConfig,
    pub field_name_casing: Casing,
    pub object_name_casing: Casing,
    pub dialect: Dialect,
    /// Module path the JSON sub-schemas are imported from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema_import_location: Option<String>,
    pub stringify_json: bool,
    pub stringify_dates: bool,
    pub default_empty_array: bool,
    pub singularize: bool,
    pub string_transforms: StringTransforms,
    pub non_negative_numbers: bool,
    pub output_dir: PathBuf,
    /// Delete previously generated modules before writing.
    pub clean_output: bool,
    pub debug: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            schema: DEFAULT_SCHEMA.to_string(),
            filter: FilterConfig::default(),
            field_name_casing: Casing::Camel,
            object_name_casing: Casing::Pascal,
            dialect: Dialect::Default,
            json_schema_import_location: None,
            stringify_json: false,
            stringify_dates: false,
            default_empty_array: false,
            singularize: true,
            string_transforms: StringTransforms::default(),
            non_negative_numbers: false,
            output_dir: PathBuf::from("generated"),
            clean_output: false,
            debug: false,
        }
    }
}

impl GeneratorConfig {
    /// Check everything that can be checked before touching the network.
    pub fn validate(&self) -> Result<()> {
        if self.schema.trim().is_empty() {
            return Err(Error::Configuration("schema name cannot be empty".to_string()));
        }
        if self.string_transforms.lowercase && self.string_transforms.uppercase {
            return Err(Error::Configuration(
                "lowercase and uppercase string transforms are mutually exclusive".to_string(),
            ));
        }
        self.connection.validate()?;
        self.filter.compile()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_connection_fields_are_reported() {
        let conn = ConnectionConfig {
            host: Some("localhost".to_string()),
            ..ConnectionConfig::default()
        };
        let err = conn.validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("database, user")));
    }

    #[test]
    fn connection_string_short_circuits_field_checks() {
        let conn = ConnectionConfig {
            connection_string: Some("postgres://u@h/db".to_string()),
            ..ConnectionConfig::default()
        };
        assert!(conn.validate().is_ok());
    }

    #[test]
    fn parses_toml_with_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            include = "^a|b"
            exclude = ["b"]
            field_name_casing = "snake_case"
            dialect = "zod4_mini"

            [connection]
            connection_string = "postgres://user@localhost/app"
            "#,
        )
        .expect("parse config");

        assert_eq!(config.schema, "public");
        assert!(config.singularize);
        assert_eq!(config.field_name_casing, Casing::Snake);
        assert_eq!(config.object_name_casing, Casing::Pascal);
        assert_eq!(config.dialect, Dialect::Zod4Mini);
        assert_eq!(config.filter.include, Some(FilterSpec::Pattern("^a|b".to_string())));
        assert_eq!(config.filter.exclude, Some(FilterSpec::Names(vec!["b".to_string()])));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn conflicting_case_transforms_are_rejected() {
        let config = GeneratorConfig {
            connection: ConnectionConfig {
                connection_string: Some("postgres://localhost/app".to_string()),
                ..ConnectionConfig::default()
            },
            string_transforms: StringTransforms {
                lowercase: true,
                uppercase: true,
                ..StringTransforms::default()
            },
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }
}
