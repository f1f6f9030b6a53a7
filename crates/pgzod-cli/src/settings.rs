use std::path::{Path, PathBuf};

use clap::Args;
use pgzod_core::{Casing, Dialect, FilterSpec, GeneratorConfig};
use serde::de::DeserializeOwned;

use crate::CliError;
use crate::atomic::write_bytes_atomic;

pub const DEFAULT_CONFIG_FILE: &str = "pgzod.toml";

/// Command-line overrides for `GeneratorConfig`; anything left unset keeps
/// the value from the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Full connection URL, e.g. postgres://user@host/db.
    #[arg(long, value_name = "URL")]
    pub connection_string: Option<String>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub database: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long, value_name = "MODE")]
    pub ssl_mode: Option<String>,
    /// Database schema to introspect.
    #[arg(long)]
    pub schema: Option<String>,
    /// Regular expression selecting relations.
    #[arg(long, value_name = "REGEX", conflicts_with = "include_table")]
    pub include: Option<String>,
    /// Regular expression rejecting relations; wins over include.
    #[arg(long, value_name = "REGEX", conflicts_with = "exclude_table")]
    pub exclude: Option<String>,
    /// Relation to select by exact name (repeatable).
    #[arg(long, value_name = "NAME")]
    pub include_table: Vec<String>,
    /// Relation to reject by exact name (repeatable).
    #[arg(long, value_name = "NAME")]
    pub exclude_table: Vec<String>,
    #[arg(long, value_parser = parse_casing, value_name = "CASING")]
    pub field_name_casing: Option<Casing>,
    #[arg(long, value_parser = parse_casing, value_name = "CASING")]
    pub object_name_casing: Option<Casing>,
    /// default, zod3, zod4 or zod4_mini.
    #[arg(long, value_parser = parse_dialect)]
    pub dialect: Option<Dialect>,
    #[arg(long, value_name = "MODULE")]
    pub json_schema_import_location: Option<String>,
    #[arg(long)]
    pub stringify_json: bool,
    #[arg(long)]
    pub stringify_dates: bool,
    #[arg(long)]
    pub default_empty_array: bool,
    /// Keep table names as they are in record and enum names.
    #[arg(long)]
    pub no_singularize: bool,
    #[arg(long)]
    pub trim: bool,
    #[arg(long, conflicts_with = "uppercase")]
    pub lowercase: bool,
    #[arg(long)]
    pub uppercase: bool,
    #[arg(long)]
    pub normalize: bool,
    #[arg(long)]
    pub non_negative_numbers: bool,
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    /// Delete previously generated modules before writing.
    #[arg(long)]
    pub clean: bool,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut GeneratorConfig) {
        let connection = &mut config.connection;
        set(&mut connection.connection_string, self.connection_string.map(Some));
        set(&mut connection.host, self.host.map(Some));
        set(&mut connection.port, self.port);
        set(&mut connection.database, self.database.map(Some));
        set(&mut connection.user, self.user.map(Some));
        set(&mut connection.password, self.password.map(Some));
        set(&mut connection.ssl_mode, self.ssl_mode.map(Some));

        set(&mut config.schema, self.schema);
        set(
            &mut config.filter.include,
            filter_override(self.include, self.include_table),
        );
        set(
            &mut config.filter.exclude,
            filter_override(self.exclude, self.exclude_table),
        );
        set(&mut config.field_name_casing, self.field_name_casing);
        set(&mut config.object_name_casing, self.object_name_casing);
        set(&mut config.dialect, self.dialect);
        set(
            &mut config.json_schema_import_location,
            self.json_schema_import_location.map(Some),
        );
        set(&mut config.output_dir, self.out_dir);

        config.stringify_json |= self.stringify_json;
        config.stringify_dates |= self.stringify_dates;
        config.default_empty_array |= self.default_empty_array;
        config.singularize &= !self.no_singularize;
        config.non_negative_numbers |= self.non_negative_numbers;
        config.clean_output |= self.clean;

        let transforms = &mut config.string_transforms;
        transforms.trim |= self.trim;
        transforms.lowercase |= self.lowercase;
        transforms.uppercase |= self.uppercase;
        transforms.normalize |= self.normalize;
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn filter_override(pattern: Option<String>, names: Vec<String>) -> Option<Option<FilterSpec>> {
    match (pattern, names.is_empty()) {
        (Some(pattern), _) => Some(Some(FilterSpec::Pattern(pattern))),
        (None, false) => Some(Some(FilterSpec::Names(names))),
        (None, true) => None,
    }
}

/// Read `path` when given. Without an explicit path the default file is used
/// if present, otherwise built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, CliError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(GeneratorConfig::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|err| {
        CliError::InvalidConfig(format!("cannot read {}: {err}", path.display()))
    })?;
    toml::from_str(&content)
        .map_err(|err| CliError::InvalidConfig(format!("{}: {err}", path.display())))
}

/// Write a config file holding the defaults; refuses to overwrite unless `force`.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::InvalidConfig(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let encoded = toml::to_string_pretty(&GeneratorConfig::default())?;
    write_bytes_atomic(path, encoded.as_bytes())
}

fn parse_casing(value: &str) -> Result<Casing, String> {
    parse_serde_enum(value)
}

fn parse_dialect(value: &str) -> Result<Dialect, String> {
    parse_serde_enum(value)
}

/// Parse a value the same way the config file would.
fn parse_serde_enum<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|err| err.to_string())
}
