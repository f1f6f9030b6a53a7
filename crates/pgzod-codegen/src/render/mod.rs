//! Rendering of column models into validation-schema expressions.
//!
//! Read and write shapes are rendered independently; the write shape carries
//! the configured string transforms, numeric bounds and stringification.

mod dialect;

pub use dialect::{Check, Composition, DialectProfile};

use pgzod_core::{FieldKind, GeneratorConfig, StringTransforms};

use crate::model::ColumnModel;

/// Options that only affect the rendered expressions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub stringify_json: bool,
    pub stringify_dates: bool,
    pub default_empty_array: bool,
    pub string_transforms: StringTransforms,
    pub non_negative_numbers: bool,
}

impl RenderOptions {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            stringify_json: config.stringify_json,
            stringify_dates: config.stringify_dates,
            default_empty_array: config.default_empty_array,
            string_transforms: config.string_transforms,
            non_negative_numbers: config.non_negative_numbers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Read,
    Write,
}

/// Renders column models for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    profile: &'static DialectProfile,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(profile: &'static DialectProfile, options: RenderOptions) -> Self {
        Self { profile, options }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            DialectProfile::for_dialect(config.dialect),
            RenderOptions::from_config(config),
        )
    }

    pub fn profile(&self) -> &'static DialectProfile {
        self.profile
    }

    /// Expression validating a value read from the database.
    pub fn render_read(&self, column: &ColumnModel) -> String {
        let mut expr = self.wrapped_base(column, Shape::Read);

        if column.column.is_nullable() {
            expr = self.profile.nullable(expr);
            let fallback = if self.empty_array_default(column) {
                "[]"
            } else {
                "undefined"
            };
            expr = self
                .profile
                .transform(expr, &format!("(value) => value ?? {fallback}"));
        }

        expr
    }

    /// Expression validating a value about to be written to the database.
    pub fn render_write(&self, column: &ColumnModel) -> String {
        let mut expr = self.wrapped_base(column, Shape::Write);
        let nullable = column.column.is_nullable();
        let is_enum = self.enum_constant(column).is_some();

        if nullable {
            expr = self.profile.nullable(expr);
        }

        // Nullable columns get the null-guarded variant, after the wrapper.
        if !is_enum {
            if let Some(function) = self.stringify_function(column, nullable) {
                expr = self.profile.transform(expr, &function);
            }
        }

        if nullable || column.column.is_optional {
            let coalesce = if self.empty_array_default(column) {
                "(value) => (value === undefined ? [] : value)"
            } else {
                "(value) => value ?? undefined"
            };
            expr = self.profile.transform(expr, coalesce);
        }

        if column.column.is_optional {
            expr = self.profile.optional(expr);
        }

        expr
    }

    fn empty_array_default(&self, column: &ColumnModel) -> bool {
        self.options.default_empty_array && column.column.is_array
    }

    fn enum_constant<'a>(&self, column: &'a ColumnModel) -> Option<&'a str> {
        column
            .enum_constant
            .as_deref()
            .filter(|_| column.column.is_enum())
    }

    fn wrapped_base(&self, column: &ColumnModel, shape: Shape) -> String {
        let element = match (self.enum_constant(column), shape) {
            (Some(constant), _) => format!("z.enum({constant})"),
            (None, Shape::Read) => self.base(column, shape),
            // Write checks constrain each element of an array column.
            (None, Shape::Write) => self
                .profile
                .checks(self.base(column, shape), &self.write_checks(column)),
        };

        if column.column.is_array {
            format!("z.array({element})")
        } else {
            element
        }
    }

    fn base(&self, column: &ColumnModel, shape: Shape) -> String {
        match column.column.kind {
            FieldKind::String => match string_subtype(column.column.name()) {
                Some(StringSubtype::Email) => self.profile.email.to_string(),
                Some(StringSubtype::Url) => self.profile.url.to_string(),
                None => "z.string()".to_string(),
            },
            FieldKind::Uuid => self.profile.uuid.to_string(),
            FieldKind::Integer => self.profile.integer.to_string(),
            FieldKind::Float => "z.number()".to_string(),
            FieldKind::Boolean => "z.boolean()".to_string(),
            FieldKind::Date => match shape {
                Shape::Read => "z.coerce.date()".to_string(),
                Shape::Write => "z.date()".to_string(),
            },
            FieldKind::Json => column
                .json_schema_name
                .clone()
                .unwrap_or_else(|| self.profile.json.to_string()),
            FieldKind::Unknown => "z.any()".to_string(),
        }
    }

    fn write_checks(&self, column: &ColumnModel) -> Vec<Check> {
        let mut checks = Vec::new();
        match column.column.kind {
            FieldKind::String => {
                let StringTransforms {
                    trim,
                    lowercase,
                    uppercase,
                    normalize,
                } = self.options.string_transforms;
                if trim {
                    checks.push(Check::Trim);
                }
                if lowercase {
                    checks.push(Check::Lowercase);
                }
                if uppercase {
                    checks.push(Check::Uppercase);
                }
                if normalize {
                    checks.push(Check::Normalize);
                }
                if let Some(max) = column.column.raw.max_length.filter(|max| *max > 0) {
                    checks.push(Check::MaxLength(max));
                }
            }
            FieldKind::Integer | FieldKind::Float if self.options.non_negative_numbers => {
                checks.push(Check::NonNegative);
            }
            _ => {}
        }
        checks
    }

    fn stringify_function(&self, column: &ColumnModel, guarded: bool) -> Option<String> {
        let kind = column.column.kind;
        let is_array = column.column.is_array;

        let (param, body) = if kind == FieldKind::Date && self.options.stringify_dates {
            if is_array {
                ("values", "values.map((value) => value.toISOString())")
            } else {
                ("value", "value.toISOString()")
            }
        } else if kind == FieldKind::Json && self.options.stringify_json && !is_array {
            ("value", "JSON.stringify(value)")
        } else {
            return None;
        };

        Some(if guarded {
            format!("({param}) => ({param} === null ? {param} : {body})")
        } else {
            format!("({param}) => {body}")
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringSubtype {
    Email,
    Url,
}

fn string_subtype(column_name: &str) -> Option<StringSubtype> {
    let name = column_name.to_lowercase();
    if name == "email" || name.ends_with("_email") {
        Some(StringSubtype::Email)
    } else if name == "url" || name.ends_with("_url") {
        Some(StringSubtype::Url)
    } else {
        None
    }
}
