use pgzod_core::{FieldKind, RawColumnDescriptor};

const SERIAL_TYPES: &[&str] = &[
    "serial",
    "serial2",
    "serial4",
    "serial8",
    "smallserial",
    "bigserial",
];

/// Classification result for a raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: FieldKind,
    pub is_array: bool,
    pub is_auto_generated: bool,
}

/// Classify a raw catalog column. Never fails; unknown types map to `Unknown`.
pub fn classify(raw: &RawColumnDescriptor) -> Classification {
    let (base_type, is_array) = split_array_type(&raw.data_type);
    let mut kind = field_kind(base_type);
    if kind == FieldKind::Unknown && !raw.enum_labels.is_empty() {
        kind = FieldKind::String;
    }

    Classification {
        kind,
        is_array,
        is_auto_generated: is_auto_generated(base_type, raw.default.as_deref()),
    }
}

/// Split the Postgres array naming convention (`_int4`, `text[]`) from the element type.
pub fn split_array_type(data_type: &str) -> (&str, bool) {
    let trimmed = data_type.trim();
    if let Some(element) = trimmed.strip_prefix('_') {
        return (element, true);
    }
    if let Some(element) = trimmed.strip_suffix("[]") {
        return (element.trim_end(), true);
    }
    (trimmed, false)
}

fn is_auto_generated(base_type: &str, default: Option<&str>) -> bool {
    let uses_sequence = default.is_some_and(|expr| {
        expr.trim_start()
            .get(..8)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("nextval("))
    });
    uses_sequence
        || SERIAL_TYPES
            .iter()
            .any(|serial| serial.eq_ignore_ascii_case(base_type))
}

/// Map a normalized (array-prefix stripped) type name onto a field kind.
pub fn field_kind(base_type: &str) -> FieldKind {
    let normalized = base_type.trim().to_lowercase();
    let name = normalized
        .split_once('(')
        .map(|(name, _)| name.trim())
        .unwrap_or(normalized.as_str());

    match name {
        "text" | "varchar" | "character varying" | "char" | "character" | "bpchar" | "citext"
        | "name" | "inet" | "cidr" | "macaddr" | "macaddr8" | "time" | "timetz"
        | "time without time zone" | "time with time zone" | "interval" | "xml" | "bit"
        | "varbit" | "bit varying" | "tsvector" | "money" => FieldKind::String,
        "int2" | "int4" | "int8" | "smallint" | "integer" | "int" | "bigint" | "oid" => {
            FieldKind::Integer
        }
        "float4" | "float8" | "real" | "double precision" | "numeric" | "decimal" => {
            FieldKind::Float
        }
        "bool" | "boolean" => FieldKind::Boolean,
        "date" | "timestamp" | "timestamptz" | "timestamp without time zone"
        | "timestamp with time zone" => FieldKind::Date,
        "uuid" => FieldKind::Uuid,
        "json" | "jsonb" => FieldKind::Json,
        other if SERIAL_TYPES.contains(&other) => FieldKind::Integer,
        _ => FieldKind::Unknown,
    }
}
