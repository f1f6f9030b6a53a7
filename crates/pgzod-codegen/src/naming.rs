//! Identifier construction for generated modules.
//!
//! Every function here is pure: the same table and column names always
//! produce the same identifiers.

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use pgzod_core::{Casing, RelationKind};

/// Nouns that have no distinct plural form.
const UNCOUNTABLE: &[&str] = &[
    "news",
    "series",
    "species",
    "data",
    "metadata",
    "information",
    "equipment",
];

/// Words that look plural but are already singular.
const SINGULAR_LOOKALIKES: &[&str] = &["status", "analysis", "basis", "axis", "crisis", "thesis"];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("index", "indices"),
    ("criterion", "criteria"),
    ("analysis", "analyses"),
    ("basis", "bases"),
    ("axis", "axes"),
    ("crisis", "crises"),
    ("thesis", "theses"),
];

/// Operation a generated schema validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Select => "select",
            Operation::Insert => "insert",
            Operation::Update => "update",
        }
    }
}

/// Convert `value` into the requested case style.
pub fn apply_casing(casing: Casing, value: &str) -> String {
    match casing {
        Casing::Camel => value.to_lower_camel_case(),
        Casing::Pascal => value.to_pascal_case(),
        Casing::Snake => value.to_snake_case(),
        Casing::Kebab => value.to_kebab_case(),
        Casing::Passthrough => value.to_string(),
    }
}

/// Singularize the last `_`-separated segment of `name`.
pub fn singularize(name: &str) -> String {
    map_last_segment(name, singularize_word)
}

/// Pluralize the last `_`-separated segment of `name`.
pub fn pluralize(name: &str) -> String {
    map_last_segment(name, pluralize_word)
}

fn map_last_segment(name: &str, convert: fn(&str) -> String) -> String {
    match name.rsplit_once('_') {
        Some((head, last)) if !last.is_empty() => format!("{head}_{}", convert(last)),
        _ => convert(name),
    }
}

fn singularize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str())
        || SINGULAR_LOOKALIKES.contains(&lower.as_str())
        || ["ss", "us", "is"].iter().any(|suffix| lower.ends_with(suffix))
    {
        return word.to_string();
    }

    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
        return match_leading_case(word, singular);
    }

    let strip = |count: usize| {
        word.get(..word.len().saturating_sub(count))
            .unwrap_or(word)
            .to_string()
    };

    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", strip(3));
    }
    if ["xes", "ches", "shes", "ses", "zes", "oes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return strip(2);
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return strip(1);
    }
    word.to_string()
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_leading_case(word, plural);
    }

    let mut chars = lower.chars().rev();
    let last = chars.next();
    let before_last = chars.next();

    let stem = |count: usize| word.get(..word.len().saturating_sub(count)).unwrap_or(word);

    if last == Some('y') && before_last.is_some_and(|ch| !"aeiou".contains(ch)) {
        return format!("{}ies", stem(1));
    }
    if lower.ends_with("is") && lower.len() > 2 {
        return format!("{}es", stem(2));
    }
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

fn match_leading_case(original: &str, replacement: &str) -> String {
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default()
    } else {
        replacement.to_string()
    }
}

/// Builds every identifier emitted for a table.
#[derive(Debug, Clone, Copy)]
pub struct Naming {
    pub field_casing: Casing,
    pub object_casing: Casing,
    pub singularize: bool,
}

impl Naming {
    pub fn new(field_casing: Casing, object_casing: Casing, singularize: bool) -> Self {
        Self {
            field_casing,
            object_casing,
            singularize,
        }
    }

    fn object(&self, parts: &[&str]) -> String {
        let joined = parts
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("_");
        apply_casing(self.object_casing, &joined)
    }

    /// Table name in its singular form, unless singularization is disabled.
    pub fn entity(&self, table: &str) -> String {
        if self.singularize {
            singularize(table)
        } else {
            table.to_string()
        }
    }

    pub fn property(&self, column: &str) -> String {
        apply_casing(self.field_casing, column)
    }

    /// `SelectUserPostsTableSchema`
    pub fn table_schema(&self, operation: Operation, table: &str, kind: RelationKind) -> String {
        self.object(&[operation.as_str(), table, kind.as_str(), "schema"])
    }

    /// `SelectUserPost`
    pub fn record_type(&self, operation: Operation, table: &str) -> String {
        self.object(&[operation.as_str(), &self.entity(table)])
    }

    /// `UserPostMetadataSchema`
    pub fn json_schema(&self, table: &str, column: &str) -> String {
        self.object(&[&self.entity(table), column, "schema"])
    }

    /// `USER_POST_STATUSES`; always screaming snake case.
    pub fn enum_constant(&self, table: &str, column: &str) -> String {
        format!("{}_{}", self.entity(table), pluralize(column)).to_shouty_snake_case()
    }

    /// `UserPostStatusSchema`
    pub fn enum_schema(&self, table: &str, column: &str) -> String {
        self.object(&[&self.entity(table), column, "schema"])
    }

    /// `UserPostStatus`
    pub fn enum_type(&self, table: &str, column: &str) -> String {
        self.object(&[&self.entity(table), column])
    }

    /// `user-posts`
    pub fn file_name(&self, table: &str) -> String {
        table.to_kebab_case()
    }
}

impl Default for Naming {
    fn default() -> Self {
        Self::new(Casing::Camel, Casing::Pascal, true)
    }
}
