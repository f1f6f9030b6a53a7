//! TypeScript module emission for table models.

use serde::Serialize;

use crate::model::{ColumnModel, TableModel};
use crate::render::DialectProfile;

pub const GENERATED_HEADER: &str = "// Generated by pgzod. Do not edit by hand.";

/// One emitted module plus the line re-exporting it from the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTable {
    /// File name relative to the output directory, e.g. `user-posts.ts`.
    pub file_name: String,
    pub content: String,
    pub index_line: String,
}

/// Emit the module for `model`.
pub fn emit_table(model: &TableModel, profile: &DialectProfile) -> RenderedTable {
    let mut code = String::new();

    code.push_str(GENERATED_HEADER);
    code.push('\n');
    code.push_str(&format!(
        "// Source: {}.{} ({})\n\n",
        model.schema_name,
        model.table_name,
        model.kind.as_str()
    ));

    code.push_str(profile.import_line);
    code.push('\n');
    if let Some(location) = model
        .json_import_location
        .as_deref()
        .filter(|_| !model.json_imports.is_empty())
    {
        code.push_str("import { ");
        for import in &model.json_imports {
            code.push_str(&import.name);
            if !import.is_last {
                code.push_str(", ");
            }
        }
        code.push_str(&format!(" }} from '{}';\n", escape_single_quoted(location)));
    }
    code.push('\n');

    for definition in &model.enums {
        code.push_str(&format!("export const {} = [", definition.constant_name));
        for value in &definition.values {
            code.push_str(&format!("'{}'", escape_single_quoted(&value.value)));
            if !value.is_last {
                code.push_str(", ");
            }
        }
        code.push_str("] as const;\n");
        code.push_str(&format!(
            "export const {} = z.enum({});\n",
            definition.schema_name, definition.constant_name
        ));
        code.push_str(&format!(
            "export type {} = z.infer<typeof {}>;\n\n",
            definition.type_name, definition.schema_name
        ));
    }

    let names = &model.names;
    push_object(&mut code, &names.select_schema, &model.columns, |column| {
        &column.read_type
    });
    code.push_str(&format!(
        "export type {} = z.infer<typeof {}>;\n",
        names.select_type, names.select_schema
    ));

    if model.supports_write {
        code.push('\n');
        push_object(
            &mut code,
            &names.insert_schema,
            &model.writable_columns,
            |column| &column.write_type,
        );
        code.push_str(&format!(
            "export type {} = z.input<typeof {}>;\n\n",
            names.insert_type, names.insert_schema
        ));
        code.push_str(&format!(
            "export const {} = {};\n",
            names.update_schema,
            profile.partial(&names.insert_schema)
        ));
        code.push_str(&format!(
            "export type {} = z.input<typeof {}>;\n",
            names.update_type, names.update_schema
        ));
    }

    let module = model.file_name.clone();
    RenderedTable {
        file_name: format!("{module}.ts"),
        content: code,
        index_line: format!("export * from './{module}';"),
    }
}

/// Contents of the `index.ts` barrel re-exporting every module.
pub fn emit_index<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut code = String::new();
    code.push_str(GENERATED_HEADER);
    code.push_str("\n\n");
    for line in lines {
        code.push_str(line);
        code.push('\n');
    }
    code
}

fn push_object(
    code: &mut String,
    schema_name: &str,
    columns: &[ColumnModel],
    expression: impl Fn(&ColumnModel) -> &String,
) {
    code.push_str(&format!("export const {schema_name} = z.object({{\n"));
    for column in columns {
        if let Some(description) = column.column.raw.description.as_deref() {
            push_doc(code, description);
        }
        code.push_str(&format!(
            "  {}: {},\n",
            property_key(&column.property_name),
            expression(column)
        ));
    }
    code.push_str("});\n");
}

fn push_doc(code: &mut String, description: &str) {
    let text = description.trim().replace("*/", "*\\/");
    if text.is_empty() {
        return;
    }
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    if lines.len() == 1 {
        code.push_str(&format!("  /** {} */\n", lines[0]));
        return;
    }
    code.push_str("  /**\n");
    for line in lines {
        if line.is_empty() {
            code.push_str("   *\n");
        } else {
            code.push_str(&format!("   * {line}\n"));
        }
    }
    code.push_str("   */\n");
}

/// Object key as written in source, quoted when it is not a plain identifier.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", escape_single_quoted(name))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

fn escape_single_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}
