//! Recovery of enumerated literal sets from CHECK constraint clauses.
//!
//! Only four clause shapes are understood, tried in this order:
//!
//! 1. `col = ANY (ARRAY[...])` (the column name is not checked)
//! 2. `col IN (...)`
//! 3. `col = 'a' OR col = 'b' ...`
//! 4. `col <@ ARRAY[...]`
//!
//! Anything else contributes no values.

use regex::Regex;

/// Extract enum values for `column_name` from its CHECK clauses.
///
/// Values from separate clauses are concatenated in order; duplicates are kept.
pub fn extract_enum_values(column_name: &str, clauses: &[String]) -> Vec<String> {
    clauses
        .iter()
        .flat_map(|clause| extract_from_clause(column_name, clause))
        .collect()
}

fn extract_from_clause(column_name: &str, clause: &str) -> Vec<String> {
    let expr = normalize_clause(clause);
    if expr.is_empty() {
        return Vec::new();
    }

    if let Some(values) = parse_any_array(&expr) {
        return values;
    }
    if let Some(values) = parse_in_list(column_name, &expr) {
        return values;
    }
    if let Some(values) = parse_or_chain(column_name, &expr) {
        return values;
    }
    if let Some(values) = parse_contained_by(column_name, &expr) {
        return values;
    }

    Vec::new()
}

fn normalize_clause(clause: &str) -> String {
    let unescaped = clause.replace("\\'", "'").replace("\\\"", "\"");
    let mut expr = unescaped.trim();
    if expr.len() >= 5 && expr.as_bytes()[..5].eq_ignore_ascii_case(b"check") {
        expr = expr[5..].trim();
    }
    strip_outer_parens(expr).to_string()
}

/// Remove parentheses that wrap the entire expression, as many times as needed.
fn strip_outer_parens(mut expr: &str) -> &str {
    while expr.starts_with('(') && expr.ends_with(')') && closes_at_end(expr) {
        expr = expr[1..expr.len() - 1].trim();
    }
    expr
}

/// True when the opening paren at index 0 is closed by the final character.
fn closes_at_end(expr: &str) -> bool {
    let mut depth = 0usize;
    let mut in_quote = false;
    let last = expr.len() - 1;

    for (idx, ch) in expr.char_indices() {
        match ch {
            '\'' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return idx == last;
                }
            }
            _ => {}
        }
    }
    false
}

fn parse_any_array(expr: &str) -> Option<Vec<String>> {
    let re = Regex::new(r"(?is)=\s*any\s*\(\s*\(?\s*array\s*\[(.*?)\]").ok()?;
    let caps = re.captures(expr)?;
    Some(split_literals(&caps[1]))
}

fn parse_in_list(column_name: &str, expr: &str) -> Option<Vec<String>> {
    let re = Regex::new(r#"(?is)^\(*\s*("?[\w$]+"?)\s*\)*(?:::[\w\s]+?)?\s+in\s*(\(.*\))$"#).ok()?;
    let caps = re.captures(expr)?;
    if !same_column(&caps[1], column_name) {
        return None;
    }
    // The list must be the whole operand, not the first of several conjuncts.
    let list = &caps[2];
    if !closes_at_end(list) {
        return None;
    }
    Some(split_literals(&list[1..list.len() - 1]))
}

fn parse_or_chain(column_name: &str, expr: &str) -> Option<Vec<String>> {
    let parts = split_top_level_or(expr);
    if parts.len() < 2 {
        return None;
    }

    let re = Regex::new(r#"(?is)^\(*\s*("?[\w$]+"?)\s*\)*(?:::[\w\s]+?)?\s*=\s*(.+)$"#).ok()?;
    let mut values = Vec::with_capacity(parts.len());
    for part in parts {
        let part = strip_outer_parens(part.trim());
        let caps = re.captures(part)?;
        if !same_column(&caps[1], column_name) {
            return None;
        }
        values.push(normalize_literal(&caps[2])?);
    }
    Some(values)
}

fn parse_contained_by(column_name: &str, expr: &str) -> Option<Vec<String>> {
    let re = Regex::new(
        r#"(?is)^\(*\s*("?[\w$]+"?)\s*\)*(?:::[\w\s\[\]]+?)?\s*<@\s*\(*\s*array\s*\[(.*?)\]"#,
    )
    .ok()?;
    let caps = re.captures(expr)?;
    if !same_column(&caps[1], column_name) {
        return None;
    }
    Some(split_literals(&caps[2]))
}

fn same_column(candidate: &str, column_name: &str) -> bool {
    candidate
        .trim_matches('"')
        .eq_ignore_ascii_case(column_name.trim_matches('"'))
}

/// Split on `OR` keywords that sit outside quotes and parentheses.
fn split_top_level_or(expr: &str) -> Vec<&str> {
    let bytes = expr.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'\'' => in_quote = !in_quote,
            b'(' if !in_quote => depth += 1,
            b')' if !in_quote => depth = depth.saturating_sub(1),
            b' ' if !in_quote && depth == 0 => {
                let rest = &bytes[idx..];
                if rest.len() > 4 && rest[..4].eq_ignore_ascii_case(b" or ") {
                    parts.push(&expr[start..idx]);
                    idx += 4;
                    start = idx;
                    continue;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    parts.push(&expr[start..]);
    parts
}

/// Split a comma separated literal list, honouring quotes.
fn split_literals(list: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut depth = 0usize;

    for ch in list.chars() {
        match ch {
            '\'' => {
                in_quote = !in_quote;
                current.push(ch);
            }
            '(' if !in_quote => {
                depth += 1;
                current.push(ch);
            }
            ')' if !in_quote => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if !in_quote && depth == 0 => {
                items.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    items.push(current);

    items
        .iter()
        .filter_map(|item| normalize_literal(item))
        .collect()
}

/// Strip parentheses, `::type` casts and quotes from a single literal.
fn normalize_literal(value: &str) -> Option<String> {
    let trimmed = strip_wrapping_parens(value.trim());
    let without_cast = strip_wrapping_parens(strip_cast(trimmed).trim());

    let literal = if without_cast.len() >= 2
        && without_cast.starts_with('\'')
        && without_cast.ends_with('\'')
    {
        without_cast[1..without_cast.len() - 1].replace("''", "'")
    } else if without_cast.len() >= 2
        && without_cast.starts_with('"')
        && without_cast.ends_with('"')
    {
        without_cast[1..without_cast.len() - 1].to_string()
    } else {
        without_cast.to_string()
    };

    if literal.is_empty() { None } else { Some(literal) }
}

fn strip_wrapping_parens(mut value: &str) -> &str {
    while value.len() >= 2 && value.starts_with('(') && value.ends_with(')') {
        value = value[1..value.len() - 1].trim();
    }
    value
}

/// Drop a trailing `::type` cast that sits outside any quoted literal.
fn strip_cast(value: &str) -> &str {
    let mut in_quote = false;
    let bytes = value.as_bytes();
    for idx in 0..bytes.len() {
        match bytes[idx] {
            b'\'' => in_quote = !in_quote,
            b':' if !in_quote && bytes.get(idx + 1) == Some(&b':') => return &value[..idx],
            _ => {}
        }
    }
    value
}
