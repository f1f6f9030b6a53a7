use crate::config::ConnectionConfig;

/// Loggable description of where a run connects, with secrets masked.
pub fn describe_connection(conn: &ConnectionConfig) -> String {
    if let Some(url) = conn.connection_string.as_deref() {
        return redact_connection_string(url);
    }

    let user = conn.user.as_deref().unwrap_or("");
    let auth = match (user.is_empty(), conn.password.is_some()) {
        (true, _) => String::new(),
        (false, true) => format!("{user}:***@"),
        (false, false) => format!("{user}@"),
    };
    format!(
        "postgres://{auth}{}:{}/{}",
        conn.host.as_deref().unwrap_or(""),
        conn.port,
        conn.database.as_deref().unwrap_or("")
    )
}

/// Mask the password in the authority section and any sensitive query params.
pub fn redact_connection_string(conn: &str) -> String {
    let mut redacted = conn.to_string();

    if let Some(scheme_end) = conn.find("://") {
        let after_scheme = &conn[scheme_end + 3..];
        let authority_end = after_scheme.find(['/', '?']).unwrap_or(after_scheme.len());
        let authority = &after_scheme[..authority_end];

        if let Some(at_idx) = authority.rfind('@') {
            let auth_part = &authority[..at_idx];
            if let Some(colon_idx) = auth_part.find(':') {
                let password_start = scheme_end + 3 + colon_idx + 1;
                let password_end = scheme_end + 3 + at_idx;
                redacted.replace_range(password_start..password_end, "***");
            }
        }
    }

    redact_query_params(&redacted)
}

fn redact_query_params(conn: &str) -> String {
    let Some(query_start) = conn.find('?') else {
        return conn.to_string();
    };

    let (base, query) = conn.split_at(query_start + 1);
    let params: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive_key(key) => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect();

    format!("{base}{}", params.join("&"))
}

fn is_sensitive_key(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "password" | "pass" | "passfile" | "sslpassword"
    )
}
