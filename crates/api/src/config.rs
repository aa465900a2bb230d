use minfo_db::DbConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for the compose setup this service
/// ships in. Override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`). Also reported by `/machine-info`.
    pub port: u16,
    /// URL prefix when served behind a path-rewriting proxy
    /// (default: empty). Normalized to `/prefix` form.
    pub root_path: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether the `/metrics` endpoint is mounted (default: `true`).
    pub metrics_enabled: bool,
    /// Postgres connection settings.
    pub db: DbConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default    |
    /// |---------------------------|------------|
    /// | `HOST`                    | `0.0.0.0`  |
    /// | `PORT`                    | `8000`     |
    /// | `ROOT_PATH`               | (empty)    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`       |
    /// | `METRICS_ENABLED`         | `true`     |
    /// | `DB_HOST`                 | `pgpool`   |
    /// | `DB_PORT`                 | `5432`     |
    /// | `DB_NAME`                 | `app_db`   |
    /// | `DB_USER`                 | `app_user` |
    /// | `DB_PASSWORD`             | (empty)    |
    /// | `DB_CONNECT_TIMEOUT_SECS` | `5`        |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "8000")
            .parse()
            .expect("PORT must be a valid u16");

        let root_path = normalize_root_path(&env_or("ROOT_PATH", ""));

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let metrics_enabled: bool = env_or("METRICS_ENABLED", "true")
            .parse()
            .expect("METRICS_ENABLED must be true or false");

        let db = DbConfig {
            host: env_or("DB_HOST", "pgpool"),
            port: env_or("DB_PORT", "5432")
                .parse()
                .expect("DB_PORT must be a valid u16"),
            database: env_or("DB_NAME", "app_db"),
            user: env_or("DB_USER", "app_user"),
            password: env_or("DB_PASSWORD", ""),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", "5")
                .parse()
                .expect("DB_CONNECT_TIMEOUT_SECS must be a valid u64"),
        };

        Self {
            host,
            port,
            root_path,
            request_timeout_secs,
            metrics_enabled,
            db,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Normalize a root path to either empty or `/prefix` with no trailing
/// slash, so route nesting and link building can concatenate it directly.
fn normalize_root_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_root_path;

    #[test]
    fn root_path_normalization() {
        assert_eq!(normalize_root_path(""), "");
        assert_eq!(normalize_root_path("/"), "");
        assert_eq!(normalize_root_path("api"), "/api");
        assert_eq!(normalize_root_path("/api"), "/api");
        assert_eq!(normalize_root_path("/api/"), "/api");
    }
}
