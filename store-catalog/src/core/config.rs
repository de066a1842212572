use std::path::PathBuf;

/// Catalog configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | database, uploads and logs live here |
/// | DATABASE_NS | catalog | SurrealDB namespace |
/// | DATABASE_DB | stores | SurrealDB database |
/// | UPLOADS_DIR | {WORK_DIR}/uploads | photo blob store root |
/// | PHOTO_MAX_WIDTH | 800 | stored photos are at most this wide |
/// | MAX_UPLOAD_BYTES | 5242880 | upload size cap |
/// | SLUG_MAX_ATTEMPTS | 5 | inserts tried before giving up on a slug |
/// | NEAR_DEFAULT_LIMIT | 10 | max results of a nearby lookup |
/// | NEAR_MAX_DISTANCE_M | (unset) | radius used when the caller gives none |
/// | TOP_STORES_LIMIT | 10 | default size of the top-stores ranking |
/// | ENVIRONMENT | development | development / production |
/// | LOG_LEVEL | info | tracing filter |
/// | LOG_JSON | false (true in production) | JSON log lines |
///
/// ```ignore
/// WORK_DIR=/srv/catalog PHOTO_MAX_WIDTH=1024 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub database_ns: String,
    pub database_db: String,
    pub uploads_dir: PathBuf,
    pub photo_max_width: u32,
    pub max_upload_bytes: usize,
    pub slug_max_attempts: usize,
    pub near_default_limit: usize,
    pub near_max_distance_m: Option<f64>,
    pub top_stores_limit: usize,
    /// development | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = PathBuf::from(std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()));
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Self {
            database_ns: std::env::var("DATABASE_NS").unwrap_or_else(|_| "catalog".into()),
            database_db: std::env::var("DATABASE_DB").unwrap_or_else(|_| "stores".into()),
            uploads_dir: std::env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| work_dir.join("uploads")),
            photo_max_width: env_parse("PHOTO_MAX_WIDTH").unwrap_or(800),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES").unwrap_or(5 * 1024 * 1024),
            slug_max_attempts: env_parse("SLUG_MAX_ATTEMPTS").unwrap_or(5).max(1),
            near_default_limit: env_parse("NEAR_DEFAULT_LIMIT").unwrap_or(10),
            near_max_distance_m: env_parse("NEAR_MAX_DISTANCE_M"),
            top_stores_limit: env_parse("TOP_STORES_LIMIT").unwrap_or(shared::ranking::DEFAULT_TOP_LIMIT),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON").unwrap_or(environment == "production"),
            environment,
            work_dir,
        }
    }

    /// Defaults rooted at `work_dir`, ignoring the environment.
    ///
    /// Used by tests.
    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_ns: "catalog".into(),
            database_db: "stores".into(),
            uploads_dir: work_dir.join("uploads"),
            photo_max_width: 800,
            max_upload_bytes: 5 * 1024 * 1024,
            slug_max_attempts: 5,
            near_default_limit: 10,
            near_max_distance_m: None,
            top_stores_limit: shared::ranking::DEFAULT_TOP_LIMIT,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            work_dir,
        }
    }

    /// Embedded database directory
    pub fn database_path(&self) -> PathBuf {
        self.work_dir.join("database")
    }

    /// Log directory
    pub fn log_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_work_dir_derives_paths() {
        let config = Config::with_work_dir("/tmp/catalog");
        assert_eq!(config.uploads_dir, PathBuf::from("/tmp/catalog/uploads"));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/catalog/database"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/catalog/logs"));
        assert_eq!(config.photo_max_width, 800);
        assert_eq!(config.slug_max_attempts, 5);
        assert!(!config.is_production());
    }
}
