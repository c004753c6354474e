//! Server configuration for potato.
//!
//! Loaded once from environment variables at startup and then handed to
//! [`AppState`](crate::state::AppState); nothing reads the environment after
//! that.

use std::net::SocketAddr;

use subtle::ConstantTimeEq;

/// Port used when neither `POTATO_BIND_ADDR` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 1323;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Basic-auth credentials guarding the submission form.
    pub credentials: Credentials,
    /// Request limits.
    pub limits: Limits,
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// One file per paste in a flat directory.
    File { path: String },
    /// In-memory (data lost on restart).
    Memory,
    /// `RocksDB` persistent storage.
    RocksDb { path: String },
}

/// Limits applied to incoming requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum request body size for paste submissions.
    pub max_paste_bytes: usize,
    /// Maximum number of submissions processed at once.
    pub max_concurrent_submissions: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_paste_bytes: 1024 * 1024,
            max_concurrent_submissions: 64,
        }
    }
}

/// The shared username/password pair for HTTP basic authentication.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Build a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check a presented username/password in constant time.
    ///
    /// Both fields are always compared, whatever the outcome of the first.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `POTATO_USERNAME` or `POTATO_PASSWORD` is unset or empty.
    #[error("POTATO_USERNAME and POTATO_PASSWORD must both be set and non-empty")]
    MissingCredentials,

    /// A variable is set to something unusable.
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    /// The requested storage backend is not one we know.
    #[error("unknown storage backend '{0}' (expected file, memory, or rocksdb)")]
    UnknownStorage(String),
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `POTATO_BIND_ADDR`: full bind address (overrides `PORT`)
    /// - `PORT`: port to bind on `0.0.0.0` (default: `1323`)
    /// - `POTATO_STORAGE`: `file`, `memory`, or `rocksdb` (default: `file`)
    /// - `POTATO_DATA_DIR`: directory for persistent backends (default: `./data`)
    /// - `POTATO_LOG_LEVEL`: log filter (default: `info`)
    /// - `POTATO_USERNAME` / `POTATO_PASSWORD`: basic-auth credentials (required)
    /// - `POTATO_MAX_PASTE_BYTES`: request body limit (default: `1048576`)
    /// - `POTATO_MAX_CONCURRENT_SUBMISSIONS`: concurrent `POST /` limit (default: `64`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if credentials are missing or a value does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Priority: POTATO_BIND_ADDR > PORT > default 0.0.0.0:1323
        let bind_addr = if let Some(addr) = lookup("POTATO_BIND_ADDR") {
            addr.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
                var: "POTATO_BIND_ADDR",
                reason: e.to_string(),
            })?
        } else {
            let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
            SocketAddr::from(([0, 0, 0, 0], port))
        };

        let data_dir = lookup("POTATO_DATA_DIR").unwrap_or_else(|| "./data".to_owned());

        let storage_backend = match lookup("POTATO_STORAGE")
            .unwrap_or_else(|| "file".to_owned())
            .to_lowercase()
            .as_str()
        {
            "file" | "fs" => StorageBackendType::File { path: data_dir },
            "memory" => StorageBackendType::Memory,
            "rocksdb" => StorageBackendType::RocksDb { path: data_dir },
            other => return Err(ConfigError::UnknownStorage(other.to_owned())),
        };

        let log_level = lookup("POTATO_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let credentials = match (lookup("POTATO_USERNAME"), lookup("POTATO_PASSWORD")) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Credentials::new(user, pass)
            }
            _ => return Err(ConfigError::MissingCredentials),
        };

        let defaults = Limits::default();
        let limits = Limits {
            max_paste_bytes: parse_or(
                "POTATO_MAX_PASTE_BYTES",
                lookup("POTATO_MAX_PASTE_BYTES"),
                defaults.max_paste_bytes,
            )?,
            max_concurrent_submissions: parse_or(
                "POTATO_MAX_CONCURRENT_SUBMISSIONS",
                lookup("POTATO_MAX_CONCURRENT_SUBMISSIONS"),
                defaults.max_concurrent_submissions,
            )?
            .max(1),
        };

        Ok(Self {
            bind_addr,
            storage_backend,
            log_level,
            credentials,
            limits,
        })
    }
}

fn parse_or<T>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|var| map.get(var).cloned())
    }

    const CREDS: [(&str, &str); 2] = [("POTATO_USERNAME", "admin"), ("POTATO_PASSWORD", "hunter2")];

    #[test]
    fn defaults() {
        let config = load(&CREDS).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)));
        assert_eq!(
            config.storage_backend,
            StorageBackendType::File {
                path: "./data".to_owned()
            }
        );
        assert_eq!(config.log_level, "info");
        assert_eq!(config.limits, Limits::default());
        assert!(config.credentials.verify("admin", "hunter2"));
    }

    #[test]
    fn bind_addr_overrides_port() {
        let mut vars = CREDS.to_vec();
        vars.push(("PORT", "9000"));
        vars.push(("POTATO_BIND_ADDR", "127.0.0.1:8080"));
        let config = load(&vars).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
    }

    #[test]
    fn port_binds_all_interfaces() {
        let mut vars = CREDS.to_vec();
        vars.push(("PORT", "9000"));
        let config = load(&vars).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
    }

    #[test]
    fn storage_selection() {
        let mut vars = CREDS.to_vec();
        vars.push(("POTATO_STORAGE", "Memory"));
        assert_eq!(load(&vars).unwrap().storage_backend, StorageBackendType::Memory);

        let mut vars = CREDS.to_vec();
        vars.push(("POTATO_STORAGE", "rocksdb"));
        vars.push(("POTATO_DATA_DIR", "/var/lib/potato"));
        assert_eq!(
            load(&vars).unwrap().storage_backend,
            StorageBackendType::RocksDb {
                path: "/var/lib/potato".to_owned()
            }
        );

        let mut vars = CREDS.to_vec();
        vars.push(("POTATO_STORAGE", "s3"));
        assert!(matches!(load(&vars), Err(ConfigError::UnknownStorage(s)) if s == "s3"));
    }

    #[test]
    fn missing_or_empty_credentials_are_rejected() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingCredentials)));
        assert!(matches!(
            load(&[("POTATO_USERNAME", "admin")]),
            Err(ConfigError::MissingCredentials)
        ));
        assert!(matches!(
            load(&[("POTATO_USERNAME", "admin"), ("POTATO_PASSWORD", "")]),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let mut vars = CREDS.to_vec();
        vars.push(("PORT", "http"));
        assert!(matches!(load(&vars), Err(ConfigError::Invalid { var: "PORT", .. })));

        let mut vars = CREDS.to_vec();
        vars.push(("POTATO_MAX_PASTE_BYTES", "-1"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid {
                var: "POTATO_MAX_PASTE_BYTES",
                ..
            })
        ));
    }

    #[test]
    fn credentials_require_exact_match() {
        let creds = Credentials::new("admin", "hunter2");
        assert!(creds.verify("admin", "hunter2"));
        assert!(!creds.verify("admin", "hunter3"));
        assert!(!creds.verify("Admin", "hunter2"));
        assert!(!creds.verify("admin", "hunter22"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
