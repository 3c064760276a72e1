use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use super::args::Cli;
use super::error::{AppError, AppResult};
use crate::common::metadata::ECLevel;

pub static DEFAULT_URL: &str = "https://github.com/kaw393939";
pub static DEFAULT_OUTPUT_DIR: &str = "qr_codes";
pub static DEFAULT_LOG_DIR: &str = "logs";
pub static DEFAULT_BOX_SIZE: u32 = 10;
pub static DEFAULT_BORDER: u32 = 4;

// Environment
//------------------------------------------------------------------------------

/// Variables from an optional `.env` file with the process environment layered on top.
/// Loading never modifies the process environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn load(dotenv_path: &Path) -> AppResult<Self> {
        let mut vars = HashMap::new();

        match dotenvy::from_path_iter(dotenv_path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) = item.map_err(|e| {
                        AppError::Config(format!("malformed {}: {e}", dotenv_path.display()))
                    })?;
                    vars.insert(key, value);
                }
                debug!(path = %dotenv_path.display(), count = vars.len(), "Loaded dotenv file");
            }
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(AppError::Config(format!(
                    "failed to read {}: {e}",
                    dotenv_path.display()
                )))
            }
        }

        // Non unicode variables can't hold any of our settings
        let process_vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        vars.extend(process_vars);

        Ok(Self { vars })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(self.get("LOG_DIR").unwrap_or(DEFAULT_LOG_DIR))
    }
}

#[cfg(test)]
mod environment_tests {
    use std::fs;

    use super::Environment;
    use crate::cli::error::AppError;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("urlqr-env-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(".env");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("urlqr-env-does-not-exist/.env");
        assert!(Environment::load(&path).is_ok());
    }

    #[test]
    fn test_reads_file() {
        let path = temp_file(
            "reads",
            "URLQR_TEST_ONLY_URL=https://from.file\n# comment\nURLQR_TEST_ONLY_BORDER=\"2\"\n",
        );
        let env = Environment::load(&path).unwrap();
        assert_eq!(env.get("URLQR_TEST_ONLY_URL"), Some("https://from.file"));
        assert_eq!(env.get("URLQR_TEST_ONLY_BORDER"), Some("2"));
        assert_eq!(std::env::var("URLQR_TEST_ONLY_URL").ok(), None);
    }

    #[test]
    fn test_process_env_wins() {
        let path = temp_file("wins", "PATH=/from/dotenv\n");
        let env = Environment::load(&path).unwrap();
        assert_eq!(env.get("PATH").map(str::to_string), std::env::var("PATH").ok());
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_file("malformed", "URLQR_OK=1\nthis line is not valid\n");
        let err = Environment::load(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_log_dir() {
        assert_eq!(Environment::default().log_dir(), std::path::PathBuf::from("logs"));
        let env = Environment::from_pairs([("LOG_DIR", "var/log")]);
        assert_eq!(env.log_dir(), std::path::PathBuf::from("var/log"));
    }
}

// Run configuration
//------------------------------------------------------------------------------

/// Settings for a single run. Flags win over environment variables, which win over
/// built-in defaults. The log directory is not part of it: logging starts before flags are
/// parsed and reads `LOG_DIR` straight from the [`Environment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub url: String,
    pub output_dir: PathBuf,
    pub filename: Option<String>,
    pub box_size: u32,
    pub border: u32,
    pub ec_level: ECLevel,
    pub silent: bool,
}

impl RunConfig {
    pub fn resolve(cli: &Cli, env: &Environment) -> AppResult<Self> {
        let url = cli.url.clone().or_else(|| env.get("DEFAULT_URL").map(str::to_string));
        // Blank names count as unset so the next source gets a chance
        let filename = [cli.filename.as_deref(), env.get("FILENAME")]
            .into_iter()
            .flatten()
            .find(|f| !f.trim().is_empty())
            .map(str::to_string);

        let config = Self {
            url: url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            output_dir: PathBuf::from(env.get("OUTPUT_DIR").unwrap_or(DEFAULT_OUTPUT_DIR)),
            filename,
            box_size: resolve_setting(cli.box_size, env, "QR_BOX_SIZE", DEFAULT_BOX_SIZE)?,
            border: resolve_setting(cli.border, env, "QR_BORDER", DEFAULT_BORDER)?,
            ec_level: resolve_ec_level(cli.ec_level.as_deref(), env)?,
            silent: cli.silent,
        };
        debug!(?config, "Resolved run configuration");
        Ok(config)
    }
}

fn resolve_setting<T>(flag: Option<T>, env: &Environment, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
{
    if let Some(value) = flag {
        return Ok(value);
    }
    match env.get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::Config(format!("{key} must be an unsigned integer, got {raw:?}"))
        }),
        None => Ok(default),
    }
}

fn resolve_ec_level(flag: Option<&str>, env: &Environment) -> AppResult<ECLevel> {
    let (source, raw) = match flag {
        Some(raw) => ("--ec-level", raw),
        None => match env.get("QR_ERROR_CORRECTION") {
            Some(raw) => ("QR_ERROR_CORRECTION", raw),
            None => return Ok(ECLevel::default()),
        },
    };
    raw.parse()
        .map_err(|_| AppError::Config(format!("{source} must be one of L, M, Q or H, got {raw:?}")))
}
