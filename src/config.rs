use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use crate::{errors::AppError, models::Variant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    JsonFile,
    Sqlite,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "file" => Ok(Backend::JsonFile),
            "sqlite" | "sql" => Ok(Backend::Sqlite),
            other => Err(format!("Unknown backend '{other}', expected json or sqlite")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub variant: Variant,
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub database_url: Option<String>,
    pub port: u16,
    pub allowed_origins: Option<Vec<String>>,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let variant: Variant = parse_or("REVIEW_VARIANT", Variant::Review)?;
        let backend: Backend = parse_or("STORE_BACKEND", Backend::JsonFile)?;
        let port: u16 = parse_or("PORT", variant.default_port())?;

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let allowed_origins = env::var("ALLOWED_ORIGINS").ok().map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        });

        let catalog_path = env::var("SUBJECT_CATALOG")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            variant,
            backend,
            data_dir,
            database_url,
            port,
            allowed_origins,
            catalog_path,
        })
    }

    pub fn json_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", self.variant.collection()))
    }

    pub fn sqlite_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(|| {
            let path = self
                .data_dir
                .join(format!("{}.db", self.variant.collection()));
            format!("sqlite://{}", path.display())
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::EnvError(format!("Invalid {key} value '{raw}': {e}"))),
        _ => Ok(default),
    }
}
