use std::path::PathBuf;
use std::str::FromStr;

/// Which schema and route set this deployment serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Clients, drivers, vehicles and trips.
    Fleet,
    /// Clients with document uploads and drop-off addresses.
    Intake,
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fleet" | "a" => Ok(Variant::Fleet),
            "intake" | "b" => Ok(Variant::Intake),
            other => anyhow::bail!("NEMT_VARIANT must be 'fleet' or 'intake', got '{}'", other),
        }
    }
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Fleet => "fleet",
            Variant::Intake => "intake",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub variant: Variant,
    pub static_dir: PathBuf,
    pub enforce_foreign_keys: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://nemt.db".to_string())
                .trim()
                .to_string(),
            host: std::env::var("HOST")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            variant: std::env::var("NEMT_VARIANT")
                .unwrap_or_else(|_| "fleet".to_string())
                .parse()?,
            static_dir: std::env::var("STATIC_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            enforce_foreign_keys: std::env::var("ENFORCE_FOREIGN_KEYS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        };

        config.validate()?;

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Database URL: {}", config.database_url);
        tracing::debug!("Variant: {}", config.variant.as_str());
        tracing::debug!("Static dir: {}", config.static_dir.display());
        tracing::debug!("Foreign keys enforced: {}", config.enforce_foreign_keys);

        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.database_url.is_empty() {
            anyhow::bail!("DATABASE_URL cannot be empty");
        }
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!("DATABASE_URL must start with sqlite:");
        }
        Ok(())
    }

    /// Directory uploaded client documents are written to.
    pub fn uploads_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
