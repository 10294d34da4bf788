use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment prefix for layered settings, e.g. `SCHOLAR_SERVER__PORT=8000`.
const ENV_PREFIX: &str = "SCHOLAR";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Ollama executable
    #[arg(long, env = "OLLAMA_BIN")]
    pub ollama_bin: Option<String>,

    /// College dataset (JSON)
    #[arg(long, env = "COLLEGES_PATH")]
    pub colleges: Option<PathBuf>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ollama: OllamaConfig,
    pub data: DataConfig,
    pub resilience: ResilienceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory served under `/static` (holds the built wasm controller).
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OllamaConfig {
    pub binary: String,
    /// Model used for the JSON preferences endpoint.
    pub preference_model: String,
    /// Model used for the chat profile form.
    pub profile_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub colleges_path: PathBuf,
    /// Number of complete college records handed to the model.
    pub context_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub request_timeout_secs: u64,
    pub timeout_disabled: bool,
}

impl OllamaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ResilienceConfig {
    /// Request timeout for the HTTP layer. A disabled timeout becomes a
    /// year so the middleware stack keeps a single type.
    pub fn request_timeout(&self) -> Duration {
        if self.timeout_disabled {
            Duration::from_secs(365 * 24 * 60 * 60)
        } else {
            Duration::from_secs(self.request_timeout_secs)
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Priority: CLI flag > CLI env var > `SCHOLAR_*` env > config file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "static")?
            .set_default("ollama.binary", "ollama")?
            .set_default("ollama.preference_model", "kimi-k2:1t-cloud")?
            .set_default("ollama.profile_model", "gemma3:12b")?
            .set_default("ollama.timeout_secs", 120)?
            .set_default("data.colleges_path", "data/colleges.json")?
            .set_default("data.context_limit", 20)?
            .set_default("resilience.request_timeout_secs", 150)?
            .set_default("resilience.timeout_disabled", false)?;

        // Explicit file must exist; ./config.yaml is optional.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::from(Path::new(path))),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(bin) = cli.ollama_bin {
            builder = builder.set_override("ollama.binary", bin)?;
        }
        if let Some(path) = cli.colleges {
            builder = builder
                .set_override("data.colleges_path", path.to_string_lossy().into_owned())?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }

        builder.build()?.try_deserialize()
    }
}
