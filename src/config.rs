use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_CITY: &str = "Kuningan";

#[derive(Debug, Parser)]
#[command(name = "skm_report", about = "Survei Kepuasan Masyarakat report builder")]
pub struct Cli {
    /// Directory holding the workbook sheets as CSV files.
    #[arg(long, default_value = ".")]
    pub input: PathBuf,

    /// Directory the report, dataset and template files are written to.
    #[arg(long, default_value = ".")]
    pub output: PathBuf,

    /// API key for the narrative service.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Place name printed above the signature.
    #[arg(long, default_value = DEFAULT_CITY)]
    pub city: String,

    /// HTTP timeout for the narrative request, in seconds.
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub city: String,
    pub timeout: Duration,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input_dir: cli.input,
            output_dir: cli.output,
            // An empty key is the same as none.
            api_key: cli.api_key.filter(|k| !k.trim().is_empty()),
            model: cli.model,
            city: cli.city,
            timeout: Duration::from_secs(cli.timeout_secs),
        }
    }
}

impl AppConfig {
    pub fn from_args() -> Self {
        Cli::parse().into()
    }
}
