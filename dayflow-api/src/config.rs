//! Command-line and environment configuration for dayflow-api
//!
//! Secrets come from flags or their environment variables; the optional
//! TOML file (see [`dayflow_common::config`]) only tunes models and logging.

use clap::Parser;
use dayflow_common::config::is_valid_key;
use dayflow_common::{Error, Result};
use std::path::PathBuf;

/// Command-line arguments for dayflow-api
#[derive(Parser, Debug, Clone)]
#[command(name = "dayflow-api")]
#[command(about = "Dayflow scheduling backend")]
#[command(version)]
pub struct Args {
    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: String,

    /// Supabase anon key, used to verify user tokens
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_anon_key: String,

    /// Supabase service key, used for event storage
    #[arg(long, env = "SUPABASE_SERVICE_KEY", hide_env_values = true)]
    pub supabase_service_key: String,

    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: String,

    /// Gemini API key; the pro and image parsers are disabled without it
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "PORT")]
    pub port: u16,

    /// Allowed CORS origin(s), comma separated, or `*`
    #[arg(long, default_value = "*", env = "CORS_ORIGIN")]
    pub cors_origin: String,

    /// Deployment environment; `development` exposes error details
    #[arg(long, default_value = "development", env = "NODE_ENV")]
    pub environment: String,

    /// TOML config file (defaults to the per-user config if present)
    #[arg(long, env = "DAYFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store events in a local SQLite file instead of Supabase
    #[arg(long, env = "DAYFLOW_LOCAL_DB")]
    pub local_db: Option<PathBuf>,
}

/// Validated startup settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: String,
    pub groq_api_key: String,
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub cors_origin: String,
    pub environment: String,
    pub config: Option<PathBuf>,
    pub local_db: Option<PathBuf>,
}

impl Settings {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

impl TryFrom<Args> for Settings {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self> {
        for (name, value) in [
            ("SUPABASE_URL", &args.supabase_url),
            ("SUPABASE_ANON_KEY", &args.supabase_anon_key),
            ("SUPABASE_SERVICE_KEY", &args.supabase_service_key),
            ("GROQ_API_KEY", &args.groq_api_key),
        ] {
            if !is_valid_key(value) {
                return Err(Error::Config(format!("{} must not be blank", name)));
            }
        }

        let supabase_url = args.supabase_url.trim().trim_end_matches('/').to_string();
        if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "SUPABASE_URL must be an http(s) URL, got '{}'",
                supabase_url
            )));
        }

        Ok(Self {
            supabase_url,
            supabase_anon_key: args.supabase_anon_key.trim().to_string(),
            supabase_service_key: args.supabase_service_key.trim().to_string(),
            groq_api_key: args.groq_api_key.trim().to_string(),
            gemini_api_key: args
                .gemini_api_key
                .map(|key| key.trim().to_string())
                .filter(|key| is_valid_key(key)),
            port: args.port,
            cors_origin: args.cors_origin,
            environment: args.environment,
            config: args.config,
            local_db: args.local_db,
        })
    }
}
