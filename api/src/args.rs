use std::time::Duration;

use bitewise_core::domain::common::{BitewiseConfig, FallbackConfig, LLMConfig};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "bitewise-api", about = "Food image health analysis service", version)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub fallback: FallbackArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 5001)]
    pub port: u16,

    /// Prefix mounted in front of every route, e.g. `/api`.
    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    /// Comma separated origins; `*` allows any origin.
    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub gemini_model: String,

    #[arg(
        long = "gemini-base-url",
        env = "GEMINI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub gemini_base_url: String,

    #[arg(long = "vision-timeout-secs", env = "VISION_TIMEOUT_SECS", default_value_t = 30)]
    pub vision_timeout_secs: u64,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FallbackArgs {
    #[arg(
        long = "fallback-enabled",
        env = "FALLBACK_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub enabled: bool,

    #[arg(long = "default-language", env = "DEFAULT_LANGUAGE", default_value = "en")]
    pub default_language: String,

    #[arg(long = "lookup-timeout-secs", env = "LOOKUP_TIMEOUT_SECS", default_value_t = 5)]
    pub lookup_timeout_secs: u64,

    #[arg(
        long = "open-food-facts-base-url",
        env = "OPEN_FOOD_FACTS_BASE_URL",
        default_value = "https://world.openfoodfacts.org"
    )]
    pub open_food_facts_base_url: String,

    #[arg(
        long = "translate-base-url",
        env = "TRANSLATE_BASE_URL",
        default_value = "https://translate.googleapis.com"
    )]
    pub translate_base_url: String,

    #[arg(long = "tesseract-binary", env = "TESSERACT_BINARY", default_value = "tesseract")]
    pub tesseract_binary: String,

    #[arg(long = "ocr-timeout-secs", env = "OCR_TIMEOUT_SECS", default_value_t = 15)]
    pub ocr_timeout_secs: u64,
}

impl From<Args> for BitewiseConfig {
    fn from(args: Args) -> Self {
        Self {
            llm: LLMConfig {
                gemini_api_key: args.llm.gemini_api_key,
                gemini_model: args.llm.gemini_model,
                gemini_base_url: args.llm.gemini_base_url,
                vision_timeout: Duration::from_secs(args.llm.vision_timeout_secs),
            },
            fallback: FallbackConfig {
                enabled: args.fallback.enabled,
                default_language: args.fallback.default_language,
                lookup_timeout: Duration::from_secs(args.fallback.lookup_timeout_secs),
                open_food_facts_base_url: args.fallback.open_food_facts_base_url,
                translate_base_url: args.fallback.translate_base_url,
                tesseract_binary: args.fallback.tesseract_binary,
                ocr_timeout: Duration::from_secs(args.fallback.ocr_timeout_secs),
            },
        }
    }
}
