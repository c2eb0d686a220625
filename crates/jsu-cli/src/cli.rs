use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "jsu",
    version,
    about = "Chunked uploads, request fingerprints and client sniffing",
    after_help = "\
Configuration layers, later ones winning:
  1. built-in defaults
  2. --config <path>             (TOML, skipped when missing)
  3. JSU_<SECTION>__<KEY>        (e.g. JSU_UPLOAD__MAX_RETRY=5)"
)]
pub(crate) struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Upload a file in sequential chunks
    Upload {
        /// File to upload
        file: PathBuf,

        /// Endpoint receiving each chunk
        #[arg(long)]
        upload_url: String,

        /// Endpoint finalizing the upload
        #[arg(long)]
        complete_url: String,

        /// Chunk size in bytes (overrides config)
        #[arg(long)]
        chunk_size: Option<u64>,

        /// Retries per step before giving up (overrides config)
        #[arg(long)]
        max_retry: Option<u32>,

        /// Pause between retries in milliseconds (overrides config)
        #[arg(long)]
        retry_delay_ms: Option<u64>,

        /// Double the pause after each retry, up to this many milliseconds (overrides config)
        #[arg(long)]
        max_retry_delay_ms: Option<u64>,

        /// Inserted before the file extension of the uploaded name
        #[arg(long)]
        suffix: Option<String>,

        /// Extra form field sent with every call (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Extra header sent with every call (repeatable)
        #[arg(long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },

    /// Print the duplicate-suppression key of a request
    Fingerprint {
        /// HTTP method
        method: String,

        /// Request URL, cache-buster included or not
        url: String,

        /// JSON body
        #[arg(long)]
        json: Option<String>,

        /// Request header (repeatable)
        #[arg(long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },

    /// Describe the client behind a user-agent string
    Agent {
        /// User-agent string
        user_agent: String,
    },

    /// GET a URL periodically and print each status
    Poll {
        /// URL to poll
        url: String,

        /// Pause between the end of one request and the next, in milliseconds (overrides config)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Stop after this many requests
        #[arg(long)]
        count: Option<u32>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> { split_pair(raw, '=') }

fn parse_header(raw: &str) -> Result<(String, String), String> { split_pair(raw, ':') }

fn split_pair(raw: &str, separator: char) -> Result<(String, String), String> {
    match raw.split_once(separator) {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.trim().to_string())),
        _ => Err(format!("expected NAME{separator}VALUE, got '{raw}'")),
    }
}
