use std::path::PathBuf;

use crate::error::Result;
pub use clap::Parser;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:1234,http://127.0.0.1:5500";

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 1234,
        env = "PORT",
        help = "Port to listen on"
    )]
    pub port: u16,

    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "FLICKS_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "FLICKS_MOVIES_FILE",
        help = "Path to JSON seed dataset loaded at startup, if omitted the collection starts empty"
    )]
    pub movies_file: Option<PathBuf>,

    #[arg(
        long,
        env = "FLICKS_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = DEFAULT_ORIGINS,
        help = "Comma-separated list of exact origins allowed by CORS"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long, env = "FLICKS_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }
}
