use std::time::Duration;

use anyhow::{anyhow, Result};
use flicks_server::config::{Parser, ServerConfig};
use rand::Rng as _;
use reqwest::Url;
use serde_json::json;
use tempfile::TempDir;
use tracing::debug;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

/// Seed dataset written to a temp file for every test environment.
/// Ids are fixed so tests can address records directly.
pub const SEED_ID_SHAWSHANK: &str = "dcdd0fbf-c279-4054-9faf-c24b71e10e21";
pub const SEED_ID_DARK_KNIGHT: &str = "c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf";
pub const SEED_ID_INCEPTION: &str = "404a22a5-c54f-4dbb-8bc5-77a18b4a83b5";

pub fn seed_movies() -> serde_json::Value {
    json!([
        {
            "id": SEED_ID_SHAWSHANK,
            "title": "The Shawshank Redemption",
            "year": 1994,
            "director": "Frank Darabont",
            "duration": 142,
            "rate": 9.3,
            "poster": "https://i.ebayimg.com/images/g/4goAAOSwMyBe7hnQ/s-l1200.webp",
            "genre": ["Drama"]
        },
        {
            "id": SEED_ID_DARK_KNIGHT,
            "title": "The Dark Knight",
            "year": 2008,
            "director": "Christopher Nolan",
            "duration": 152,
            "rate": 9.0,
            "poster": "https://i.ebayimg.com/images/g/yokAAOSw8w1YARbm/s-l1200.jpg",
            "genre": ["Action", "Crime", "Drama"]
        },
        {
            "id": SEED_ID_INCEPTION,
            "title": "Inception",
            "year": 2010,
            "director": "Christopher Nolan",
            "duration": 148,
            "rate": 8.8,
            "poster": "https://m.media-amazon.com/images/I/91Rc8cAmnAL._AC_UF1000,1000_QL80_.jpg",
            "genre": ["Action", "Adventure", "Sci-Fi"]
        }
    ])
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

fn build_env(test_name: &str, with_seed: bool, no_cors: bool) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix(format!("{}_", test_name))?;
    let port = random_port()?.to_string();

    let mut args = vec!["flicks-e2e-tests".to_string(), "--port".to_string(), port];
    if with_seed {
        let movies_file = tmp_data_dir.path().join("movies.json");
        std::fs::write(&movies_file, serde_json::to_vec_pretty(&seed_movies())?)?;
        args.push("--movies-file".to_string());
        args.push(movies_file.to_string_lossy().to_string());
    }
    if no_cors {
        args.push("--no-cors".to_string());
    }

    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

pub fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    build_env(test_name, true, false)
}

/// No `--movies-file`, the server starts with an empty collection.
pub fn prepare_env_without_seed(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    build_env(test_name, false, false)
}

/// Seeded, but with `--no-cors` so origin checks are off.
pub fn prepare_env_no_cors(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    build_env(test_name, true, true)
}

pub struct ServerGuard {
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

pub fn base_url(args: &ServerConfig) -> Result<Url> {
    Ok(format!("http://127.0.0.1:{}/", args.port).parse()?)
}

/// Boots the real server on the configured port and waits until it answers
/// health checks.
pub async fn launch_env(args: ServerConfig) -> Result<(reqwest::Client, Url, ServerGuard)> {
    let url = base_url(&args)?;
    let state = flicks_server::build_state(&args).await?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(flicks_server::run_graceful_with_state(
        args,
        state,
        async move {
            let _ = shutdown_rx.await;
        },
    ));

    let client = reqwest::Client::new();
    let health_url = url.join("health")?;
    let mut retries = 50;
    loop {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => break,
            _ if retries == 0 => return Err(anyhow!("Server did not become ready")),
            _ => {
                retries -= 1;
                debug!("Waiting for server to become ready");
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }

    Ok((
        client,
        url,
        ServerGuard {
            shutdown: Some(shutdown_tx),
        },
    ))
}
