//! Send one request through the harness client and print the outcome.
//!
//! ```sh
//! export RESTCHECK_CONFIG=config/appsettings.json
//! cargo run --bin restcheck-probe -- post /users name="Test User" email=test@test.com
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use restcheck::{logging, ApiClient, ApiSettings, RequestMethod, RequestOptions};

/// restcheck-probe - send a single API request
///
/// Settings come from the JSON settings file (RESTCHECK_CONFIG or
/// config/appsettings.json) with RESTCHECK_* environment overrides applied.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// HTTP method
    #[arg(value_enum, ignore_case = true)]
    method: Method,

    /// Endpoint path, or an absolute URL
    endpoint: String,

    /// Request data as key=value pairs (sent as the JSON body for POST/PUT)
    #[arg(value_name = "KEY=VALUE", value_parser = parse_pair)]
    data: Vec<(String, String)>,

    /// Settings file path
    #[arg(long, short = 'c', env = "RESTCHECK_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Extra request header, as name:value
    #[arg(long = "header", short = 'H', value_name = "NAME:VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for RequestMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => RequestMethod::Get,
            Method::Post => RequestMethod::Post,
            Method::Put => RequestMethod::Put,
            Method::Delete => RequestMethod::Delete,
        }
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME:VALUE, got {raw:?}")),
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<ApiSettings> {
    let settings = match path {
        Some(path) => ApiSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => ApiSettings::load_default().context("failed to load settings")?,
    };
    settings
        .with_env_overrides()
        .context("invalid environment override")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_ref())?;
    logging::init(&settings);

    let client = ApiClient::from_settings(&settings).context("failed to create client")?;
    let options = RequestOptions::new()
        .with_data(cli.data)
        .with_headers(cli.headers);

    let response = client
        .send(cli.method.into(), &cli.endpoint, &options)
        .await;

    if let Some(failure) = response.failure() {
        bail!(
            "request failed after {}ms: {}",
            response.response_time_ms(),
            failure
        );
    }

    println!(
        "{} {} ({}ms)",
        response.status_code(),
        client.url(&cli.endpoint),
        response.response_time_ms()
    );
    for (name, value) in response.headers() {
        println!("{name}: {value}");
    }
    println!();
    match response.json::<serde_json::Value>() {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", response.content()),
    }

    Ok(())
}
