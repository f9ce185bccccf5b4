//! zapi - command line access to the Zabbix API
//!
//! # Usage
//!
//! ```bash
//! # Server version, no credentials needed
//! zapi --url http://localhost/zabbix/api_jsonrpc.php version
//!
//! # Any method; logs in first when credentials are given
//! export ZAPI_URL=http://localhost/zabbix/api_jsonrpc.php
//! export ZAPI_USER=Admin ZAPI_PASSWORD=zabbix
//! zapi call host.get '{"output": ["hostid", "host"]}'
//! ```
//!
//! Log output goes to stderr and follows `RUST_LOG`; results go to stdout.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::time::Duration;
use zapi::core::ObservabilityConfig;
use zapi::ZabbixClient;

#[derive(Parser, Debug)]
#[command(author, version, about = "Call the Zabbix JSON-RPC API", long_about = None)]
struct Args {
    /// API endpoint, e.g. http://host/zabbix/api_jsonrpc.php
    #[arg(long, env = "ZAPI_URL")]
    url: String,

    /// User to log in as
    #[arg(long, env = "ZAPI_USER", requires = "password")]
    user: Option<String>,

    /// Password for --user
    #[arg(long, env = "ZAPI_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Accept any TLS certificate
    #[arg(long)]
    insecure: bool,

    /// Keep only one request in flight
    #[arg(long)]
    serialize: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the server's API version
    Version,

    /// Call a method and print its result
    Call {
        /// Method name, e.g. host.get
        method: String,

        /// Params as JSON (defaults to {})
        params: Option<String>,
    },
}

fn parse_params(raw: Option<&str>) -> Result<Value> {
    let params = match raw {
        Some(raw) => serde_json::from_str(raw).context("params are not valid JSON")?,
        None => Value::Object(Default::default()),
    };
    if !(params.is_object() || params.is_array()) {
        bail!("params must be a JSON object or array");
    }
    Ok(params)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    zapi::core::init_observability(
        ObservabilityConfig::new("zapi")
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_log_level(&args.log_level)
            .with_json_logs(args.json_logs),
    )?;

    let mut client = ZabbixClient::builder(&args.url)
        .skip_tls_verify(args.insecure)
        .serialize(args.serialize)
        .timeout(Duration::from_secs(args.timeout))
        .connect()
        .await
        .with_context(|| format!("failed to connect to {}", args.url))?;

    match args.command {
        Command::Version => {
            println!("{} ({})", client.version_string(), client.version());
        }
        Command::Call { method, params } => {
            let params = parse_params(params.as_deref())?;
            tracing::debug!(method = %method, "Calling method");

            let logged_in = match (&args.user, &args.password) {
                (Some(user), Some(password)) => {
                    client.login(user, password).await.context("login failed")?;
                    true
                }
                _ => false,
            };

            let response = client.call_checked(&method, params).await?;
            println!("{}", serde_json::to_string_pretty(&response.result)?);

            if logged_in {
                client.logout().await.context("logout failed")?;
            }
        }
    }

    Ok(())
}
