//! Zabbix command-line client
//!
//! Thin front end over the library clients. Configuration is read from
//! `CONFIG_PATH` (default `zabbix.toml`) with `ZABBIX__*` environment overrides.
//!
//! ```text
//! zbx version
//! zbx login
//! zbx get <key>...
//! zbx send <host> <key> <value>
//! ```

use anyhow::{bail, Context};
use secrecy::ExposeSecret;
use zabbix_client::{
    agent::AgentClient,
    config::Config,
    observability,
    rpc::ApiClient,
    sender::{Sender, SenderData},
    ZabbixError,
};

const USAGE: &str = "usage: zbx <version | login | get <key>... | send <host> <key> <value>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "zabbix.toml".to_string());
    let config = Config::from_file_with_env(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;

    observability::init_from_config(&config.logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, rest) = match args.split_first() {
        Some((command, rest)) => (command.as_str(), rest),
        None => bail!(USAGE),
    };

    match command {
        "version" => {
            let api = ApiClient::new(config.api)?;
            println!("{}", api.ensure_version().await?);
        }
        "login" => {
            let username = config.api.username.clone().context("api.username is not configured")?;
            let password = config.api.password.clone().context("api.password is not configured")?;

            let mut api = ApiClient::new(config.api)?;
            api.login(&username, password.expose_secret()).await?;
            println!("logged in to {} as {}", api.url(), username);
        }
        "get" => {
            if rest.is_empty() {
                bail!(USAGE);
            }

            let agent = AgentClient::new(config.agent);
            match agent.get_values(rest).await {
                Ok(values) => print_values(rest, &values),
                Err(ZabbixError::Agent(zabbix_client::error::AgentError::KeysFailed { values, failures })) => {
                    print_values(rest, &values);
                    for (key, err) in &failures {
                        eprintln!("{}: {}", key, err);
                    }
                    bail!("{} of {} keys failed", failures.len(), rest.len());
                }
                Err(err) => return Err(err.into()),
            }
        }
        "send" => {
            let (host, key, value) = match rest {
                [host, key, value] => (host, key, value),
                _ => bail!(USAGE),
            };

            let sender = Sender::new(config.sender);
            let response = sender.send(SenderData::new(host, key, value)).await?;
            println!("{}: {}", response.response, response.info);

            if !response.is_success() {
                bail!("server rejected the data");
            }
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

fn print_values(keys: &[String], values: &std::collections::HashMap<String, String>) {
    for key in keys {
        if let Some(value) = values.get(key) {
            println!("{}: {}", key, value);
        }
    }
}
