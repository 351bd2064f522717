use anyhow::{anyhow, Result};
use is_terminal::IsTerminal;
use oobcrab::{Config, SharedConfig};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let mut first_args = std::env::args().take(2);
    let (program_name, config_file) = (
        first_args.next().unwrap_or("oobcrab".to_string()),
        first_args.next(),
    );

    let config = config_init(&program_name, config_file)?;
    let store = oobcrab::correlation_store::shared();

    if std::io::stdout().is_terminal() {
        println!("{}", oobcrab::crab::CRAB);
    }

    let dns_server = oobcrab::dns::new(config.clone(), store.clone()).await?;
    tracing::info!("DNS listening on UDP {}", dns_server.local_addr()?);
    tracing::info!("answering for \"{}\" with {}", config.domain, config.probe_addr);
    let dns_handle = tokio::spawn(dns_server.block_until_done());

    tracing::info!("HTTP callback listening on {}", &config.http_bind_addr);
    let http_server = oobcrab::api::new(config.clone(), store.clone());
    let http_handle = tokio::spawn(http_server);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("quitting from signal");
        },
        Ok(dns_res) = dns_handle => {
            if let Err(err) = dns_res {
                return Err(err.into())
            }
        }
        Ok(http_res) = http_handle => {
            if let Err(err) = http_res {
                return Err(err.into())
            }
        }
    }
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oobcrab=info".into()),
        )
        .init();
}

fn config_init(program_name: &str, config_file: Option<String>) -> Result<SharedConfig> {
    match config_file {
        None => Err(anyhow!("usage: {program_name} /path/to/config.json")),
        Some(config_file) => {
            let config = Config::try_from_file(&config_file)?;
            tracing::debug!("loaded config from {config_file}");
            Ok(Arc::new(config))
        }
    }
}
