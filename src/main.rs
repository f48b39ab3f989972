mod tracing_setup;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;

use appo::{
    cli::{CheckConfigArgs, Cli, Commands, ServeArgs},
    config::{AppoConfig, IdValidators},
    server,
    service::AppInstanceInfoService,
    store::InstanceInfoStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => serve_command(args).await?,
        Commands::CheckConfig(args) => check_config_command(args)?,
    }
    Ok(())
}

async fn serve_command(args: ServeArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let _log_guard = tracing_setup::init(args.verbose, args.log_json, Some("server"));

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .context("Invalid bind/port combination for serve command")?;

    let validators = IdValidators::from_config(&config.validation)?;
    let store = InstanceInfoStore::open(args.data_dir)?;
    let service: Arc<dyn AppInstanceInfoService> = Arc::new(store);

    println!("Serving appo API on http://{addr}");
    server::run(addr, service, validators).await
}

fn check_config_command(args: CheckConfigArgs) -> Result<()> {
    let config = AppoConfig::from_path(&args.config)?;
    IdValidators::from_config(&config.validation)?;
    println!("Configuration {} is valid.", args.config.display());
    println!("  bind: {}:{}", config.server.bind, config.server.port);
    println!("  tenant id pattern: {}", config.validation.tenant_id_pattern);
    println!(
        "  app instance id pattern: {}",
        config.validation.app_instance_id_pattern
    );
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<AppoConfig> {
    match path {
        Some(p) => AppoConfig::from_path(p),
        None => Ok(AppoConfig::default()),
    }
}
