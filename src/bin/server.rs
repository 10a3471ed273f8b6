use anyhow::Context;
use clap::Parser;
use the_bookshelf::{
    cli_args::CliArgs,
    server::{Server, ServerConfig},
};

fn init_tracing() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish(),
    )
    .context("Failed to set global tracing subscriber")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var(
            "RUST_LOG",
            "server=trace,the_bookshelf=trace,tower_http=trace",
        );
    }

    init_tracing()?;

    let cli_args = CliArgs::parse();

    tracing::info!(?cli_args, "Starting ...");

    let server_config = ServerConfig::from_config_file(&cli_args.config_file)
        .await
        .with_context(|| format!("Failed to load config from {}", cli_args.config_file))?
        .with_api_keys(cli_args.catalog_api_key, cli_args.generation_api_key);

    tracing::debug!(?server_config, "Loaded config");

    let server = Server::new(server_config);

    server.run().await?;

    Ok(())
}
