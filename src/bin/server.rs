use anyhow::Context;
use bookshelf::{
    cli_args::CliArgs,
    config::ServerConfig,
    server::Server,
};
use clap::Parser;

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
            "server=trace,bookshelf=trace,tower_http=trace,sqlx=warn",
        );
    }

    init_tracing()?;

    let args = CliArgs::parse();

    tracing::info!(config_file = %args.config_file, env = ?args.env, "Starting ...");

    let server_config = ServerConfig::from_config_file(&args.config_file)
        .await?
        .with_environment(args.env);

    let server = Server::new(server_config);

    server.run().await?;

    Ok(())
}
