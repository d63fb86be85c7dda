//! device-grant CLI binary entry point.

use clap::Parser;
use device_grant::cli::auth::{handle_login, handle_logout, EXIT_FAILURE};
use device_grant::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login(args) => handle_login(args.scope.as_deref()).await,
        Commands::Logout(args) => handle_logout(&args.token).await,
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
