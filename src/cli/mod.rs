//! CLI entry point for device-grant.

pub mod auth;

use clap::{Parser, Subcommand};

/// Sign in with the OAuth device flow
#[derive(Parser, Debug)]
#[command(name = "device-grant", version, about = "OAuth 2.0 device authorization grant client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and print the issued token as JSON
    Login(LoginArgs),
    /// Revoke a previously issued token
    Logout(LogoutArgs),
}

/// Arguments for `device-grant login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Space-separated scopes to request
    #[arg(long)]
    pub scope: Option<String>,
}

/// Arguments for `device-grant logout`.
#[derive(Parser, Debug)]
pub struct LogoutArgs {
    /// The token to revoke
    pub token: String,
}
