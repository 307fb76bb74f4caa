//! CLI command definitions and dispatch.

pub mod account;
pub mod config;
pub mod files;
pub mod share;

use std::path::Path;

use clap::{Parser, Subcommand};

use sharedrop_core::config::AppConfig;
use sharedrop_core::error::AppError;

use crate::context::CliContext;
use crate::output::OutputFormat;

/// ShareDrop: upload files and share them by link
#[derive(Debug, Parser)]
#[command(name = "sharedrop", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/sharedrop.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Signup(account::CredentialArgs),
    /// Sign in with email and password
    Login(account::CredentialArgs),
    /// Sign out and forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show or update your profile
    Profile(account::ProfileArgs),
    /// Upload one or more files
    Upload(files::UploadArgs),
    /// List your files, newest first
    List,
    /// Show file count, storage used, and downloads
    Stats,
    /// Make a file public or private
    Toggle(files::FileIdArg),
    /// Delete a file
    Delete(files::FileIdArg),
    /// Copy the share link of a file
    Link(files::FileIdArg),
    /// Download one of your files
    Download(files::DownloadArgs),
    /// Open a shared file by token or link
    Share(share::ShareArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, app_config: AppConfig) -> Result<(), AppError> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, &app_config, self.format);
        }

        let ctx = CliContext::open(app_config).await?;
        match &self.command {
            Commands::Signup(args) => account::signup(&ctx, args).await,
            Commands::Login(args) => account::login(&ctx, args).await,
            Commands::Logout => account::logout(&ctx).await,
            Commands::Whoami => account::whoami(&ctx, self.format).await,
            Commands::Profile(args) => account::profile(&ctx, args, self.format).await,
            Commands::Upload(args) => files::upload(&ctx, args).await,
            Commands::List => files::list(&ctx, self.format).await,
            Commands::Stats => files::stats(&ctx, self.format).await,
            Commands::Toggle(args) => files::toggle(&ctx, args).await,
            Commands::Delete(args) => files::delete(&ctx, args).await,
            Commands::Link(args) => files::link(&ctx, args).await,
            Commands::Download(args) => files::download(&ctx, args).await,
            Commands::Share(args) => share::execute(&ctx, args, self.format).await,
            Commands::Config(_) => Ok(()),
        }
    }
}

/// The flow already reported the failure as a notice; exit non-zero.
fn failed(action: &str) -> AppError {
    AppError::external(format!("{action} did not complete"))
}

/// Default local path for a downloaded file: the final component of the
/// stored name, or `fallback` when the name has none.
fn local_file_name(name: &str, fallback: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_file_name_strips_directories() {
        assert_eq!(local_file_name("report.pdf", "id"), "report.pdf");
        assert_eq!(local_file_name("../../.bashrc", "id"), ".bashrc");
        assert_eq!(local_file_name("/etc/passwd", "id"), "passwd");
        assert_eq!(local_file_name("nested/dir/photo.png", "id"), "photo.png");
    }

    #[test]
    fn test_local_file_name_falls_back() {
        assert_eq!(local_file_name("..", "tok123"), "tok123");
        assert_eq!(local_file_name("", "tok123"), "tok123");
        assert_eq!(local_file_name("/", "tok123"), "tok123");
    }

    #[test]
    fn test_parse_share_with_flags() {
        let cli = Cli::try_parse_from([
            "sharedrop",
            "--format",
            "json",
            "share",
            "https://drop.example.com/share/abc",
            "--download",
            "--copy-link",
        ])
        .expect("parse");
        assert_eq!(cli.format, OutputFormat::Json);
        let Commands::Share(args) = cli.command else {
            panic!("expected share command");
        };
        assert!(args.download);
        assert!(args.copy_link);
        assert_eq!(args.reference, "https://drop.example.com/share/abc");
    }

    #[test]
    fn test_parse_upload_requires_paths() {
        assert!(Cli::try_parse_from(["sharedrop", "upload"]).is_err());
        let cli = Cli::try_parse_from(["sharedrop", "upload", "a.txt", "b.txt"]).expect("parse");
        let Commands::Upload(args) = cli.command else {
            panic!("expected upload command");
        };
        assert_eq!(args.paths.len(), 2);
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["sharedrop", "whoami"]).expect("parse");
        assert_eq!(cli.config, "config/sharedrop.toml");
        assert_eq!(cli.format, OutputFormat::Table);
    }
}
