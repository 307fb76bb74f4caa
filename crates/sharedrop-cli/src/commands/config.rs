//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use sharedrop_core::config::AppConfig;
use sharedrop_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.backend.anon_key = shown.backend.anon_key.as_deref().map(mask_key);

            match format {
                OutputFormat::Json => output::print_json(&shown),
                OutputFormat::Table => {
                    output::print_kv("Backend", &format!("{:?}", shown.backend.provider));
                    output::print_kv("Base URL", &shown.backend.base_url);
                    output::print_kv("Anon key", shown.backend.anon_key.as_deref().unwrap_or("-"));
                    output::print_kv("Bucket", &shown.backend.bucket);
                    output::print_kv("Collection", &shown.backend.files_collection);
                    output::print_kv(
                        "Max upload",
                        &format!("{} bytes", shown.upload.max_upload_size_bytes),
                    );
                    output::print_kv("Public origin", &shown.share.public_origin);
                    output::print_kv("Require public", &shown.share.require_public.to_string());
                    output::print_kv("Session file", &shown.session.file);
                    output::print_kv("Log level", &shown.logging.level);
                }
            }
        }
    }

    Ok(())
}

/// Keep the first four characters of a key for recognition.
fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abcdef123456"), "abcd****");
        assert_eq!(mask_key("ab"), "ab****");
    }
}
