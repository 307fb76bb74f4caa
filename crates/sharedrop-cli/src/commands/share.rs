//! Open a shared file as an anonymous visitor.

use clap::Args;

use sharedrop_core::error::AppError;
use sharedrop_entity::format_file_size;
use sharedrop_service::ShareState;

use super::{failed, local_file_name};
use crate::context::CliContext;
use crate::output::{self, OutputFormat};

/// Arguments for the share command
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Share token or full share link
    pub reference: String,

    /// Download the file and count the download
    #[arg(short, long)]
    pub download: bool,

    /// Copy the share link
    #[arg(long)]
    pub copy_link: bool,

    /// Where to write a downloaded file (defaults to its original name)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Resolve the share and run the requested actions.
pub async fn execute(
    ctx: &CliContext,
    args: &ShareArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let shares = ctx.shares();
    let mut page = shares.open(&args.reference).await;

    let file = match page.state() {
        ShareState::Found(file) => file.clone(),
        state => {
            let message = state.message().unwrap_or("File not found");
            return Err(match state {
                ShareState::NotFound => AppError::not_found(message),
                _ => AppError::external(message),
            });
        }
    };

    match format {
        OutputFormat::Json => output::print_json(&file),
        OutputFormat::Table => {
            output::print_kv("File", &format!("{} {}", file.kind().icon(), file.original_name));
            output::print_kv("Size", &format_file_size(file.size));
            output::print_kv("Type", &file.mime_type);
            output::print_kv("Uploaded", &output::format_date(&file.created_at));
            output::print_kv("Downloads", &file.download_count.to_string());
            if let Some(preview) = page.preview() {
                output::print_kv("Preview", preview);
            }
        }
    }

    if args.copy_link && !shares.copy_link(&page) {
        return Err(failed("Copying the link"));
    }

    if args.download {
        let url = shares
            .download(&mut page)
            .await
            .ok_or_else(|| failed("Download"))?;
        let path = args.output.clone().unwrap_or_else(|| {
            let fallback = page.token().map(|t| t.as_str()).unwrap_or("download");
            local_file_name(&file.original_name, fallback)
        });
        let size = ctx.save_object(&url, &path).await?;
        output::print_success(&format!("Saved {} ({})", path, format_file_size(size)));
    }

    Ok(())
}
