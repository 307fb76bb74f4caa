//! File commands: upload, list, stats, toggle, delete, link, download.

use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use sharedrop_core::error::AppError;
use sharedrop_core::traits::{Notice, NoticeSink};
use sharedrop_core::types::FileId;
use sharedrop_entity::format_file_size;
use sharedrop_service::{ListingService, LocalFile};

use super::{failed, local_file_name};
use crate::context::CliContext;
use crate::output::{self, FileRow, OutputFormat, PrintNotices, StatsRow};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload, processed in order
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// A file ID argument
#[derive(Debug, Args)]
pub struct FileIdArg {
    /// File ID (see `sharedrop list`)
    pub id: String,
}

/// Arguments for the download command
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// File ID (see `sharedrop list`)
    pub id: String,

    /// Where to write the file (defaults to its original name)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Listing loaded for the signed-in user.
async fn loaded_listing(ctx: &CliContext) -> Result<ListingService, AppError> {
    ctx.require_user().await?;
    let listing = ctx.listing();
    if !listing.load().await {
        return Err(failed("Loading files"));
    }
    Ok(listing)
}

/// Upload files one by one.
pub async fn upload(ctx: &CliContext, args: &UploadArgs) -> Result<(), AppError> {
    ctx.session.initialize().await;

    let mut batch = Vec::with_capacity(args.paths.len());
    let mut unreadable = 0usize;
    for path in &args.paths {
        match LocalFile::from_path(path).await {
            Ok(file) => batch.push(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                PrintNotices.notify(Notice::error(format!(
                    "Failed to read {}",
                    path.display()
                )));
                unreadable += 1;
            }
        }
    }

    let report = ctx
        .uploads()
        .upload_batch(batch, |record| {
            output::print_kv(
                "Uploaded",
                &format!("{} ({})", record.id, format_file_size(record.size)),
            );
        })
        .await;

    if report.is_success() && unreadable == 0 {
        Ok(())
    } else {
        Err(failed("Upload"))
    }
}

/// List files newest first.
pub async fn list(ctx: &CliContext, format: OutputFormat) -> Result<(), AppError> {
    let listing = loaded_listing(ctx).await?;
    let rows: Vec<FileRow> = listing.files().await.iter().map(FileRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}

/// Show aggregates over the listing.
pub async fn stats(ctx: &CliContext, format: OutputFormat) -> Result<(), AppError> {
    let listing = loaded_listing(ctx).await?;
    let row = StatsRow::from(listing.stats().await);
    output::print_list(&[row], format);
    Ok(())
}

/// Flip a file between public and private.
pub async fn toggle(ctx: &CliContext, args: &FileIdArg) -> Result<(), AppError> {
    let listing = loaded_listing(ctx).await?;
    listing
        .toggle_visibility(&FileId::new(&args.id))
        .await
        .map(|_| ())
        .ok_or_else(|| failed("Visibility change"))
}

/// Delete a file.
pub async fn delete(ctx: &CliContext, args: &FileIdArg) -> Result<(), AppError> {
    let listing = loaded_listing(ctx).await?;
    if listing.delete(&FileId::new(&args.id)).await {
        Ok(())
    } else {
        Err(failed("Delete"))
    }
}

/// Print the share link of a file.
pub async fn link(ctx: &CliContext, args: &FileIdArg) -> Result<(), AppError> {
    let listing = loaded_listing(ctx).await?;
    listing
        .copy_share_link(&FileId::new(&args.id))
        .await
        .map(|_| ())
        .ok_or_else(|| failed("Copying the share link"))
}

/// Download one of your files, counting the download.
pub async fn download(ctx: &CliContext, args: &DownloadArgs) -> Result<(), AppError> {
    let listing = loaded_listing(ctx).await?;
    let id = FileId::new(&args.id);
    let name = listing
        .get(&id)
        .await
        .map(|f| local_file_name(&f.original_name, &args.id))
        .unwrap_or_else(|| args.id.clone());

    let url = listing
        .download(&id)
        .await
        .ok_or_else(|| failed("Download"))?;

    let path = args.output.clone().unwrap_or(name);
    let size = ctx.save_object(&url, &path).await?;
    output::print_success(&format!("Saved {} ({})", path, format_file_size(size)));
    Ok(())
}
