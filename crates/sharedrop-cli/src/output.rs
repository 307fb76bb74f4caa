//! Table and JSON output formatting for CLI commands.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{Table, Tabled};

use sharedrop_core::traits::{Clipboard, Notice, NoticeLevel, NoticeSink};
use sharedrop_core::result::AppResult;
use sharedrop_entity::{FileRecord, format_file_size};
use sharedrop_service::FileStats;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// File display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct FileRow {
    /// Record ID
    id: String,
    /// Name as uploaded
    name: String,
    /// Human-readable size
    size: String,
    /// Content type
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    mime_type: String,
    /// Public or private
    visibility: String,
    /// Download counter
    downloads: u64,
    /// Upload time
    uploaded: String,
}

impl From<&FileRecord> for FileRow {
    fn from(file: &FileRecord) -> Self {
        Self {
            id: file.id.to_string(),
            name: format!("{} {}", file.kind().icon(), file.original_name),
            size: format_file_size(file.size),
            mime_type: file.mime_type.clone(),
            visibility: file.visibility_label().to_string(),
            downloads: file.download_count,
            uploaded: format_date(&file.created_at),
        }
    }
}

/// Aggregate display row
#[derive(Debug, Serialize, Tabled)]
pub struct StatsRow {
    /// Number of files
    files: u64,
    /// Total storage used
    storage: String,
    /// Total downloads
    downloads: u64,
}

impl From<FileStats> for StatsRow {
    fn from(stats: FileStats) -> Self {
        Self {
            files: stats.total_files,
            storage: format_file_size(stats.total_size),
            downloads: stats.total_downloads,
        }
    }
}

/// Short local date used in listings.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %H:%M").to_string()
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No files uploaded yet.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a single item as JSON
pub fn print_json<T: Serialize>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
    println!("{}", json);
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", key), value);
}

/// Prints notices as they arrive.
#[derive(Debug, Default)]
pub struct PrintNotices;

impl NoticeSink for PrintNotices {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => print_success(&notice.message),
            NoticeLevel::Error => print_error(&notice.message),
            NoticeLevel::Info => println!("  {}", notice.message),
        }
    }
}

/// Terminal "clipboard": copied text is printed for the user to pick up.
#[derive(Debug, Default)]
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&self, text: &str) -> AppResult<()> {
        println!("{}", text);
        Ok(())
    }
}
