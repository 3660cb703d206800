//! File upload command.

use std::path::PathBuf;

use clap::Args;

use irbana_client::{ApiClient, UploadMetadata, Uploader};
use irbana_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for upload
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Construction site ID
    #[arg(long)]
    pub obra: String,
    /// Local file path
    pub file: PathBuf,
    /// Category
    #[arg(long)]
    pub categoria: Option<String>,
    /// Description
    #[arg(long)]
    pub descricao: Option<String>,
}

/// Execute upload
pub async fn execute(
    args: &UploadArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let metadata = UploadMetadata {
        categoria: args.categoria.clone(),
        descricao: args.descricao.clone(),
    };
    let uploaded = Uploader::new(client.clone())
        .upload_path(&args.obra, &args.file, metadata)
        .await?;

    match format {
        OutputFormat::Json => output::print_item(&uploaded, format),
        OutputFormat::Table => {
            output::print_success(&format!("Uploaded '{}'", args.file.display()));
            if let Some(url) = &uploaded.url {
                output::print_kv("URL", url);
            }
        }
    }
    Ok(())
}
