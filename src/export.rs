//! PNG export of the rendered annotation surface.
//!
//! The compositor hands over a transparent ARGB32 surface; this module owns
//! the genuinely fallible part of the pipeline: PNG encoding and writing the
//! file under a timestamped name.

use chrono::Local;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while exporting an annotation image.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to render export surface: {0}")]
    Surface(#[from] cairo::Error),

    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] cairo::IoError),

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for export file naming.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory exported images are written to.
    pub directory: PathBuf,
    /// Filename template (supports chrono format specifiers).
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("Overmark"),
            filename_template: "annotation_%Y-%m-%d_%H%M%S".to_string(),
        }
    }
}

/// Generate a filename based on the template and current time.
///
/// # Arguments
/// * `template` - Template string with chrono format specifiers
///
/// # Returns
/// Generated filename with a `.png` extension
pub fn generate_filename(template: &str) -> String {
    let now = Local::now();
    format!("{}.png", now.format(template))
}

/// Ensure the export directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    // Canonicalize to resolve relative paths
    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Writes the rendered surface as a PNG into the configured directory.
///
/// # Returns
/// Path to the written file
pub fn export_png(
    surface: &cairo::ImageSurface,
    config: &ExportConfig,
) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&config.directory)?;

    let filename = generate_filename(&config.filename_template);
    let file_path = directory.join(&filename);

    write_png(surface, &file_path)?;

    info!("Annotation exported to {}", file_path.display());
    Ok(file_path)
}

/// Writes the surface as a PNG to an explicit path.
pub fn write_png(surface: &cairo::ImageSurface, path: &Path) -> Result<(), ExportError> {
    let mut file = fs::File::create(path)?;
    surface.write_to_png(&mut file)?;
    Ok(())
}
