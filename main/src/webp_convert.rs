//! Standalone utility converting the PNG/JPEG files of a directory to
//! WebP, unrelated to the HTTP service.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::ImageFormat;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn convert_to_webp(source: &Path) -> Result<PathBuf> {
    let destination = source.with_extension("webp");

    let img = image::open(source).with_context(|| format!("opening {}", source.display()))?;
    img.save_with_format(&destination, ImageFormat::WebP)
        .with_context(|| format!("writing {}", destination.display()))?;

    Ok(destination)
}

fn is_convertible(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg")
        })
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let folder = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "images".to_string()),
    );
    if !folder.is_dir() {
        bail!("the folder '{}' does not exist", folder.display());
    }

    for entry in std::fs::read_dir(&folder)
        .with_context(|| format!("listing {}", folder.display()))?
    {
        let path = entry?.path();
        if !is_convertible(&path) {
            continue;
        }

        match convert_to_webp(&path) {
            Ok(destination) => {
                info!(
                    source = %path.display(),
                    destination = %destination.display(),
                    "Converted to WebP"
                );
            }
            Err(err) => {
                error!(source = %path.display(), "Conversion failed: {err:#}");
            }
        }
    }

    Ok(())
}
