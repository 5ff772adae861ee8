use axum_typed_multipart::FieldData;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("File name missing in metadata")]
    MissingFileName,

    #[error("File name '{0}' has no usable extension")]
    MissingExtension(String),

    #[error("IO error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist file: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

/// Subdirectory of the data dir where uploads land.
pub const IMAGES_SUBDIR: &str = "images";
/// URL prefix under which the data dir is served.
pub const PUBLIC_PREFIX: &str = "/static/images";

/// Persists an uploaded image under `{data_dir}/images/` with a fresh
/// uuid-based name that keeps the original extension, and returns the
/// public path to store as the texto's `image_url`.
pub async fn store_upload(
    field_data: FieldData<NamedTempFile>,
    data_dir: &Path,
) -> Result<String, ImageError> {
    let file_name = field_data
        .metadata
        .file_name
        .ok_or(ImageError::MissingFileName)?;

    persist_temp_file(field_data.contents, &file_name, data_dir).await
}

async fn persist_temp_file(
    file: NamedTempFile,
    file_name: &str,
    data_dir: &Path,
) -> Result<String, ImageError> {
    let extension = sanitize_extension(file_name)?;
    let unique_name = format!("{}.{extension}", Uuid::new_v4());

    let target_dir = data_dir.join(IMAGES_SUBDIR);
    tokio::fs::create_dir_all(&target_dir)
        .await
        .map_err(ImageError::Io)?;

    let final_path = target_dir.join(&unique_name);
    file.persist(&final_path)?;
    info!("Persisted upload to {:?}", final_path);

    Ok(format!("{PUBLIC_PREFIX}/{unique_name}"))
}

/// Keeps only ascii-alphanumeric characters of the extension, lowercased.
/// Anything else (including a missing extension) is rejected.
fn sanitize_extension(file_name: &str) -> Result<String, ImageError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| ImageError::MissingExtension(file_name.to_string()))?;

    let sanitized: String = extension
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .flat_map(char::to_lowercase)
        .collect();

    if sanitized.is_empty() {
        return Err(ImageError::MissingExtension(file_name.to_string()));
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_extension() {
        assert_eq!(sanitize_extension("foto.PNG").expect("valid"), "png");
        assert_eq!(sanitize_extension("el sol.jpeg").expect("valid"), "jpeg");
        assert!(matches!(
            sanitize_extension("sin_extension"),
            Err(ImageError::MissingExtension(_))
        ));
        assert!(matches!(
            sanitize_extension("raro.???"),
            Err(ImageError::MissingExtension(_))
        ));
    }

    #[tokio::test]
    async fn test_persist_temp_file_moves_upload_under_images_dir() {
        let data_dir = tempfile::tempdir().expect("tempdir");
        let mut upload = NamedTempFile::new().expect("tempfile");
        upload.write_all(b"not really a png").expect("write");

        let url = persist_temp_file(upload, "foto.png", data_dir.path())
            .await
            .expect("persist");

        assert!(url.starts_with("/static/images/"));
        assert!(url.ends_with(".png"));

        let file_name = url.rsplit('/').next().expect("file name");
        let on_disk = data_dir.path().join(IMAGES_SUBDIR).join(file_name);
        let contents = tokio::fs::read(&on_disk).await.expect("read persisted");
        assert_eq!(contents, b"not really a png");
    }

    #[tokio::test]
    async fn test_persist_temp_file_names_are_unique() {
        let data_dir = tempfile::tempdir().expect("tempdir");

        let first = persist_temp_file(
            NamedTempFile::new().expect("tempfile"),
            "igual.jpg",
            data_dir.path(),
        )
        .await
        .expect("persist first");
        let second = persist_temp_file(
            NamedTempFile::new().expect("tempfile"),
            "igual.jpg",
            data_dir.path(),
        )
        .await
        .expect("persist second");

        assert_ne!(first, second);
    }
}
