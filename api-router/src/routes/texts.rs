use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use common::{
    error::AppError,
    storage::images,
    storage::types::texto::{Texto, TextoData},
};
use serde_json::json;
use tempfile::NamedTempFile;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

/// Multipart creation form. Every text field is required; the image part
/// is optional and never round-trips through the JSON validation type.
#[derive(Debug, TryFromMultipart)]
pub struct TextoForm {
    pub titulo: String,
    pub autor: String,
    pub descripcion: String,
    pub contenido: String,
    pub region: String,
    pub categoria_id: i64,
    #[form_data(limit = "10000000")]
    pub imagen: Option<FieldData<NamedTempFile>>,
}

pub async fn create_text(
    State(state): State<ApiState>,
    TypedMultipart(form): TypedMultipart<TextoForm>,
) -> Result<impl IntoResponse, ApiError> {
    let image_url = match form.imagen {
        Some(file) => Some(
            images::store_upload(file, std::path::Path::new(&state.config.data_dir))
                .await
                .map_err(AppError::from)?,
        ),
        None => None,
    };

    let data = TextoData {
        titulo: form.titulo,
        autor: form.autor,
        descripcion: form.descripcion,
        contenido: form.contenido,
        region: form.region,
        categoria_id: form.categoria_id,
    };

    let texto = Texto::create(data, image_url, &state.db).await?;
    info!(
        id = texto.id,
        categoria_id = texto.categoria_id,
        has_image = texto.image_url.is_some(),
        "Created texto"
    );

    Ok((StatusCode::CREATED, Json(texto)))
}

pub async fn list_texts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let textos = Texto::list_with_categoria(&state.db).await?;

    Ok(Json(textos))
}

pub async fn get_text(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let texto = Texto::get_with_categoria(id, &state.db).await?;

    Ok(Json(texto))
}

pub async fn update_text(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(data): Json<TextoData>,
) -> Result<impl IntoResponse, ApiError> {
    let texto = Texto::update(id, data, &state.db).await?;
    info!(id = texto.id, "Updated texto");

    Ok(Json(texto))
}

pub async fn delete_text(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Texto::delete(id, &state.db).await?;
    info!(id, "Deleted texto");

    Ok(Json(json!({ "status": "deleted", "id": id })))
}

pub async fn list_texts_by_category(
    State(state): State<ApiState>,
    Path(categoria_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let textos = Texto::list_by_categoria(categoria_id, &state.db).await?;

    Ok(Json(textos))
}
