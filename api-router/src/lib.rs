use api_state::ApiState;
use axum::{
    extract::FromRef,
    routing::{delete, get, post},
    Router,
};
use routes::{
    categories::{
        create_category, delete_category, get_category, list_categories, update_category,
    },
    index::root,
    search::search_texts,
    texts::{create_text, delete_text, get_text, list_texts, list_texts_by_category, update_text},
};
use tower_http::services::ServeDir;

pub mod api_state;
pub mod error;
mod routes;

/// Full route table of the catalog service. Uploaded images are served
/// back from the data dir under `/static`.
pub fn api_routes<S>(app_state: &ApiState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    Router::new()
        .route("/", get(root))
        .route("/categoria/", post(create_category))
        .route("/categoria/{id}", delete(delete_category))
        .route("/categorias", get(list_categories))
        .route("/categorias/{id}", get(get_category).put(update_category))
        .route("/textos/", post(create_text))
        .route("/textos", get(list_texts))
        .route("/textos/buscar/", get(search_texts))
        .route(
            "/textos/categoria/{categoria_id}",
            get(list_texts_by_category),
        )
        .route("/textos/{id}", get(get_text).put(update_text))
        .route("/textosborrar/{id}", delete(delete_text))
        .nest_service(
            "/static",
            ServeDir::new(app_state.config.data_dir.clone()),
        )
}
