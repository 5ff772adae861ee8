//! One-off loader seeding the catalog from `categorias.json` and
//! `relatos.json`. Categories are committed one by one first; the textos
//! are resolved against them by name and written in a single atomic batch,
//! so a failure during the second phase leaves no partial texto data.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use common::{
    storage::{
        db::SurrealDbClient,
        types::{
            categoria::{Categoria, CategoriaData},
            texto::Texto,
            StoredObject,
        },
    },
    utils::config::get_config,
};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Deserialize)]
struct CategoriaSeed {
    nombre: String,
}

#[derive(Debug, Deserialize)]
struct RelatoSeed {
    titulo: String,
    autor: String,
    descripcion: String,
    contenido: String,
    region: String,
    categoria_nombre: String,
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let seed_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "seed".to_string()));

    let config = get_config()?;
    let db = SurrealDbClient::new(
        &config.surrealdb_address,
        &config.surrealdb_username,
        &config.surrealdb_password,
        &config.surrealdb_namespace,
        &config.surrealdb_database,
    )
    .await?;
    db.ensure_initialized().await?;

    let categorias: Vec<CategoriaSeed> = load_json(&seed_dir.join("categorias.json"))?;
    let relatos: Vec<RelatoSeed> = load_json(&seed_dir.join("relatos.json"))?;

    for seed in categorias {
        let categoria = Categoria::create(CategoriaData { nombre: seed.nombre }, &db).await?;
        info!(id = categoria.id, nombre = %categoria.nombre, "Inserted category");
    }

    let mut batch = Vec::new();
    for relato in relatos {
        match Categoria::get_by_nombre(&relato.categoria_nombre, &db).await? {
            Some(categoria) => {
                let now = Utc::now();
                batch.push(Texto {
                    id: db.next_id(Texto::table_name()).await?,
                    created_at: now,
                    updated_at: now,
                    titulo: relato.titulo,
                    autor: relato.autor,
                    descripcion: relato.descripcion,
                    contenido: relato.contenido,
                    region: relato.region,
                    categoria_id: categoria.id,
                    image_url: None,
                });
            }
            None => {
                warn!(
                    categoria = %relato.categoria_nombre,
                    titulo = %relato.titulo,
                    "Category not found, skipping texto"
                );
            }
        }
    }

    let inserted = Texto::insert_batch(batch, &db).await?;
    info!(count = inserted.len(), "Bulk insert finished");

    Ok(())
}
