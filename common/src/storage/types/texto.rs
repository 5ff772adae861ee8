use std::collections::HashMap;

use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

use super::categoria::Categoria;

stored_object!(Texto, "texto", {
    titulo: String,
    autor: String,
    descripcion: String,
    contenido: String,
    region: String,
    categoria_id: i64,
    #[serde(default)]
    image_url: Option<String>
});

/// Validated payload for creating or overwriting a texto. `image_url` is
/// deliberately absent: it is derived server-side from an uploaded file.
#[derive(Debug, Clone, Deserialize)]
pub struct TextoData {
    pub titulo: String,
    pub autor: String,
    pub descripcion: String,
    pub contenido: String,
    pub region: String,
    pub categoria_id: i64,
}

/// Read model joining a texto with its category. The category is attached
/// by an explicit second fetch and stays `None` when the row is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextoConCategoria {
    pub id: i64,
    #[serde(
        serialize_with = "serialize_datetime",
        deserialize_with = "deserialize_datetime",
        default
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        serialize_with = "serialize_datetime",
        deserialize_with = "deserialize_datetime",
        default
    )]
    pub updated_at: DateTime<Utc>,
    pub titulo: String,
    pub autor: String,
    pub descripcion: String,
    pub contenido: String,
    pub region: String,
    pub categoria_id: i64,
    pub image_url: Option<String>,
    pub categoria: Option<Categoria>,
}

impl TextoConCategoria {
    fn attach(texto: Texto, categoria: Option<Categoria>) -> Self {
        Self {
            id: texto.id,
            created_at: texto.created_at,
            updated_at: texto.updated_at,
            titulo: texto.titulo,
            autor: texto.autor,
            descripcion: texto.descripcion,
            contenido: texto.contenido,
            region: texto.region,
            categoria_id: texto.categoria_id,
            image_url: texto.image_url,
            categoria,
        }
    }
}

impl Texto {
    /// The category must exist when the texto is written; a dangling
    /// `categoria_id` is refused before anything is persisted.
    pub async fn create(
        data: TextoData,
        image_url: Option<String>,
        db: &SurrealDbClient,
    ) -> Result<Self, AppError> {
        Self::require_categoria(data.categoria_id, db).await?;

        let now = Utc::now();
        let texto = Self {
            id: db.next_id(Self::table_name()).await?,
            created_at: now,
            updated_at: now,
            titulo: data.titulo,
            autor: data.autor,
            descripcion: data.descripcion,
            contenido: data.contenido,
            region: data.region,
            categoria_id: data.categoria_id,
            image_url,
        };

        db.store_item(texto)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::InternalError("texto insert returned no record".to_string()))
    }

    pub async fn get(id: i64, db: &SurrealDbClient) -> Result<Self, AppError> {
        db.get_item::<Self>(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("texto {id}")))
    }

    pub async fn get_with_categoria(
        id: i64,
        db: &SurrealDbClient,
    ) -> Result<TextoConCategoria, AppError> {
        let texto = Self::get(id, db).await?;
        let categoria = match Categoria::get(texto.categoria_id, db).await {
            Ok(categoria) => Some(categoria),
            Err(AppError::NotFound(_)) => None,
            Err(err) => return Err(err),
        };

        Ok(TextoConCategoria::attach(texto, categoria))
    }

    pub async fn list(db: &SurrealDbClient) -> Result<Vec<Self>, AppError> {
        let mut response = db
            .client
            .query("SELECT * FROM type::table($table) ORDER BY id;")
            .bind(("table", Self::table_name()))
            .await?;

        Ok(response.take(0)?)
    }

    pub async fn list_with_categoria(
        db: &SurrealDbClient,
    ) -> Result<Vec<TextoConCategoria>, AppError> {
        let textos = Self::list(db).await?;
        Self::attach_categorias(textos, db).await
    }

    /// All textos assigned to the category. An unknown or empty category
    /// yields an empty list, not an error.
    pub async fn list_by_categoria(
        categoria_id: i64,
        db: &SurrealDbClient,
    ) -> Result<Vec<Self>, AppError> {
        let mut response = db
            .client
            .query(
                "SELECT * FROM type::table($table) WHERE categoria_id = $categoria_id ORDER BY id;",
            )
            .bind(("table", Self::table_name()))
            .bind(("categoria_id", categoria_id))
            .await?;

        Ok(response.take(0)?)
    }

    /// Case-insensitive substring search over titulo, descripcion and
    /// contenido. A blank keyword selects everything; an empty result set
    /// is reported as NotFound.
    pub async fn search(
        palabra: Option<&str>,
        db: &SurrealDbClient,
    ) -> Result<Vec<TextoConCategoria>, AppError> {
        let keyword = palabra.map(str::trim).filter(|palabra| !palabra.is_empty());

        let textos = match keyword {
            None => Self::list(db).await?,
            Some(keyword) => {
                let needle = keyword.to_lowercase();
                let mut response = db
                    .client
                    .query(
                        "SELECT * FROM type::table($table) WHERE \
                         string::contains(string::lowercase(titulo), $palabra) \
                         OR string::contains(string::lowercase(descripcion), $palabra) \
                         OR string::contains(string::lowercase(contenido), $palabra) \
                         ORDER BY id;",
                    )
                    .bind(("table", Self::table_name()))
                    .bind(("palabra", needle))
                    .await?;
                response.take(0)?
            }
        };

        if textos.is_empty() {
            return Err(AppError::NotFound(
                "no textos matched the search".to_string(),
            ));
        }

        Self::attach_categorias(textos, db).await
    }

    /// Overwrites every editable field. `image_url` and `created_at` are
    /// kept from the stored row.
    pub async fn update(id: i64, data: TextoData, db: &SurrealDbClient) -> Result<Self, AppError> {
        let mut texto = Self::get(id, db).await?;
        Self::require_categoria(data.categoria_id, db).await?;

        texto.titulo = data.titulo;
        texto.autor = data.autor;
        texto.descripcion = data.descripcion;
        texto.contenido = data.contenido;
        texto.region = data.region;
        texto.categoria_id = data.categoria_id;
        texto.updated_at = Utc::now();

        db.update_item(texto)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("texto {id}")))
    }

    pub async fn delete(id: i64, db: &SurrealDbClient) -> Result<(), AppError> {
        db.delete_item::<Self>(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("texto {id}")))?;

        Ok(())
    }

    /// Single atomic INSERT used by the bulk importer: either every texto
    /// in the batch lands or none does.
    pub async fn insert_batch(
        textos: Vec<Self>,
        db: &SurrealDbClient,
    ) -> Result<Vec<Self>, AppError> {
        if textos.is_empty() {
            return Ok(Vec::new());
        }

        let inserted: Vec<Self> = db.client.insert(Self::table_name()).content(textos).await?;
        Ok(inserted)
    }

    pub async fn exists_for_categoria(
        categoria_id: i64,
        db: &SurrealDbClient,
    ) -> Result<bool, AppError> {
        let mut response = db
            .client
            .query(
                "SELECT VALUE id FROM type::table($table) WHERE categoria_id = $categoria_id LIMIT 1;",
            )
            .bind(("table", Self::table_name()))
            .bind(("categoria_id", categoria_id))
            .await?;

        let existing: Option<Thing> = response.take(0)?;
        Ok(existing.is_some())
    }

    async fn require_categoria(categoria_id: i64, db: &SurrealDbClient) -> Result<(), AppError> {
        match Categoria::get(categoria_id, db).await {
            Ok(_) => Ok(()),
            Err(AppError::NotFound(_)) => Err(AppError::Conflict(format!(
                "category {categoria_id} does not exist"
            ))),
            Err(err) => Err(err),
        }
    }

    async fn attach_categorias(
        textos: Vec<Self>,
        db: &SurrealDbClient,
    ) -> Result<Vec<TextoConCategoria>, AppError> {
        let categorias: HashMap<i64, Categoria> = Categoria::list(db)
            .await?
            .into_iter()
            .map(|categoria| (categoria.id, categoria))
            .collect();

        Ok(textos
            .into_iter()
            .map(|texto| {
                let categoria = categorias.get(&texto.categoria_id).cloned();
                TextoConCategoria::attach(texto, categoria)
            })
            .collect())
    }
}
