use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

use super::texto::Texto;

stored_object!(Categoria, "categoria", {
    nombre: String
});

/// Validated payload for creating or renaming a category. Pure shape
/// checking; uniqueness is enforced by the storage index.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriaData {
    pub nombre: String,
}

impl Categoria {
    pub async fn create(data: CategoriaData, db: &SurrealDbClient) -> Result<Self, AppError> {
        let now = Utc::now();
        let categoria = Self {
            id: db.next_id(Self::table_name()).await?,
            created_at: now,
            updated_at: now,
            nombre: data.nombre,
        };

        match db.store_item(categoria.clone()).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Err(AppError::InternalError(
                "categoria insert returned no record".to_string(),
            )),
            Err(err) => Err(match AppError::from(err) {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("category '{}' already exists", categoria.nombre))
                }
                other => other,
            }),
        }
    }

    pub async fn get(id: i64, db: &SurrealDbClient) -> Result<Self, AppError> {
        db.get_item::<Self>(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("category {id}")))
    }

    /// Lookup by unique name, used by the bulk importer.
    pub async fn get_by_nombre(
        nombre: &str,
        db: &SurrealDbClient,
    ) -> Result<Option<Self>, AppError> {
        let mut response = db
            .client
            .query("SELECT * FROM type::table($table) WHERE nombre = $nombre LIMIT 1;")
            .bind(("table", Self::table_name()))
            .bind(("nombre", nombre.to_owned()))
            .await?;

        Ok(response.take(0)?)
    }

    pub async fn list(db: &SurrealDbClient) -> Result<Vec<Self>, AppError> {
        let mut response = db
            .client
            .query("SELECT * FROM type::table($table) ORDER BY id;")
            .bind(("table", Self::table_name()))
            .await?;

        Ok(response.take(0)?)
    }

    pub async fn update(
        id: i64,
        data: CategoriaData,
        db: &SurrealDbClient,
    ) -> Result<Self, AppError> {
        let mut categoria = Self::get(id, db).await?;
        categoria.nombre = data.nombre;
        categoria.updated_at = Utc::now();

        match db.update_item(categoria.clone()).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(AppError::NotFound(format!("category {id}"))),
            Err(err) => Err(match AppError::from(err) {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("category '{}' already exists", categoria.nombre))
                }
                other => other,
            }),
        }
    }

    /// Deleting a category still referenced by textos is refused, so a
    /// stored `categoria_id` always points at a live category.
    pub async fn delete(id: i64, db: &SurrealDbClient) -> Result<(), AppError> {
        Self::get(id, db).await?;

        if Texto::exists_for_categoria(id, db).await? {
            return Err(AppError::Conflict(format!(
                "category {id} still has textos assigned"
            )));
        }

        db.delete_item::<Self>(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::texto::TextoData;
    use super::*;
    use uuid::Uuid;

    async fn test_db() -> SurrealDbClient {
        let db = SurrealDbClient::memory("test_ns", &Uuid::new_v4().to_string())
            .await
            .expect("Failed to start in-memory surrealdb");
        db.ensure_initialized()
            .await
            .expect("Failed to initialize schema");
        db
    }

    fn data(nombre: &str) -> CategoriaData {
        CategoriaData {
            nombre: nombre.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let db = test_db().await;

        let created = Categoria::create(data("Mitos"), &db)
            .await
            .expect("Failed to create categoria");
        assert_eq!(created.id, 1);
        assert_eq!(created.nombre, "Mitos");

        let fetched = Categoria::get(created.id, &db)
            .await
            .expect("Failed to fetch categoria");
        assert_eq!(fetched.nombre, created.nombre);
    }

    #[tokio::test]
    async fn test_duplicate_nombre_is_conflict() {
        let db = test_db().await;

        Categoria::create(data("Mitos"), &db)
            .await
            .expect("Failed to create categoria");
        let err = Categoria::create(data("Mitos"), &db)
            .await
            .expect_err("Duplicate nombre must fail");
        assert!(matches!(err, AppError::Conflict(_)));

        // The failed insert must not have consumed a visible slot
        let all = Categoria::list(&db).await.expect("Failed to list");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = test_db().await;
        let err = Categoria::get(42, &db).await.expect_err("Must be missing");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_is_in_insertion_order() {
        let db = test_db().await;
        for nombre in ["Mitos", "Leyendas", "Cuentos"] {
            Categoria::create(data(nombre), &db)
                .await
                .expect("Failed to create categoria");
        }

        let all = Categoria::list(&db).await.expect("Failed to list");
        let nombres: Vec<&str> = all.iter().map(|c| c.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Mitos", "Leyendas", "Cuentos"]);
    }

    #[tokio::test]
    async fn test_update_renames_and_detects_conflict() {
        let db = test_db().await;
        Categoria::create(data("Mitos"), &db)
            .await
            .expect("Failed to create categoria");
        let leyendas = Categoria::create(data("Leyendas"), &db)
            .await
            .expect("Failed to create categoria");

        let renamed = Categoria::update(leyendas.id, data("Relatos"), &db)
            .await
            .expect("Failed to rename");
        assert_eq!(renamed.nombre, "Relatos");
        assert_eq!(renamed.id, leyendas.id);
        assert!(renamed.updated_at > leyendas.updated_at);

        let err = Categoria::update(renamed.id, data("Mitos"), &db)
            .await
            .expect_err("Renaming onto an existing nombre must fail");
        assert!(matches!(err, AppError::Conflict(_)));

        let err = Categoria::update(99, data("Nada"), &db)
            .await
            .expect_err("Updating a missing id must fail");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_refuses_while_textos_reference_it() {
        let db = test_db().await;
        let categoria = Categoria::create(data("Mitos"), &db)
            .await
            .expect("Failed to create categoria");
        Texto::create(
            TextoData {
                titulo: "El sol".to_string(),
                autor: "A".to_string(),
                descripcion: "d".to_string(),
                contenido: "c".to_string(),
                region: "Andes".to_string(),
                categoria_id: categoria.id,
            },
            None,
            &db,
        )
        .await
        .expect("Failed to create texto");

        let err = Categoria::delete(categoria.id, &db)
            .await
            .expect_err("Delete must be refused while textos exist");
        assert!(matches!(err, AppError::Conflict(_)));

        // Still present
        Categoria::get(categoria.id, &db)
            .await
            .expect("Categoria must survive refused delete");
    }

    #[tokio::test]
    async fn test_delete_removes_empty_category() {
        let db = test_db().await;
        let categoria = Categoria::create(data("Mitos"), &db)
            .await
            .expect("Failed to create categoria");

        Categoria::delete(categoria.id, &db)
            .await
            .expect("Failed to delete");

        let err = Categoria::get(categoria.id, &db)
            .await
            .expect_err("Deleted categoria must be gone");
        assert!(matches!(err, AppError::NotFound(_)));

        let err = Categoria::delete(categoria.id, &db)
            .await
            .expect_err("Second delete must be NotFound");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
