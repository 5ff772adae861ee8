use super::types::StoredObject;
use crate::error::AppError;
use std::ops::Deref;
use surrealdb::{
    engine::any::{connect, Any},
    opt::auth::Root,
    Error, RecordId, Surreal,
};

#[derive(Clone)]
pub struct SurrealDbClient {
    pub client: Surreal<Any>,
}

impl SurrealDbClient {
    /// # Initialize a new database client
    ///
    /// # Returns
    /// * `SurrealDbClient` initialized
    pub async fn new(
        address: &str,
        username: &str,
        password: &str,
        namespace: &str,
        database: &str,
    ) -> Result<Self, Error> {
        let db = connect(address).await?;

        // Sign in to database
        db.signin(Root { username, password }).await?;

        // Set namespace
        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }

    /// Defines the tables and the unique index backing category names.
    /// Idempotent, run at every startup.
    pub async fn ensure_initialized(&self) -> Result<(), Error> {
        self.client
            .query(
                "DEFINE TABLE IF NOT EXISTS categoria SCHEMALESS;
                 DEFINE TABLE IF NOT EXISTS texto SCHEMALESS;
                 DEFINE TABLE IF NOT EXISTS counter SCHEMALESS;
                 DEFINE INDEX IF NOT EXISTS unique_nombre ON TABLE categoria FIELDS nombre UNIQUE;",
            )
            .await?
            .check()?;
        Ok(())
    }

    /// Allocates the next id for `table` from a monotonic per-table counter.
    /// Counter rows outlive record deletion, so ids are never reused.
    pub async fn next_id(&self, table: &str) -> Result<i64, AppError> {
        let mut response = self
            .client
            .query("UPSERT type::thing('counter', $table) SET value += 1 RETURN VALUE value;")
            .bind(("table", table.to_owned()))
            .await?;

        let id: Option<i64> = response.take(0)?;
        id.ok_or_else(|| AppError::InternalError(format!("id counter for '{table}' returned no value")))
    }

    /// Operation to store a object, requires the struct to implement StoredObject
    ///
    /// # Arguments
    /// * `item` - The item to be stored
    ///
    /// # Returns
    /// * `Result` - Item or Error
    pub async fn store_item<T>(&self, item: T) -> Result<Option<T>, Error>
    where
        T: StoredObject + Send + Sync + 'static,
    {
        self.client
            .create(RecordId::from_table_key(T::table_name(), item.get_id()))
            .content(item)
            .await
    }

    /// Operation to retrieve a single object by its ID, requires the struct to implement StoredObject
    ///
    /// # Arguments
    /// * `id` - The ID of the item to retrieve
    ///
    /// # Returns
    /// * `Result<Option<T>, Error>` - The found item or Error
    pub async fn get_item<T>(&self, id: i64) -> Result<Option<T>, Error>
    where
        T: for<'de> StoredObject,
    {
        self.client
            .select(RecordId::from_table_key(T::table_name(), id))
            .await
    }

    /// Operation to overwrite a stored object in place, requires the struct to implement StoredObject
    ///
    /// # Arguments
    /// * `item` - The item replacing the stored record
    ///
    /// # Returns
    /// * `Result<Option<T>, Error>` - The updated item or Error
    pub async fn update_item<T>(&self, item: T) -> Result<Option<T>, Error>
    where
        T: StoredObject + Send + Sync + 'static,
    {
        self.client
            .update(RecordId::from_table_key(T::table_name(), item.get_id()))
            .content(item)
            .await
    }

    /// Operation to delete a single object by its ID, requires the struct to implement StoredObject
    ///
    /// # Arguments
    /// * `id` - The ID of the item to delete
    ///
    /// # Returns
    /// * `Result<Option<T>, Error>` - The deleted item or Error
    pub async fn delete_item<T>(&self, id: i64) -> Result<Option<T>, Error>
    where
        T: for<'de> StoredObject,
    {
        self.client
            .delete(RecordId::from_table_key(T::table_name(), id))
            .await
    }
}

impl Deref for SurrealDbClient {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl SurrealDbClient {
    /// Create an in-memory SurrealDB client for testing.
    pub async fn memory(namespace: &str, database: &str) -> Result<Self, Error> {
        let db = connect("mem://").await?;

        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }
}
