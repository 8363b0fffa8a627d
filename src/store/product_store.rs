//! Product Storage
//! Mission: Store and manage product listings with SQLite

use crate::models::Product;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

/// Product storage with SQLite backend
pub struct ProductStore {
    db_path: String,
}

impl ProductStore {
    /// Create a new product store and initialize database
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Create a new product owned by `user_id`
    pub fn create(
        &self,
        name: &str,
        description: &str,
        price: f64,
        user_id: &str,
    ) -> Result<Product> {
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            user_id: user_id.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO products (id, name, description, price, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                product.id.to_string(),
                product.name,
                product.description,
                product.price,
                product.user_id,
                product.created_at,
            ],
        )
        .context("Failed to insert product")?;

        info!("Created product: {} (owner {})", product.id, product.user_id);

        Ok(product)
    }

    /// Get product by id
    pub fn find_by_id(&self, id: &Uuid) -> Result<Option<Product>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, name, description, price, user_id, created_at
             FROM products WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![id.to_string()], Self::row_to_product);

        match result {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all products
    pub fn list(&self) -> Result<Vec<Product>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, name, description, price, user_id, created_at FROM products",
        )?;

        let products = stmt
            .query_map([], Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// List products owned by one user
    pub fn find_by_user(&self, user_id: &str) -> Result<Vec<Product>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, name, description, price, user_id, created_at
             FROM products WHERE user_id = ?1",
        )?;

        let products = stmt
            .query_map(params![user_id], Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// Save changes to an existing product
    pub fn update(&self, product: &Product) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute(
            "UPDATE products SET name = ?2, description = ?3, price = ?4
             WHERE id = ?1",
            params![
                product.id.to_string(),
                product.name,
                product.description,
                product.price,
            ],
        )?;

        if rows_affected == 0 {
            anyhow::bail!("Product not found");
        }

        Ok(())
    }

    /// Delete a product by id
    pub fn delete(&self, id: &Uuid) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected =
            conn.execute("DELETE FROM products WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            anyhow::bail!("Product not found");
        }

        info!("Deleted product: {}", id);
        Ok(())
    }

    fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
        let id: String = row.get(0)?;
        Ok(Product {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            user_id: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (ProductStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = ProductStore::new(db_path).unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_create_and_retrieve_product() {
        let (store, _temp) = create_test_store();

        let product = store
            .create("Widget", "A fine widget", 9.99, "u1")
            .unwrap();

        let found = store.find_by_id(&product.id).unwrap().unwrap();
        assert_eq!(found.name, "Widget");
        assert_eq!(found.price, 9.99);
        assert_eq!(found.user_id, "u1");
    }

    #[test]
    fn test_find_by_user() {
        let (store, _temp) = create_test_store();

        store.create("Widget", "desc", 1.0, "u1").unwrap();
        store.create("Gadget", "desc", 2.0, "u1").unwrap();
        store.create("Gizmo", "desc", 3.0, "u2").unwrap();

        assert_eq!(store.find_by_user("u1").unwrap().len(), 2);
        assert_eq!(store.find_by_user("u2").unwrap().len(), 1);
        assert!(store.find_by_user("u3").unwrap().is_empty());
    }

    #[test]
    fn test_update_product() {
        let (store, _temp) = create_test_store();

        let mut product = store.create("Widget", "desc", 1.0, "u1").unwrap();
        product.price = 2.5;
        product.name = "Widget v2".to_string();
        store.update(&product).unwrap();

        let updated = store.find_by_id(&product.id).unwrap().unwrap();
        assert_eq!(updated.name, "Widget v2");
        assert_eq!(updated.price, 2.5);
        // Ownership never changes on update
        assert_eq!(updated.user_id, "u1");
    }

    #[test]
    fn test_delete_product() {
        let (store, _temp) = create_test_store();

        let product = store.create("Widget", "desc", 1.0, "u1").unwrap();
        store.delete(&product.id).unwrap();

        assert!(store.find_by_id(&product.id).unwrap().is_none());
        assert!(store.delete(&product.id).is_err());
    }
}
