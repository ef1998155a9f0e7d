//! Postgres product store implementation.
//!
//! Writes follow the persistence contract: one transaction per product,
//! a dedup check on the SKU before any insert, get-or-create lookups
//! for category/brand/tag rows, and sub-entity inserts inside the same
//! transaction. Reads always hydrate sub-entities with one batched
//! query per table.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row, Transaction};
use tracing::{debug, error, info, instrument};

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::interfaces::{
    Pagination, ProductFilter, ProductPage, ProductStore, SaveOutcome, SaveSummary,
};
use catalog_search_shared::{CatalogProduct, Dimensions, ImageRecord, ProductRecord, ReviewEntry};

/// Base SELECT used by every product read path. Category and brand
/// labels are joined in so records come back denormalized.
const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.sku, p.title, p.description, p.price, p.discount_percentage,
           p.rating, p.stock, p.weight, p.warranty_information, p.shipping_information,
           p.availability_status, p.return_policy, p.minimum_order_quantity,
           p.thumbnail, p.barcode, p.qr_code, p.created_at, p.updated_at,
           c.name AS category, b.name AS brand
    FROM products p
    JOIN categories c ON c.id = p.category_id
    LEFT JOIN brands b ON b.id = p.brand_id
"#;

/// Postgres-backed implementation of [`ProductStore`].
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Connect to Postgres with the given parameters and verify the
    /// connection by acquiring from the pool once.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to product store"
        );

        Ok(Self { pool })
    }

    /// Wrap an existing pool (used when the caller manages pooling).
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bootstrap the relational schema. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        super::schema::ensure_schema(&self.pool).await
    }

    /// Normalize a display name into the slug used as the lookup key
    /// for categories, brands, and tags.
    fn slugify(name: &str) -> String {
        name.trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .replace('/', "-")
    }

    /// Get-or-create a category row by normalized slug. The no-op
    /// `DO UPDATE` makes the statement return the existing id when a
    /// concurrent insert wins the race.
    async fn resolve_category(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO categories (name, slug) VALUES ($1, $2)
            ON CONFLICT (slug) DO UPDATE SET name = categories.name
            RETURNING id
            "#,
        )
        .bind(name.trim())
        .bind(Self::slugify(name))
        .fetch_one(&mut **tx)
        .await?;

        Ok(id)
    }

    async fn resolve_brand(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO brands (name, slug) VALUES ($1, $2)
            ON CONFLICT (slug) DO UPDATE SET name = brands.name
            RETURNING id
            "#,
        )
        .bind(name.trim())
        .bind(Self::slugify(name))
        .fetch_one(&mut **tx)
        .await?;

        Ok(id)
    }

    async fn resolve_tag(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tags (name, slug) VALUES ($1, $2)
            ON CONFLICT (slug) DO UPDATE SET name = tags.name
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(Self::slugify(name))
        .fetch_one(&mut **tx)
        .await?;

        Ok(id)
    }

    /// Persist one product and its sub-entities in a single
    /// transaction. Any error rolls the whole record back.
    async fn save_one(&self, product: &CatalogProduct) -> Result<SaveOutcome, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE sku = $1")
            .bind(&product.sku)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Ok(SaveOutcome::Duplicate);
        }

        let category_id = Self::resolve_category(&mut tx, &product.category).await?;
        let brand_id = match &product.brand {
            Some(name) if !name.trim().is_empty() => {
                Some(Self::resolve_brand(&mut tx, name).await?)
            }
            _ => None,
        };

        let meta = product.meta.clone().unwrap_or_default();

        let row = sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, title, description, price, discount_percentage, rating,
                stock, weight, warranty_information, shipping_information,
                availability_status, return_policy, minimum_order_quantity,
                thumbnail, barcode, qr_code, category_id, brand_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19)
            RETURNING created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.sku)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.discount_percentage)
        .bind(product.rating)
        .bind(product.stock)
        .bind(product.weight)
        .bind(&product.warranty_information)
        .bind(&product.shipping_information)
        .bind(&product.availability_status)
        .bind(&product.return_policy)
        .bind(product.minimum_order_quantity)
        .bind(&product.thumbnail)
        .bind(&meta.barcode)
        .bind(&meta.qr_code)
        .bind(category_id)
        .bind(brand_id)
        .fetch_one(&mut *tx)
        .await?;

        let created_at = row.try_get("created_at")?;
        let updated_at = row.try_get("updated_at")?;

        if let Some(dimensions) = &product.dimensions {
            sqlx::query(
                r#"
                INSERT INTO product_dimensions (product_id, width, height, depth)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(product.id)
            .bind(dimensions.width)
            .bind(dimensions.height)
            .bind(dimensions.depth)
            .execute(&mut *tx)
            .await?;
        }

        for url in &product.images {
            sqlx::query(
                "INSERT INTO product_images (product_id, image_url, is_thumbnail) VALUES ($1, $2, FALSE)",
            )
            .bind(product.id)
            .bind(url)
            .execute(&mut *tx)
            .await?;
        }
        if let Some(thumbnail) = &product.thumbnail {
            sqlx::query(
                "INSERT INTO product_images (product_id, image_url, is_thumbnail) VALUES ($1, $2, TRUE)",
            )
            .bind(product.id)
            .bind(thumbnail)
            .execute(&mut *tx)
            .await?;
        }

        for review in &product.reviews {
            sqlx::query(
                r#"
                INSERT INTO product_reviews
                    (product_id, rating, comment, reviewer_name, reviewer_email, review_date)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(product.id)
            .bind(review.rating)
            .bind(&review.comment)
            .bind(&review.reviewer_name)
            .bind(&review.reviewer_email)
            .bind(review.reviewed_at)
            .execute(&mut *tx)
            .await?;
        }

        for raw_name in &product.tags {
            let tag_name = raw_name.trim().to_lowercase();
            if tag_name.is_empty() {
                continue;
            }
            let tag_id = Self::resolve_tag(&mut tx, &tag_name).await?;
            sqlx::query(
                "INSERT INTO product_tags (product_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(product.id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::transaction(e.to_string()))?;

        Ok(SaveOutcome::Saved(ProductRecord::from_catalog(
            product, created_at, updated_at,
        )))
    }

    /// Map a joined product row into a record with empty sub-entity
    /// collections.
    fn base_record(row: &PgRow) -> Result<ProductRecord, StoreError> {
        Ok(ProductRecord {
            id: row.try_get("id")?,
            sku: row.try_get("sku")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            brand: row.try_get("brand")?,
            price: row.try_get("price")?,
            discount_percentage: row.try_get("discount_percentage")?,
            rating: row.try_get("rating")?,
            stock: row.try_get("stock")?,
            weight: row.try_get("weight")?,
            warranty_information: row.try_get("warranty_information")?,
            shipping_information: row.try_get("shipping_information")?,
            availability_status: row.try_get("availability_status")?,
            return_policy: row.try_get("return_policy")?,
            minimum_order_quantity: row.try_get("minimum_order_quantity")?,
            thumbnail: row.try_get("thumbnail")?,
            barcode: row.try_get("barcode")?,
            qr_code: row.try_get("qr_code")?,
            tags: Vec::new(),
            dimensions: None,
            images: Vec::new(),
            reviews: Vec::new(),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Load tags, dimensions, images, and reviews for the given records
    /// with one batched query per table.
    async fn attach_sub_entities(
        &self,
        records: &mut [ProductRecord],
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let index: HashMap<i64, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, i))
            .collect();

        let tag_rows = sqlx::query(
            r#"
            SELECT pt.product_id, t.name
            FROM product_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.product_id = ANY($1)
            ORDER BY pt.product_id, t.name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        for row in tag_rows {
            let product_id: i64 = row.try_get("product_id")?;
            if let Some(&i) = index.get(&product_id) {
                records[i].tags.push(row.try_get("name")?);
            }
        }

        let dimension_rows = sqlx::query(
            "SELECT product_id, width, height, depth FROM product_dimensions WHERE product_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        for row in dimension_rows {
            let product_id: i64 = row.try_get("product_id")?;
            if let Some(&i) = index.get(&product_id) {
                records[i].dimensions = Some(Dimensions {
                    width: row.try_get("width")?,
                    height: row.try_get("height")?,
                    depth: row.try_get("depth")?,
                });
            }
        }

        let image_rows = sqlx::query(
            r#"
            SELECT product_id, image_url, is_thumbnail
            FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        for row in image_rows {
            let product_id: i64 = row.try_get("product_id")?;
            if let Some(&i) = index.get(&product_id) {
                records[i].images.push(ImageRecord {
                    url: row.try_get("image_url")?,
                    is_thumbnail: row.try_get("is_thumbnail")?,
                });
            }
        }

        let review_rows = sqlx::query(
            r#"
            SELECT product_id, rating, comment, reviewer_name, reviewer_email, review_date
            FROM product_reviews
            WHERE product_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        for row in review_rows {
            let product_id: i64 = row.try_get("product_id")?;
            if let Some(&i) = index.get(&product_id) {
                records[i].reviews.push(ReviewEntry {
                    rating: row.try_get("rating")?,
                    comment: row.try_get("comment")?,
                    reviewer_name: row.try_get("reviewer_name")?,
                    reviewer_email: row.try_get("reviewer_email")?,
                    reviewed_at: row.try_get("review_date")?,
                });
            }
        }

        Ok(())
    }

    /// Run a product SELECT and hydrate the result set.
    async fn fetch_records(
        &self,
        clause: &str,
        bind_ids: Option<&[i64]>,
        bind_page: Option<&Pagination>,
        bind_category: Option<&str>,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let sql = format!("{PRODUCT_SELECT} {clause}");
        let mut query = sqlx::query(&sql);
        if let Some(category) = bind_category {
            query = query.bind(category);
        }
        if let Some(ids) = bind_ids {
            query = query.bind(ids.to_vec());
        }
        if let Some(page) = bind_page {
            query = query.bind(page.offset).bind(page.limit);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let mut records = rows
            .iter()
            .map(Self::base_record)
            .collect::<Result<Vec<_>, _>>()?;
        self.attach_sub_entities(&mut records).await?;
        Ok(records)
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn save_products(&self, products: &[CatalogProduct]) -> Result<SaveSummary, StoreError> {
        info!(count = products.len(), "Saving products to store");

        let mut summary = SaveSummary::default();
        for product in products {
            match self.save_one(product).await {
                Ok(SaveOutcome::Duplicate) => {
                    debug!(sku = %product.sku, "Product already persisted, skipping");
                    summary.absorb(SaveOutcome::Duplicate);
                }
                Ok(outcome) => summary.absorb(outcome),
                Err(e) if e.is_connection() => return Err(e),
                Err(e) => {
                    error!(sku = %product.sku, error = %e, "Product transaction rolled back");
                    summary.absorb(SaveOutcome::Failed(e.to_string()));
                }
            }
        }

        info!(
            saved = summary.saved.len(),
            duplicates = summary.duplicates,
            failed = summary.failed,
            "Save batch complete"
        );
        Ok(summary)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ProductRecord>, StoreError> {
        let records = self
            .fetch_records("WHERE p.id = ANY($1)", Some(&[id]), None, None)
            .await?;
        Ok(records.into_iter().next())
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductRecord>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_records(
            "WHERE p.id = ANY($1) ORDER BY p.created_at DESC",
            Some(ids),
            None,
            None,
        )
        .await
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: &Pagination,
    ) -> Result<ProductPage, StoreError> {
        let (records, total) = match &filter.category {
            Some(category) => {
                let records = self
                    .fetch_records(
                        "WHERE c.name = $1 ORDER BY p.created_at DESC OFFSET $2 LIMIT $3",
                        None,
                        Some(page),
                        Some(category),
                    )
                    .await?;
                let total: i64 = sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*) FROM products p
                    JOIN categories c ON c.id = p.category_id
                    WHERE c.name = $1
                    "#,
                )
                .bind(category)
                .fetch_one(&self.pool)
                .await?;
                (records, total)
            }
            None => {
                let records = self
                    .fetch_records(
                        "ORDER BY p.created_at DESC OFFSET $1 LIMIT $2",
                        None,
                        Some(page),
                        None,
                    )
                    .await?;
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
                    .fetch_one(&self.pool)
                    .await?;
                (records, total)
            }
        };

        Ok(ProductPage { records, total })
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        let categories: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT c.name
            FROM categories c
            JOIN products p ON p.category_id = c.id
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        self.fetch_records("ORDER BY p.created_at DESC", None, None, None)
            .await
    }
}
