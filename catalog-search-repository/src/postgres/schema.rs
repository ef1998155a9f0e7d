//! Relational schema bootstrap.
//!
//! Every statement is idempotent (`IF NOT EXISTS`) so the bootstrap can
//! run on every startup. Sub-entity tables cascade with their product;
//! category/brand/tag lookup tables are keyed by a unique normalized
//! slug so get-or-create races resolve to the existing row.

use sqlx::PgPool;

use crate::errors::StoreError;

/// Create all tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS brands (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            sku TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
            discount_percentage DOUBLE PRECISION NOT NULL DEFAULT 0
                CHECK (discount_percentage >= 0 AND discount_percentage <= 100),
            rating DOUBLE PRECISION NOT NULL DEFAULT 0
                CHECK (rating >= 0 AND rating <= 5),
            stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
            weight INTEGER NOT NULL DEFAULT 0 CHECK (weight >= 0),
            warranty_information TEXT NOT NULL DEFAULT '',
            shipping_information TEXT NOT NULL DEFAULT '',
            availability_status TEXT NOT NULL DEFAULT '',
            return_policy TEXT NOT NULL DEFAULT '',
            minimum_order_quantity INTEGER NOT NULL DEFAULT 1
                CHECK (minimum_order_quantity >= 1),
            thumbnail TEXT,
            barcode TEXT,
            qr_code TEXT,
            category_id BIGINT NOT NULL REFERENCES categories(id),
            brand_id BIGINT REFERENCES brands(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS product_dimensions (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            product_id BIGINT NOT NULL UNIQUE REFERENCES products(id) ON DELETE CASCADE,
            width DOUBLE PRECISION NOT NULL,
            height DOUBLE PRECISION NOT NULL,
            depth DOUBLE PRECISION NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS product_images (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            image_url TEXT NOT NULL,
            is_thumbnail BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS product_reviews (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            rating INTEGER NOT NULL,
            comment TEXT NOT NULL DEFAULT '',
            reviewer_name TEXT NOT NULL DEFAULT '',
            reviewer_email TEXT NOT NULL DEFAULT '',
            review_date TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS product_tags (
            product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            tag_id BIGINT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (product_id, tag_id)
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_products_category_id ON products(category_id)",
        "CREATE INDEX IF NOT EXISTS idx_products_created_at ON products(created_at DESC)",
        "CREATE INDEX IF NOT EXISTS idx_product_images_product_id ON product_images(product_id)",
        "CREATE INDEX IF NOT EXISTS idx_product_reviews_product_id ON product_reviews(product_id)",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| StoreError::schema(e.to_string()))?;
    }

    Ok(())
}
