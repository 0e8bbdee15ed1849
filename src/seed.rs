use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::info;

struct DemoProduct {
    name: &'static str,
    description: &'static str,
    price: f64,
    category: &'static str,
    stock: i64,
    image_url: &'static str,
}

const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        name: "Samsung Galaxy S23",
        description: "Android smartphone, 256GB storage, 6.1-inch AMOLED display, 50MP triple camera",
        price: 2499.99,
        category: "Electronics",
        stock: 15,
        image_url: "https://images.unsplash.com/photo-1592750475338-74b7b21085ab?w=400",
    },
    DemoProduct {
        name: "Dell Inspiron 15 Laptop",
        description: "Intel Core i5, 8GB RAM, 256GB SSD, 15.6-inch Full HD display",
        price: 2299.00,
        category: "Electronics",
        stock: 8,
        image_url: "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?w=400",
    },
    DemoProduct {
        name: "Basic Blue T-Shirt",
        description: "100% cotton, navy blue, sizes S to XXL",
        price: 39.90,
        category: "Clothing",
        stock: 50,
        image_url: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=400",
    },
    DemoProduct {
        name: "JavaScript: The Definitive Guide",
        description: "Complete reference on modern JavaScript, 7th edition",
        price: 89.90,
        category: "Books",
        stock: 25,
        image_url: "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?w=400",
    },
    DemoProduct {
        name: "Nike Air Max Sneakers",
        description: "Comfortable sports shoes for running and walking",
        price: 299.99,
        category: "Sports",
        stock: 12,
        image_url: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=400",
    },
    DemoProduct {
        name: "Philips Electric Coffee Maker",
        description: "Automatic 12-cup coffee maker with programmable timer",
        price: 159.90,
        category: "Home",
        stock: 20,
        image_url: "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=400",
    },
];

/// Inserts the demo catalog on first start. A non-empty products table means
/// the seed already ran (or real data exists) and nothing is touched.
pub async fn seed_demo_products(db: &SqlitePool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(db)
        .await?;
    if count > 0 {
        info!(count, "products already present, skipping demo seed");
        return Ok(());
    }

    for product in DEMO_PRODUCTS {
        sqlx::query(
            r#"
            INSERT INTO products (name, description, price, image_url, category, stock, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.image_url)
        .bind(product.category)
        .bind(product.stock)
        .bind(OffsetDateTime::now_utc())
        .execute(db)
        .await?;
        info!(name = product.name, "demo product inserted");
    }
    Ok(())
}
