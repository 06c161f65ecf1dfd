// tests/common/mod.rs

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use procurement_backend::{
    models::{auth::Claims, tenancy::RequestContext},
    services::notification_service::LogNotifier,
    AppConfig, AppState,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub const JWT_SECRET: &str = "segredo-de-teste";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://localhost/procurement_test".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        database_max_connections: 5,
        expose_error_details: true,
        notification_timeout: Duration::from_secs(1),
    }
}

pub fn app_state(pool: PgPool) -> AppState {
    AppState::from_parts(pool, test_config(), Arc::new(LogNotifier))
}

pub fn token_for(user_id: Uuid) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: (now + 3600) as usize,
        iat: now as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_ref()),
    )
    .expect("token")
}

// Organização mínima com um comprador que tem todas as permissões
pub struct Fixture {
    pub ctx: RequestContext,
    pub warehouse_id: Uuid,
}

pub async fn seed_organization(pool: &PgPool) -> Fixture {
    let organization_id: Uuid =
        sqlx::query_scalar("INSERT INTO organizations (name) VALUES ('Acme') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();

    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, full_name) VALUES ($1, 'Comprador') RETURNING id",
    )
    .bind(format!("{}@acme.test", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .unwrap();

    let role_id: Uuid = sqlx::query_scalar(
        "INSERT INTO roles (organization_id, name) VALUES ($1, 'buyer') RETURNING id",
    )
    .bind(organization_id)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO role_permissions (role_id, permission_id) SELECT $1, id FROM permissions",
    )
    .bind(role_id)
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO organization_members (organization_id, user_id, role_id) VALUES ($1, $2, $3)",
    )
    .bind(organization_id)
    .bind(user_id)
    .bind(role_id)
    .execute(pool)
    .await
    .unwrap();

    let warehouse_id: Uuid = sqlx::query_scalar(
        "INSERT INTO warehouses (organization_id, name) VALUES ($1, 'Central') RETURNING id",
    )
    .bind(organization_id)
    .fetch_one(pool)
    .await
    .unwrap();

    Fixture {
        ctx: RequestContext::new(organization_id, user_id),
        warehouse_id,
    }
}

pub async fn seed_product(pool: &PgPool, organization_id: Uuid, name: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO products (organization_id, sku, name, cost_price) VALUES ($1, $2, $3, 15) RETURNING id",
    )
    .bind(organization_id)
    .bind(format!("SKU-{}", Uuid::new_v4()))
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_stock(pool: &PgPool, organization_id: Uuid, product_id: Uuid, warehouse_id: Uuid, on_hand: Decimal) {
    sqlx::query(
        r#"
        INSERT INTO stock_levels (organization_id, product_id, warehouse_id, quantity_on_hand)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(organization_id)
    .bind(product_id)
    .bind(warehouse_id)
    .bind(on_hand)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_rule(
    pool: &PgPool,
    organization_id: Uuid,
    product_id: Uuid,
    warehouse_id: Option<Uuid>,
    reorder_point: Decimal,
    reorder_quantity: Decimal,
) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO reorder_rules (organization_id, product_id, warehouse_id, reorder_point, reorder_quantity)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(organization_id)
    .bind(product_id)
    .bind(warehouse_id)
    .bind(reorder_point)
    .bind(reorder_quantity)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_supplier(
    pool: &PgPool,
    organization_id: Uuid,
    product_id: Uuid,
    unit_price: Option<Decimal>,
    payment_terms: Option<i32>,
) -> Uuid {
    let supplier_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO suppliers (organization_id, name, email, payment_terms)
        VALUES ($1, 'Fornecedor Sul', 'vendas@fornecedor.test', $2)
        RETURNING id
        "#,
    )
    .bind(organization_id)
    .bind(payment_terms)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        INSERT INTO supplier_products (organization_id, supplier_id, product_id, unit_price, is_primary)
        VALUES ($1, $2, $3, $4, true)
        "#,
    )
    .bind(organization_id)
    .bind(supplier_id)
    .bind(product_id)
    .bind(unit_price)
    .execute(pool)
    .await
    .unwrap();

    supplier_id
}
