//! Order persistence.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ramadhane_core::{OrderId, Price, ProductId};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderItemInput};

/// How many orders `list_recent` returns.
const RECENT_ORDER_LIMIT: i64 = 50;

/// Records submitted orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order and its items, returning the recorded order.
    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    /// The most recently submitted orders, newest first.
    async fn list_recent(&self) -> Result<Vec<Order>, RepositoryError>;
}

/// Order repository over the storefront database.
#[derive(Clone)]
pub struct PgOrders {
    pool: PgPool,
}

impl PgOrders {
    /// Create an order repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrders {
    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let header: OrderHeaderRow = sqlx::query_as(
            r"
            INSERT INTO orders (customer_name, phone_number, address, total_amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
            ",
        )
        .bind(&order.customer_name)
        .bind(&order.phone_number)
        .bind(&order.address)
        .bind(order.total_amount.amount())
        .fetch_one(&mut *tx)
        .await?;

        for item in &order.items {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, size, color, price)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(header.id)
            .bind(item.product_id)
            .bind(i32::try_from(item.quantity).map_err(|_| {
                RepositoryError::DataCorruption(format!(
                    "order item quantity {} does not fit in the database column",
                    item.quantity
                ))
            })?)
            .bind(&item.size)
            .bind(&item.color)
            .bind(item.price.amount())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order {
            id: header.id,
            customer_name: order.customer_name,
            phone_number: order.phone_number,
            address: order.address,
            total_amount: order.total_amount,
            items: order.items,
            created_at: header.created_at,
        })
    }

    async fn list_recent(&self) -> Result<Vec<Order>, RepositoryError> {
        let headers: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, customer_name, phone_number, address, total_amount, created_at
            FROM orders
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(RECENT_ORDER_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i32> = headers.iter().map(|h| h.id.as_i32()).collect();
        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT order_id, product_id, quantity, size, color, price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, id
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items: HashMap<i32, Vec<OrderItemInput>> = HashMap::new();
        for row in item_rows {
            items
                .entry(row.order_id)
                .or_default()
                .push(row.into_item()?);
        }

        Ok(headers
            .into_iter()
            .map(|header| {
                let items = items.remove(&header.id.as_i32()).unwrap_or_default();
                header.into_order(items)
            })
            .collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderHeaderRow {
    id: OrderId,
    created_at: DateTime<Utc>,
}

/// Full order header row, read back when listing.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_name: String,
    phone_number: String,
    address: String,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItemInput>) -> Order {
        Order {
            id: self.id,
            customer_name: self.customer_name,
            phone_number: self.phone_number,
            address: self.address,
            total_amount: Price::new(self.total_amount),
            items,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i32,
    product_id: ProductId,
    quantity: i32,
    size: String,
    color: String,
    price: Decimal,
}

impl OrderItemRow {
    fn into_item(self) -> Result<OrderItemInput, RepositoryError> {
        Ok(OrderItemInput {
            product_id: self.product_id,
            quantity: u32::try_from(self.quantity).map_err(|_| {
                RepositoryError::DataCorruption(format!(
                    "order item quantity {} is negative",
                    self.quantity
                ))
            })?,
            size: self.size,
            color: self.color,
            price: Price::new(self.price),
        })
    }
}
