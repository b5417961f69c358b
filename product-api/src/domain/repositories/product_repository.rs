use async_trait::async_trait;
use chrono::Utc;
use sea_query::{ConditionalStatement, Expr, MysqlQueryBuilder, Order, Query, SelectStatement, SimpleExpr};
use sea_query_binder::SqlxBinder;
use sqlx::MySqlPool;
use tracing::debug;

use crate::domain::models::product::{NewProduct, Product, ProductChanges, Products};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Storage operations for products. Implementations return plain records;
/// callers never hold a live row.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by id.
    async fn find_all(&self, order: SortOrder) -> Result<Vec<Product>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError>;
    /// Stores a new product and returns it with its assigned id.
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError>;
    /// Overwrites the given columns. `None` when no row has this id.
    async fn update_fields(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>, AppError>;
    /// Hard delete. `false` when no row had this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

pub struct MySqlProductRepository {
    pool: MySqlPool,
}

impl MySqlProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn select() -> SelectStatement {
        Query::select()
            .columns([
                Products::Id,
                Products::Name,
                Products::Price,
                Products::Availability,
                Products::CreatedAt,
                Products::UpdatedAt,
            ])
            .from(Products::Table)
            .to_owned()
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn find_all(&self, order: SortOrder) -> Result<Vec<Product>, AppError> {
        let (sql, values) = Self::select()
            .order_by(Products::Id, order.into())
            .build_sqlx(MysqlQueryBuilder);
        debug!("执行SQL: {}", sql);

        let products = sqlx::query_as_with::<_, Product, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(Products::Id).eq(id))
            .build_sqlx(MysqlQueryBuilder);
        debug!("执行SQL: {}, values:{:?}", sql, values);

        let product = sqlx::query_as_with::<_, Product, _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let now = Utc::now();

        let mut insert = Query::insert();
        insert
            .into_table(Products::Table)
            .columns([
                Products::Name,
                Products::Price,
                Products::Availability,
                Products::CreatedAt,
                Products::UpdatedAt,
            ])
            .values([
                product.name.into(),
                product.price.into(),
                product.availability.into(),
                now.into(),
                now.into(),
            ])?;

        let (sql, values) = insert.build_sqlx(MysqlQueryBuilder);
        debug!("执行SQL: {}, values:{:?}", sql, values);

        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;
        let id = result.last_insert_id() as i64;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Product {} vanished after insert", id)))
    }

    async fn update_fields(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>, AppError> {
        let mut columns: Vec<(Products, SimpleExpr)> = Vec::new();
        if let Some(name) = changes.name {
            columns.push((Products::Name, name.into()));
        }
        if let Some(price) = changes.price {
            columns.push((Products::Price, price.into()));
        }
        if let Some(availability) = changes.availability {
            columns.push((Products::Availability, availability.into()));
        }
        columns.push((Products::UpdatedAt, Utc::now().into()));

        let (sql, values) = Query::update()
            .table(Products::Table)
            .values(columns)
            .and_where(Expr::col(Products::Id).eq(id))
            .build_sqlx(MysqlQueryBuilder);
        debug!("执行SQL: {}, values:{:?}", sql, values);

        // MySQL 只统计实际变更的行，这里以重新查询为准
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let (sql, values) = Query::delete()
            .from_table(Products::Table)
            .and_where(Expr::col(Products::Id).eq(id))
            .build_sqlx(MysqlQueryBuilder);
        debug!("执行SQL: {}, values:{:?}", sql, values);

        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
