use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_query::Iden;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// The Product ID
    #[schema(example = 1)]
    pub id: i64,
    /// The Product name
    #[schema(example = "Monitor Curvo 49 Pulgadas")]
    pub name: String,
    /// The price, two decimal places
    #[schema(value_type = String, example = "399.00")]
    pub price: Decimal,
    /// The product availability
    #[schema(example = true)]
    pub availability: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 商品表结构
#[derive(Debug, Clone, Copy, Iden)]
pub enum Products {
    #[iden = "products"]
    Table,
    Id,
    Name,
    Price,
    Availability,
    CreatedAt,
    UpdatedAt,
}

/// Rounds half away from zero to the `DECIMAL(10,2)` column scale, as MySQL
/// does on insert, so `50` reads back as `50.00`.
pub fn to_cents(price: Decimal) -> Decimal {
    let mut price = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(2);
    price
}

/// Fields of a product that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub availability: bool,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal, availability: Option<bool>) -> Self {
        Self {
            name: name.into(),
            price: to_cents(price),
            availability: availability.unwrap_or(true),
        }
    }
}

/// Column overwrites for an existing product; `None` leaves a column alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub availability: Option<bool>,
}

impl ProductChanges {
    /// Replaces every mutable column.
    pub fn replace(name: impl Into<String>, price: Decimal, availability: bool) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(to_cents(price)),
            availability: Some(availability),
        }
    }

    pub fn availability(availability: bool) -> Self {
        Self {
            availability: Some(availability),
            ..Self::default()
        }
    }

    /// Applies the changes to an in-memory record.
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(availability) = self.availability {
            product.availability = availability;
        }
        product.updated_at = now;
    }
}
