//! Per-route rule sets for the products resource.

use crate::validation::checks::{is_boolean, is_int, is_numeric, is_positive, not_empty};
use crate::validation::RuleSet;

pub const INVALID_ID: &str = "ID must be a Integer";
pub const NAME_REQUIRED: &str = "Name is required";
pub const PRICE_NOT_NUMBER: &str = "Price must be a number";
pub const PRICE_REQUIRED: &str = "Price is required";
pub const PRICE_NOT_POSITIVE: &str = "Price must be greater than zero";
pub const AVAILABILITY_NOT_BOOLEAN: &str = "Availability must be a boolean";

fn with_id(rules: RuleSet) -> RuleSet {
    rules.param("id", is_int, INVALID_ID)
}

fn with_name_and_price(rules: RuleSet) -> RuleSet {
    rules
        .body("name", not_empty, NAME_REQUIRED)
        .body("price", is_numeric, PRICE_NOT_NUMBER)
        .body("price", not_empty, PRICE_REQUIRED)
        .body("price", is_positive, PRICE_NOT_POSITIVE)
}

fn with_availability(rules: RuleSet) -> RuleSet {
    rules.body("availability", is_boolean, AVAILABILITY_NOT_BOOLEAN)
}

/// `GET /:id` and `DELETE /:id`
pub fn product_id() -> RuleSet {
    with_id(RuleSet::new())
}

/// `POST /`
pub fn create_product() -> RuleSet {
    with_name_and_price(RuleSet::new())
}

/// `PUT /:id`
pub fn update_product() -> RuleSet {
    with_availability(with_name_and_price(with_id(RuleSet::new())))
}

/// `PATCH /:id`
pub fn update_availability() -> RuleSet {
    with_availability(with_id(RuleSet::new()))
}
