pub mod docs;
pub mod products;
pub mod rules;
