pub mod product_repository;
