pub mod log_errors;
pub mod validate;
