pub mod admin;
pub mod context;
