pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
