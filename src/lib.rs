pub mod cart;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repo;
pub mod routes;
pub mod services;
