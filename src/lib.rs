pub mod audit;
pub mod config;
pub mod costing;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod models;
pub mod money;
pub mod pricing;
pub mod reporting;
pub mod response;
pub mod routes;
pub mod services;
pub mod slug;
pub mod state;
