pub mod auth;
pub mod config;
pub mod db;
pub mod http;
pub mod kafka;
pub mod rate_client;
pub mod repositories;
pub mod state;
pub mod sweeper_task;
