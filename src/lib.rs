pub mod app;
pub mod chat;
pub mod config;
pub mod dates;
pub mod error;
pub mod meals;
pub mod medications;
pub mod profile;
pub mod state;
pub mod store;
pub mod summary;
