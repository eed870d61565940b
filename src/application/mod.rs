//! Application services layer.

pub mod auth;
pub mod chrome;
pub mod console;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod render;
pub mod repos;
pub mod robots;
pub mod uploads;
