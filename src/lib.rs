pub mod api;
pub mod app;
pub mod config;
pub mod countdown;
pub mod localization;
pub mod pages;
pub mod router;
pub mod storage;
pub mod telegram;
pub mod tracker;
pub mod utils;
