#[macro_use]
extern crate rust_i18n;

pub mod components;
pub mod config;
pub mod error;
pub mod seed;
pub mod service;
pub mod startup;
pub mod utils;

pub use service::AttendanceService;

// Initialize i18n
i18n!("locales", fallback = "en");
