//! Infrastructure layer (adapters/implementations).
//!
//! This module contains the IO-heavy parts: the SQLite store and the
//! application data directory / config file.

pub mod app_config;
pub mod db;
