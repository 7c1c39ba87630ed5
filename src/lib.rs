// Library exports for the rinkplan CLI
// This allows testing of internal modules

pub mod api;
pub mod commands;
pub mod config;
pub mod form;
pub mod models;
pub mod timefmt;
