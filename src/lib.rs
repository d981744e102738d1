// src/lib.rs — Library root for promptbench

pub mod api;
pub mod core;
pub mod infra;
pub mod provider;
