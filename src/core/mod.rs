// src/core/mod.rs — Test execution and evaluation pipeline

pub mod catalog;
pub mod evaluator;
pub mod invoker;
pub mod orchestrator;
pub mod report;
pub mod store;
pub mod types;
