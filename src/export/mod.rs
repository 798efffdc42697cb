mod balances;
mod engine;

pub use engine::{ExportContext, ExportEngine, collect};
