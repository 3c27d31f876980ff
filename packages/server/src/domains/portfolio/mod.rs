//! Canned portfolio optimization and return simulation. No real finance here.

pub mod optimize;
pub mod simulate;

pub use optimize::{optimize, Allocation, OptimizedPortfolio, RiskLevel};
pub use simulate::{simulate, SimulationMode, SimulationResult};
