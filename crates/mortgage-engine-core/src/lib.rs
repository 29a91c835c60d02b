pub mod amortisation;
pub mod annuity;
pub mod classification;
pub mod error;
pub mod scenario;
pub mod solvers;
pub mod types;

#[cfg(feature = "currency")]
pub mod currency;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use amortisation::{simulate, MonthlyDataPoint, MortgageResult, SimulationParams};
pub use error::MortgageEngineError;
pub use solvers::{max_loan_for_budget, solve_term_from_payment};
pub use types::*;

/// Standard result type for all mortgage-engine operations
pub type EngineResult<T> = Result<T, MortgageEngineError>;
