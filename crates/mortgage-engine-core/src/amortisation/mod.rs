pub mod cache;
pub mod schedule;
pub mod summary;

pub use schedule::{
    analyze_mortgage, simulate, simulate_params, MonthlyDataPoint, MortgageAnalysis,
    MortgageInput, MortgageResult, SimulationParams, BALANCE_EPSILON, ITERATION_CAP_FACTOR,
};
pub use summary::{yearly_summary, YearSummary};
