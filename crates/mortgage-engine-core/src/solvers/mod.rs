pub mod affordability;
pub mod term;

pub use affordability::{max_loan_for_budget, DEFAULT_MAX_YEARS};
pub use term::{
    is_unrealistic_term, solve_term_from_payment, INFINITE_TERM_YEARS, UNREALISTIC_TERM_YEARS,
};
