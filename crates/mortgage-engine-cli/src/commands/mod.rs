pub mod comparison;
pub mod currency;
pub mod mortgage;
pub mod scenario;
pub mod scenarios;
pub mod solvers;
