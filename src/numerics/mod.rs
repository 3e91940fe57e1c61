//! Numerical methods used by the equilibrium solvers
pub mod root_solvers;
