//! Contains **Gas** struct and all elements related to chemical equilibrium
pub mod composition;
pub mod equilibrium;
pub mod gas;
mod json_data;
pub mod thermo;
