//! # cog_flame
//!
//! The `cog_flame` crate sweeps the equivalence ratio of a fuel gas burnt with air and reports,
//! at each point, the adiabatic flame temperature, the equilibrium CO/NOx/CO2 content of the
//! products and the enthalpy released by equilibrating at the inlet temperature. Heating values of
//! the fuel and three stacked charts complete the study. The default case is a coke-oven gas
//! preheated to 1100 K.
//!
//! Species thermodynamics come from NASA 7-coefficient polynomials stored in a `.json`
//! mechanism file; equilibrium states are found by Gibbs energy minimisation of an ideal-gas
//! mixture.
//!
//! The bundled `data/gri30_cog.json` holds an 18-species H/C/N/O subset of GRI-Mech 3.0
//! (no Ar, HCN, NH3, C2H2, CH2O, ...). Lean and stoichiometric results match the full mechanism
//! closely; rich-side emissions can differ slightly from a full GRI-Mech 3.0 calculation.
//!
//! ```no_run
//! use cog_flame::{Gas, CaseConfig, sweep};
//!
//! let mut gas = Gas::new("data/gri30_cog.json").unwrap();
//! let case = CaseConfig::default();
//! let results = sweep::run_sweep(&mut gas, &case, |_| {}).unwrap();
//! println!("{:?}", results.adiabatic_temperature());
//! ```

pub mod error;
pub mod numerics;
pub mod plot;
mod reaction;
pub mod sweep;

// Re-exporting
pub use crate::error::{CombustionError, Result};
pub use crate::reaction::composition;
pub use crate::reaction::equilibrium::{self, EquilibriumMode, EquilibriumSolver, EquilibriumState};
pub use crate::reaction::gas::{Gas, Mechanism};
pub use crate::reaction::thermo::Nasa7;
pub use crate::sweep::config::CaseConfig;
pub use crate::sweep::heating_value::HeatingValues;
pub use crate::sweep::{Sweep, SweepPoint};

/// Universal gas constant [J/(mol.K)]
pub const R: f64 = 8.314462618;
