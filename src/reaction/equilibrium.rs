//! Ideal-gas chemical equilibrium by Gibbs energy minimisation.
//!
//! The element-potential formulation of Gordon & McBride (NASA RP-1311) is used: at fixed
//! temperature and pressure the Newton step for the log-moles of every species is written in
//! terms of one Lagrange multiplier per element plus the correction of the total moles, which
//! leaves a dense `(elements + 1)` linear system per iteration. Log-moles are stored so that
//! trace species never underflow to exactly zero.
//!
//! Constant enthalpy problems wrap the fixed-temperature solve in a bracketed search on the
//! temperature, warm starting every inner solve from the previous composition.

#![allow(non_snake_case)]

use super::gas::Mechanism;
use crate::error::{CombustionError, Result};
use crate::numerics::root_solvers;
use crate::R;
use nalgebra::{DMatrix, DVector};
use ndarray::prelude::*;

/// Reference pressure of the standard-state Gibbs energies [Pa]
pub const P_REF: f64 = 101325.0;

// ln(1e-8): species above this mole fraction limit the step size
const LN_MAJOR: f64 = -18.420681;
// -ln(1e-4): largest growth allowed for a minor species in one step
const LN_MINOR_STEP: f64 = 9.2103404;
// ln(1e-10): species below this mole fraction are ignored by the per-species check
const LN_TRACE: f64 = -23.025851;
const CONVERGENCE: f64 = 0.5e-5;
const TRACE_CONVERGENCE: f64 = 1e-4;
const ELEMENT_TOLERANCE: f64 = 1e-6;
// initial guess: 0.1 kmol/kg spread over the active species
const INITIAL_MOLES: f64 = 100.0;
const HP_TEMPERATURE_TOLERANCE: f64 = 1e-10;
const HP_MAX_ITERATIONS: usize = 200;

/// Property pair held constant while equilibrating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquilibriumMode {
    /// fixed temperature and pressure
    TP,
    /// fixed enthalpy and pressure (adiabatic, isobaric)
    HP,
}

/// Result of an equilibrium calculation. Moles are per kg of mixture.
#[derive(Debug, Clone)]
pub struct EquilibriumState {
    pub temperature: f64,
    pub pressure: f64,
    pub ln_moles: Array1<f64>,
    /// Newton iterations summed over every fixed-temperature solve
    pub iterations: usize,
}

impl EquilibriumState {
    pub fn moles(&self) -> Array1<f64> {
        self.ln_moles.mapv(f64::exp)
    }

    pub fn mole_fractions(&self) -> Array1<f64> {
        let moles = self.moles();
        let total = moles.sum();
        moles / total
    }
}

pub struct EquilibriumSolver<'a> {
    mechanism: &'a Mechanism,
    /// indexes of the elements present in the mixture
    elements: Vec<usize>,
    /// element abundances [mol/kg], same order as `elements`
    element_moles: Array1<f64>,
    active: Vec<bool>,
    max_iterations: usize,
}

impl<'a> EquilibriumSolver<'a> {
    /// Prepares a solver for the elemental composition of `mol_frac`
    pub fn new(mechanism: &'a Mechanism, mol_frac: &Array1<f64>) -> Result<EquilibriumSolver<'a>> {
        let molar_mass = mol_frac.dot(&mechanism.molar_weight);
        if !(molar_mass > 0.0) {
            return Err(CombustionError::InvalidInput(
                "mixture has no mass: mole fractions are all zero".to_string(),
            ));
        }
        let all_element_moles = mechanism.formula.t().dot(mol_frac) / molar_mass;
        let elements: Vec<usize> = (0..mechanism.elements.len())
            .filter(|&k| all_element_moles[k] > 0.0)
            .collect();
        let element_moles = Array1::from(elements.iter().map(|&k| all_element_moles[k]).collect::<Vec<f64>>());

        // species carrying an absent element cannot form
        let active: Vec<bool> = (0..mechanism.species.len())
            .map(|j| {
                (0..mechanism.elements.len())
                    .all(|k| mechanism.formula[[j, k]] == 0.0 || all_element_moles[k] > 0.0)
            })
            .collect();

        Ok(EquilibriumSolver {
            mechanism,
            elements,
            element_moles,
            active,
            max_iterations: 500,
        })
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Equilibrium composition at fixed temperature and pressure.
    /// `guess` holds log-moles from an earlier solution of the same mixture.
    pub fn solve_tp(&self, T: f64, P: f64, guess: Option<&Array1<f64>>) -> Result<EquilibriumState> {
        if !(T > 0.0) || !(P > 0.0) {
            return Err(CombustionError::InvalidInput(format!(
                "temperature and pressure must be positive: T = {}, P = {}",
                T, P
            )));
        }
        let ns = self.mechanism.species.len();
        let ne = self.elements.len();
        let a = |j: usize, k: usize| self.mechanism.formula[[j, self.elements[k]]];

        if let Some(nasa) = self.mechanism.thermo.iter().find(|nasa| !nasa.is_in_range(T)) {
            log::debug!("{} K is outside the thermo range of {}, extrapolating", T, nasa.specie());
        }
        let g_RT: Vec<f64> = self.mechanism.thermo.iter().map(|nasa| nasa.g_RT(T)).collect();
        let ln_P = (P / P_REF).ln();

        let mut ln_nj = match guess {
            Some(guess) if guess.len() == ns => guess.clone(),
            _ => {
                let num_active = self.active.iter().filter(|&&a| a).count() as f64;
                Array::from_elem(ns, (INITIAL_MOLES / num_active).ln())
            }
        };
        for j in 0..ns {
            if !self.active[j] {
                ln_nj[j] = f64::NEG_INFINITY;
            }
        }
        let mut ln_n = ln_nj.iter().map(|v| v.exp()).sum::<f64>().ln();
        let b_max = self.element_moles.iter().cloned().fold(0.0, f64::max);

        for iteration in 1..=self.max_iterations {
            let n = ln_n.exp();
            let nj: Vec<f64> = ln_nj.iter().map(|v| v.exp()).collect();
            let sum_nj: f64 = nj.iter().sum();
            let mu: Vec<f64> = (0..ns)
                .map(|j| if self.active[j] { g_RT[j] + ln_nj[j] - ln_n + ln_P } else { 0.0 })
                .collect();

            // reduced Newton system: element potentials and total-moles correction
            let mut jacobian = DMatrix::<f64>::zeros(ne + 1, ne + 1);
            let mut rhs = DVector::<f64>::zeros(ne + 1);
            for k in 0..ne {
                let mut b_k = 0.0;
                let mut a_n_mu = 0.0;
                for j in (0..ns).filter(|&j| self.active[j]) {
                    let akj_nj = a(j, k) * nj[j];
                    for i in 0..ne {
                        jacobian[(k, i)] += akj_nj * a(j, i);
                    }
                    b_k += akj_nj;
                    a_n_mu += akj_nj * mu[j];
                }
                jacobian[(k, ne)] = b_k;
                jacobian[(ne, k)] = b_k;
                rhs[k] = self.element_moles[k] - b_k + a_n_mu;
            }
            jacobian[(ne, ne)] = sum_nj - n;
            rhs[ne] = n - sum_nj + (0..ns).map(|j| nj[j] * mu[j]).sum::<f64>();

            let solution = jacobian.lu().solve(&rhs).ok_or_else(|| CombustionError::Convergence {
                solver: "equilibrium",
                message: format!("singular Jacobian at T = {} K", T),
            })?;
            let d_ln_n = solution[ne];
            let d_ln_nj: Vec<f64> = (0..ns)
                .map(|j| {
                    if self.active[j] {
                        -mu[j] + (0..ne).map(|i| a(j, i) * solution[i]).sum::<f64>() + d_ln_n
                    } else {
                        0.0
                    }
                })
                .collect();
            if d_ln_nj.iter().any(|d| !d.is_finite()) || !d_ln_n.is_finite() {
                return Err(CombustionError::Convergence {
                    solver: "equilibrium",
                    message: format!("non-finite Newton step at T = {} K", T),
                });
            }

            if self.is_converged(&ln_nj, ln_n, &nj, sum_nj, &d_ln_nj, d_ln_n, b_max) {
                log::debug!("TP equilibrium at {:.2} K converged in {} iterations", T, iteration);
                return Ok(EquilibriumState {
                    temperature: T,
                    pressure: P,
                    ln_moles: ln_nj,
                    iterations: iteration,
                });
            }

            let lambda = self.damping(&ln_nj, ln_n, &d_ln_nj, d_ln_n);
            for j in (0..ns).filter(|&j| self.active[j]) {
                ln_nj[j] += lambda * d_ln_nj[j];
            }
            ln_n += lambda * d_ln_n;
        }

        Err(CombustionError::Convergence {
            solver: "equilibrium",
            message: format!("TP solve at T = {} K exceeded {} iterations", T, self.max_iterations),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn is_converged(
        &self,
        ln_nj: &Array1<f64>,
        ln_n: f64,
        nj: &[f64],
        sum_nj: f64,
        d_ln_nj: &[f64],
        d_ln_n: f64,
        b_max: f64,
    ) -> bool {
        let n = ln_n.exp();
        if n * d_ln_n.abs() / sum_nj > CONVERGENCE {
            return false;
        }
        for j in (0..nj.len()).filter(|&j| self.active[j]) {
            if nj[j] * d_ln_nj[j].abs() / sum_nj > CONVERGENCE {
                return false;
            }
            // minor species must settle too, unless they stay below the trace level
            let ln_x = ln_nj[j] - ln_n;
            let is_trace = ln_x < LN_TRACE && ln_x + d_ln_nj[j] < LN_TRACE;
            if d_ln_nj[j].abs() > TRACE_CONVERGENCE && !is_trace {
                return false;
            }
        }
        for k in 0..self.elements.len() {
            let b_k: f64 = (0..nj.len())
                .map(|j| self.mechanism.formula[[j, self.elements[k]]] * nj[j])
                .sum();
            if (self.element_moles[k] - b_k).abs() > ELEMENT_TOLERANCE * b_max {
                return false;
            }
        }
        true
    }

    fn damping(&self, ln_nj: &Array1<f64>, ln_n: f64, d_ln_nj: &[f64], d_ln_n: f64) -> f64 {
        let mut largest = 5.0 * d_ln_n.abs();
        let mut lambda_minor: f64 = 1.0;
        for j in (0..d_ln_nj.len()).filter(|&j| self.active[j]) {
            let ln_x = ln_nj[j] - ln_n;
            if ln_x > LN_MAJOR {
                largest = largest.max(d_ln_nj[j].abs());
            } else if d_ln_nj[j] >= 0.0 && d_ln_nj[j] != d_ln_n {
                lambda_minor = lambda_minor.min(((-ln_x - LN_MINOR_STEP) / (d_ln_nj[j] - d_ln_n)).abs());
            }
        }
        let lambda_major = if largest > 0.0 { 2.0 / largest } else { 1.0 };
        1f64.min(lambda_major).min(lambda_minor)
    }

    /// Mixture enthalpy [J/kg] of an equilibrium state
    pub fn enthalpy(&self, state: &EquilibriumState) -> f64 {
        let X = state.mole_fractions();
        let T = state.temperature;
        let h_RT: Array1<f64> = self.mechanism.thermo.iter().map(|nasa| nasa.h_RT(T)).collect();
        R * T * X.dot(&h_RT) / X.dot(&self.mechanism.molar_weight)
    }

    /// Equilibrium at fixed specific enthalpy `h` [J/kg] and pressure.
    /// The temperature is searched between `T_low` and `T_high`.
    pub fn solve_hp(&self, h: f64, P: f64, T_low: f64, T_high: f64) -> Result<EquilibriumState> {
        let mut last: Option<Array1<f64>> = None;
        let mut iterations = 0;
        let T = {
            let residual = |T: f64| -> Result<f64> {
                let state = self.solve_tp(T, P, last.as_ref())?;
                iterations += state.iterations;
                let r = self.enthalpy(&state) - h;
                last = Some(state.ln_moles);
                Ok(r)
            };
            root_solvers::illinois(residual, T_low, T_high, HP_TEMPERATURE_TOLERANCE, HP_MAX_ITERATIONS)?
        };
        let mut state = self.solve_tp(T, P, last.as_ref())?;
        state.iterations += iterations;
        log::debug!("HP equilibrium converged at {:.2} K ({} Newton iterations)", T, state.iterations);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::gas::Gas;
    use approx::assert_relative_eq;

    const AIR: &str = "O2:0.21, N2:0.79";

    fn methane_air(T: f64) -> Gas {
        let mut gas = Gas::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/gri30_cog.json")).unwrap();
        gas.TP(T, P_REF).unwrap();
        gas.set_equivalence_ratio(1.0, "CH4:1", AIR).unwrap();
        gas
    }

    fn fraction(gas: &Gas, state: &EquilibriumState, name: &str) -> f64 {
        state.mole_fractions()[gas.species_index(name).unwrap()]
    }

    #[test]
    fn cold_stoichiometric_methane_burns_completely() {
        let gas = methane_air(298.15);
        let solver = EquilibriumSolver::new(gas.mechanism(), gas.mole_frac()).unwrap();
        let state = solver.solve_tp(298.15, P_REF, None).unwrap();
        // CH4 + 2 O2 + 7.52 N2 -> CO2 + 2 H2O + 7.52 N2
        let total = 3.0 + 2.0 * 0.79 / 0.21;
        assert_relative_eq!(fraction(&gas, &state, "CO2"), 1.0 / total, max_relative = 1e-4);
        assert_relative_eq!(fraction(&gas, &state, "H2O"), 2.0 / total, max_relative = 1e-4);
        assert!(fraction(&gas, &state, "CH4") < 1e-12);
        assert!(fraction(&gas, &state, "CO") < 1e-12);
    }

    #[test]
    fn elements_are_conserved() {
        let gas = methane_air(2500.0);
        let solver = EquilibriumSolver::new(gas.mechanism(), gas.mole_frac()).unwrap();
        let state = solver.solve_tp(2500.0, P_REF, None).unwrap();
        let mechanism = gas.mechanism();
        let b = mechanism.formula.t().dot(&state.moles());
        let b_ref = mechanism.formula.t().dot(gas.mole_frac()) / gas.M();
        for k in 0..mechanism.elements.len() {
            assert_relative_eq!(b[k], b_ref[k], max_relative = 1e-4, epsilon = 1e-12);
        }
    }

    #[test]
    fn hot_products_dissociate() {
        let gas = methane_air(3000.0);
        let solver = EquilibriumSolver::new(gas.mechanism(), gas.mole_frac()).unwrap();
        let state = solver.solve_tp(3000.0, P_REF, None).unwrap();
        assert!(fraction(&gas, &state, "CO") > 1e-2);
        assert!(fraction(&gas, &state, "OH") > 1e-3);
        assert!(fraction(&gas, &state, "NO") > 1e-3);
    }

    #[test]
    fn warm_start_gives_same_state() {
        let gas = methane_air(2200.0);
        let solver = EquilibriumSolver::new(gas.mechanism(), gas.mole_frac()).unwrap();
        let first = solver.solve_tp(2200.0, P_REF, None).unwrap();
        let again = solver.solve_tp(2200.0, P_REF, Some(&first.ln_moles)).unwrap();
        assert!(again.iterations < first.iterations);
        assert_relative_eq!(
            fraction(&gas, &again, "NO"),
            fraction(&gas, &first, "NO"),
            max_relative = 1e-3
        );
    }

    #[test]
    fn constant_enthalpy_solve_keeps_enthalpy() {
        let gas = methane_air(300.0);
        let solver = EquilibriumSolver::new(gas.mechanism(), gas.mole_frac()).unwrap();
        let state = solver.solve_hp(gas.h(), P_REF, 200.0, 5000.0).unwrap();
        assert_relative_eq!(solver.enthalpy(&state), gas.h(), epsilon = 1e-3 * gas.h().abs().max(1.0));
        assert!(state.temperature > 2100.0 && state.temperature < 2300.0);
    }

    #[test]
    fn iteration_limit_is_reported() {
        let gas = methane_air(2000.0);
        let solver = EquilibriumSolver::new(gas.mechanism(), gas.mole_frac())
            .unwrap()
            .with_max_iterations(1);
        match solver.solve_tp(2000.0, P_REF, None) {
            Err(CombustionError::Convergence { solver, .. }) => assert_eq!(solver, "equilibrium"),
            other => panic!("expected a convergence error, got {:?}", other),
        }
    }

    #[test]
    fn empty_mixture_is_rejected() {
        let gas = methane_air(300.0);
        let zeros = Array1::zeros(gas.species().len());
        assert!(EquilibriumSolver::new(gas.mechanism(), &zeros).is_err());
    }
}
