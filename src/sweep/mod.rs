//! Equivalence-ratio sweep: adiabatic flame temperature, equilibrium emissions and enthalpy change
pub mod config;
pub mod heating_value;
pub mod report;

use crate::error::Result;
use crate::reaction::equilibrium::EquilibriumMode;
use crate::reaction::gas::Gas;
use config::CaseConfig;

/// Results at one equivalence ratio. Failed points hold NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub phi: f64,
    pub adiabatic_temperature: f64, // [K]
    pub enthalpy_change: f64,       // [MJ/kg] - inlet mixture minus TP-equilibrium mixture
    pub co_ppm: f64,
    pub nox_ppm: f64,
    pub co2_ppm: f64,
}

impl SweepPoint {
    pub fn failed(phi: f64) -> SweepPoint {
        SweepPoint {
            phi,
            adiabatic_temperature: f64::NAN,
            enthalpy_change: f64::NAN,
            co_ppm: f64::NAN,
            nox_ppm: f64::NAN,
            co2_ppm: f64::NAN,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.adiabatic_temperature.is_nan()
    }
}

#[derive(Debug, Clone)]
pub enum PointOutcome {
    Converged(SweepPoint),
    Failed { phi: f64, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct Sweep {
    pub points: Vec<SweepPoint>,
}

impl Sweep {
    pub fn phi(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.phi).collect()
    }

    pub fn adiabatic_temperature(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.adiabatic_temperature).collect()
    }

    pub fn enthalpy_change(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.enthalpy_change).collect()
    }

    pub fn co_ppm(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.co_ppm).collect()
    }

    pub fn nox_ppm(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.nox_ppm).collect()
    }

    pub fn co2_ppm(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.co2_ppm).collect()
    }

    pub fn num_failed(&self) -> usize {
        self.points.iter().filter(|p| p.is_failed()).count()
    }
}

/// Evaluates one equivalence ratio. `gas` is left in the TP-equilibrium state.
#[allow(non_snake_case)]
pub fn evaluate_point(gas: &mut Gas, case: &CaseConfig, phi: f64) -> Result<SweepPoint> {
    let (T0, P0) = (case.inlet_temperature, case.pressure);

    gas.set_equivalence_ratio(phi, &case.fuel, &case.oxidizer)?;
    gas.TP(T0, P0)?;
    let h_i = gas.h();
    gas.equilibrate(EquilibriumMode::HP)?;
    let adiabatic_temperature = gas.T();
    let co_ppm = gas.mole_frac_of("CO") * 1e6;
    let nox_ppm = case.nox_species.iter().map(|s| gas.mole_frac_of(s)).sum::<f64>() * 1e6;
    let co2_ppm = gas.mole_frac_of("CO2") * 1e6;

    gas.set_equivalence_ratio(phi, &case.fuel, &case.oxidizer)?;
    gas.TP(T0, P0)?;
    gas.equilibrate(EquilibriumMode::TP)?;
    let h_f = gas.h();

    Ok(SweepPoint {
        phi,
        adiabatic_temperature,
        enthalpy_change: (h_i - h_f) / 1e6,
        co_ppm,
        nox_ppm,
        co2_ppm,
    })
}

/// Runs the sweep over `case.phi_range()`. A failed point does not stop the sweep: it is logged,
/// reported through `on_point` and stored as NaN.
pub fn run_sweep<F>(gas: &mut Gas, case: &CaseConfig, mut on_point: F) -> Result<Sweep>
where
    F: FnMut(&PointOutcome),
{
    case.validate()?;
    for name in case.nox_species.iter() {
        if gas.species_index(name).is_none() {
            log::warn!("NOx species {} is not in mechanism {}; counted as zero", name, gas.name());
        }
    }
    log::info!(
        "sweeping phi from {} to {} (step {}) at {} K, {} Pa",
        case.phi_start,
        case.phi_stop,
        case.phi_step,
        case.inlet_temperature,
        case.pressure
    );

    let mut sweep = Sweep::default();
    for phi in case.phi_range() {
        let outcome = match evaluate_point(gas, case, phi) {
            Ok(point) => {
                sweep.points.push(point);
                PointOutcome::Converged(point)
            }
            Err(err) => {
                log::warn!("combustion failed at phi = {:.2}: {}", phi, err);
                sweep.points.push(SweepPoint::failed(phi));
                PointOutcome::Failed {
                    phi,
                    message: err.to_string(),
                }
            }
        };
        on_point(&outcome);
    }
    log::info!(
        "sweep finished: {} points, {} failed",
        sweep.points.len(),
        sweep.num_failed()
    );
    Ok(sweep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_point_is_all_nan() {
        let point = SweepPoint::failed(0.7);
        assert!(point.is_failed());
        assert!(point.co_ppm.is_nan() && point.nox_ppm.is_nan() && point.co2_ppm.is_nan());
        assert!(point.enthalpy_change.is_nan());
        assert_eq!(point.phi, 0.7);
    }

    #[test]
    fn series_follow_point_order() {
        let sweep = Sweep {
            points: vec![
                SweepPoint {
                    phi: 0.5,
                    adiabatic_temperature: 2000.0,
                    enthalpy_change: 1.0,
                    co_ppm: 1.0,
                    nox_ppm: 2.0,
                    co2_ppm: 3.0,
                },
                SweepPoint::failed(0.6),
            ],
        };
        assert_eq!(sweep.phi(), vec![0.5, 0.6]);
        assert_eq!(sweep.adiabatic_temperature()[0], 2000.0);
        assert!(sweep.nox_ppm()[1].is_nan());
        assert_eq!(sweep.num_failed(), 1);
    }
}
