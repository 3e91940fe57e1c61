use crate::error::{CombustionError, Result};
use serde::{Deserialize, Serialize};

/// Inputs of an equivalence-ratio sweep. Read from a `.json` case file; missing fields take the
/// coke-oven gas defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CaseConfig {
    pub fuel: String,
    pub oxidizer: String,
    pub inlet_temperature: f64, // [K]
    pub pressure: f64,          // [Pa]
    pub phi_start: f64,
    pub phi_stop: f64,
    pub phi_step: f64,
    /// species summed into the NOx column
    pub nox_species: Vec<String>,
}

impl Default for CaseConfig {
    fn default() -> Self {
        CaseConfig {
            fuel: "C2H6:0.015, C2H4:0.015, CH4:0.25, H2:0.56, CO:0.08, CO2:0.03, O2:0.005, N2:0.045"
                .to_string(),
            oxidizer: "O2:0.21, N2:0.79".to_string(),
            inlet_temperature: 1100.0,
            pressure: 101325.0,
            phi_start: 0.5,
            phi_stop: 1.51,
            phi_step: 0.1,
            nox_species: vec!["NO".to_string(), "NO2".to_string(), "N2O".to_string()],
        }
    }
}

impl CaseConfig {
    pub fn from_file(file_name: &str) -> Result<CaseConfig> {
        let json_file = std::fs::read_to_string(file_name).map_err(|source| CombustionError::Io {
            path: file_name.to_string(),
            source,
        })?;
        let case: CaseConfig = serde_json::from_str(&json_file).map_err(|source| CombustionError::Json {
            path: file_name.to_string(),
            source,
        })?;
        case.validate()?;
        Ok(case)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.inlet_temperature > 0.0) {
            return Err(CombustionError::InvalidInput(format!(
                "`inlet_temperature` must be positive: {}",
                self.inlet_temperature
            )));
        }
        if !(self.pressure > 0.0) {
            return Err(CombustionError::InvalidInput(format!(
                "`pressure` must be positive: {}",
                self.pressure
            )));
        }
        if !(self.phi_step > 0.0) || !(self.phi_start > 0.0) || !(self.phi_stop > self.phi_start) {
            return Err(CombustionError::InvalidInput(format!(
                "equivalence ratios must satisfy 0 < phi_start < phi_stop and phi_step > 0: {} {} {}",
                self.phi_start, self.phi_stop, self.phi_step
            )));
        }
        Ok(())
    }

    /// Equivalence ratios from `phi_start` up to, but excluding, `phi_stop`
    pub fn phi_range(&self) -> Vec<f64> {
        let len = ((self.phi_stop - self.phi_start) / self.phi_step).ceil().max(0.0) as usize;
        (0..len).map(|i| self.phi_start + i as f64 * self.phi_step).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_range_has_eleven_points() {
        let range = CaseConfig::default().phi_range();
        assert_eq!(range.len(), 11);
        assert_relative_eq!(range[0], 0.5);
        assert_relative_eq!(range[10], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn stop_is_excluded() {
        let case = CaseConfig {
            phi_start: 0.8,
            phi_stop: 1.2,
            phi_step: 0.2,
            ..CaseConfig::default()
        };
        assert_eq!(case.phi_range().len(), 2);
    }

    #[test]
    fn partial_case_file_uses_defaults() {
        let case: CaseConfig = serde_json::from_str(r#"{"inlet_temperature": 300.0}"#).unwrap();
        assert_eq!(case.inlet_temperature, 300.0);
        assert_eq!(case.oxidizer, "O2:0.21, N2:0.79");
        assert_eq!(case.nox_species.len(), 3);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let case = CaseConfig {
            phi_step: 0.0,
            ..CaseConfig::default()
        };
        assert!(case.validate().is_err());
        let case = CaseConfig {
            pressure: -1.0,
            ..CaseConfig::default()
        };
        assert!(case.validate().is_err());
    }
}
