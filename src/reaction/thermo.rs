#![allow(non_snake_case)]

use crate::error::{CombustionError, Result};
use ndarray::prelude::*;

/// 7-coefficient NASA polynomial for one species, split at `Tmid`
#[derive(Debug, Clone)]
pub struct Nasa7 {
    specie: String,
    Tmin: f64,
    Tmid: f64,
    Tmax: f64,
    coeffs_low: Array1<f64>,
    coeffs_high: Array1<f64>,
}

impl Nasa7 {
    pub fn new(
        specie: String,
        Tmin: f64,
        Tmid: f64,
        Tmax: f64,
        coeffs_low: Array1<f64>,
        coeffs_high: Array1<f64>,
    ) -> Result<Nasa7> {
        if coeffs_low.len() != 7 || coeffs_high.len() != 7 {
            return Err(CombustionError::Mechanism(format!(
                "species {}: NASA polynomials need 7 coefficients, got {} and {}",
                specie,
                coeffs_low.len(),
                coeffs_high.len()
            )));
        }
        if !(Tmin < Tmid && Tmid < Tmax) {
            return Err(CombustionError::Mechanism(format!(
                "species {}: temperature ranges must be increasing, got [{}, {}, {}]",
                specie, Tmin, Tmid, Tmax
            )));
        }
        Ok(Nasa7 {
            specie,
            Tmin,
            Tmid,
            Tmax,
            coeffs_low,
            coeffs_high,
        })
    }

    /// Checks that cp/R, h/RT and s/R are continuous at `Tmid`
    pub fn validate(&self) -> Result<()> {
        let (cp_low, h_low, s_low) = Nasa7::calc_thermo_properties(&self.coeffs_low, self.Tmid);
        let (cp_high, h_high, s_high) = Nasa7::calc_thermo_properties(&self.coeffs_high, self.Tmid);

        let discontinuity = |property: &str, low: f64, high: f64| {
            CombustionError::Mechanism(format!(
                "for species {}, discontinuity in {} detected at Tmid = {}
                Value computed using low-temperature polynomial:  {}
                Value computed using high-temperature polynomial: {}",
                self.specie, property, self.Tmid, low, high
            ))
        };

        //cp
        if ((cp_low - cp_high) / (cp_low.abs() + 1.0E-4)).abs() > 0.01 {
            return Err(discontinuity("cp/R", cp_low, cp_high));
        }
        //enthalpy
        if (h_low - h_high).abs() / cp_low.abs() > 0.001 {
            return Err(discontinuity("h/RT", h_low, h_high));
        }
        //entropy
        if ((s_low - s_high) / (s_low.abs() + cp_low)).abs() > 0.001 {
            return Err(discontinuity("s/R", s_low, s_high));
        }
        Ok(())
    }

    /// Calculate non-dimensional cp, enthalpy and entropy for a given temperature using 4th order
    /// NASA polinomial
    pub fn calc_thermo_properties(coeff: &Array1<f64>, temp: f64) -> (f64, f64, f64) {
        let cT0 = coeff[0];
        let cT1 = coeff[1] * temp;
        let cT2 = coeff[2] * temp.powi(2);
        let cT3 = coeff[3] * temp.powi(3);
        let cT4 = coeff[4] * temp.powi(4);
        let cT5 = coeff[5] / temp;
        let cT6 = coeff[0] * temp.ln();

        let cp_R = cT0 + cT1 + cT2 + cT3 + cT4;
        let h_RT = cT0 + 0.5 * cT1 + 1.0 / 3.0 * cT2 + 0.25 * cT3 + 0.20 * cT4 + cT5;
        let s_R = cT6 + cT1 + 0.5 * cT2 + 1.0 / 3.0 * cT3 + 0.25 * cT4 + coeff[6];
        (cp_R, h_RT, s_R)
    }

    fn piece(&self, T: f64) -> &Array1<f64> {
        if T <= self.Tmid {
            &self.coeffs_low
        } else {
            &self.coeffs_high
        }
    }

    pub fn properties(&self, T: f64) -> (f64, f64, f64) {
        Nasa7::calc_thermo_properties(self.piece(T), T)
    }

    pub fn cp_R(&self, T: f64) -> f64 {
        self.properties(T).0
    }

    pub fn h_RT(&self, T: f64) -> f64 {
        self.properties(T).1
    }

    pub fn s_R(&self, T: f64) -> f64 {
        self.properties(T).2
    }

    /// Standard-state Gibbs energy g°/RT
    pub fn g_RT(&self, T: f64) -> f64 {
        let (_, h_RT, s_R) = self.properties(T);
        h_RT - s_R
    }

    pub fn is_in_range(&self, T: f64) -> bool {
        self.Tmin <= T && T <= self.Tmax
    }

    pub fn Tmin(&self) -> f64 {
        self.Tmin
    }

    pub fn Tmid(&self) -> f64 {
        self.Tmid
    }

    pub fn Tmax(&self) -> f64 {
        self.Tmax
    }

    pub fn specie(&self) -> &str {
        &self.specie
    }
}
