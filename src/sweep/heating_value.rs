#![allow(non_snake_case)]

use crate::error::Result;
use crate::reaction::equilibrium::EquilibriumMode;
use crate::reaction::gas::Gas;

/// Reference state of the heating values
pub const T_REF: f64 = 298.15; // [K]
/// Normal conditions for volumetric values
pub const T_NORMAL: f64 = 273.15; // [K]
pub const P_NORMAL: f64 = 101325.0; // [Pa]
/// Latent heat of water at 298.15 K [J/mol]
pub const H2O_LATENT_HEAT: f64 = 44.0e3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatingValues {
    pub lhv_mass: f64,           // [MJ/kg]
    pub lhv_volume: f64,         // [MJ/Nm³]
    pub hhv_mass: f64,           // [MJ/kg]
    pub hhv_volume: f64,         // [MJ/Nm³]
    pub stoich_air_fuel_ratio: f64, // [kg air/kg fuel]
    pub fuel_density: f64,       // [kg/Nm³]
}

/// Heating values of `fuel` burnt with `oxidizer` at 298.15 K and 1 atm.
///
/// The stoichiometric mixture is brought to equilibrium at 298.15 K, so the products hold water
/// as vapour and the enthalpy released is the lower heating value. The higher heating value adds
/// the condensation enthalpy of the water formed.
pub fn heating_values(gas: &mut Gas, fuel: &str, oxidizer: &str) -> Result<HeatingValues> {
    let stoich_air_fuel_ratio = gas.stoich_air_fuel_ratio(fuel, oxidizer)?;
    let fuel_mass_frac = 1.0 / (1.0 + stoich_air_fuel_ratio);

    gas.TP(T_REF, P_NORMAL)?;
    gas.set_equivalence_ratio(1.0, fuel, oxidizer)?;
    let h_r = gas.h();
    let water_r = gas.mole_frac_of("H2O") / gas.M(); // [mol/kg]
    gas.equilibrate(EquilibriumMode::TP)?;
    let h_p = gas.h();
    let water_p = gas.mole_frac_of("H2O") / gas.M();

    let lhv_mass = (h_r - h_p) / fuel_mass_frac / 1e6;
    let hhv_mass = lhv_mass + (water_p - water_r) * H2O_LATENT_HEAT / fuel_mass_frac / 1e6;

    gas.TPX(T_NORMAL, P_NORMAL, fuel)?;
    let fuel_density = gas.rho();
    log::debug!(
        "heating values: LHV {:.3} MJ/kg, HHV {:.3} MJ/kg, fuel density {:.4} kg/Nm³",
        lhv_mass,
        hhv_mass,
        fuel_density
    );

    Ok(HeatingValues {
        lhv_mass,
        lhv_volume: lhv_mass * fuel_density,
        hhv_mass,
        hhv_volume: hhv_mass * fuel_density,
        stoich_air_fuel_ratio,
        fuel_density,
    })
}
