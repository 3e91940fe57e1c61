use cog_flame::sweep::heating_value::heating_values;
use cog_flame::{CaseConfig, Gas};

const MECHANISM: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/gri30_cog.json");
const AIR: &str = "O2:0.21, N2:0.79";

#[test]
fn coke_oven_gas_heating_values() {
    let case = CaseConfig::default();
    let mut gas = Gas::new(MECHANISM).unwrap();
    let values = heating_values(&mut gas, &case.fuel, &case.oxidizer).unwrap();
    assert!((values.lhv_mass - 36.38).abs() < 0.3, "LHV = {:.3} MJ/kg", values.lhv_mass);
    assert!((values.lhv_volume - 17.84).abs() < 0.2, "LHV = {:.3} MJ/Nm³", values.lhv_volume);
    assert!((values.fuel_density - 0.4905).abs() < 2e-3, "rho = {:.4}", values.fuel_density);
    assert!((values.stoich_air_fuel_ratio - 11.40).abs() < 0.05);
    let latent = values.hhv_mass - values.lhv_mass;
    assert!((latent - 4.54).abs() < 0.1, "HHV - LHV = {latent:.3} MJ/kg");
}

#[test]
fn methane_heating_values() {
    let mut gas = Gas::new(MECHANISM).unwrap();
    let values = heating_values(&mut gas, "CH4:1", AIR).unwrap();
    assert!((values.lhv_mass - 50.0).abs() < 0.3, "LHV = {:.3} MJ/kg", values.lhv_mass);
    assert!((values.hhv_mass - 55.5).abs() < 0.3, "HHV = {:.3} MJ/kg", values.hhv_mass);
    // ≈ 35.8 MJ/Nm³
    assert!((values.lhv_volume - 35.8).abs() < 0.4, "LHV = {:.3} MJ/Nm³", values.lhv_volume);
}

#[test]
fn hydrogen_heating_values() {
    let mut gas = Gas::new(MECHANISM).unwrap();
    let values = heating_values(&mut gas, "H2:1", AIR).unwrap();
    assert!((values.lhv_mass - 120.0).abs() < 1.0, "LHV = {:.3} MJ/kg", values.lhv_mass);
    assert!((values.hhv_mass - 141.8).abs() < 1.0, "HHV = {:.3} MJ/kg", values.hhv_mass);
}

#[test]
fn inert_fuel_has_no_heating_value() {
    let mut gas = Gas::new(MECHANISM).unwrap();
    assert!(heating_values(&mut gas, "N2:1", AIR).is_err());
}
