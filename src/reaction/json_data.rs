// File to read and treat the data in the mechanism .json files

#![allow(non_snake_case)]

use super::thermo::Nasa7;
use crate::error::{CombustionError, Result};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Standard atomic weights [kg/mol]
const ATOMIC_WEIGHTS: [(&str, f64); 6] = [
    ("H", 1.008e-3),
    ("He", 4.002602e-3),
    ("C", 12.011e-3),
    ("N", 14.007e-3),
    ("O", 15.999e-3),
    ("Ar", 39.95e-3),
];

#[derive(Serialize, Deserialize, Debug)]
pub struct IdealGas {
    phase: Phase,
    species_data: Vec<SpeciesData>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Phase {
    id: String,
    speciesArray: String,
    state: State,
}

#[derive(Serialize, Deserialize, Debug)]
struct SpeciesData {
    name: String,
    composition: BTreeMap<String, f64>,
    thermo: Option<ThermoData>,
}

#[derive(Serialize, Deserialize, Debug)]
struct ThermoData {
    temperature_ranges: Vec<f64>,
    data: Vec<Vec<f64>>,
}

#[derive(Serialize, Deserialize, Debug)]
struct State {
    temperature: f64,
    pressure: f64,
    moleFractions: String,
}

#[derive(Debug)]
pub struct OutputJson {
    pub name: String,
    pub species: Vec<String>,
    pub elements: Vec<String>,
    pub ini_temp: f64,
    pub ini_press: f64,
    pub ini_mol_frac: String,
    pub species_molar_weight: Array1<f64>,
    /// element count of each species, `[species, element]`
    pub formula: Array2<f64>,
    pub thermo: Vec<Nasa7>,
}

pub fn read_and_treat_json(file_name: &str) -> Result<OutputJson> {
    // Reading .json file
    let json_file = std::fs::read_to_string(file_name).map_err(|source| CombustionError::Io {
        path: file_name.to_string(),
        source,
    })?;
    let gas: IdealGas = serde_json::from_str(&json_file).map_err(|source| CombustionError::Json {
        path: file_name.to_string(),
        source,
    })?;
    treat_json(gas)
}

pub fn treat_json(gas: IdealGas) -> Result<OutputJson> {
    let name = gas.phase.id.clone();
    let species = get_species(&gas)?;
    let (ini_temp, ini_press) = get_ini_state(&gas);
    let ini_mol_frac = gas.phase.state.moleFractions.clone();
    let species_data = order_species_data(gas, &species)?;
    let elements = get_elements(&species_data)?;
    let (species_molar_weight, formula) = get_formula(&species_data, &elements);
    let thermo = get_thermo(species_data)?;

    Ok(OutputJson {
        name,
        species,
        elements,
        ini_temp,
        ini_press,
        ini_mol_frac,
        species_molar_weight,
        formula,
        thermo,
    })
}

fn get_species(gas: &IdealGas) -> Result<Vec<String>> {
    let species: Vec<String> = gas.phase.speciesArray.split_whitespace().map(|s| s.to_string()).collect();

    // Checking if file is appropriate
    if species.is_empty() {
        return Err(CombustionError::Mechanism("'speciesArray' is empty".to_string()));
    }
    if species.len() > gas.species_data.len() {
        return Err(CombustionError::Mechanism(
            "not enough data for the species in 'speciesArray'".to_string(),
        ));
    }
    for (i, specie) in species.iter().enumerate() {
        if species[..i].contains(specie) {
            return Err(CombustionError::Mechanism(format!("{} is repeated in 'speciesArray'", specie)));
        }
    }
    Ok(species)
}

fn get_ini_state(gas: &IdealGas) -> (f64, f64) {
    let ini_temp = gas.phase.state.temperature;
    let ini_press = gas.phase.state.pressure;
    (ini_temp, ini_press)
}

fn order_species_data(mut gas: IdealGas, species: &[String]) -> Result<Vec<SpeciesData>> {
    let mut ordered = Vec::with_capacity(species.len());
    for specie in species.iter() {
        match gas.species_data.iter().position(|data| data.name == *specie) {
            Some(i) => ordered.push(gas.species_data.swap_remove(i)),
            None => {
                return Err(CombustionError::Mechanism(format!(
                    "no entry in 'species_data' for {}",
                    specie
                )))
            }
        }
    }
    Ok(ordered)
}

fn get_elements(species_data: &[SpeciesData]) -> Result<Vec<String>> {
    let mut elements: Vec<String> = Vec::new();
    for data in species_data.iter() {
        for element in data.composition.keys() {
            if atomic_weight(element).is_none() {
                return Err(CombustionError::Mechanism(format!(
                    "unknown element {} in species {}",
                    element, data.name
                )));
            }
            if !elements.contains(element) {
                elements.push(element.clone());
            }
        }
    }
    Ok(elements)
}

fn get_formula(species_data: &[SpeciesData], elements: &[String]) -> (Array1<f64>, Array2<f64>) {
    let mut molecular_weight = Array::from_elem(species_data.len(), 0.);
    let mut formula = Array2::<f64>::zeros((species_data.len(), elements.len()));
    for (i, data) in species_data.iter().enumerate() {
        for (element, count) in data.composition.iter() {
            if let Some(j) = elements.iter().position(|e| e == element) {
                formula[[i, j]] = *count;
            }
            molecular_weight[i] += count * atomic_weight(element).unwrap_or(0.0);
        }
    }
    (molecular_weight, formula)
}

fn get_thermo(species_data: Vec<SpeciesData>) -> Result<Vec<Nasa7>> {
    let mut thermo = Vec::with_capacity(species_data.len());
    for data in species_data {
        let table = data.thermo.ok_or_else(|| {
            CombustionError::Mechanism(format!("species {} has no thermo data", data.name))
        })?;
        let (Tmin, Tmid, Tmax) = match table.temperature_ranges.as_slice() {
            &[Tmin, Tmid, Tmax] => (Tmin, Tmid, Tmax),
            ranges => {
                return Err(CombustionError::Mechanism(format!(
                    "species {}: expected three temperature ranges, got {:?}",
                    data.name, ranges
                )))
            }
        };
        if table.data.len() != 2 {
            return Err(CombustionError::Mechanism(format!(
                "species {}: expected two polynomial pieces, got {}",
                data.name,
                table.data.len()
            )));
        }
        let mut pieces = table.data;
        let high = Array1::from(pieces.remove(1));
        let low = Array1::from(pieces.remove(0));
        let nasa = Nasa7::new(data.name, Tmin, Tmid, Tmax, low, high)?;
        if let Err(err) = nasa.validate() {
            log::warn!("{}", err);
        }
        thermo.push(nasa);
    }
    Ok(thermo)
}

pub fn atomic_weight(element: &str) -> Option<f64> {
    ATOMIC_WEIGHTS.iter().find(|(e, _)| *e == element).map(|(_, w)| *w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SMALL_MECHANISM: &str = r#"{
        "phase": {
            "id": "small",
            "speciesArray": "O2 N2",
            "state": {"temperature": 300.0, "pressure": 101325.0, "moleFractions": "O2:0.21, N2:0.79"}
        },
        "species_data": [
            {"name": "N2", "composition": {"N": 2},
             "thermo": {"temperature_ranges": [300.0, 1000.0, 5000.0],
                        "data": [[3.298677, 1.4082404e-03, -3.963222e-06, 5.641515e-09,
                                  -2.444854e-12, -1020.8999, 3.950372],
                                 [2.92664, 1.4879768e-03, -5.68476e-07, 1.0097038e-10,
                                  -6.753351e-15, -922.7977, 5.980528]]}},
            {"name": "O2", "composition": {"O": 2},
             "thermo": {"temperature_ranges": [200.0, 1000.0, 3500.0],
                        "data": [[3.78245636, -2.99673416e-03, 9.84730201e-06, -9.68129509e-09,
                                  3.24372837e-12, -1063.94356, 3.65767573],
                                 [3.28253784, 1.48308754e-03, -7.57966669e-07, 2.09470555e-10,
                                  -2.16717794e-14, -1088.45772, 5.45323129]]}}
        ]
    }"#;

    #[test]
    fn species_follow_species_array_order() {
        let gas: IdealGas = serde_json::from_str(SMALL_MECHANISM).unwrap();
        let out = treat_json(gas).unwrap();
        assert_eq!(out.species, vec!["O2".to_string(), "N2".to_string()]);
        assert_eq!(out.elements, vec!["O".to_string(), "N".to_string()]);
        assert_eq!(out.thermo[0].specie(), "O2");
        assert_relative_eq!(out.species_molar_weight[0], 31.998e-3, epsilon = 1e-9);
        assert_relative_eq!(out.species_molar_weight[1], 28.014e-3, epsilon = 1e-9);
        assert_eq!(out.formula[[0, 0]], 2.0);
        assert_eq!(out.formula[[0, 1]], 0.0);
    }

    #[test]
    fn missing_species_data_is_an_error() {
        let text = SMALL_MECHANISM.replace("\"O2 N2\"", "\"O2 AR\"");
        let gas: IdealGas = serde_json::from_str(&text).unwrap();
        assert!(treat_json(gas).is_err());
    }

    #[test]
    fn unknown_element_is_an_error() {
        let text = SMALL_MECHANISM.replace("{\"N\": 2}", "{\"Xe\": 1}");
        let gas: IdealGas = serde_json::from_str(&text).unwrap();
        assert!(treat_json(gas).is_err());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = read_and_treat_json("does/not/exist.json").unwrap_err();
        assert!(format!("{}", err).contains("does/not/exist.json"));
    }
}
