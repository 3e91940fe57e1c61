#![allow(non_snake_case)]

use super::composition;
use super::equilibrium::{EquilibriumMode, EquilibriumSolver, EquilibriumState, P_REF};
use super::json_data::{self, OutputJson};
use super::thermo::Nasa7;
use crate::error::{CombustionError, Result};
use crate::R;
use ndarray::prelude::*;

/// Species data shared by every state of a gas: names, elements, formulas and thermo
#[derive(Debug, Clone)]
pub struct Mechanism {
    pub name: String,
    pub species: Vec<String>,
    pub elements: Vec<String>,
    /// molar weight of each species [kg/mol]
    pub molar_weight: Array1<f64>,
    /// atoms of each element in each species, `[species, element]`
    pub formula: Array2<f64>,
    pub thermo: Vec<Nasa7>,
}

impl Mechanism {
    /// Number of atoms of `element` in species `j`, zero when the element is not in the mechanism
    pub fn atoms(&self, j: usize, element: &str) -> f64 {
        match self.elements.iter().position(|e| e == element) {
            Some(k) => self.formula[[j, k]],
            None => 0.0,
        }
    }

    /// Moles of O2 needed to fully oxidise one mole of the mixture `X`; negative for oxidisers
    pub fn oxygen_demand(&self, X: &Array1<f64>) -> f64 {
        X.iter()
            .enumerate()
            .map(|(j, x)| x * (self.atoms(j, "C") + 0.25 * self.atoms(j, "H") - 0.5 * self.atoms(j, "O")))
            .sum()
    }
}

#[derive(Debug, Clone)]
pub struct Gas {
    mechanism: Mechanism,
    mol_frac: Array1<f64>,
    thermo_prop: ThermoProp,
}

impl Gas {
    /// Creates a `Gas` object from a mechanism file
    pub fn new(gas_file: &str) -> Result<Gas> {
        let json_output = json_data::read_and_treat_json(gas_file)?;
        Gas::from_json_output(json_output)
    }

    pub(crate) fn from_json_output(json_output: OutputJson) -> Result<Gas> {
        let mechanism = Mechanism {
            name: json_output.name,
            species: json_output.species,
            elements: json_output.elements,
            molar_weight: json_output.species_molar_weight,
            formula: json_output.formula,
            thermo: json_output.thermo,
        };
        let mut gas = Gas {
            mol_frac: Array::from_elem(mechanism.species.len(), 0.),
            mechanism,
            thermo_prop: ThermoProp::new(),
        };
        gas.TPX(json_output.ini_temp, json_output.ini_press, &json_output.ini_mol_frac)?;
        Ok(gas)
    }

    /// Set temperature and pressure. Thermo properties are recalculated
    /// # Examples
    /// ```
    /// # use cog_flame::Gas;
    /// let mut gas = Gas::new("data/gri30_cog.json").unwrap();
    /// gas.TP(350.0, 2e5).unwrap();
    /// assert_eq!(350.0, gas.T());
    /// assert_eq!(2e5, gas.P());
    /// ```
    pub fn TP(&mut self, temp: f64, press: f64) -> Result<()> {
        if !(temp > 0.0) || !(press > 0.0) {
            return Err(CombustionError::InvalidInput(format!(
                "temperature and pressure must be positive: T = {}, P = {}",
                temp, press
            )));
        }
        self.thermo_prop.T = temp;
        self.thermo_prop.P = press;
        self.calc_prop();
        Ok(())
    }

    /// Set temperature, pressure, and mole fraction of species. Thermo properties are recalculated
    /// # Examples
    /// ```
    /// # use cog_flame::Gas;
    /// let mut gas = Gas::new("data/gri30_cog.json").unwrap();
    /// gas.TPX(350.0, 2e5, "O2:0.21, N2:0.79").unwrap();
    /// assert_eq!(350.0, gas.T());
    /// assert!((gas.mole_frac_of("O2") - 0.21).abs() < 1e-12);
    /// ```
    pub fn TPX(&mut self, temp: f64, press: f64, mol_frac: &str) -> Result<()> {
        let X = composition::to_mole_fractions(&composition::parse(mol_frac)?, &self.mechanism.species)?;
        self.mol_frac = X;
        self.TP(temp, press)
    }

    /// Set mole fraction of species from a `"NAME:VALUE, ..."` string. Values are normalised.
    pub fn X(&mut self, mol_frac: &str) -> Result<()> {
        let X = composition::to_mole_fractions(&composition::parse(mol_frac)?, &self.mechanism.species)?;
        self.mol_frac = X;
        self.calc_prop();
        Ok(())
    }

    /// Set mole fraction of species from an array indexed like `species()`. Values are normalised.
    pub fn X_array(&mut self, mol_frac: &Array1<f64>) -> Result<()> {
        if mol_frac.len() != self.mechanism.species.len() {
            return Err(CombustionError::InvalidInput(format!(
                "expected {} mole fractions, got {}",
                self.mechanism.species.len(),
                mol_frac.len()
            )));
        }
        let total = mol_frac.sum();
        if !(total > 0.0) || mol_frac.iter().any(|x| *x < 0.0) {
            return Err(CombustionError::InvalidInput(format!(
                "mole fractions must be non-negative with a positive sum: sum = {}",
                total
            )));
        }
        self.mol_frac = mol_frac / total;
        self.calc_prop();
        Ok(())
    }

    /// Mixes `fuel` and `oxidizer` at equivalence ratio `phi` (mole basis).
    /// Temperature and pressure are kept.
    /// # Examples
    /// ```
    /// # use cog_flame::Gas;
    /// let mut gas = Gas::new("data/gri30_cog.json").unwrap();
    /// gas.set_equivalence_ratio(1.0, "CH4:1", "O2:0.21, N2:0.79").unwrap();
    /// assert!((gas.mole_frac_of("CH4") - 1.0 / (1.0 + 2.0 / 0.21)).abs() < 1e-12);
    /// ```
    pub fn set_equivalence_ratio(&mut self, phi: f64, fuel: &str, oxidizer: &str) -> Result<()> {
        if !(phi > 0.0) || !phi.is_finite() {
            return Err(CombustionError::InvalidInput(format!(
                "equivalence ratio must be positive: phi = {}",
                phi
            )));
        }
        let (X_fuel, X_oxidizer, oxidizer_per_fuel) = self.stoichiometry(fuel, oxidizer)?;
        let X = X_fuel + &(X_oxidizer * (oxidizer_per_fuel / phi));
        self.X_array(&X)
    }

    /// Stoichiometric air-fuel ratio on mass basis
    pub fn stoich_air_fuel_ratio(&self, fuel: &str, oxidizer: &str) -> Result<f64> {
        let (X_fuel, X_oxidizer, oxidizer_per_fuel) = self.stoichiometry(fuel, oxidizer)?;
        let M_fuel = X_fuel.dot(&self.mechanism.molar_weight);
        let M_oxidizer = X_oxidizer.dot(&self.mechanism.molar_weight);
        Ok(oxidizer_per_fuel * M_oxidizer / M_fuel)
    }

    /// Normalised fuel and oxidizer arrays and the moles of oxidizer per mole of fuel at phi = 1
    fn stoichiometry(&self, fuel: &str, oxidizer: &str) -> Result<(Array1<f64>, Array1<f64>, f64)> {
        let species = &self.mechanism.species;
        let X_fuel = composition::to_mole_fractions(&composition::parse(fuel)?, species)?;
        let X_oxidizer = composition::to_mole_fractions(&composition::parse(oxidizer)?, species)?;
        let fuel_demand = self.mechanism.oxygen_demand(&X_fuel);
        let oxygen_supply = -self.mechanism.oxygen_demand(&X_oxidizer);
        if !(fuel_demand > 0.0) {
            return Err(CombustionError::InvalidInput(format!(
                "fuel `{}` does not need oxygen to burn",
                fuel
            )));
        }
        if !(oxygen_supply > 0.0) {
            return Err(CombustionError::InvalidInput(format!(
                "oxidizer `{}` has no oxygen surplus",
                oxidizer
            )));
        }
        Ok((X_fuel, X_oxidizer, fuel_demand / oxygen_supply))
    }

    /// Brings the gas to chemical equilibrium holding the two properties of `mode` constant
    pub fn equilibrate(&mut self, mode: EquilibriumMode) -> Result<EquilibriumState> {
        let solver = EquilibriumSolver::new(&self.mechanism, &self.mol_frac)?;
        let state = match mode {
            EquilibriumMode::TP => solver.solve_tp(self.T(), self.P(), None)?,
            EquilibriumMode::HP => {
                let T_low = (0.5 * self.T()).max(200.0);
                solver.solve_hp(self.h(), self.P(), T_low, 5000.0)?
            }
        };
        self.mol_frac = state.mole_fractions();
        self.thermo_prop.T = state.temperature;
        self.calc_prop();
        Ok(state)
    }

    fn calc_prop(&mut self) {
        let T = self.thermo_prop.T;
        let P = self.thermo_prop.P;
        let ns = self.mechanism.species.len();
        let mut cp_species = Array::from_elem(ns, 0.);
        let mut h_species = Array::from_elem(ns, 0.);
        let mut s_species = Array::from_elem(ns, 0.);
        for (specie_index, nasa) in self.mechanism.thermo.iter().enumerate() {
            let (cp_R, h_RT, s_R) = nasa.properties(T);
            cp_species[specie_index] = cp_R * R;
            h_species[specie_index] = h_RT * R * T;
            // ideal mixing at the partial pressure
            let x = self.mol_frac[specie_index];
            s_species[specie_index] = if x > 0.0 {
                R * (s_R - x.ln() - (P / P_REF).ln())
            } else {
                0.0
            };
        }
        self.thermo_prop.M = self.mol_frac.dot(&self.mechanism.molar_weight);
        self.thermo_prop.cp = self.mol_frac.dot(&cp_species) / self.thermo_prop.M;
        self.thermo_prop.R = R / self.thermo_prop.M;
        self.thermo_prop.cv = self.thermo_prop.cp - self.thermo_prop.R;
        self.thermo_prop.k = self.thermo_prop.cp / self.thermo_prop.cv;
        self.thermo_prop.rho = P / (self.thermo_prop.R * T);
        self.thermo_prop.h = self.mol_frac.dot(&h_species) / self.thermo_prop.M;
        self.thermo_prop.e = self.thermo_prop.h - self.thermo_prop.R * T;
        self.thermo_prop.s = self.mol_frac.dot(&s_species) / self.thermo_prop.M;
    }

    pub fn name(&self) -> &str {
        &self.mechanism.name
    }

    pub fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    pub fn species(&self) -> &Vec<String> {
        &self.mechanism.species
    }

    pub fn elements(&self) -> &Vec<String> {
        &self.mechanism.elements
    }

    pub fn mole_frac(&self) -> &Array1<f64> {
        &self.mol_frac
    }

    /// Mole fraction of `name`, zero if the species is not in the mechanism
    pub fn mole_frac_of(&self, name: &str) -> f64 {
        match self.species_index(name) {
            Some(i) => self.mol_frac[i],
            None => 0.0,
        }
    }

    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.mechanism.species.iter().position(|s| s == name)
    }

    pub fn mass_frac(&self) -> Array1<f64> {
        &self.mol_frac * &self.mechanism.molar_weight / self.thermo_prop.M
    }

    pub fn T(&self) -> f64 {
        self.thermo_prop.T
    }

    pub fn P(&self) -> f64 {
        self.thermo_prop.P
    }

    pub fn rho(&self) -> f64 {
        self.thermo_prop.rho
    }

    pub fn cp(&self) -> f64 {
        self.thermo_prop.cp
    }

    pub fn cv(&self) -> f64 {
        self.thermo_prop.cv
    }

    pub fn R(&self) -> f64 {
        self.thermo_prop.R
    }

    pub fn k(&self) -> f64 {
        self.thermo_prop.k
    }

    /// mean molar weight [kg/mol]
    pub fn M(&self) -> f64 {
        self.thermo_prop.M
    }

    pub fn e(&self) -> f64 {
        self.thermo_prop.e
    }

    /// enthalpy [J/kg]
    pub fn h(&self) -> f64 {
        self.thermo_prop.h
    }

    pub fn s(&self) -> f64 {
        self.thermo_prop.s
    }
}

impl std::fmt::Display for Gas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:
        pressure: {} [Pa]
        temperature: {} [K]
        density: {} [kg/m³]
        enthalpy: {} [J/kg]
        cp: {} [J/(kg.K)]
        M: {} [kg/mol]",
            self.name(),
            self.P(),
            self.T(),
            self.rho(),
            self.h(),
            self.cp(),
            self.M()
        )?;
        for (name, x) in self.species().iter().zip(self.mol_frac.iter()) {
            if *x > 1e-6 {
                write!(f, "\n        X_{}: {:.6}", name, x)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct ThermoProp {
    pub P: f64,   // pressure [Pa]
    pub T: f64,   // temperature [K]
    pub rho: f64, // density [kg/m^3]
    pub cp: f64,  // specific heat capacity - cp [J/(kg.K)]
    pub cv: f64,  // specific heat capacity - cv [J/(kg.K)]
    pub R: f64,   // gas constant [J/(kg.K)]
    pub k: f64,   // cp/cv
    pub M: f64,   // molecular weight [kg/mol]
    pub e: f64,   // internal energy [J/kg]
    pub h: f64,   // enthalpy [J/kg]
    pub s: f64,   // entropy [J/(kg.K)]
}

impl ThermoProp {
    fn new() -> ThermoProp {
        ThermoProp {
            P: 0.0,
            T: 0.0,
            rho: 0.0,
            cp: 0.0,
            cv: 0.0,
            R: 0.0,
            k: 0.0,
            M: 0.0,
            e: 0.0,
            h: 0.0,
            s: 0.0,
        }
    }
}
