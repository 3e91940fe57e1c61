//! Parsing of `"O2:0.21, N2:0.79"` composition strings and conversion to mole-fraction arrays

#![allow(non_snake_case)]

use crate::error::{CombustionError, Result};
use ndarray::prelude::*;

/// Ordered list of `(species, amount)` pairs. Amounts are not normalised.
pub type Composition = Vec<(String, f64)>;

pub fn parse(mol_frac: &str) -> Result<Composition> {
    let strings: Vec<String> = mol_frac
        .replace(&[',', '\"'][..], " ")
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();

    let mut composition = Composition::new();
    for word in strings.iter() {
        let specie: Vec<&str> = word.split(':').collect(); // specie should be like ["O2", "0.21"]
        if specie.len() != 2 || specie[0].is_empty() {
            return Err(CombustionError::InvalidInput(format!(
                "composition entry `{}` must look like `NAME:VALUE`",
                word
            )));
        }
        let value: f64 = specie[1].parse().map_err(|_| {
            CombustionError::InvalidInput(format!("unable to parse amount of {}: `{}`", specie[0], specie[1]))
        })?;
        if value < 0.0 || !value.is_finite() {
            return Err(CombustionError::InvalidInput(format!(
                "amount of {} must be a non-negative number: {}",
                specie[0], value
            )));
        }
        composition.push((specie[0].to_string(), value));
    }
    if composition.is_empty() {
        return Err(CombustionError::InvalidInput("empty composition".to_string()));
    }
    Ok(composition)
}

/// Builds a normalised mole-fraction array indexed like `species`.
/// Repeated entries are added together.
pub fn to_mole_fractions(composition: &[(String, f64)], species: &[String]) -> Result<Array1<f64>> {
    let mut X = Array::from_elem(species.len(), 0.);
    for (name, value) in composition {
        match species.iter().position(|s| s == name) {
            Some(i) => X[i] += value,
            None => return Err(CombustionError::UnknownSpecies(name.clone())),
        }
    }
    let total = X.sum();
    if !(total > 0.0) {
        return Err(CombustionError::InvalidInput(format!(
            "mole fractions must have a positive sum: sum = {}",
            total
        )));
    }
    Ok(X / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_comma_separated_pairs() {
        let comp = parse("O2:0.21, N2:0.79").unwrap();
        assert_eq!(comp, vec![("O2".to_string(), 0.21), ("N2".to_string(), 0.79)]);
    }

    #[test]
    fn quotes_and_extra_spaces_are_ignored() {
        let comp = parse("\"CH4:1\",  \"H2:3\"").unwrap();
        assert_eq!(comp.len(), 2);
        assert_eq!(comp[1].0, "H2");
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert!(parse("O2=0.21").is_err());
        assert!(parse("O2:abc").is_err());
        assert!(parse("O2:-1").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn mole_fractions_are_normalised() {
        let species = vec!["N2".to_string(), "O2".to_string(), "H2O".to_string()];
        let comp = parse("O2:1, N2:3.76").unwrap();
        let X = to_mole_fractions(&comp, &species).unwrap();
        assert_relative_eq!(X.sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(X[1], 1.0 / 4.76, epsilon = 1e-12);
        assert_eq!(X[2], 0.0);
    }

    #[test]
    fn unknown_species_is_an_error() {
        let species = vec!["N2".to_string()];
        let comp = parse("AR:1").unwrap();
        match to_mole_fractions(&comp, &species) {
            Err(CombustionError::UnknownSpecies(s)) => assert_eq!(s, "AR"),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
