use super::heating_value::HeatingValues;
use super::{PointOutcome, Sweep, SweepPoint};
use crate::error::{CombustionError, Result};
use ansi_term::Style;
use std::io::Write;

pub const HEADER: &str =
    "Equivalence Ratio | Adiabatic Flame Temp [K] | Enthalpy Change [MJ/kg] | CO [ppm] | NOx [ppm] | CO2 [ppm]";

pub fn separator() -> String {
    "-".repeat(HEADER.chars().count())
}

pub fn print_header() {
    println!("{}", Style::new().bold().paint(HEADER));
    println!("{}", separator());
}

pub fn format_point(point: &SweepPoint) -> String {
    format!(
        "{:17.2} | {:24.2} | {:23.6} | {:8.2} | {:9.2} | {:9.2}",
        point.phi, point.adiabatic_temperature, point.enthalpy_change, point.co_ppm, point.nox_ppm, point.co2_ppm
    )
}

pub fn format_outcome(outcome: &PointOutcome) -> String {
    match outcome {
        PointOutcome::Converged(point) => format_point(point),
        PointOutcome::Failed { phi, message } => format!("{:17.2} | Combustion failed: {}", phi, message),
    }
}

pub fn format_heating_values(values: &HeatingValues) -> String {
    format!(
        "Lower Heating Value (LHV): {:.3} MJ/kg
Lower Heating Value (LHV): {:.3} MJ/nm³
Higher Heating Value (HHV): {:.3} MJ/kg
Higher Heating Value (HHV): {:.3} MJ/nm³
Stoichiometric air-fuel ratio: {:.3} kg/kg",
        values.lhv_mass, values.lhv_volume, values.hhv_mass, values.hhv_volume, values.stoich_air_fuel_ratio
    )
}

pub fn print_heating_values(values: &HeatingValues) {
    println!();
    println!("{}", Style::new().underline().paint("Heating values at 298.15 K"));
    println!("{}", format_heating_values(values));
}

/// Writes the sweep as tab-separated columns, one line per equivalence ratio
pub fn write_to_file(sweep: &Sweep, file_name: &str) -> Result<()> {
    let io_error = |source| CombustionError::Io {
        path: file_name.to_string(),
        source,
    };
    let mut file = std::fs::File::create(file_name).map_err(io_error)?;
    write!(file, "{}", to_tsv(sweep)).map_err(io_error)?;
    log::info!("results written to {}", file_name);
    Ok(())
}

pub fn to_tsv(sweep: &Sweep) -> String {
    let mut text = String::from("phi\tT_ad [K]\tdh [MJ/kg]\tCO [ppm]\tNOx [ppm]\tCO2 [ppm]\n");
    for p in sweep.points.iter() {
        text += &format!(
            "{}\t{}\t{}\t{}\t{}\t{}\n",
            p.phi, p.adiabatic_temperature, p.enthalpy_change, p.co_ppm, p.nox_ppm, p.co2_ppm
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> SweepPoint {
        SweepPoint {
            phi: 1.0,
            adiabatic_temperature: 2619.234,
            enthalpy_change: 2.959088,
            co_ppm: 28631.01,
            nox_ppm: 6926.84,
            co2_ppm: 52183.85,
        }
    }

    #[test]
    fn row_columns_line_up_with_header() {
        let row = format_point(&point());
        let header_bars: Vec<usize> = HEADER.match_indices('|').map(|(i, _)| i).collect();
        let row_bars: Vec<usize> = row.match_indices('|').map(|(i, _)| i).collect();
        assert_eq!(header_bars, row_bars);
        assert!(row.starts_with("             1.00 |"));
        assert!(row.contains(" 2619.23 |"));
    }

    #[test]
    fn failed_row_carries_message() {
        let row = format_outcome(&PointOutcome::Failed {
            phi: 0.5,
            message: "equilibrium did not converge".to_string(),
        });
        assert_eq!(row, "             0.50 | Combustion failed: equilibrium did not converge");
    }

    #[test]
    fn heating_values_are_printed_with_three_decimals() {
        let text = format_heating_values(&HeatingValues {
            lhv_mass: 36.38379,
            lhv_volume: 17.84496,
            hhv_mass: 40.9,
            hhv_volume: 20.1,
            stoich_air_fuel_ratio: 11.4036,
            fuel_density: 0.4905,
        });
        assert!(text.starts_with("Lower Heating Value (LHV): 36.384 MJ/kg\n"));
        assert!(text.contains("Lower Heating Value (LHV): 17.845 MJ/nm³"));
    }

    #[test]
    fn tsv_has_header_and_one_line_per_point() {
        let sweep = Sweep {
            points: vec![point(), SweepPoint::failed(1.1)],
        };
        let text = to_tsv(&sweep);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("phi\t"));
        assert!(lines[2].starts_with("1.1\tNaN"));
    }

    #[test]
    fn unwritable_results_file_is_named_in_error() {
        let file_name = concat!(env!("CARGO_MANIFEST_DIR"), "/no_such_dir/results.tsv");
        let sweep = Sweep {
            points: vec![point()],
        };
        match write_to_file(&sweep, file_name) {
            Err(CombustionError::Io { path, .. }) => assert_eq!(path, file_name),
            other => panic!("expected an io error, got {:?}", other),
        }
    }
}
