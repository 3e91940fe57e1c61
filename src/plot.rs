//! Three stacked charts of a sweep, drawn by gnuplot

use crate::error::{CombustionError, Result};
use crate::sweep::Sweep;
use gnuplot::{AxesCommon, Caption, Color, Figure, Graph, PointSymbol};
use std::path::Path;

const WIDTH_PX: u32 = 1200;
const HEIGHT_PX: u32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub enum PlotTarget {
    /// interactive gnuplot window
    Window,
    Png(String),
    Svg(String),
}

impl PlotTarget {
    /// Picks the output format from the file extension, PNG by default
    pub fn from_path(path: &str) -> PlotTarget {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => PlotTarget::Svg(path.to_string()),
            _ => PlotTarget::Png(path.to_string()),
        }
    }
}

/// Drops points where either coordinate is not finite (failed sweep points)
pub fn finite_points(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .unzip()
}

pub fn build_figure(sweep: &Sweep) -> Figure {
    let phi = sweep.phi();
    let mut fg = Figure::new();

    let (x, y) = finite_points(&phi, &sweep.adiabatic_temperature());
    fg.axes2d()
        .set_pos_grid(3, 1, 0)
        .set_title("Adiabatic Flame Temperature vs. Equivalence Ratio", &[])
        .set_x_label("Equivalence Ratio (ϕ)", &[])
        .set_y_label("Adiabatic Flame Temperature [K]", &[])
        .set_x_grid(true)
        .set_y_grid(true)
        .lines_points(&x, &y, &[Color("#d62728"), PointSymbol('O')]);

    let (x_co, co) = finite_points(&phi, &sweep.co_ppm());
    let (x_nox, nox) = finite_points(&phi, &sweep.nox_ppm());
    let (x_co2, co2) = finite_points(&phi, &sweep.co2_ppm());
    fg.axes2d()
        .set_pos_grid(3, 1, 1)
        .set_title("Emissions vs. Equivalence Ratio", &[])
        .set_x_label("Equivalence Ratio (ϕ)", &[])
        .set_y_label("Emissions [ppm]", &[])
        .set_x_grid(true)
        .set_y_grid(true)
        .set_legend(Graph(0.98), Graph(0.95), &[], &[])
        .lines_points(&x_co, &co, &[Caption("CO [ppm]"), Color("#ff7f0e"), PointSymbol('T')])
        .lines_points(&x_nox, &nox, &[Caption("NOx [ppm]"), Color("#2ca02c"), PointSymbol('x')])
        .lines_points(&x_co2, &co2, &[Caption("CO2 [ppm]"), Color("#9467bd"), PointSymbol('D')]);

    let (x, y) = finite_points(&phi, &sweep.enthalpy_change());
    fg.axes2d()
        .set_pos_grid(3, 1, 2)
        .set_title("Enthalpy Difference vs. Equivalence Ratio", &[])
        .set_x_label("Equivalence Ratio (ϕ)", &[])
        .set_y_label("Enthalpy Difference [MJ/kg]", &[])
        .set_x_grid(true)
        .set_y_grid(true)
        .lines_points(&x, &y, &[Color("#1f77b4"), PointSymbol('S')]);

    fg
}

/// Renders the sweep charts. Requires a `gnuplot` executable on the path.
pub fn plot_sweep(sweep: &Sweep, target: &PlotTarget) -> Result<()> {
    let mut fg = build_figure(sweep);
    let outcome = match target {
        PlotTarget::Window => fg.show().map(|_| ()),
        PlotTarget::Png(path) => fg.save_to_png(path, WIDTH_PX, HEIGHT_PX),
        PlotTarget::Svg(path) => fg.save_to_svg(path, WIDTH_PX, HEIGHT_PX),
    };
    outcome.map_err(|err| CombustionError::Plot(format!("{:?}", err)))?;
    log::info!("charts rendered to {:?}", target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_points_are_skipped() {
        let (x, y) = finite_points(&[0.5, 0.6, 0.7], &[1.0, f64::NAN, 3.0]);
        assert_eq!(x, vec![0.5, 0.7]);
        assert_eq!(y, vec![1.0, 3.0]);
    }

    #[test]
    fn target_follows_extension() {
        assert_eq!(PlotTarget::from_path("out.svg"), PlotTarget::Svg("out.svg".to_string()));
        assert_eq!(PlotTarget::from_path("out.SVG"), PlotTarget::Svg("out.SVG".to_string()));
        assert_eq!(PlotTarget::from_path("out.png"), PlotTarget::Png("out.png".to_string()));
        assert_eq!(PlotTarget::from_path("out"), PlotTarget::Png("out".to_string()));
    }
}
