use std::fmt::Display;
use std::ops::Range;
use std::path::Path;
use log::warn;
use plotters::prelude::*;
use crate::error::{GloveError, Result};
use crate::train::History;


fn plot_err<E: Display>(e: E) -> GloveError {
    GloveError::Plot(e.to_string())
}

/// Axis ranges covering every finite point, padded when a range collapses.
pub fn chart_bounds<'a, I>(points: I) -> (Range<f64>, Range<f64>)
where
    I: IntoIterator<Item = &'a (f64, f64)>
{
    let mut x_spec = f64::INFINITY..f64::NEG_INFINITY;
    let mut y_spec = f64::INFINITY..f64::NEG_INFINITY;
    for (x, y) in points {
        x_spec = x_spec.start.min(*x)..x_spec.end.max(*x);
        y_spec = y_spec.start.min(*y)..y_spec.end.max(*y);
    }

    let pad = |spec: Range<f64>| {
        if !(spec.start <= spec.end) {
            0.0..1.0
        } else if spec.end - spec.start < f64::EPSILON {
            spec.start - 0.5..spec.end + 0.5
        } else {
            spec
        }
    };
    (pad(x_spec), pad(y_spec))
}

/// Costs of both runs on one chart: SGD against its record index, GD against
/// elapsed minutes.
pub fn draw_comparison(save_to: &Path, sgd: &History, gd: &History) -> Result<()> {

    const MARGIN: u32 = 15;
    const FONT_STYLE: (&str, i32) = ("sans-serif", 20);

    let finite = |(x, y): &(f64, f64)| x.is_finite() && y.is_finite();
    let sgd_points: Vec<(f64, f64)> = sgd.costs.iter().enumerate()
        .map(|(i, cost)| (i as f64, *cost))
        .filter(finite)
        .collect();
    let gd_points: Vec<(f64, f64)> = gd.minutes.iter().zip(&gd.costs)
        .map(|(minutes, cost)| (*minutes, *cost))
        .filter(finite)
        .collect();

    let dropped = sgd.costs.len() + gd.costs.len() - sgd_points.len() - gd_points.len();
    if dropped > 0 {
        warn!("{} non finite costs left out of the chart", dropped);
    }

    let (x_spec, y_spec) = chart_bounds(sgd_points.iter().chain(gd_points.iter()));

    let root_area = BitMapBackend::new(save_to, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root_area)
    .caption("Learning - SGD vs GD", FONT_STYLE.into_font())
    .margin(MARGIN)
    .x_label_area_size(40)
    .y_label_area_size(70)
    .build_cartesian_2d(x_spec, y_spec)
    .map_err(plot_err)?;

    chart
    .configure_mesh()
    .x_desc("Minutes")
    .y_desc("Cost")
    .draw()
    .map_err(plot_err)?;

    chart
    .draw_series(LineSeries::new(sgd_points, &BLUE))
    .map_err(plot_err)?
    .label("SGD")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
    .draw_series(LineSeries::new(gd_points, &RED))
    .map_err(plot_err)?
    .label("GD")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
    .configure_series_labels()
    .background_style(&WHITE.mix(0.8))
    .border_style(&BLACK)
    .draw()
    .map_err(plot_err)?;

    root_area.present().map_err(plot_err)?;
    Ok(())

}
