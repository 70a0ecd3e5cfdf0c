//! SVG line charts of numeric series.

use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    /// Y-axis label, typically the series unit.
    pub y_label: String,
    pub series_name: String,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_label: String::new(),
            series_name: String::new(),
            width: 1200,
            height: 800,
        }
    }

    pub fn with_y_label(mut self, y_label: impl Into<String>) -> Self {
        self.y_label = y_label.into();
        self
    }

    pub fn with_series_name(mut self, name: impl Into<String>) -> Self {
        self.series_name = name.into();
        self
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Renders `(timestamp_ms, value)` points as an SVG document.
pub fn render_svg(spec: &ChartSpec, points: &[(i64, f64)]) -> Result<String> {
    let data: Vec<(DateTime<Utc>, f64)> = points
        .iter()
        .filter(|(_, v)| v.is_finite())
        .filter_map(|&(ts, v)| DateTime::<Utc>::from_timestamp_millis(ts).map(|t| (t, v)))
        .collect();

    if data.is_empty() {
        return Err(Error::Plot("no datapoints to plot".to_string()));
    }

    let (mut x_min, mut x_max) = (data[0].0, data[0].0);
    let (mut y_min, mut y_max) = (data[0].1, data[0].1);
    for &(t, v) in &data {
        x_min = x_min.min(t);
        x_max = x_max.max(t);
        y_min = y_min.min(v);
        y_max = y_max.max(v);
    }
    if x_min == x_max {
        x_max = x_min + Duration::hours(1);
    }
    let pad = if y_max > y_min {
        (y_max - y_min) * 0.05
    } else {
        1.0
    };
    let x_range: RangedDateTime<DateTime<Utc>> = (x_min..x_max).into();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 24))
            .margin(20i32)
            .x_label_area_size(40u32)
            .y_label_area_size(60u32)
            .build_cartesian_2d(x_range, (y_min - pad)..(y_max + pad))
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_labels(10_usize)
            .x_label_formatter(&|t: &DateTime<Utc>| t.format("%Y-%m-%d").to_string())
            .y_desc(spec.y_label.as_str())
            .draw()
            .map_err(plot_err)?;

        let series = chart
            .draw_series(LineSeries::new(data.iter().copied(), BLUE))
            .map_err(plot_err)?;

        if !spec.series_name.is_empty() {
            series
                .label(spec.series_name.as_str())
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_err)?;
        }

        root.present().map_err(plot_err)?;
    }

    Ok(svg)
}

/// Renders the chart and writes it to `path`.
pub fn write_svg(path: &Path, spec: &ChartSpec, points: &[(i64, f64)]) -> Result<()> {
    let svg = render_svg(spec, points)?;
    std::fs::write(path, svg)
        .map_err(|e| Error::Plot(format!("failed to write {}: {}", path.display(), e)))
}
