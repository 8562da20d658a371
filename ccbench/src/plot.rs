// CCBench: TCP Congestion Control Experiments in Mininet
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Plots
//!
//! Renders the two time series charts of an experiment as PNG images: the congestion window of
//! both senders, and their throughput (fairness graph).

use crate::hosts::PerSender;
use crate::telemetry::{extent, CwndSample, Sample, ThroughputSample};
use crate::{Error, Result};

use log::*;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const PLOT_SIZE: (u32, u32) = (1024, 768);
static SERIES_COLORS: [RGBColor; 2] = [BLUE, RED];

/// Draw the congestion window of both senders over time.
pub fn draw_cwnd_plot(
    path: impl AsRef<Path>,
    data: &PerSender<Vec<CwndSample>>,
    algorithm: &str,
    delay: u32,
) -> Result<()> {
    info!("*** Drawing the cwnd vs time plot...");
    draw_time_series(path.as_ref(), &cwnd_title(algorithm, delay), "Cwnd (MSS)", data)
}

/// Draw the throughput of both senders over time.
pub fn draw_fairness_plot(
    path: impl AsRef<Path>,
    data: &PerSender<Vec<ThroughputSample>>,
    algorithm: &str,
    delay: u32,
) -> Result<()> {
    info!("*** Drawing the fairness plot...");
    draw_time_series(path.as_ref(), &fairness_title(algorithm, delay), "Bandwidth (Mbps)", data)
}

/// Title of the congestion window plot
pub fn cwnd_title(algorithm: &str, delay: u32) -> String {
    format!(
        "Cwnd vs. Time Graph: {} TCP Congestion Control Algorithm Delay={}ms",
        capitalize(algorithm),
        delay
    )
}

/// Title of the fairness plot
pub fn fairness_title(algorithm: &str, delay: u32) -> String {
    format!(
        "TCP Fairness Graph: {} TCP Congestion Control Algorithm Delay={}ms",
        capitalize(algorithm),
        delay
    )
}

/// Uppercase the first character, and lowercase all others (`bbr` -> `Bbr`).
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Axis ranges for the given extent. The time axis starts at zero and ends at the last sample;
/// the value axis leaves 10% headroom. Empty or degenerate extents fall back to `0..1`.
pub fn axis_ranges(extent: Option<(f64, f64)>) -> (Range<f64>, Range<f64>) {
    let (t, v) = extent.unwrap_or((0.0, 0.0));
    let x_max = if t > 0.0 { t } else { 1.0 };
    let y_max = if v > 0.0 { v * 1.1 } else { 1.0 };
    (0.0..x_max, 0.0..y_max)
}

fn draw_time_series<S: Sample>(
    path: &Path,
    title: &str,
    y_desc: &str,
    data: &PerSender<Vec<S>>,
) -> Result<()> {
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let (x_range, y_range) = axis_ranges(extent(vec![data.h1.as_slice(), data.h3.as_slice()]));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_err)?;

    chart.configure_mesh().x_desc("Time (sec)").y_desc(y_desc).draw().map_err(plot_err)?;

    for ((sender, samples), color) in data.iter().zip(SERIES_COLORS.iter()) {
        chart
            .draw_series(LineSeries::new(samples.iter().map(|s| (s.time(), s.value())), color))
            .map_err(plot_err)?
            .label(sender.legend())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    debug!("Plot saved to {}", path.display());
    Ok(())
}

fn plot_err<E: std::fmt::Display>(e: E) -> Error {
    Error::PlotError(e.to_string())
}
