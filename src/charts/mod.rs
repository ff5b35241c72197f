//! PNG chart rendering for run reports and comparisons.

use std::path::Path;

use plotters::prelude::*;

use crate::error::AppResult;
use crate::metrics::{EndpointAggregate, RunReport};

const CHART_SIZE: (u32, u32) = (1200, 600);
/// Palette carried over from the comparison tooling.
const COLOR_LEFT: RGBColor = RGBColor(46, 134, 171);
const COLOR_RIGHT: RGBColor = RGBColor(196, 85, 8);
const COLOR_AVG: RGBColor = RGBColor(42, 157, 143);
const COLOR_P50: RGBColor = RGBColor(46, 134, 171);
const COLOR_P95: RGBColor = RGBColor(241, 143, 1);
const COLOR_P99: RGBColor = RGBColor(231, 111, 81);

struct BarSeries {
    label: String,
    color: RGBColor,
    /// Milliseconds per group; `None` skips the bar (no successful samples).
    values: Vec<Option<f64>>,
}

/// Renders the per-endpoint latency percentile chart for one run.
/// Endpoints without successful requests are left out rather than plotted
/// as zero.
///
/// # Errors
///
/// Returns an error when the output directory or PNG cannot be written.
pub fn render_run_charts(report: &RunReport, dir: &Path) -> AppResult<()> {
    let endpoints: Vec<(&String, &EndpointAggregate)> = report
        .endpoints
        .iter()
        .filter(|(_, aggregate)| aggregate.avg_response_time.is_some())
        .collect();
    if endpoints.is_empty() {
        return Ok(());
    }

    std::fs::create_dir_all(dir)?;
    let labels: Vec<String> = endpoints.iter().map(|(label, _)| (*label).clone()).collect();
    let series = [
        BarSeries {
            label: "avg".to_owned(),
            color: COLOR_AVG,
            values: collect_ms(&endpoints, |aggregate| aggregate.avg_response_time),
        },
        BarSeries {
            label: "p50".to_owned(),
            color: COLOR_P50,
            values: collect_ms(&endpoints, |aggregate| aggregate.p50_response_time),
        },
        BarSeries {
            label: "p95".to_owned(),
            color: COLOR_P95,
            values: collect_ms(&endpoints, |aggregate| aggregate.p95_response_time),
        },
        BarSeries {
            label: "p99".to_owned(),
            color: COLOR_P99,
            values: collect_ms(&endpoints, |aggregate| aggregate.p99_response_time),
        },
    ];

    let path = dir.join("latency_percentiles.png");
    draw_grouped_bars(
        &path,
        &format!("Latency Percentiles - {}", report.test_name),
        &labels,
        &series,
    )
}

/// Renders one side-by-side chart per percentile comparing two runs.
///
/// # Errors
///
/// Returns an error when the output directory or a PNG cannot be written.
pub fn render_compare_charts(left: &RunReport, right: &RunReport, dir: &Path) -> AppResult<()> {
    let labels: Vec<String> = left
        .endpoints
        .keys()
        .filter(|label| right.endpoints.contains_key(*label))
        .cloned()
        .collect();
    if labels.is_empty() {
        return Ok(());
    }

    std::fs::create_dir_all(dir)?;
    let metrics: [(&str, fn(&EndpointAggregate) -> Option<f64>); 3] = [
        ("P50", |aggregate| aggregate.p50_response_time),
        ("P95", |aggregate| aggregate.p95_response_time),
        ("P99", |aggregate| aggregate.p99_response_time),
    ];

    for (name, extract) in metrics {
        let series = [
            BarSeries {
                label: left.test_name.clone(),
                color: COLOR_LEFT,
                values: labels
                    .iter()
                    .map(|label| left.endpoints.get(label).and_then(extract).map(to_ms))
                    .collect(),
            },
            BarSeries {
                label: right.test_name.clone(),
                color: COLOR_RIGHT,
                values: labels
                    .iter()
                    .map(|label| right.endpoints.get(label).and_then(extract).map(to_ms))
                    .collect(),
            },
        ];
        let path = dir.join(format!("compare_{}.png", name));
        draw_grouped_bars(
            &path,
            &format!("{} Response Time - {} vs {}", name, left.test_name, right.test_name),
            &labels,
            &series,
        )?;
    }
    Ok(())
}

fn collect_ms(
    endpoints: &[(&String, &EndpointAggregate)],
    extract: fn(&EndpointAggregate) -> Option<f64>,
) -> Vec<Option<f64>> {
    endpoints
        .iter()
        .map(|(_, aggregate)| extract(aggregate).map(to_ms))
        .collect()
}

const fn to_ms(seconds: f64) -> f64 {
    seconds * 1000.0
}

fn draw_grouped_bars(
    path: &Path,
    title: &str,
    group_labels: &[String],
    series: &[BarSeries],
) -> AppResult<()> {
    let y_max = series
        .iter()
        .flat_map(|bar_series| bar_series.values.iter().flatten())
        .fold(1.0_f64, |max, value| max.max(*value));

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let group_count = group_labels.len();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..group_count as f64, 0.0..y_max * 1.15)?;

    let axis_labels = group_labels.to_vec();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(group_count)
        .x_label_formatter(&move |x| {
            let index = x.floor().max(0.0) as usize;
            axis_labels.get(index).cloned().unwrap_or_default()
        })
        .y_desc("Response Time (ms)")
        .draw()?;

    let bar_count = series.len().max(1);
    let group_width = 0.8_f64;
    let bar_width = group_width / bar_count as f64;

    for (series_index, bar_series) in series.iter().enumerate() {
        let color = bar_series.color;
        chart
            .draw_series(bar_series.values.iter().enumerate().filter_map(
                |(group_index, value)| {
                    let value = (*value)?;
                    let x0 = group_index as f64
                        + 0.1
                        + series_index as f64 * bar_width;
                    Some(Rectangle::new(
                        [(x0, 0.0), (x0 + bar_width, value)],
                        color.filled(),
                    ))
                },
            ))?
            .label(bar_series.label.clone())
            .legend(move |(x, y)| {
                Rectangle::new(
                    [
                        (x, y.saturating_sub(5)),
                        (x.saturating_add(10), y.saturating_add(5)),
                    ],
                    color.filled(),
                )
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}
