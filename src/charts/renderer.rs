//! Static Chart Renderer
//! Draws chart specs into PNG images with plotters.
//!
//! Layouts:
//! - Line: tuition trend with markers and a filled area down to zero
//! - Horizontal bar: one bar per label, optional text at the bar end
//! - Grouped horizontal bar: two bars per label (early / mid career)
//! - Indicator: one large number with its delta against a reference

use super::spec::{ChartKind, ChartSpec, Indicator};
use super::theme::{Rgb, DARK_BG, GRID_COLOR, LIGHT_BG, NEON_CYAN, NEON_MAGENTA, TEXT_COLOR};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::io::Cursor;
use thiserror::Error;

const FONT: &str = "sans-serif";
/// Room for major names on the category axis.
const LABEL_AREA: u32 = 260;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Invalid image size {0}x{1}")]
    Size(u32, u32),
}

fn draw_err<E: Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render a chart spec to PNG bytes.
    pub fn render_png(spec: &ChartSpec, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Size(width, height));
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, spec)?;
            root.present().map_err(draw_err)?;
        }

        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Size(width, height))?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Draw a chart spec onto any plotters drawing area.
    pub fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<(), RenderError> {
        root.fill(&color(LIGHT_BG)).map_err(draw_err)?;

        match spec.kind {
            ChartKind::Indicator => match &spec.indicator {
                Some(indicator) => Self::draw_indicator(root, &spec.title, indicator),
                None => Self::draw_no_data(root, &spec.title),
            },
            _ if spec.point_count() == 0 => Self::draw_no_data(root, &spec.title),
            ChartKind::Line => Self::draw_line(root, spec),
            ChartKind::HorizontalBar => Self::draw_bars(root, spec),
            ChartKind::GroupedHorizontalBar => Self::draw_grouped_bars(root, spec),
        }
    }

    fn title_style(size: f64) -> TextStyle<'static> {
        (FONT, size).into_font().color(&color(NEON_MAGENTA))
    }

    fn text_style(size: f64) -> TextStyle<'static> {
        (FONT, size).into_font().color(&color(TEXT_COLOR))
    }

    fn centered(style: TextStyle<'static>) -> TextStyle<'static> {
        style.pos(Pos::new(HPos::Center, VPos::Center))
    }

    fn draw_no_data<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, title: &str) -> Result<(), RenderError> {
        let (w, h) = root.dim_in_pixel();
        root.draw(&Text::new(
            title.to_string(),
            (w as i32 / 2, 30),
            Self::centered(Self::title_style(22.0)),
        ))
        .map_err(draw_err)?;
        root.draw(&Text::new(
            "No data".to_string(),
            (w as i32 / 2, h as i32 / 2),
            Self::centered(Self::text_style(20.0)),
        ))
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_indicator<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        indicator: &Indicator,
    ) -> Result<(), RenderError> {
        let (w, h) = root.dim_in_pixel();
        let cx = w as i32 / 2;
        let cy = h as i32 / 2;

        root.draw(&Text::new(title.to_string(), (cx, cy - 110), Self::centered(Self::text_style(24.0))))
            .map_err(draw_err)?;
        root.draw(&Text::new(
            indicator.subtitle.clone(),
            (cx, cy - 80),
            Self::centered(Self::text_style(14.0)),
        ))
        .map_err(draw_err)?;

        let headline = match indicator.value {
            Some(v) => format!("{v:.1}{}", indicator.suffix),
            None => "No data".to_string(),
        };
        root.draw(&Text::new(headline, (cx, cy), Self::centered(Self::title_style(48.0))))
            .map_err(draw_err)?;

        if let Some(delta) = indicator.delta {
            let arrow = if delta <= 0.0 { "▼" } else { "▲" };
            let delta_color = if delta <= 0.0 { NEON_CYAN } else { NEON_MAGENTA };
            root.draw(&Text::new(
                format!("{arrow} {:.1} vs {:.0}-year reference", delta.abs(), indicator.reference),
                (cx, cy + 60),
                Self::centered((FONT, 18.0).into_font().color(&color(delta_color))),
            ))
            .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_line<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<(), RenderError> {
        let magenta = color(NEON_MAGENTA);
        let series = &spec.series[0];
        let xs: Vec<f64> = if series.x.len() == series.values.len() {
            series.x.clone()
        } else {
            (0..series.values.len()).map(|i| i as f64).collect()
        };
        let points: Vec<(f64, f64)> = xs.iter().copied().zip(series.values.iter().copied()).collect();

        let (x_min, x_max) = padded_range(&xs, 0.0);
        let (_, y_max) = value_range(&series.values);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, Self::title_style(22.0))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max * 1.1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_title.as_str())
            .y_desc(spec.y_title.as_str())
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .axis_desc_style(Self::text_style(14.0))
            .label_style(Self::text_style(12.0))
            .axis_style(color(GRID_COLOR))
            .bold_line_style(color(GRID_COLOR))
            .light_line_style(color(DARK_BG))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(AreaSeries::new(points.clone(), 0.0, magenta.mix(0.1)))
            .map_err(draw_err)?;
        chart
            .draw_series(LineSeries::new(points.clone(), magenta.stroke_width(3)))
            .map_err(draw_err)?;
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 4, magenta.filled())))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<(), RenderError> {
        let series = &spec.series[0];
        let n = series.len();
        let (_, x_max) = value_range(&series.values);
        let labels = &series.labels;

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, Self::title_style(22.0))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(LABEL_AREA)
            .build_cartesian_2d(0f64..x_max * 1.15, (0usize..n).into_segmented())
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&|v| segment_label(labels, v))
            .x_desc(spec.x_title.as_str())
            .axis_desc_style(Self::text_style(14.0))
            .label_style(Self::text_style(11.0))
            .axis_style(color(GRID_COLOR))
            .bold_line_style(color(GRID_COLOR))
            .light_line_style(color(DARK_BG))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(series.values.iter().enumerate().map(|(i, &v)| {
                let fill = color(series.color_at(i).unwrap_or(NEON_MAGENTA));
                let mut bar = Rectangle::new(
                    [(0.0, SegmentValue::Exact(i)), (v, SegmentValue::Exact(i + 1))],
                    fill.filled(),
                );
                bar.set_margin(3, 3, 0, 0);
                bar
            }))
            .map_err(draw_err)?;

        if !series.text.is_empty() {
            chart
                .draw_series(series.values.iter().zip(&series.text).enumerate().map(|(i, (&v, text))| {
                    Text::new(
                        format!("  {text}"),
                        (v, SegmentValue::CenterOf(i)),
                        Self::text_style(11.0).pos(Pos::new(HPos::Left, VPos::Center)),
                    )
                }))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_grouped_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), RenderError> {
        let labels = &spec.series[0].labels;
        let n = labels.len();
        let all_values: Vec<f64> = spec.series.iter().flat_map(|s| s.values.iter().copied()).collect();
        let (_, x_max) = value_range(&all_values);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, Self::title_style(20.0))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(LABEL_AREA)
            .build_cartesian_2d(0f64..x_max * 1.1, (0usize..n).into_segmented())
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&|v| segment_label(labels, v))
            .x_desc(spec.x_title.as_str())
            .axis_desc_style(Self::text_style(14.0))
            .label_style(Self::text_style(10.0))
            .axis_style(color(GRID_COLOR))
            .bold_line_style(color(GRID_COLOR))
            .light_line_style(color(DARK_BG))
            .draw()
            .map_err(draw_err)?;

        // Split each label's band between the series.
        let band = chart.plotting_area().dim_in_pixel().1 / n.max(1) as u32;
        let groups = spec.series.len().max(1) as u32;
        let slot = band / groups;

        for (g, series) in spec.series.iter().enumerate() {
            let fill = color(series.color_at(0).unwrap_or(NEON_MAGENTA));
            let g = g as u32;
            let top = 2 + slot * g;
            let bottom = 2 + slot * (groups - g - 1);

            chart
                .draw_series(series.values.iter().enumerate().map(|(i, &v)| {
                    let mut bar = Rectangle::new(
                        [(0.0, SegmentValue::Exact(i)), (v, SegmentValue::Exact(i + 1))],
                        fill.filled(),
                    );
                    bar.set_margin(top, bottom, 0, 0);
                    bar
                }))
                .map_err(draw_err)?
                .label(series.name.clone())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], fill.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(color(DARK_BG).mix(0.8))
            .border_style(color(GRID_COLOR))
            .label_font(Self::text_style(12.0))
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }
}

fn segment_label(labels: &[String], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Min and max of the finite values, widened so the range is never empty.
fn value_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max <= 0.0 {
        return (min, 1.0);
    }
    (min, max)
}

fn padded_range(values: &[f64], pad: f64) -> (f64, f64) {
    let (min, max) = value_range(values);
    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min - pad, max + pad)
    }
}
