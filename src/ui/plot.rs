use std::collections::BTreeMap;
use std::f32::consts::TAU;

use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Rect, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{self, ColorMap, Scale};
use crate::data::aggregate::{BoxStats, CategoryTotals, CorrelationMatrix, EntityYearPivot, YearTotals};
use crate::data::metrics::{format_thousands, truncate_label};

use super::treemap;

/// Label for an integer axis position, empty between positions.
fn index_label(labels: &[String], mark: GridMark) -> String {
    let idx = mark.value.round();
    if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(|l| truncate_label(l, 25))
        .unwrap_or_default()
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Horizontal bars, one per item, coloured by value along `scale`.
pub fn horizontal_bars(ui: &mut Ui, id: &str, items: &[(String, f64)], scale: Scale, height: f32) {
    let (lo, hi) = min_max(items.iter().map(|(_, v)| *v));
    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, (label, v))| {
            Bar::new(i as f64, *v)
                .name(label)
                .fill(color::sequential(scale, color::normalize(*v, lo, hi)))
        })
        .collect();
    let labels: Vec<String> = items.iter().map(|(l, _)| l.clone()).collect();

    Plot::new(id)
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_label("Total Deaths")
        .y_axis_formatter(move |mark, _range| index_label(&labels, mark))
        .x_axis_formatter(|mark, _range| format_thousands(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7));
        });
}

/// Vertical bars for a category summary.
pub fn vertical_bars(ui: &mut Ui, id: &str, totals: &CategoryTotals, scale: Scale, height: f32) {
    let (lo, hi) = min_max(totals.iter().map(|(_, v)| v));
    let bars: Vec<Bar> = totals
        .iter()
        .enumerate()
        .map(|(i, (label, v))| {
            Bar::new(i as f64, v)
                .name(label)
                .fill(color::sequential(scale, color::normalize(v, lo, hi)))
        })
        .collect();
    let labels: Vec<String> = totals.iter().map(|(l, _)| l.to_string()).collect();

    Plot::new(id)
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .y_axis_label("Total Deaths")
        .x_axis_formatter(move |mark, _range| index_label(&labels, mark))
        .y_axis_formatter(|mark, _range| format_thousands(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.7));
        });
}

// ---------------------------------------------------------------------------
// Donut (pie with a hole)
// ---------------------------------------------------------------------------

/// Donut chart with a legend of percentages on the right.
pub fn donut(ui: &mut Ui, items: &[(String, f64)], hole: f32, height: f32) {
    let total: f64 = items.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        ui.label("No deaths recorded for the selection.");
        return;
    }
    let palette = color::generate_palette(items.len());

    ui.horizontal(|ui| {
        let (response, painter) = ui.allocate_painter(vec2(height, height), Sense::hover());
        let center = response.rect.center();
        let outer = height * 0.48;
        let inner = outer * hole;

        let mut start = -TAU / 4.0;
        let mut hovered = None;
        for ((label, value), fill) in items.iter().zip(&palette) {
            let sweep = (value.max(0.0) / total) as f32 * TAU;
            let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                let at = |r: f32, a: f32| center + vec2(a.cos(), a.sin()) * r;
                painter.add(Shape::convex_polygon(
                    vec![at(inner, a0), at(outer, a0), at(outer, a1), at(inner, a1)],
                    *fill,
                    Stroke::NONE,
                ));
            }
            if let Some(pos) = response.hover_pos() {
                let d = pos - center;
                let angle = (d.y.atan2(d.x) + TAU / 4.0).rem_euclid(TAU) - TAU / 4.0;
                let within = (inner..=outer).contains(&d.length());
                if within && angle >= start && angle < start + sweep {
                    hovered = Some(format!("{label}: {}", format_thousands(*value)));
                }
            }
            start += sweep;
        }
        if let Some(text) = hovered {
            response.on_hover_text_at_pointer(text);
        }

        ui.vertical(|ui| {
            for ((label, value), fill) in items.iter().zip(&palette) {
                let pct = value / total * 100.0;
                ui.colored_label(*fill, format!("■ {} ({pct:.1}%)", truncate_label(label, 25)));
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// One line with markers per category across years.
pub fn trend_lines(ui: &mut Ui, id: &str, by_year: &[YearTotals], categories: &[String], height: f32) {
    let palette = color::generate_palette(categories.len());
    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Deaths")
        .y_axis_formatter(|mark, _range| format_thousands(mark.value))
        .show(ui, |plot_ui| {
            for (category, color) in categories.iter().zip(palette) {
                let points: Vec<[f64; 2]> = by_year
                    .iter()
                    .filter_map(|y| y.totals.get(category).map(|v| [y.year as f64, v]))
                    .collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(category)
                        .color(color)
                        .width(3.0),
                );
                plot_ui.points(Points::new(PlotPoints::from(points)).name(category).color(color).radius(3.0));
            }
        });
}

/// Stacked areas: each series drawn on top of the ones before it.
pub fn stacked_area(
    ui: &mut Ui,
    id: &str,
    years: &[i32],
    series: &[(String, Vec<f64>)],
    color_for: impl Fn(usize, &str) -> Color32,
    height: f32,
) {
    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Deaths")
        .y_axis_formatter(|mark, _range| format_thousands(mark.value))
        .show(ui, |plot_ui| {
            let mut base = vec![0.0; years.len()];
            let mut layers = Vec::with_capacity(series.len());
            for (name, values) in series {
                for (b, v) in base.iter_mut().zip(values) {
                    *b += v;
                }
                layers.push((name, base.clone()));
            }
            // Draw the tallest layer first so lower layers stay visible.
            for (i, (name, tops)) in layers.iter().enumerate().rev() {
                let points: Vec<[f64; 2]> = years
                    .iter()
                    .zip(tops)
                    .map(|(y, v)| [*y as f64, *v])
                    .collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .name(*name)
                        .color(color_for(i, name))
                        .fill(0.0),
                );
            }
        });
}

/// Stacked area of one category per entity from a year × entity pivot.
pub fn pivot_area(ui: &mut Ui, id: &str, pivot: &EntityYearPivot, color_map: &ColorMap, height: f32) {
    let years: Vec<i32> = pivot.keys().copied().collect();
    let mut entities: Vec<&String> = pivot.values().flat_map(|row| row.keys()).collect();
    entities.sort();
    entities.dedup();
    let series: Vec<(String, Vec<f64>)> = entities
        .into_iter()
        .map(|e| {
            let values = pivot
                .values()
                .map(|row| row.get(e).copied().unwrap_or(0.0))
                .collect();
            (e.clone(), values)
        })
        .collect();
    stacked_area(ui, id, &years, &series, |_, name| color_map.color_for(name), height);
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

pub fn box_plot(ui: &mut Ui, id: &str, distribution: &BTreeMap<String, BoxStats>, color_map: &ColorMap, height: f32) {
    let labels: Vec<String> = distribution.keys().cloned().collect();
    let boxes: Vec<BoxElem> = distribution
        .iter()
        .enumerate()
        .map(|(i, (entity, s))| {
            let c = color_map.color_for(entity);
            BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                .name(entity)
                .fill(c.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, c))
        })
        .collect();

    Plot::new(id)
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| index_label(&labels, mark))
        .y_axis_formatter(|mark, _range| format_thousands(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes));
        });
}

// ---------------------------------------------------------------------------
// Painter-based grids: heatmap, correlation, treemap
// ---------------------------------------------------------------------------

const LABEL_WIDTH: f32 = 140.0;
const HEADER_HEIGHT: f32 = 90.0;

/// Colour-coded grid with row labels on the left and column labels on top.
fn grid(
    ui: &mut Ui,
    rows: &[String],
    cols: &[String],
    height: f32,
    cell: impl Fn(usize, usize) -> (Color32, String),
) {
    if rows.is_empty() || cols.is_empty() {
        ui.label("Nothing to show.");
        return;
    }
    let width = ui.available_width();
    let (response, painter) = ui.allocate_painter(vec2(width, height), Sense::hover());
    let area = Rect::from_min_max(
        response.rect.min + vec2(LABEL_WIDTH, HEADER_HEIGHT),
        response.rect.max,
    );
    let cw = area.width() / cols.len() as f32;
    let ch = area.height() / rows.len() as f32;
    let text_color = ui.visuals().text_color();
    let font = FontId::proportional(11.0);

    for (c, name) in cols.iter().enumerate() {
        let anchor = pos2(area.min.x + cw * (c as f32 + 0.5), area.min.y - 4.0);
        let galley = painter.layout_no_wrap(truncate_label(name, 18), font.clone(), text_color);
        let text = egui::epaint::TextShape::new(anchor, galley, text_color)
            .with_angle(-TAU / 8.0);
        painter.add(text);
    }

    let mut hovered = None;
    for (r, row_name) in rows.iter().enumerate() {
        let y = area.min.y + ch * r as f32;
        painter.text(
            pos2(area.min.x - 6.0, y + ch / 2.0),
            Align2::RIGHT_CENTER,
            truncate_label(row_name, 20),
            font.clone(),
            text_color,
        );
        for c in 0..cols.len() {
            let rect = Rect::from_min_size(pos2(area.min.x + cw * c as f32, y), vec2(cw, ch)).shrink(0.5);
            let (fill, label) = cell(r, c);
            painter.rect_filled(rect, 0.0, fill);
            if cw > 40.0 && ch > 14.0 {
                painter.text(rect.center(), Align2::CENTER_CENTER, &label, font.clone(), Color32::BLACK);
            }
            if response.hover_pos().is_some_and(|p| rect.contains(p)) {
                hovered = Some(format!("{row_name} × {}: {label}", cols[c]));
            }
        }
    }
    if let Some(text) = hovered {
        response.on_hover_text_at_pointer(text);
    }
}

/// Entity × category totals on a sequential scale.
pub fn heatmap(ui: &mut Ui, matrix: &BTreeMap<String, CategoryTotals>, height: f32) {
    let rows: Vec<String> = matrix.keys().cloned().collect();
    let cols: Vec<String> = matrix
        .values()
        .next()
        .map(|t| t.iter().map(|(c, _)| c.to_string()).collect())
        .unwrap_or_default();
    let (lo, hi) = min_max(matrix.values().flat_map(|t| t.iter().map(|(_, v)| v)));
    let values: Vec<&CategoryTotals> = matrix.values().collect();
    grid(ui, &rows, &cols, height, |r, c| {
        let v = values[r].get(&cols[c]).unwrap_or(0.0);
        (
            color::sequential(Scale::Heat, color::normalize(v, lo, hi)),
            format_thousands(v),
        )
    });
}

/// Pearson matrix on a diverging scale; NaN cells are grey.
pub fn correlation(ui: &mut Ui, matrix: &CorrelationMatrix, height: f32) {
    grid(ui, &matrix.categories, &matrix.categories, height, |r, c| {
        let v = matrix.get(r, c);
        let label = if v.is_nan() { "n/a".to_string() } else { format!("{v:.2}") };
        (color::diverging(v), label)
    });
}

/// Two-level treemap: entities, then categories within each entity.
pub fn treemap(ui: &mut Ui, matrix: &BTreeMap<String, CategoryTotals>, height: f32) {
    let outer_items: Vec<(String, f64)> = matrix
        .iter()
        .map(|(e, t)| (e.clone(), t.grand_total()))
        .collect();
    let (lo, hi) = min_max(matrix.values().flat_map(|t| t.iter().map(|(_, v)| v)));

    let width = ui.available_width();
    let (response, painter) = ui.allocate_painter(vec2(width, height), Sense::hover());
    let tiles = treemap::slice(response.rect, &outer_items);
    if tiles.is_empty() {
        painter.text(
            response.rect.center(),
            Align2::CENTER_CENTER,
            "No deaths recorded for the selection.",
            FontId::proportional(14.0),
            ui.visuals().text_color(),
        );
        return;
    }

    let font = FontId::proportional(11.0);
    let mut hovered = None;
    for tile in &tiles {
        let header = Rect::from_min_size(tile.rect.min, vec2(tile.rect.width(), 16.0));
        painter.rect_filled(tile.rect, 0.0, Color32::from_gray(40));
        painter.text(
            header.left_center() + vec2(3.0, 0.0),
            Align2::LEFT_CENTER,
            truncate_label(&tile.label, 20),
            font.clone(),
            Color32::WHITE,
        );

        let body = Rect::from_min_max(pos2(tile.rect.min.x, header.max.y), tile.rect.max).shrink(1.0);
        let inner: Vec<(String, f64)> = matrix
            .get(&tile.label)
            .map(|t| t.iter().map(|(c, v)| (c.to_string(), v)).collect())
            .unwrap_or_default();
        for leaf in treemap::slice(body, &inner) {
            let fill = color::sequential(Scale::Heat, color::normalize(leaf.value, lo, hi));
            painter.rect_filled(leaf.rect.shrink(0.5), 0.0, fill);
            if leaf.rect.width() > 60.0 && leaf.rect.height() > 16.0 {
                painter.text(
                    leaf.rect.center(),
                    Align2::CENTER_CENTER,
                    truncate_label(&leaf.label, 12),
                    font.clone(),
                    Color32::BLACK,
                );
            }
            if response.hover_pos().is_some_and(|p| leaf.rect.contains(p)) {
                hovered = Some(format!("{} / {}: {}", tile.label, leaf.label, format_thousands(leaf.value)));
            }
        }
    }
    if let Some(text) = hovered {
        response.on_hover_text_at_pointer(text);
    }
}
