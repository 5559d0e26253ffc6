//! HTML page for a [`UiDescription`]
//!
//! The page is a single MiniJinja template with auto-escaping. Chart
//! geometry is computed by the `line_chart` and `bar_chart` template
//! functions so the template only places SVG elements.

use minijinja::value::{Value, ViaDeserialize};
use minijinja::{Environment, context};
use serde::Serialize;

use super::format::grouped;
use super::{ChartPoint, UiDescription};
use crate::error::Result;

const TEMPLATE_NAME: &str = "dashboard.html";

const CHART_WIDTH: f64 = 900.0;
const CHART_HEIGHT: f64 = 320.0;
const CHART_PADDING: f64 = 40.0;
/// Longest bar label drawn under the axis; the full label stays in the tooltip
const BAR_LABEL_CHARS: usize = 14;

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ page.title }}{% if page.input %} - {{ page.input.ticker }}{% endif %}</title>
<style>
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; color: #222; }
form { display: flex; gap: 1rem; align-items: end; margin-bottom: 1.5rem; }
label { display: flex; flex-direction: column; font-size: .9rem; }
.field { margin: .2rem 0; }
.field b { display: inline-block; min-width: 12rem; }
.notice { padding: .5rem .8rem; border-radius: 4px; margin: .5rem 0; }
.notice.info { background: #e8f1fb; }
.notice.warning { background: #fff4d6; }
.notice.error { background: #fde2e1; }
table { border-collapse: collapse; }
td, th { border: 1px solid #ccc; padding: .25rem .6rem; text-align: left; }
svg text { font-size: 11px; fill: #555; }
details.tab { margin: .5rem 0; }
</style>
</head>
<body>
<h1>{{ page.title }}</h1>
<form method="get" action="/dashboard">
  <label>Enter Company Ticker (e.g., AAPL)
    <input name="ticker" value="{{ page.input.ticker if page.input else '' }}" required></label>
  <label>Start Date
    <input type="date" name="start" value="{{ page.input.start if page.input and page.input.start else '' }}" required></label>
  <label>End Date
    <input type="date" name="end" value="{{ page.input.end if page.input and page.input.end else '' }}" required></label>
  <button type="submit">Go</button>
</form>
{% macro widget(w) %}
{%- if w.kind == "heading" %}<h3>{{ w.text }}</h3>
{%- elif w.kind == "field" %}<div class="field"><b>{{ w.label }}:</b> {{ w.value }}</div>
{%- elif w.kind == "paragraph" %}<p>{{ w.text }}</p>
{%- elif w.kind == "notice" %}<div class="notice {{ w.level }}">{{ w.text }}</div>
{%- elif w.kind == "table" %}
<table>
  <tr>{% for h in w.headers %}<th>{{ h }}</th>{% endfor %}</tr>
  {% for row in w.rows %}<tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
  {% endfor %}
</table>
{%- elif w.kind == "line_chart" %}{% set chart = line_chart(w.points) %}
<svg viewBox="0 0 {{ chart.width }} {{ chart.height }}" width="100%" role="img" aria-label="{{ w.title }}">
  <text x="{{ chart.padding }}" y="16">{{ w.title }} ({{ w.y_label }})</text>
  <polyline fill="none" stroke="#1f77b4" stroke-width="1.5" points="{{ chart.points }}"/>
  <text x="2" y="{{ chart.padding }}">{{ chart.max }}</text>
  <text x="2" y="{{ chart.height - chart.padding }}">{{ chart.min }}</text>
  <text x="{{ chart.padding }}" y="{{ chart.height - 8 }}">{{ chart.first }}</text>
  <text x="{{ chart.width - chart.padding }}" y="{{ chart.height - 8 }}" text-anchor="end">{{ chart.last }}</text>
</svg>
{%- elif w.kind == "bar_chart" %}{% set bars = bar_chart(w.bars) %}
<svg viewBox="0 0 {{ bars.width }} {{ bars.height }}" width="100%" role="img" aria-label="{{ w.title }}">
  <text x="{{ bars.padding }}" y="16">{{ w.title }}</text>
  {% for bar in bars.rects %}
  <g><title>{{ bar.label }}: {{ bar.value }}</title>
    <rect x="{{ bar.x }}" y="{{ bar.y }}" width="{{ bar.width }}" height="{{ bar.height }}" fill="#2ca02c"/>
    <text x="{{ bar.x }}" y="{{ bars.height - 8 }}">{{ bar.short_label }}</text>
  </g>
  {% endfor %}
</svg>
<p><small>{{ w.x_label }} / {{ w.y_label }}</small></p>
{%- elif w.kind == "link" %}<div class="field"><b>URL:</b> <a href="{{ w.href }}" rel="noopener">{{ w.text }}</a></div>
{%- elif w.kind == "divider" %}<hr>
{%- endif %}
{% endmacro %}
{% for section in page.sections %}
<section>
  {% if section.collapsible %}<details><summary><h2 style="display:inline">{{ section.title }}</h2></summary>
  {% else %}<h2>{{ section.title }}</h2>{% endif %}
  {% for w in section.widgets %}
    {% if w.kind == "tabs" %}
      {% for tab in w.tabs %}
      <details class="tab"{% if loop.first %} open{% endif %}><summary>{{ tab.title }}</summary>
        {% for inner in tab.widgets %}{{ widget(inner) }}{% endfor %}
      </details>
      {% endfor %}
    {% else %}{{ widget(w) }}{% endif %}
  {% endfor %}
  {% if section.collapsible %}</details>{% endif %}
</section>
{% endfor %}
</body>
</html>
"##;

#[derive(Debug, Serialize)]
struct LineGeometry {
    width: f64,
    height: f64,
    padding: f64,
    /// SVG `points` attribute
    points: String,
    min: String,
    max: String,
    first: String,
    last: String,
}

#[derive(Debug, Serialize)]
struct BarRect {
    label: String,
    short_label: String,
    value: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Serialize)]
struct BarGeometry {
    width: f64,
    height: f64,
    padding: f64,
    rects: Vec<BarRect>,
}

/// Round to one decimal so the markup stays short
fn px(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn short_label(label: &str) -> String {
    if label.chars().count() <= BAR_LABEL_CHARS {
        return label.to_string();
    }
    let mut short: String = label.chars().take(BAR_LABEL_CHARS - 1).collect();
    short.push('…');
    short
}

fn line_geometry(points: &[ChartPoint]) -> LineGeometry {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        });
    let span = if max - min > f64::EPSILON { max - min } else { 1.0 };
    let plot_width = CHART_WIDTH - 2.0 * CHART_PADDING;
    let plot_height = CHART_HEIGHT - 2.0 * CHART_PADDING;
    let step = plot_width / (points.len().max(2) - 1) as f64;

    let coords: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = CHART_PADDING + i as f64 * step;
            let y = CHART_HEIGHT - CHART_PADDING - (p.value - min) / span * plot_height;
            format!("{},{}", px(x), px(y))
        })
        .collect();

    let label = |p: Option<&ChartPoint>| p.map(|p| p.label.clone()).unwrap_or_default();
    let bound = |v: f64| if v.is_finite() { format!("{v:.2}") } else { String::new() };

    LineGeometry {
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        padding: CHART_PADDING,
        points: coords.join(" "),
        min: bound(min),
        max: bound(max),
        first: label(points.first()),
        last: label(points.last()),
    }
}

fn bar_geometry(bars: &[ChartPoint]) -> BarGeometry {
    let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let plot_width = CHART_WIDTH - 2.0 * CHART_PADDING;
    let plot_height = CHART_HEIGHT - 2.0 * CHART_PADDING;
    let slot = plot_width / bars.len().max(1) as f64;

    let rects = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let height = if max > 0.0 { bar.value.max(0.0) / max * plot_height } else { 0.0 };
            BarRect {
                label: bar.label.clone(),
                short_label: short_label(&bar.label),
                value: grouped(bar.value.max(0.0) as u64),
                x: px(CHART_PADDING + i as f64 * slot + slot * 0.1),
                y: px(CHART_HEIGHT - CHART_PADDING - height),
                width: px(slot * 0.8),
                height: px(height),
            }
        })
        .collect();

    BarGeometry {
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        padding: CHART_PADDING,
        rects,
    }
}

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    env.add_function("line_chart", |points: ViaDeserialize<Vec<ChartPoint>>| {
        Value::from_serialize(line_geometry(&points))
    });
    env.add_function("bar_chart", |bars: ViaDeserialize<Vec<ChartPoint>>| {
        Value::from_serialize(bar_geometry(&bars))
    });
    Ok(env)
}

/// Render a page as a complete HTML document
pub fn to_html(ui: &UiDescription) -> Result<String> {
    let env = environment()?;
    let template = env.get_template(TEMPLATE_NAME)?;
    Ok(template.render(context! { page => ui })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AppState;
    use crate::ui::tests::{data, state};
    use crate::ui::{InputEcho, Section, Widget, render};

    fn page(widgets: Vec<Widget>) -> UiDescription {
        UiDescription {
            title: "Stock Analysis".to_string(),
            input: Some(InputEcho {
                ticker: "AAPL".to_string(),
                start: None,
                end: None,
            }),
            sections: vec![Section {
                title: "Graph".to_string(),
                collapsible: false,
                widgets,
            }],
        }
    }

    fn point(label: &str, value: f64) -> ChartPoint {
        ChartPoint {
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn test_idle_page_has_form() {
        let html = to_html(&render(&AppState::Idle)).unwrap();
        assert!(html.contains(r#"<form method="get" action="/dashboard">"#));
        assert!(html.contains(r#"<button type="submit">Go</button>"#));
        assert!(html.contains("Getting started"));
    }

    #[test]
    fn test_loaded_dashboard_page() {
        let html = to_html(&render(&state(data()))).unwrap();

        assert!(html.contains("<title>Vanguard Group Inc: 1,300,000,000</title>"));
        assert!(html.contains("Vanguard Grou…</text>"));
        assert!(html.contains("<rect"));
        assert!(html.contains(r#"<a href="https:"#));
        assert!(html.contains("<td>Mr. Timothy D. Cook</td>"));
        assert!(html.contains("<td>Dividend</td>"));
        assert!(html.contains(r#"name="start" value="2024-01-01""#));
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("Vanguard"), "Vanguard");
        assert_eq!(short_label("Vanguard Group Inc"), "Vanguard Grou…");
        assert_eq!(short_label("Société Générale SA").chars().count(), BAR_LABEL_CHARS);
    }

    #[test]
    fn test_values_are_escaped() {
        let html = to_html(&page(vec![Widget::field(
            "Name",
            "<script>alert(1)</script>",
        )]))
        .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_line_chart_svg() {
        let html = to_html(&page(vec![Widget::LineChart {
            title: "AAPL".to_string(),
            y_label: "Adj Close".to_string(),
            points: vec![point("2024-01-02", 10.0), point("2024-01-03", 20.0)],
        }]))
        .unwrap();
        assert!(html.contains("<polyline"));
        assert!(html.contains(r#"points="40,280 860,40""#));
        assert!(html.contains("2024-01-03"));
    }

    #[test]
    fn test_bar_geometry_scales_to_max() {
        let geometry = bar_geometry(&[point("Vanguard", 200.0), point("BlackRock", 100.0)]);
        assert_eq!(geometry.rects.len(), 2);
        assert_eq!(geometry.rects[0].height, 240.0);
        assert_eq!(geometry.rects[1].height, 120.0);
        assert_eq!(geometry.rects[0].y, 40.0);
    }

    #[test]
    fn test_single_point_line() {
        let geometry = line_geometry(&[point("2024-01-02", 5.0)]);
        assert_eq!(geometry.points, "40,280");
        assert_eq!(geometry.min, "5.00");
    }
}
