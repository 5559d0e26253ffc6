//! Plain-text layout of a [`UiDescription`] for the terminal

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use super::format::grouped;
use super::{ChartPoint, NoticeLevel, UiDescription, Widget};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;
const BAR_WIDTH: usize = 40;
const DIVIDER: &str = "--------------------------";

/// Lay out a page as text
pub fn to_text(ui: &UiDescription) -> String {
    let mut out = String::new();
    out.push_str(&ui.title);
    out.push('\n');
    out.push_str(&"=".repeat(ui.title.chars().count()));
    out.push('\n');

    if let Some(input) = &ui.input {
        let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "Ticker: {}  Start: {}  End: {}\n",
            input.ticker,
            date(input.start),
            date(input.end)
        ));
    }

    for section in &ui.sections {
        out.push('\n');
        let marker = if section.collapsible { "▸ " } else { "" };
        out.push_str(&format!("## {marker}{}\n", section.title));
        write_widgets(&mut out, &section.widgets);
    }
    out
}

fn write_widgets(out: &mut String, widgets: &[Widget]) {
    for widget in widgets {
        match widget {
            Widget::Heading { text } => out.push_str(&format!("\n### {text}\n")),
            Widget::Field { label, value } => out.push_str(&format!("{label}: {value}\n")),
            Widget::Paragraph { text } => {
                out.push_str(text);
                out.push('\n');
            }
            Widget::Notice { level, text } => {
                let tag = match level {
                    NoticeLevel::Info => "info",
                    NoticeLevel::Warning => "warning",
                    NoticeLevel::Error => "error",
                };
                out.push_str(&format!("[{tag}] {text}\n"));
            }
            Widget::Table { headers, rows } => {
                out.push_str(&table(headers, rows));
                out.push('\n');
            }
            Widget::LineChart {
                title,
                y_label,
                points,
            } => out.push_str(&line_chart(title, y_label, points)),
            Widget::BarChart {
                title,
                x_label,
                y_label,
                bars,
            } => out.push_str(&bar_chart(title, x_label, y_label, bars)),
            Widget::Link { text, href } if text == href => out.push_str(&format!("URL: {href}\n")),
            Widget::Link { text, href } => out.push_str(&format!("{text} <{href}>\n")),
            Widget::Divider => {
                out.push_str(DIVIDER);
                out.push('\n');
            }
            Widget::Tabs { tabs } => {
                for tab in tabs {
                    out.push_str(&format!("\n[{}]\n", tab.title));
                    write_widgets(out, &tab.widgets);
                }
            }
        }
    }
}

fn table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Sparkline of at most [`SPARK_WIDTH`] columns, each the mean of its bucket
fn sparkline(values: &[f64]) -> String {
    if values.is_empty() {
        return String::new();
    }

    let buckets = values.len().min(SPARK_WIDTH);
    let means: Vec<f64> = (0..buckets)
        .map(|b| {
            let from = b * values.len() / buckets;
            let to = ((b + 1) * values.len() / buckets).max(from + 1);
            let chunk = &values[from..to];
            chunk.iter().sum::<f64>() / chunk.len() as f64
        })
        .collect();

    let (min, max) = min_max(&means);
    let span = max - min;
    means
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round();
                SPARK_LEVELS[level as usize]
            }
        })
        .collect()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

fn line_chart(title: &str, y_label: &str, points: &[ChartPoint]) -> String {
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let (min, max) = min_max(&values);
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return format!("{title}: no points\n");
    };

    format!(
        "{title} ({y_label}, {} to {})\n{}\nlow {min:.2}  high {max:.2}  last {:.2}\n",
        first.label,
        last.label,
        sparkline(&values),
        last.value
    )
}

fn bar_chart(title: &str, x_label: &str, y_label: &str, bars: &[ChartPoint]) -> String {
    let mut out = format!("{title}\n{x_label} / {y_label}\n");
    let label_width = bars
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);
    let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);

    for bar in bars {
        let filled = if max > 0.0 {
            (bar.value / max * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{:<label_width$} {} {}\n",
            bar.label,
            "█".repeat(filled),
            grouped(bar.value.max(0.0) as u64)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Section, Tab};

    fn point(label: &str, value: f64) -> ChartPoint {
        ChartPoint {
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn test_sparkline_scales_to_range() {
        let line = sparkline(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(line, "▁▂▃▄▅▆▇█");
        assert_eq!(sparkline(&[5.0, 5.0]).chars().count(), 2);
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_sparkline_downsamples() {
        let values: Vec<f64> = (0..500).map(f64::from).collect();
        assert_eq!(sparkline(&values).chars().count(), SPARK_WIDTH);
    }

    #[test]
    fn test_bar_chart_longest_bar_is_full() {
        let text = bar_chart(
            "Holders",
            "Holder",
            "Positions",
            &[point("Vanguard", 1_000.0), point("BlackRock", 500.0)],
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[3].matches('█').count(), BAR_WIDTH / 2);
        assert!(lines[2].ends_with("1,000"));
    }

    #[test]
    fn test_to_text_layout() {
        let ui = UiDescription {
            title: "Stock Analysis".to_string(),
            input: None,
            sections: vec![Section {
                title: "About".to_string(),
                collapsible: true,
                widgets: vec![
                    Widget::field("Sector", "Technology"),
                    Widget::Tabs {
                        tabs: vec![Tab {
                            title: "Holders".to_string(),
                            widgets: vec![Widget::no_data()],
                        }],
                    },
                ],
            }],
        };

        let text = to_text(&ui);
        assert!(text.starts_with("Stock Analysis\n==============\n"));
        assert!(text.contains("## ▸ About"));
        assert!(text.contains("Sector: Technology"));
        assert!(text.contains("[Holders]\n[warning] No data available"));
    }

    #[test]
    fn test_table_contains_cells() {
        let text = table(
            &["Name".to_string(), "Title".to_string()],
            &[vec!["Tim Cook".to_string(), "CEO".to_string()]],
        );
        assert!(text.contains("Tim Cook"));
        assert!(text.contains("Title"));
    }
}
