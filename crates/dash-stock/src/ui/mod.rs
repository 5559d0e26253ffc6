//! Presentation mapping
//!
//! [`render`] turns an [`AppState`] into a [`UiDescription`]: a flat,
//! serialisable list of sections and widgets with every value already
//! formatted for display. The terminal and HTML front ends only lay the
//! description out; they never look at domain types.

pub mod format;
pub mod html;
pub mod terminal;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::SentimentScore;
use crate::engine::{AppState, DashboardData};
use crate::model::{ActionKind, Fetched};
use format::{NO_DATA, NOT_AVAILABLE, or_na};

/// Page title shown above the input form
pub const PAGE_TITLE: &str = "Stock Analysis";

/// A rendered page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiDescription {
    pub title: String,
    /// Values to pre-fill the input form with
    pub input: Option<InputEcho>,
    pub sections: Vec<Section>,
}

/// The request as it should reappear in the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputEcho {
    pub ticker: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    /// Rendered folded by default
    pub collapsible: bool,
    pub widgets: Vec<Widget>,
}

impl Section {
    fn new(title: impl Into<String>, widgets: Vec<Widget>) -> Self {
        Self {
            title: title.into(),
            collapsible: false,
            widgets,
        }
    }

    fn collapsible(mut self) -> Self {
        self.collapsible = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// One labelled value of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub title: String,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    Heading {
        text: String,
    },
    Field {
        label: String,
        value: String,
    },
    Paragraph {
        text: String,
    },
    Notice {
        level: NoticeLevel,
        text: String,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    LineChart {
        title: String,
        y_label: String,
        points: Vec<ChartPoint>,
    },
    BarChart {
        title: String,
        x_label: String,
        y_label: String,
        bars: Vec<ChartPoint>,
    },
    Link {
        text: String,
        href: String,
    },
    Divider,
    Tabs {
        tabs: Vec<Tab>,
    },
}

impl Widget {
    fn heading(text: impl Into<String>) -> Self {
        Self::Heading { text: text.into() }
    }

    fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            label: label.into(),
            value: value.into(),
        }
    }

    fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    fn notice(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self::Notice {
            level,
            text: text.into(),
        }
    }

    fn no_data() -> Self {
        Self::notice(NoticeLevel::Warning, NO_DATA)
    }
}

/// Map a state to its page. Pure: equal states give equal descriptions.
pub fn render(state: &AppState) -> UiDescription {
    match state {
        AppState::Idle => UiDescription {
            title: PAGE_TITLE.to_string(),
            input: None,
            sections: vec![Section::new(
                "Getting started",
                vec![Widget::paragraph(
                    "Enter a company ticker (e.g., AAPL), a start date and an end date, then press Go.",
                )],
            )],
        },
        AppState::Rejected {
            ticker,
            start,
            end,
            message,
        } => UiDescription {
            title: PAGE_TITLE.to_string(),
            input: Some(InputEcho {
                ticker: ticker.clone(),
                start: *start,
                end: *end,
            }),
            sections: vec![Section::new(
                "Error",
                vec![Widget::notice(NoticeLevel::Error, format!("Error: {message}"))],
            )],
        },
        AppState::Loaded(data) => render_dashboard(data),
    }
}

fn render_dashboard(data: &DashboardData) -> UiDescription {
    let sections = vec![
        graph_section(data),
        about_section(data),
        today_section(data),
        analysis_section(data),
        sentiment_section(data),
        Section::new(
            "Details",
            vec![Widget::Tabs {
                tabs: vec![
                    actions_tab(data),
                    news_tab(data),
                    officers_tab(data),
                    holders_tab(data),
                ],
            }],
        ),
    ];

    UiDescription {
        title: PAGE_TITLE.to_string(),
        input: Some(InputEcho {
            ticker: data.ticker.to_string(),
            start: Some(data.range.start()),
            end: Some(data.range.end()),
        }),
        sections,
    }
}

/// Warning for a section whose fetch failed
fn unavailable_notice<T>(what: &str, fetched: &Fetched<T>) -> Option<Widget> {
    match fetched {
        Fetched::Available(_) => None,
        Fetched::Unavailable { reason } => Some(Widget::notice(
            NoticeLevel::Warning,
            format!("{what} not available: {reason}"),
        )),
    }
}

fn graph_section(data: &DashboardData) -> Section {
    let widget = match &data.history {
        Fetched::Available(bars) if !bars.is_empty() => Widget::LineChart {
            title: data.ticker.to_string(),
            y_label: "Adj Close".to_string(),
            points: bars
                .iter()
                .map(|bar| ChartPoint {
                    label: bar.date.to_string(),
                    value: bar.adjusted_close,
                })
                .collect(),
        },
        Fetched::Available(_) => Widget::no_data(),
        unavailable => {
            unavailable_notice("Price history", unavailable).unwrap_or_else(Widget::no_data)
        }
    };
    Section::new("Graph", vec![widget])
}

fn about_section(data: &DashboardData) -> Section {
    let profile = &data.profile;
    let text = |value: &Option<String>| or_na(value.clone(), |s| s);

    let mut widgets = Vec::new();
    if let Some(reason) = &data.profile_error {
        widgets.push(Widget::notice(
            NoticeLevel::Warning,
            format!("Company profile not available: {reason}"),
        ));
    }
    widgets.extend([
        Widget::field("Ticker", data.ticker.to_string()),
        Widget::field("Name", text(&profile.name)),
        Widget::field("Sector", text(&profile.sector)),
        Widget::field("Industry", text(&profile.industry)),
        Widget::field("Country", text(&profile.country)),
        Widget::field("Website", text(&profile.website)),
        Widget::field("Full time Employees", or_na(profile.employees, format::grouped)),
        Widget::heading("Summary"),
        Widget::paragraph(text(&profile.business_summary)),
    ]);

    Section::new("About", widgets).collapsible()
}

fn today_section(data: &DashboardData) -> Section {
    let today = data.today.available();
    let mut widgets: Vec<Widget> = unavailable_notice("Today's data", &data.today)
        .into_iter()
        .collect();
    widgets.extend([
        Widget::field("Today's Open", or_na(today.map(|t| t.open), format::price)),
        Widget::field("Today's High", or_na(today.map(|t| t.high), format::price)),
        Widget::field("Today's Low", or_na(today.map(|t| t.low), format::price)),
        Widget::field("Today's Volume", or_na(today.map(|t| t.volume), format::grouped)),
    ]);
    Section::new("Today's Financial Data", widgets)
}

fn analysis_section(data: &DashboardData) -> Section {
    let profile = &data.profile;
    let mut widgets = vec![
        Widget::field("Market Cap", or_na(profile.market_cap, format::compact_money)),
        Widget::field("P/E Ratio", or_na(profile.pe_ratio, format::ratio)),
        Widget::field("Dividend Yield", or_na(profile.dividend_yield, format::percent)),
        Widget::field(
            "One Year CAGR",
            or_na(data.cagr.available().copied(), format::percent),
        ),
        Widget::field("Debt To Equity Ratio", or_na(profile.debt_to_equity, format::ratio)),
        Widget::field("Ebitda Margin", or_na(profile.ebitda_margin, format::percent)),
    ];
    if let Fetched::Unavailable { reason } = &data.cagr {
        widgets.push(Widget::notice(
            NoticeLevel::Info,
            format!("One Year CAGR not available: {reason}"),
        ));
    }
    Section::new("Total Analysis", widgets)
}

fn sentiment_section(data: &DashboardData) -> Section {
    let summary = data.sentiment.available();
    let mut widgets: Vec<Widget> = unavailable_notice("Sentiment", &data.sentiment)
        .into_iter()
        .collect();

    widgets.push(Widget::paragraph(format!(
        "Sentiment Scores for {}:",
        data.ticker
    )));
    let dimensions = summary.map_or_else(
        || SentimentScore::zero().dimensions(),
        |s| s.score.dimensions(),
    );
    for (label, value) in dimensions {
        let value = summary.map(|_| value);
        widgets.push(Widget::field(label, or_na(value, format::score)));
    }
    widgets.push(Widget::field(
        "Headlines scored",
        or_na(summary.map(|s| s.headline_count), |n| n.to_string()),
    ));

    Section::new("Sentiment Analysis", widgets)
}

fn actions_tab(data: &DashboardData) -> Tab {
    let mut widgets = vec![Widget::heading("Actions")];
    match &data.actions {
        Fetched::Available(actions) if !actions.is_empty() => widgets.push(Widget::Table {
            headers: vec!["Date".to_string(), "Action".to_string(), "Value".to_string()],
            rows: actions
                .iter()
                .map(|action| {
                    let (kind, value) = match &action.kind {
                        ActionKind::Dividend { amount } => ("Dividend", format!("{amount:.4}")),
                        ActionKind::Split {
                            numerator,
                            denominator,
                        } => ("Stock Split", format!("{numerator}:{denominator}")),
                    };
                    vec![action.date.to_string(), kind.to_string(), value]
                })
                .collect(),
        }),
        Fetched::Available(_) => widgets.push(Widget::no_data()),
        unavailable => widgets.extend(unavailable_notice("Corporate actions", unavailable)),
    }
    Tab {
        title: "Actions".to_string(),
        widgets,
    }
}

fn news_tab(data: &DashboardData) -> Tab {
    let mut widgets = vec![Widget::heading("Recent News")];
    match &data.news {
        Fetched::Available(news) if !news.is_empty() => {
            for item in news {
                widgets.push(Widget::field("Headline", item.title.clone()));
                widgets.push(Widget::field(
                    "Publisher",
                    or_na(item.publisher.clone(), |p| p),
                ));
                match item.link.as_deref() {
                    Some(link) if is_web_link(link) => widgets.push(Widget::Link {
                        text: link.to_string(),
                        href: link.to_string(),
                    }),
                    other => widgets.push(Widget::field(
                        "URL",
                        other.unwrap_or(NOT_AVAILABLE),
                    )),
                }
                widgets.push(Widget::Divider);
            }
        }
        Fetched::Available(_) => widgets.push(Widget::no_data()),
        unavailable => widgets.extend(unavailable_notice("News", unavailable)),
    }
    Tab {
        title: "Recent News".to_string(),
        widgets,
    }
}

/// Only absolute http(s) URLs become clickable
fn is_web_link(link: &str) -> bool {
    reqwest::Url::parse(link).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn officers_tab(data: &DashboardData) -> Tab {
    let officers = &data.profile.officers;
    let mut widgets = vec![Widget::heading("Top Employees")];
    if officers.is_empty() {
        widgets.push(Widget::no_data());
    } else {
        widgets.push(Widget::Table {
            headers: ["Name", "Title", "Age", "Total Pay"]
                .map(String::from)
                .to_vec(),
            rows: officers
                .iter()
                .map(|officer| {
                    vec![
                        officer.name.clone(),
                        or_na(officer.title.clone(), |t| t),
                        or_na(officer.age, |a| a.to_string()),
                        or_na(officer.total_pay, format::compact_money),
                    ]
                })
                .collect(),
        });
    }
    Tab {
        title: "Top Employees".to_string(),
        widgets,
    }
}

fn holders_tab(data: &DashboardData) -> Tab {
    let mut widgets = vec![Widget::heading("Major Holders")];
    match &data.holders {
        Fetched::Available(holders) if !holders.is_empty() => widgets.push(Widget::BarChart {
            title: format!("Major Institutional Holders of {}", data.ticker),
            x_label: "Holder".to_string(),
            y_label: "Positions".to_string(),
            bars: holders
                .iter()
                .map(|holder| ChartPoint {
                    label: holder.holder_name.clone(),
                    value: holder.shares_held as f64,
                })
                .collect(),
        }),
        _ => widgets.push(Widget::no_data()),
    }
    Tab {
        title: "Holders".to_string(),
        widgets,
    }
}
