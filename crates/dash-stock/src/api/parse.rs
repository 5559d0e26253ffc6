//! Parsing of raw Yahoo Finance JSON payloads
//!
//! Provider responses have no fixed schema, so every field is read through a
//! defaulted lookup: a missing or mistyped key yields `None` (or is skipped),
//! never a fault. Only the envelope itself (`quoteSummary.result`,
//! `chart.result`) is required.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use crate::error::RemoteDataError;
use crate::model::{
    ActionKind, CompanyOfficer, CompanyProfile, CorporateAction, HolderRecord, NewsItem,
};

type Info = Map<String, Value>;

/// quoteSummary modules requested for the profile, in lookup priority order
pub const PROFILE_MODULES: &[&str] = &[
    "summaryDetail",
    "financialData",
    "defaultKeyStatistics",
    "assetProfile",
    "price",
];

/// Module carrying institutional holders
pub const HOLDERS_MODULE: &str = "institutionOwnership";

/// Numeric value of a field that is either a bare number or `{"raw": n, "fmt": ".."}`
pub fn raw_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(obj) => obj.get("raw").and_then(Value::as_f64),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn epoch_to_date(value: &Value) -> Option<NaiveDate> {
    let secs = raw_number(value)? as i64;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// Turn a provider `error` object into a [`RemoteDataError`], if present
fn envelope_error(error: Option<&Value>, symbol: &str) -> Option<RemoteDataError> {
    let error = error.filter(|e| !e.is_null())?;
    let code = error.get("code").and_then(Value::as_str).unwrap_or_default();
    let description = error
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or(code);

    Some(match code {
        "Not Found" => RemoteDataError::UnknownTicker(symbol.to_string()),
        "Too Many Requests" => RemoteDataError::RateLimited {
            provider: "Yahoo Finance".to_string(),
        },
        _ => RemoteDataError::Schema(description.to_string()),
    })
}

/// First `quoteSummary.result` entry of a quoteSummary response
pub fn summary_result<'a>(body: &'a Value, symbol: &str) -> Result<&'a Value, RemoteDataError> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| RemoteDataError::Schema("missing quoteSummary".to_string()))?;

    if let Some(err) = envelope_error(summary.get("error"), symbol) {
        return Err(err);
    }

    summary
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .ok_or_else(|| RemoteDataError::empty(symbol, "profile"))
}

/// Merge the [`PROFILE_MODULES`] of a quoteSummary result into one flat field map.
///
/// When two modules carry the same key the earlier module wins.
pub fn flatten_summary(result: &Value) -> Info {
    let mut info = Info::new();
    for name in PROFILE_MODULES {
        let Some(fields) = result.get(name).and_then(Value::as_object) else {
            continue;
        };
        for (key, value) in fields {
            info.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
    info
}

/// Build a profile from flattened info, field by field
pub fn profile_from_info(info: &Info) -> CompanyProfile {
    let text = |key: &str| info.get(key).and_then(non_empty_string);
    let number = |key: &str| info.get(key).and_then(raw_number);

    CompanyProfile {
        name: text("longName").or_else(|| text("shortName")),
        market_cap: number("marketCap"),
        pe_ratio: number("trailingPE"),
        dividend_yield: number("dividendYield"),
        sector: text("sector"),
        industry: text("industry"),
        debt_to_equity: number("debtToEquity"),
        ebitda_margin: number("ebitdaMargins"),
        website: text("website"),
        employees: number("fullTimeEmployees").map(|n| n as u64),
        business_summary: text("longBusinessSummary"),
        country: text("country"),
        officers: info
            .get("companyOfficers")
            .map(parse_officers)
            .unwrap_or_default(),
    }
}

/// Officers from a `companyOfficers` array; entries without a name are skipped
pub fn parse_officers(value: &Value) -> Vec<CompanyOfficer> {
    value
        .as_array()
        .map(|officers| {
            officers
                .iter()
                .filter_map(|o| {
                    Some(CompanyOfficer {
                        name: o.get("name").and_then(non_empty_string)?,
                        title: o.get("title").and_then(non_empty_string),
                        age: o.get("age").and_then(raw_number).map(|a| a as u32),
                        total_pay: o.get("totalPay").and_then(raw_number),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Holders from the `institutionOwnership` module, largest position first
pub fn parse_holders(result: &Value) -> Vec<HolderRecord> {
    let Some(list) = result
        .get(HOLDERS_MODULE)
        .and_then(|m| m.get("ownershipList"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut holders: Vec<HolderRecord> = list
        .iter()
        .filter_map(|h| {
            Some(HolderRecord {
                holder_name: h.get("organization").and_then(non_empty_string)?,
                shares_held: h.get("position").and_then(raw_number)? as u64,
                percent_held: h.get("pctHeld").and_then(raw_number),
                reported: h.get("reportDate").and_then(epoch_to_date),
            })
        })
        .collect();

    holders.sort_by(|a, b| b.shares_held.cmp(&a.shares_held));
    holders
}

/// Headlines from a search response, at most `limit`
pub fn parse_news(body: &Value, limit: usize) -> Vec<NewsItem> {
    body.get("news")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|n| {
                    Some(NewsItem {
                        title: n.get("title").and_then(non_empty_string)?,
                        publisher: n.get("publisher").and_then(non_empty_string),
                        link: n.get("link").and_then(non_empty_string),
                    })
                })
                .take(limit)
                .collect()
        })
        .unwrap_or_default()
}

/// Dividends and splits from a chart response with `events=div|split`
pub fn parse_actions(body: &Value, symbol: &str) -> Result<Vec<CorporateAction>, RemoteDataError> {
    let chart = body
        .get("chart")
        .ok_or_else(|| RemoteDataError::Schema("missing chart".to_string()))?;

    if let Some(err) = envelope_error(chart.get("error"), symbol) {
        return Err(err);
    }

    let result = chart
        .get("result")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .ok_or_else(|| RemoteDataError::empty(symbol, "chart"))?;

    let Some(events) = result.get("events") else {
        return Ok(Vec::new());
    };

    let mut actions = Vec::new();

    if let Some(dividends) = events.get("dividends").and_then(Value::as_object) {
        actions.extend(dividends.values().filter_map(|d| {
            Some(CorporateAction {
                date: d.get("date").and_then(epoch_to_date)?,
                kind: ActionKind::Dividend {
                    amount: d.get("amount").and_then(raw_number)?,
                },
            })
        }));
    }

    if let Some(splits) = events.get("splits").and_then(Value::as_object) {
        actions.extend(splits.values().filter_map(|s| {
            Some(CorporateAction {
                date: s.get("date").and_then(epoch_to_date)?,
                kind: ActionKind::Split {
                    numerator: s.get("numerator").and_then(raw_number)?,
                    denominator: s.get("denominator").and_then(raw_number)?,
                },
            })
        }));
    }

    actions.sort_by_key(|a| a.date);
    Ok(actions)
}
