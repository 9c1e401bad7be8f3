use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

/// Set of SKU tokens parsed from a comma-separated list.
///
/// Membership is exact and case-sensitive; transaction SKUs are not normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkuSet(BTreeSet<String>);

impl SkuSet {
    pub fn parse(csv: &str) -> Self {
        Self(
            csv.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.0.contains(sku)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Reads a calendar date from `YYYY-MM-DD`, a naive timestamp, or RFC 3339.
///
/// Timestamps contribute the date as written; no timezone shift is applied.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `None` when either bound is not a readable date.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self::new(
            parse_calendar_date(start)?,
            parse_calendar_date(end)?,
        ))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// `start <= date <= end` on calendar dates. Any unreadable input excludes the date.
pub fn in_window(date: &str, start: &str, end: &str) -> bool {
    match (DateWindow::parse(start, end), parse_calendar_date(date)) {
        (Some(window), Some(date)) => window.contains(date),
        _ => false,
    }
}

/// Date restriction applied while aggregating transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Every transaction, regardless of its date.
    All,
    /// Transactions dated inside the window; `None` means the window itself was
    /// unreadable and nothing qualifies.
    Window(Option<DateWindow>),
}

impl Period {
    pub fn between(start: &str, end: &str) -> Self {
        Period::Window(DateWindow::parse(start, end))
    }

    pub fn admits(&self, date: &str) -> bool {
        match self {
            Period::All => true,
            Period::Window(Some(window)) => parse_calendar_date(date)
                .map(|date| window.contains(date))
                .unwrap_or(false),
            Period::Window(None) => false,
        }
    }
}
