use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Evaluation rule selected by a scenario.
///
/// Stored values outside the known set are kept verbatim so the engine can
/// report them instead of silently picking a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestType {
    Yoy,
    MinQual,
    EarningsOnly,
    Unrecognized(String),
}

impl TestType {
    pub fn as_str(&self) -> &str {
        match self {
            TestType::Yoy => "yoy",
            TestType::MinQual => "minQual",
            TestType::EarningsOnly => "earningsOnly",
            TestType::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TestType::Yoy => "Year over Year",
            TestType::MinQual => "Min Qualification + Earnings",
            TestType::EarningsOnly => "Earnings Only",
            TestType::Unrecognized(_) => "Unrecognized",
        }
    }
}

impl From<String> for TestType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "yoy" => TestType::Yoy,
            "minQual" => TestType::MinQual,
            "earningsOnly" => TestType::EarningsOnly,
            _ => TestType::Unrecognized(value),
        }
    }
}

impl From<TestType> for String {
    fn from(value: TestType) -> Self {
        match value {
            TestType::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A named rule configuration together with the hypothetical tests run against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub test_type: TestType,
    #[serde(default)]
    pub qualifying_skus: String,
    #[serde(default)]
    pub earning_skus: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub target_percent: String,
    #[serde(default = "default_prior_year_count")]
    pub num_prior_years: u8,
    #[serde(default)]
    pub prior_year_timeframes: Vec<PriorYearTimeframe>,
    #[serde(default)]
    pub current_year_timeframe: Timeframe,
    #[serde(default, deserialize_with = "lenient_text")]
    pub current_year_earning_rate: String,
    /// Captured for MinQual scenarios but not consulted by the rule.
    #[serde(default, deserialize_with = "lenient_text")]
    pub min_qualification_percent: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub earning_percent: String,
    #[serde(default)]
    pub tests: Vec<ScenarioTest>,
    #[serde(default = "first_test_number")]
    pub next_test_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

fn default_prior_year_count() -> u8 {
    1
}

fn first_test_number() -> u32 {
    1
}

/// Inclusive calendar window expressed as the raw date strings entered by the analyst.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeframe {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorYearTimeframe {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl PriorYearTimeframe {
    pub fn numbered(position: usize) -> Self {
        Self {
            label: format!("Prior Year {position}"),
            start_date: String::new(),
            end_date: String::new(),
        }
    }
}

/// One hypothetical transaction set evaluated against the scenario rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioTest {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Snapshot of the last evaluation. Cleared by every transaction edit.
    #[serde(default)]
    pub results: Option<TestResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub quantity: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: String,
    /// `quantity * price` rounded to cents at the time of the last edit.
    #[serde(default, deserialize_with = "lenient_text")]
    pub total: String,
}

/// Verdict and payout produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub qualified: bool,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub earnings: Decimal,
    pub details: ResultDetails,
}

/// Rule-specific breakdown for display. Not authoritative for the verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_totals: Option<Vec<YearTotal>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    pub achieved_percent: Option<Decimal>,
    #[serde(default)]
    pub qualifying_transactions: usize,
    #[serde(default)]
    pub earning_transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTotal {
    pub label: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total: Decimal,
}

/// Accepts a string, a bare JSON number, or null for fields the editor keeps as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(String::new()),
        Some(serde_json::Value::String(text)) => Ok(text),
        Some(serde_json::Value::Number(number)) => Ok(number.to_string()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected text or a number, found {other}"
        ))),
    }
}
