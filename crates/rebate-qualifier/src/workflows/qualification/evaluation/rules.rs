use super::super::amounts::{apply_percent, parse_decimal, DEFAULT_TARGET_PERCENT};
use super::super::domain::{ResultDetails, Scenario, TestResult, Transaction, YearTotal};
use super::super::filters::{Period, SkuSet};
use super::aggregate::{count_matching, sum_totals};
use rust_decimal::Decimal;
use tracing::debug;

const CURRENT_YEAR_LABEL: &str = "Current Year";

/// SKU sets are parsed once per evaluation and shared by every rule.
pub(crate) struct RuleInputs<'a> {
    pub scenario: &'a Scenario,
    pub transactions: &'a [Transaction],
    pub qualifying: SkuSet,
    pub earning: SkuSet,
}

impl<'a> RuleInputs<'a> {
    pub fn new(scenario: &'a Scenario, transactions: &'a [Transaction]) -> Self {
        Self {
            scenario,
            transactions,
            qualifying: SkuSet::parse(&scenario.qualifying_skus),
            earning: SkuSet::parse(&scenario.earning_skus),
        }
    }
}

/// Current-year qualifying spend measured against the most recent prior year.
pub(crate) fn year_over_year(inputs: &RuleInputs<'_>) -> TestResult {
    let scenario = inputs.scenario;

    let mut year_totals: Vec<YearTotal> = scenario
        .prior_year_timeframes
        .iter()
        .map(|timeframe| YearTotal {
            label: timeframe.label.clone(),
            total: sum_totals(
                inputs.transactions,
                &inputs.qualifying,
                Period::between(&timeframe.start_date, &timeframe.end_date),
            ),
        })
        .collect();

    let baseline = year_totals
        .last()
        .map(|year| year.total)
        .unwrap_or(Decimal::ZERO);

    let current_year = Period::between(
        &scenario.current_year_timeframe.start_date,
        &scenario.current_year_timeframe.end_date,
    );
    let current_year_total = sum_totals(inputs.transactions, &inputs.qualifying, current_year);

    let achieved_percent = if baseline > Decimal::ZERO {
        current_year_total
            .checked_div(baseline)
            .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    };

    let target = parse_decimal(&scenario.target_percent, DEFAULT_TARGET_PERCENT);
    let qualified = achieved_percent >= target;

    let earnings = if qualified {
        let earning_spend = sum_totals(inputs.transactions, &inputs.earning, current_year);
        let rate = parse_decimal(&scenario.current_year_earning_rate, Decimal::ZERO);
        apply_percent(earning_spend, rate)
    } else {
        Decimal::ZERO
    };

    year_totals.push(YearTotal {
        label: CURRENT_YEAR_LABEL.to_string(),
        total: current_year_total,
    });

    TestResult {
        qualified,
        earnings,
        details: ResultDetails {
            year_totals: Some(year_totals),
            achieved_percent: Some(achieved_percent),
            qualifying_transactions: count_matching(inputs.transactions, &inputs.qualifying),
            earning_transactions: count_matching(inputs.transactions, &inputs.earning),
        },
    }
}

/// Always qualifies; pays the earning percent on all earning-SKU spend.
pub(crate) fn minimum_qualification(inputs: &RuleInputs<'_>) -> TestResult {
    if !inputs.scenario.min_qualification_percent.trim().is_empty() {
        debug!(
            min_qualification_percent = %inputs.scenario.min_qualification_percent,
            "minimum qualification percent is recorded but not enforced"
        );
    }

    TestResult {
        qualified: true,
        earnings: unwindowed_earnings(inputs),
        details: ResultDetails {
            qualifying_transactions: count_matching(inputs.transactions, &inputs.qualifying),
            earning_transactions: count_matching(inputs.transactions, &inputs.earning),
            ..ResultDetails::default()
        },
    }
}

/// Always qualifies; qualifying SKUs play no part.
pub(crate) fn earnings_only(inputs: &RuleInputs<'_>) -> TestResult {
    TestResult {
        qualified: true,
        earnings: unwindowed_earnings(inputs),
        details: ResultDetails {
            qualifying_transactions: 0,
            earning_transactions: count_matching(inputs.transactions, &inputs.earning),
            ..ResultDetails::default()
        },
    }
}

fn unwindowed_earnings(inputs: &RuleInputs<'_>) -> Decimal {
    let spend = sum_totals(inputs.transactions, &inputs.earning, Period::All);
    let percent = parse_decimal(&inputs.scenario.earning_percent, Decimal::ZERO);
    apply_percent(spend, percent)
}
