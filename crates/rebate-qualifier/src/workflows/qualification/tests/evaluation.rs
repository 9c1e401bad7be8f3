use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::*;
use crate::workflows::qualification::domain::{TestType, YearTotal};
use crate::workflows::qualification::evaluation::{evaluate, ConfigurationError};

#[test]
fn yoy_qualifies_when_growth_meets_target() {
    let scenario = yoy_scenario();
    let test = test_with(vec![
        line("2023-06-01", "A", "10", "100"),
        line("2024-06-01", "A", "10", "96"),
    ]);

    let result = evaluate(&scenario, &test).expect("yoy evaluates");

    assert!(result.qualified);
    assert_eq!(result.earnings, dec!(48));
    assert_eq!(result.details.achieved_percent, Some(dec!(96)));
    assert_eq!(
        result.details.year_totals,
        Some(vec![
            YearTotal {
                label: "Prior Year 1".to_string(),
                total: dec!(1000),
            },
            YearTotal {
                label: "Current Year".to_string(),
                total: dec!(960),
            },
        ])
    );
    assert_eq!(result.details.qualifying_transactions, 2);
    assert_eq!(result.details.earning_transactions, 2);
}

#[test]
fn yoy_misses_target_and_pays_nothing() {
    let scenario = yoy_scenario();
    let test = test_with(vec![
        line("2023-06-01", "A", "1", "1000"),
        line("2024-06-01", "A", "1", "900"),
    ]);

    let result = evaluate(&scenario, &test).expect("yoy evaluates");

    assert!(!result.qualified);
    assert_eq!(result.earnings, Decimal::ZERO);
    assert_eq!(result.details.achieved_percent, Some(dec!(90)));
}

#[test]
fn yoy_growth_across_mixed_skus_qualifies_and_earns_on_earning_skus() {
    let scenario = yoy_scenario();
    let test = test_with(vec![
        line("2023-03-01", "B", "1", "1000"),
        line("2024-03-01", "B", "1", "950"),
        line("2024-03-02", "A", "1", "200"),
    ]);

    let result = evaluate(&scenario, &test).expect("yoy evaluates");

    assert!(result.qualified);
    assert_eq!(result.details.achieved_percent, Some(dec!(115)));
    assert_eq!(result.earnings, dec!(10));
}

#[test]
fn yoy_exactly_on_target_qualifies() {
    let scenario = yoy_scenario();
    let test = test_with(vec![
        line("2023-03-01", "B", "1", "1000"),
        line("2024-03-01", "B", "1", "950"),
    ]);

    let result = evaluate(&scenario, &test).expect("yoy evaluates");

    assert_eq!(result.details.achieved_percent, Some(dec!(95)));
    assert!(result.qualified);
    assert_eq!(result.earnings, Decimal::ZERO, "B is not an earning SKU");
}

#[test]
fn yoy_uses_only_the_most_recent_prior_year_as_baseline() {
    let mut scenario = yoy_scenario();
    scenario.prior_year_timeframes = vec![
        prior_year("2022", "2022-01-01", "2022-12-31"),
        prior_year("2023", "2023-01-01", "2023-12-31"),
    ];
    scenario.num_prior_years = 2;

    let test = test_with(vec![
        line("2022-05-01", "A", "1", "5000"),
        line("2023-05-01", "A", "1", "500"),
        line("2024-05-01", "A", "1", "600"),
    ]);

    let result = evaluate(&scenario, &test).expect("yoy evaluates");

    assert!(result.qualified);
    assert_eq!(result.details.achieved_percent, Some(dec!(120)));
    assert_eq!(result.earnings, dec!(30));
    let totals = result.details.year_totals.expect("yoy details");
    assert_eq!(totals.len(), 3);
    assert_eq!(totals[0].total, dec!(5000));
    assert_eq!(totals[1].total, dec!(500));
    assert_eq!(totals[2].label, "Current Year");
}

#[test]
fn yoy_without_prior_years_has_zero_achievement() {
    let mut scenario = yoy_scenario();
    scenario.prior_year_timeframes.clear();
    let test = test_with(vec![line("2024-05-01", "A", "1", "600")]);

    let result = evaluate(&scenario, &test).expect("yoy evaluates");
    assert_eq!(result.details.achieved_percent, Some(Decimal::ZERO));
    assert!(!result.qualified);

    scenario.target_percent = "0".to_string();
    let result = evaluate(&scenario, &test).expect("yoy evaluates");
    assert!(result.qualified);
    assert_eq!(result.earnings, dec!(30));
}

#[test]
fn yoy_blank_target_defaults_to_ninety_five() {
    let mut scenario = yoy_scenario();
    scenario.target_percent = "not set".to_string();

    let just_below = test_with(vec![
        line("2023-05-01", "A", "1", "1000"),
        line("2024-05-01", "A", "1", "949.99"),
    ]);
    let result = evaluate(&scenario, &just_below).expect("yoy evaluates");
    assert!(!result.qualified);

    let at_default = test_with(vec![
        line("2023-05-01", "A", "1", "1000"),
        line("2024-05-01", "A", "1", "950"),
    ]);
    let result = evaluate(&scenario, &at_default).expect("yoy evaluates");
    assert!(result.qualified);
}

#[test]
fn yoy_counts_ignore_date_windows() {
    let scenario = yoy_scenario();
    let test = test_with(vec![
        line("2019-01-01", "A", "1", "1"),
        line("", "B", "1", "1"),
        line("2024-01-01", "Z", "1", "1"),
    ]);

    let result = evaluate(&scenario, &test).expect("yoy evaluates");
    assert_eq!(result.details.qualifying_transactions, 2);
    assert_eq!(result.details.earning_transactions, 1);
}

#[test]
fn yoy_with_unreadable_current_window_never_qualifies() {
    let mut scenario = yoy_scenario();
    scenario.current_year_timeframe.end_date = String::new();
    let test = test_with(vec![
        line("2023-05-01", "A", "1", "100"),
        line("2024-05-01", "A", "1", "500"),
    ]);

    let result = evaluate(&scenario, &test).expect("yoy evaluates");
    assert!(!result.qualified);
    let totals = result.details.year_totals.expect("yoy details");
    assert_eq!(totals[1].total, Decimal::ZERO);
}

#[test]
fn min_qual_pays_on_all_earning_lines_without_dates() {
    let mut scenario = flat_scenario(TestType::MinQual, "X", "10");
    scenario.min_qualification_percent = "80".to_string();
    let test = test_with(vec![
        line("2024-01-15", "X", "2", "100"),
        line("2024-01-16", "Y", "3", "100"),
        line("", "Q", "1", "5"),
    ]);

    let result = evaluate(&scenario, &test).expect("min qual evaluates");

    assert!(result.qualified);
    assert_eq!(result.earnings, dec!(20));
    assert_eq!(result.details.qualifying_transactions, 1);
    assert_eq!(result.details.earning_transactions, 1);
    assert!(result.details.year_totals.is_none());
    assert!(result.details.achieved_percent.is_none());
}

#[test]
fn earnings_only_ignores_qualifying_skus() {
    let scenario = flat_scenario(TestType::EarningsOnly, "X, Q", "2.5");
    let test = test_with(vec![
        line("2024-01-15", "X", "4", "25"),
        line("garbage", "Q", "1", "100"),
    ]);

    let result = evaluate(&scenario, &test).expect("earnings only evaluates");

    assert!(result.qualified);
    assert_eq!(result.earnings, dec!(5));
    assert_eq!(result.details.qualifying_transactions, 0);
    assert_eq!(result.details.earning_transactions, 2);
}

#[test]
fn flat_rules_qualify_an_empty_test() {
    for test_type in [TestType::MinQual, TestType::EarningsOnly] {
        let scenario = flat_scenario(test_type, "X", "10");
        let result = evaluate(&scenario, &test_with(Vec::new())).expect("evaluates");
        assert!(result.qualified);
        assert_eq!(result.earnings, Decimal::ZERO);
    }
}

#[test]
fn missing_earning_percent_pays_zero() {
    let scenario = flat_scenario(TestType::EarningsOnly, "X", "");
    let test = test_with(vec![line("2024-01-15", "X", "1", "100")]);
    let result = evaluate(&scenario, &test).expect("evaluates");
    assert!(result.qualified);
    assert_eq!(result.earnings, Decimal::ZERO);
}

#[test]
fn stored_totals_are_trusted_over_quantity_and_price() {
    let scenario = flat_scenario(TestType::EarningsOnly, "X", "10");
    let mut transaction = line("2024-01-15", "X", "1", "100");
    transaction.total = "50.00".to_string();

    let result = evaluate(&scenario, &test_with(vec![transaction])).expect("evaluates");
    assert_eq!(result.earnings, dec!(5));
}

#[test]
fn unrecognized_test_type_is_a_configuration_error() {
    let scenario = flat_scenario(TestType::Unrecognized("tiered".to_string()), "X", "10");
    let test = test_with(vec![line("2024-01-15", "X", "1", "100")]);

    match evaluate(&scenario, &test) {
        Err(ConfigurationError::UnrecognizedTestType(raw)) => assert_eq!(raw, "tiered"),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn evaluation_is_repeatable_and_does_not_touch_the_test() {
    let scenario = yoy_scenario();
    let test = test_with(vec![
        line("2023-06-01", "A", "10", "100"),
        line("2024-06-01", "A", "10", "96"),
    ]);
    let before = test.clone();

    let first = evaluate(&scenario, &test).expect("evaluates");
    let second = test.evaluate(&scenario).expect("evaluates");

    assert_eq!(first, second);
    assert_eq!(test, before);
    assert!(test.results.is_none());
}
