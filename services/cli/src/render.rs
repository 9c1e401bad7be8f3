use rebate_qualifier::error::AppError;
use rebate_qualifier::workflows::qualification::{
    format_amount, Scenario, ScenarioSummary, ScenarioTest, TestResult, TestType,
};
use serde::Serialize;

pub(crate) fn summaries(summaries: &[ScenarioSummary]) {
    if summaries.is_empty() {
        println!("No saved scenarios.");
        return;
    }

    println!("Saved scenarios ({})", summaries.len());
    for summary in summaries {
        let modified = summary
            .last_modified
            .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "- {} [{}] | {} | {} tests | {} qualified / {} not qualified | modified {}",
            summary.name,
            summary.id,
            summary.test_type_label,
            summary.test_count,
            summary.qualified,
            summary.not_qualified,
            modified
        );
    }
}

pub(crate) fn scenario(scenario: &Scenario) {
    println!(
        "{} [{}]",
        scenario.name,
        scenario.id.as_deref().unwrap_or("unsaved")
    );
    println!("Test type: {}", scenario.test_type.label());
    println!("Qualifying SKUs: {}", or_dash(&scenario.qualifying_skus));
    println!("Earning SKUs: {}", or_dash(&scenario.earning_skus));

    match scenario.test_type {
        TestType::Yoy => {
            println!("Target: {}%", or_dash(&scenario.target_percent));
            for timeframe in &scenario.prior_year_timeframes {
                println!(
                    "{}: {} to {}",
                    timeframe.label,
                    or_dash(&timeframe.start_date),
                    or_dash(&timeframe.end_date)
                );
            }
            println!(
                "Current Year: {} to {}",
                or_dash(&scenario.current_year_timeframe.start_date),
                or_dash(&scenario.current_year_timeframe.end_date)
            );
            println!(
                "Earning rate: {}%",
                or_dash(&scenario.current_year_earning_rate)
            );
        }
        TestType::MinQual => {
            println!(
                "Minimum qualification: {}% (not enforced)",
                or_dash(&scenario.min_qualification_percent)
            );
            println!("Earning percent: {}%", or_dash(&scenario.earning_percent));
        }
        TestType::EarningsOnly => {
            println!("Earning percent: {}%", or_dash(&scenario.earning_percent));
        }
        TestType::Unrecognized(_) => {}
    }

    println!("\nTests ({})", scenario.tests.len());
    for test in &scenario.tests {
        match &test.results {
            Some(result) => result_line(scenario, test, result),
            None => println!(
                "- {} ({}) | {} transactions | not evaluated",
                test.label,
                test.id,
                test.transactions.len()
            ),
        }
    }
}

pub(crate) fn result_line(scenario: &Scenario, test: &ScenarioTest, result: &TestResult) {
    let verdict = if result.qualified {
        "QUALIFIED"
    } else {
        "NOT QUALIFIED"
    };
    println!(
        "- {} ({}) | {} transactions | {} | earnings ${}",
        test.label,
        test.id,
        test.transactions.len(),
        verdict,
        format_amount(result.earnings)
    );

    if let Some(years) = &result.details.year_totals {
        for year in years {
            println!("    {}: ${}", year.label, format_amount(year.total));
        }
    }
    if let Some(achieved) = result.details.achieved_percent {
        println!(
            "    Achieved {}% of target {}%",
            achieved.round_dp(2),
            or_dash(&scenario.target_percent)
        );
    }
    println!(
        "    {} qualifying / {} earning transactions",
        result.details.qualifying_transactions, result.details.earning_transactions
    );
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluatedTest<'a> {
    test_id: &'a str,
    label: &'a str,
    results: &'a TestResult,
}

pub(crate) fn evaluations(
    scenario: &Scenario,
    evaluated: &[(&ScenarioTest, TestResult)],
    as_json: bool,
) -> Result<(), AppError> {
    if as_json {
        let rows: Vec<EvaluatedTest<'_>> = evaluated
            .iter()
            .map(|(test, result)| EvaluatedTest {
                test_id: &test.id,
                label: &test.label,
                results: result,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{} ({})", scenario.name, scenario.test_type.label());
    if evaluated.is_empty() {
        println!("No tests to evaluate.");
    }
    for (test, result) in evaluated {
        result_line(scenario, test, result);
    }
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
