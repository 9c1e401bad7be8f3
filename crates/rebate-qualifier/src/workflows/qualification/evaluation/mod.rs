mod aggregate;
mod rules;

pub use aggregate::{count_matching, sum_totals};

use super::domain::{Scenario, ScenarioTest, TestResult, TestType};
use rules::RuleInputs;
use tracing::debug;

/// Raised when a scenario cannot be evaluated as configured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unrecognized test type '{0}'")]
    UnrecognizedTestType(String),
}

/// Evaluates one test's transactions against the scenario rules.
///
/// Pure: inputs are only read and every call builds a fresh result, so the
/// same pair always yields the same verdict and earnings.
pub fn evaluate(
    scenario: &Scenario,
    test: &ScenarioTest,
) -> Result<TestResult, ConfigurationError> {
    let inputs = RuleInputs::new(scenario, &test.transactions);

    let result = match &scenario.test_type {
        TestType::Yoy => rules::year_over_year(&inputs),
        TestType::MinQual => rules::minimum_qualification(&inputs),
        TestType::EarningsOnly => rules::earnings_only(&inputs),
        TestType::Unrecognized(raw) => {
            return Err(ConfigurationError::UnrecognizedTestType(raw.clone()))
        }
    };

    debug!(
        test_id = %test.id,
        test_type = scenario.test_type.as_str(),
        qualified = result.qualified,
        earnings = %result.earnings,
        "evaluated qualification test"
    );

    Ok(result)
}
