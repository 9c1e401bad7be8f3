use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::qualification::domain::{
    PriorYearTimeframe, Scenario, ScenarioTest, TestType, Timeframe, Transaction,
};
use crate::workflows::qualification::ids::{FixedClock, SequentialIds};
use crate::workflows::qualification::service::ScenarioService;
use crate::workflows::qualification::store::InMemoryRecordStore;

pub(super) fn line(date: &str, sku: &str, quantity: &str, price: &str) -> Transaction {
    Transaction::new(
        format!("txn_{date}_{sku}"),
        date,
        sku,
        quantity,
        price,
    )
}

pub(super) fn prior_year(label: &str, start: &str, end: &str) -> PriorYearTimeframe {
    PriorYearTimeframe {
        label: label.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
    }
}

/// YoY scenario: qualifying A,B; earning A; target 95; 2023 vs 2024; 5% rate.
pub(super) fn yoy_scenario() -> Scenario {
    let mut scenario = Scenario::draft("Dealer growth 2024");
    scenario.test_type = TestType::Yoy;
    scenario.qualifying_skus = "A,B".to_string();
    scenario.earning_skus = "A".to_string();
    scenario.target_percent = "95".to_string();
    scenario.prior_year_timeframes = vec![prior_year("Prior Year 1", "2023-01-01", "2023-12-31")];
    scenario.current_year_timeframe = Timeframe {
        start_date: "2024-01-01".to_string(),
        end_date: "2024-12-31".to_string(),
    };
    scenario.current_year_earning_rate = "5".to_string();
    scenario
}

pub(super) fn flat_scenario(test_type: TestType, earning_skus: &str, percent: &str) -> Scenario {
    let mut scenario = Scenario::draft("Flat earnings");
    scenario.test_type = test_type;
    scenario.qualifying_skus = "Q".to_string();
    scenario.earning_skus = earning_skus.to_string();
    scenario.earning_percent = percent.to_string();
    scenario
}

pub(super) fn test_with(transactions: Vec<Transaction>) -> ScenarioTest {
    let mut test = ScenarioTest::numbered(1);
    test.extend_transactions(transactions);
    test
}

pub(super) fn saved_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 5, 9, 30, 0)
        .single()
        .expect("valid instant")
}

pub(super) type MemoryService = ScenarioService<InMemoryRecordStore, SequentialIds, FixedClock>;

pub(super) fn memory_service() -> (MemoryService, Arc<InMemoryRecordStore>) {
    let store = Arc::new(InMemoryRecordStore::new());
    let service = ScenarioService::new(
        store.clone(),
        Arc::new(SequentialIds::new()),
        Arc::new(FixedClock(saved_at())),
    );
    (service, store)
}
