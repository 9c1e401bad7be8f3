use std::fs;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rebate_qualifier::workflows::import::TransactionImporter;
use rebate_qualifier::workflows::qualification::{
    FileRecordStore, FixedClock, RecordStore, Scenario, ScenarioService, TestType, TimestampIds,
};
use rust_decimal_macros::dec;

fn frozen_clock() -> FixedClock {
    FixedClock(
        Utc.with_ymd_and_hms(2024, 12, 1, 15, 0, 0)
            .single()
            .expect("valid instant"),
    )
}

fn growth_scenario() -> Scenario {
    let mut scenario = Scenario::draft("Northwest dealer growth");
    scenario.test_type = TestType::Yoy;
    scenario.qualifying_skus = "SKU001, SKU002".to_string();
    scenario.earning_skus = "SKU001".to_string();
    scenario.target_percent = "95".to_string();
    scenario.prior_year_timeframes[0].start_date = "2023-01-01".to_string();
    scenario.prior_year_timeframes[0].end_date = "2023-12-31".to_string();
    scenario.current_year_timeframe.start_date = "2024-01-01".to_string();
    scenario.current_year_timeframe.end_date = "2024-12-31".to_string();
    scenario.current_year_earning_rate = "5".to_string();
    scenario
}

#[test]
fn imported_transactions_survive_a_store_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(FileRecordStore::open(dir.path().join("scenarios")).expect("store"));
    let clock = frozen_clock();
    let service = ScenarioService::new(
        store.clone(),
        Arc::new(TimestampIds::new(clock)),
        Arc::new(clock),
    );

    let csv = "Date,SKU,Quantity,Price\n\
2023-04-01,SKU001,10,100\n\
2024-04-01,SKU001,10,96\n\
2024-04-02,SKU999,1,5000\n";
    let transactions =
        TransactionImporter::from_reader(csv.as_bytes(), service.ids()).expect("csv imports");
    assert_eq!(transactions.len(), 3);

    let mut scenario = growth_scenario();
    scenario
        .add_test()
        .expect("number available")
        .extend_transactions(transactions);
    let saved = service.save(scenario).expect("scenario saves");
    let id = saved.id.clone().expect("id assigned");
    assert_eq!(
        id,
        format!("scenario_{}", frozen_clock().0.timestamp_millis() + 3)
    );

    let keys = store.list("scenario:").expect("list keys");
    assert_eq!(keys, vec![format!("scenario:{id}")]);

    let reloaded = service.get(&id).expect("scenario reloads");
    assert_eq!(reloaded, saved);
    let result = reloaded.tests[0].results.as_ref().expect("results stored");
    assert!(result.qualified);
    assert_eq!(result.earnings, dec!(48));
    assert_eq!(result.details.qualifying_transactions, 2);
}

#[test]
fn export_writes_pretty_json_next_to_the_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(FileRecordStore::open(dir.path().join("scenarios")).expect("store"));
    let clock = frozen_clock();
    let service = ScenarioService::new(store, Arc::new(TimestampIds::new(clock)), Arc::new(clock));

    let saved = service.save(growth_scenario()).expect("scenario saves");
    let export = service
        .export(saved.id.as_deref().expect("id assigned"))
        .expect("export builds");

    let path = export
        .write_to(&dir.path().join("exports"))
        .expect("export written");
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some(
            format!(
                "Northwest_dealer_growth_{}.json",
                clock.0.timestamp_millis()
            )
            .as_str()
        )
    );
    let body = fs::read_to_string(&path).expect("export readable");
    assert!(body.contains("\n  \"testType\": \"yoy\""));
}

#[test]
fn summaries_skip_files_that_are_not_scenarios() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path().join("scenarios");
    let store = Arc::new(FileRecordStore::open(&root).expect("store"));
    let clock = frozen_clock();
    let service = ScenarioService::new(
        store.clone(),
        Arc::new(TimestampIds::new(clock)),
        Arc::new(clock),
    );

    service.save(growth_scenario()).expect("scenario saves");
    store
        .set("scenario:corrupt", "{\"name\": 12")
        .expect("raw write");
    fs::write(root.join("notes.txt"), "ignored").expect("stray file");

    let summaries = service.summaries().expect("summaries");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Northwest dealer growth");
    assert_eq!(summaries[0].test_type_label, "Year over Year");
    assert_eq!(summaries[0].test_count, 0);
}
