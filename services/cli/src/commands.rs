use crate::cli::{
    AddTestArgs, CreateScenarioArgs, EvaluateFileArgs, EvaluateTestsArgs, ImportArgs,
};
use crate::render;
use rebate_qualifier::config::AppConfig;
use rebate_qualifier::error::AppError;
use rebate_qualifier::workflows::import::TransactionImporter;
use rebate_qualifier::workflows::qualification::{
    FileRecordStore, Scenario, ScenarioService, ScenarioTest, SystemClock, TestResult, TestType,
    TimestampIds, MAX_PRIOR_YEARS,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

type FileScenarioService = ScenarioService<FileRecordStore, TimestampIds<SystemClock>, SystemClock>;

/// File-backed scenario service plus the export destination.
pub(crate) struct Workspace {
    service: FileScenarioService,
    export_dir: PathBuf,
}

impl Workspace {
    pub(crate) fn open(config: &AppConfig) -> Result<Self, AppError> {
        let store = FileRecordStore::open(&config.store.data_dir)?;
        info!(
            environment = ?config.environment,
            data_dir = %store.root().display(),
            "opened scenario store"
        );

        let service = ScenarioService::new(
            Arc::new(store),
            Arc::new(TimestampIds::new(SystemClock)),
            Arc::new(SystemClock),
        );

        Ok(Self {
            service,
            export_dir: config.export.output_dir.clone(),
        })
    }

    pub(crate) fn list(&self) -> Result<(), AppError> {
        let summaries = self.service.summaries()?;
        render::summaries(&summaries);
        Ok(())
    }

    pub(crate) fn show(&self, id: &str) -> Result<(), AppError> {
        let scenario = self.service.get(id)?;
        render::scenario(&scenario);
        Ok(())
    }

    pub(crate) fn create(&self, args: CreateScenarioArgs) -> Result<(), AppError> {
        let scenario = match args.file.clone() {
            Some(path) => read_scenario(&path)?,
            None => scenario_from_flags(args)?,
        };

        let saved = self.service.save(scenario)?;
        println!(
            "Saved scenario '{}' as {}",
            saved.name,
            saved.id.as_deref().unwrap_or_default()
        );
        Ok(())
    }

    pub(crate) fn delete(&self, id: &str) -> Result<(), AppError> {
        let scenario = self.service.get(id)?;
        self.service.delete(id)?;
        println!("Deleted scenario '{}' ({id})", scenario.name);
        Ok(())
    }

    pub(crate) fn export(&self, id: &str) -> Result<(), AppError> {
        let export = self.service.export(id)?;
        let path = export.write_to(&self.export_dir)?;
        println!("Exported scenario {id} to {}", path.display());
        Ok(())
    }

    pub(crate) fn add_test(&self, args: AddTestArgs) -> Result<(), AppError> {
        let mut scenario = self.service.get(&args.scenario)?;
        let transactions = match &args.csv {
            Some(path) => TransactionImporter::from_path(path, self.service.ids())?,
            None => Vec::new(),
        };

        let test = scenario.add_test()?;
        test.extend_transactions(transactions);
        let test_id = test.id.clone();

        let saved = self.service.save(scenario)?;
        if let Some(test) = saved.test(&test_id) {
            println!(
                "Added {} ({}) with {} transactions",
                test.label,
                test.id,
                test.transactions.len()
            );
            if let Some(result) = &test.results {
                render::result_line(&saved, test, result);
            }
        }
        Ok(())
    }

    pub(crate) fn import(&self, args: ImportArgs) -> Result<(), AppError> {
        let mut scenario = self.service.get(&args.scenario)?;
        let transactions = TransactionImporter::from_path(&args.csv, self.service.ids())?;
        let imported = transactions.len();

        scenario
            .test_mut(&args.test)
            .ok_or_else(|| missing_test(&args.scenario, &args.test))?
            .extend_transactions(transactions);

        let saved = self.service.save(scenario)?;
        println!("Imported {imported} transactions into test {}", args.test);
        if let Some(test) = saved.test(&args.test) {
            if let Some(result) = &test.results {
                render::result_line(&saved, test, result);
            }
        }
        Ok(())
    }

    pub(crate) fn evaluate(&self, args: EvaluateTestsArgs) -> Result<(), AppError> {
        let scenario = self.service.get(&args.scenario)?;
        let tests: Vec<&ScenarioTest> = match &args.test {
            Some(test_id) => vec![scenario
                .test(test_id)
                .ok_or_else(|| missing_test(&args.scenario, test_id))?],
            None => scenario.tests.iter().collect(),
        };

        let evaluated = evaluate_tests(&scenario, tests)?;
        render::evaluations(&scenario, &evaluated, args.json)
    }
}

pub(crate) fn evaluate_file(args: EvaluateFileArgs) -> Result<(), AppError> {
    let scenario = read_scenario(&args.file)?;
    let evaluated = evaluate_tests(&scenario, scenario.tests.iter().collect())?;
    render::evaluations(&scenario, &evaluated, args.json)
}

fn evaluate_tests<'a>(
    scenario: &Scenario,
    tests: Vec<&'a ScenarioTest>,
) -> Result<Vec<(&'a ScenarioTest, TestResult)>, AppError> {
    tests
        .into_iter()
        .map(|test| {
            test.evaluate(scenario)
                .map(|result| (test, result))
                .map_err(AppError::from)
        })
        .collect()
}

fn read_scenario(path: &Path) -> Result<Scenario, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn scenario_from_flags(args: CreateScenarioArgs) -> Result<Scenario, AppError> {
    let CreateScenarioArgs {
        name,
        test_type,
        qualifying_skus,
        earning_skus,
        target_percent,
        prior_years,
        current_year,
        earning_rate,
        min_qualification_percent,
        earning_percent,
        ..
    } = args;

    if prior_years.len() > usize::from(MAX_PRIOR_YEARS) {
        return Err(AppError::Usage(format!(
            "at most {MAX_PRIOR_YEARS} prior-year windows are supported (got {})",
            prior_years.len()
        )));
    }

    let mut scenario = Scenario::draft(name.unwrap_or_default());
    scenario.test_type = TestType::from(test_type);
    scenario.qualifying_skus = qualifying_skus;
    scenario.earning_skus = earning_skus;
    scenario.target_percent = target_percent;
    scenario.current_year_earning_rate = earning_rate;
    scenario.min_qualification_percent = min_qualification_percent;
    scenario.earning_percent = earning_percent;

    if !prior_years.is_empty() {
        scenario.set_prior_year_count(prior_years.len() as u8);
        for (timeframe, (start, end)) in scenario.prior_year_timeframes.iter_mut().zip(prior_years)
        {
            timeframe.start_date = start;
            timeframe.end_date = end;
        }
    }
    if let Some((start, end)) = current_year {
        scenario.current_year_timeframe.start_date = start;
        scenario.current_year_timeframe.end_date = end;
    }

    Ok(scenario)
}

fn missing_test(scenario: &str, test: &str) -> AppError {
    AppError::Usage(format!("scenario {scenario} has no test '{test}'"))
}
