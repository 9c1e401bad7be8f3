use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::Scenario;
use super::evaluation::ConfigurationError;
use super::export::ScenarioExport;
use super::ids::{Clock, IdSource};
use super::store::{RecordStore, StoreError};

/// Namespace under which scenario records live in the store.
pub const SCENARIO_KEY_PREFIX: &str = "scenario:";

pub fn scenario_key(id: &str) -> String {
    format!("{SCENARIO_KEY_PREFIX}{id}")
}

/// Listing row for a stored scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub test_type_label: String,
    pub test_count: usize,
    pub qualified: usize,
    pub not_qualified: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl From<&Scenario> for ScenarioSummary {
    fn from(scenario: &Scenario) -> Self {
        let qualified = scenario
            .tests
            .iter()
            .filter(|test| test.results.as_ref().is_some_and(|result| result.qualified))
            .count();

        Self {
            id: scenario.id.clone().unwrap_or_default(),
            name: scenario.name.clone(),
            test_type_label: scenario.test_type.label().to_string(),
            test_count: scenario.tests.len(),
            qualified,
            not_qualified: scenario.tests.len() - qualified,
            last_modified: scenario.last_modified,
        }
    }
}

/// Scenario lifecycle on top of a record store: load, save with fresh
/// results, delete, and export.
pub struct ScenarioService<S, I, C> {
    store: Arc<S>,
    ids: Arc<I>,
    clock: Arc<C>,
}

impl<S, I, C> ScenarioService<S, I, C>
where
    S: RecordStore,
    I: IdSource,
    C: Clock,
{
    pub fn new(store: Arc<S>, ids: Arc<I>, clock: Arc<C>) -> Self {
        Self { store, ids, clock }
    }

    pub fn ids(&self) -> &I {
        &self.ids
    }

    /// Every readable scenario. Records that fail to load are skipped.
    pub fn list(&self) -> Result<Vec<Scenario>, ScenarioServiceError> {
        let keys = self.store.list(SCENARIO_KEY_PREFIX)?;
        let mut scenarios = Vec::with_capacity(keys.len());

        for key in keys {
            match self.store.get(&key) {
                Ok(Some(raw)) => match serde_json::from_str::<Scenario>(&raw) {
                    Ok(scenario) => scenarios.push(scenario),
                    Err(err) => {
                        warn!(%key, error = %err, "skipping unreadable scenario record")
                    }
                },
                Ok(None) => {}
                Err(err) => {
                    warn!(%key, error = %err, "skipping scenario record that failed to load")
                }
            }
        }

        Ok(scenarios)
    }

    pub fn summaries(&self) -> Result<Vec<ScenarioSummary>, ScenarioServiceError> {
        Ok(self.list()?.iter().map(ScenarioSummary::from).collect())
    }

    pub fn get(&self, id: &str) -> Result<Scenario, ScenarioServiceError> {
        let raw = self
            .store
            .get(&scenario_key(id))?
            .ok_or_else(|| ScenarioServiceError::NotFound(id.to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Recalculates every test, assigns an id when missing, stamps
    /// `last_modified`, and writes the record.
    pub fn save(&self, mut scenario: Scenario) -> Result<Scenario, ScenarioServiceError> {
        if scenario.name.trim().is_empty() {
            return Err(ScenarioServiceError::MissingName);
        }

        scenario.recalculate()?;

        let id = match scenario.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => self.ids.scenario_id(),
        };
        scenario.id = Some(id.clone());
        scenario.last_modified = Some(self.clock.now());

        let body = serde_json::to_string(&scenario)?;
        self.store.set(&scenario_key(&id), &body)?;

        info!(
            scenario_id = %id,
            tests = scenario.tests.len(),
            "saved qualification scenario"
        );
        Ok(scenario)
    }

    pub fn delete(&self, id: &str) -> Result<(), ScenarioServiceError> {
        self.store.delete(&scenario_key(id))?;
        info!(scenario_id = %id, "deleted qualification scenario");
        Ok(())
    }

    pub fn export(&self, id: &str) -> Result<ScenarioExport, ScenarioServiceError> {
        let scenario = self.get(id)?;
        Ok(ScenarioExport::new(&scenario, self.clock.now())?)
    }
}

/// Error raised by the scenario service.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioServiceError {
    #[error("scenario name must not be blank")]
    MissingName,
    #[error("scenario '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("scenario record is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
