use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// SportsDataIO player record, as far as the catalog schema describes it
///
/// Every field is optional: the upload path never validates payloads, this view
/// only exists to report how many records carry the catalog columns.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PlayerRecord {
    #[serde(rename = "PlayerID")]
    pub player_id: Option<i64>,

    #[serde(rename = "FirstName")]
    pub first_name: Option<String>,

    #[serde(rename = "LastName")]
    pub last_name: Option<String>,

    #[serde(rename = "Position")]
    pub position: Option<String>,

    #[serde(rename = "College")]
    pub college: Option<String>,

    #[serde(rename = "Height")]
    pub height: Option<String>,

    #[serde(rename = "Weight")]
    pub weight: Option<Value>,

    #[serde(rename = "BirthDate")]
    pub birth_date: Option<String>,

    /// Fields outside the catalog schema
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlayerRecord {
    /// Typed view of an opaque record, `None` if the record is not an object
    /// or a catalog column has the wrong JSON type
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => "<unnamed>".to_string(),
        }
    }
}

/// How many fetched records match the catalog schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SchemaCoverage {
    pub total: usize,
    pub with_player_id: usize,
    pub mismatched: usize,
}

impl SchemaCoverage {
    pub fn of(records: &[Value]) -> Self {
        let mut coverage = Self { total: records.len(), ..Self::default() };

        for record in records {
            match PlayerRecord::from_value(record) {
                Some(player) if player.player_id.is_some() => coverage.with_player_id += 1,
                Some(_) => {}
                None => coverage.mismatched += 1,
            }
        }

        coverage
    }
}

/// Pipeline steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Fetch,
    Upload,
    CreateDatabase,
    CreateTable,
    ConfigureQueryOutput,
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Upload => "upload",
            Self::CreateDatabase => "create_database",
            Self::CreateTable => "create_table",
            Self::ConfigureQueryOutput => "configure_query_output",
        };
        f.write_str(name)
    }
}

/// Events emitted by the pipeline, one per step
#[derive(Debug, Clone, Serialize)]
pub enum PipelineEvent {
    /// Step finished
    Completed {
        step: PipelineStep,
        detail: String,
        timestamp: DateTime<Utc>,
    },

    /// Step failed; the pipeline moved on
    Failed {
        step: PipelineStep,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// Step not attempted
    Skipped {
        step: PipelineStep,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl PipelineEvent {
    pub fn completed(step: PipelineStep, detail: impl Into<String>) -> Self {
        Self::Completed { step, detail: detail.into(), timestamp: Utc::now() }
    }

    pub fn failed(step: PipelineStep, error: impl ToString) -> Self {
        Self::Failed { step, error: error.to_string(), timestamp: Utc::now() }
    }

    pub fn skipped(step: PipelineStep, reason: impl Into<String>) -> Self {
        Self::Skipped { step, reason: reason.into(), timestamp: Utc::now() }
    }

    pub fn step(&self) -> PipelineStep {
        match self {
            Self::Completed { step, .. }
            | Self::Failed { step, .. }
            | Self::Skipped { step, .. } => *step,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub records_fetched: usize,
    pub coverage: SchemaCoverage,
    pub events: Vec<PipelineEvent>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &PipelineEvent> {
        self.events.iter().filter(|e| e.is_failure())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn event(&self, step: PipelineStep) -> Option<&PipelineEvent> {
        self.events.iter().find(|e| e.step() == step)
    }
}
