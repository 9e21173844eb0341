use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{AppConfig, Settings};
use crate::core::{filters::select_eligible, sorting::sort_customers};
use crate::error::{Error, ErrorPosture};
use crate::models::EligibleCustomer;
use crate::services::CustomerSource;

/// Where the pipeline is in its current (or last) run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Ingesting,
    Filtering,
    Sorting,
    Done,
    Failed,
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Eligible customers, sorted as configured
    pub customers: Vec<EligibleCustomer>,
    pub lines_read: usize,
    /// Indexes of malformed lines skipped during ingestion
    pub skipped_lines: Vec<usize>,
    /// Customers evaluated and found beyond the threshold
    pub excluded_records: usize,
    /// Customers skipped because they could not be evaluated
    pub failed_records: usize,
}

/// Main orchestrator - reads customers, filters by distance and sorts
///
/// # Pipeline Stages
/// 1. Ingestion of the line-delimited source
/// 2. Distance filtering
/// 3. Sorting of the eligible subset
///
/// Runs take `&mut self`, so one instance never has two runs in flight.
/// Nothing but the stage marker outlives a run.
#[derive(Debug, Clone)]
pub struct CustomerPipeline {
    defaults: AppConfig,
    posture: ErrorPosture,
    stage: PipelineStage,
}

impl CustomerPipeline {
    pub fn new(defaults: AppConfig, posture: ErrorPosture) -> Self {
        Self {
            defaults,
            posture,
            stage: PipelineStage::Idle,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.app.clone(), settings.global.posture())
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn defaults(&self) -> &AppConfig {
        &self.defaults
    }

    pub fn posture(&self) -> ErrorPosture {
        self.posture
    }

    /// Find eligible customers using the defaults merged with `overrides`
    ///
    /// `overrides` must be a JSON object such as
    /// ```json
    /// { "distance": 200, "sortingType": "DESC" }
    /// ```
    /// Anything else fails with `InvalidConfiguration` before any I/O.
    pub async fn get_eligible_customers(
        &mut self,
        overrides: &Value,
    ) -> Result<Vec<EligibleCustomer>, Error> {
        self.stage = PipelineStage::Idle;
        let config = self.defaults.with_overrides(overrides)?;

        Ok(self.run(&config).await?.customers)
    }

    /// Run the full pipeline with an explicit configuration
    ///
    /// Every error leaving this function has been classified against the
    /// pipeline's posture.
    pub async fn run(&mut self, config: &AppConfig) -> Result<RunReport, Error> {
        self.stage = PipelineStage::Idle;
        let config = config.clone().validated()?;

        let span = tracing::info_span!("pipeline_run", run_id = %Uuid::new_v4());
        match self.execute(&config).instrument(span).await {
            Ok(report) => {
                self.stage = PipelineStage::Done;
                Ok(report)
            }
            Err(err) => {
                tracing::debug!(stage = ?self.stage, "Pipeline run failed");
                self.stage = PipelineStage::Failed;
                Err(err.classify_generic(self.posture))
            }
        }
    }

    async fn execute(&mut self, config: &AppConfig) -> Result<RunReport, Error> {
        tracing::info!(
            source = %config.file_path.display(),
            max_distance = config.distance,
            unit = ?config.distance_unit,
            strict = config.is_strict(),
            "Finding eligible customers"
        );

        // Stage 1: Ingestion
        self.enter(PipelineStage::Ingesting);
        let source = CustomerSource::open(&config.file_path).await?;
        let ingested = source.ingest(config.is_strict()).await?;

        // Stage 2: Distance filtering
        self.enter(PipelineStage::Filtering);
        let selection = select_eligible(&ingested.records, config, self.posture)?;

        // Stage 3: Sorting
        self.enter(PipelineStage::Sorting);
        let mut customers = selection.eligible;
        if !sort_customers(&mut customers, &config.customer_sorting_field, config.sorting_type) {
            tracing::warn!(
                field = %config.customer_sorting_field,
                "Sort field is not numeric for every customer, keeping file order"
            );
        }

        tracing::info!(
            lines = ingested.lines_read,
            skipped_lines = ingested.skipped_lines.len(),
            eligible = customers.len(),
            excluded = selection.excluded,
            "Found eligible customers"
        );

        Ok(RunReport {
            customers,
            lines_read: ingested.lines_read,
            skipped_lines: ingested.skipped_lines,
            excluded_records: selection.excluded,
            failed_records: selection.failed,
        })
    }

    fn enter(&mut self, stage: PipelineStage) {
        tracing::debug!(from = ?self.stage, to = ?stage, "Pipeline stage");
        self.stage = stage;
    }
}

impl Default for CustomerPipeline {
    fn default() -> Self {
        Self::new(AppConfig::default(), ErrorPosture::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_customers(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        for line in lines {
            writeln!(file, "{}", line).expect("write line");
        }
        file
    }

    fn pipeline_for(file: &NamedTempFile) -> CustomerPipeline {
        let defaults = AppConfig {
            file_path: file.path().to_path_buf(),
            ..AppConfig::default()
        };
        CustomerPipeline::new(defaults, ErrorPosture::Production)
    }

    #[tokio::test]
    async fn test_run_filters_and_sorts() {
        let file = write_customers(&[
            r#"{"latitude": "52.986375", "user_id": 12, "name": "Christina McArdle", "longitude": "-6.043701"}"#,
            r#"{"latitude": "51.92893", "user_id": 1, "name": "Alice Cahill", "longitude": "-10.27699"}"#,
            r#"{"latitude": "53.2451022", "user_id": 4, "name": "Ian Kehoe", "longitude": "-6.238335"}"#,
        ]);
        let mut pipeline = pipeline_for(&file);

        let config = pipeline.defaults().clone();
        let report = pipeline.run(&config).await.unwrap();

        let ids: Vec<i64> = report.customers.iter().map(|c| c.user_id).collect();
        assert_eq!(ids, vec![4, 12]);
        assert_eq!(report.lines_read, 3);
        assert_eq!(report.excluded_records, 1);
        assert_eq!(pipeline.stage(), PipelineStage::Done);
    }

    #[tokio::test]
    async fn test_invalid_overrides_leave_pipeline_idle() {
        let file = write_customers(&[]);
        let mut pipeline = pipeline_for(&file);

        let err = pipeline.get_eligible_customers(&json!("far")).await.unwrap_err();

        assert!(matches!(err, Error::Application(AppError::InvalidConfiguration(_))));
        assert_eq!(pipeline.stage(), PipelineStage::Idle);
    }

    #[tokio::test]
    async fn test_missing_source_fails_run() {
        let mut pipeline = CustomerPipeline::default();

        let err = pipeline
            .get_eligible_customers(&json!({ "filePath": "/no/such/dir/customers.txt" }))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Application(AppError::SourceNotFound { .. })));
        assert_eq!(pipeline.stage(), PipelineStage::Failed);
    }

    #[tokio::test]
    async fn test_pipeline_is_reusable() {
        let file = write_customers(&[
            r#"{"latitude": "52.986375", "user_id": 12, "name": "Christina McArdle", "longitude": "-6.043701"}"#,
            "garbage",
        ]);
        let mut pipeline = pipeline_for(&file);

        let err = pipeline
            .get_eligible_customers(&json!({ "showErrorForFailedCustomerProcessing": true }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Application(AppError::StrictIngestion { line: 1 })));
        assert_eq!(pipeline.stage(), PipelineStage::Failed);

        let customers = pipeline.get_eligible_customers(&json!({})).await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(pipeline.stage(), PipelineStage::Done);

        let again = pipeline.get_eligible_customers(&json!({})).await.unwrap();
        assert_eq!(again, customers);
    }
}
