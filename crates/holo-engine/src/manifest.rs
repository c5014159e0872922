use crate::plan::ProcessingStatistics;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub pipeline_name: String,
    pub input_paths: Vec<String>,
    pub output_path: String,
    pub trace_paths: Vec<String>,
    pub error_path: Option<String>,
    pub total_input_rows: usize,
    pub total_output_rows: usize,
    pub failed_rows: usize,
    pub elapsed_ms: u64,
    pub steps: Vec<StepManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepManifest {
    pub name: String,
    pub operator: String,
    pub input_rows: usize,
    pub output_rows: usize,
    pub filtered_rows: Option<usize>, // Only for steps that removed something
    pub failed_rows: usize,
}

impl Manifest {
    pub fn new(pipeline_name: String, stats: &ProcessingStatistics) -> Self {
        let steps = stats
            .step_statistics
            .iter()
            .map(|step| StepManifest {
                name: step.step_name.clone(),
                operator: step.operator.clone(),
                input_rows: step.documents_remaining_before,
                output_rows: step.documents_remaining_before
                    - step.documents_removed
                    - step.documents_failed,
                filtered_rows: (step.documents_removed > 0).then_some(step.documents_removed),
                failed_rows: step.documents_failed,
            })
            .collect();

        Self {
            pipeline_name,
            input_paths: Vec::new(),
            output_path: String::new(),
            trace_paths: Vec::new(),
            error_path: None,
            total_input_rows: stats.total_documents,
            total_output_rows: stats.num_documents,
            failed_rows: stats.num_failed,
            elapsed_ms: stats.elapsed_ms,
            steps,
        }
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
