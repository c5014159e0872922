use crate::io::{output_path, ReaderFactory, WriterFactory};
use crate::manifest::Manifest;
use crate::spec::{PipelineSpec, SinkKind};
use anyhow::Context;
use holo_operators::person;
use holo_sdk::{Operator, OperatorRegistry, RecordSchema, Result, Sample};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

struct Step {
    name: String,
    operator: String,
    op: Box<dyn Operator>,
}

pub struct Plan {
    steps: Vec<Step>,
    schema: RecordSchema,
    spec: PipelineSpec,
    show_progress: bool,
}

#[derive(Debug, Clone)]
pub struct ProcessingStatistics {
    /// Records that made it through every step
    pub num_documents: usize,
    /// Records read from the source
    pub total_documents: usize,
    /// Records an operator failed on
    pub num_failed: usize,
    pub elapsed_ms: u64,
    pub step_statistics: Vec<StepStatistics>,
}

#[derive(Debug, Clone)]
pub struct StepStatistics {
    pub step_name: String,
    pub operator: String,
    pub step_index: usize,
    pub documents_removed: usize,
    pub documents_failed: usize,
    pub documents_remaining_before: usize,
    pub total_documents: usize,
}

/// A record an operator returned an error for. The batch carries on without it.
#[derive(Debug)]
pub struct RecordFailure {
    pub index: usize,
    pub step: String,
    pub error: String,
    /// The record as it entered the failing step, kept only when tracing
    pub sample: Option<Sample>,
}

#[derive(Debug)]
pub struct ProcessedBatch {
    /// Surviving records, in input order
    pub kept: Vec<Sample>,
    /// Per step, the records it removed (as they entered it). Empty unless tracing.
    pub dropped: Vec<Vec<Sample>>,
    pub failures: Vec<RecordFailure>,
    pub statistics: ProcessingStatistics,
}

enum Outcome {
    Kept(Sample),
    Dropped {
        step: usize,
        sample: Option<Sample>,
    },
    Failed {
        step: usize,
        sample: Option<Sample>,
        error: anyhow::Error,
    },
}

impl Outcome {
    /// Index of the last step the record reached, or the step count if it passed them all.
    fn reached(&self, num_steps: usize) -> usize {
        match self {
            Outcome::Kept(_) => num_steps,
            Outcome::Dropped { step, .. } | Outcome::Failed { step, .. } => *step,
        }
    }
}

impl Plan {
    pub fn compile(spec: PipelineSpec, registry: &OperatorRegistry) -> Result<Self> {
        let mut steps = Vec::new();

        for stage in person::stages(&spec.transform)? {
            let op = registry
                .build(stage.operator, &stage.config)
                .with_context(|| format!("Failed to build step {}", stage.name))?;
            steps.push(Step {
                name: stage.name.to_string(),
                operator: stage.operator.to_string(),
                op,
            });
        }
        debug!(steps = steps.len(), pipeline = %spec.name, "compiled plan");

        Ok(Self {
            steps,
            schema: person::schema(),
            spec,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn spec(&self) -> &PipelineSpec {
        &self.spec
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    fn trace(&self) -> bool {
        self.spec.sink.trace
    }

    fn evaluate(&self, mut sample: Sample) -> Outcome {
        for (idx, step) in self.steps.iter().enumerate() {
            let before = self.trace().then(|| sample.clone());
            match step.op.process(sample) {
                Ok(Some(next)) => sample = next,
                Ok(None) => {
                    return Outcome::Dropped {
                        step: idx,
                        sample: before,
                    }
                }
                Err(error) => {
                    return Outcome::Failed {
                        step: idx,
                        sample: before,
                        error,
                    }
                }
            }
        }
        Outcome::Kept(sample)
    }

    fn progress_bar(&self, len: usize) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }
        let pb = ProgressBar::new(len as u64);
        pb.set_style(ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records ({percent}%)",
        )?);
        Ok(pb)
    }

    /// Run a batch through every step. The whole batch is rejected with a
    /// `SchemaError` if any record is structurally invalid; otherwise each
    /// record is evaluated independently and the survivors come back in
    /// input order.
    pub fn process(&self, samples: Vec<Sample>) -> Result<ProcessedBatch> {
        let start = Instant::now();
        for (index, sample) in samples.iter().enumerate() {
            self.schema.validate(index, sample)?;
        }

        let total = samples.len();
        let pb = self.progress_bar(total)?;
        let outcomes: Vec<Outcome> = samples
            .into_par_iter()
            .map(|sample| {
                let outcome = self.evaluate(sample);
                pb.inc(1);
                outcome
            })
            .collect();
        pb.finish_and_clear();

        let num_steps = self.steps.len();
        let mut reached_before = vec![0usize; num_steps];
        let mut removed_at = vec![0usize; num_steps];
        let mut failed_at = vec![0usize; num_steps];
        let mut kept = Vec::new();
        let mut dropped: Vec<Vec<Sample>> = vec![Vec::new(); num_steps];
        let mut failures = Vec::new();

        for (index, outcome) in outcomes.into_iter().enumerate() {
            let reached = outcome.reached(num_steps);
            for count in reached_before.iter_mut().take((reached + 1).min(num_steps)) {
                *count += 1;
            }
            match outcome {
                Outcome::Kept(sample) => kept.push(sample),
                Outcome::Dropped { step, sample } => {
                    removed_at[step] += 1;
                    if let Some(sample) = sample {
                        dropped[step].push(sample);
                    }
                }
                Outcome::Failed {
                    step,
                    sample,
                    error,
                } => {
                    failed_at[step] += 1;
                    warn!(record = index, step = %self.steps[step].name, "record failed: {:#}", error);
                    failures.push(RecordFailure {
                        index,
                        step: self.steps[step].name.clone(),
                        error: format!("{:#}", error),
                        sample,
                    });
                }
            }
        }

        let step_statistics: Vec<StepStatistics> = self
            .steps
            .iter()
            .enumerate()
            .map(|(idx, step)| StepStatistics {
                step_name: step.name.clone(),
                operator: step.operator.clone(),
                step_index: idx,
                documents_removed: removed_at[idx],
                documents_failed: failed_at[idx],
                documents_remaining_before: reached_before[idx],
                total_documents: total,
            })
            .collect();

        for s in &step_statistics {
            if s.documents_removed > 0 || s.documents_failed > 0 {
                info!(
                    step = %s.step_name,
                    before = s.documents_remaining_before,
                    removed = s.documents_removed,
                    failed = s.documents_failed,
                    "step finished"
                );
            }
        }

        let statistics = ProcessingStatistics {
            num_documents: kept.len(),
            total_documents: total,
            num_failed: failures.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
            step_statistics,
        };
        info!(
            input = total,
            output = statistics.num_documents,
            failed = statistics.num_failed,
            "batch processed"
        );

        Ok(ProcessedBatch {
            kept,
            dropped,
            failures,
            statistics,
        })
    }

    /// Read the source, process it, write the sink plus any trace and error
    /// files, and record everything in `manifest.json` beside the output.
    pub fn execute(&self) -> Result<ProcessingStatistics> {
        let inputs = crate::io::discover::resolve_inputs(&self.spec.source)?;
        for input in &inputs {
            info!(path = %input.display(), "reading input");
        }

        let reader = ReaderFactory::create(self.spec.source.kind, &inputs)?;
        let samples = reader.collect::<Result<Vec<Sample>>>()?;
        if samples.is_empty() {
            warn!(pipeline = %self.spec.name, "source contains no records");
        }

        let batch = self.process(samples)?;

        let output = output_path(&self.spec.sink, &inputs[0]);
        let columns: Vec<String> = person::OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut writer = WriterFactory::create(self.spec.sink.kind, &output, columns)?;
        for sample in batch.kept {
            writer.write_sample(sample)?;
        }
        writer.close()?;
        info!(path = %output.display(), rows = batch.statistics.num_documents, "wrote output");

        let out_dir = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
            .to_string();

        let mut trace_paths = Vec::new();
        for (idx, samples) in batch.dropped.into_iter().enumerate() {
            if samples.is_empty() {
                continue;
            }
            let path = out_dir
                .join("trace")
                .join(format!("step_{:02}", idx))
                .join(format!("{}.jsonl", stem));
            let mut writer = WriterFactory::create(SinkKind::Jsonl, &path, Vec::new())?;
            for sample in samples {
                writer.write_sample(sample)?;
            }
            if writer.close()? {
                trace_paths.push(path);
            }
        }

        let error_path = if batch.failures.is_empty() {
            None
        } else {
            let path = out_dir.join("error").join(format!("{}.jsonl", stem));
            let mut writer = WriterFactory::create(SinkKind::Jsonl, &path, Vec::new())?;
            for failure in batch.failures {
                let mut record = Sample::new();
                record.set_i64("record_index", failure.index as i64);
                record.set_str("step", failure.step);
                record.set_str("error", failure.error);
                if let Some(sample) = failure.sample {
                    record.set_value("sample", sample.into_value());
                }
                writer.write_sample(record)?;
            }
            writer.close()?;
            Some(path)
        };

        let mut manifest = Manifest::new(self.spec.name.clone(), &batch.statistics);
        manifest.input_paths = inputs.iter().map(|p| display(p)).collect();
        manifest.output_path = display(&output);
        manifest.trace_paths = trace_paths.iter().map(|p| display(p)).collect();
        manifest.error_path = error_path.as_deref().map(display);
        manifest.write_to_file(out_dir.join("manifest.json"))?;

        Ok(batch.statistics)
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
