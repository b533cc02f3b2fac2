use crate::workflow::config::{OrderStudy, WorkflowConfig};
use anyhow::{anyhow, Context};
use foilcore::aero::convergence::{ConvergenceMetric, ConvergenceReport};
use foilcore::geometry::naca::{Naca4Digit, NacaDigits};
use foilcore::geometry::surface::AerofoilSurface;
use foilcore::interface::records::{OrderRecord, SummaryRecord};
use foilcore::prelude::{AerofoilConfig, FoilResult, SweepField, SweepSpec};
use foilcore::telemetry::log::LogManager;
use foilcore::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};
use foilcore::{evaluate, SolutionState};
use log::warn;
use serde::Serialize;
use std::sync::Arc;
use tokio::task;

/// Nearest NACA 4-digit section, sampled with the base panel count.
#[derive(Debug, Clone)]
pub struct NacaComparison {
    pub digits: NacaDigits,
    pub name: String,
    pub surface: AerofoilSurface,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub spec: SweepSpec,
    /// Name of the base section with the swept field left out.
    pub name: String,
    pub rows: Vec<SummaryRecord>,
    pub failures: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResult {
    pub study: OrderStudy,
    pub name: String,
    pub rows: Vec<OrderRecord>,
    pub report: ConvergenceReport,
}

#[derive(Debug)]
pub struct WorkflowResult {
    pub base: SolutionState,
    pub naca: Option<NacaComparison>,
    pub sweeps: Vec<SweepResult>,
    pub order: Option<OrderResult>,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
    logger: Arc<LogManager>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
            logger: Arc::new(LogManager::new()),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub async fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let base_config = self.config.base;
        let base = self
            .evaluate_all(vec![base_config])
            .await?
            .pop()
            .ok_or_else(|| anyhow!("base evaluation produced no result"))?
            .with_context(|| format!("evaluating base section {}", base_config.name()))?;
        let naca = Self::naca_comparison(&base);

        let mut sweeps = Vec::with_capacity(self.config.sweeps.len());
        for spec in &self.config.sweeps {
            sweeps.push(self.run_sweep(spec).await?);
        }

        let order = match &self.config.order {
            Some(study) => Some(self.run_order(study).await?),
            None => None,
        };

        Ok(WorkflowResult {
            base,
            naca,
            sweeps,
            order,
            metrics: self.metrics(),
        })
    }

    /// Evaluates every config on the blocking pool and returns the outcomes in
    /// input order.
    async fn evaluate_all(
        &self,
        configs: Vec<AerofoilConfig>,
    ) -> anyhow::Result<Vec<FoilResult<SolutionState>>> {
        let handles: Vec<_> = configs
            .into_iter()
            .map(|config| (config, task::spawn_blocking(move || evaluate(&config))))
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (config, handle) in handles {
            let outcome = handle
                .await
                .with_context(|| format!("evaluation task for {} aborted", config.name()))?;
            match &outcome {
                Ok(_) => self.metrics.record_evaluated(),
                Err(err) => {
                    warn!("{} failed: {}", config.name(), err);
                    self.metrics.record_failure();
                }
            }
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn run_sweep(&self, spec: &SweepSpec) -> anyhow::Result<SweepResult> {
        let configs = spec
            .configs(&self.config.base)
            .with_context(|| format!("expanding sweep over {}", spec.field))?;
        self.logger
            .record(&format!("sweeping {} over {} values", spec.field, configs.len()));

        let mut rows = Vec::with_capacity(configs.len());
        let mut failures = Vec::new();
        for (value, outcome) in spec.values.iter().zip(self.evaluate_all(configs).await?) {
            match outcome {
                Ok(state) => rows.push(state.summary()),
                Err(err) => failures.push(format!("{}: {}", spec.label(*value), err)),
            }
        }

        Ok(SweepResult {
            spec: spec.clone(),
            name: self.config.base.name_without(spec.field),
            rows,
            failures,
        })
    }

    async fn run_order(&self, study: &OrderStudy) -> anyhow::Result<OrderResult> {
        let configs = study
            .configs(&self.config.base)
            .context("expanding convergence study")?;
        let name = configs
            .first()
            .map(|c| c.name_without(SweepField::N))
            .ok_or_else(|| anyhow!("convergence study lists no panel counts"))?;

        let mut reference = None;
        let mut samples = Vec::with_capacity(configs.len());
        for outcome in self.evaluate_all(configs).await? {
            // the failure is already logged and counted
            if let Ok(state) = outcome {
                reference.get_or_insert(state.cl());
                samples.push((state.config.n(), state.dpan_cl));
            }
        }
        let reference =
            reference.ok_or_else(|| anyhow!("every evaluation of the study for {} failed", name))?;

        let report = ConvergenceMetric::estimate(&samples, reference)
            .with_context(|| format!("estimating convergence order for {}", name))?;
        self.logger.record(&format!(
            "{}: convergence order {:.3} (r = {:.4})",
            name, report.order, report.r_value
        ));
        let rows = report
            .samples
            .iter()
            .map(|sample| OrderRecord::from_sample(sample, reference))
            .collect();

        Ok(OrderResult {
            study: study.clone(),
            name,
            rows,
            report,
        })
    }

    fn naca_comparison(base: &SolutionState) -> Option<NacaComparison> {
        let digits = base.naca_digits();
        let section = Naca4Digit::new(digits)
            .and_then(|section| section.surface(base.config.n()).map(|s| (section, s)));
        match section {
            Ok((section, surface)) => Some(NacaComparison {
                digits,
                name: section.name(),
                surface,
            }),
            Err(err) => {
                warn!("no NACA comparison for {}: {}", base.name(), err);
                None
            }
        }
    }
}
