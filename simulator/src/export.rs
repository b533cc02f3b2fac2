use crate::workflow::runner::{OrderResult, SweepResult, WorkflowResult};
use anyhow::Context;
use foilcore::aero::analytic::AnalyticLift;
use foilcore::geometry::surface::AerofoilSurface;
use foilcore::interface::coordinates::write_coordinates;
use foilcore::interface::records::{SummaryRecord, SurfaceRow};
use foilcore::SolutionState;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct SolutionReport<'a> {
    summary: SummaryRecord,
    analytic: &'a AnalyticLift,
    naca: Option<&'a str>,
    surface: Vec<SurfaceRow>,
}

/// Writes reports and coordinate files into one output directory.
pub struct Exporter {
    root: PathBuf,
}

impl Exporter {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating output directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn write_all(
        &self,
        result: &WorkflowResult,
        with_coordinates: bool,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let naca_name = result.naca.as_ref().map(|naca| naca.name.as_str());
        let mut written = vec![self.write_solution(&result.base, naca_name)?];

        if with_coordinates {
            written.push(self.write_surface(&result.base.name(), &result.base.surface)?);
            if let Some(naca) = &result.naca {
                written.push(self.write_surface(&naca.name, &naca.surface)?);
            }
        }
        for sweep in &result.sweeps {
            written.push(self.write_sweep(sweep)?);
        }
        if let Some(order) = &result.order {
            written.push(self.write_order(order)?);
        }
        Ok(written)
    }

    pub fn write_solution(
        &self,
        state: &SolutionState,
        naca: Option<&str>,
    ) -> anyhow::Result<PathBuf> {
        let report = SolutionReport {
            summary: state.summary(),
            analytic: &state.analytic,
            naca,
            surface: state.data_rows(),
        };
        self.write_json(&format!("{}.json", state.name()), &report)
    }

    pub fn write_sweep(&self, sweep: &SweepResult) -> anyhow::Result<PathBuf> {
        self.write_json(
            &format!("sweep_{}_{}.json", sweep.spec.field, sweep.name),
            sweep,
        )
    }

    pub fn write_order(&self, order: &OrderResult) -> anyhow::Result<PathBuf> {
        self.write_json(&format!("order_{}.json", order.name), order)
    }

    /// Two-column `.dat` file in surface order.
    pub fn write_surface(&self, name: &str, surface: &AerofoilSurface) -> anyhow::Result<PathBuf> {
        let path = self.root.join(format!("{}.dat", name));
        let file = File::create(&path)
            .with_context(|| format!("creating coordinate file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_coordinates(surface, &mut writer)
            .and_then(|_| writer.flush())
            .with_context(|| format!("writing coordinate file {}", path.display()))?;
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> anyhow::Result<PathBuf> {
        let path = self.root.join(file_name);
        let file =
            File::create(&path).with_context(|| format!("creating report {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)
            .with_context(|| format!("serializing report {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("writing report {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::{OrderStudy, WorkflowConfig};
    use crate::workflow::runner::Runner;
    use foilcore::prelude::{AerofoilConfig, SweepField, SweepSpec};

    #[tokio::test]
    async fn exporter_writes_every_report() {
        let base = AerofoilConfig::new(0.0, 0.06, 0.02, 0.15, 20).unwrap();
        let mut cfg = WorkflowConfig::from_args(base);
        cfg.sweeps
            .push(SweepSpec::new(SweepField::Beta, vec![0.0, 0.02]));
        cfg.order = Some(OrderStudy {
            alpha: 3.0,
            panels: vec![10, 20, 40],
        });
        let result = Runner::new(cfg).execute().await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path().join("out")).unwrap();
        let written = exporter.write_all(&result, true).unwrap();
        assert_eq!(written.len(), 5);
        assert!(written.iter().all(|p| p.exists()));

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(summary["summary"]["n"], 20);
        assert_eq!(summary["surface"].as_array().unwrap().len(), 20);
        assert_eq!(summary["naca"], "naca2514");

        let coordinates = fs::read_to_string(&written[1]).unwrap();
        assert_eq!(coordinates.lines().count(), 21);

        let order: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[4]).unwrap()).unwrap();
        assert_eq!(order["rows"].as_array().unwrap().len(), 3);
        assert!(order["report"]["order"].as_f64().unwrap() > 0.0);
    }
}
