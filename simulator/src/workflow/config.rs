use anyhow::{anyhow, Context};
use foilcore::prelude::{AerofoilConfig, FoilResult, SweepField, SweepSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Panel-refinement study run at one incidence around the base section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderStudy {
    /// Degrees.
    pub alpha: f64,
    pub panels: Vec<usize>,
}

impl OrderStudy {
    pub fn configs(&self, base: &AerofoilConfig) -> FoilResult<Vec<AerofoilConfig>> {
        let at_alpha = base.with_alpha(self.alpha)?;
        self.panels
            .iter()
            .map(|&n| at_alpha.with_panels(n))
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub base: AerofoilConfig,
    #[serde(default)]
    pub sweeps: Vec<SweepSpec>,
    #[serde(default)]
    pub order: Option<OrderStudy>,
    #[serde(default)]
    pub write_coordinates: bool,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(base: AerofoilConfig) -> Self {
        Self {
            base,
            sweeps: Vec::new(),
            order: None,
            write_coordinates: false,
        }
    }
}

/// Parses `field=v1,v2,...`, e.g. `eps=0.01,0.02,0.03`.
pub fn parse_sweep(text: &str) -> anyhow::Result<SweepSpec> {
    let (field, values) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("sweep `{}` is not of the form field=v1,v2", text))?;
    let field: SweepField = field.parse()?;
    let values = parse_list(values).with_context(|| format!("parsing sweep `{}`", text))?;
    Ok(SweepSpec::new(field, values))
}

/// Parses a comma-separated list of panel counts.
pub fn parse_panels(text: &str) -> anyhow::Result<Vec<usize>> {
    text.split(',')
        .map(|item| {
            item.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid panel count `{}`", item.trim()))
        })
        .collect()
}

fn parse_list(text: &str) -> anyhow::Result<Vec<f64>> {
    text.split(',')
        .map(|item| {
            item.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid value `{}`", item.trim()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_has_no_studies() {
        let base = AerofoilConfig::new(0.0, 0.06, 0.02, 0.15, 150).unwrap();
        let cfg = WorkflowConfig::from_args(base);
        assert_eq!(cfg.base.n(), 150);
        assert!(cfg.sweeps.is_empty());
        assert!(cfg.order.is_none());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"base: { alpha: 0.0, eps: 0.06, beta: 0.02, tau: 0.15, n: 150 }\n\
              sweeps:\n  - { field: eps, values: [0.01, 0.02, 0.03] }\n\
              order:\n  alpha: 3.0\n  panels: [10, 20, 40]\n\
              write_coordinates: true\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.base.eps(), 0.06);
        assert_eq!(cfg.sweeps[0].field, SweepField::Eps);
        assert_eq!(cfg.sweeps[0].values.len(), 3);
        assert_eq!(cfg.order.unwrap().panels, vec![10, 20, 40]);
        assert!(cfg.write_coordinates);
    }

    #[test]
    fn config_load_rejects_invalid_base() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"base: { alpha: 0.0, eps: 0.06, beta: 0.02, tau: 0.15, n: 2 }\n")
            .unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }

    #[test]
    fn sweep_argument_is_parsed() {
        let spec = parse_sweep("beta=0.0, 0.01,0.02").unwrap();
        assert_eq!(spec.field, SweepField::Beta);
        assert_eq!(spec.values, vec![0.0, 0.01, 0.02]);
        assert!(parse_sweep("beta").is_err());
        assert!(parse_sweep("chord=1").is_err());
        assert!(parse_sweep("eps=0.1,x").is_err());
    }

    #[test]
    fn order_study_sets_alpha_and_panels() {
        let base = AerofoilConfig::new(0.0, 0.06, 0.02, 0.15, 150).unwrap();
        let study = OrderStudy {
            alpha: 3.0,
            panels: parse_panels("10,20,40").unwrap(),
        };
        let configs = study.configs(&base).unwrap();
        assert_eq!(configs.len(), 3);
        assert!(configs.iter().all(|c| c.alpha() == 3.0));
        assert_eq!(configs[2].n(), 40);
        assert!(parse_panels("10,two").is_err());
    }
}
