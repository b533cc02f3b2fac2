use anyhow::Context;
use clap::Parser;
use export::Exporter;
use foilcore::prelude::AerofoilConfig;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::{parse_panels, parse_sweep, OrderStudy, WorkflowConfig};
use workflow::runner::Runner;

mod export;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Karman-Trefftz aerofoil evaluation driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Directory receiving JSON reports and coordinate files
    #[arg(long, default_value = "output")]
    output: PathBuf,
    /// Incidence in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    alpha: f64,
    /// Thickness parameter; thin sections are about `2·eps` thick
    #[arg(long, default_value_t = 0.06)]
    eps: f64,
    /// Camber parameter, close to the maximum camber as a fraction of chord
    #[arg(long, default_value_t = 0.02, allow_negative_numbers = true)]
    beta: f64,
    /// Trailing-edge angle in radians
    #[arg(long, default_value_t = 0.15)]
    tau: f64,
    #[arg(long, default_value_t = 150)]
    n: usize,
    /// Sweep one field, e.g. `eps=0.04,0.06,0.08`; repeatable
    #[arg(long)]
    sweep: Vec<String>,
    /// Panel counts for a convergence study, e.g. `10,20,40,80,160`
    #[arg(long)]
    order: Option<String>,
    /// Incidence in degrees used by the convergence study
    #[arg(long, default_value_t = 3.0, allow_negative_numbers = true)]
    order_alpha: f64,
    /// Also write `.dat` coordinates for the section and its NACA counterpart
    #[arg(long, default_value_t = false)]
    coordinates: bool,
}

fn workflow_from_args(args: &Args) -> anyhow::Result<WorkflowConfig> {
    let base = AerofoilConfig::new(args.alpha, args.eps, args.beta, args.tau, args.n)
        .context("building aerofoil config from arguments")?;
    let mut config = WorkflowConfig::from_args(base);
    config.sweeps = args
        .sweep
        .iter()
        .map(|text| parse_sweep(text))
        .collect::<anyhow::Result<_>>()?;
    if let Some(panels) = &args.order {
        config.order = Some(OrderStudy {
            alpha: args.order_alpha,
            panels: parse_panels(panels)?,
        });
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        workflow_from_args(&args)?
    };
    workflow_config.write_coordinates |= args.coordinates;

    let runner = Runner::new(workflow_config.clone());
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating evaluation runtime")?;
    let result = runtime.block_on(runner.execute())?;

    let base = &result.base;
    println!(
        "{} -> Cl {:.6} (thin aerofoil {:.6}), dpan_cl {:.6}, error {:+.3e}",
        base.name(),
        base.cl(),
        base.analytic.thin_cl,
        base.dpan_cl,
        base.error()
    );
    println!(
        "max thickness {:.4}, max camber {:.4} at x {:.3}, nearest {}",
        base.max_thickness,
        base.max_camber,
        base.max_camber_x,
        result
            .naca
            .as_ref()
            .map(|naca| naca.name.as_str())
            .unwrap_or("n/a")
    );
    for sweep in &result.sweeps {
        println!(
            "sweep {} -> {} evaluated, {} failed",
            sweep.spec.field,
            sweep.rows.len(),
            sweep.failures.len()
        );
    }
    if let Some(order) = &result.order {
        println!(
            "convergence order {:.3} (r = {:.4}, {} warnings)",
            order.report.order,
            order.report.r_value,
            order.report.warnings.len()
        );
    }

    let exporter = Exporter::new(&args.output)?;
    let written = exporter.write_all(&result, workflow_config.write_coordinates)?;
    println!(
        "wrote {} files to {} ({} evaluations, {} failures)",
        written.len(),
        args.output.display(),
        result.metrics.evaluated,
        result.metrics.failed
    );

    Ok(())
}
