use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use rf_engine::{
    BatchOutput, CycleResult, Engine, FullSystemResult, RunContext, Series, SeriesAggregate,
    StatePoint, compile_project,
};
use rf_fluids::{CoolPropOracle, PropertyOracle, SurrogateOracle};
use rf_topology::CircuitLabel;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Project(#[from] rf_project::ProjectError),

    #[error(transparent)]
    Engine(#[from] rf_engine::EngineError),

    #[error("Failed to read series file {path}: {source}")]
    SeriesRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid series file {path}: {source}")]
    SeriesParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "rf-cli")]
#[command(about = "refrigflow CLI - refrigeration test-rig performance analysis", long_about = None)]
struct Cli {
    /// Property backend
    #[arg(long, value_enum, global = true, default_value_t = Backend::Coolprop)]
    backend: Backend,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Coolprop,
    Surrogate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Circuit {
    Left,
    Center,
    Right,
}

impl From<Circuit> for CircuitLabel {
    fn from(c: Circuit) -> Self {
        match c {
            Circuit::Left => CircuitLabel::Left,
            Circuit::Center => CircuitLabel::Center,
            Circuit::Right => CircuitLabel::Right,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a session file
    Validate {
        /// Path to the session YAML/JSON file
        project_path: PathBuf,
    },
    /// List every component port with its label and mapped channel
    Ports {
        /// Path to the session YAML/JSON file
        project_path: PathBuf,
    },
    /// Resolve sensor roles against a series
    Resolve {
        /// Path to the session YAML/JSON file
        project_path: PathBuf,
        /// Path to the series JSON file
        series_path: PathBuf,
    },
    /// Calibrate volumetric efficiency from the rated inputs
    Calibrate {
        /// Path to the session YAML/JSON file
        project_path: PathBuf,
    },
    /// Single-instant 8-point cycle over the aggregated series
    Cycle {
        /// Path to the session YAML/JSON file
        project_path: PathBuf,
        /// Path to the series JSON file
        series_path: PathBuf,
        /// Restrict the cycle to one circuit
        #[arg(long, value_enum)]
        circuit: Option<Circuit>,
    },
    /// Transform every row of a series
    Batch {
        /// Path to the session YAML/JSON file
        project_path: PathBuf,
        /// Path to the series JSON file
        series_path: PathBuf,
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let backend = cli.backend;

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Ports { project_path } => cmd_ports(&project_path),
        Commands::Resolve {
            project_path,
            series_path,
        } => cmd_resolve(&project_path, &series_path, backend),
        Commands::Calibrate { project_path } => cmd_calibrate(&project_path, backend),
        Commands::Cycle {
            project_path,
            series_path,
            circuit,
        } => cmd_cycle(&project_path, &series_path, circuit, backend),
        Commands::Batch {
            project_path,
            series_path,
            output,
        } => cmd_batch(&project_path, &series_path, output.as_deref(), backend),
    }
}

fn load_context(project_path: &Path) -> CliResult<RunContext> {
    tracing::debug!(path = %project_path.display(), "loading session");
    let project = rf_project::load(project_path)?;
    Ok(compile_project(&project)?)
}

fn load_engine(project_path: &Path, backend: Backend) -> CliResult<Engine<Box<dyn PropertyOracle>>> {
    let oracle: Box<dyn PropertyOracle> = match backend {
        Backend::Coolprop => Box::new(CoolPropOracle::new()),
        Backend::Surrogate => Box::new(SurrogateOracle::new()),
    };
    Ok(Engine::new(load_context(project_path)?, oracle))
}

fn load_series(path: &Path) -> CliResult<Series> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::SeriesRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::SeriesParse {
        path: path.to_path_buf(),
        source,
    })
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating session: {}", project_path.display());
    let ctx = load_context(project_path)?;
    println!("✓ Session is valid");
    println!("  Refrigerant: {}", ctx.refrigerant);
    println!("  Components: {}", ctx.topology.components().count());
    println!("  Mappings: {}", ctx.topology.mapping().len());

    let stale = ctx.topology.stale_role_keys();
    if !stale.is_empty() {
        println!("  Stale mapping keys:");
        for key in stale {
            println!("    {}", key);
        }
    }
    Ok(())
}

fn cmd_ports(project_path: &Path) -> CliResult<()> {
    let ctx = load_context(project_path)?;
    let listing = ctx.topology.port_listing();
    if listing.is_empty() {
        println!("No components in session");
        return Ok(());
    }

    let mut current: Option<String> = None;
    for entry in listing {
        if current.as_deref() != Some(entry.component_id.as_str()) {
            println!("{} ({})", entry.component_id, entry.kind);
            current = Some(entry.component_id.clone());
        }
        println!(
            "  {:<20} {:<24} {}",
            entry.port,
            entry.label,
            entry.channel.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn cmd_resolve(project_path: &Path, series_path: &Path, backend: Backend) -> CliResult<()> {
    let engine = load_engine(project_path, backend)?;
    let series = load_series(series_path)?;
    let report = engine.resolve(Some(&series.columns()));

    println!("Sensor roles ({} mapped):", report.bindings.len());
    for definition in engine.context().roles.iter() {
        let channel = match report.binding(definition.role) {
            Some(binding) => binding.channels().join(" + "),
            None => "(unmapped)".to_string(),
        };
        println!("  {:<12} {}", definition.role.key(), channel);
    }
    if !report.conflicts.is_empty() {
        println!("Conflicts:");
        for conflict in &report.conflicts {
            println!("  {}", conflict);
        }
    }
    Ok(())
}

fn cmd_calibrate(project_path: &Path, backend: Backend) -> CliResult<()> {
    let engine = load_engine(project_path, backend)?;
    let result = engine.calibrate();
    println!(
        "eta_vol = {:.4} ({})",
        result.eta_vol,
        result.method.as_str()
    );
    if let Some(details) = &result.details {
        println!("  Rated mass flow:       {:.2} lb/hr", details.m_dot_rated_lbhr);
        println!("  Theoretical mass flow: {:.2} lb/hr", details.m_dot_theoretical_lbhr);
        println!("  Suction-gas density:   {:.4} lb/ft³", details.density_lbft3);
    }
    for warning in &result.warnings {
        println!("  ! {}", warning);
    }
    Ok(())
}

fn cmd_cycle(
    project_path: &Path,
    series_path: &Path,
    circuit: Option<Circuit>,
    backend: Backend,
) -> CliResult<()> {
    let engine = load_engine(project_path, backend)?;
    let series = load_series(series_path)?;
    let reader = SeriesAggregate::new(&series, engine.context().settings.aggregation);

    match circuit {
        Some(circuit) => {
            let result = engine.per_circuit(&reader, circuit.into());
            println!("Circuit: {}", result.circuit.as_str());
            if let Some(cycle) = &result.cycle {
                print_cycle(cycle);
            }
            print_errors(&result.errors);
        }
        None => {
            let result = engine.full_system(&reader);
            print_full_system(&result);
        }
    }
    Ok(())
}

fn print_full_system(result: &FullSystemResult) {
    if let Some(cycle) = &result.cycle {
        print_cycle(cycle);
    }
    if let Some(flow) = &result.mass_flow {
        println!(
            "Mass flow: {:.4} kg/s ({:.1} lb/hr, eta_vol {:.3})",
            flow.actual_kg_s, flow.actual_lb_hr, flow.eta_vol
        );
    }
    if let Some(perf) = &result.performance {
        println!(
            "Cooling: {:.0} W ({:.0} BTU/hr, {:.2} tons)",
            perf.cooling_capacity_w, perf.cooling_capacity_btu_hr, perf.cooling_capacity_tons
        );
        if let (Some(w), Some(hp)) = (perf.compressor_power_w, perf.compressor_power_hp) {
            println!("Compressor power: {:.0} W ({:.2} hp)", w, hp);
        }
        if let Some(eer) = perf.eer {
            println!("EER: {:.2}", eer);
        }
    }
    print_errors(&result.errors);
}

fn print_cycle(cycle: &CycleResult) {
    println!(
        "{:<4} {:>9} {:>11} {:>10} {:>9} {:>9}",
        "pt", "T [°F]", "h [kJ/kg]", "s [kJ/kgK]", "ρ [kg/m³]", "margin"
    );
    for point in StatePoint::ALL {
        let Some(state) = cycle.state(point) else {
            continue;
        };
        let margin = state
            .margin
            .map(|m| format!("{:.1}", m.value()))
            .or_else(|| state.quality.map(|q| format!("x={:.3}", q)))
            .unwrap_or_default();
        println!(
            "{:<4} {:>9.1} {:>11.2} {:>10.4} {:>9.3} {:>9}",
            point.key(),
            state.t_f(),
            state.h_j_per_kg / 1000.0,
            state.s_j_per_kg_k / 1000.0,
            state.rho_kg_m3,
            margin
        );
    }
    if let Some(cop) = cycle.performance.and_then(|p| p.cop) {
        println!("COP: {:.2}", cop);
    }
    for warning in &cycle.warnings {
        println!("  ! {}", warning);
    }
}

fn print_errors(errors: &[String]) {
    for error in errors {
        println!("  ✗ {}", error);
    }
}

fn cmd_batch(
    project_path: &Path,
    series_path: &Path,
    output: Option<&Path>,
    backend: Backend,
) -> CliResult<()> {
    let engine = load_engine(project_path, backend)?;
    let series = load_series(series_path)?;
    let result: BatchOutput = engine.run_batch(&series);

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            println!(
                "✓ Wrote {} rows ({} failed) to {}",
                result.rows.len(),
                result.failed_rows(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
