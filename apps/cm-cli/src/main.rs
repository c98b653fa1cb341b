mod error;

use clap::{Parser, Subcommand, ValueEnum};
use cm_core::units::constants::TON_REF_W;
use cm_models::catalog::CURVE_SETS;
use cm_models::{BaselineRequest, CurveSet, baseline_chiller};
use cm_project::{ResolvedChiller, resolve_chiller};
use cm_representation::{DocumentOptions, Format, represent, seed_digest, write_document};
use error::{CliError, CliResult};
use std::path::{Path, PathBuf};
use tracing::info;

/// Data version of the published baseline documents.
const BASELINE_DATA_VERSION: u32 = 3;

#[derive(Parser)]
#[command(name = "cm-cli")]
#[command(about = "Chiller performance maps in the ASHRAE 205 RS0001 format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// Print rated capacity, power and COP of every chiller
    Rate {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// Write RS0001 documents for the chillers of a project
    Generate {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// Only this chiller
        #[arg(long)]
        chiller: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Output directory
        #[arg(long, default_value = "output")]
        out: PathBuf,
    },
    /// Write one RS0001 document per ASHRAE 90.1 curve set
    Baseline {
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Output directory
        #[arg(long, default_value = "output")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Yaml => Format::Yaml,
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Rate { project_path } => cmd_rate(&project_path),
        Commands::Generate {
            project_path,
            chiller,
            format,
            out,
        } => cmd_generate(&project_path, chiller.as_deref(), format.into(), &out),
        Commands::Baseline { format, out } => cmd_baseline(format.into(), &out),
    }
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = cm_project::load(project_path)?;
    for chiller in &project.chillers {
        resolve_chiller(chiller)?;
    }
    println!("✓ Project is valid ({} chillers)", project.chillers.len());
    Ok(())
}

fn cmd_rate(project_path: &Path) -> CliResult<()> {
    let project = cm_project::load(project_path)?;
    if project.chillers.is_empty() {
        println!("No chillers found in project");
        return Ok(());
    }
    println!("Rated performance:");
    for def in &project.chillers {
        let resolved = resolve_chiller(def)?;
        let rated = resolved.model.rated_conditions();
        let point = resolved.model.evaluate(&rated)?;
        println!(
            "  {} - {} ({}, {} condenser)",
            resolved.id,
            resolved.name,
            resolved.model.formulation_name(),
            resolved.model.condenser().condenser_type().text()
        );
        println!(
            "    capacity: {:.1} kW ({:.1} ton)",
            point.net_evaporator_capacity.value / 1e3,
            point.net_evaporator_capacity.value / TON_REF_W
        );
        println!("    power:    {:.1} kW", point.input_power.value / 1e3);
        println!("    COP:      {:.3}", point.cop());
    }
    Ok(())
}

fn cmd_generate(
    project_path: &Path,
    chiller_id: Option<&str>,
    format: Format,
    out: &Path,
) -> CliResult<()> {
    let project = cm_project::load(project_path)?;
    let defs = match chiller_id {
        Some(id) => vec![project.chiller(id)?],
        None => project.chillers.iter().collect(),
    };
    for def in defs {
        let resolved = resolve_chiller(def)?;
        let document = represent(resolved.model.as_ref(), &document_options(&resolved))?;
        let path = write_document(&document, out, &resolved.id, format)?;
        println!("✓ {} -> {}", resolved.id, path.display());
    }
    Ok(())
}

fn document_options(resolved: &ResolvedChiller) -> DocumentOptions {
    DocumentOptions {
        description: resolved.description.clone(),
        notes: resolved.notes.clone(),
        data_version: resolved.data_version,
        uuid_seed: Some(seed_digest(&resolved.uuid_seed)),
        compressor_type: resolved.compressor_type.map(str::to_string),
        ..DocumentOptions::default()
    }
}

fn cmd_baseline(format: Format, out: &Path) -> CliResult<()> {
    for set in &CURVE_SETS {
        let request = BaselineRequest::for_curve_set(set);
        let baseline = baseline_chiller(&request)?;
        check_rating(set, &request, baseline.model.as_ref())?;

        let capacity = request.rated_net_evaporator_capacity.value;
        let options = DocumentOptions {
            data_version: BASELINE_DATA_VERSION,
            uuid_seed: Some(seed_digest(&format!("('{}', {})", set.name, capacity))),
            ..DocumentOptions::for_baseline(&baseline)
        };
        let document = represent(baseline.model.as_ref(), &options)?;
        let stem = format!("ASHRAE90-1-2022-AppJ-Curve-Set-{}", set.name);
        let path = write_document(&document, out, &stem, format)?;
        info!(set = set.name, path = %path.display(), "wrote baseline document");
        println!("✓ {} -> {}", set.name, path.display());
    }
    Ok(())
}

/// Rated COP within 0.05 and rated capacity within 1 % of the request.
fn check_rating(
    set: &'static CurveSet,
    request: &BaselineRequest,
    model: &dyn cm_models::ChillerModel,
) -> CliResult<()> {
    let rated = model.rated_conditions();
    let point = model.evaluate(&rated)?;
    let cop = point.cop();
    if (cop - request.rated_cop).abs() >= 0.05 {
        return Err(CliError::RatingCheck {
            set: set.name,
            what: format!("COP {cop:.3} vs rated {:.3}", request.rated_cop),
        });
    }
    let target = request.rated_net_evaporator_capacity.value;
    let capacity = point.net_evaporator_capacity.value;
    if (capacity - target).abs() > 0.01 * target {
        return Err(CliError::RatingCheck {
            set: set.name,
            what: format!("capacity {capacity:.0} W vs rated {target:.0} W"),
        });
    }
    Ok(())
}
