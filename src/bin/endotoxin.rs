//! Command-line surface for the endotoxin calculators.
//!
//! Starts like the form does: the defaults (built in, or from `--config`)
//! pre-fill the inputs and the table-based uncertainty is computed once.
//! A subcommand then overrides inputs and runs one calculator.
//!
//! ```text
//! endotoxin                                   # startup calculation only
//! endotoxin limit --k 5 --m 0.2 --unit mass
//! endotoxin table --dilution 10X --result 100
//! endotoxin log10 --result-eu 50 --dilution 1
//! endotoxin budget --reading 0.03 --dilution 0.01 --potency 0.02
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use u_endotoxin::config::FormDefaults;
use u_endotoxin::form::{fields, MemoryForm, Workbench};
use u_endotoxin::format::{to_fixed, to_percent};
use u_endotoxin::uncertainty::{CoverageFactor, ExpandedUncertaintyDefaults, UncertaintyBudget};

/// Endotoxin limit and measurement-uncertainty calculator
#[derive(Parser, Debug)]
#[command(name = "endotoxin", version)]
struct Cli {
    /// TOML file with pre-populated form values
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Endotoxin limit EL = K / M
    Limit(LimitArgs),

    /// Combined/expanded uncertainty from the coefficient table
    Table(TableArgs),

    /// Uncertainty interval in log10 space
    Log10(Log10Args),

    /// Root-sum-of-squares uncertainty budget
    Budget(BudgetArgs),
}

#[derive(Args, Debug)]
struct LimitArgs {
    /// Threshold pyrogenic dose K (EU/kg/hr)
    #[arg(long)]
    k: Option<String>,

    /// Maximum dose M per kg per hour
    #[arg(long)]
    m: Option<String>,

    /// Unit of M: mass or volume
    #[arg(long)]
    unit: Option<String>,
}

#[derive(Args, Debug)]
struct TableArgs {
    /// Dilution factor (1X, 10X, 25X)
    #[arg(long)]
    dilution: Option<String>,

    /// Measured result (EU/mL)
    #[arg(long)]
    result: Option<String>,
}

#[derive(Args, Debug)]
struct Log10Args {
    /// Dilution factor selecting the default uncertainty (1, 10, 25)
    #[arg(long)]
    dilution: Option<String>,

    /// Measured result (EU/mL)
    #[arg(long)]
    result_eu: Option<String>,

    /// Expanded uncertainty (log10); overrides the dilution default
    #[arg(long)]
    uncertainty: Option<String>,
}

#[derive(Args, Debug)]
struct BudgetArgs {
    /// Relative uncertainty of the reading
    #[arg(long, default_value_t = 0.0)]
    reading: f64,

    /// Relative uncertainty of the dilution
    #[arg(long, default_value_t = 0.0)]
    dilution: f64,

    /// Relative uncertainty of the potency
    #[arg(long, default_value_t = 0.0)]
    potency: f64,

    /// Coverage factor k
    #[arg(long, default_value_t = 2.0)]
    coverage: f64,

    /// Concentration to express the expanded uncertainty for
    #[arg(long)]
    concentration: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("u_endotoxin=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let defaults = match &cli.config {
        Some(path) => FormDefaults::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FormDefaults::default(),
    };

    let bench = Workbench::standard();
    let mut form = MemoryForm::new();
    defaults.seed(&mut form, ExpandedUncertaintyDefaults::standard());

    info!("form ready");
    // The outcome is already rendered into the form.
    let _ = bench.on_ready(&mut form);

    match cli.command {
        None => print_fields(&form, TABLE_OUTPUTS),
        Some(Command::Limit(args)) => {
            set_if_some(&mut form, fields::ROUTE, args.k);
            set_if_some(&mut form, fields::MAX_DOSE, args.m);
            set_if_some(&mut form, fields::DOSE_UNIT, args.unit);
            let _ = bench.run_endotoxin_limit(&mut form);
            if let Some(block) = form.get(fields::EL_RESULT) {
                println!("{block}");
            }
        }
        Some(Command::Table(args)) => {
            set_if_some(&mut form, fields::TABLE_DILUTION, args.dilution);
            set_if_some(&mut form, fields::TABLE_RESULT, args.result);
            let _ = bench.run_table_uncertainty(&mut form);
            print_fields(&form, TABLE_OUTPUTS);
        }
        Some(Command::Log10(args)) => {
            if let Some(dilution) = args.dilution {
                form.set(fields::LOG10_DILUTION, dilution);
                bench.suggest_expanded_uncertainty(&mut form);
            }
            set_if_some(&mut form, fields::RESULT_EU, args.result_eu);
            set_if_some(&mut form, fields::EXPANDED_UNCERTAINTY, args.uncertainty);
            let _ = bench.run_log10_interval(&mut form);
            print_fields(&form, LOG10_OUTPUTS);
        }
        Some(Command::Budget(args)) => run_budget(&args)?,
    }

    for message in form.notifications() {
        eprintln!("! {message}");
    }
    Ok(())
}

const TABLE_OUTPUTS: &[(&str, &str)] = &[
    ("Absolute Uc", fields::ABSOLUTE_UC),
    ("Relative Uc", fields::RELATIVE_UC),
    ("Expanded U (log10)", fields::EXPANDED_LOG10),
    ("Result", fields::MU_REPORT),
    ("Interval low", fields::INTERVAL_LOW),
    ("Interval high", fields::INTERVAL_HIGH),
];

const LOG10_OUTPUTS: &[(&str, &str)] = &[
    ("log10(Result)", fields::LOG10_RESULT),
    ("Result (EU/mL)", fields::ECHO_RESULT),
    ("Expanded U (log10)", fields::ECHO_UNCERTAINTY),
    ("MU lower", fields::MU_LOWER),
    ("MU upper", fields::MU_UPPER),
    ("Uncertainty interval lower", fields::UI_LOWER),
    ("Uncertainty interval upper", fields::UI_UPPER),
];

fn print_fields(form: &MemoryForm, outputs: &[(&str, &str)]) {
    for (label, field) in outputs {
        println!("{label:>28}: {}", form.get(field).unwrap_or(""));
    }
}

fn set_if_some(form: &mut MemoryForm, field: &str, value: Option<String>) {
    if let Some(value) = value {
        form.set(field, value);
    }
}

fn run_budget(args: &BudgetArgs) -> anyhow::Result<()> {
    let coverage = CoverageFactor::new(args.coverage)
        .with_context(|| format!("coverage factor must be positive, got {}", args.coverage))?;
    let budget = UncertaintyBudget::new(args.reading, args.dilution, args.potency)?;

    println!("{:>28}: {}", "Relative Uc", to_percent(budget.relative_combined(), 2));
    println!(
        "{:>28}: {}",
        format!("Relative U (k={})", coverage.value()),
        to_percent(budget.expanded(coverage), 2)
    );
    if let Some(c) = args.concentration {
        let u = budget.absolute_expanded(c, coverage)?;
        println!("{:>28}: {} ± {}", "Result", to_fixed(c, 4), to_fixed(u, 4));
    }
    Ok(())
}
