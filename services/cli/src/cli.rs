use crate::commands::{self, Workspace};
use clap::{Args, Parser, Subcommand};
use rebate_qualifier::config::AppConfig;
use rebate_qualifier::error::AppError;
use rebate_qualifier::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rebate-qualifier",
    about = "Model rebate qualification scenarios and test them against transaction sets",
    version
)]
struct Cli {
    /// Override the directory holding saved scenarios
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Override the directory exports are written to
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage saved scenarios
    Scenarios {
        #[command(subcommand)]
        command: ScenarioCommand,
    },
    /// Manage the tests of a saved scenario
    Tests {
        #[command(subcommand)]
        command: TestCommand,
    },
    /// Evaluate a scenario document without touching the store
    Evaluate(EvaluateFileArgs),
}

#[derive(Subcommand, Debug)]
enum ScenarioCommand {
    /// List saved scenarios with their qualification counts
    List,
    /// Show one scenario, its configuration and stored results
    Show(ScenarioRef),
    /// Create a scenario from flags or from a JSON document
    Create(CreateScenarioArgs),
    /// Delete a saved scenario
    Delete(ScenarioRef),
    /// Write a scenario as indented JSON into the export directory
    Export(ScenarioRef),
}

#[derive(Subcommand, Debug)]
enum TestCommand {
    /// Append a new test, optionally seeded from a transaction CSV
    Add(AddTestArgs),
    /// Append transactions from a CSV file to an existing test
    Import(ImportArgs),
    /// Re-run the engine for one or every test and print the results
    Evaluate(EvaluateTestsArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ScenarioRef {
    /// Scenario identifier, e.g. scenario_1714564800000
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct CreateScenarioArgs {
    /// Load the scenario from a JSON document instead of flags
    #[arg(long, conflicts_with = "name")]
    pub(crate) file: Option<PathBuf>,
    /// Scenario name
    #[arg(long, required_unless_present = "file")]
    pub(crate) name: Option<String>,
    /// Rule type: yoy, minQual or earningsOnly
    #[arg(long, default_value = "yoy")]
    pub(crate) test_type: String,
    /// Comma-separated qualifying SKUs
    #[arg(long, default_value = "")]
    pub(crate) qualifying_skus: String,
    /// Comma-separated earning SKUs
    #[arg(long, default_value = "")]
    pub(crate) earning_skus: String,
    /// Year-over-year target percent (blank means 95)
    #[arg(long, default_value = "")]
    pub(crate) target_percent: String,
    /// Prior-year window as START..END; repeat oldest first
    #[arg(long = "prior-year", value_parser = parse_window)]
    pub(crate) prior_years: Vec<(String, String)>,
    /// Current-year window as START..END
    #[arg(long, value_parser = parse_window)]
    pub(crate) current_year: Option<(String, String)>,
    /// Percent paid on current-year earning spend for yoy scenarios
    #[arg(long, default_value = "")]
    pub(crate) earning_rate: String,
    /// Recorded for minQual scenarios; not enforced
    #[arg(long, default_value = "")]
    pub(crate) min_qualification_percent: String,
    /// Percent paid on earning spend for minQual and earningsOnly scenarios
    #[arg(long, default_value = "")]
    pub(crate) earning_percent: String,
}

#[derive(Args, Debug)]
pub(crate) struct AddTestArgs {
    /// Scenario identifier
    pub(crate) scenario: String,
    /// Optional Date,SKU,Quantity,Price CSV to seed the test with
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Scenario identifier
    pub(crate) scenario: String,
    /// Test identifier, e.g. 000001
    pub(crate) test: String,
    /// Date,SKU,Quantity,Price CSV file
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateTestsArgs {
    /// Scenario identifier
    pub(crate) scenario: String,
    /// Only evaluate this test
    #[arg(long)]
    pub(crate) test: Option<String>,
    /// Print results as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateFileArgs {
    /// Scenario JSON document
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print results as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_window(raw: &str) -> Result<(String, String), String> {
    raw.split_once("..")
        .map(|(start, end)| (start.trim().to_string(), end.trim().to_string()))
        .ok_or_else(|| format!("expected START..END, got '{raw}'"))
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.store.data_dir = data_dir;
    }
    if let Some(export_dir) = cli.export_dir {
        config.export.output_dir = export_dir;
    }

    telemetry::init(&config.telemetry)?;

    let workspace = || Workspace::open(&config);
    match cli.command {
        Command::Scenarios { command } => match command {
            ScenarioCommand::List => workspace()?.list(),
            ScenarioCommand::Show(args) => workspace()?.show(&args.id),
            ScenarioCommand::Create(args) => workspace()?.create(args),
            ScenarioCommand::Delete(args) => workspace()?.delete(&args.id),
            ScenarioCommand::Export(args) => workspace()?.export(&args.id),
        },
        Command::Tests { command } => match command {
            TestCommand::Add(args) => workspace()?.add_test(args),
            TestCommand::Import(args) => workspace()?.import(args),
            TestCommand::Evaluate(args) => workspace()?.evaluate(args),
        },
        Command::Evaluate(args) => commands::evaluate_file(args),
    }
}
