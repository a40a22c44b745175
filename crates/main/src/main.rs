use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use env_logger::Env;

use car_report::builder::ReportBuilder;
use car_report::flow::{FlowOutcome, ReportFlow, StatusSink};
use car_report::model::{DisplayFields, VehicleRecord};
use car_report::storage::DirectoryStore;
use car_report::viewer::{LaunchError, SystemViewer, Viewer};

/// Renders the built-in vehicle record into a PDF specification report.
///
/// The Roboto font faces must be present under the library crate's
/// `assets/fonts` directory or provided via the `CAR_REPORT_FONTS_DIR`
/// environment variable before running `generate`.
#[derive(Parser)]
#[command(author, version, about = "Vehicle specification report generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the vehicle record as it appears on screen.
    #[command(name = "show")]
    Show,

    /// Generate the PDF report and save it as `CarReport_<timestamp>.pdf`.
    #[command(name = "generate", aliases = ["gen", "report"])]
    Generate {
        /// Directory the report is saved to.
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Open the saved report with the system PDF viewer.
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let record = VehicleRecord::default();

    let result = match cli.command {
        Commands::Show => {
            show_record(&record);
            Ok(())
        }
        Commands::Generate { out_dir, open } => generate(&record, out_dir, open),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn show_record(record: &VehicleRecord) {
    let fields = DisplayFields::from(record);
    println!("VIN:        {}", fields.vin);
    println!("Make:       {}", fields.make);
    println!("Model:      {}", fields.model);
    println!("Year:       {}", fields.year);
    println!("Color:      {}", fields.color);
    println!("Engine:     {}", fields.engine);
    println!("Horsepower: {}", fields.horsepower);
    println!("Price:      {}", fields.price);
}

fn generate(
    record: &VehicleRecord,
    out_dir: PathBuf,
    open: bool,
) -> Result<(), Box<dyn Error + 'static>> {
    let store = DirectoryStore::new(out_dir);
    let sink = ConsoleSink;

    let outcome = if open {
        ReportFlow::new(ReportBuilder::new(), store, SystemViewer::new()).run(record, &sink)?
    } else {
        ReportFlow::new(ReportBuilder::new(), store, SilentViewer).run(record, &sink)?
    };

    report_outcome(&outcome);
    Ok(())
}

fn report_outcome(outcome: &FlowOutcome) {
    if outcome.launch_error.is_some() {
        println!(
            "The report is available at {} and can be opened manually.",
            outcome.path.display()
        );
    }
}

/// Prints flow status updates to the console.
struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn set_busy(&self, busy: bool) {
        log::debug!("busy: {}", busy);
    }

    fn status(&self, message: &str) {
        println!("{}", message);
    }
}

/// Viewer used when `--open` is not requested.
struct SilentViewer;

impl Viewer for SilentViewer {
    fn open(&self, _path: &std::path::Path) -> Result<(), LaunchError> {
        Ok(())
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
