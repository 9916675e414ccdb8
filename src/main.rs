// Entry point and CLI flow.
//
// With a subcommand the binary answers one question and exits. Without one
// it runs the interactive selector loop: region, then year, then
// sub-region, each chosen from the options the previous step produced.
use clap::{Parser, Subcommand};
use crime_dashboard::config::{Config, DEFAULT_CHART_LIMIT, DEFAULT_DATA_PATH};
use crime_dashboard::pipeline::{self, Outcome, Selector};
use crime_dashboard::{filter, loader, output, Table};
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crime_dashboard", about = "Regional crime statistics dashboard")]
struct Cli {
    /// Path to the crime statistics CSV
    #[arg(long, env = "CRIME_DASHBOARD_DATA", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    /// Top-category share above which a concentration alert fires
    #[arg(long, default_value_t = 0.30)]
    concentration_threshold: f64,
    /// Year-over-year change (percent) treated as a major rise or decline
    #[arg(long, default_value_t = 10.0)]
    change_threshold: f64,
    /// Number of categories shown in the distribution table
    #[arg(long, default_value_t = DEFAULT_CHART_LIMIT)]
    chart_limit: usize,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all regions
    Regions,
    /// List years, optionally only those with data for a region
    Years {
        #[arg(long)]
        region: Option<String>,
    },
    /// List sub-regions with data for a region and year
    Subregions { region: String, year: i32 },
    /// Print the dashboard report for one selection
    Report {
        region: String,
        year: i32,
        subregion: String,
        /// Also write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Also write the ranked category distribution as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config {
            data_path: self.data.clone(),
            chart_limit: self.chart_limit,
            ..Config::default()
        };
        config.thresholds.concentration_ratio = self.concentration_threshold;
        config.thresholds.major_change_pct = self.change_threshold;
        config
    }
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.config();
    let table = loader::load(&config.data_path, &config.columns)?;
    println!(
        "Loaded {} rows across {} categories from {}\n",
        crime_dashboard::util::format_int(table.len()),
        table.categories.len(),
        config.data_path.display()
    );

    match cli.command {
        None => interactive(&table, &config),
        Some(Commands::Regions) => {
            for region in filter::list_regions(&table) {
                println!("{}", region);
            }
            Ok(())
        }
        Some(Commands::Years { region }) => {
            for year in filter::list_years(&table, region.as_deref()) {
                println!("{}", year);
            }
            Ok(())
        }
        Some(Commands::Subregions { region, year }) => {
            let rows = filter::by_region_year(&table, &region, year);
            for subregion in filter::list_subregions(&rows) {
                println!("{}", subregion);
            }
            Ok(())
        }
        Some(Commands::Report {
            region,
            year,
            subregion,
            json,
            csv,
        }) => {
            let selector = Selector::new(region, year, subregion);
            match pipeline::run(&table, &selector, &config.thresholds) {
                Outcome::NoData(sel) => output::print_no_data(&sel),
                Outcome::Report(report) => {
                    output::print_report(&report, config.chart_limit);
                    if let Some(path) = json {
                        output::write_report_json(&path, &report)?;
                        println!("(Full report exported to {})", path.display());
                    }
                    if let Some(path) = csv {
                        output::write_distribution_csv(&path, &report)?;
                        println!("(Distribution exported to {})", path.display());
                    }
                }
            }
            Ok(())
        }
    }
}

/// Interactive selection loop. Options at every step come from the data,
/// so only genuine gaps lead to the no-data state.
fn interactive(table: &Table, config: &Config) -> Result<(), Box<dyn Error>> {
    loop {
        let regions = filter::list_regions(table);
        let Some(region) = pick("Select Region", &regions)? else {
            println!("Exiting the program.");
            return Ok(());
        };

        let years = filter::list_years(table, Some(region.as_str()));
        let Some(year) = pick("Select Year", &years)? else {
            continue;
        };

        let rows = filter::by_region_year(table, &region, year);
        let subregions = filter::list_subregions(&rows);
        let Some(subregion) = pick("Select Sub-region", &subregions)? else {
            continue;
        };

        println!();
        let selector = Selector::new(region, year, subregion);
        match pipeline::run(table, &selector, &config.thresholds) {
            Outcome::NoData(sel) => output::print_no_data(&sel),
            Outcome::Report(report) => output::print_report(&report, config.chart_limit),
        }

        if !prompt_back_to_menu()? {
            println!("Exiting the program.");
            return Ok(());
        }
    }
}

/// Show a numbered list and read a choice. `Ok(None)` when the user enters
/// `0` (back/exit) or the list is empty.
fn pick<T: Clone + std::fmt::Display>(title: &str, options: &[T]) -> io::Result<Option<T>> {
    if options.is_empty() {
        println!("{}: no options available.\n", title);
        return Ok(None);
    }
    println!("{}:", title);
    for (idx, opt) in options.iter().enumerate() {
        println!("[{}] {}", idx + 1, opt);
    }
    println!("[0] Back\n");
    loop {
        let choice = read_choice()?;
        match choice.parse::<usize>() {
            Ok(0) => return Ok(None),
            Ok(n) if n <= options.len() => {
                println!();
                return Ok(Some(options[n - 1].clone()));
            }
            _ => println!("Invalid choice. Please enter 0-{}.", options.len()),
        }
    }
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> io::Result<String> {
    print!("Enter choice: ");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        // EOF behaves like "back".
        return Ok("0".to_string());
    }
    Ok(buf.trim().to_string())
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> io::Result<bool> {
    loop {
        print!("Back to Selection (Y/N): ");
        io::stdout().flush()?;
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf)? == 0 {
            return Ok(false);
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}
