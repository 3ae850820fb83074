// Entry point and menu-driven console flow.
//
// - Option [1] loads and cleans the CSV, printing diagnostics.
// - Option [2] rebuilds the dashboard from the current session settings and
//   renders every section.
// - Options [3]-[5] adjust the amenity filters, the display count, and the
//   selected district.
// - Option [6] writes the CSV/JSON export artifacts.
mod error;
mod filter;
mod loader;
mod output;
mod reports;
mod types;
mod util;

use chrono::Local;
use clap::Parser;
use std::io::{self, Write};
use types::{AmenityKind, FacetSelection, GroupKey, RestArea};

const DEFAULT_DISPLAY_COUNT: usize = 10;

#[derive(Parser, Debug)]
#[command(
    name = "rest_area_dashboard",
    about = "Console dashboard over the California rest area dataset"
)]
struct Cli {
    /// CSV file holding the rest area records.
    #[arg(long, default_value = "Rest Area Data.csv")]
    data_file: String,
}

// Everything one run of the program remembers between menu choices. The
// dataset is loaded at most once; the remaining fields are the dashboard
// controls, re-applied on every view.
struct Session {
    data_file: String,
    dataset: Option<Vec<RestArea>>,
    selection: FacetSelection,
    display_count: usize,
    district: Option<u32>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// The prompt is reused for the main menu and the numeric sub-prompts.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after a dashboard render.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and clean the CSV file.
///
/// On success the cleaned rows are stored in the session and a short
/// summary of the cleaning pass is printed. The first district seen in the
/// data becomes the default district selection.
fn handle_load(session: &mut Session) {
    match loader::load_and_clean(&session.data_file) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows loaded, {} kept after cleaning)",
                util::format_int(report.total_rows),
                util::format_int(report.kept_rows)
            );
            println!(
                "Note: {} rows dropped due to missing or invalid fields.",
                util::format_int(report.dropped_rows)
            );
            println!();
            // Raw codes, including any the partition will not bucket.
            log::debug!(
                "direction codes: {:?}",
                reports::count_by(&data, GroupKey::Direction)
            );
            if session.district.is_none() {
                session.district = filter::districts(&data).first().copied();
            }
            session.dataset = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: run the pipeline once and render every section.
fn handle_view_dashboard(session: &Session) {
    let Some(data) = session.dataset.as_ref() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let district = session.district.unwrap_or(data[0].district);
    match reports::assemble_dashboard(data, &session.selection, session.display_count, district) {
        Ok(view) => print!("{}", output::render_dashboard(&view)),
        Err(e) => eprintln!("Failed to build dashboard: {}\n", e),
    }
}

/// Handle option [3]: toggle the eight amenity filters.
///
/// Every filter starts required; toggling one off removes its constraint
/// rather than excluding rows that have the amenity.
fn handle_toggle_filters(session: &mut Session) {
    loop {
        println!("Amenity Filters (on = rest area must have it):");
        for (i, kind) in AmenityKind::ALL.iter().enumerate() {
            let state = if session.selection.is_required(*kind) {
                "on"
            } else {
                "off"
            };
            println!("[{}] {} ({})", i + 1, kind.label(), state);
        }
        println!("[9] Require all");
        println!("[10] Clear all");
        println!("[0] Done\n");
        let choice = read_choice();
        match choice.as_str() {
            "0" => {
                println!();
                return;
            }
            "9" => {
                for kind in AmenityKind::ALL {
                    session.selection.set_required(kind, true);
                }
            }
            "10" => session.selection = FacetSelection::none(),
            _ => match choice.parse::<usize>() {
                Ok(n) if (1..=AmenityKind::ALL.len()).contains(&n) => {
                    session.selection.toggle(AmenityKind::ALL[n - 1]);
                }
                _ => println!("Invalid choice. Please enter 0-10.\n"),
            },
        }
    }
}

/// Handle option [4]: set how many rest areas the list section shows.
///
/// Any value of at least 1 is accepted here; the pipeline clamps it to the
/// filtered row count when the dashboard is built.
fn handle_display_count(session: &mut Session) {
    println!(
        "Number of rest areas to display (currently {}):",
        session.display_count
    );
    match read_choice().parse::<usize>() {
        Ok(n) if n >= 1 => {
            session.display_count = n;
            println!();
        }
        _ => println!("Invalid count. Please enter a number of at least 1.\n"),
    }
}

/// Handle option [5]: pick the district for the district table.
fn handle_select_district(session: &mut Session) {
    let Some(data) = session.dataset.as_ref() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let choices = filter::districts(data);
    let listing: Vec<String> = choices.iter().map(|d| d.to_string()).collect();
    println!("Districts in the data: {}", listing.join(", "));
    match read_choice().parse::<u32>() {
        Ok(d) if choices.contains(&d) => {
            session.district = Some(d);
            println!();
        }
        _ => println!("Invalid district. Please choose one of the listed values.\n"),
    }
}

/// Handle option [6]: write every export artifact for the current view.
fn handle_export(session: &Session) {
    let Some(data) = session.dataset.as_ref() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let district = session.district.unwrap_or(data[0].district);
    let view =
        match reports::assemble_dashboard(data, &session.selection, session.display_count, district)
        {
            Ok(view) => view,
            Err(e) => {
                eprintln!("Failed to build dashboard: {}\n", e);
                return;
            }
        };
    let summary = reports::generate_summary(data);
    match output::export_dashboard(data, &view, &summary) {
        Ok(files) => {
            for file in files {
                println!("Saved {}", file);
            }
            println!();
        }
        Err(e) => {
            eprintln!("Export error: {}\n", e);
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::info!(
        "starting rest area dashboard at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let mut session = Session {
        data_file: cli.data_file,
        dataset: None,
        selection: FacetSelection::default(),
        display_count: DEFAULT_DISPLAY_COUNT,
        district: None,
    };

    loop {
        println!("California Rest Area Dashboard:");
        println!("[1] Load the file");
        println!("[2] View the dashboard");
        println!("[3] Toggle amenity filters");
        println!("[4] Set display count");
        println!("[5] Select district");
        println!("[6] Export artifacts");
        println!("[0] Exit\n");
        match read_choice().as_str() {
            "1" => {
                handle_load(&mut session);
            }
            "2" => {
                println!();
                handle_view_dashboard(&session);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => handle_toggle_filters(&mut session),
            "4" => handle_display_count(&mut session),
            "5" => handle_select_district(&mut session),
            "6" => handle_export(&session),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 0-6.\n");
            }
        }
    }
}
