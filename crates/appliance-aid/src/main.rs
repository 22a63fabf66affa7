//! `applaid` - CLI for appliance-aid
//!
//! This binary provides the command-line interface for diagnosing home
//! appliance problems and finding local repair technicians.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use clap::Parser;

use appliance_aid::catalog::{self, Appliance};
use appliance_aid::cli::{
    Cli, Command, ConfigCommand, DiagnoseCommand, HistoryCommand, TechniciansCommand,
};
use appliance_aid::config::Coordinates;
use appliance_aid::gemini::GeminiClient;
use appliance_aid::history::{History, HistoryEntry};
use appliance_aid::render::render_markdown;
use appliance_aid::report::{IssueReport, Photo};
use appliance_aid::session::{Session, Step, NO_TECHNICIANS_MESSAGE};
use appliance_aid::technician::{self, SortOrder, Technician};
use appliance_aid::{init_logging, Config, Error};

/// Shown when the diagnosis request fails.
const DIAGNOSIS_FAILED_MESSAGE: &str = "Failed to get diagnosis. Please try again.";

/// Shown when the technician search fails.
const SEARCH_FAILED_MESSAGE: &str =
    "Failed to find nearby technicians. The service might be unavailable in your area.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Diagnose(cmd) => handle_diagnose(&config, cmd).await,
        Command::Appliances => {
            handle_appliances();
            Ok(())
        }
        Command::Technicians(cmd) => handle_technicians(&config, cmd).await,
        Command::History(cmd) => handle_history(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_diagnose(
    config: &Config,
    cmd: DiagnoseCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = GeminiClient::from_config(&config.api)?;
    let mut session = Session::new();

    let appliance = match cmd.appliance.as_deref() {
        Some(query) => catalog::find(query).ok_or_else(|| Error::unknown_appliance(query))?,
        None => prompt_appliance()?,
    };
    session.select_appliance(appliance)?;

    let description = match cmd.description {
        Some(text) => text,
        None => prompt_description(appliance)?,
    };

    let photo = match &cmd.photo {
        Some(path) => Some(Photo::load(path)?),
        None => prompt_photo()?,
    };

    let report = IssueReport::new(appliance, description, photo)?;
    session.begin_diagnosis(report.description.clone())?;

    println!();
    println!("Diagnosing your {}...", appliance.name.to_lowercase());
    let diagnosis = match client.diagnose(&report).await {
        Ok(text) => text,
        Err(e) => {
            session.diagnosis_failed(DIAGNOSIS_FAILED_MESSAGE)?;
            eprintln!("{DIAGNOSIS_FAILED_MESSAGE}");
            return Err(e.into());
        }
    };
    session.diagnosis_ready(diagnosis.clone())?;

    println!();
    println!("{}", render_markdown(&diagnosis));

    if config.history.enabled && !cmd.no_save {
        if let Err(e) = save_to_history(config, appliance, &report.description, &diagnosis) {
            eprintln!("Warning: could not save to history: {e}");
        }
    }

    let wants_search =
        cmd.find_technicians || confirm("Find a local technician for this repair? [y/N] ")?;
    if !wants_search {
        return Ok(());
    }

    let location = match resolve_location(config, cmd.lat, cmd.lng) {
        Ok(coordinates) => coordinates,
        Err(_) => prompt_location()?,
    };

    session.begin_search()?;
    println!();
    println!(
        "Searching for {} technicians nearby...",
        appliance.name.to_lowercase()
    );

    match client.find_technicians(appliance.name, location).await {
        Ok(technicians) => session.technicians_found(technicians)?,
        Err(e) => {
            session.search_failed(SEARCH_FAILED_MESSAGE)?;
            eprintln!("{SEARCH_FAILED_MESSAGE}");
            return Err(e.into());
        }
    }

    if session.step() == Step::ShowTechnicians {
        println!();
        browse_technicians(&mut session)?;
    } else if let Some(message) = session.last_error() {
        // The search succeeded but came back empty
        println!("{message}");
    }

    Ok(())
}

fn handle_appliances() {
    println!("Supported appliances:");
    println!();
    for appliance in catalog::APPLIANCES {
        println!("  {:<14} {}", appliance.id, appliance.name);
    }
}

async fn handle_technicians(
    config: &Config,
    cmd: TechniciansCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let appliance = catalog::find(&cmd.appliance)
        .ok_or_else(|| Error::unknown_appliance(&cmd.appliance))?;
    let location = resolve_location(config, cmd.lat, cmd.lng)?;
    let client = GeminiClient::from_config(&config.api)?;

    let technicians = client.find_technicians(appliance.name, location).await?;
    if technicians.is_empty() {
        if cmd.json {
            println!("[]");
        }
        return Err(NO_TECHNICIANS_MESSAGE.into());
    }

    let filter = cmd.filter.unwrap_or_default();
    let visible = technician::visible(&technicians, &filter, SortOrder::from(cmd.sort));

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
    } else if visible.is_empty() {
        println!("No technicians match \"{filter}\".");
    } else {
        print_technicians(&visible);
    }
    Ok(())
}

fn handle_history(config: &Config, cmd: &HistoryCommand) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::open(config.history_path())?;

    match cmd {
        HistoryCommand::List { limit } => {
            let entries = history.recent(*limit)?;
            if entries.is_empty() {
                println!("No diagnoses stored yet.");
            } else {
                print_history_table(&entries);
                println!();
                println!("{} of {} entries shown.", entries.len(), history.count()?);
            }
        }
        HistoryCommand::Show { id } => match history.get(*id)? {
            Some(entry) => print_history_entry(&entry),
            None => println!("No entry with id {id}."),
        },
        HistoryCommand::Search { query, limit } => {
            let entries = history.search(query, *limit)?;
            if entries.is_empty() {
                println!("No stored diagnoses match \"{query}\".");
            } else {
                print_history_table(&entries);
            }
        }
        HistoryCommand::Delete { id } => {
            if history.delete(*id)? {
                println!("Deleted entry {id}.");
            } else {
                println!("No entry with id {id}.");
            }
        }
        HistoryCommand::Clear { yes } => {
            if *yes {
                let removed = history.clear()?;
                println!("Deleted {removed} entries.");
            } else {
                println!("This will delete all stored diagnoses.");
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Api]");
                println!(
                    "  Key:         {}",
                    if config.api.key.is_some() {
                        "set"
                    } else {
                        "unset"
                    }
                );
                println!("  Model:       {}", config.api.model);
                println!("  Endpoint:    {}", config.api.endpoint);
                println!("  Timeout (s): {}", config.api.timeout);
                println!();
                println!("[Location]");
                match config.location.coordinates() {
                    Some(coordinates) => {
                        println!("  Latitude:    {}", coordinates.latitude);
                        println!("  Longitude:   {}", coordinates.longitude);
                    }
                    None => println!("  Not configured"),
                }
                println!();
                println!("[History]");
                println!("  Enabled:     {}", config.history.enabled);
                println!("  Database:    {}", config.history_path().display());
                println!("  Keep:        {}", config.history.keep);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn save_to_history(
    config: &Config,
    appliance: Appliance,
    description: &str,
    diagnosis: &str,
) -> appliance_aid::Result<()> {
    let history = History::open(config.history_path())?;
    let entry = HistoryEntry::new(appliance, description, diagnosis);

    match history.insert(&entry)? {
        Some(id) => println!("Saved to history as entry {id}."),
        None => println!("Already in history, not saved again."),
    }

    if config.history.keep > 0 {
        history.prune_keep_recent(config.history.keep)?;
    }
    Ok(())
}

fn resolve_location(
    config: &Config,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<Coordinates, Error> {
    match (lat, lng) {
        (Some(latitude), Some(longitude)) => Ok(Coordinates::new(latitude, longitude)),
        (None, None) => config
            .location
            .coordinates()
            .ok_or(Error::LocationMissing),
        _ => Err(Error::LocationMissing),
    }
}

fn browse_technicians(session: &mut Session) -> io::Result<()> {
    loop {
        print_technicians(&session.visible_technicians());
        println!();

        let input =
            prompt_line("Refine: filter <text>, sort name, sort relevance, clear, or done: ")?;
        let input = input.trim();

        if input.is_empty() || input.eq_ignore_ascii_case("done") {
            return Ok(());
        }
        if let Some(query) = input.strip_prefix("filter ") {
            session.set_filter(query.trim());
        } else if input.eq_ignore_ascii_case("sort name") {
            session.set_sort(SortOrder::Name);
        } else if input.eq_ignore_ascii_case("sort relevance") {
            session.set_sort(SortOrder::Relevance);
        } else if input.eq_ignore_ascii_case("clear") {
            session.set_filter("");
        } else {
            println!("Unrecognized command: {input}");
        }
        println!();
    }
}

fn print_technicians(technicians: &[&Technician]) {
    if technicians.is_empty() {
        println!("No technicians match the current filter.");
        return;
    }

    println!("Technicians near you:");
    println!();
    for (i, technician) in technicians.iter().enumerate() {
        println!("{}. {}", i + 1, technician.name);
        println!("   {}", technician.address);
        if let Some(phone) = &technician.phone {
            println!("   {phone}");
        }
        println!("   {}", technician.maps_link());
    }
}

fn print_history_table(entries: &[HistoryEntry]) {
    for entry in entries {
        println!(
            "{:>4}  {}  {:<16} {}",
            entry.id.unwrap_or_default(),
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.appliance_name,
            truncate(&entry.description.replace('\n', " "), 48),
        );
    }
}

fn print_history_entry(entry: &HistoryEntry) {
    println!("Entry {}", entry.id.unwrap_or_default());
    println!("Date:       {} UTC", entry.timestamp.format("%Y-%m-%d %H:%M"));
    println!("Appliance:  {}", entry.appliance_name);
    println!("Issue:      {}", entry.description);
    println!();
    println!("{}", render_markdown(&entry.diagnosis));
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

fn prompt_appliance() -> io::Result<Appliance> {
    println!("Which appliance is having trouble?");
    println!();
    for (i, appliance) in catalog::APPLIANCES.iter().enumerate() {
        println!("  {}. {}", i + 1, appliance.name);
    }
    println!();

    loop {
        let input = prompt_line("Enter a number or name: ")?;
        let input = input.trim();

        if let Ok(index) = input.parse::<usize>() {
            if (1..=catalog::APPLIANCES.len()).contains(&index) {
                return Ok(catalog::APPLIANCES[index - 1]);
            }
        }
        if let Some(appliance) = catalog::find(input) {
            return Ok(appliance);
        }
        println!("No appliance matches \"{input}\". Try again.");
    }
}

fn prompt_description(appliance: Appliance) -> io::Result<String> {
    println!();
    println!(
        "Describe the issue with your {} (e.g., it's making a strange noise).",
        appliance.name.to_lowercase()
    );

    loop {
        let input = prompt_line("> ")?;
        let trimmed = input.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
        println!("Please enter a description.");
    }
}

fn prompt_photo() -> io::Result<Option<Photo>> {
    loop {
        let input = prompt_line("Photo of the problem (optional path, Enter to skip): ")?;
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match Photo::load(trimmed) {
            Ok(photo) => return Ok(Some(photo)),
            Err(e) => println!("Could not attach photo: {e}"),
        }
    }
}

fn prompt_location() -> io::Result<Coordinates> {
    println!("Your location is needed to search nearby.");

    loop {
        let lat_input = prompt_line("Latitude: ")?;
        let lng_input = prompt_line("Longitude: ")?;

        match (
            lat_input.trim().parse::<f64>(),
            lng_input.trim().parse::<f64>(),
        ) {
            (Ok(latitude), Ok(longitude))
                if (-90.0..=90.0).contains(&latitude)
                    && (-180.0..=180.0).contains(&longitude) =>
            {
                return Ok(Coordinates::new(latitude, longitude));
            }
            _ => println!("Coordinates must be numbers, like 37.77 and -122.41."),
        }
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    let input = prompt_line(prompt)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().read_line(&mut line)?;
    if bytes == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before the wizard finished",
        ));
    }
    Ok(line)
}
