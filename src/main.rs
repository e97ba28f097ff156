//! Academic Check-In CLI Entry Point
//!
//! Walks the check-in steps using a pre-filled answers file, stopping at
//! the first step whose requirements are not met.
//!
//! # Usage
//!
//! ```bash
//! # Check in using saved data plus the answers file
//! checkin answers.yaml
//!
//! # Preview the submission without sending it
//! checkin answers.yaml --dry-run
//!
//! # Ignore previously saved contacts
//! checkin answers.yaml --offline --dry-run
//!
//! # Use an explicit settings file
//! checkin answers.yaml --config /etc/portal/checkin.yaml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use colored::Colorize;
use log::{error, info, warn};

use checkin::config::Settings;
use checkin::services::{PortalClient, StaticAuth};
use checkin::workflow::hydrate::HydrateOutcome;
use checkin::workflow::load_answers;
use checkin::workflow::model::Race;
use checkin::workflow::FieldSnapshot;
use checkin::{CheckInSession, APP_NAME, VERSION};

/// Command-line configuration parsed from arguments.
#[derive(Debug, Default)]
struct CliConfig {
    answers_path: Option<String>,
    config_path: Option<PathBuf>,
    dry_run: bool,
    offline: bool,
    verbose: bool,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner with version information.
fn print_banner() {
    println!();
    println!("{} v{}", APP_NAME.bold(), VERSION);
    println!("Student Portal Academic Check-In");
    println!();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: checkin [OPTIONS] <ANSWERS_FILE>");
    println!();
    println!("Arguments:");
    println!("  <ANSWERS_FILE>      YAML file with check-in answers");
    println!();
    println!("Options:");
    println!("  --dry-run           Print the submission instead of sending it");
    println!("  --offline           Do not load previously saved data");
    println!("  --config PATH       Settings file (default: $CHECKIN_CONFIG or checkin.yaml)");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
    println!("  --version           Show version information");
    println!();
    println!("Environment:");
    println!("  CHECKIN_API_URL, CHECKIN_USERNAME, CHECKIN_TOKEN, CHECKIN_TIMEOUT_SECS");
}

/// Parses command-line arguments into a CliConfig struct.
fn parse_arguments(args: &[String]) -> Result<CliConfig, String> {
    let mut config = CliConfig::default();
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--dry-run" => config.dry_run = true,
            "--offline" => config.offline = true,
            "--verbose" | "-v" => config.verbose = true,
            "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("--config requires a path argument".to_string());
                }
                config.config_path = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                if config.answers_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                config.answers_path = Some(arg.clone());
            }
        }
        i += 1;
    }

    if config.answers_path.is_none() {
        return Err("An answers file is required".to_string());
    }

    Ok(config)
}

/// Prints what will be submitted, as on the confirm page.
fn print_summary(fields: &FieldSnapshot) {
    println!("{}", "Emergency contacts".underline());
    for contact in fields.contacts.iter().filter(|c| c.is_named()) {
        println!(
            "  {}. {} {} ({})",
            contact.seq_num,
            contact.first_name.trim(),
            contact.last_name.trim(),
            contact.relationship.trim()
        );
    }

    println!("{}", "Personal phone".underline());
    if fields.phone.no_phone {
        println!("  none");
    } else {
        let visibility = if fields.phone.make_public { "public" } else { "private" };
        println!("  {} ({})", fields.phone.number.trim(), visibility);
    }

    println!("{}", "Race and ethnicity".underline());
    let ethnicity = fields
        .demographic
        .ethnicity
        .map(|e| e.label())
        .unwrap_or("not provided");
    println!("  Ethnicity: {}", ethnicity);
    let races: Vec<&str> = Race::ALL
        .iter()
        .filter(|r| fields.demographic.race(**r))
        .map(|r| r.label())
        .collect();
    println!("  Race: {}", races.join(", "));
    println!();
}

/// Main application entry point.
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(config.verbose);
    print_banner();

    let settings = Settings::load(config.config_path.as_deref())?;
    info!("Portal API: {}", settings.api_base_url);

    let answers_path = config.answers_path.unwrap_or_default();
    let answers = load_answers(&answers_path)?;

    let client = Arc::new(PortalClient::new(&settings)?);
    let auth = Arc::new(StaticAuth::new(settings.username.clone()));
    let mut session = CheckInSession::with_portal(auth, client);

    if config.offline {
        session.skip_load();
    } else {
        match session.load().await? {
            HydrateOutcome::Found(patch) => {
                info!("Loaded {} saved contact(s)", patch.contacts.len())
            }
            HydrateOutcome::NotFound => info!("No saved check-in data"),
            HydrateOutcome::TransientError(reason) => {
                warn!("Saved data unavailable, starting fresh: {}", reason)
            }
        }
    }

    loop {
        let step = session.current_step();
        println!("{}", step.to_string().cyan().bold());

        if session.is_terminal() {
            break;
        }

        session.apply_answers(&answers)?;
        if !session.next() {
            for issue in session.issues() {
                println!("  {} {}", "✗".red(), issue);
            }
            return Err(format!("Cannot continue past '{}'", step.title()).into());
        }
        println!("  {}", "✓ complete".green());
    }

    println!();
    print_summary(&session.snapshot());

    if config.dry_run {
        info!("Mode: DRY RUN (submission will not be sent)");
        let payload = session.preview().await?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    match session.submit().await {
        Ok(receipt) => {
            println!(
                "{} Check-in submitted for {} at {}",
                "✓".green().bold(),
                receipt.username,
                receipt.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            Ok(())
        }
        Err(e) => {
            if let Some(notice) = session.failure_notice() {
                println!("{}", notice.red());
            }
            error!("Submission failed: {}", e);
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
