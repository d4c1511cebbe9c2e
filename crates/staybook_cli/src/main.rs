//! Command-line driver for Staybook core operations.
//!
//! # Responsibility
//! - Open the configured database and wire SQLite repositories into services.
//! - Read booking input as JSON, print representations as pretty JSON.
//!
//! # Exit codes
//! - `0` success, `1` runtime failure, `2` input rejected by validation.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use staybook_core::repo::booking_repo::SqliteBookingRepository;
use staybook_core::repo::listing_repo::{ListingRepository, SqliteListingRepository};
use staybook_core::repo::review_repo::SqliteReviewRepository;
use staybook_core::repo::user_repo::SqliteUserRepository;
use staybook_core::serializer::booking::BookingInput;
use staybook_core::service::pricing::total_price;
use staybook_core::{
    open_db_with_config, BookingService, ConfigError, DbError, ListingService, RepoError,
    ServiceError, Stay, StaybookConfig, SystemClock, ValidationError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

/// Staybook - vacation rental listing and booking core.
#[derive(Parser, Debug)]
#[command(name = "staybook", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check core linkage.
    Ping,
    /// Price a stay without booking it.
    Quote {
        #[arg(long)]
        listing_id: Uuid,
        #[arg(long)]
        check_in: NaiveDate,
        #[arg(long)]
        check_out: NaiveDate,
    },
    /// Create a booking from JSON input (`-` reads stdin).
    Book {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Print one listing with host and reviews.
    ShowListing { id: Uuid },
    /// Print one booking with nested listing and guest.
    ShowBooking { id: Uuid },
}

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Db(DbError),
    Input(String),
    Logging(String),
    Output(String),
    Service(ServiceError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config error: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Input(message) => write!(f, "invalid input: {message}"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Output(message) => write!(f, "cannot render output: {message}"),
            Self::Service(ServiceError::Validation(err)) => match err.field() {
                Some(field) => write!(f, "{field}: {err}"),
                None => write!(f, "{err}"),
            },
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Service(value.into())
    }
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Service(value.into())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("staybook: {err}");
            match err {
                CliError::Service(ServiceError::Validation(_)) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => StaybookConfig::load(path)?,
        None => StaybookConfig::default(),
    };
    staybook_core::init_logging_from_config(&config.logging).map_err(CliError::Logging)?;

    if let Commands::Ping = cli.command {
        println!("staybook_core ping={}", staybook_core::ping());
        println!("staybook_core version={}", staybook_core::core_version());
        return Ok(());
    }

    let conn = open_db_with_config(&config.database)?;
    let listings = SqliteListingRepository::new(&conn);
    let bookings = SqliteBookingRepository::new(&conn);
    let users = SqliteUserRepository::new(&conn);
    let reviews = SqliteReviewRepository::new(&conn);

    match cli.command {
        Commands::Ping => Ok(()),
        Commands::Quote {
            listing_id,
            check_in,
            check_out,
        } => {
            let listing = listings
                .get_listing(listing_id)?
                .ok_or(ValidationError::InvalidListing(listing_id))?;
            let stay = Stay::new(check_in, check_out)?;
            print_json(&serde_json::json!({
                "listing_id": listing.id,
                "nights": stay.nights(),
                "price_per_night": listing.price_per_night,
                "total_price": total_price(listing.price_per_night, &stay)?,
            }))
        }
        Commands::Book { input } => {
            let input = read_booking_input(&input)?;
            let service = BookingService::new(listings, bookings, users, reviews, SystemClock);
            print_json(&service.create(&input)?)
        }
        Commands::ShowListing { id } => {
            let service = ListingService::new(listings, users, reviews);
            print_json(&service.get(id)?)
        }
        Commands::ShowBooking { id } => {
            let service = BookingService::new(listings, bookings, users, reviews, SystemClock);
            print_json(&service.get(id)?)
        }
    }
}

fn read_booking_input(path: &Path) -> Result<BookingInput, CliError> {
    let text = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| CliError::Input(err.to_string()))?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .map_err(|err| CliError::Input(format!("{}: {err}", path.display())))?
    };
    serde_json::from_str(&text).map_err(|err| CliError::Input(err.to_string()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let text =
        serde_json::to_string_pretty(value).map_err(|err| CliError::Output(err.to_string()))?;
    println!("{text}");
    Ok(())
}
