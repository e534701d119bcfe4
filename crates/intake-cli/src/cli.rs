//! CLI definition using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use intake_types::{IncidentStatus, OutputFormat};

#[derive(Parser)]
#[command(name = "incident-intake")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Vehicle incident triage from image annotations and registration cards")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify one annotation bundle
    Classify {
        /// Bundle JSON or annotation service response
        bundle: PathBuf,

        /// Context hint forcing a category (e.g., "battery", "choque")
        #[arg(long)]
        hint: Option<String>,
    },

    /// Extract registration card fields
    Registration {
        /// OCR text file, or a bundle/response JSON whose text is used
        source: PathBuf,
    },

    /// Classify, extract and store a full incident report
    Intake {
        /// Bundle JSON or annotation service response for the incident photo
        bundle: PathBuf,

        /// Registration card OCR text, or bundle/response JSON
        #[arg(long, short = 'r')]
        registration: Option<PathBuf>,

        /// Latitude of the incident
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the incident
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Context hint forcing a category
        #[arg(long)]
        hint: Option<String>,

        /// Print the relay payload sent downstream instead of the report
        #[arg(long)]
        relay: bool,
    },

    /// Batch classify bundles in a folder
    Batch {
        /// Folder scanned recursively for *.json bundles
        folder: PathBuf,

        /// Output file for results
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Context hint applied to every bundle
        #[arg(long)]
        hint: Option<String>,
    },

    /// Inspect and update stored incidents
    Incidents {
        #[command(subcommand)]
        action: IncidentAction,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set incident store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default context hint ("" clears it)
        #[arg(long)]
        set_hint: Option<String>,

        /// Set notification window in minutes
        #[arg(long)]
        set_window: Option<i64>,

        /// Reset to default configuration
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum IncidentAction {
    /// List stored incidents
    List,

    /// Show one incident
    Show {
        /// Incident id
        id: String,
    },

    /// Update the status of an incident
    Status {
        /// Incident id
        id: String,

        /// New status (pending, received, processing, approved, rejected, completed)
        status: IncidentStatus,
    },

    /// Recent status-change notifications
    Notifications {
        /// Look-back window. Uses config value if not specified.
        #[arg(long, short = 'm')]
        minutes: Option<i64>,
    },

    /// Store a relayed payload with status "received"
    Receive {
        /// Relay payload JSON file
        payload: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intake_with_coordinates() {
        let cli = Cli::try_parse_from([
            "incident-intake",
            "intake",
            "scene.json",
            "--lat",
            "14.52",
            "--lon",
            "-90.60",
            "-f",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Intake { lat, lon, relay, .. } => {
                assert_eq!(lat, Some(14.52));
                assert_eq!(lon, Some(-90.60));
                assert!(!relay);
            }
            _ => panic!("expected intake command"),
        }
    }

    #[test]
    fn test_lat_requires_lon() {
        let result = Cli::try_parse_from(["incident-intake", "intake", "scene.json", "--lat", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_status_update() {
        let cli =
            Cli::try_parse_from(["incident-intake", "incidents", "status", "abc", "Approved"])
                .unwrap();
        match cli.command {
            Commands::Incidents {
                action: IncidentAction::Status { id, status },
            } => {
                assert_eq!(id, "abc");
                assert_eq!(status, IncidentStatus::Approved);
            }
            _ => panic!("expected incidents status"),
        }

        let bad = Cli::try_parse_from(["incident-intake", "incidents", "status", "abc", "lost"]);
        assert!(bad.is_err());
    }
}
