//! Command handlers

use std::path::{Path, PathBuf};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use thiserror::Error;

use crate::cli::{Cli, Commands, IncidentAction};
use crate::output::{
    output_batch, output_classification, output_notifications, output_registration,
    output_report, output_reports,
};
use intake_app::app::{
    notification_since, relay_payload, IntakeRequest, IntakeService, IntakeServiceError,
};
use intake_app::config::Config;
use intake_app::export::{export_to_json, BatchResults};
use intake_app::repository::open_incident_repo;
use intake_app::scanner::{is_bundle_file, scan_directory, validate_bundle};
use intake_domain::{classify, extract_registration_info};
use intake_infra::persistence::FileIncidentRepository;
use intake_types::{Error, OutputFormat};
use intake_vision::load_bundle;

/// Failure of a CLI command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Core(#[from] Error),

    #[error(transparent)]
    Intake(#[from] IntakeServiceError),
}

pub type Result<T> = std::result::Result<T, CommandError>;

pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);
    debug!("Loaded config, output format {}", output_format);

    match cli.command {
        Commands::Classify { bundle, hint } => {
            let hint = hint.or_else(|| config.default_hint.clone());
            cmd_classify(&bundle, hint.as_deref(), output_format)
        }

        Commands::Registration { source } => cmd_registration(&source, output_format),

        Commands::Intake {
            bundle,
            registration,
            lat,
            lon,
            hint,
            relay,
        } => {
            let coordinates = lat.zip(lon);
            cmd_intake(
                &config,
                &bundle,
                registration.as_deref(),
                coordinates,
                hint,
                relay,
                output_format,
            )
        }

        Commands::Batch {
            folder,
            output,
            hint,
        } => {
            let hint = hint.or_else(|| config.default_hint.clone());
            cmd_batch(&folder, output, hint.as_deref(), output_format)
        }

        Commands::Incidents { action } => cmd_incidents(&config, action, output_format),

        Commands::Config {
            show,
            set_output,
            set_store_dir,
            set_hint,
            set_window,
            reset,
        } => cmd_config(show, set_output, set_store_dir, set_hint, set_window, reset),
    }
}

fn cmd_classify(bundle_path: &Path, hint: Option<&str>, format: OutputFormat) -> Result<()> {
    validate_bundle(bundle_path)?;
    let bundle = load_bundle(bundle_path)?;
    let classification = classify(&bundle, hint);
    output_classification(format, &classification)?;
    Ok(())
}

/// Card text from an OCR text file, or the text lines of a bundle/response JSON
fn read_card_text(path: &Path) -> Result<String> {
    validate_bundle(path)?;
    if is_bundle_file(path) {
        let bundle = load_bundle(path)?;
        Ok(bundle.text_lines.join("\n"))
    } else {
        let text = std::fs::read_to_string(path).map_err(Error::from)?;
        Ok(text)
    }
}

fn cmd_registration(source: &Path, format: OutputFormat) -> Result<()> {
    let text = read_card_text(source)?;
    let info = extract_registration_info(&text);
    output_registration(format, &info)?;
    Ok(())
}

fn open_service(config: &Config) -> Result<IntakeService<FileIncidentRepository>> {
    let repo = open_incident_repo(config)?;
    Ok(IntakeService::new(repo).with_default_hint(config.default_hint.clone()))
}

fn cmd_intake(
    config: &Config,
    bundle_path: &Path,
    registration: Option<&Path>,
    coordinates: Option<(f64, f64)>,
    hint: Option<String>,
    relay: bool,
    format: OutputFormat,
) -> Result<()> {
    validate_bundle(bundle_path)?;
    let mut request = IntakeRequest::new(load_bundle(bundle_path)?);
    if let Some(hint) = hint {
        request = request.with_hint(hint);
    }
    if let Some(path) = registration {
        request = request.with_registration_text(read_card_text(path)?);
    }
    if let Some((latitude, longitude)) = coordinates {
        request = request.with_coordinates(latitude, longitude);
    }

    let service = open_service(config)?;
    let report = service.process(request)?;

    if relay {
        let payload = relay_payload(&report);
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(Error::from)?
        );
    } else {
        output_report(format, &report)?;
    }
    Ok(())
}

fn cmd_batch(
    folder: &Path,
    output: Option<PathBuf>,
    hint: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let bundles = scan_directory(folder)?;
    if bundles.is_empty() {
        println!("No bundle files found in {}", folder.display());
        return Ok(());
    }
    info!("Classifying {} bundle(s)", bundles.len());

    let pb = ProgressBar::new(bundles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut results = BatchResults::new(Utc::now());
    for path in &bundles {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        pb.set_message(name);

        match load_bundle(path) {
            Ok(bundle) => results.push_classified(path, classify(&bundle, hint)),
            Err(e) => {
                pb.println(format!("Failed: {}: {}", path.display(), e));
                results.push_failed(path, e.to_string());
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");
    results.finish();

    if let Some(output_path) = output {
        export_to_json(&results, &output_path)?;
        println!("Results written to {}", output_path.display());
    }

    output_batch(format, &results)?;
    Ok(())
}

fn cmd_incidents(config: &Config, action: IncidentAction, format: OutputFormat) -> Result<()> {
    let service = open_service(config)?;

    match action {
        IncidentAction::List => output_reports(format, &service.list()?)?,
        IncidentAction::Show { id } => output_report(format, &service.get(&id)?)?,
        IncidentAction::Status { id, status } => {
            let report = service.update_status(&id, status)?;
            println!("Incident {} updated to status: {}", report.id, report.status);
        }
        IncidentAction::Notifications { minutes } => {
            let window = minutes.unwrap_or(config.notification_window_minutes);
            output_notifications(format, &service.notifications(window)?)?;
        }
        IncidentAction::Receive { payload } => {
            if !payload.exists() {
                return Err(Error::FileNotFound(payload.display().to_string()).into());
            }
            let content = std::fs::read_to_string(&payload).map_err(Error::from)?;
            let value: serde_json::Value = serde_json::from_str(&content).map_err(Error::from)?;
            let report = service.receive(&value)?;
            debug!("Stored received payload as {}", report.id);
            println!("Incident {} stored with status: {}", report.id, report.status);
        }
    }
    Ok(())
}

fn cmd_config(
    show: bool,
    set_output: Option<OutputFormat>,
    set_store_dir: Option<PathBuf>,
    set_hint: Option<String>,
    set_window: Option<i64>,
    reset: bool,
) -> Result<()> {
    if let Some(window) = set_window {
        notification_since(window)?;
    }

    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(store_dir) = set_store_dir {
        config.store_dir = Some(store_dir);
        modified = true;
    }

    if let Some(hint) = set_hint {
        config.default_hint = Some(hint).filter(|h| !h.trim().is_empty());
        modified = true;
    }

    if let Some(window) = set_window {
        config.notification_window_minutes = window.max(0);
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
