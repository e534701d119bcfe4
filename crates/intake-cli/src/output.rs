//! Output formatting module

use serde::Serialize;

use intake_app::export::BatchResults;
use intake_types::{
    IncidentClassification, IncidentReport, OutputFormat, RegistrationInfo, Result,
    StatusNotification,
};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_classification_body(c: &IncidentClassification) {
    println!("Incident type:   {}", c.incident_type);
    println!("Severity:        {}", c.severity);
    println!("Vehicle type:    {}", c.vehicle_type);
    println!("Confidence:      {:.2}%", c.confidence_percent);
    if c.damaged_parts.is_empty() {
        println!("Damaged parts:   -");
    } else {
        let parts: Vec<&str> = c.damaged_parts.iter().collect();
        println!("Damaged parts:   {}", parts.join(", "));
    }
    if let Some(ref error) = c.error {
        println!("Error:           {}", error);
    }
}

pub fn output_classification(format: OutputFormat, c: &IncidentClassification) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(c);
    }

    println!("\nClassification");
    println!("==============");
    print_classification_body(c);

    if !c.labels.is_empty() {
        println!("\nTop labels:");
        for label in &c.labels {
            println!("  {:<30} {:>6.2}", label.description, label.score);
        }
    }
    if !c.objects.is_empty() {
        println!("\nTop objects:");
        for object in &c.objects {
            println!("  {:<30} {:>6.2}", object.name, object.confidence);
        }
    }
    Ok(())
}

fn print_registration_body(info: &RegistrationInfo) {
    for (label, value) in info.fields() {
        println!("{:<16} {}", format!("{}:", label), value.unwrap_or("-"));
    }
}

pub fn output_registration(format: OutputFormat, info: &RegistrationInfo) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(info);
    }

    println!("\nRegistration Card");
    println!("=================");
    print_registration_body(info);
    Ok(())
}

pub fn output_report(format: OutputFormat, report: &IncidentReport) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(report);
    }

    println!("\nIncident {}", report.id);
    println!("=========={}", "=".repeat(report.id.len()));
    println!("Status:          {}", report.status);
    println!(
        "Reported:        {}",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(updated) = report.status_updated_at {
        println!("Status updated:  {}", updated.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    println!();
    print_classification_body(&report.incident);

    if let Some(ref vehicle) = report.vehicle {
        println!("\n--- Vehicle ---");
        print_registration_body(vehicle);
    }

    if let Some(ref location) = report.location {
        println!("\n--- Location ---");
        println!("Address:         {}", location.address);
        println!("City:            {}", location.city);
        println!("Country:         {}", location.country);
    }

    if !report.errors.is_empty() {
        println!("\nErrors:");
        for error in &report.errors {
            println!("  - {}", error);
        }
    }
    Ok(())
}

pub fn output_reports(format: OutputFormat, reports: &[IncidentReport]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(reports);
    }

    if reports.is_empty() {
        println!("No incidents stored");
        return Ok(());
    }

    println!(
        "{:<36}  {:<19}  {:<10}  {:<10}  {}",
        "ID", "Reported", "Status", "Plate", "Incident"
    );
    println!("{}", "-".repeat(110));
    for r in reports {
        let plate = r
            .vehicle
            .as_ref()
            .and_then(|v| v.plate.as_deref())
            .unwrap_or("-");
        println!(
            "{:<36}  {:<19}  {:<10}  {:<10}  {}",
            r.id,
            r.timestamp.format("%Y-%m-%d %H:%M:%S"),
            r.status,
            plate,
            r.incident.incident_type
        );
    }
    println!("\n{} incident(s)", reports.len());
    Ok(())
}

pub fn output_notifications(
    format: OutputFormat,
    notifications: &[StatusNotification],
) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(notifications);
    }

    if notifications.is_empty() {
        println!("No recent status changes");
        return Ok(());
    }
    for n in notifications {
        println!("[{}] {}", n.timestamp.format("%Y-%m-%d %H:%M:%S"), n.message);
    }
    Ok(())
}

pub fn output_batch(format: OutputFormat, results: &BatchResults) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(results);
    }

    println!("\nBatch Summary");
    println!("=============");
    println!("Processed:       {}", results.total_processed);
    println!("Successful:      {}", results.successful);
    println!("Failed:          {}", results.failed);
    let elapsed = results.completed_at - results.started_at;
    println!(
        "Elapsed:         {:.1}s",
        elapsed.num_milliseconds() as f64 / 1000.0
    );

    let counts = results.type_counts();
    if !counts.is_empty() {
        println!("\nBy incident type:");
        for (label, count) in counts {
            println!("  {:<45} {}", label, count);
        }
    }

    let failures: Vec<_> = results
        .entries
        .iter()
        .filter_map(|e| e.error.as_ref().map(|err| (&e.path, err)))
        .collect();
    if !failures.is_empty() {
        println!("\nFailed files:");
        for (path, err) in failures {
            println!("  {}: {}", path, err);
        }
    }
    Ok(())
}
