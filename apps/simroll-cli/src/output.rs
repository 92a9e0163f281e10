//! Human and JSON rendering of run reports.

use simroll_batch::{BatchAction, BatchReport, RosterEntry};
use simroll_provision::ProvisionReport;

/// Print a batch report, JSON or human-readable.
pub fn print_batch_report(report: &BatchReport, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
        return;
    }

    println!();
    if report.all_succeeded() {
        println!("✓ Batch complete!");
    } else {
        println!("⚠️  Batch completed with errors");
    }

    println!();
    println!("Summary:");
    match report.action {
        BatchAction::Create => println!("  Started: {}", report.success_count()),
        BatchAction::Delete => println!("  Stopped: {}", report.success_count()),
    }
    if report.failure_count() > 0 {
        println!("  Failed:  {}", report.failure_count());
    }
    if report.transport_count() > 0 {
        println!("  No response: {}", report.transport_count());
    }
    println!("  Duration: {}ms", report.duration_ms);

    if report.failure_count() > 0 {
        println!();
        println!("Failures:");
        for failure in &report.failed {
            println!(
                "  ✗ {} ({}): status {}",
                failure.entry.name, failure.entry.identifier, failure.status
            );
        }
    }
    if report.transport_count() > 0 {
        println!();
        println!("No response received:");
        for transport in &report.transport_failed {
            println!(
                "  ? {} ({}): {}",
                transport.entry.name, transport.entry.identifier, transport.error
            );
        }
    }
}

/// Print a provisioning report, JSON or human-readable.
pub fn print_provision_report(report: &ProvisionReport, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
        return;
    }

    println!();
    if report.rejected == 0 {
        println!("✓ Provisioning complete!");
    } else {
        println!("⚠️  Provisioning completed with rejections");
    }

    println!();
    println!("Summary:");
    println!("  Added:    {}", report.added);
    println!("  Rejected: {}", report.rejected);
    println!("  Last uid: {}", report.last_uid);

    if !report.errors.is_empty() {
        println!();
        println!("Rejections:");
        for error in &report.errors {
            println!("  ✗ {error}");
        }
    }
}

/// Print a roster, JSON or one member per line.
pub fn print_roster(roster: &[RosterEntry], json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(roster).unwrap_or_default()
        );
        return;
    }

    for entry in roster {
        println!("{} <{}>", entry.name, entry.identifier);
    }
    println!();
    println!("{} member(s)", roster.len());
}
