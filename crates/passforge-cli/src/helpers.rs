//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization, environment variable utilities and
//! record formatting.

use chrono::Local;
use passforge_vault::CredentialRecord;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// `RUST_LOG` wins over `default_level` when set. Logs go to stderr so they
/// never mix with passwords printed on stdout.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Read an environment variable, treating empty values as unset.
pub fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Fixed-width stand-in for a hidden secret; does not leak its length.
const MASK: &str = "********";

/// Local creation time as `YYYY-MM-DD HH:MM:SS`.
pub fn format_created(record: &CredentialRecord) -> String {
    record
        .created_at_utc()
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| record.created_at.to_string())
}

/// One aligned table row.
pub fn format_row(record: &CredentialRecord, show_secret: bool, name_width: usize) -> String {
    let secret = if show_secret {
        record.secret.as_str()
    } else {
        MASK
    };
    format!(
        "  {:>5}  {:<name_width$}  {}  {}",
        record.id,
        record.account_name,
        format_created(record),
        secret,
    )
}

/// Print the whole list as a table, newest first.
pub fn print_table(records: &[CredentialRecord], show_secrets: bool) {
    if records.is_empty() {
        println!("  No saved passwords.");
        return;
    }

    let name_width = records
        .iter()
        .map(|r| r.account_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("ACCOUNT".len());

    println!(
        "  {:>5}  {:<name_width$}  {:<19}  SECRET",
        "ID", "ACCOUNT", "CREATED"
    );
    for record in records {
        println!("{}", format_row(record, show_secrets, name_width));
    }
}

/// Copies of `records` with secrets masked unless `show_secrets`.
pub fn redacted(records: &[CredentialRecord], show_secrets: bool) -> Vec<CredentialRecord> {
    records
        .iter()
        .cloned()
        .map(|mut r| {
            if !show_secrets {
                r.secret = MASK.to_string();
            }
            r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CredentialRecord {
        CredentialRecord {
            id: 3,
            account_name: "GitHub".into(),
            secret: "Abc12345".into(),
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn row_masks_secret_by_default() {
        let row = format_row(&record(), false, 10);
        assert!(row.contains("GitHub"));
        assert!(row.contains(MASK));
        assert!(!row.contains("Abc12345"));
    }

    #[test]
    fn row_shows_secret_on_request() {
        assert!(format_row(&record(), true, 10).contains("Abc12345"));
    }

    #[test]
    fn redacted_keeps_everything_but_secret() {
        let out = redacted(&[record()], false);
        assert_eq!(out[0].id, 3);
        assert_eq!(out[0].account_name, "GitHub");
        assert_eq!(out[0].secret, MASK);

        let out = redacted(&[record()], true);
        assert_eq!(out[0].secret, "Abc12345");
    }

    #[test]
    fn created_is_human_readable() {
        let text = format_created(&record());
        assert_eq!(text.len(), "2023-11-14 22:13:20".len());
    }
}
