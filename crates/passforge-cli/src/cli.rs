//! CLI argument definitions for PassForge.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use passforge_vault::{CharClass, CharClasses};

/// PassForge -- local password generator and store.
#[derive(Parser)]
#[command(
    name = "passforge",
    version,
    about = "PassForge -- local password generator and store",
    long_about = "Generates random passwords from selectable character classes and keeps \
                  named password records in a local SQLite database."
)]
pub struct Cli {
    /// Credential database path. Overrides the config file and PASSFORGE_DB.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a freshly generated password.
    Generate(GenerateArgs),

    /// Save a password for an account. Generates one when SECRET is omitted.
    Save {
        /// Account label, e.g. "GitHub".
        account: String,

        /// Password to store. Leave out to generate one.
        secret: Option<String>,

        #[command(flatten)]
        generate: GenerateArgs,
    },

    /// List saved passwords, newest first.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,

        /// Print secrets in clear text.
        #[arg(long, short = 's')]
        show_secrets: bool,
    },

    /// Show one saved password.
    Show {
        /// Record id, as printed by `list`.
        id: i64,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved password.
    Delete {
        /// Record id, as printed by `list`.
        id: i64,
    },

    /// Interactive shell: generate, save and delete while the saved list is
    /// reprinted after every change.
    Shell {
        /// Print secrets in clear text.
        #[arg(long, short = 's')]
        show_secrets: bool,
    },
}

/// Length and character-class options shared by `generate` and `save`.
///
/// Anything not given on the command line falls back to the `[generator]`
/// section of the configuration.
#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Password length (clamped to 8..=32).
    #[arg(long, short)]
    pub length: Option<usize>,

    /// Include lowercase letters.
    #[arg(long, conflicts_with = "no_lowercase")]
    pub lowercase: bool,
    /// Exclude lowercase letters.
    #[arg(long)]
    pub no_lowercase: bool,

    /// Include uppercase letters.
    #[arg(long, conflicts_with = "no_uppercase")]
    pub uppercase: bool,
    /// Exclude uppercase letters.
    #[arg(long)]
    pub no_uppercase: bool,

    /// Include digits.
    #[arg(long, conflicts_with = "no_digits")]
    pub digits: bool,
    /// Exclude digits.
    #[arg(long)]
    pub no_digits: bool,

    /// Include special characters (!@#$%^&*()-_=+).
    #[arg(long, conflicts_with = "no_special")]
    pub special: bool,
    /// Exclude special characters.
    #[arg(long)]
    pub no_special: bool,
}

impl GenerateArgs {
    /// Resolve the enabled classes against configured defaults.
    pub fn classes(&self, defaults: CharClasses) -> CharClasses {
        let toggles = [
            (CharClass::Lowercase, self.lowercase, self.no_lowercase),
            (CharClass::Uppercase, self.uppercase, self.no_uppercase),
            (CharClass::Digit, self.digits, self.no_digits),
            (CharClass::Special, self.special, self.no_special),
        ];

        let mut classes = defaults;
        for (class, on, off) in toggles {
            if on {
                classes.set(class, true);
            } else if off {
                classes.set(class, false);
            }
        }
        classes
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["passforge", "generate", "--no-special", "--no-digits", "-l", "20"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.length, Some(20));

        let classes = args.classes(CharClasses::default());
        assert_eq!(classes, CharClasses::from_flags(true, true, false, false));

        let cli = Cli::parse_from(["passforge", "generate", "--special"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.classes(CharClasses::none()), CharClasses::none().with(CharClass::Special));
    }

    #[test]
    fn untouched_flags_keep_defaults() {
        let args = GenerateArgs::default();
        assert_eq!(args.classes(CharClasses::all()), CharClasses::all());
        assert_eq!(args.classes(CharClasses::none()), CharClasses::none());
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        let result = Cli::try_parse_from(["passforge", "generate", "--digits", "--no-digits"]);
        assert!(result.is_err());
    }

    #[test]
    fn save_accepts_optional_secret_and_global_db() {
        let cli = Cli::parse_from(["passforge", "save", "GitHub", "--db", "/tmp/x.db"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        match cli.command {
            Commands::Save {
                account, secret, ..
            } => {
                assert_eq!(account, "GitHub");
                assert!(secret.is_none());
            }
            _ => panic!("expected save"),
        }
    }
}
