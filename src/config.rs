//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    bills::BillMultiset,
    denominations::Denomination,
    fixtures::{DEFAULT_BASE_PATH, Fixture, FixtureError},
    request::SplitRequest,
};

/// Trisect configuration
#[derive(Debug, Parser)]
#[command(
    name = "trisect",
    about = "Split a pile of bills into three stacks of equal value",
    long_about = None
)]
pub struct Config {
    /// What to do with the bills
    #[command(subcommand)]
    pub command: Command,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remove the target amount, then split the rest into three stacks
    Perfect(SplitArgs),

    /// List amounts whose removal leaves bills that split evenly
    Imperfect(SplitArgs),

    /// Check whether the bills split evenly after removing the target
    Check(SplitArgs),
}

impl Command {
    /// Arguments shared by every subcommand.
    pub fn args(&self) -> &SplitArgs {
        match self {
            Command::Perfect(args) | Command::Imperfect(args) | Command::Check(args) => args,
        }
    }
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Table,

    /// Pretty-printed JSON
    Json,
}

/// Bills and options for one run.
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Number of $5 bills
    #[arg(long, default_value_t = 0, conflicts_with = "fixture")]
    pub fives: u32,

    /// Number of $10 bills
    #[arg(long, default_value_t = 0, conflicts_with = "fixture")]
    pub tens: u32,

    /// Number of $20 bills
    #[arg(long, default_value_t = 0, conflicts_with = "fixture")]
    pub twenties: u32,

    /// Number of $50 bills
    #[arg(long, default_value_t = 0, conflicts_with = "fixture")]
    pub fifties: u32,

    /// Number of $100 bills
    #[arg(long, default_value_t = 0, conflicts_with = "fixture")]
    pub hundreds: u32,

    /// Load bills from a named fixture instead of the count flags
    #[arg(short, long)]
    pub fixture: Option<String>,

    /// Directory holding fixture sets
    #[arg(long, env = "TRISECT_FIXTURES", default_value = DEFAULT_BASE_PATH)]
    pub fixtures_dir: PathBuf,

    /// Amount to remove, in dollars
    #[arg(short, long)]
    pub target: Option<u64>,

    /// Denomination that may be removed; repeat to allow several (default: all)
    #[arg(short, long)]
    pub allow: Vec<Denomination>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl SplitArgs {
    /// Bills given by the count flags.
    pub fn bills(&self) -> BillMultiset {
        BillMultiset::new()
            .with(Denomination::Five, self.fives)
            .with(Denomination::Ten, self.tens)
            .with(Denomination::Twenty, self.twenties)
            .with(Denomination::Fifty, self.fifties)
            .with(Denomination::Hundred, self.hundreds)
    }

    /// Build the request, loading the fixture if one was named. A target or
    /// allow-list on the command line overrides the fixture's.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be loaded.
    pub fn request(&self) -> Result<SplitRequest, FixtureError> {
        let mut request = match &self.fixture {
            Some(name) => Fixture::with_base_path(&self.fixtures_dir)
                .load_bills(name)?
                .request(),
            None => SplitRequest::new(self.bills()),
        };

        if self.target.is_some() {
            request.target_amount = self.target;
        }

        if !self.allow.is_empty() {
            request.allowed_denominations = Some(
                self.allow
                    .iter()
                    .map(|denom| (denom.as_key().to_string(), true))
                    .collect(),
            );
        }

        Ok(request)
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "TRISECT_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::denominations::DenominationSet;

    use super::*;

    #[test]
    fn definition_is_valid() {
        Config::command().debug_assert();
    }

    #[test]
    fn parses_counts_and_options() -> TestResult {
        let config = Config::try_parse_from([
            "trisect",
            "imperfect",
            "--fives",
            "6",
            "--hundreds",
            "1",
            "--target",
            "15",
            "--allow",
            "5",
            "--allow",
            "$10",
            "--format",
            "json",
        ])?;

        let args = config.command.args();

        assert!(matches!(config.command, Command::Imperfect(_)));
        assert_eq!(args.format, OutputFormat::Json);

        let request = args.request()?;

        assert_eq!(request.total(), 130);
        assert_eq!(request.target_amount, Some(15));
        assert_eq!(
            request.allowed(),
            DenominationSet::new([Denomination::Five, Denomination::Ten])
        );

        Ok(())
    }

    #[test]
    fn defaults() -> TestResult {
        let config = Config::try_parse_from(["trisect", "perfect"])?;
        let request = config.command.args().request()?;

        assert!(request.bills.is_empty());
        assert_eq!(request.target_amount, None);
        assert_eq!(request.allowed(), DenominationSet::all());
        assert_eq!(config.command.args().format, OutputFormat::Table);

        Ok(())
    }

    #[test]
    fn rejects_unknown_denomination() {
        assert!(Config::try_parse_from(["trisect", "check", "--allow", "25"]).is_err());
    }

    #[test]
    fn fixture_conflicts_with_counts() {
        assert!(
            Config::try_parse_from(["trisect", "perfect", "--fixture", "a", "--fives", "3"])
                .is_err()
        );
    }

    #[test]
    fn command_line_target_overrides_fixture() -> TestResult {
        let dir = TempDir::new()?;
        let bills_dir = dir.path().join("bills");

        std::fs::create_dir_all(&bills_dir)?;
        std::fs::write(
            bills_dir.join("float.yml"),
            "bills:\n  \"20\": 3\ntarget_amount: 20\n",
        )?;

        let fixtures_dir = dir.path().to_string_lossy().to_string();

        let config = Config::try_parse_from([
            "trisect",
            "check",
            "--fixture",
            "float",
            "--fixtures-dir",
            fixtures_dir.as_str(),
            "--target",
            "40",
        ])?;

        let request = config.command.args().request()?;

        assert_eq!(request.total(), 60);
        assert_eq!(request.target_amount, Some(40));

        Ok(())
    }
}
