//! CLI definition and dispatch.
//!
//! Each command loads the journal, applies one action, saves if the action
//! mutated it, and prints its result to stdout. `import` replaces the journal
//! without reading the old file, so it also recovers an unreadable one.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_journal::{self, CsvJournalAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::breakdown::{monthly_breakdown, yearly_breakdown, BucketStats};
use crate::domain::config_validation::validate_journal_config;
use crate::domain::error::JournalError;
use crate::domain::journal_config::JournalConfig;
use crate::domain::ledger::Ledger;
use crate::domain::stats::Summary;
use crate::domain::trade::{BreakevenRule, Outcome, TradeCandidate};
use crate::domain::trade_date::{format_date, normalize_date};
use crate::ports::config_port::ConfigPort;
use crate::ports::journal_port::JournalPort;

#[derive(Parser, Debug)]
#[command(name = "tradelog", about = "Personal trading journal")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Journal CSV file (overrides [journal] file)
    #[arg(short, long, global = true)]
    pub journal: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a trade
    Add(TradeArgs),
    /// Replace the trade at INDEX
    Edit {
        index: usize,
        #[command(flatten)]
        trade: TradeArgs,
    },
    /// Delete the trade at INDEX
    Remove { index: usize },
    /// Print the journal
    List,
    /// Manage the starting capital
    Capital {
        #[command(subcommand)]
        action: CapitalAction,
    },
    /// Print summary statistics
    Stats,
    /// Per-month statistics for one year
    Monthly {
        #[arg(long)]
        year: i32,
    },
    /// Per-year statistics
    Yearly,
    /// Replace the journal with the content of a CSV file
    Import { file: PathBuf },
    /// Write the journal to a CSV file
    Export { file: PathBuf },
    /// Check the configuration file
    Validate,
}

#[derive(Subcommand, Debug)]
pub enum CapitalAction {
    /// Set the starting capital
    Set {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// Add to the starting capital
    Add {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// Reset the starting capital to zero
    Reset,
}

#[derive(Args, Debug, Clone)]
pub struct TradeArgs {
    /// YYYY-MM-DD, DD/MM/YYYY or DD-MM-YYYY
    #[arg(long)]
    pub date: String,
    /// Defaults to the first configured session label
    #[arg(long)]
    pub session: Option<String>,
    /// Defaults to [journal] default_instrument
    #[arg(long)]
    pub instrument: Option<String>,
    /// TP, SL, Breakeven or NoTrade
    #[arg(long)]
    pub outcome: Outcome,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub stake: f64,
    /// Defaults to [journal] default_risk_pct
    #[arg(long, allow_negative_numbers = true)]
    pub risk: Option<f64>,
    /// Defaults to [journal] default_reward_pct
    #[arg(long, allow_negative_numbers = true)]
    pub reward: Option<f64>,
    #[arg(long, default_value = "")]
    pub setup: String,
    #[arg(long, default_value = "")]
    pub observation: String,
}

pub fn run(cli: Cli, config: &JournalConfig) -> ExitCode {
    match execute(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Resolve the effective configuration: the `--config` file (if any),
/// validated, with `--journal` taking precedence over `[journal] file`.
pub fn load_settings(cli: &Cli) -> Result<JournalConfig, JournalError> {
    let adapter = match &cli.config {
        Some(path) => load_config(path)?,
        None => FileConfigAdapter::empty(),
    };
    validate_journal_config(&adapter)?;

    let mut config = build_journal_config(&adapter)?;
    if let Some(journal) = &cli.journal {
        config.journal_file = journal.clone();
    }
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, JournalError> {
    FileConfigAdapter::from_file(path).map_err(|e| JournalError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_journal_config(adapter: &dyn ConfigPort) -> Result<JournalConfig, JournalError> {
    let defaults = JournalConfig::default();

    let breakeven_rule = match adapter.get_string("journal", "breakeven_rule") {
        Some(s) => BreakevenRule::parse(&s).ok_or_else(|| JournalError::ConfigInvalid {
            section: "journal".into(),
            key: "breakeven_rule".into(),
            reason: format!("unknown rule '{}'", s),
        })?,
        None => defaults.breakeven_rule,
    };

    Ok(JournalConfig {
        journal_file: adapter
            .get_string("journal", "file")
            .map(PathBuf::from)
            .unwrap_or(defaults.journal_file),
        breakeven_rule,
        default_risk_pct: adapter.get_double("journal", "default_risk_pct", defaults.default_risk_pct),
        default_reward_pct: adapter.get_double(
            "journal",
            "default_reward_pct",
            defaults.default_reward_pct,
        ),
        default_instrument: adapter
            .get_string("journal", "default_instrument")
            .unwrap_or(defaults.default_instrument),
        session_labels: adapter.get_list("sessions", "labels"),
        log_level: adapter
            .get_string("logging", "level")
            .unwrap_or(defaults.log_level),
    })
}

pub fn execute(command: Command, config: &JournalConfig) -> Result<(), JournalError> {
    if let Command::Validate = command {
        println!("Configuration is valid");
        println!("  journal file:   {}", config.journal_file.display());
        println!("  breakeven rule: {:?}", config.breakeven_rule);
        if !config.session_labels.is_empty() {
            println!("  sessions:       {}", config.session_labels.join(", "));
        }
        return Ok(());
    }

    let store = CsvJournalAdapter::new(config.journal_file.clone());

    // The current file is never read on import.
    let mut ledger = match command {
        Command::Import { .. } => Ledger::with_breakeven_rule(config.breakeven_rule),
        _ => store.load(config.breakeven_rule)?,
    };

    match command {
        Command::Add(args) => {
            let candidate = build_candidate(&args, config)?;
            let index = ledger.add_trade(candidate)?;
            store.save(&ledger)?;
            if let Some(record) = ledger.get(index) {
                println!(
                    "Trade #{} added: {} {} profit {}",
                    index,
                    record.outcome,
                    record.instrument,
                    format_money(record.profit)
                );
            }
        }
        Command::Edit { index, trade } => {
            let candidate = build_candidate(&trade, config)?;
            ledger.edit_trade(index, candidate)?;
            store.save(&ledger)?;
            println!("Trade #{} updated", index);
        }
        Command::Remove { index } => {
            let removed = ledger.remove_trade(index)?;
            store.save(&ledger)?;
            println!(
                "Trade #{} removed ({} {} {})",
                index,
                format_date(removed.date),
                removed.instrument,
                removed.outcome
            );
        }
        Command::List => print!("{}", render_table(&ledger)),
        Command::Capital { action } => {
            match action {
                CapitalAction::Set { amount } => ledger.set_starting_capital(amount)?,
                CapitalAction::Add { amount } => ledger.add_to_capital(amount)?,
                CapitalAction::Reset => ledger.reset_capital(),
            }
            store.save(&ledger)?;
            println!("Starting capital: {:.2}", ledger.starting_capital());
        }
        Command::Stats => print!("{}", render_summary(&Summary::compute(&ledger))),
        Command::Monthly { year } => {
            print!("{}", render_buckets(&monthly_breakdown(&ledger, year)))
        }
        Command::Yearly => print!("{}", render_buckets(&yearly_breakdown(&ledger))),
        Command::Export { file } => {
            fs::write(&file, csv_journal::export_bytes(&ledger)?)?;
            println!("Exported {} trades to {}", ledger.len(), file.display());
        }
        Command::Import { file } => {
            let bytes = fs::read(&file)?;
            let result = csv_journal::import_rows(&mut ledger, &bytes)?;
            store.save(&ledger)?;
            info!(source = %file.display(), "journal replaced from import");
            println!(
                "Imported {} trades ({} rows skipped, {} normalized), starting capital {:.2}",
                result.accepted,
                result.skipped,
                result.normalized,
                ledger.starting_capital()
            );
        }
        Command::Validate => {}
    }
    Ok(())
}

/// Turn command-line trade arguments into a ledger candidate, applying
/// configured defaults.
pub fn build_candidate(
    args: &TradeArgs,
    config: &JournalConfig,
) -> Result<TradeCandidate, JournalError> {
    let date = normalize_date(&args.date).ok_or_else(|| JournalError::InvalidInput {
        field: "date".into(),
        reason: format!(
            "'{}' is not a date (expected YYYY-MM-DD, DD/MM/YYYY or DD-MM-YYYY)",
            args.date
        ),
    })?;

    let session = match &args.session {
        Some(s) => s.clone(),
        None => config.session_labels.first().cloned().unwrap_or_default(),
    };
    config.check_session(&session)?;

    let instrument = args
        .instrument
        .clone()
        .unwrap_or_else(|| config.default_instrument.clone());

    Ok(TradeCandidate {
        date: Some(date),
        session,
        instrument,
        outcome: args.outcome,
        stake: args.stake,
        risk_pct: args.risk.unwrap_or(config.default_risk_pct),
        reward_pct: args.reward.unwrap_or(config.default_reward_pct),
        setup: args.setup.clone(),
        observation: args.observation.clone(),
    })
}

fn format_money(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn format_multiple(value: Option<f64>) -> String {
    value.map(|v| format!("{}", v)).unwrap_or_else(|| "-".to_string())
}

fn table_row(cells: [&str; 10]) -> String {
    let [index, date, session, instrument, outcome, stake, risk, reward, profit, notes] = cells;
    format!(
        "{:>3}  {:<10}  {:<12}  {:<10}  {:<9}  {:>10}  {:>5}  {:>6}  {:>10}  {}",
        index, date, session, instrument, outcome, stake, risk, reward, profit, notes
    )
}

pub fn render_table(ledger: &Ledger) -> String {
    let mut lines = Vec::new();
    if ledger.is_empty() {
        lines.push("No trades recorded".to_string());
    } else {
        lines.push(table_row([
            "#", "Date", "Session", "Instrument", "Outcome", "Stake", "Risk", "Reward", "Profit",
            "Notes",
        ]));
        for (i, r) in ledger.records().iter().enumerate() {
            let date = match r.date {
                Some(_) => format_date(r.date),
                None => "?".to_string(),
            };
            let notes = [r.setup.as_str(), r.observation.as_str()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" / ");
            lines.push(table_row([
                &i.to_string(),
                &date,
                &r.session,
                &r.instrument,
                r.outcome.label(),
                &format_money(r.stake),
                &format_multiple(r.risk_pct),
                &format_multiple(r.reward_pct),
                &format_money(r.profit),
                &notes,
            ]));
        }
    }
    lines.push(format!("Starting capital: {:.2}", ledger.starting_capital()));
    lines.join("\n") + "\n"
}

pub fn render_summary(summary: &Summary) -> String {
    let mut lines = vec!["=== Statistics ===".to_string()];
    for (outcome, count) in summary.counts.iter() {
        lines.push(format!("{:<18}{}", format!("{}:", outcome_name(outcome)), count));
    }
    lines.extend([
        format!("Total Reward:     {:.2}", summary.total_reward),
        format!("Total Risk:       {:.2}", summary.total_risk),
        format!("Win Rate:         {:.2}%", summary.win_rate),
        format!("Total Profit:     {:.2}", summary.total_profit),
        format!("Starting Capital: {:.2}", summary.starting_capital),
        format!("Capital Total:    {:.2}", summary.capital_total),
    ]);
    lines.join("\n") + "\n"
}

pub fn render_buckets(buckets: &[BucketStats]) -> String {
    if buckets.is_empty() {
        return "No dated trades in range\n".to_string();
    }
    let mut lines = vec![format!(
        "{:<8}  {:>4}  {:>4}  {:>4}  {:>4}  {:>9}  {:>10}",
        "Period", "TP", "SL", "BE", "NT", "Win Rate", "Profit"
    )];
    lines.extend(buckets.iter().map(|b| {
        format!(
            "{:<8}  {:>4}  {:>4}  {:>4}  {:>4}  {:>8.2}%  {:>10.2}",
            b.period.to_string(),
            b.counts.take_profit,
            b.counts.stop_loss,
            b.counts.breakeven,
            b.counts.no_trade,
            b.win_rate,
            b.profit
        )
    }));
    lines.join("\n") + "\n"
}

fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::TakeProfit => "Take Profit",
        Outcome::StopLoss => "Stop Loss",
        Outcome::Breakeven => "Breakeven",
        Outcome::NoTrade => "No Trade",
    }
}
