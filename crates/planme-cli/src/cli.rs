use clap::{Args, Parser, Subcommand, ValueEnum};
use planme_core::weekdays::Weekday;
use std::path::PathBuf;

use crate::config::OutputFormat;
use crate::parser::parse_week_of_month;

/// Preview and plan occurrences of recurring tasks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json), overriding the configured one
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print upcoming occurrences of a recurrence rule
    Preview(PreviewCommand),
    /// Print the occurrences falling inside a time window
    Plan(PlanCommand),
    /// Print the single next occurrence of a recurrence rule
    Next(NextCommand),
    /// Convert between weekday lists and weekday bitmasks
    Weekdays(WeekdaysCommand),
}

/// How a rule repeats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceShortcut {
    /// Every N days
    Daily,
    /// Selected weekdays every N weeks (defaults to the start weekday)
    Weekly,
    /// A day of the month every N months (defaults to the start day)
    Monthly,
    /// The Nth weekday of the month every N months (defaults to the start's)
    MonthlyWeekday,
    /// The start date every N years
    Yearly,
    /// Monday to Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
}

impl std::fmt::Display for RecurrenceShortcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceShortcut::Daily => write!(f, "daily"),
            RecurrenceShortcut::Weekly => write!(f, "weekly"),
            RecurrenceShortcut::Monthly => write!(f, "monthly"),
            RecurrenceShortcut::MonthlyWeekday => write!(f, "monthly-weekday"),
            RecurrenceShortcut::Yearly => write!(f, "yearly"),
            RecurrenceShortcut::Weekdays => write!(f, "weekdays"),
            RecurrenceShortcut::Weekends => write!(f, "weekends"),
        }
    }
}

/// A recurrence rule, either read from a JSON file or built from flags.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleArgs {
    /// Read the rule from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with_all = ["every", "start", "interval", "on", "day_of_month", "week_of_month", "weekday", "until", "count", "once"])]
    pub rule: Option<PathBuf>,

    /// How the rule repeats
    #[arg(long, value_enum)]
    pub every: Option<RecurrenceShortcut>,

    /// First occurrence (e.g., '2025-01-06T09:00:00Z', 'tomorrow 9am'). Defaults to now
    #[arg(long)]
    pub start: Option<String>,

    /// Days, weeks, months or years between occurrences
    #[arg(long)]
    pub interval: Option<u32>,

    /// Days of week for weekly rules (mon,tue,wed,thu,fri,sat,sun, weekdays, weekends)
    #[arg(long)]
    pub on: Option<String>,

    /// Day of the month for monthly rules, clamped to shorter months
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub day_of_month: Option<u32>,

    /// Week of the month for monthly-weekday rules (1-5, or 'last' / -1)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_week_of_month)]
    pub week_of_month: Option<i8>,

    /// Weekday for monthly-weekday rules
    #[arg(long)]
    pub weekday: Option<Weekday>,

    /// Last date the rule may produce
    #[arg(long, group = "end")]
    pub until: Option<String>,

    /// Total number of occurrences the rule produces
    #[arg(long, group = "end")]
    pub count: Option<u32>,

    /// Occur only once, at the start
    #[arg(long, group = "end")]
    pub once: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    #[command(flatten)]
    pub rule: RuleArgs,

    /// List occurrences strictly after this instant. Defaults to the rule
    /// start, which is itself never listed: a --count N rule previews at most
    /// N-1 occurrences and a --once rule previews none
    #[arg(long)]
    pub from: Option<String>,

    /// Number of occurrences to print. Defaults to `preview_count`
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Occurrences already produced, counted against --count
    #[arg(long, default_value_t = 0)]
    pub already: u32,

    /// Print a JSON array instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanCommand {
    #[command(flatten)]
    pub rule: RuleArgs,

    /// Start of the window. Defaults to now
    #[arg(long)]
    pub from: Option<String>,

    /// Window length in days. Defaults to `horizon_days`
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Plan the follow-up of a completed occurrence: print at most one
    /// occurrence, and nothing while a --pending occurrence is still ahead
    #[arg(long)]
    pub after_completion: bool,

    /// Occurrences still pending (repeatable)
    #[arg(long, requires = "after_completion")]
    pub pending: Vec<String>,

    /// Print a JSON array instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct NextCommand {
    #[command(flatten)]
    pub rule: RuleArgs,

    /// Reference instant. Defaults to now
    #[arg(long)]
    pub from: Option<String>,

    /// Print a JSON array instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct WeekdaysCommand {
    #[command(subcommand)]
    pub command: WeekdaysSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum WeekdaysSubcommand {
    /// Encode a list of days as a bitmask (Monday = 1, Sunday = 64)
    Encode {
        /// Days such as 'mon,wed,fri' or 'weekdays'
        days: String,
    },
    /// Decode a bitmask into weekday names
    Decode {
        mask: u8,
    },
    /// Convert a Sunday-first day index (0 = Sunday .. 6 = Saturday)
    FromJs {
        #[arg(allow_hyphen_values = true)]
        day: i64,
    },
}
