use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "day", about = concat!("daybook v", env!("CARGO_PKG_VERSION"), " - dated tasks and a month calendar"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (default: ./.daybook)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Toggle a task between open and done
    Done(DoneArgs),
    /// Change a task's text or date
    Edit(EditArgs),
    /// Delete a task
    Rm(RmArgs),
    /// Show a month calendar
    Cal(CalArgs),
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task ID
    pub id: i64,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: i64,
    /// New text (default: unchanged)
    #[arg(long)]
    pub text: Option<String>,
    /// New date (default: unchanged)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID
    pub id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Filter: all, today, upcoming, completed (default: last used)
    #[arg(long, short)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct CalArgs {
    /// Month to show (YYYY-MM, default: last shown or current)
    #[arg(long)]
    pub month: Option<String>,
    /// One month after the last shown
    #[arg(long, conflicts_with_all = ["prev", "shift"])]
    pub next: bool,
    /// One month before the last shown
    #[arg(long, conflicts_with = "shift")]
    pub prev: bool,
    /// Move this many months from the last shown
    #[arg(long, allow_negative_numbers = true)]
    pub shift: Option<i32>,
}
