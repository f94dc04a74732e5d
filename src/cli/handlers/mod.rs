use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::blob_store::FileStore;
use crate::io::config_io;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::logging::init_logging;
use crate::model::calendar::MonthRef;
use crate::model::config::Config;
use crate::model::task::TaskFilter;
use crate::ops::filter::filter_counts;
use crate::ops::task_ops::{TaskError, TaskStore, ValidationError};
use crate::util::date::{SystemClock, date_to_string, parse_date};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Data directory used when `-C` is not given
const DEFAULT_DATA_DIR: &str = ".daybook";

/// Everything a command needs: the loaded store plus view settings.
struct Session {
    data_dir: PathBuf,
    config: Config,
    store: TaskStore<FileStore>,
    /// The date treated as today for filters and highlighting
    reference: NaiveDate,
    json: bool,
}

impl Session {
    fn ui_state(&self) -> UiState {
        read_ui_state(&self.data_dir).unwrap_or_default()
    }

    /// Persist view state. Failure only costs the remembered view.
    fn save_ui_state(&self, state: &UiState) {
        if let Err(e) = write_ui_state(&self.data_dir, state) {
            warn!("could not save view state: {}", e);
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let data_dir = PathBuf::from(cli.dir.as_deref().unwrap_or(DEFAULT_DATA_DIR));
    let config = config_io::read_config(&data_dir)?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log.level.as_str()
    };
    // Held until dispatch returns so buffered records get flushed
    let _logger = match init_logging(level) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: could not start logging: {}", e);
            None
        }
    };

    let mut session = open_session(&data_dir, config, cli.today.as_deref(), cli.json)?;

    match cli.command {
        Commands::Add(args) => cmd_add(&mut session, args),
        Commands::List(args) => cmd_list(&mut session, args),
        Commands::Done(args) => cmd_done(&mut session, args),
        Commands::Edit(args) => cmd_edit(&mut session, args),
        Commands::Rm(args) => cmd_rm(&mut session, args),
        Commands::Cal(args) => cmd_cal(&mut session, args),
    }
}

fn open_session(
    data_dir: &Path,
    config: Config,
    today_override: Option<&str>,
    json: bool,
) -> Result<Session, Box<dyn std::error::Error>> {
    let zone = config_io::reference_zone(&config)?;
    let store = TaskStore::load(
        FileStore::new(data_dir),
        config.storage.key.clone(),
        zone,
        Box::new(SystemClock),
    );
    let reference = match today_override {
        Some(s) => parse_date(s)?,
        None => store.today(),
    };
    debug!(
        "session: dir={} tasks={} today={}",
        data_dir.display(),
        store.len(),
        reference
    );
    Ok(Session {
        data_dir: data_dir.to_path_buf(),
        config,
        store,
        reference,
        json,
    })
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(session: &mut Session, args: AddArgs) -> CmdResult {
    let date = args
        .date
        .unwrap_or_else(|| date_to_string(session.reference));
    let task = session.store.add(&args.text, &date)?;
    if session.json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&task))?);
    } else {
        println!("{}", task.id);
    }
    Ok(())
}

fn cmd_done(session: &mut Session, args: DoneArgs) -> CmdResult {
    // A stale id is not worth an error
    let Some(task) = session.store.toggle_complete(args.id)? else {
        debug!("toggle: no task {}", args.id);
        return Ok(());
    };
    if session.json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&task))?);
    } else {
        println!("{}", format_task_line(&task));
    }
    Ok(())
}

fn cmd_edit(session: &mut Session, args: EditArgs) -> CmdResult {
    // Bad input is reported before a missing id, as in TaskStore::edit
    if args.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ValidationError::EmptyText.into());
    }
    if let Some(date) = &args.date {
        parse_date(date).map_err(ValidationError::from)?;
    }

    let existing = session
        .store
        .get(args.id)
        .ok_or(TaskError::NotFound(args.id))?;
    let text = args.text.unwrap_or_else(|| existing.text.clone());
    let date = args.date.unwrap_or_else(|| date_to_string(existing.date));

    let task = session.store.edit(args.id, &text, &date)?;
    if session.json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&task))?);
    } else {
        println!("{}", format_task_line(&task));
    }
    Ok(())
}

fn cmd_rm(session: &mut Session, args: RmArgs) -> CmdResult {
    let Some(task) = session.store.get(args.id) else {
        debug!("rm: no task {}", args.id);
        return Ok(());
    };

    if !args.yes {
        eprint!("Delete \"{}\"? [y/N] ", task.text);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("cancelled");
            return Ok(());
        }
    }

    session.store.delete(args.id)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(session: &mut Session, args: ListArgs) -> CmdResult {
    let mut state = session.ui_state();
    let filter = match args.filter.as_deref() {
        Some(s) => s.parse::<TaskFilter>()?,
        None => state.filter.unwrap_or_default(),
    };

    let tasks = session.store.list_filtered(filter, session.reference);
    if session.json {
        let out = TaskListJson {
            filter,
            reference_date: date_to_string(session.reference),
            tasks: tasks.iter().map(|t| task_to_json(t)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        if tasks.is_empty() {
            println!("No tasks.");
        }
        for task in &tasks {
            println!("{}", format_task_line(task));
        }
        let counts = filter_counts(session.store.tasks(), session.reference);
        println!();
        println!("{}", format_counts(&counts));
    }

    if state.filter != Some(filter) {
        state.filter = Some(filter);
        session.save_ui_state(&state);
    }
    Ok(())
}

fn cmd_cal(session: &mut Session, args: CalArgs) -> CmdResult {
    let mut state = session.ui_state();
    let base = match args.month.as_deref() {
        Some(s) => parse_month(s)?,
        None => state
            .calendar
            .unwrap_or_else(|| MonthRef::of(session.reference)),
    };
    let delta = if args.next {
        1
    } else if args.prev {
        -1
    } else {
        args.shift.unwrap_or(0)
    };
    let month = base.shift(delta);

    let cells = session
        .store
        .calendar_grid(month.year, month.month, session.reference)?;
    if session.json {
        let out = calendar_to_json(month, &cells);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_calendar(month, &cells, &session.config.display));
    }

    if state.calendar != Some(month) {
        state.calendar = Some(month);
        session.save_ui_state(&state);
    }
    Ok(())
}

/// Parse `YYYY-MM` into a month reference
fn parse_month(s: &str) -> Result<MonthRef, String> {
    let err = || format!("invalid month '{}' (expected YYYY-MM)", s);
    let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
    let year: i32 = year.parse().map_err(|_| err())?;
    let month: u32 = month.parse().map_err(|_| err())?;
    if !(1..=12).contains(&month) {
        return Err(err());
    }
    Ok(MonthRef {
        year,
        month: month - 1,
    })
}
