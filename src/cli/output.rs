use chrono::Datelike;
use serde::Serialize;

use crate::model::calendar::{CalendarCell, GRID_COLUMNS, MonthRef};
use crate::model::config::DisplayConfig;
use crate::model::task::{Task, TaskFilter};
use crate::util::date::date_to_string;
use crate::util::unicode::{center, fit_to_width};

/// Narrowest calendar column that still fits a bracketed day number
const MIN_CELL_WIDTH: usize = 4;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: i64,
    pub text: String,
    pub date: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub filter: TaskFilter,
    pub reference_date: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct CalendarJson {
    pub year: i32,
    /// 1-based
    pub month: u32,
    pub title: String,
    pub cells: Vec<CalendarCellJson>,
}

#[derive(Serialize)]
pub struct CalendarCellJson {
    pub date: String,
    pub in_current_month: bool,
    pub is_today: bool,
    pub tasks: Vec<TaskJson>,
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id,
        text: task.text.clone(),
        date: date_to_string(task.date),
        completed: task.completed,
        created_at: task.created_at.map(|t| t.to_rfc3339()),
    }
}

pub fn calendar_to_json(month: MonthRef, cells: &[CalendarCell<'_>]) -> CalendarJson {
    CalendarJson {
        year: month.year,
        month: month.month_number(),
        title: month.to_string(),
        cells: cells
            .iter()
            .map(|c| CalendarCellJson {
                date: date_to_string(c.date),
                in_current_month: c.in_current_month,
                is_today: c.is_today,
                tasks: c.tasks.iter().map(|t| task_to_json(t)).collect(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One list line: `[x] <id>  <date>  <text>`
pub fn format_task_line(task: &Task) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    format!(
        "[{}] {}  {}  {}",
        check,
        task.id,
        date_to_string(task.date),
        single_line(&task.text)
    )
}

/// Task text with control characters blanked so it stays on one line
fn single_line(text: &str) -> String {
    text.replace(char::is_control, " ")
}

/// Footer line with per-filter counts
pub fn format_counts(counts: &[(TaskFilter, usize)]) -> String {
    counts
        .iter()
        .map(|(f, n)| format!("{} {}", f, n))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Draw the month grid as a bordered text table.
///
/// Today is shown as `[d]`, days of adjacent months as `(d)`, completed
/// tasks with an `x` marker.
pub fn render_calendar(
    month: MonthRef,
    cells: &[CalendarCell<'_>],
    display: &DisplayConfig,
) -> String {
    let width = display.cell_width.max(MIN_CELL_WIDTH);
    let rule = format!("+{}\n", format!("{}+", "-".repeat(width)).repeat(GRID_COLUMNS));
    let total_width = GRID_COLUMNS * (width + 1) + 1;

    let mut out = String::new();
    out.push_str(center(&month.to_string(), total_width).trim_end());
    out.push('\n');
    out.push_str(&rule);
    out.push('|');
    for day in WEEKDAYS {
        out.push_str(&center(day, width));
        out.push('|');
    }
    out.push('\n');
    out.push_str(&rule);

    for week in cells.chunks(GRID_COLUMNS) {
        let columns: Vec<Vec<String>> = week
            .iter()
            .map(|cell| cell_lines(cell, display.max_tasks_per_cell))
            .collect();
        let height = columns.iter().map(Vec::len).max().unwrap_or(1);
        for line in 0..height {
            out.push('|');
            for column in &columns {
                let text = column.get(line).map(String::as_str).unwrap_or("");
                out.push_str(&fit_to_width(text, width));
                out.push('|');
            }
            out.push('\n');
        }
        out.push_str(&rule);
    }
    out
}

fn cell_lines(cell: &CalendarCell<'_>, max_tasks: usize) -> Vec<String> {
    let day = cell.date.day();
    let label = if cell.is_today {
        format!("[{}]", day)
    } else if !cell.in_current_month {
        format!("({})", day)
    } else {
        format!(" {}", day)
    };

    let mut lines = vec![label];
    for task in cell.tasks.iter().take(max_tasks) {
        let marker = if task.completed { 'x' } else { '-' };
        lines.push(format!("{} {}", marker, single_line(&task.text)));
    }
    let hidden = cell.tasks.len().saturating_sub(max_tasks);
    if hidden > 0 {
        lines.push(format!("+{} more", hidden));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::calendar::month_grid;
    use crate::util::unicode::display_width;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn task(id: i64, text: &str, date: &str, completed: bool) -> Task {
        Task {
            id,
            text: text.into(),
            date: date.parse().unwrap(),
            completed,
            created_at: None,
        }
    }

    #[test]
    fn task_line_marks_completion() {
        assert_eq!(
            format_task_line(&task(17, "buy milk", "2024-02-01", true)),
            "[x] 17  2024-02-01  buy milk"
        );
        assert_eq!(
            format_task_line(&task(18, "call mom", "2024-02-03", false)),
            "[ ] 18  2024-02-03  call mom"
        );
    }

    #[test]
    fn counts_footer() {
        let counts = [(TaskFilter::All, 3), (TaskFilter::Today, 1)];
        assert_eq!(format_counts(&counts), "all 3  today 1");
    }

    #[test]
    fn calendar_lines_have_uniform_width() {
        let tasks = vec![
            task(1, "장보기 그리고 청소", "2024-02-14", false),
            task(2, "done thing", "2024-02-14", true),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let cells = month_grid(&tasks, 2024, 1, today).unwrap();
        let display = DisplayConfig::default();
        let text = render_calendar(MonthRef { year: 2024, month: 1 }, &cells, &display);

        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap().trim(), "February 2024");
        let expected = 7 * (display.cell_width + 1) + 1;
        for line in lines {
            assert_eq!(display_width(line), expected, "line: {:?}", line);
        }
        assert!(text.contains("[14]"));
        assert!(text.contains("(28)"));
        assert!(text.contains("x done thing"));
    }

    #[test]
    fn multi_line_text_keeps_grid_aligned() {
        let tasks = vec![task(1, "line one\nline two\ttab", "2024-02-14", false)];
        let today = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let cells = month_grid(&tasks, 2024, 1, today).unwrap();
        let display = DisplayConfig::default();
        let text = render_calendar(MonthRef { year: 2024, month: 1 }, &cells, &display);

        let expected = 7 * (display.cell_width + 1) + 1;
        for line in text.lines().skip(1) {
            assert_eq!(display_width(line), expected, "line: {:?}", line);
        }
        assert!(text.contains("- line one"));
    }

    #[test]
    fn task_line_flattens_newlines() {
        let line = format_task_line(&task(3, "first\r\nsecond", "2024-02-01", false));
        assert_eq!(line, "[ ] 3  2024-02-01  first  second");
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn calendar_collapses_overflow() {
        let tasks: Vec<Task> = (1..=5)
            .map(|i| task(i, &format!("t{}", i), "2024-02-05", false))
            .collect();
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let cells = month_grid(&tasks, 2024, 1, today).unwrap();
        let display = DisplayConfig {
            cell_width: 10,
            max_tasks_per_cell: 2,
        };
        let text = render_calendar(MonthRef { year: 2024, month: 1 }, &cells, &display);
        assert!(text.contains("- t2"));
        assert!(!text.contains("- t3"));
        assert!(text.contains("+3 more"));
    }

    #[test]
    fn calendar_json_uses_one_based_month() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let cells = month_grid(&[], 2024, 1, today).unwrap();
        let json = calendar_to_json(MonthRef { year: 2024, month: 1 }, &cells);
        assert_eq!(json.month, 2);
        assert_eq!(json.cells.len(), 42);
        assert_eq!(json.cells[0].date, "2024-01-28");
    }
}
