use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::task::Task;

/// Cells in a month grid: six weeks of seven days
pub const GRID_CELLS: usize = 42;
pub const GRID_COLUMNS: usize = 7;

/// One day-slot in a month grid, possibly outside the displayed month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell<'a> {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    /// Tasks dated on this day, in store order
    pub tasks: Vec<&'a Task>,
}

/// A displayed month. `month` is 0-based (`0` = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    /// The month containing `date`
    pub fn of(date: NaiveDate) -> MonthRef {
        MonthRef {
            year: date.year(),
            month: date.month0(),
        }
    }

    /// 1-based month number for display
    pub fn month_number(self) -> u32 {
        self.month + 1
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl std::fmt::Display for MonthRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = MONTH_NAMES.get(self.month as usize).copied().unwrap_or("?");
        write!(f, "{} {}", name, self.year)
    }
}
