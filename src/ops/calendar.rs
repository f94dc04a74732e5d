use chrono::{Datelike, Days, NaiveDate};

use crate::model::calendar::{CalendarCell, GRID_CELLS, MonthRef};
use crate::model::task::Task;
use crate::ops::task_ops::TaskError;

/// Step `delta` months from `(year, month)`, where `month` is 0-based.
///
/// Any delta works: the month wraps modulo 12 and the year moves by one per
/// wrap. A `month` above 11 is normalized the same way. Stepping past the
/// ends of `i32` years saturates at December of `i32::MAX` or January of
/// `i32::MIN`.
pub fn navigate_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = i64::from(year) * 12 + i64::from(month) + i64::from(delta);
    match i32::try_from(total.div_euclid(12)) {
        Ok(new_year) => (new_year, total.rem_euclid(12) as u32),
        Err(_) if total < 0 => (i32::MIN, 0),
        Err(_) => (i32::MAX, 11),
    }
}

impl MonthRef {
    /// The month `delta` months away
    pub fn shift(self, delta: i32) -> MonthRef {
        let (year, month) = navigate_month(self.year, self.month, delta);
        MonthRef { year, month }
    }
}

/// Six full weeks covering `month` (0-based) of `year`, starting on the
/// Sunday on or before the 1st.
pub fn month_grid(
    tasks: &[Task],
    year: i32,
    month: u32,
    reference: NaiveDate,
) -> Result<Vec<CalendarCell<'_>>, TaskError> {
    let (year, month) = navigate_month(year, month, 0);
    let out_of_range = || TaskError::DateOutOfRange(format!("{:04}-{:02}", year, month + 1));

    let first = NaiveDate::from_ymd_opt(year, month + 1, 1).ok_or_else(out_of_range)?;
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first
        .checked_sub_days(Days::new(lead))
        .ok_or_else(out_of_range)?;

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for offset in 0..GRID_CELLS as u64 {
        let date = start
            .checked_add_days(Days::new(offset))
            .ok_or_else(out_of_range)?;
        cells.push(CalendarCell {
            date,
            in_current_month: date.year() == year && date.month0() == month,
            is_today: date == reference,
            tasks: tasks.iter().filter(|t| t.date == date).collect(),
        });
    }
    Ok(cells)
}
