use chrono::NaiveDate;

use crate::model::task::{Task, TaskFilter};

/// Tasks passing `filter`, ascending by date.
///
/// The sort is stable, so tasks sharing a date keep their insertion order.
pub fn filter_tasks(tasks: &[Task], filter: TaskFilter, reference: NaiveDate) -> Vec<&Task> {
    let mut out: Vec<&Task> = tasks
        .iter()
        .filter(|t| filter.matches(t, reference))
        .collect();
    out.sort_by_key(|t| t.date);
    out
}

/// How many tasks each filter would show, in `TaskFilter::ALL` order
pub fn filter_counts(tasks: &[Task], reference: NaiveDate) -> [(TaskFilter, usize); 4] {
    TaskFilter::ALL.map(|f| (f, tasks.iter().filter(|t| f.matches(t, reference)).count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(id: i64, date: &str, completed: bool) -> Task {
        Task {
            id,
            text: format!("task {}", id),
            date: date.parse().unwrap(),
            completed,
            created_at: None,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "2024-05-03", false),
            task(2, "2024-05-01", true),
            task(3, "2024-04-30", false),
            task(4, "2024-05-01", false),
            task(5, "2024-05-03", true),
            task(6, "2024-05-01", false),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    fn reference() -> NaiveDate {
        "2024-05-01".parse().unwrap()
    }

    #[test]
    fn all_sorted_by_date_ties_in_insertion_order() {
        let tasks = sample();
        let out = filter_tasks(&tasks, TaskFilter::All, reference());
        assert_eq!(ids(&out), vec![3, 2, 4, 6, 1, 5]);
    }

    #[test]
    fn today_matches_reference_date_only() {
        let tasks = sample();
        let out = filter_tasks(&tasks, TaskFilter::Today, reference());
        assert_eq!(ids(&out), vec![2, 4, 6]);
    }

    #[test]
    fn upcoming_is_future_and_open() {
        let tasks = sample();
        let out = filter_tasks(&tasks, TaskFilter::Upcoming, reference());
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn completed_ignores_reference() {
        let tasks = sample();
        let far_future = "2099-01-01".parse().unwrap();
        assert_eq!(
            ids(&filter_tasks(&tasks, TaskFilter::Completed, reference())),
            vec![2, 5]
        );
        assert_eq!(
            ids(&filter_tasks(&tasks, TaskFilter::Completed, far_future)),
            vec![2, 5]
        );
    }

    #[test]
    fn filtering_leaves_input_order_untouched() {
        let tasks = sample();
        let before = tasks.clone();
        let _ = filter_tasks(&tasks, TaskFilter::All, reference());
        assert_eq!(tasks, before);
    }

    #[test]
    fn counts_per_filter() {
        let tasks = sample();
        assert_eq!(
            filter_counts(&tasks, reference()),
            [
                (TaskFilter::All, 6),
                (TaskFilter::Today, 3),
                (TaskFilter::Upcoming, 1),
                (TaskFilter::Completed, 2),
            ]
        );
    }
}
