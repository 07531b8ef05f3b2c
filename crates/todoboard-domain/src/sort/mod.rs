//! Due-date ordering.

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::task::Task;

/// Sort key groups: timed tasks first, then all-day tasks, then undated ones.
fn due_rank(task: &Task) -> u8 {
    match &task.due {
        Some(due) if due.datetime.is_some() => 0,
        Some(_) => 1,
        None => 2,
    }
}

pub fn compare_due(a: &Task, b: &Task) -> Ordering {
    due_rank(a).cmp(&due_rank(b)).then_with(|| match (&a.due, &b.due) {
        (Some(da), Some(db)) => da.datetime.cmp(&db.datetime).then(da.date.cmp(&db.date)),
        _ => Ordering::Equal,
    })
}

/// Stable sort by due date; equal keys keep their input order.
pub fn sorted_by_due<T: Borrow<Task>>(mut tasks: Vec<T>) -> Vec<T> {
    tasks.sort_by(|a, b| compare_due(a.borrow(), b.borrow()));
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Due;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_groups_timed_then_dated_then_undated() {
        let tasks = vec![
            Task::new("none", "a", "p"),
            Task::new("date", "b", "p").with_due(Due::on(date(1), "May 1")),
            Task::new("time", "c", "p")
                .with_due(Due::at(date(9).and_hms_opt(9, 0, 0).unwrap(), "May 9 9am")),
        ];
        assert_eq!(ids(&sorted_by_due(tasks)), ["time", "date", "none"]);
    }

    #[test]
    fn test_ascending_within_groups() {
        let tasks = vec![
            Task::new("d3", "a", "p").with_due(Due::on(date(3), "May 3")),
            Task::new("t2", "b", "p")
                .with_due(Due::at(date(2).and_hms_opt(18, 0, 0).unwrap(), "May 2 6pm")),
            Task::new("d1", "c", "p").with_due(Due::on(date(1), "May 1")),
            Task::new("t1", "d", "p")
                .with_due(Due::at(date(2).and_hms_opt(8, 0, 0).unwrap(), "May 2 8am")),
        ];
        assert_eq!(ids(&sorted_by_due(tasks)), ["t1", "t2", "d1", "d3"]);
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let tasks = vec![
            Task::new("x", "a", "p").with_due(Due::on(date(4), "May 4")),
            Task::new("u1", "b", "p"),
            Task::new("y", "c", "p").with_due(Due::on(date(4), "4 May")),
            Task::new("u2", "d", "p"),
        ];
        assert_eq!(ids(&sorted_by_due(tasks)), ["x", "y", "u1", "u2"]);
    }

    #[test]
    fn test_sorts_borrowed_tasks() {
        let tasks = [
            Task::new("late", "a", "p").with_due(Due::on(date(20), "May 20")),
            Task::new("early", "b", "p").with_due(Due::on(date(2), "May 2")),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let sorted: Vec<&str> = sorted_by_due(refs).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(sorted, ["early", "late"]);
    }
}
