use chrono::{DateTime, Duration, TimeZone, Utc};
use taskpad::models::{format_timestamp, Task};
use taskpad::views::{
    completed_view, completion_rate, is_deadline_soon, pending_view, time_left_label, DailyStats,
    COMPLETED_VIEW_LIMIT,
};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

fn pending(id: u64, deadline: Option<DateTime<Utc>>) -> Task {
    Task {
        id,
        title: format!("Task {id}"),
        description: format!("Description of {id}"),
        status: false,
        created_at: format_timestamp(base()),
        completed_at: String::new(),
        duration: None,
        deadline: deadline.map(format_timestamp),
    }
}

fn completed(id: u64, at: DateTime<Utc>) -> Task {
    Task {
        status: true,
        completed_at: format_timestamp(at),
        ..pending(id, None)
    }
}

fn ids(view: &[&Task]) -> Vec<u64> {
    view.iter().map(|t| t.id).collect()
}

#[test]
fn test_pending_sorted_by_deadline() {
    let d1 = base() + Duration::days(1);
    let d2 = base() + Duration::days(2);
    let d3 = base() + Duration::days(3);
    let tasks = vec![pending(3, Some(d3)), pending(1, Some(d1)), pending(2, Some(d2))];

    assert_eq!(ids(&pending_view(&tasks)), vec![1, 2, 3]);
}

#[test]
fn test_pending_without_deadline_first_and_stable() {
    let d = base() + Duration::days(1);
    let tasks = vec![
        pending(10, Some(d)),
        pending(11, None),
        completed(12, base()),
        pending(13, Some(d)),
        pending(14, None),
    ];

    assert_eq!(ids(&pending_view(&tasks)), vec![11, 14, 10, 13]);
}

#[test]
fn test_completed_newest_first_limited() {
    let tasks: Vec<Task> = (0..25)
        .map(|i| completed(i, base() + Duration::minutes(i as i64)))
        .collect();

    let view = completed_view(&tasks);
    assert_eq!(view.len(), COMPLETED_VIEW_LIMIT);
    let expected: Vec<u64> = (5..25).rev().collect();
    assert_eq!(ids(&view), expected);
}

#[test]
fn test_completed_excludes_pending() {
    let tasks = vec![pending(1, None), completed(2, base())];
    assert_eq!(ids(&completed_view(&tasks)), vec![2]);
}

#[test]
fn test_completed_unreadable_timestamp_sorts_last() {
    let mut odd = completed(1, base());
    odd.completed_at = "sometime".into();
    let tasks = vec![odd, completed(2, base())];
    assert_eq!(ids(&completed_view(&tasks)), vec![2, 1]);
}

#[test]
fn test_deadline_soon() {
    let now = base();
    assert!(is_deadline_soon(&pending(1, Some(now + Duration::hours(23))), now));
    assert!(is_deadline_soon(&pending(2, Some(now - Duration::hours(1))), now));
    assert!(!is_deadline_soon(&pending(3, Some(now + Duration::hours(24))), now));
    assert!(!is_deadline_soon(&pending(4, None), now));

    let mut done = pending(5, Some(now + Duration::hours(1)));
    done.status = true;
    done.completed_at = format_timestamp(now);
    assert!(!is_deadline_soon(&done, now));
}

#[test]
fn test_time_left_label() {
    let now = base();
    assert_eq!(time_left_label(&pending(1, None), now), "-");
    assert_eq!(time_left_label(&pending(2, Some(now + Duration::hours(5))), now), "5h");
    assert_eq!(time_left_label(&pending(3, Some(now + Duration::hours(52))), now), "2d 4h");
    assert_eq!(time_left_label(&pending(4, Some(now - Duration::days(2))), now), "2d overdue");
    assert_eq!(time_left_label(&pending(5, Some(now - Duration::hours(3))), now), "3h overdue");
}

#[test]
fn test_completion_rate() {
    assert_eq!(completion_rate(0, 0), 0);
    assert_eq!(completion_rate(1, 2), 50);
    assert_eq!(completion_rate(1, 3), 33);
    assert_eq!(completion_rate(2, 3), 67);
    assert_eq!(completion_rate(3, 3), 100);
}

#[test]
fn test_daily_stats() {
    let today = base().date_naive();
    let mut yesterday_done = completed(1, base());
    yesterday_done.created_at = format_timestamp(base() - Duration::days(1));
    let mut yesterday_open = pending(2, None);
    yesterday_open.created_at = format_timestamp(base() - Duration::days(1));

    let tasks = vec![
        yesterday_done,
        yesterday_open,
        pending(3, None),
        completed(4, base()),
    ];

    let stats = DailyStats::compute(&tasks, today);
    assert_eq!(
        stats,
        DailyStats {
            today_tasks: 2,
            today_completed_tasks: 1,
            pending_tasks: 2,
            completed_tasks: 2,
            total_tasks: 4,
            completion_rate: 50,
        }
    );
}

#[test]
fn test_daily_stats_empty() {
    let stats = DailyStats::compute(&[], base().date_naive());
    assert_eq!(stats, DailyStats::default());
}
