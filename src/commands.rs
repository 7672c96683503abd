use std::io::{self, Write};

use chrono::Utc;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::error::{Error, Result};
use crate::models::{Profile, Task};
use crate::mutations::{complete_task, create_task, delete_task, patch_task, TaskDraft, TaskPatch};
use crate::storage::TaskStore;
use crate::views::{completed_view, is_deadline_soon, local_time_label, pending_view, time_left_label, DailyStats};

/// Adds a new task.
pub fn cmd_add(store: &TaskStore, title: String, description: String, days: Option<u32>) -> Result<()> {
    let draft = TaskDraft { title, description, duration: days };
    let task = create_task(store, &draft, Utc::now())?;
    println!("Task added (id = {})", task.id);
    Ok(())
}

/// Marks a task as complete by ID.
pub fn cmd_complete(store: &TaskStore, id: u64) -> Result<()> {
    complete_task(store, id, Utc::now())?;
    println!("Task {} marked as complete.", id);
    Ok(())
}

/// Removes a task by ID.
pub fn cmd_remove(store: &TaskStore, id: u64) -> Result<()> {
    let task = delete_task(store, id)?;
    println!("Task {} ('{}') removed.", id, task.title);
    Ok(())
}

/// Edits an existing task.
///
/// Fields that are not given keep their current value. `clear_days` drops
/// the deadline.
pub fn cmd_edit(
    store: &TaskStore,
    id: u64,
    title: Option<String>,
    description: Option<String>,
    days: Option<u32>,
    clear_days: bool,
) -> Result<()> {
    let patch = TaskPatch {
        title,
        description,
        duration: if clear_days { Some(None) } else { days.map(Some) },
    };
    patch_task(store, id, &patch)?;
    println!("Task {} updated.", id);
    Ok(())
}

/// Lists pending tasks, earliest deadline first.
pub fn cmd_list(store: &TaskStore) -> Result<()> {
    let tasks = store.try_load_tasks()?;
    let pending = pending_view(&tasks);
    if pending.is_empty() {
        println!("No pending tasks.");
        return Ok(());
    }

    let now = Utc::now();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Deadline").add_attribute(Attribute::Bold),
            Cell::new("Time Left").add_attribute(Attribute::Bold),
        ]);

    for t in pending {
        let soon = is_deadline_soon(t, now);
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(local_time_label(t.deadline.as_deref())),
            Cell::new(time_left_label(t, now)).fg(if soon { Color::Red } else { Color::Reset }),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Lists the most recently completed tasks.
pub fn cmd_completed(store: &TaskStore) -> Result<()> {
    let tasks = store.try_load_tasks()?;
    let completed = completed_view(&tasks);
    if completed.is_empty() {
        println!("No completed tasks yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Completed").add_attribute(Attribute::Bold),
        ]);

    for t in completed {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(local_time_label(Some(&t.completed_at))).fg(Color::Green),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Shows every field of one task.
pub fn cmd_show(store: &TaskStore, id: u64) -> Result<()> {
    let task = store.try_load_tasks()?.into_iter().find(|t| t.id == id).ok_or(Error::NotFound(id))?;
    println!("{}", task_details(&task));
    Ok(())
}

fn task_details(t: &Task) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(vec!["ID".to_string(), t.id.to_string()]);
    table.add_row(vec!["Title".to_string(), t.title.clone()]);
    table.add_row(vec!["Description".to_string(), t.description.clone()]);
    table.add_row(vec!["Status".to_string(), if t.status { "Done" } else { "Pending" }.to_string()]);
    table.add_row(vec!["Created".to_string(), local_time_label(Some(&t.created_at))]);
    table.add_row(vec![
        "Duration".to_string(),
        t.duration.map(|d| format!("{d} days")).unwrap_or_else(|| "-".into()),
    ]);
    table.add_row(vec!["Deadline".to_string(), local_time_label(t.deadline.as_deref())]);
    table.add_row(vec!["Completed".to_string(), local_time_label(Some(&t.completed_at))]);
    table
}

/// Prints the profile and today's statistics.
pub fn cmd_stats(store: &TaskStore) -> Result<()> {
    let tasks = store.try_load_tasks()?;
    let stats = DailyStats::compute(&tasks, Utc::now().date_naive());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Statistic", "Value"]);
    table.add_row(vec!["Today's Tasks".to_string(), stats.today_tasks.to_string()]);
    table.add_row(vec!["Today Completed".to_string(), stats.today_completed_tasks.to_string()]);
    table.add_row(vec!["Pending Tasks".to_string(), stats.pending_tasks.to_string()]);
    table.add_row(vec!["All Completed".to_string(), stats.completed_tasks.to_string()]);
    table.add_row(vec!["Completion Rate".to_string(), format!("{}%", stats.completion_rate)]);
    println!("{table}");
    Ok(())
}

/// Prints the stored profile.
pub fn cmd_profile_show(store: &TaskStore) -> Result<()> {
    match store.try_load_profile()? {
        Some(p) => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.add_row(vec!["Name", p.name.as_str()]);
            table.add_row(vec!["Email", p.email.as_str()]);
            table.add_row(vec!["Role", p.role.as_str()]);
            table.add_row(vec!["Picture", p.profile_picture.as_str()]);
            println!("{table}");
        }
        None => println!("No profile set. Use `taskpad profile set`."),
    }
    Ok(())
}

/// Updates the given profile fields, keeping the others.
pub fn cmd_profile_set(
    store: &TaskStore,
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
    picture: Option<String>,
) -> Result<()> {
    let mut profile: Profile = store.try_load_profile()?.unwrap_or_default();
    if let Some(n) = name { profile.name = n; }
    if let Some(e) = email { profile.email = e; }
    if let Some(r) = role { profile.role = r; }
    if let Some(p) = picture { profile.profile_picture = p; }
    store.save_profile(&profile)?;
    println!("Profile updated.");
    Ok(())
}

/// Deletes all tasks and the profile.
pub fn cmd_reset(store: &TaskStore, force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all tasks and the profile? This cannot be undone. [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() || input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.reset()?;
    println!("Storage reset successfully.");
    Ok(())
}
