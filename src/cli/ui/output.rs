//! Terminal output helpers shared by the command handlers

use anyhow::Result;
use colored::*;
use dialoguer::Confirm;
use is_terminal::IsTerminal;

use crate::api::{ResponseStatus, Task, TaskStatus};

/// Print a scheduler status. A failed status becomes an error so the exit code reflects it.
pub fn report(status: &ResponseStatus) -> Result<()> {
    if status.success {
        println!("{} {}", "✓".bright_green().bold(), status.message.bright_green());
        Ok(())
    } else {
        anyhow::bail!("{}", status.message)
    }
}

/// Ask before a destructive action. `--yes` and non-interactive stdin skip the question.
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes || !std::io::stdin().is_terminal() {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()?)
}

pub fn status_label(status: TaskStatus) -> ColoredString {
    let label = format!("{:<11}", status.as_str());
    match status {
        TaskStatus::Pending => label.bright_blue(),
        TaskStatus::Running => label.bright_green().bold(),
        TaskStatus::Done => label.green(),
        TaskStatus::Failed => label.bright_red(),
        TaskStatus::Interrupted => label.bright_yellow(),
        TaskStatus::Saved => label.dimmed(),
    }
}

/// Cut to `width` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let kept: String = single_line.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Two-line summary used by the list commands
pub fn print_task(position: usize, task: &Task, is_current: bool) {
    let marker = if task.is_bookmarked() {
        "★".bright_yellow()
    } else if is_current {
        "▶".bright_green()
    } else {
        " ".normal()
    };
    println!(
        "{:>4}. {} {} {} {}",
        position,
        marker,
        status_label(if is_current { TaskStatus::Running } else { task.status }),
        task.display_name().bright_white().bold(),
        format!("({})", task.id).dimmed()
    );

    let mut details = vec![task.task_type.clone()];
    if let Some(checkpoint) = task.checkpoint() {
        details.push(checkpoint.to_string());
    }
    if let Some(created) = task.created_at {
        details.push(created.format("%Y-%m-%d %H:%M").to_string());
    }
    println!("        {}", details.join(" · ").dimmed());

    if !task.prompt().is_empty() {
        println!("        {}", truncate(task.prompt(), 100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_collapses_whitespace_and_marks_the_cut() {
        assert_eq!(truncate("a  castle\non a hill", 40), "a castle on a hill");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn failed_status_is_an_error() {
        assert!(report(&ResponseStatus::success("Queue paused")).is_ok());
        let err = report(&ResponseStatus::failure("Task not found")).unwrap_err();
        assert_eq!(err.to_string(), "Task not found");
    }
}
