//! Output formatting helpers for the `rpg` CLI.

use serde::Serialize;
use std::io::{self, Write};

use rpglife_core::achievement::Achievement;
use rpglife_core::model::{Category, Reward, Task};
use rpglife_ui::styles::{render_difficulty, render_hex, render_pass, render_value};
use rpglife_ui::terminal::should_use_emoji;

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Display width ignoring ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }
    width
}

fn pad(handle: &mut impl Write, cell: &str, width: usize) {
    let fill = width.saturating_sub(visible_width(cell));
    let _ = write!(handle, "{}{}", cell, " ".repeat(fill));
}

/// Print a simple table with headers and rows.
///
/// Column widths are computed from the visible text so colored cells
/// still line up.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(visible_width(cell));
            }
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for (i, header) in headers.iter().enumerate() {
        if i > 0 {
            let _ = write!(handle, "  ");
        }
        pad(&mut handle, header, widths[i]);
    }
    let _ = writeln!(handle);

    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            let _ = write!(handle, "  ");
        }
        let _ = write!(handle, "{}", "-".repeat(*width));
    }
    let _ = writeln!(handle);

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                let _ = write!(handle, "  ");
            }
            match widths.get(i) {
                Some(&w) => pad(&mut handle, cell, w),
                None => {
                    let _ = write!(handle, "{}", cell);
                }
            }
        }
        let _ = writeln!(handle);
    }
}

/// `icon name` on terminals, plain `name` otherwise.
pub fn with_icon(icon: &str, name: &str) -> String {
    if should_use_emoji() && !icon.is_empty() {
        format!("{icon} {name}")
    } else {
        name.to_string()
    }
}

pub fn format_task_row(task: &Task) -> Vec<String> {
    vec![
        task.id.to_string(),
        task.name.clone(),
        with_icon(&task.category_icon, &task.category_name),
        render_difficulty(task.difficulty),
        if task.is_recurring { "yes" } else { "" }.to_string(),
    ]
}

pub fn format_reward_row(reward: &Reward) -> Vec<String> {
    vec![
        reward.id.to_string(),
        reward.name.clone(),
        render_value(reward.value),
        reward.point_cost.to_string(),
    ]
}

pub fn format_category_row(category: &Category) -> Vec<String> {
    vec![
        category.id.to_string(),
        with_icon(&category.icon, &render_hex(&category.name, &category.color)),
        if category.is_default { "default" } else { "custom" }.to_string(),
    ]
}

/// Announces unlocks that came out of an operation.
pub fn print_unlocks(unlocked: &[Achievement]) {
    for achievement in unlocked {
        println!(
            "{} {}",
            render_pass("Achievement unlocked:"),
            with_icon(&achievement.icon, &achievement.name)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_width_skips_escapes() {
        assert_eq!(visible_width("plain"), 5);
        assert_eq!(visible_width("\x1b[38;2;1;2;3mred\x1b[39m"), 3);
        assert_eq!(visible_width("★★☆"), 3);
    }

    #[test]
    fn table_output_smoke() {
        let headers = &["ID", "Name"];
        let rows = vec![
            vec!["1".into(), "Read".into()],
            vec!["2".into(), "\x1b[1mRun\x1b[0m".into()],
        ];
        output_table(headers, &rows);
    }
}
