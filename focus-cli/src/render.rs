use anyhow::{Context, Result};
use chrono_tz::Tz;
use focus_core::{FocusEntry, FocusResult};

/// Keep at most `limit` entries per list (0 = no limit). Counts are untouched.
pub fn truncate(mut result: FocusResult, limit: usize) -> FocusResult {
    if limit > 0 {
        result.focus_tasks.truncate(limit);
        result.waiting_tasks.truncate(limit);
    }
    result
}

pub fn print_json(result: &FocusResult) -> Result<()> {
    let s = serde_json::to_string_pretty(result).context("serialize result")?;
    println!("{s}");
    Ok(())
}

pub fn print_text(result: &FocusResult, tz: Tz, show_detail: bool) {
    println!(
        "# Focus ({} tasks, generated {})\n",
        result.total_task_count,
        result.generated_at.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z")
    );

    if result.is_empty() {
        println!("Nothing to do.");
        return;
    }

    println!("## Next up ({})\n", result.focus_tasks.len());
    for (i, e) in result.focus_tasks.iter().enumerate() {
        println!("{:>2}. {}", i + 1, headline(e, tz));
        if let Some(s) = &e.successor {
            println!("      unblocks: [{}] {}", s.item_code, s.content);
        }
        print_detail(e, show_detail);
    }

    if !result.waiting_tasks.is_empty() {
        println!("\n## Waiting ({})\n", result.waiting_tasks.len());
        for e in &result.waiting_tasks {
            println!("  - {}", headline(e, tz));
            if let Some(b) = &e.blocked_by {
                println!("      blocked by: [{}] {}", b.item_code, b.content);
            }
            print_detail(e, show_detail);
        }
    }
}

fn headline(e: &FocusEntry, tz: Tz) -> String {
    let due = e
        .due_at
        .map(|d| d.with_timezone(&tz).format("%a %b %d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let priority = e.priority.map(|p| p.label()).unwrap_or("-");

    let mut line = format!(
        "score={:<5} | {} | {:<8} | [{}] {}",
        e.total_score, due, priority, e.item.code, e.content
    );
    if let Some(a) = &e.assignee {
        line.push_str(&format!(" @{}", a.display_name));
    }
    line
}

fn print_detail(e: &FocusEntry, show_detail: bool) {
    if !show_detail {
        return;
    }
    if let Some(d) = &e.score_detail {
        println!("      {}", d.explanation);
    }
}
