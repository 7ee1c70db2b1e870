use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;

const OP_TARGET_MAX: usize = 60;

/// ANSI colour for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "ingest" => Colour::Green,
        "source_unavailable" => Colour::Red,
        "source_recovered" => Colour::Cyan,
        "prune" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// Plain text of `operation (target)`, cut to the column width.
fn op_target_text(entry: &LogEntry) -> String {
    let full = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    if full.chars().count() > OP_TARGET_MAX {
        let mut s: String = full.chars().take(OP_TARGET_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        full
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let texts: Vec<String> = entries.iter().map(op_target_text).collect();
        let op_w = texts.iter().map(|t| t.chars().count()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (entry, text) in entries.iter().zip(&texts) {
            let color = color_for_operation(&entry.operation);

            // only the operation word is coloured
            let painted = match text.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                None => color.paint(text.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(text.chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                entry.id,
                entry.date,
                painted,
                padding,
                entry.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
