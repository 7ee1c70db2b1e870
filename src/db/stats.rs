use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::formatting::format_bytes;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {}", CYAN, RESET, format_bytes(file_size));

    //
    // 2) TOTAL EVENTS / USERS
    //
    let (count, users): (i64, i64) = pool.conn.query_row(
        "SELECT COUNT(*), COUNT(DISTINCT user) FROM events",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    println!(
        "{}• Total events:{} {}{}{}",
        CYAN, RESET, GREEN, count, RESET
    );
    println!("{}• Distinct users:{} {}", CYAN, RESET, users);

    //
    // 3) PER KIND
    //
    let mut stmt = pool
        .conn
        .prepare("SELECT kind, COUNT(*) FROM events GROUP BY kind ORDER BY kind")?;
    let kinds = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    for k in kinds {
        let (kind, n) = k?;
        println!("    {:<14} {}", kind, n);
    }

    //
    // 4) TIME RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT timestamp FROM events ORDER BY timestamp ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT timestamp FROM events ORDER BY timestamp DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Time range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
