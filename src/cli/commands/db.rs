use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregator::days_before;
use crate::core::api::local_now;
use crate::db::log::ttlog;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
        prune,
        retention_days,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            let applied = run_pending_migrations(&pool.conn)?;
            println!(
                "{}✔ Migration completed ({} applied).{}\n",
                GREEN, applied, RESET
            );
        }

        //
        // 2) INFO
        //
        if *info {
            run_pending_migrations(&pool.conn)?;
            stats::print_db_info(&mut pool, &cfg.database)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        //
        // 4) PRUNE
        //
        if *prune {
            run_pending_migrations(&pool.conn)?;
            let days = retention_days.unwrap_or(cfg.retention_days);

            println!(
                "{}▶ Removing events older than {} days…{}",
                CYAN, days, RESET
            );
            // a cutoff before the calendar starts leaves nothing to remove
            let removed = match days_before(local_now(), days) {
                Some(cutoff) => {
                    let n = queries::prune_before(&pool.conn, cutoff)?;
                    ttlog(
                        &pool.conn,
                        "prune",
                        &format!("{} days", days),
                        &format!("Removed {} events older than {}", n, cutoff),
                    )?;
                    n
                }
                None => 0,
            };
            println!("{}✔ Removed {} events.{}\n", GREEN, removed, RESET);
        }

        //
        // 5) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
