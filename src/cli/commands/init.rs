use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::{EventStore, SqliteEventStore};
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing wgmonitor…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &db_path);

    let store = SqliteEventStore::open(&db_path)?;

    println!("✅ Database initialized at {}", &db_path);

    if let Err(e) = store.record_log(
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    ) {
        eprintln!("⚠️ Failed to write internal log: {}", e);
    }

    println!("🎉 wgmonitor initialization completed!");
    Ok(())
}
