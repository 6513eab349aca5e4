use std::path::Path;
use timetracker::infra::app_config;
use timetracker::infra::db::Database;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run()
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = app_config::database_path();

    if !db_path.exists() {
        println!("Database does not exist at: {}", db_path.display());
        println!("No reset needed.");
        return Ok(());
    }

    println!("Connecting to database at: {}", db_path.display());
    reset_at(&db_path)?;
    println!("Database location: {}", db_path.display());

    Ok(())
}

fn reset_at(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_at(path)?;

    println!("Current record counts:");
    for (table, count) in db.row_counts()? {
        println!("  {table}: {count}");
    }

    db.reset()?;

    println!("\nAfter reset:");
    let counts = db.row_counts()?;
    for (table, count) in &counts {
        println!("  {table}: {count}");
    }

    let leftover = counts
        .iter()
        .filter(|(table, _)| table != "Task_Statuses" && table != "Task_Types")
        .any(|(_, count)| *count > 0);
    if leftover {
        eprintln!("\nWarning: Some records still exist in the database.");
    } else {
        println!("\nDatabase successfully reset! Only the default task statuses and types remain.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetracker::domain::Client;

    #[test]
    fn test_reset_db_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TimeTracker.db");

        {
            let db = Database::open_at(&path).unwrap();
            let client = Client::new("XYZ Ltd", "Jane Smith", "jane@xyz.com", "0612345678", "+02:00")
                .unwrap();
            db.client_repo().insert(&client).unwrap();
        }

        reset_at(&path).unwrap();

        let db = Database::open_at(&path).unwrap();
        assert!(db.client_repo().get_all().unwrap().is_empty());
        assert_eq!(db.task_status_repo().get_all().unwrap().len(), 4);
    }
}
