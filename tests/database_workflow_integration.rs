//! Integration tests for the database functionality
//! These tests verify that the repositories work together against a real store file

use std::time::Duration;
use timetracker::domain::{
    Client, NewProject, NewTask, Project, ProjectTimeEntry, Task, TaskTimeEntry,
};
use timetracker::infra::db::{Database, RepositoryError, repository::*};

fn xyz_client() -> Client {
    Client::new(
        "XYZ Ltd",
        "Jane Smith",
        "jane.smith@xyzltd.com",
        "0612345678",
        "+02:00",
    )
    .unwrap()
}

#[test]
fn test_full_database_workflow() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let conn = db.connection();

    let client_repo = ClientRepository::new(conn.clone());
    let project_repo = ProjectRepository::new(conn.clone());
    let task_repo = TaskRepository::new(conn.clone());
    let status_repo = TaskStatusRepository::new(conn.clone());
    let type_repo = TaskTypeRepository::new(conn.clone());
    let project_entry_repo = ProjectTimeEntryRepository::new(conn.clone());
    let task_entry_repo = TaskTimeEntryRepository::new(conn.clone());

    let statuses = status_repo.get_all()?;
    let types = type_repo.get_all()?;
    assert_eq!(statuses.len(), 4);
    assert_eq!(types.len(), 4);

    // Inserting the deepest entity stores the whole graph
    let project = Project::new(NewProject {
        client: Some(xyz_client()),
        hourly_rate: 50.0,
        ..NewProject::named("Website Redesign")
    })?;
    let task = Task::new(NewTask {
        status: Some(statuses[0].clone()),
        task_type: Some(types[1].clone()),
        ..NewTask::named(project.clone(), "Landing page")
    });
    let entry = TaskTimeEntry::new(task.clone(), Duration::from_secs(2 * 3600));
    task_entry_repo.insert(&entry)?;

    assert_eq!(client_repo.get_all()?.len(), 1);
    assert_eq!(project_repo.get_all()?, vec![project.clone()]);
    assert_eq!(task_repo.get_all()?, vec![task.clone()]);
    assert_eq!(task_entry_repo.get_all()?, vec![entry.clone()]);

    // Moving the task along only rewrites the task row
    let mut moved = task.clone();
    moved.set_status(Some(statuses[1].clone()));
    task_repo.update(&moved)?;
    assert!(task_repo.get_by_status(&statuses[0].id())?.is_empty());
    assert_eq!(task_repo.get_by_status(&statuses[1].id())?, vec![moved.clone()]);

    let reloaded = task_entry_repo.get_by_id(entry.id())?.expect("entry stored");
    assert_eq!(reloaded.task().status(), Some(&statuses[1]));

    let billable = ProjectTimeEntry::new(project.clone(), Duration::from_secs(900), true);
    project_entry_repo.insert(&billable)?;
    assert_eq!(project_entry_repo.get_by_project(&project.id())?, vec![billable]);

    // Deleting the task orphans its time entry
    task_repo.delete(&moved)?;
    let err = task_entry_repo
        .get_by_id(entry.id())
        .expect_err("task row is gone");
    assert!(matches!(
        err.downcast_ref::<RepositoryError>(),
        Some(RepositoryError::DanglingReference { column: "task_id", .. })
    ));
    Ok(())
}

#[test]
fn test_file_backed_store_survives_reopen() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("TimeTracker.db");

    let project = Project::new(NewProject {
        client: Some(xyz_client()),
        estimated_time: Some(Duration::from_secs(40 * 3600)),
        ..NewProject::named("Website Redesign")
    })?;

    {
        let db = Database::open_at(&path)?;
        assert_eq!(db.path(), Some(path.as_path()));
        db.project_repo().insert(&project)?;
    }

    let db = Database::open_at(&path)?;
    assert!(!db.initialize()?);
    assert_eq!(db.task_status_repo().get_all()?.len(), 4);
    assert_eq!(db.project_repo().get_by_id(project.id())?, Some(project));
    Ok(())
}

#[test]
fn test_reset_empties_a_file_backed_store() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("TimeTracker.db");
    let db = Database::open_at(&path)?;

    db.client_repo().insert(&xyz_client())?;
    db.reset()?;

    assert!(db.client_repo().get_all()?.is_empty());
    assert_eq!(db.task_type_repo().get_all()?.len(), 4);
    Ok(())
}
