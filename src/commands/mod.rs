//! Console commands for the TimeTracker prompt.
//!
//! Each input line is split into words and parsed with clap; the parsed
//! command then runs against the repositories of an open [`Database`].

mod line;

pub use line::split_words;

use crate::domain::{
    Client, NewProject, NewTask, Project, ProjectTimeEntry, Task, TaskStatus, TaskTimeEntry,
    TaskType,
};
use crate::infra::app_config;
use crate::infra::db::{Database, Persisted, Repository, RepositoryError, Scan};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// What the prompt loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One line typed at the `TimeTracker> ` prompt.
#[derive(Debug, Parser)]
#[command(name = "TimeTracker", no_binary_name = true, disable_version_flag = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReplCommand {
    /// Create and initialise the database
    CreateDb,
    /// List the tables in the database
    ListTables,
    /// Drop every table, then recreate the schema and default labels
    ResetDb,
    /// Manage clients
    #[command(subcommand)]
    Client(ClientCommand),
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage task statuses
    #[command(subcommand)]
    Status(LabelCommand),
    /// Manage task types
    #[command(subcommand)]
    Type(LabelCommand),
    /// Log time against a project or a task
    #[command(subcommand)]
    Log(LogCommand),
    /// Inspect logged time
    #[command(subcommand)]
    Entries(EntriesCommand),
    /// Show or change where the database lives
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Quit the application
    #[command(alias = "quit")]
    Exit,
}

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    /// Register a new client
    Add {
        company: String,
        name: String,
        email: String,
        phone_number: String,
        /// UTC offset such as +02:00
        #[arg(allow_hyphen_values = true)]
        timezone: String,
    },
    /// Show all clients, or a single one by id
    List {
        id: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete a client; its projects are kept
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a new project
    Add {
        name: String,
        /// Id of the client to bill
        #[arg(long)]
        client: Option<String>,
    },
    /// Show all projects, a single one by id, or those of one client
    List {
        #[arg(conflicts_with = "client")]
        id: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete a project; its tasks and time entries are kept
    Delete { id: String },
    /// Change one attribute of a project
    Update {
        id: String,
        #[arg(value_enum, allow_hyphen_values = true)]
        attribute: ProjectAttribute,
        /// New value; `none` clears client, deadline and estimated time
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

/// Project fields settable from the prompt, with their short aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectAttribute {
    #[value(alias = "-c")]
    Client,
    #[value(aliases = ["-ca", "-cd"])]
    CreatedAt,
    #[value(aliases = ["desc", "-d"])]
    Description,
    #[value(alias = "-dl")]
    Deadline,
    #[value(alias = "-e")]
    EstimatedTime,
    #[value(alias = "-f")]
    FixedPrice,
    #[value(alias = "-hr")]
    HourlyRate,
    #[value(alias = "-n")]
    Name,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Create a task inside a project
    Add {
        project_id: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Id of the initial status
        #[arg(long)]
        status: Option<String>,
        /// Id of the task type
        #[arg(long = "type")]
        task_type: Option<String>,
    },
    /// Show tasks, optionally only those with a status, a type or a project
    List {
        #[arg(long, conflicts_with_all = ["task_type", "project"])]
        status: Option<String>,
        #[arg(long = "type", conflicts_with = "project")]
        task_type: Option<String>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete a task; its time entries are kept
    Delete { id: String },
    /// Assign a status to a task (omit the status to clear it)
    SetStatus { id: String, status_id: Option<String> },
    /// Assign a type to a task (omit the type to clear it)
    SetType { id: String, type_id: Option<String> },
}

#[derive(Debug, Subcommand)]
pub enum LabelCommand {
    /// Show every label
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a label
    Add { label: String },
}

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// Log seconds spent on a project
    Project {
        project_id: String,
        seconds: u64,
        #[arg(long)]
        billable: bool,
    },
    /// Log seconds spent on a task
    Task { task_id: String, seconds: u64 },
}

#[derive(Debug, Subcommand)]
pub enum EntriesCommand {
    /// Show logged time, optionally for one project or one task
    List {
        #[arg(long, conflicts_with = "task")]
        project: Option<String>,
        #[arg(long)]
        task: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the config file and the database in use
    Show,
    /// Remember a database file for the next start (omit the path to forget it)
    SetDb { path: Option<PathBuf> },
}

/// Parses and runs one prompt line. Blank lines do nothing.
///
/// Help output goes to `out`; parse failures come back as one-line errors.
pub fn run_line(db: &Database, line: &str, out: &mut impl Write) -> Result<Flow> {
    let words = split_words(line)?;
    if words.is_empty() {
        return Ok(Flow::Continue);
    }

    let parsed = match ReplLine::try_parse_from(&words) {
        Ok(parsed) => parsed,
        Err(err) if !err.use_stderr() => {
            write!(out, "{err}")?;
            return Ok(Flow::Continue);
        }
        Err(err) => {
            let message = err.to_string();
            let first = message.lines().next().unwrap_or_default();
            bail!("{}", first.trim_start_matches("error: "));
        }
    };

    execute(db, parsed.command, out)
}

pub fn execute(db: &Database, command: ReplCommand, out: &mut impl Write) -> Result<Flow> {
    match command {
        ReplCommand::CreateDb => {
            if db.initialize()? {
                writeln!(out, "Database created.")?;
            } else {
                writeln!(out, "Database already exists.")?;
            }
        }
        ReplCommand::ListTables => {
            for table in db.list_tables()? {
                writeln!(out, "{table}")?;
            }
        }
        ReplCommand::ResetDb => {
            db.reset()?;
            writeln!(out, "Database reset.")?;
        }
        ReplCommand::Client(cmd) => client(db, cmd, out)?,
        ReplCommand::Project(cmd) => project(db, cmd, out)?,
        ReplCommand::Task(cmd) => task(db, cmd, out)?,
        ReplCommand::Status(cmd) => label::<TaskStatus>(&db.task_status_repo(), cmd, out)?,
        ReplCommand::Type(cmd) => label::<TaskType>(&db.task_type_repo(), cmd, out)?,
        ReplCommand::Log(cmd) => log_time(db, cmd, out)?,
        ReplCommand::Entries(cmd) => entries(db, cmd, out)?,
        ReplCommand::Config(cmd) => config(db, cmd, out)?,
        ReplCommand::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

fn client(db: &Database, cmd: ClientCommand, out: &mut impl Write) -> Result<()> {
    let repo = db.client_repo();
    match cmd {
        ClientCommand::Add {
            company,
            name,
            email,
            phone_number,
            timezone,
        } => {
            let client = Client::new(company, name, email, phone_number, timezone)?;
            repo.insert(&client)?;
            writeln!(out, "Client successfully created: {}", client.id())?;
        }
        ClientCommand::List { id: Some(id), json } => {
            let client = require(&repo, "client", &id)?;
            print_list(out, &[client], json)?;
        }
        ClientCommand::List { id: None, json } => print_list(out, &repo.get_all()?, json)?,
        ClientCommand::Delete { id } => {
            remove(&repo, "client", &id)?;
            writeln!(out, "Client successfully deleted.")?;
        }
    }
    Ok(())
}

fn project(db: &Database, cmd: ProjectCommand, out: &mut impl Write) -> Result<()> {
    let repo = db.project_repo();
    match cmd {
        ProjectCommand::Add { name, client } => {
            let client = client
                .map(|id| require(&db.client_repo(), "client", &id))
                .transpose()?;
            let project = Project::new(NewProject {
                client,
                ..NewProject::named(name)
            })?;
            repo.insert(&project)?;
            writeln!(out, "Project successfully created: {}", project.id())?;
        }
        ProjectCommand::List {
            id: Some(id), json, ..
        } => {
            let project = require(&repo, "project", &id)?;
            print_list(out, &[project], json)?;
        }
        ProjectCommand::List {
            client: Some(client_id),
            json,
            ..
        } => {
            let client = require(&db.client_repo(), "client", &client_id)?;
            print_list(out, &repo.get_by_client(&client.id())?, json)?;
        }
        ProjectCommand::List { json, .. } => print_list(out, &repo.get_all()?, json)?,
        ProjectCommand::Delete { id } => {
            remove(&repo, "project", &id)?;
            writeln!(out, "Project successfully deleted.")?;
        }
        ProjectCommand::Update {
            id,
            attribute,
            value,
        } => {
            let mut project = require(&repo, "project", &id)?;
            apply_attribute(db, &mut project, attribute, &value)?;
            repo.update(&project)?;
            writeln!(out, "Project successfully updated.")?;
        }
    }
    Ok(())
}

fn apply_attribute(
    db: &Database,
    project: &mut Project,
    attribute: ProjectAttribute,
    value: &str,
) -> Result<()> {
    let cleared = value.eq_ignore_ascii_case("none");
    match attribute {
        ProjectAttribute::Client if cleared => project.set_client(None),
        ProjectAttribute::Client => {
            let client = require(&db.client_repo(), "client", value)?;
            project.set_client(Some(client));
        }
        ProjectAttribute::CreatedAt => project.set_created_at(parse_millis(value)?),
        ProjectAttribute::Description => project.set_description(value),
        ProjectAttribute::Deadline if cleared => project.set_deadline(None),
        ProjectAttribute::Deadline => project.set_deadline(Some(parse_millis(value)?)),
        ProjectAttribute::EstimatedTime if cleared => project.set_estimated_time(None),
        ProjectAttribute::EstimatedTime => {
            project.set_estimated_time(Some(parse_seconds(value)?));
        }
        ProjectAttribute::FixedPrice => project.set_fixed_price(parse_amount(value)?)?,
        ProjectAttribute::HourlyRate => project.set_hourly_rate(parse_amount(value)?)?,
        ProjectAttribute::Name => project.set_name(value),
    }
    Ok(())
}

fn task(db: &Database, cmd: TaskCommand, out: &mut impl Write) -> Result<()> {
    let repo = db.task_repo();
    match cmd {
        TaskCommand::Add {
            project_id,
            name,
            description,
            status,
            task_type,
        } => {
            let project = require(&db.project_repo(), "project", &project_id)?;
            let status = status
                .map(|id| require(&db.task_status_repo(), "task status", &id))
                .transpose()?;
            let task_type = task_type
                .map(|id| require(&db.task_type_repo(), "task type", &id))
                .transpose()?;
            let task = Task::new(NewTask {
                description: description.unwrap_or_default(),
                status,
                task_type,
                ..NewTask::named(project, name)
            });
            repo.insert(&task)?;
            writeln!(out, "Task successfully created: {}", task.id())?;
        }
        TaskCommand::List {
            status,
            task_type,
            project,
            json,
        } => {
            let tasks = if let Some(id) = status {
                let status = require(&db.task_status_repo(), "task status", &id)?;
                repo.scan_by_status(&status.id())?
            } else if let Some(id) = task_type {
                let task_type = require(&db.task_type_repo(), "task type", &id)?;
                repo.scan_by_type(&task_type.id())?
            } else if let Some(id) = project {
                let project = require(&db.project_repo(), "project", &id)?;
                repo.scan_by_project(&project.id())?
            } else {
                repo.scan_all()?
            };
            print_list(out, &tasks.loaded, json)?;
            if !json {
                print_dangling(out, &tasks.dangling)?;
            }
        }
        TaskCommand::Delete { id } => {
            remove(&repo, "task", &id)?;
            writeln!(out, "Task successfully deleted.")?;
        }
        TaskCommand::SetStatus { id, status_id } => {
            let mut task = require(&repo, "task", &id)?;
            let status = status_id
                .map(|id| require(&db.task_status_repo(), "task status", &id))
                .transpose()?;
            task.set_status(status);
            repo.update(&task)?;
            writeln!(out, "Task successfully updated.")?;
        }
        TaskCommand::SetType { id, type_id } => {
            let mut task = require(&repo, "task", &id)?;
            let task_type = type_id
                .map(|id| require(&db.task_type_repo(), "task type", &id))
                .transpose()?;
            task.set_task_type(task_type);
            repo.update(&task)?;
            writeln!(out, "Task successfully updated.")?;
        }
    }
    Ok(())
}

/// Task statuses and task types share the same two commands.
trait Label: Persisted + Serialize + fmt::Display {
    const KIND: &'static str;

    fn labelled(label: String) -> Self;
}

impl Label for TaskStatus {
    const KIND: &'static str = "Task status";

    fn labelled(label: String) -> Self {
        TaskStatus::new(label)
    }
}

impl Label for TaskType {
    const KIND: &'static str = "Task type";

    fn labelled(label: String) -> Self {
        TaskType::new(label)
    }
}

fn label<L: Label>(repo: &Repository<L>, cmd: LabelCommand, out: &mut impl Write) -> Result<()> {
    match cmd {
        LabelCommand::List { json } => print_list(out, &repo.get_all()?, json)?,
        LabelCommand::Add { label } => {
            let entity = L::labelled(label);
            repo.insert(&entity)?;
            writeln!(out, "{} successfully added: {}", L::KIND, entity.entity_id())?;
        }
    }
    Ok(())
}

fn log_time(db: &Database, cmd: LogCommand, out: &mut impl Write) -> Result<()> {
    match cmd {
        LogCommand::Project {
            project_id,
            seconds,
            billable,
        } => {
            let project = require(&db.project_repo(), "project", &project_id)?;
            let entry = ProjectTimeEntry::new(project, Duration::from_secs(seconds), billable);
            db.project_time_entry_repo().insert(&entry)?;
            writeln!(
                out,
                "Logged {seconds}s on project '{}'.",
                entry.project().name()
            )?;
        }
        LogCommand::Task { task_id, seconds } => {
            let task = require(&db.task_repo(), "task", &task_id)?;
            let entry = TaskTimeEntry::new(task, Duration::from_secs(seconds));
            db.task_time_entry_repo().insert(&entry)?;
            writeln!(out, "Logged {seconds}s on task '{}'.", entry.task().name())?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct EntriesView {
    project_entries: Vec<ProjectTimeEntry>,
    task_entries: Vec<TaskTimeEntry>,
}

fn entries(db: &Database, cmd: EntriesCommand, out: &mut impl Write) -> Result<()> {
    let EntriesCommand::List {
        project,
        task,
        json,
    } = cmd;

    let (project_entries, task_entries) = if let Some(id) = project {
        let project = require(&db.project_repo(), "project", &id)?;
        let scan = db.project_time_entry_repo().scan_by_project(&project.id())?;
        (scan, Scan::default())
    } else if let Some(id) = task {
        let task = require(&db.task_repo(), "task", &id)?;
        (Scan::default(), db.task_time_entry_repo().scan_by_task(&task.id())?)
    } else {
        (
            db.project_time_entry_repo().scan_all()?,
            db.task_time_entry_repo().scan_all()?,
        )
    };

    let view = EntriesView {
        project_entries: project_entries.loaded,
        task_entries: task_entries.loaded,
    };
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
        return Ok(());
    }
    writeln!(out, "Project entries:")?;
    print_list(out, &view.project_entries, false)?;
    print_dangling(out, &project_entries.dangling)?;
    writeln!(out, "Task entries:")?;
    print_list(out, &view.task_entries, false)?;
    print_dangling(out, &task_entries.dangling)?;
    Ok(())
}

fn config(db: &Database, cmd: ConfigCommand, out: &mut impl Write) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            writeln!(out, "Config file: {}", app_config::config_path().display())?;
            match db.path() {
                Some(path) => writeln!(out, "Database: {}", path.display())?,
                None => writeln!(out, "Database: (in memory)")?,
            }
        }
        ConfigCommand::SetDb { path } => {
            let mut config = app_config::load_config();
            config.database_path = path;
            app_config::save_config(&config)?;
            writeln!(
                out,
                "Saved {}; takes effect on the next start.",
                app_config::config_path().display()
            )?;
        }
    }
    Ok(())
}

fn require<E: Persisted>(repo: &Repository<E>, kind: &str, id: &str) -> Result<E> {
    repo.get_by_id(id)?
        .ok_or_else(|| anyhow!("{kind} does not exist: {id}"))
}

/// Deletes by id without loading the row, so orphaned rows can be removed too.
fn remove<E: Persisted>(repo: &Repository<E>, kind: &str, id: &str) -> Result<()> {
    if repo.delete_by_id(id)? == 0 {
        bail!("{kind} does not exist: {id}");
    }
    Ok(())
}

fn print_dangling(out: &mut impl Write, dangling: &[RepositoryError]) -> Result<()> {
    for err in dangling {
        writeln!(out, "(orphaned) {err}")?;
    }
    Ok(())
}

fn print_list<T>(out: &mut impl Write, items: &[T], json: bool) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(items)?)?;
    } else if items.is_empty() {
        writeln!(out, "(none)")?;
    } else {
        for item in items {
            writeln!(out, "{item}")?;
        }
    }
    Ok(())
}

fn parse_millis(value: &str) -> Result<DateTime<Utc>> {
    let millis: i64 = value
        .parse()
        .with_context(|| format!("'{value}' is not a timestamp in epoch milliseconds"))?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| anyhow!("timestamp {millis} is out of range"))
}

fn parse_seconds(value: &str) -> Result<Duration> {
    let seconds: u64 = value
        .parse()
        .with_context(|| format!("'{value}' is not a number of seconds"))?;
    Ok(Duration::from_secs(seconds))
}

fn parse_amount(value: &str) -> Result<f64> {
    value
        .parse()
        .with_context(|| format!("'{value}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn run(db: &Database, line: &str) -> Result<String> {
        let mut out = Vec::new();
        run_line(db, line, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn created_id(output: &str) -> String {
        output
            .trim()
            .rsplit(' ')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_command_tree_is_valid() {
        ReplLine::command().debug_assert();
    }

    #[test]
    fn test_project_attribute_aliases_parse() {
        let parsed = ReplLine::try_parse_from(["project", "update", "abc", "-hr", "-5"])
            .expect("update should parse");
        match parsed.command {
            ReplCommand::Project(ProjectCommand::Update {
                attribute, value, ..
            }) => {
                assert_eq!(attribute, ProjectAttribute::HourlyRate);
                assert_eq!(value, "-5");
            }
            other => panic!("unexpected command: {other:?}"),
        }

        for (alias, expected) in [
            ("-c", ProjectAttribute::Client),
            ("-cd", ProjectAttribute::CreatedAt),
            ("desc", ProjectAttribute::Description),
            ("estimated-time", ProjectAttribute::EstimatedTime),
        ] {
            let parsed = ReplLine::try_parse_from(["project", "update", "abc", alias, "1"])
                .expect("alias should parse");
            assert!(matches!(
                parsed.command,
                ReplCommand::Project(ProjectCommand::Update { attribute, .. }) if attribute == expected
            ));
        }
    }

    #[test]
    fn test_quit_is_an_alias_of_exit() -> Result<()> {
        let db = Database::open_in_memory()?;
        let mut out = Vec::new();
        assert_eq!(run_line(&db, "quit", &mut out)?, Flow::Exit);
        assert_eq!(run_line(&db, "exit", &mut out)?, Flow::Exit);
        assert_eq!(run_line(&db, "   ", &mut out)?, Flow::Continue);
        Ok(())
    }

    #[test]
    fn test_unknown_command_is_a_one_line_error() -> Result<()> {
        let db = Database::open_in_memory()?;
        let err = run(&db, "frobnicate").expect_err("unknown command");
        assert!(!err.to_string().contains('\n'));
        assert!(!err.to_string().starts_with("error:"));
        Ok(())
    }

    #[test]
    fn test_create_db_and_list_tables() -> Result<()> {
        let db = Database::open_in_memory()?;
        assert_eq!(run(&db, "create-db")?, "Database already exists.\n");

        let tables = run(&db, "list-tables")?;
        assert!(tables.lines().any(|t| t == "Task_Time_Entries"));
        assert_eq!(tables.lines().count(), 7);
        Ok(())
    }

    #[test]
    fn test_config_show_reports_in_memory_store() -> Result<()> {
        let db = Database::open_in_memory()?;
        let shown = run(&db, "config show")?;
        assert!(shown.contains("config.toml"));
        assert!(shown.contains("Database: (in memory)"));
        Ok(())
    }

    #[test]
    fn test_project_workflow() -> Result<()> {
        let db = Database::open_in_memory()?;

        let client_id = created_id(&run(
            &db,
            r#"client add "XYZ Ltd" "Jane Smith" jane.smith@xyzltd.com 0612345678 +02:00"#,
        )?);
        let project_id = created_id(&run(
            &db,
            &format!(r#"project add "Website Redesign" --client {client_id}"#),
        )?);

        run(&db, &format!("project update {project_id} -hr 50"))?;
        run(&db, &format!("project update {project_id} desc \"New landing page\""))?;

        let project = db
            .project_repo()
            .get_by_id(&project_id)?
            .expect("project stored");
        assert_eq!(project.hourly_rate(), 50.0);
        assert_eq!(project.description(), "New landing page");
        assert_eq!(project.client().map(Client::company), Some("XYZ Ltd"));

        let listed = run(&db, &format!("project list --client {client_id}"))?;
        assert!(listed.contains("Website Redesign"));
        Ok(())
    }

    #[test]
    fn test_rejected_update_leaves_project_unchanged() -> Result<()> {
        let db = Database::open_in_memory()?;
        let project_id = created_id(&run(&db, "project add Audit")?);

        let err = run(&db, &format!("project update {project_id} hourly-rate -5"))
            .expect_err("negative rate");
        assert!(err.to_string().contains("hourly rate"));

        assert!(run(&db, &format!("project update {project_id} -c not-a-client")).is_err());

        let project = db
            .project_repo()
            .get_by_id(&project_id)?
            .expect("project stored");
        assert_eq!(project.hourly_rate(), 0.0);
        assert_eq!(project.client(), None);
        Ok(())
    }

    #[test]
    fn test_task_status_and_time_logging() -> Result<()> {
        let db = Database::open_in_memory()?;
        let project_id = created_id(&run(&db, "project add Website")?);
        let in_progress = db.task_status_repo().get_all()?.remove(1);

        let task_id = created_id(&run(&db, &format!("task add {project_id} Wireframes"))?);
        run(&db, &format!("task set-status {task_id} {}", in_progress.id()))?;

        let listed = run(&db, &format!("task list --status {}", in_progress.id()))?;
        assert!(listed.contains("Wireframes"));

        run(&db, &format!("log task {task_id} 1800"))?;
        run(&db, &format!("log project {project_id} 3600 --billable"))?;

        let entries = run(&db, "entries list --json")?;
        let view: serde_json::Value = serde_json::from_str(&entries)?;
        assert_eq!(view["project_entries"].as_array().map(Vec::len), Some(1));
        assert_eq!(view["task_entries"].as_array().map(Vec::len), Some(1));
        assert_eq!(view["project_entries"][0]["is_billable"], true);
        Ok(())
    }

    #[test]
    fn test_listing_and_deleting_survive_a_deleted_project() -> Result<()> {
        let db = Database::open_in_memory()?;
        let project_id = created_id(&run(&db, "project add Website")?);
        let task_id = created_id(&run(&db, &format!("task add {project_id} Wireframes"))?);
        run(&db, &format!("log task {task_id} 60"))?;
        run(&db, &format!("project delete {project_id}"))?;

        let listed = run(&db, "task list")?;
        assert!(listed.starts_with("(none)"));
        assert!(listed.contains("(orphaned) Tasks.project_id"));
        assert!(listed.contains(&task_id));

        let json = run(&db, "task list --json")?;
        assert_eq!(serde_json::from_str::<serde_json::Value>(&json)?, serde_json::json!([]));

        let entries = run(&db, "entries list")?;
        assert!(entries.contains("Task entries:\n(none)\n(orphaned) Tasks.project_id"));

        assert_eq!(run(&db, &format!("task delete {task_id}"))?, "Task successfully deleted.\n");
        assert_eq!(run(&db, "task list")?, "(none)\n");
        assert!(!db.task_repo().exists(&task_id.parse()?)?);

        let err = run(&db, &format!("task delete {task_id}")).unwrap_err();
        assert_eq!(err.to_string(), format!("task does not exist: {task_id}"));
        Ok(())
    }

    #[test]
    fn test_labels_list_as_json() -> Result<()> {
        let db = Database::open_in_memory()?;
        run(&db, "type add Research")?;

        let listed = run(&db, "type list --json")?;
        let types: serde_json::Value = serde_json::from_str(&listed)?;
        assert_eq!(types.as_array().map(Vec::len), Some(5));
        assert_eq!(types[4]["label"], "Research");
        Ok(())
    }
}
