//! Domain types for the TimeTracker application
//! Defines the entities tracked by the application and the rules their fields obey.

pub mod client;
pub mod error;
pub mod project;
pub mod task;
pub mod task_label;
pub mod time;
pub mod time_entry;

pub use client::*;
pub use error::*;
pub use project::*;
pub use task::*;
pub use task_label::*;
pub use time_entry::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_entities_compare_by_id_and_fields() {
        let client = Client::new("XYZ Ltd", "Jane", "jane@xyzltd.com", "0612345678", "+02:00")
            .unwrap();
        let same = Client::with_id(
            client.id(),
            "XYZ Ltd",
            "Jane",
            "jane@xyzltd.com",
            "0612345678",
            "+02:00",
        )
        .unwrap();
        assert_eq!(client, same);

        let other_id = Client::new("XYZ Ltd", "Jane", "jane@xyzltd.com", "0612345678", "+02:00")
            .unwrap();
        assert_ne!(client, other_id);

        let mut renamed = same.clone();
        renamed.set_name("Janet");
        assert_ne!(client, renamed);
    }

    #[test]
    fn test_time_entries_store_whole_seconds() {
        let project = Project::new(NewProject::named("Support")).unwrap();
        let entry = ProjectTimeEntry::new(project, Duration::from_millis(1_500), true);
        assert_eq!(entry.duration(), Duration::from_secs(1));
        assert!(entry.is_billable());
    }
}
