use super::client::Client;
use super::error::ValidationError;
use super::time::{millisecond_precision, now, whole_seconds};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for a project
pub type ProjectId = Uuid;

/// Caller-supplied fields of a project, validated when turned into a [`Project`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub client: Option<Client>,
    pub name: String,
    pub description: String,
    pub estimated_time: Option<Duration>,
    pub hourly_rate: f64,
    pub fixed_price: f64,
    pub created_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
}

impl NewProject {
    /// Unassigned project with no pricing, created now.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            client: None,
            name: name.into(),
            description: String::new(),
            estimated_time: None,
            hourly_rate: 0.0,
            fixed_price: 0.0,
            created_at: now(),
            deadline: None,
        }
    }
}

/// A piece of billable work, optionally assigned to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    id: ProjectId,
    client: Option<Client>,
    name: String,
    description: String,
    estimated_time: Option<Duration>,
    hourly_rate: f64,
    fixed_price: f64,
    created_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(fields: NewProject) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), fields)
    }

    /// Rebuilds a project with a known id, routing every field through its setter.
    pub fn with_id(id: ProjectId, fields: NewProject) -> Result<Self, ValidationError> {
        let mut project = Self {
            id,
            client: None,
            name: fields.name,
            description: fields.description,
            estimated_time: None,
            hourly_rate: 0.0,
            fixed_price: 0.0,
            created_at: fields.created_at,
            deadline: None,
        };
        project.set_client(fields.client);
        project.set_estimated_time(fields.estimated_time);
        project.set_hourly_rate(fields.hourly_rate)?;
        project.set_fixed_price(fields.fixed_price)?;
        project.set_created_at(fields.created_at);
        project.set_deadline(fields.deadline);
        Ok(project)
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    pub fn set_client(&mut self, client: Option<Client>) {
        self.client = client;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn estimated_time(&self) -> Option<Duration> {
        self.estimated_time
    }

    pub fn set_estimated_time(&mut self, estimated_time: Option<Duration>) {
        self.estimated_time = estimated_time.map(whole_seconds);
    }

    pub fn hourly_rate(&self) -> f64 {
        self.hourly_rate
    }

    pub fn set_hourly_rate(&mut self, hourly_rate: f64) -> Result<(), ValidationError> {
        if !hourly_rate.is_finite() || hourly_rate < 0.0 {
            return Err(ValidationError::HourlyRate(hourly_rate));
        }
        self.hourly_rate = hourly_rate;
        Ok(())
    }

    pub fn fixed_price(&self) -> f64 {
        self.fixed_price
    }

    pub fn set_fixed_price(&mut self, fixed_price: f64) -> Result<(), ValidationError> {
        if !fixed_price.is_finite() || fixed_price < 0.0 {
            return Err(ValidationError::FixedPrice(fixed_price));
        }
        self.fixed_price = fixed_price;
        Ok(())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = millisecond_precision(created_at);
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn set_deadline(&mut self, deadline: Option<DateTime<Utc>>) {
        self.deadline = deadline.map(millisecond_precision);
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.id, self.name)?;
        match &self.client {
            Some(client) => write!(f, " [{}]", client.company())?,
            None => write!(f, " [no client]")?,
        }
        write!(
            f,
            " rate={}/h fixed={} created={}",
            self.hourly_rate,
            self.fixed_price,
            self.created_at.to_rfc3339()
        )?;
        if let Some(estimate) = self.estimated_time {
            write!(f, " estimate={}s", estimate.as_secs())?;
        }
        if let Some(deadline) = self.deadline {
            write!(f, " deadline={}", deadline.to_rfc3339())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_rejects_negative_pricing() {
        let mut fields = NewProject::named("Website Redesign");
        fields.hourly_rate = -1.0;
        assert_eq!(
            Project::new(fields).unwrap_err(),
            ValidationError::HourlyRate(-1.0)
        );

        let mut fields = NewProject::named("Website Redesign");
        fields.fixed_price = f64::NAN;
        assert!(matches!(
            Project::new(fields),
            Err(ValidationError::FixedPrice(_))
        ));
    }

    #[test]
    fn test_project_setter_failure_keeps_previous_value() {
        let mut fields = NewProject::named("Website Redesign");
        fields.hourly_rate = 75.0;
        let mut project = Project::new(fields).unwrap();

        assert!(project.set_hourly_rate(-10.0).is_err());
        assert_eq!(project.hourly_rate(), 75.0);
    }

    #[test]
    fn test_project_rejects_infinite_amounts() {
        let mut project = Project::new(NewProject::named("Website Redesign")).unwrap();

        assert!(matches!(
            project.set_hourly_rate(f64::INFINITY),
            Err(ValidationError::HourlyRate(_))
        ));
        assert!(matches!(
            project.set_fixed_price(f64::INFINITY),
            Err(ValidationError::FixedPrice(_))
        ));

        let mut fields = NewProject::named("Website Redesign");
        fields.hourly_rate = f64::INFINITY;
        assert!(Project::new(fields).is_err());

        assert_eq!(project.hourly_rate(), 0.0);
        assert_eq!(project.fixed_price(), 0.0);
    }

    #[test]
    fn test_project_normalises_precision() {
        let mut fields = NewProject::named("Audit");
        fields.estimated_time = Some(Duration::from_millis(3_600_500));
        let project = Project::new(fields).unwrap();
        assert_eq!(project.estimated_time(), Some(Duration::from_secs(3_600)));
    }
}
