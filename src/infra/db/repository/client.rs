use super::{Persisted, uuid_at};
use crate::domain::Client;
use anyhow::{Context, Result};
use rusqlite::{Connection, Row};
use uuid::Uuid;

struct ClientRow {
    id: Uuid,
    company: String,
    name: String,
    email: String,
    phone_number: String,
    timezone: String,
}

impl ClientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_at(row, 0)?,
            company: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            phone_number: row.get(4)?,
            timezone: row.get(5)?,
        })
    }

    fn into_client(self) -> Result<Client> {
        let id = self.id;
        Client::with_id(
            id,
            self.company,
            self.name,
            self.email,
            self.phone_number,
            self.timezone,
        )
        .with_context(|| format!("Stored client {id} failed validation"))
    }
}

impl Persisted for Client {
    const TABLE: &'static str = "Clients";

    fn entity_id(&self) -> Uuid {
        self.id()
    }

    fn insert_row(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO Clients (id, company, name, email, phone_number, timezone)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.company(),
                self.name(),
                self.email(),
                self.phone_number(),
                self.timezone(),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> Result<usize> {
        let changed = conn.execute(
            r#"
            UPDATE Clients
            SET company = ?2, name = ?3, email = ?4, phone_number = ?5, timezone = ?6
            WHERE id = ?1
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.company(),
                self.name(),
                self.email(),
                self.phone_number(),
                self.timezone(),
            ],
        )?;
        Ok(changed)
    }

    fn load(conn: &Connection, id: &Uuid) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, company, name, email, phone_number, timezone FROM Clients WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map([id.to_string()], ClientRow::from_row)?;

        match rows.next() {
            Some(row) => row?.into_client().map(Some),
            None => Ok(None),
        }
    }

    fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT id, company, name, email, phone_number, timezone FROM Clients")?;
        let rows = stmt.query_map([], ClientRow::from_row)?;

        let mut clients = Vec::new();
        for row in rows {
            clients.push(row?.into_client()?);
        }
        Ok(clients)
    }
}
