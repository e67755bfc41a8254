//! SQLite data layer for plants, care plans, todos and goals.
//!
//! This is the backing store the engine reads snapshots from and sends update
//! payloads to. Each write runs in its own transaction and returns the record
//! as stored, so callers only ever adopt confirmed state.

use std::path::Path;

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::{
    dates::{self, CalendarMonth},
    error::{DatabaseResultExt, GardenError, Result},
    models::{CarePlan, Goal, Phase, Plant, PlantCareUpdate, Todo},
    params::{CreateCarePlan, CreateGoal, CreatePlant, CreateTodo},
};

const PLANT_COLUMNS: &str = "id, name, phase, system, care_plan_id, watered_on, fertilized_on, cleansed_on, potted_on";
const TODO_COLUMNS: &str = "id, name, description, due_on";

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initializes the database schema using the embedded SQL file.
    fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        Ok(())
    }

    fn require_name(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(GardenError::invalid_input(field).with_reason("must not be empty"));
        }
        Ok(())
    }

    /// Creates a care plan. Zero frequencies are stored as untracked.
    pub fn create_care_plan(&mut self, params: &CreateCarePlan) -> Result<CarePlan> {
        Self::require_name("name", &params.name)?;

        let tracked = |days: Option<u32>| days.filter(|days| *days > 0);
        let plan = CarePlan {
            id: 0,
            name: params.name.trim().to_string(),
            watering: tracked(params.watering),
            fertilizing: tracked(params.fertilizing),
            cleaning: tracked(params.cleaning),
            potting: tracked(params.potting),
        };

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            "INSERT INTO care_plans (name, watering, fertilizing, cleaning, potting, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &plan.name,
                plan.watering,
                plan.fertilizing,
                plan.cleaning,
                plan.potting,
                Timestamp::now().to_string()
            ],
        )
        .db_context("Failed to insert care plan")?;

        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(CarePlan { id, ..plan })
    }

    /// Creates a plant. The referenced care plan, if any, must exist.
    pub fn create_plant(&mut self, params: &CreatePlant) -> Result<Plant> {
        Self::require_name("name", &params.name)?;
        if let Some(plan_id) = params.care_plan_id {
            if self.get_care_plan(plan_id)?.is_none() {
                return Err(GardenError::CarePlanNotFound { id: plan_id });
            }
        }

        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            "INSERT INTO plants (name, phase, system, care_plan_id, watered_on, fertilized_on, cleansed_on, potted_on, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                params.name.trim(),
                params.phase.as_str(),
                params.system.as_deref(),
                params.care_plan_id.map(|id| id as i64),
                params.watered_on.as_deref(),
                params.fertilized_on.as_deref(),
                params.cleansed_on.as_deref(),
                params.potted_on.as_deref(),
                &now,
                &now
            ],
        )
        .db_context("Failed to insert plant")?;

        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Plant {
            id,
            name: params.name.trim().to_string(),
            phase: params.phase,
            system: params.system.clone(),
            care_plan_id: params.care_plan_id,
            watered_on: params.watered_on.clone(),
            fertilized_on: params.fertilized_on.clone(),
            cleansed_on: params.cleansed_on.clone(),
            potted_on: params.potted_on.clone(),
        })
    }

    /// Creates a todo. The due date is stored as given.
    pub fn create_todo(&mut self, params: &CreateTodo) -> Result<Todo> {
        Self::require_name("name", &params.name)?;

        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            "INSERT INTO todos (name, description, due_on, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                params.name.trim(),
                params.description.as_deref(),
                params.due_on.as_deref(),
                &now,
                &now
            ],
        )
        .db_context("Failed to insert todo")?;

        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Todo {
            id,
            name: params.name.trim().to_string(),
            description: params.description.clone(),
            due_on: params.due_on.clone(),
        })
    }

    /// Creates a goal. The month must read as `YYYY-MM` and is stored in that
    /// form.
    pub fn create_goal(&mut self, params: &CreateGoal) -> Result<Goal> {
        Self::require_name("name", &params.name)?;
        let month: CalendarMonth = params.due_month.parse().map_err(|_| {
            GardenError::invalid_input("due_month")
                .with_reason(format!("expected YYYY-MM, got '{}'", params.due_month))
        })?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            "INSERT INTO goals (name, due_month, created_at) VALUES (?1, ?2, ?3)",
            params![
                params.name.trim(),
                month.to_string(),
                Timestamp::now().to_string()
            ],
        )
        .db_context("Failed to insert goal")?;

        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Goal {
            id,
            name: params.name.trim().to_string(),
            due_month: month.to_string(),
        })
    }

    /// All care plans, by id.
    pub fn fetch_care_plans(&self) -> Result<Vec<CarePlan>> {
        let mut stmt = self
            .connection
            .prepare("SELECT id, name, watering, fertilizing, cleaning, potting FROM care_plans ORDER BY id")
            .db_context("Failed to prepare query")?;

        let plans = stmt
            .query_map([], care_plan_from_row)
            .db_context("Failed to query care plans")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read care plans")?;

        Ok(plans)
    }

    /// Retrieves a care plan by its ID.
    pub fn get_care_plan(&self, id: u64) -> Result<Option<CarePlan>> {
        self.connection
            .query_row(
                "SELECT id, name, watering, fertilizing, cleaning, potting FROM care_plans WHERE id = ?1",
                params![id as i64],
                care_plan_from_row,
            )
            .optional()
            .db_context("Failed to query care plan")
    }

    /// All plants, by id.
    pub fn fetch_plants(&self) -> Result<Vec<Plant>> {
        let mut stmt = self
            .connection
            .prepare(&format!("SELECT {PLANT_COLUMNS} FROM plants ORDER BY id"))
            .db_context("Failed to prepare query")?;

        let plants = stmt
            .query_map([], plant_from_row)
            .db_context("Failed to query plants")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read plants")?;

        Ok(plants)
    }

    /// Retrieves a plant by its ID.
    pub fn get_plant(&self, id: u64) -> Result<Option<Plant>> {
        plant_by_id(&self.connection, id)
    }

    /// All todos, by id.
    pub fn fetch_todos(&self) -> Result<Vec<Todo>> {
        let mut stmt = self
            .connection
            .prepare(&format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY id"))
            .db_context("Failed to prepare query")?;

        let todos = stmt
            .query_map([], todo_from_row)
            .db_context("Failed to query todos")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read todos")?;

        Ok(todos)
    }

    /// Retrieves a todo by its ID.
    pub fn get_todo(&self, id: u64) -> Result<Option<Todo>> {
        self.connection
            .query_row(
                &format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1"),
                params![id as i64],
                todo_from_row,
            )
            .optional()
            .db_context("Failed to query todo")
    }

    /// All goals, by id.
    pub fn fetch_goals(&self) -> Result<Vec<Goal>> {
        let mut stmt = self
            .connection
            .prepare("SELECT id, name, due_month FROM goals ORDER BY id")
            .db_context("Failed to prepare query")?;

        let goals = stmt
            .query_map([], |row| {
                Ok(Goal {
                    id: row.get::<_, i64>(0)? as u64,
                    name: row.get(1)?,
                    due_month: row.get(2)?,
                })
            })
            .db_context("Failed to query goals")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read goals")?;

        Ok(goals)
    }

    /// Sets a todo's due day and returns the stored todo.
    ///
    /// # Errors
    ///
    /// `GardenError::TodoNotFound` when no todo has this id; nothing is
    /// written in that case.
    pub fn update_todo(&mut self, id: u64, due_on: Date) -> Result<Todo> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let changed = tx
            .execute(
                "UPDATE todos SET due_on = ?1, updated_at = ?2 WHERE id = ?3",
                params![
                    dates::day_key(due_on),
                    Timestamp::now().to_string(),
                    id as i64
                ],
            )
            .db_context("Failed to update todo")?;

        if changed == 0 {
            return Err(GardenError::TodoNotFound { id });
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_todo(id)?.ok_or(GardenError::TodoNotFound { id })
    }

    /// Applies a care payload to a plant and returns the stored plant.
    ///
    /// Only the stamps present in `update` are written.
    pub fn update_plant(&mut self, id: u64, update: &PlantCareUpdate) -> Result<Plant> {
        self.update_plants(&[(id, update.clone())])?
            .pop()
            .ok_or(GardenError::PlantNotFound { id })
    }

    /// Applies several care payloads in one transaction.
    ///
    /// Either every plant is updated or none is: a missing plant rolls back
    /// the whole batch. Returned plants are read back before the commit, one
    /// per payload.
    pub fn update_plants(&mut self, updates: &[(u64, PlantCareUpdate)]) -> Result<Vec<Plant>> {
        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        for (id, update) in updates {
            let changed = tx
                .execute(
                    "UPDATE plants SET
                        watered_on = COALESCE(?1, watered_on),
                        fertilized_on = COALESCE(?2, fertilized_on),
                        cleansed_on = COALESCE(?3, cleansed_on),
                        potted_on = COALESCE(?4, potted_on),
                        updated_at = ?5
                     WHERE id = ?6",
                    params![
                        update.watered_on.map(dates::day_key),
                        update.fertilized_on.map(dates::day_key),
                        update.cleansed_on.map(dates::day_key),
                        update.potted_on.map(dates::day_key),
                        &now,
                        *id as i64
                    ],
                )
                .db_context("Failed to update plant")?;

            if changed == 0 {
                return Err(GardenError::PlantNotFound { id: *id });
            }
        }

        let mut updated = Vec::with_capacity(updates.len());
        for (id, _) in updates {
            let plant = plant_by_id(&tx, *id)?.ok_or(GardenError::PlantNotFound { id: *id })?;
            updated.push(plant);
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }
}

fn plant_by_id(connection: &Connection, id: u64) -> Result<Option<Plant>> {
    connection
        .query_row(
            &format!("SELECT {PLANT_COLUMNS} FROM plants WHERE id = ?1"),
            params![id as i64],
            plant_from_row,
        )
        .optional()
        .db_context("Failed to query plant")
}

fn care_plan_from_row(row: &Row<'_>) -> rusqlite::Result<CarePlan> {
    Ok(CarePlan {
        id: row.get::<_, i64>(0)? as u64,
        name: row.get(1)?,
        watering: row.get(2)?,
        fertilizing: row.get(3)?,
        cleaning: row.get(4)?,
        potting: row.get(5)?,
    })
}

fn plant_from_row(row: &Row<'_>) -> rusqlite::Result<Plant> {
    let phase_str: String = row.get(2)?;
    let phase = phase_str.parse::<Phase>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })?;

    Ok(Plant {
        id: row.get::<_, i64>(0)? as u64,
        name: row.get(1)?,
        phase,
        system: row.get(3)?,
        care_plan_id: row.get::<_, Option<i64>>(4)?.map(|id| id as u64),
        watered_on: row.get(5)?,
        fertilized_on: row.get(6)?,
        cleansed_on: row.get(7)?,
        potted_on: row.get(8)?,
    })
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get::<_, i64>(0)? as u64,
        name: row.get(1)?,
        description: row.get(2)?,
        due_on: row.get(3)?,
    })
}
