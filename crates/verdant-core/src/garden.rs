//! High-level garden API with async support.

use std::path::{Path, PathBuf};

use jiff::{civil::Date, tz::TimeZone, Zoned};
use tokio::task;

use crate::{
    bulk::{PlantQuery, Selection},
    calendar::{self, CalendarBuckets},
    care::{CarePlanIndex, CareStatus},
    db::Database,
    error::{GardenError, Result},
    models::{CarePlan, Goal, Plant, ScheduledItem, Todo},
    params::{BulkCare, CreateCarePlan, CreateGoal, CreatePlant, CreateTodo, Id, ListOverdue, MoveTodo},
    schedule::DragSnapshot,
};

/// Main garden interface: runs engine decisions against the store.
///
/// Every call opens its own connection on a blocking thread, reads a fresh
/// snapshot, and returns records only as the store confirmed them.
pub struct Garden {
    db_path: PathBuf,
}

impl Garden {
    fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the backing database file.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Creates a care plan.
    pub async fn create_care_plan(&self, params: &CreateCarePlan) -> Result<CarePlan> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let plan = db.create_care_plan(&params)?;
            log::info!("created care plan {}", plan.id);
            Ok(plan)
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Creates a plant, optionally attached to an existing care plan.
    pub async fn create_plant(&self, params: &CreatePlant) -> Result<Plant> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let plant = db.create_plant(&params)?;
            log::info!("created plant {}", plant.id);
            Ok(plant)
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Creates a todo.
    pub async fn create_todo(&self, params: &CreateTodo) -> Result<Todo> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let todo = db.create_todo(&params)?;
            log::info!("created todo {}", todo.id);
            Ok(todo)
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Creates a goal for a month.
    pub async fn create_goal(&self, params: &CreateGoal) -> Result<Goal> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let goal = db.create_goal(&params)?;
            log::info!("created goal {}", goal.id);
            Ok(goal)
        })
        .await
        .map_err(GardenError::join)?
    }

    pub async fn list_care_plans(&self) -> Result<Vec<CarePlan>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.fetch_care_plans()
        })
        .await
        .map_err(GardenError::join)?
    }

    pub async fn list_plants(&self) -> Result<Vec<Plant>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.fetch_plants()
        })
        .await
        .map_err(GardenError::join)?
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.fetch_todos()
        })
        .await
        .map_err(GardenError::join)?
    }

    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.fetch_goals()
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Retrieves a plant by its ID.
    pub async fn get_plant(&self, params: &Id) -> Result<Option<Plant>> {
        let db_path = self.db_path.clone();
        let plant_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_plant(plant_id)
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Retrieves a todo by its ID.
    pub async fn get_todo(&self, params: &Id) -> Result<Option<Todo>> {
        let db_path = self.db_path.clone();
        let todo_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_todo(todo_id)
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Every plant with its overdue actions at `now`, in id order.
    pub async fn care_status(&self, now: &Zoned) -> Result<Vec<CareStatus>> {
        let db_path = self.db_path.clone();
        let now = now.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            let plants = db.fetch_plants()?;
            let plans = CarePlanIndex::new(db.fetch_care_plans()?);

            Ok(plants
                .iter()
                .map(|plant| plans.status(plant, &now))
                .collect())
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Plants that need care at `now`, narrowed by quick filters and search
    /// text.
    ///
    /// Without filters this is every plant overdue for anything; with filters
    /// a plant must be overdue for all of them.
    pub async fn overdue(&self, params: &ListOverdue, now: &Zoned) -> Result<Vec<CareStatus>> {
        let db_path = self.db_path.clone();
        let query = PlantQuery::from(params);
        let now = now.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            let plants = db.fetch_plants()?;
            let plans = CarePlanIndex::new(db.fetch_care_plans()?);

            Ok(query
                .apply(&plants, &plans, &now)
                .into_iter()
                .map(|plant| plans.status(plant, &now))
                .filter(CareStatus::is_overdue)
                .collect())
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Performs the filtered care actions on every matching plant at once.
    ///
    /// All plants matching the query are selected; a non-empty `ids` list
    /// narrows the selection to those plants. Each selected plant gets the
    /// same payload, stamped with `now`'s local date. The batch is written in
    /// a single transaction and the stored plants are returned.
    ///
    /// # Errors
    ///
    /// `GardenError::InvalidInput` when no plant is selected or no quick
    /// filter is active. The store is not touched in either case.
    pub async fn bulk_care(&self, params: &BulkCare, now: &Zoned) -> Result<Vec<Plant>> {
        let db_path = self.db_path.clone();
        let query = PlantQuery::from(params);
        let ids = params.ids.clone();
        let now = now.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let plants = db.fetch_plants()?;
            let plans = CarePlanIndex::new(db.fetch_care_plans()?);

            let mut selection = Selection::new(query.apply(&plants, &plans, &now));
            if !ids.is_empty() {
                selection.clear();
                for id in ids {
                    if !selection.toggle(id) {
                        log::debug!("plant {id} does not match the filters, skipped");
                    }
                }
            }

            let payloads = selection.payloads(&query.criteria, &now)?;
            let updated = db.update_plants(&payloads)?;
            log::info!("recorded care for {} plants", updated.len());
            Ok(updated)
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Todos and goals grouped by due day in `tz`.
    pub async fn calendar(&self, tz: &TimeZone) -> Result<CalendarBuckets> {
        let db_path = self.db_path.clone();
        let tz = tz.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            let todos = db.fetch_todos()?;
            let goals = db.fetch_goals()?;
            Ok(calendar::aggregate(&todos, &goals, &tz))
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Completes a drag by writing the decided move, if any.
    ///
    /// Returns the stored todo after a confirmed write, or `None` when the
    /// drop needs no write (a goal, or the same day).
    pub async fn move_todo(&self, drag: DragSnapshot, day: Date) -> Result<Option<Todo>> {
        let Some(intent) = drag.drop_on(day) else {
            return Ok(None);
        };
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let todo = db.update_todo(intent.id, intent.due_on)?;
            log::info!("moved todo {} to {}", todo.id, intent.due_on);
            Ok(Some(todo))
        })
        .await
        .map_err(GardenError::join)?
    }

    /// Moves a stored todo to another day.
    ///
    /// A todo that is not on the calendar yet is simply given the new day.
    /// Otherwise this is a drag from its current day to `params.due_on`.
    ///
    /// # Errors
    ///
    /// `GardenError::TodoNotFound` if no todo has this id.
    pub async fn reschedule_todo(&self, params: &MoveTodo, tz: &TimeZone) -> Result<Option<Todo>> {
        let todo = self
            .get_todo(&Id { id: params.id })
            .await?
            .ok_or(GardenError::TodoNotFound { id: params.id })?;

        match ScheduledItem::from_todo(&todo, tz) {
            Some(item) => self.move_todo(DragSnapshot::start(&item), params.due_on).await,
            None => {
                let db_path = self.db_path.clone();
                let (id, due_on) = (params.id, params.due_on);

                task::spawn_blocking(move || {
                    let mut db = Database::new(&db_path)?;
                    let todo = db.update_todo(id, due_on)?;
                    log::info!("scheduled todo {id} on {due_on}");
                    Ok(Some(todo))
                })
                .await
                .map_err(GardenError::join)?
            }
        }
    }
}

/// Builder for configuring and creating [`Garden`] instances.
pub struct GardenBuilder {
    database_path: Option<PathBuf>,
}

impl GardenBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/verdant/verdant.db` or `~/.local/share/verdant/verdant.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the configured garden.
    ///
    /// # Errors
    ///
    /// Returns `GardenError::FileSystem` if the database directory cannot be
    /// created, `GardenError::Database` if schema initialization fails
    pub async fn build(self) -> Result<Garden> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| GardenError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        // Test database connection
        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), GardenError>(())
        })
        .await
        .map_err(GardenError::join)??;

        log::debug!("using database {}", db_path.display());
        Ok(Garden::new(db_path))
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("verdant")
            .place_data_file("verdant.db")
            .map_err(|e| GardenError::XdgDirectory(e.to_string()))
    }
}

impl Default for GardenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
