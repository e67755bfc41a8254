mod common;

use common::{create_test_garden, noon};
use jiff::{civil::date, tz::TimeZone};
use verdant_core::{
    params::{BulkCare, CreateCarePlan, CreateGoal, CreatePlant, CreateTodo, Id, ListOverdue, MoveTodo},
    ActionKind, DragSnapshot, Garden, GardenBuilder, GardenError, ItemKind, QuickFilter,
};

async fn seed_plan(garden: &Garden) -> u64 {
    garden
        .create_care_plan(&CreateCarePlan {
            name: "Weekly everything".to_string(),
            watering: Some(7),
            fertilizing: Some(30),
            cleaning: Some(7),
            potting: Some(7),
        })
        .await
        .expect("Failed to create care plan")
        .id
}

async fn seed_plant(
    garden: &Garden,
    name: &str,
    plan_id: u64,
    watered_on: Option<&str>,
    potted_on: Option<&str>,
) -> u64 {
    garden
        .create_plant(&CreatePlant {
            name: name.to_string(),
            system: Some("South window".to_string()),
            care_plan_id: Some(plan_id),
            watered_on: watered_on.map(str::to_string),
            fertilized_on: Some("2024-05-31".to_string()),
            cleansed_on: Some("2024-05-31".to_string()),
            potted_on: potted_on.map(str::to_string),
            ..Default::default()
        })
        .await
        .expect("Failed to create plant")
        .id
}

#[tokio::test]
async fn test_builder_creates_missing_directories() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("nested").join("dir").join("garden.db");

    let garden = GardenBuilder::new()
        .with_database_path(&db_path)
        .build()
        .await
        .expect("Failed to create garden");

    assert!(db_path.exists());
    assert_eq!(garden.database_path(), db_path.as_path());
}

#[tokio::test]
async fn test_overdue_uses_strict_threshold() {
    let (_temp_dir, garden) = create_test_garden().await;
    let plan = seed_plan(&garden).await;
    let on_time = seed_plant(&garden, "Fittonia", plan, Some("2024-05-25"), Some("2024-05-31")).await;
    let late = seed_plant(&garden, "Calathea", plan, Some("2024-05-24"), Some("2024-05-31")).await;

    let statuses = garden
        .overdue(&ListOverdue::default(), &noon(2024, 6, 1))
        .await
        .expect("Failed to list overdue plants");

    let ids: Vec<u64> = statuses.iter().map(|status| status.plant.id).collect();
    assert_eq!(ids, vec![late]);
    assert!(!ids.contains(&on_time));
    assert_eq!(
        statuses[0].overdue.iter().copied().collect::<Vec<_>>(),
        vec![ActionKind::Water]
    );
}

#[tokio::test]
async fn test_overdue_filters_and_search() {
    let (_temp_dir, garden) = create_test_garden().await;
    let plan = seed_plan(&garden).await;
    let both = seed_plant(&garden, "Monstera", plan, Some("2024-05-01"), Some("2024-05-01")).await;
    seed_plant(&garden, "Maranta", plan, Some("2024-05-01"), Some("2024-05-31")).await;
    seed_plant(&garden, "Hoya", plan, Some("2024-05-31"), Some("2024-05-01")).await;

    let now = noon(2024, 6, 1);
    let water_and_repot = garden
        .overdue(
            &ListOverdue {
                search: None,
                filters: vec![QuickFilter::Water, QuickFilter::Repot],
            },
            &now,
        )
        .await
        .expect("Failed to list overdue plants");
    assert_eq!(water_and_repot.len(), 1);
    assert_eq!(water_and_repot[0].plant.id, both);

    let searched = garden
        .overdue(
            &ListOverdue {
                search: Some("MAR".to_string()),
                filters: vec![QuickFilter::Water],
            },
            &now,
        )
        .await
        .expect("Failed to list overdue plants");
    let names: Vec<&str> = searched.iter().map(|s| s.plant.name.as_str()).collect();
    assert_eq!(names, vec!["Maranta"]);
}

#[tokio::test]
async fn test_care_status_reports_next_due() {
    let (_temp_dir, garden) = create_test_garden().await;
    let plan = seed_plan(&garden).await;
    seed_plant(&garden, "Syngonium", plan, Some("2024-05-28"), None).await;

    let statuses = garden
        .care_status(&noon(2024, 6, 1))
        .await
        .expect("Failed to evaluate care status");

    let status = &statuses[0];
    assert_eq!(status.next_due[&ActionKind::Water], date(2024, 6, 5));
    // Never repotted, so due today
    assert_eq!(status.next_due[&ActionKind::Repot], date(2024, 6, 1));
    assert!(status.overdue.contains(&ActionKind::Repot));
}

#[tokio::test]
async fn test_bulk_care_stamps_selected_plants() {
    let (_temp_dir, garden) = create_test_garden().await;
    let plan = seed_plan(&garden).await;
    let first = seed_plant(&garden, "Anthurium", plan, Some("2024-05-01"), Some("2024-05-01")).await;
    let second = seed_plant(&garden, "Alocasia", plan, Some("2024-05-01"), Some("2024-05-31")).await;

    let updated = garden
        .bulk_care(
            &BulkCare {
                search: None,
                filters: vec![QuickFilter::Water, QuickFilter::Repot],
                ids: Vec::new(),
            },
            &noon(2024, 6, 1),
        )
        .await
        .expect("Failed to record care");

    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].id, first);
    assert_eq!(updated[0].watered_on.as_deref(), Some("2024-06-01"));
    assert_eq!(updated[0].potted_on.as_deref(), Some("2024-06-01"));
    // Untouched stamps keep their stored value
    assert_eq!(updated[0].fertilized_on.as_deref(), Some("2024-05-31"));

    let untouched = garden
        .get_plant(&Id { id: second })
        .await
        .expect("Failed to get plant")
        .expect("Plant should exist");
    assert_eq!(untouched.watered_on.as_deref(), Some("2024-05-01"));
}

#[tokio::test]
async fn test_bulk_care_narrowed_by_ids() {
    let (_temp_dir, garden) = create_test_garden().await;
    let plan = seed_plan(&garden).await;
    let first = seed_plant(&garden, "Anthurium", plan, Some("2024-05-01"), None).await;
    let second = seed_plant(&garden, "Alocasia", plan, Some("2024-05-01"), None).await;

    let updated = garden
        .bulk_care(
            &BulkCare {
                search: None,
                filters: vec![QuickFilter::Water],
                ids: vec![second, 999],
            },
            &noon(2024, 6, 1),
        )
        .await
        .expect("Failed to record care");

    let ids: Vec<u64> = updated.iter().map(|plant| plant.id).collect();
    assert_eq!(ids, vec![second]);

    let skipped = garden
        .get_plant(&Id { id: first })
        .await
        .expect("Failed to get plant")
        .expect("Plant should exist");
    assert_eq!(skipped.watered_on.as_deref(), Some("2024-05-01"));
}

#[tokio::test]
async fn test_bulk_care_with_empty_selection_writes_nothing() {
    let (_temp_dir, garden) = create_test_garden().await;
    let plan = seed_plan(&garden).await;
    let id = seed_plant(&garden, "Hoya", plan, Some("2024-05-31"), None).await;

    // Nothing is overdue for water, so nothing can be selected
    let result = garden
        .bulk_care(
            &BulkCare {
                search: None,
                filters: vec![QuickFilter::Water],
                ids: Vec::new(),
            },
            &noon(2024, 6, 1),
        )
        .await;

    match result {
        Err(GardenError::InvalidInput { reason, .. }) => {
            assert_eq!(reason, "Please select at least one plant");
        }
        other => panic!("expected an invalid selection, got {other:?}"),
    }

    let plant = garden
        .get_plant(&Id { id })
        .await
        .expect("Failed to get plant")
        .expect("Plant should exist");
    assert_eq!(plant.watered_on.as_deref(), Some("2024-05-31"));
}

#[tokio::test]
async fn test_calendar_buckets_todos_and_goals() {
    let (_temp_dir, garden) = create_test_garden().await;
    garden
        .create_todo(&CreateTodo {
            name: "Order perlite".to_string(),
            description: None,
            due_on: Some("2024-03-15".to_string()),
        })
        .await
        .expect("Failed to create todo");
    garden
        .create_todo(&CreateTodo {
            name: "Someday".to_string(),
            description: None,
            due_on: None,
        })
        .await
        .expect("Failed to create todo");
    garden
        .create_goal(&CreateGoal {
            name: "Propagate pothos".to_string(),
            due_month: "2024-03".to_string(),
        })
        .await
        .expect("Failed to create goal");

    let buckets = garden
        .calendar(&TimeZone::UTC)
        .await
        .expect("Failed to build calendar");

    let keys: Vec<String> = buckets.to_keyed().into_keys().collect();
    assert_eq!(keys, vec!["2024-03-15", "2024-03-31"]);
    assert_eq!(buckets.item_count(), 2);
    assert_eq!(buckets.get(date(2024, 3, 31))[0].kind, ItemKind::Goal);
}

#[tokio::test]
async fn test_move_todo_writes_confirmed_day() {
    let (_temp_dir, garden) = create_test_garden().await;
    let todo = garden
        .create_todo(&CreateTodo {
            name: "Mist orchids".to_string(),
            description: None,
            due_on: Some("2024-03-15".to_string()),
        })
        .await
        .expect("Failed to create todo");

    let buckets = garden
        .calendar(&TimeZone::UTC)
        .await
        .expect("Failed to build calendar");
    let drag = DragSnapshot::start(&buckets.get(date(2024, 3, 15))[0]);

    let moved = garden
        .move_todo(drag.clone(), date(2024, 3, 18))
        .await
        .expect("Failed to move todo")
        .expect("Todo should move");
    assert_eq!(moved.id, todo.id);
    assert_eq!(moved.due_on.as_deref(), Some("2024-03-18"));

    // Dropping on the origin day is a no-op
    assert!(garden
        .move_todo(drag, date(2024, 3, 15))
        .await
        .expect("Failed to move todo")
        .is_none());
}

#[tokio::test]
async fn test_goals_cannot_be_moved() {
    let (_temp_dir, garden) = create_test_garden().await;
    garden
        .create_goal(&CreateGoal {
            name: "Repot the fig".to_string(),
            due_month: "2024-04".to_string(),
        })
        .await
        .expect("Failed to create goal");

    let buckets = garden
        .calendar(&TimeZone::UTC)
        .await
        .expect("Failed to build calendar");
    let drag = DragSnapshot::start(&buckets.get(date(2024, 4, 30))[0]);

    let result = garden
        .move_todo(drag, date(2024, 4, 2))
        .await
        .expect("Goal drop should not fail");
    assert!(result.is_none());

    let goals = garden.list_goals().await.expect("Failed to list goals");
    assert_eq!(goals[0].due_month, "2024-04");
}

#[tokio::test]
async fn test_failed_move_leaves_store_unchanged() {
    let (_temp_dir, garden) = create_test_garden().await;
    let todo = garden
        .create_todo(&CreateTodo {
            name: "Clean grow lights".to_string(),
            description: None,
            due_on: Some("2024-03-15".to_string()),
        })
        .await
        .expect("Failed to create todo");

    let buckets = garden
        .calendar(&TimeZone::UTC)
        .await
        .expect("Failed to build calendar");
    let mut item = buckets.get(date(2024, 3, 15))[0].clone();
    // Point the drag at a todo that does not exist
    item.id = 404;

    let result = garden
        .move_todo(DragSnapshot::start(&item), date(2024, 3, 20))
        .await;
    assert!(matches!(result, Err(GardenError::TodoNotFound { id: 404 })));

    let stored = garden
        .get_todo(&Id { id: todo.id })
        .await
        .expect("Failed to get todo")
        .expect("Todo should exist");
    assert_eq!(stored.due_on.as_deref(), Some("2024-03-15"));
}

#[tokio::test]
async fn test_reschedule_todo() {
    let (_temp_dir, garden) = create_test_garden().await;
    let scheduled = garden
        .create_todo(&CreateTodo {
            name: "Refresh soil".to_string(),
            description: None,
            due_on: Some("2024-03-15T09:00:00Z".to_string()),
        })
        .await
        .expect("Failed to create todo");
    let unscheduled = garden
        .create_todo(&CreateTodo {
            name: "Buy a moss pole".to_string(),
            description: None,
            due_on: None,
        })
        .await
        .expect("Failed to create todo");

    let same_day = garden
        .reschedule_todo(
            &MoveTodo {
                id: scheduled.id,
                due_on: date(2024, 3, 15),
            },
            &TimeZone::UTC,
        )
        .await
        .expect("Failed to reschedule todo");
    assert!(same_day.is_none());

    let placed = garden
        .reschedule_todo(
            &MoveTodo {
                id: unscheduled.id,
                due_on: date(2024, 3, 22),
            },
            &TimeZone::UTC,
        )
        .await
        .expect("Failed to reschedule todo")
        .expect("Todo should be scheduled");
    assert_eq!(placed.due_on.as_deref(), Some("2024-03-22"));

    let missing = garden
        .reschedule_todo(
            &MoveTodo {
                id: 999,
                due_on: date(2024, 3, 22),
            },
            &TimeZone::UTC,
        )
        .await;
    assert!(matches!(missing, Err(GardenError::TodoNotFound { id: 999 })));
}
