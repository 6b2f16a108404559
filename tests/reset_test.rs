mod common;

use proptest::prelude::*;
use serde_json::{json, Value};

use common::MemoryStore;
use family_board_tools::reset::{reset_member_points, reset_recurring_chores};
use family_board_tools::BoardError;

fn household() -> MemoryStore {
    MemoryStore::new()
        .with_table(
            "chores",
            vec![
                json!({"id": 1, "title": "Dishes", "recurring_days": ["mon", "thu"], "is_completed": true, "completed_at": "2024-01-02T10:00:00Z"}),
                json!({"id": 2, "title": "Laundry", "recurring_days": "sat", "is_completed": true, "completed_at": "2024-01-03T10:00:00Z"}),
                json!({"id": 3, "title": "Garage", "recurring_days": null, "is_completed": true, "completed_at": "2024-01-03T11:00:00Z"}),
                json!({"id": 4, "title": "Attic", "recurring_days": "", "is_completed": true, "completed_at": "2024-01-04T11:00:00Z"}),
                json!({"id": 5, "title": "Windows", "recurring_days": [], "is_completed": true, "completed_at": "2024-01-04T12:00:00Z"}),
                json!({"id": 6, "title": "Beds", "recurring_days": ["sun"], "is_completed": false, "completed_at": null}),
            ],
        )
        .with_table(
            "family_members",
            vec![
                json!({"id": "a", "name": "Ann", "points": 30}),
                json!({"id": "b", "name": "Ben", "points": 0}),
                json!({"id": "c", "name": "Cal", "points": 12}),
            ],
        )
}

fn field(store: &MemoryStore, table: &str, id: &str, column: &str) -> Value {
    store
        .find(table, id)
        .and_then(|row| row.get(column).cloned())
        .unwrap_or(Value::Null)
}

#[tokio::test]
async fn test_recurring_chores_are_reset() {
    let store = household();

    let count = reset_recurring_chores(&store).await.unwrap();
    assert_eq!(count, 3);

    for id in ["1", "2", "6"] {
        assert_eq!(field(&store, "chores", id, "is_completed"), json!(false), "chore {id}");
        assert_eq!(field(&store, "chores", id, "completed_at"), Value::Null, "chore {id}");
    }
}

#[tokio::test]
async fn test_non_recurring_chores_are_untouched() {
    let store = household();
    let before = store.table("chores");

    reset_recurring_chores(&store).await.unwrap();

    for id in ["3", "4", "5"] {
        let original = before.iter().find(|r| r.get("id") == Some(&json!(id.parse::<u32>().unwrap())));
        assert_eq!(store.find("chores", id).as_ref(), original, "chore {id}");
    }
    // Points are only touched on request
    assert_eq!(field(&store, "family_members", "a", "points"), json!(30));
}

#[tokio::test]
async fn test_no_recurring_chores() {
    let store = MemoryStore::new().with_table(
        "chores",
        vec![json!({"id": 1, "recurring_days": null}), json!({"id": 2, "recurring_days": []})],
    );

    assert_eq!(reset_recurring_chores(&store).await.unwrap(), 0);
    assert_eq!(store.update_count(), 0);
}

#[tokio::test]
async fn test_recurring_chore_named_by_web_app() {
    let store = MemoryStore::new().with_table(
        "chores",
        vec![json!({"id": "c-1", "name": "Feed cat", "recurring_days": ["mon"], "is_completed": true,
                    "completed_at": "2024-01-01T07:00:00Z", "points": 5})],
    );

    assert_eq!(reset_recurring_chores(&store).await.unwrap(), 1);
    let chore = store.find("chores", "c-1").unwrap();
    assert_eq!(chore.get("is_completed"), Some(&json!(false)));
    assert_eq!(chore.get("name"), Some(&json!("Feed cat")));
    assert_eq!(chore.get("points"), Some(&json!(5)));
}

#[tokio::test]
async fn test_member_points_reset() {
    let store = household();

    let count = reset_member_points(&store).await.unwrap();
    assert_eq!(count, 3);
    for id in ["a", "b", "c"] {
        assert_eq!(field(&store, "family_members", id, "points"), json!(0));
    }
    assert_eq!(field(&store, "family_members", "a", "name"), json!("Ann"));
}

#[tokio::test]
async fn test_no_members() {
    let store = MemoryStore::new();
    assert_eq!(reset_member_points(&store).await.unwrap(), 0);
    assert_eq!(store.update_count(), 0);
}

#[tokio::test]
async fn test_failed_update_aborts_remaining_rows() {
    let store = household().fail_updates_after(1);

    let result = reset_recurring_chores(&store).await;
    assert!(matches!(result, Err(BoardError::Status { status: 503, .. })));

    // First chore already reset, the others keep their state
    assert_eq!(field(&store, "chores", "1", "is_completed"), json!(false));
    assert_eq!(field(&store, "chores", "2", "is_completed"), json!(true));
}

#[tokio::test]
async fn test_reset_twice_is_idempotent() {
    let once = household();
    reset_recurring_chores(&once).await.unwrap();
    reset_member_points(&once).await.unwrap();

    let twice = household();
    for _ in 0..2 {
        reset_recurring_chores(&twice).await.unwrap();
        reset_member_points(&twice).await.unwrap();
    }

    assert_eq!(once.table("chores"), twice.table("chores"));
    assert_eq!(once.table("family_members"), twice.table("family_members"));
}

fn recurrence() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!("")),
        Just(json!([])),
        Just(json!(["mon"])),
        Just(json!("tue,fri")),
    ]
}

proptest! {
    #[test]
    fn prop_only_recurring_chores_change(days in proptest::collection::vec((recurrence(), any::<bool>()), 0..20)) {
        let chores: Vec<Value> = days
            .iter()
            .enumerate()
            .map(|(i, (d, done))| {
                let completed_at = if *done { json!("2024-01-02T10:00:00Z") } else { Value::Null };
                json!({
                    "id": i,
                    "recurring_days": d,
                    "is_completed": done,
                    "completed_at": completed_at,
                })
            })
            .collect();
        let store = MemoryStore::new().with_table("chores", chores.clone());

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let count = runtime.block_on(reset_recurring_chores(&store)).unwrap();

        let recurring = |d: &Value| match d {
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            _ => false,
        };
        prop_assert_eq!(count, days.iter().filter(|(d, _)| recurring(d)).count());

        for (i, (d, _)) in days.iter().enumerate() {
            let after = store.find("chores", &i.to_string()).unwrap();
            if recurring(d) {
                prop_assert_eq!(after.get("is_completed"), Some(&json!(false)));
                prop_assert_eq!(after.get("completed_at"), Some(&Value::Null));
            } else {
                prop_assert_eq!(Some(&after), chores[i].as_object());
            }
        }
    }
}
