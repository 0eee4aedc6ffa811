//! PostgreSQL repository tests. Run with `DATABASE_URL` set and `--ignored`.

use chrono::{Duration, Utc};
use college_events::auth::hash_token;
use college_events::error::RepositoryError;
use college_events::models::*;
use college_events::repositories::*;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

async fn insert_user(pool: &PgPool, email: &str, role: UserRole) -> User {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (email, full_name, user_role) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(email)
    .bind("Database Test")
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .expect("Failed to insert user")
}

async fn insert_event(pool: &PgPool, organizer_id: Uuid, capacity: i32) -> Event {
    let start = Utc::now() + Duration::days(10);
    PgEventRepository::new(pool.clone())
        .create(NewEvent {
            organizer_id,
            status: EventStatus::Published,
            input: EventInput {
                title: "Jazz Night".to_string(),
                description: "The music society plays the student union".to_string(),
                location: "Student Union".to_string(),
                start_date: start,
                end_date: start + Duration::hours(2),
                capacity,
                price: Decimal::new(500, 2),
                category: "music".to_string(),
                image_url: None,
            },
        })
        .await
        .expect("Failed to create event")
}

fn seat(user_id: Uuid, event_id: Uuid) -> NewRegistration {
    NewRegistration {
        user_id,
        event_id,
        ticket_type: "general".to_string(),
        amount_paid: Decimal::new(500, 2),
        payment_status: PaymentStatus::Completed,
        special_requirements: None,
    }
}

// ============================================================================
// Migration Tests
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_migrations_create_every_table(pool: PgPool) {
    for table in [
        "users",
        "sessions",
        "events",
        "registrations",
        "budget_items",
        "schedule_items",
        "notifications",
    ] {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_name = $1) AS present",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        let present: bool = row.get("present");
        assert!(present, "table {} missing", table);
    }
}

// ============================================================================
// User Repository Tests
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_session_lookup_honours_expiry(pool: PgPool) {
    let user = insert_user(&pool, "session@college.edu", UserRole::Participant).await;
    let repo = PgUserRepository::new(pool.clone());

    sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(hash_token("live-token"))
        .bind(user.id)
        .bind(Utc::now() + Duration::hours(1))
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(hash_token("stale-token"))
        .bind(user.id)
        .bind(Utc::now() - Duration::hours(1))
        .execute(&pool)
        .await
        .unwrap();

    let found = repo
        .find_by_session(&hash_token("live-token"), Utc::now())
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let stale = repo
        .find_by_session(&hash_token("stale-token"), Utc::now())
        .await
        .unwrap();
    assert!(stale.is_none());
}

// ============================================================================
// Event Repository Tests
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_event_update_keeps_untouched_columns(pool: PgPool) {
    let organizer = insert_user(&pool, "org@college.edu", UserRole::Organizer).await;
    let event = insert_event(&pool, organizer.id, 40).await;
    let repo = PgEventRepository::new(pool);

    let updated = repo
        .update(
            event.id,
            EventChanges {
                capacity: Some(60),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.capacity, 60);
    assert_eq!(updated.title, event.title);
    assert_eq!(updated.price, event.price);
    assert!(updated.updated_at >= event.updated_at);

    let status = repo
        .update_status(event.id, EventStatus::Completed)
        .await
        .unwrap();
    assert_eq!(status.status, EventStatus::Completed);

    let missing = repo.update_status(Uuid::new_v4(), EventStatus::Draft).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_capacity_edit_races_admission(pool: PgPool) {
    let organizer = insert_user(&pool, "org@college.edu", UserRole::Organizer).await;
    let event = insert_event(&pool, organizer.id, 3).await;
    let events = PgEventRepository::new(pool.clone());
    let registrations = PgRegistrationRepository::new(pool.clone());
    for i in 0..2 {
        let email = format!("seat{}@college.edu", i);
        let user = insert_user(&pool, &email, UserRole::Participant).await;
        registrations
            .insert_within_capacity(seat(user.id, event.id))
            .await
            .unwrap()
            .expect("seat should be free");
    }
    let late = insert_user(&pool, "late@college.edu", UserRole::Participant).await;

    let below = events
        .update(
            event.id,
            EventChanges {
                capacity: Some(1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(below, Err(RepositoryError::CapacityBelowActive(2))));

    // Shrinking to 2 and taking the third seat cannot both succeed
    let (shrunk, admitted) = tokio::join!(
        events.update(
            event.id,
            EventChanges {
                capacity: Some(2),
                ..Default::default()
            },
        ),
        registrations.insert_within_capacity(seat(late.id, event.id)),
    );
    let admitted = admitted.unwrap();
    match shrunk {
        Ok(updated) => {
            assert_eq!(updated.capacity, 2);
            assert!(admitted.is_none());
        }
        Err(err) => {
            assert!(matches!(err, RepositoryError::CapacityBelowActive(3)));
            assert!(admitted.is_some());
        }
    }

    let stored = events.find_by_id(event.id).await.unwrap().unwrap();
    let active = registrations.count_active(event.id).await.unwrap();
    assert!(active <= i64::from(stored.capacity));

    let missing = events
        .update(
            Uuid::new_v4(),
            EventChanges {
                capacity: Some(5),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_event_list_filters(pool: PgPool) {
    let organizer = insert_user(&pool, "org@college.edu", UserRole::Organizer).await;
    let other = insert_user(&pool, "other@college.edu", UserRole::Organizer).await;
    insert_event(&pool, organizer.id, 10).await;
    insert_event(&pool, organizer.id, 10).await;
    insert_event(&pool, other.id, 10).await;
    let repo = PgEventRepository::new(pool);

    let mine = repo
        .list(&EventFilter {
            organizer_id: Some(organizer.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);

    let limited = repo
        .list(&EventFilter {
            limit: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);

    let none = repo
        .list(&EventFilter {
            category: Some("sports".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(none.is_empty());
}

// ============================================================================
// Registration Repository Tests
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_within_capacity(pool: PgPool) {
    let organizer = insert_user(&pool, "org@college.edu", UserRole::Organizer).await;
    let first = insert_user(&pool, "first@college.edu", UserRole::Participant).await;
    let second = insert_user(&pool, "second@college.edu", UserRole::Participant).await;
    let event = insert_event(&pool, organizer.id, 1).await;
    let repo = PgRegistrationRepository::new(pool);

    let admitted = repo
        .insert_within_capacity(seat(first.id, event.id))
        .await
        .unwrap()
        .expect("first seat should be free");
    assert_eq!(admitted.status, RegistrationStatus::Confirmed);
    assert_eq!(repo.count_active(event.id).await.unwrap(), 1);

    let full = repo
        .insert_within_capacity(seat(second.id, event.id))
        .await
        .unwrap();
    assert!(full.is_none());

    // Full event, but the repeat caller is told it is a duplicate
    let duplicate = repo.insert_within_capacity(seat(first.id, event.id)).await;
    assert!(matches!(duplicate, Err(RepositoryError::Duplicate(_))));

    let missing = repo
        .insert_within_capacity(seat(first.id, Uuid::new_v4()))
        .await;
    assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_cancel_then_check_in(pool: PgPool) {
    let organizer = insert_user(&pool, "org@college.edu", UserRole::Organizer).await;
    let student = insert_user(&pool, "student@college.edu", UserRole::Participant).await;
    let event = insert_event(&pool, organizer.id, 5).await;
    let repo = PgRegistrationRepository::new(pool);

    let registration = repo
        .insert_within_capacity(seat(student.id, event.id))
        .await
        .unwrap()
        .unwrap();

    let checked_in = repo.check_in(registration.id, Utc::now()).await.unwrap();
    assert!(checked_in.check_in_status);
    assert!(checked_in.check_in_time.is_some());

    let cancelled = repo
        .update_status(registration.id, RegistrationStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, RegistrationStatus::Cancelled);
    assert!(repo.find_active(student.id, event.id).await.unwrap().is_none());

    // The partial unique index lets the user come back
    let again = repo
        .insert_within_capacity(seat(student.id, event.id))
        .await
        .unwrap();
    assert!(again.is_some());
    assert_eq!(repo.list_by_event(event.id).await.unwrap().len(), 2);
}

// ============================================================================
// Budget & Schedule Repository Tests
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_budget_item_update_and_delete(pool: PgPool) {
    let organizer = insert_user(&pool, "org@college.edu", UserRole::Organizer).await;
    let event = insert_event(&pool, organizer.id, 5).await;
    let repo = PgBudgetRepository::new(pool);

    let item = repo
        .create(NewBudgetItem {
            event_id: event.id,
            item_name: "Stage lights".to_string(),
            category: BudgetCategory::Equipment,
            estimated_cost: Decimal::from(400),
            actual_cost: None,
            status: BudgetItemStatus::Planned,
            notes: None,
            receipt_url: None,
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            item.id,
            BudgetItemChanges {
                actual_cost: Some(Decimal::new(38250, 2)),
                status: Some(BudgetItemStatus::Spent),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.actual_cost, Some(Decimal::new(38250, 2)));
    assert_eq!(updated.status, BudgetItemStatus::Spent);
    assert_eq!(updated.item_name, "Stage lights");

    repo.delete(item.id).await.unwrap();
    assert!(matches!(
        repo.delete(item.id).await,
        Err(RepositoryError::NotFound(_))
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_schedule_items_ordered_by_start(pool: PgPool) {
    let organizer = insert_user(&pool, "org@college.edu", UserRole::Organizer).await;
    let event = insert_event(&pool, organizer.id, 5).await;
    let repo = PgScheduleRepository::new(pool);

    let base = event.start_date;
    for (title, offset) in [("Closing", 90), ("Opening", 0), ("Panel", 30)] {
        repo.create(NewScheduleItem {
            event_id: event.id,
            title: title.to_string(),
            description: None,
            start_time: base + Duration::minutes(offset),
            end_time: base + Duration::minutes(offset + 25),
            location: None,
            speaker: None,
            category: None,
            priority: Some(3),
            status: ScheduleStatus::Planned,
        })
        .await
        .unwrap();
    }

    let titles: Vec<String> = repo
        .list_by_event(event.id)
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.title)
        .collect();
    assert_eq!(titles, vec!["Opening", "Panel", "Closing"]);
}

// ============================================================================
// Notification Repository Tests
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_notifications_read_state(pool: PgPool) {
    let student = insert_user(&pool, "student@college.edu", UserRole::Participant).await;
    let repo = PgNotificationRepository::new(pool);

    for title in ["One", "Two", "Three"] {
        repo.create(NewNotification::to_user(
            student.id,
            title,
            "Something happened",
            NotificationKind::Info,
        ))
        .await
        .unwrap();
    }

    let inbox = repo.list_for_user(student.id).await.unwrap();
    assert_eq!(inbox.len(), 3);

    let read = repo.mark_read(inbox[0].id).await.unwrap();
    assert!(read.read);
    assert_eq!(repo.mark_all_read(student.id).await.unwrap(), 2);
    assert_eq!(repo.mark_all_read(student.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_announcements_skip_expired(pool: PgPool) {
    let organizer = insert_user(&pool, "org@college.edu", UserRole::Organizer).await;
    let event = insert_event(&pool, organizer.id, 5).await;
    let repo = PgNotificationRepository::new(pool);

    for (title, expiry) in [
        ("Expired", Some(Utc::now() - Duration::hours(1))),
        ("Current", Some(Utc::now() + Duration::hours(1))),
        ("Forever", None),
    ] {
        repo.create(NewNotification {
            user_id: None,
            title: title.to_string(),
            message: "Announcement body".to_string(),
            kind: NotificationKind::Warning,
            event_id: Some(event.id),
            is_announcement: true,
            target_audience: Some(TargetAudience::All),
            expiry_date: expiry,
        })
        .await
        .unwrap();
    }

    let visible = repo.list_announcements(event.id, Utc::now()).await.unwrap();
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|n| n.title != "Expired"));
    assert_eq!(visible[0].target_audience, Some(TargetAudience::All));
}
