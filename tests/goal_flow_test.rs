use chrono::{Duration, Utc};
use fintrack_core::errors::{Error, ValidationError};
use fintrack_core::goals::{GoalInput, GoalPatch, GoalServiceTrait, GoalStatus};
use fintrack_core::transactions::TransactionType;

mod common;

fn goal_input(title: &str, target: f64) -> GoalInput {
    GoalInput {
        title: title.to_string(),
        description: None,
        target_amount: target,
        start_date: None,
        target_date: Utc::now() + Duration::days(180),
        category_id: None,
        goal_type: None,
        priority: None,
        is_recurring: false,
        recurring_amount: None,
    }
}

#[test]
fn test_goal_completes_and_achieves_milestones_as_money_arrives() {
    let app = common::setup();
    let user = common::create_user(&app, "Joana", "joana@example.com");
    common::record(&app, &user.id, "Salary", TransactionType::Income, 10_000.0);

    let goal = app.goals.create_goal(&user.id, goal_input("New laptop", 3000.0)).unwrap();
    assert_eq!(goal.status, GoalStatus::Active);
    assert_eq!(goal.milestones.len(), 4);

    let first = app.goals.add_amount(&user.id, &goal.id, 2900.0).unwrap();
    // 96.7% crosses the 25/50/75 thresholds in one go
    assert_eq!(first.achieved_milestones.len(), 3);
    assert!(!first.progress.is_completed);
    assert_eq!(first.progress.remaining, 100.0);

    let second = app.goals.add_amount(&user.id, &goal.id, 200.0).unwrap();
    assert!(second.progress.is_completed);
    assert_eq!(second.progress.percentage, 100.0);
    assert_eq!(second.goal.status, GoalStatus::Completed);
    assert_eq!(second.achieved_milestones.len(), 1);
    assert!(second.goal.milestones.iter().all(|m| m.achieved));

    // Completed goals accept no further contributions
    let result = app.goals.add_amount(&user.id, &goal.id, 50.0);
    assert!(matches!(result, Err(Error::PreconditionFailed(_))));
}

#[test]
fn test_add_amount_rejects_bad_inputs() {
    let app = common::setup();
    let user = common::create_user(&app, "Kaio", "kaio@example.com");
    common::record(&app, &user.id, "Salary", TransactionType::Income, 100.0);

    let goal = app.goals.create_goal(&user.id, goal_input("Bike", 1000.0)).unwrap();

    assert!(matches!(
        app.goals.add_amount(&user.id, &goal.id, 0.0),
        Err(Error::Validation(ValidationError::InvalidAmount(_)))
    ));
    assert!(matches!(
        app.goals.add_amount(&user.id, &goal.id, -20.0),
        Err(Error::Validation(ValidationError::InvalidAmount(_)))
    ));
    // More than the 100 available in the ledger
    assert!(matches!(
        app.goals.add_amount(&user.id, &goal.id, 500.0),
        Err(Error::PreconditionFailed(_))
    ));
}

#[test]
fn test_goal_status_state_machine() {
    let app = common::setup();
    let user = common::create_user(&app, "Lia", "lia@example.com");

    let goal = app.goals.create_goal(&user.id, goal_input("Car", 50_000.0)).unwrap();

    let paused = app.goals.change_status(&user.id, &goal.id, GoalStatus::Paused).unwrap();
    assert_eq!(paused.status, GoalStatus::Paused);

    // A paused goal cannot jump straight to completed
    assert!(matches!(
        app.goals.change_status(&user.id, &goal.id, GoalStatus::Completed),
        Err(Error::PreconditionFailed(_))
    ));

    let resumed = app.goals.change_status(&user.id, &goal.id, GoalStatus::Active).unwrap();
    assert_eq!(resumed.status, GoalStatus::Active);

    let cancelled = app.goals.change_status(&user.id, &goal.id, GoalStatus::Cancelled).unwrap();
    assert_eq!(cancelled.status, GoalStatus::Cancelled);

    // Terminal states are final
    assert!(matches!(
        app.goals.change_status(&user.id, &goal.id, GoalStatus::Active),
        Err(Error::PreconditionFailed(_))
    ));
}

#[test]
fn test_goal_rejects_target_date_before_start() {
    let app = common::setup();
    let user = common::create_user(&app, "Mara", "mara@example.com");

    let mut input = goal_input("Time travel", 1000.0);
    input.target_date = Utc::now() - Duration::days(1);

    assert!(matches!(
        app.goals.create_goal(&user.id, input),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_goal_update_and_stats() {
    let app = common::setup();
    let user = common::create_user(&app, "Nina", "nina@example.com");
    common::record(&app, &user.id, "Salary", TransactionType::Income, 5000.0);

    let goal = app.goals.create_goal(&user.id, goal_input("Trip", 4000.0)).unwrap();
    app.goals.add_amount(&user.id, &goal.id, 1000.0).unwrap();

    // Shrinking the target lifts the percentage, achieving more milestones
    let updated = app
        .goals
        .update_goal(
            &user.id,
            &goal.id,
            GoalPatch {
                target_amount: Some(1800.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.target_amount, 1800.0);
    assert!(updated.milestones.iter().filter(|m| m.achieved).count() >= 2);

    let listed = app.goals.get_goals_with_progress(&user.id, None).unwrap();
    assert_eq!(listed.len(), 1);
    assert!((listed[0].progress.percentage - 1000.0 / 1800.0 * 100.0).abs() < 0.001);

    let stats = app.goals.get_stats(&user.id).unwrap();
    assert_eq!(stats.total_goals, 1);
    assert_eq!(stats.active_goals, 1);
    assert_eq!(stats.total_current_amount, 1000.0);

    assert_eq!(app.goals.delete_goal(&user.id, &goal.id).unwrap(), 1);
    assert!(matches!(
        app.goals.get_goal(&user.id, &goal.id),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_stats_amounts_only_count_active_goals() {
    let app = common::setup();
    let user = common::create_user(&app, "Rui", "rui@example.com");
    common::record(&app, &user.id, "Salary", TransactionType::Income, 3000.0);

    let abandoned = app.goals.create_goal(&user.id, goal_input("Old bike", 1000.0)).unwrap();
    app.goals.add_amount(&user.id, &abandoned.id, 500.0).unwrap();
    app.goals
        .change_status(&user.id, &abandoned.id, GoalStatus::Cancelled)
        .unwrap();

    app.goals.create_goal(&user.id, goal_input("New bike", 1000.0)).unwrap();

    let stats = app.goals.get_stats(&user.id).unwrap();
    assert_eq!(stats.total_goals, 2);
    assert_eq!(stats.active_goals, 1);
    assert_eq!(stats.total_target_amount, 1000.0);
    assert_eq!(stats.total_current_amount, 0.0);
    assert_eq!(stats.overall_percentage, 0.0);
}
