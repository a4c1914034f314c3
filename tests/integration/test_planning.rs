//! Strategy routing over translated queries: the observable contract that a
//! question's filters decide which storage shape serves it.

use courtside::{
    build_plan, select_strategy, ExecutionStrategy, Metric, Query, SqlPlan, Task,
};

fn query(task: Task, metric: Metric) -> Query {
    let mut query = Query::fallback(2025);
    query.task = task;
    query.metric = metric;
    query
}

fn params_are_exhaustively_bound(plan: &SqlPlan) {
    // Every placeholder up to the param count appears in the statement, and
    // nothing beyond it does.
    for i in 1..=plan.params.len() {
        assert!(
            plan.sql.contains(&format!("${i}")),
            "missing placeholder ${i} in {}",
            plan.sql
        );
    }
    assert!(!plan.sql.contains(&format!("${}", plan.params.len() + 1)));
}

#[test]
fn basic_stat_rank_routes_to_leaders_table() {
    let q = query(Task::Leaders, Metric::Ppg);
    assert_eq!(
        select_strategy(&q),
        ExecutionStrategy::StatLeaders(Metric::Ppg.basic_stat().unwrap())
    );

    let plan = build_plan(&q);
    assert!(plan.sql.contains("leaders_points"));
    params_are_exhaustively_bound(&plan);
}

#[test]
fn college_filter_reroutes_same_question_to_scan() {
    let mut q = query(Task::Leaders, Metric::Ppg);
    q.filters.colleges = vec!["Kentucky".to_string()];
    assert_eq!(select_strategy(&q), ExecutionStrategy::SeasonScan);

    let plan = build_plan(&q);
    assert!(plan.sql.contains("FROM season_averages"));
    assert!(!plan.sql.contains("leaders_points"));
    params_are_exhaustively_bound(&plan);
}

#[test]
fn compare_task_with_names_routes_to_compare_path() {
    let mut q = query(Task::Compare, Metric::All);
    q.filters.players = vec!["Anthony Edwards".to_string(), "Ja Morant".to_string()];
    assert_eq!(select_strategy(&q), ExecutionStrategy::Compare);

    let plan = build_plan(&q);
    assert!(plan.sql.contains("ORDER BY player_name ASC"));
    // Name order in the question must not affect row order.
    assert!(!plan.sql.contains("ORDER BY pts"));
    params_are_exhaustively_bound(&plan);
}

#[test]
fn compare_rows_come_back_in_name_order_regardless_of_question_order() {
    let mut forward = query(Task::Compare, Metric::All);
    forward.filters.players = vec!["Anthony Edwards".to_string(), "Ja Morant".to_string()];
    let mut reversed = query(Task::Compare, Metric::All);
    reversed.filters.players = vec!["Ja Morant".to_string(), "Anthony Edwards".to_string()];

    // Both orderings produce the same ORDER BY; only bind order differs.
    let forward_plan = build_plan(&forward);
    let reversed_plan = build_plan(&reversed);
    assert_eq!(forward_plan.sql, reversed_plan.sql);
}

#[test]
fn clutch_questions_read_the_clutch_table() {
    let mut q = query(Task::Rank, Metric::Ppg);
    q.clutch = true;
    let plan = build_plan(&q);
    assert!(plan.sql.contains("clutch_season_averages"));
}
