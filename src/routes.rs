// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{accounts, admin, answer_sheets, grades, lessons, tests},
    state::AppState,
    utils::basic_auth::admin_middleware,
};

/// Assembles the main application router.
///
/// * Every endpoint lives under `/api`.
/// * `downloadLogs` sits behind the admin Basic-auth check.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let account_routes = Router::new()
        .route("/getStudent/{id}", get(accounts::get_student))
        .route("/findStudentID", post(accounts::find_student_id))
        .route("/registerStudent", post(accounts::register_student))
        .route("/getTeacher/{id}", get(accounts::get_teacher))
        .route("/findTeacherID", post(accounts::find_teacher_id))
        .route("/registerTeacher", post(accounts::register_teacher));

    let submission_routes = Router::new()
        .route(
            "/getAnswerSheet/{student_id}/{test_id}",
            get(answer_sheets::get_answer_sheet),
        )
        .route(
            "/submitAnswerSheet/{test_id}",
            post(answer_sheets::submit_answer_sheet),
        )
        .route("/getGrade/{student_id}/{test_id}", get(grades::get_grade))
        .route("/submitGrade/{test_id}", post(grades::submit_grade));

    let lesson_routes = Router::new()
        .route("/listLessons/{subject}/{grade}", get(lessons::list_lessons))
        .route("/getLesson/{subject}/{lesson_id}", get(lessons::get_lesson))
        .route("/uploadLesson/{subject}/{grade}", post(lessons::upload_lesson));

    let test_routes = Router::new()
        .route("/getTest/{test_id}", get(tests::get_test))
        .route("/viewTest/{test_id}", get(tests::view_test))
        .route(
            "/getTestQueue/{subject}/{student_id}",
            get(tests::get_test_queue),
        )
        .route("/getPlannedTests/{subject}", get(tests::get_planned_tests))
        .route("/getNextTestID", get(tests::get_next_test_id))
        .route("/createTest/{subject}", post(tests::create_test))
        .route("/updateTest/{test_id}", post(tests::update_test));

    let admin_routes = Router::new()
        .route("/downloadLogs", get(admin::download_logs))
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware));

    let api = Router::new()
        .merge(account_routes)
        .merge(submission_routes)
        .merge(lesson_routes)
        .merge(test_routes)
        .merge(admin_routes);

    Router::new()
        .nest("/api", api)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
