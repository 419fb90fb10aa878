//! REST layer: axum handlers mapping the shared wire DTOs onto domain calls.
//!
//! Handlers stay thin: extract, log, call the service, translate the typed
//! outcome into a status code and JSON body. Domain models are converted to
//! the `shared` DTOs here and nowhere else.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::domain::commands::categories::{CreateCategoryCommand, UpdateCategoryCommand};
use crate::domain::commands::habits::{CreateHabitCommand, HabitListQuery, UpdateHabitCommand};
use crate::domain::commands::progress::UpdateProgressCommand;
use crate::domain::commands::stacks::{CreateStackCommand, UpdateStackCommand};
use crate::domain::models;
use crate::domain::{CategoryService, HabitService, ProgressService, StackService};
use crate::error::{DomainError, DomainResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub habit_service: HabitService,
    pub category_service: CategoryService,
    pub stack_service: StackService,
    pub progress_service: ProgressService,
}

impl AppState {
    pub fn new(
        habit_service: HabitService,
        category_service: CategoryService,
        stack_service: StackService,
        progress_service: ProgressService,
    ) -> Self {
        Self {
            habit_service,
            category_service,
            stack_service,
            progress_service,
        }
    }
}

/// All API routes, nested under `/api`.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(root))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/habits", get(list_habits).post(create_habit))
        .route(
            "/habits/:id",
            get(get_habit).put(update_habit).delete(delete_habit),
        )
        .route("/stacks", get(list_stacks).post(create_stack))
        .route(
            "/stacks/:id",
            get(get_stack).put(update_stack).delete(delete_stack),
        )
        .route("/progress", get(list_progress))
        .route(
            "/progress/:id",
            get(get_progress).put(update_progress).delete(delete_progress),
        )
        .route("/toggle-habit", post(toggle_habit))
        .with_state(state);

    Router::new().nest("/api", api)
}

// ---------------------------------------------------------------------------
// DTO mapping

fn habit_dto(habit: models::habit::Habit) -> shared::Habit {
    shared::Habit {
        id: habit.id,
        name: habit.name,
        category: habit.category,
        time: habit.time,
        description: habit.description,
        created_at: habit.created_at.to_rfc3339(),
    }
}

fn category_dto(category: models::category::HabitCategory) -> shared::HabitCategory {
    shared::HabitCategory {
        id: category.id,
        name: category.name,
        color: category.color,
        icon: category.icon,
        created_at: category.created_at.to_rfc3339(),
    }
}

fn stack_dto(stack: models::stack::HabitStack) -> shared::HabitStack {
    shared::HabitStack {
        id: stack.id,
        name: stack.name,
        habits: stack
            .habits
            .into_iter()
            .map(|h| shared::StackHabit {
                habit_id: h.habit_id,
                completed: h.completed,
            })
            .collect(),
        created_at: stack.created_at.to_rfc3339(),
        last_completed: stack.last_completed.map(|t| t.to_rfc3339()),
    }
}

fn progress_dto(progress: models::progress::ProgressData) -> shared::ProgressData {
    shared::ProgressData {
        id: progress.id,
        stack_id: progress.stack_id,
        current_streak: progress.current_streak,
        longest_streak: progress.longest_streak,
        completion_rate: progress.completion_rate,
        last_week_progress: progress.last_week_progress.to_vec(),
        updated_at: progress.updated_at.to_rfc3339(),
    }
}

fn stack_entries(entries: Vec<shared::StackHabit>) -> Vec<models::stack::StackHabit> {
    entries
        .into_iter()
        .map(|h| models::stack::StackHabit {
            habit_id: h.habit_id,
            completed: h.completed,
        })
        .collect()
}

fn parse_timestamp(field: &str, value: Option<String>) -> DomainResult<Option<DateTime<Utc>>> {
    value
        .map(|v| {
            DateTime::parse_from_rfc3339(&v)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| {
                    DomainError::validation(format!("{} must be an RFC 3339 timestamp", field))
                })
        })
        .transpose()
}

fn week_buffer(value: Vec<bool>) -> DomainResult<[bool; 7]> {
    value.try_into().map_err(|v: Vec<bool>| {
        DomainError::validation(format!(
            "last_week_progress must contain exactly 7 entries, found {}",
            v.len()
        ))
    })
}

// ---------------------------------------------------------------------------
// Error envelope

fn error_response(error: DomainError) -> Response {
    let status = match &error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::AlreadyExists { .. } => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Storage details are logged, never echoed to the client.
    let message = match &error {
        DomainError::Storage(inner) => {
            tracing::error!("storage failure: {:?}", inner);
            "An error occurred while processing your request".to_string()
        }
        other => other.to_string(),
    };

    let body = shared::ErrorResponse {
        message,
        error_code: error.error_code().to_string(),
        status_code: status.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
    };
    (status, Json(body)).into_response()
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(shared::MessageResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Root

async fn root() -> impl IntoResponse {
    Json(shared::MessageResponse {
        message: "Habit Stack API is running".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Categories

async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");

    match state.category_service.list_categories() {
        Ok(categories) => {
            let dtos: Vec<_> = categories.into_iter().map(category_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/categories/{}", id);

    match state.category_service.get_category(&id) {
        Ok(category) => (StatusCode::OK, Json(category_dto(category))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<shared::CreateCategoryRequest>,
) -> impl IntoResponse {
    info!("POST /api/categories - name: {}", request.name);

    let command = CreateCategoryCommand {
        id: None,
        name: request.name,
        color: request.color,
        icon: request.icon,
    };
    match state.category_service.create_category(command) {
        Ok(category) => (StatusCode::CREATED, Json(category_dto(category))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<shared::UpdateCategoryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/categories/{}", id);

    let command = UpdateCategoryCommand {
        name: request.name,
        color: request.color,
        icon: request.icon,
    };
    match state.category_service.update_category(&id, command) {
        Ok(category) => (StatusCode::OK, Json(category_dto(category))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/categories/{}", id);

    match state.category_service.delete_category(&id) {
        Ok(()) => message_response(StatusCode::OK, "Category deleted successfully"),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// Habits

/// Query parameters for the habit list endpoint.
#[derive(Deserialize, Debug)]
struct HabitsQuery {
    category: Option<String>,
    search: Option<String>,
}

async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<HabitsQuery>,
) -> impl IntoResponse {
    info!("GET /api/habits - query: {:?}", query);

    let list_query = HabitListQuery {
        category: query.category,
        search: query.search,
    };
    match state.habit_service.list_habits(list_query) {
        Ok(habits) => {
            let dtos: Vec<_> = habits.into_iter().map(habit_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn get_habit(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/habits/{}", id);

    match state.habit_service.get_habit(&id) {
        Ok(habit) => (StatusCode::OK, Json(habit_dto(habit))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_habit(
    State(state): State<AppState>,
    Json(request): Json<shared::CreateHabitRequest>,
) -> impl IntoResponse {
    info!("POST /api/habits - name: {}", request.name);

    let command = CreateHabitCommand {
        id: None,
        name: request.name,
        category: request.category,
        time: request.time,
        description: request.description,
        created_at: None,
    };
    match state.habit_service.create_habit(command) {
        Ok(habit) => (StatusCode::CREATED, Json(habit_dto(habit))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<shared::UpdateHabitRequest>,
) -> impl IntoResponse {
    info!("PUT /api/habits/{}", id);

    let command = UpdateHabitCommand {
        name: request.name,
        category: request.category,
        time: request.time,
        description: request.description,
    };
    match state.habit_service.update_habit(&id, command) {
        Ok(habit) => (StatusCode::OK, Json(habit_dto(habit))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_habit(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/habits/{}", id);

    match state.habit_service.delete_habit(&id) {
        Ok(()) => message_response(StatusCode::OK, "Habit deleted successfully"),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// Stacks

/// Query parameters for the stack list endpoint.
#[derive(Deserialize, Debug)]
struct StacksQuery {
    search: Option<String>,
}

async fn list_stacks(
    State(state): State<AppState>,
    Query(query): Query<StacksQuery>,
) -> impl IntoResponse {
    info!("GET /api/stacks - query: {:?}", query);

    match state.stack_service.list_stacks(query.search.as_deref()) {
        Ok(stacks) => {
            let dtos: Vec<_> = stacks.into_iter().map(stack_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn get_stack(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/stacks/{}", id);

    match state.stack_service.get_stack(&id) {
        Ok(stack) => (StatusCode::OK, Json(stack_dto(stack))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_stack(
    State(state): State<AppState>,
    Json(request): Json<shared::CreateStackRequest>,
) -> impl IntoResponse {
    info!("POST /api/stacks - name: {}", request.name);

    let command = CreateStackCommand {
        id: None,
        name: request.name,
        habits: stack_entries(request.habits),
        created_at: None,
        last_completed: None,
    };
    match state.stack_service.create_stack(command) {
        Ok(stack) => (StatusCode::CREATED, Json(stack_dto(stack))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_stack(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<shared::UpdateStackRequest>,
) -> impl IntoResponse {
    info!("PUT /api/stacks/{}", id);

    let last_completed = match parse_timestamp("lastCompleted", request.last_completed) {
        Ok(value) => value,
        Err(e) => return error_response(e),
    };
    let command = UpdateStackCommand {
        name: request.name,
        habits: stack_entries(request.habits),
        last_completed,
    };
    match state.stack_service.update_stack(&id, command) {
        Ok(stack) => (StatusCode::OK, Json(stack_dto(stack))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_stack(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/stacks/{}", id);

    match state.stack_service.delete_stack(&id) {
        Ok(true) => message_response(StatusCode::OK, "Stack deleted successfully"),
        Ok(false) => error_response(DomainError::not_found("Stack", id)),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// Progress

async fn list_progress(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/progress");

    match state.progress_service.list_all() {
        Ok(records) => {
            let dtos: Vec<_> = records.into_iter().map(progress_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// The progress resource is addressed by stack id; a stack without a record
/// gets a zero-valued one created on first read.
async fn get_progress(
    State(state): State<AppState>,
    Path(stack_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/progress/{}", stack_id);

    match state.progress_service.get_or_default(&stack_id) {
        Ok(progress) => (StatusCode::OK, Json(progress_dto(progress))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_progress(
    State(state): State<AppState>,
    Path(stack_id): Path<String>,
    Json(request): Json<shared::UpdateProgressRequest>,
) -> impl IntoResponse {
    info!("PUT /api/progress/{}", stack_id);

    let last_week_progress = match week_buffer(request.last_week_progress) {
        Ok(value) => value,
        Err(e) => return error_response(e),
    };
    let command = UpdateProgressCommand {
        current_streak: request.current_streak,
        longest_streak: request.longest_streak,
        completion_rate: request.completion_rate,
        last_week_progress,
    };
    match state.progress_service.update(&stack_id, command) {
        Ok(progress) => (StatusCode::OK, Json(progress_dto(progress))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Unlike the read path, deletion addresses the record by its own storage id.
async fn delete_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/progress/{}", id);

    match state.progress_service.delete(&id) {
        Ok(true) => message_response(StatusCode::OK, "Progress data deleted successfully"),
        Ok(false) => error_response(DomainError::not_found("Progress data", id)),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// Toggle

async fn toggle_habit(
    State(state): State<AppState>,
    Json(request): Json<shared::ToggleHabitRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/toggle-habit - stack: {}, habit: {}",
        request.stack_id, request.habit_id
    );

    match state
        .stack_service
        .toggle_habit_completion(&request.stack_id, &request.habit_id)
    {
        Ok(_) => message_response(StatusCode::OK, "Habit completion toggled successfully"),
        Err(e) => error_response(e),
    }
}
