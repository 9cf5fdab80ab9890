// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use ops_ticket_api::{
    AddNoteRequest, ApiError, AssignOperatorRequest, CategoryInfo, CreateCategoryRequest,
    CreateRuleRequest, CreateTicketRequest, CreateTicketResponse, EditTicketRequest,
    HistoryEntryInfo, ListTicketsRequest, NotificationMessage, NotificationSink, RejectRequest,
    RuleInfo, TicketInfo, UpdateStatusRequest,
};
use ops_ticket_domain::{Principal, Role};
use ops_ticket_persistence::Persistence;

/// Ops Ticket Server - HTTP server for the Ops Ticket System
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for tickets, history, categories, and rules.
    store: Arc<Mutex<Persistence>>,
}

/// A notification sink that logs deliveries instead of sending them.
///
/// Stands in until an outbound channel (mail, webhook) is configured.
struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, message: &NotificationMessage) -> Result<(), String> {
        info!(
            ticket_id = ?message.ticket_id,
            recipient = %message.recipient.username,
            template = message.template,
            "notification"
        );
        Ok(())
    }
}

/// The acting identity fields every request carries.
///
/// The identity provider in front of this server is trusted to have
/// authenticated the person; the server only parses the claims.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorParams {
    /// The actor's identity provider id.
    actor_id: i64,
    /// The actor's display name.
    actor_username: String,
    /// The role the actor acts under.
    actor_role: String,
}

/// API request for creating a ticket.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateTicketApiRequest {
    /// The acting identity.
    #[serde(flatten)]
    actor: ActorParams,
    /// Short summary of the requested work.
    title: String,
    /// Full description of the requested work.
    description: String,
    /// Category internal value.
    category: String,
    /// Shift code.
    shift: String,
}

/// API request carrying only the acting identity (claim, close).
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorApiRequest {
    /// The acting identity.
    #[serde(flatten)]
    actor: ActorParams,
}

/// API request for assigning an operator.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AssignOperatorApiRequest {
    /// The acting identity.
    #[serde(flatten)]
    actor: ActorParams,
    /// The operator's identity provider id.
    operator_id: i64,
    /// The operator's display name.
    operator_name: String,
}

/// API request for recording an operator outcome.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateStatusApiRequest {
    /// The acting identity.
    #[serde(flatten)]
    actor: ActorParams,
    /// Target status wire value.
    status: String,
    /// Optional closing remark.
    note: Option<String>,
}

/// API request carrying the acting identity and a note (reject, notes).
#[derive(Debug, Clone, Deserialize, Serialize)]
struct NoteApiRequest {
    /// The acting identity.
    #[serde(flatten)]
    actor: ActorParams,
    /// The note text.
    note: String,
}

/// API request for a supervisor/administrator direct edit.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct EditTicketApiRequest {
    /// The acting identity.
    #[serde(flatten)]
    actor: ActorParams,
    /// Replacement category internal value.
    category: Option<String>,
    /// Replacement status wire value.
    status: Option<String>,
    /// Replacement description.
    description: Option<String>,
    /// Replacement observation text. An empty string clears it.
    observation: Option<String>,
    /// Replacement operator id.
    operator_id: Option<i64>,
    /// Replacement operator display name.
    operator_name: Option<String>,
    /// Unassign the current operator.
    #[serde(default)]
    clear_operator: bool,
}

/// API request for creating a category.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateCategoryApiRequest {
    /// The acting identity.
    #[serde(flatten)]
    actor: ActorParams,
    /// Display name; the internal value is derived from it.
    name: String,
}

/// API request for creating an assignment rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateRuleApiRequest {
    /// The acting identity.
    #[serde(flatten)]
    actor: ActorParams,
    /// Category internal value to route.
    category: String,
    /// Shift wire value to route.
    shift: String,
    /// The receiving supervisor's id.
    supervisor_id: i64,
    /// The receiving supervisor's display name.
    supervisor_name: String,
}

/// Query parameters for listing tickets, the acting identity plus the
/// optional filters.
#[derive(Debug, Clone, Deserialize)]
struct ListTicketsQuery {
    /// The actor's identity provider id.
    actor_id: i64,
    /// The actor's display name.
    actor_username: String,
    /// The role the actor acts under.
    actor_role: String,
    /// Id fragment.
    id: Option<String>,
    /// Title fragment.
    title: Option<String>,
    /// Creator name fragment.
    creator: Option<String>,
    /// Operator name fragment.
    operator: Option<String>,
    /// Supervisor name fragment.
    supervisor: Option<String>,
    /// Status wire value.
    status: Option<String>,
    /// Category internal value.
    category: Option<String>,
    /// Creation window start, `YYYY-MM-DD`.
    date_from: Option<String>,
    /// Creation window end, `YYYY-MM-DD`.
    date_to: Option<String>,
}

impl ListTicketsQuery {
    fn actor(&self) -> ActorParams {
        ActorParams {
            actor_id: self.actor_id,
            actor_username: self.actor_username.clone(),
            actor_role: self.actor_role.clone(),
        }
    }

    fn filters(&self) -> ListTicketsRequest {
        ListTicketsRequest {
            id: self.id.clone(),
            title: self.title.clone(),
            creator: self.creator.clone(),
            operator: self.operator.clone(),
            supervisor: self.supervisor.clone(),
            status: self.status.clone(),
            category: self.category.clone(),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
        }
    }
}

/// API response for delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeletedResponse {
    /// Success indicator.
    success: bool,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::IllegalTransition { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Parses the actor claims into a [`Principal`].
fn parse_principal(actor: &ActorParams) -> Result<Principal, HttpError> {
    let role: Role = Role::from_str(&actor.actor_role.to_lowercase()).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })?;
    Principal::new(actor.actor_id, actor.actor_username.clone(), role).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })
}

/// Handler for POST `/tickets` endpoint.
///
/// Creates a new ticket, routed to a supervisor when a rule matches.
async fn handle_create_ticket(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateTicketApiRequest>,
) -> Result<Json<CreateTicketResponse>, HttpError> {
    info!(
        actor = %req.actor.actor_username,
        category = %req.category,
        "Handling create_ticket request"
    );

    let actor: Principal = parse_principal(&req.actor)?;
    let request: CreateTicketRequest = CreateTicketRequest {
        title: req.title,
        description: req.description,
        category: req.category,
        shift: req.shift,
    };

    let mut store = app_state.store.lock().await;
    let response: CreateTicketResponse =
        ops_ticket_api::create_ticket(&mut store, &actor, &LogSink, &request)?;
    drop(store);

    Ok(Json(response))
}

/// Handler for GET `/tickets` endpoint.
///
/// Lists tickets visible to the actor, newest first.
async fn handle_list_tickets(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Json<Vec<TicketInfo>>, HttpError> {
    let actor: Principal = parse_principal(&query.actor())?;

    let mut store = app_state.store.lock().await;
    let tickets: Vec<TicketInfo> =
        ops_ticket_api::list_tickets(&mut store, &actor, &query.filters())?;
    drop(store);

    Ok(Json(tickets))
}

/// Handler for GET `/tickets/export` endpoint.
///
/// Exports the actor's visible listing as CSV.
async fn handle_export_tickets(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Response, HttpError> {
    let actor: Principal = parse_principal(&query.actor())?;

    let mut store = app_state.store.lock().await;
    let csv: String = ops_ticket_api::export_tickets(&mut store, &actor, &query.filters())?;
    drop(store);

    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

/// Handler for GET `/tickets/{ticket_id}` endpoint.
///
/// Returns a single ticket visible to the actor.
async fn handle_get_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Query(actor_params): Query<ActorParams>,
) -> Result<Json<TicketInfo>, HttpError> {
    let actor: Principal = parse_principal(&actor_params)?;

    let mut store = app_state.store.lock().await;
    let ticket: TicketInfo = ops_ticket_api::get_ticket(&mut store, &actor, ticket_id)?;
    drop(store);

    Ok(Json(ticket))
}

/// Handler for GET `/tickets/{ticket_id}/history` endpoint.
///
/// Returns the ticket's change timeline, newest entry first.
async fn handle_ticket_history(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Query(actor_params): Query<ActorParams>,
) -> Result<Json<Vec<HistoryEntryInfo>>, HttpError> {
    let actor: Principal = parse_principal(&actor_params)?;

    let mut store = app_state.store.lock().await;
    let entries: Vec<HistoryEntryInfo> =
        ops_ticket_api::list_ticket_history(&mut store, &actor, ticket_id)?;
    drop(store);

    Ok(Json(entries))
}

/// Handler for POST `/tickets/{ticket_id}/claim` endpoint.
async fn handle_claim_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<TicketInfo>, HttpError> {
    info!(actor = %req.actor.actor_username, ticket_id, "Handling claim request");

    let actor: Principal = parse_principal(&req.actor)?;

    let mut store = app_state.store.lock().await;
    let ticket: TicketInfo =
        ops_ticket_api::claim_ticket(&mut store, &actor, &LogSink, ticket_id)?;
    drop(store);

    Ok(Json(ticket))
}

/// Handler for POST `/tickets/{ticket_id}/assign` endpoint.
async fn handle_assign_operator(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<AssignOperatorApiRequest>,
) -> Result<Json<TicketInfo>, HttpError> {
    info!(
        actor = %req.actor.actor_username,
        ticket_id,
        operator = %req.operator_name,
        "Handling assign request"
    );

    let actor: Principal = parse_principal(&req.actor)?;
    let request: AssignOperatorRequest = AssignOperatorRequest {
        operator_id: req.operator_id,
        operator_name: req.operator_name,
    };

    let mut store = app_state.store.lock().await;
    let ticket: TicketInfo =
        ops_ticket_api::assign_operator(&mut store, &actor, &LogSink, ticket_id, &request)?;
    drop(store);

    Ok(Json(ticket))
}

/// Handler for POST `/tickets/{ticket_id}/status` endpoint.
async fn handle_update_status(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<UpdateStatusApiRequest>,
) -> Result<Json<TicketInfo>, HttpError> {
    info!(
        actor = %req.actor.actor_username,
        ticket_id,
        status = %req.status,
        "Handling status update request"
    );

    let actor: Principal = parse_principal(&req.actor)?;
    let request: UpdateStatusRequest = UpdateStatusRequest {
        status: req.status,
        note: req.note,
    };

    let mut store = app_state.store.lock().await;
    let ticket: TicketInfo =
        ops_ticket_api::update_ticket_status(&mut store, &actor, &LogSink, ticket_id, &request)?;
    drop(store);

    Ok(Json(ticket))
}

/// Handler for POST `/tickets/{ticket_id}/reject` endpoint.
async fn handle_reject_resolution(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<NoteApiRequest>,
) -> Result<Json<TicketInfo>, HttpError> {
    info!(actor = %req.actor.actor_username, ticket_id, "Handling reject request");

    let actor: Principal = parse_principal(&req.actor)?;
    let request: RejectRequest = RejectRequest { note: req.note };

    let mut store = app_state.store.lock().await;
    let ticket: TicketInfo =
        ops_ticket_api::reject_resolution(&mut store, &actor, &LogSink, ticket_id, &request)?;
    drop(store);

    Ok(Json(ticket))
}

/// Handler for POST `/tickets/{ticket_id}/close` endpoint.
async fn handle_close_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<TicketInfo>, HttpError> {
    info!(actor = %req.actor.actor_username, ticket_id, "Handling close request");

    let actor: Principal = parse_principal(&req.actor)?;

    let mut store = app_state.store.lock().await;
    let ticket: TicketInfo =
        ops_ticket_api::close_ticket(&mut store, &actor, &LogSink, ticket_id)?;
    drop(store);

    Ok(Json(ticket))
}

/// Handler for POST `/tickets/{ticket_id}/notes` endpoint.
async fn handle_add_note(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<NoteApiRequest>,
) -> Result<Json<TicketInfo>, HttpError> {
    info!(actor = %req.actor.actor_username, ticket_id, "Handling add_note request");

    let actor: Principal = parse_principal(&req.actor)?;
    let request: AddNoteRequest = AddNoteRequest { note: req.note };

    let mut store = app_state.store.lock().await;
    let ticket: TicketInfo =
        ops_ticket_api::add_note(&mut store, &actor, &LogSink, ticket_id, &request)?;
    drop(store);

    Ok(Json(ticket))
}

/// Handler for POST `/tickets/{ticket_id}/edit` endpoint.
async fn handle_edit_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<EditTicketApiRequest>,
) -> Result<Json<TicketInfo>, HttpError> {
    info!(actor = %req.actor.actor_username, ticket_id, "Handling edit request");

    let actor: Principal = parse_principal(&req.actor)?;
    let request: EditTicketRequest = EditTicketRequest {
        category: req.category,
        status: req.status,
        description: req.description,
        observation: req.observation,
        operator_id: req.operator_id,
        operator_name: req.operator_name,
        clear_operator: req.clear_operator,
    };

    let mut store = app_state.store.lock().await;
    let ticket: TicketInfo =
        ops_ticket_api::edit_ticket(&mut store, &actor, &LogSink, ticket_id, &request)?;
    drop(store);

    Ok(Json(ticket))
}

/// Handler for GET `/categories` endpoint.
///
/// Lists all categories. Open to every role.
async fn handle_list_categories(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<CategoryInfo>>, HttpError> {
    let mut store = app_state.store.lock().await;
    let categories: Vec<CategoryInfo> = ops_ticket_api::list_categories(&mut store)?;
    drop(store);

    Ok(Json(categories))
}

/// Handler for POST `/categories` endpoint.
async fn handle_create_category(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateCategoryApiRequest>,
) -> Result<Json<CategoryInfo>, HttpError> {
    info!(
        actor = %req.actor.actor_username,
        name = %req.name,
        "Handling create_category request"
    );

    let actor: Principal = parse_principal(&req.actor)?;
    let request: CreateCategoryRequest = CreateCategoryRequest { name: req.name };

    let mut store = app_state.store.lock().await;
    let category: CategoryInfo = ops_ticket_api::create_category(&mut store, &actor, &request)?;
    drop(store);

    Ok(Json(category))
}

/// Handler for PUT `/categories/{category_id}` endpoint.
async fn handle_update_category(
    AxumState(app_state): AxumState<AppState>,
    Path(category_id): Path<i64>,
    Json(req): Json<CreateCategoryApiRequest>,
) -> Result<Json<CategoryInfo>, HttpError> {
    info!(
        actor = %req.actor.actor_username,
        category_id,
        name = %req.name,
        "Handling update_category request"
    );

    let actor: Principal = parse_principal(&req.actor)?;
    let request: CreateCategoryRequest = CreateCategoryRequest { name: req.name };

    let mut store = app_state.store.lock().await;
    let category: CategoryInfo =
        ops_ticket_api::update_category(&mut store, &actor, category_id, &request)?;
    drop(store);

    Ok(Json(category))
}

/// Handler for DELETE `/categories/{category_id}` endpoint.
async fn handle_delete_category(
    AxumState(app_state): AxumState<AppState>,
    Path(category_id): Path<i64>,
    Query(actor_params): Query<ActorParams>,
) -> Result<Json<DeletedResponse>, HttpError> {
    info!(
        actor = %actor_params.actor_username,
        category_id,
        "Handling delete_category request"
    );

    let actor: Principal = parse_principal(&actor_params)?;

    let mut store = app_state.store.lock().await;
    ops_ticket_api::delete_category(&mut store, &actor, category_id)?;
    drop(store);

    Ok(Json(DeletedResponse { success: true }))
}

/// Handler for GET `/rules` endpoint.
async fn handle_list_rules(
    AxumState(app_state): AxumState<AppState>,
    Query(actor_params): Query<ActorParams>,
) -> Result<Json<Vec<RuleInfo>>, HttpError> {
    let actor: Principal = parse_principal(&actor_params)?;

    let mut store = app_state.store.lock().await;
    let rules: Vec<RuleInfo> = ops_ticket_api::list_rules(&mut store, &actor)?;
    drop(store);

    Ok(Json(rules))
}

/// Handler for POST `/rules` endpoint.
async fn handle_create_rule(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateRuleApiRequest>,
) -> Result<Json<RuleInfo>, HttpError> {
    info!(
        actor = %req.actor.actor_username,
        category = %req.category,
        shift = %req.shift,
        "Handling create_rule request"
    );

    let actor: Principal = parse_principal(&req.actor)?;
    let request: CreateRuleRequest = CreateRuleRequest {
        category: req.category,
        shift: req.shift,
        supervisor_id: req.supervisor_id,
        supervisor_name: req.supervisor_name,
    };

    let mut store = app_state.store.lock().await;
    let rule: RuleInfo = ops_ticket_api::create_rule(&mut store, &actor, &request)?;
    drop(store);

    Ok(Json(rule))
}

/// Handler for DELETE `/rules/{rule_id}` endpoint.
async fn handle_delete_rule(
    AxumState(app_state): AxumState<AppState>,
    Path(rule_id): Path<i64>,
    Query(actor_params): Query<ActorParams>,
) -> Result<Json<DeletedResponse>, HttpError> {
    info!(
        actor = %actor_params.actor_username,
        rule_id,
        "Handling delete_rule request"
    );

    let actor: Principal = parse_principal(&actor_params)?;

    let mut store = app_state.store.lock().await;
    ops_ticket_api::delete_rule(&mut store, &actor, rule_id)?;
    drop(store);

    Ok(Json(DeletedResponse { success: true }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/tickets", post(handle_create_ticket))
        .route("/tickets", get(handle_list_tickets))
        .route("/tickets/export", get(handle_export_tickets))
        .route("/tickets/{ticket_id}", get(handle_get_ticket))
        .route("/tickets/{ticket_id}/history", get(handle_ticket_history))
        .route("/tickets/{ticket_id}/claim", post(handle_claim_ticket))
        .route("/tickets/{ticket_id}/assign", post(handle_assign_operator))
        .route("/tickets/{ticket_id}/status", post(handle_update_status))
        .route("/tickets/{ticket_id}/reject", post(handle_reject_resolution))
        .route("/tickets/{ticket_id}/close", post(handle_close_ticket))
        .route("/tickets/{ticket_id}/notes", post(handle_add_note))
        .route("/tickets/{ticket_id}/edit", post(handle_edit_ticket))
        .route("/categories", get(handle_list_categories))
        .route("/categories", post(handle_create_category))
        .route(
            "/categories/{category_id}",
            put(handle_update_category).delete(handle_delete_category),
        )
        .route("/rules", get(handle_list_rules))
        .route("/rules", post(handle_create_rule))
        .route("/rules/{rule_id}", delete(handle_delete_rule))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Ops Ticket Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let store: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(store)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let store: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn admin_actor() -> ActorParams {
        ActorParams {
            actor_id: 5,
            actor_username: String::from("root"),
            actor_role: String::from("administrator"),
        }
    }

    fn requester_actor() -> ActorParams {
        ActorParams {
            actor_id: 1,
            actor_username: String::from("alice"),
            actor_role: String::from("requester"),
        }
    }

    async fn post_json(app: &Router, uri: &str, body: &impl Serialize) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Creates the "Network" category over HTTP as the admin.
    async fn seed_category(app: &Router) {
        let response: Response = post_json(
            app,
            "/categories",
            &CreateCategoryApiRequest {
                actor: admin_actor(),
                name: String::from("Network"),
            },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    fn ticket_request() -> CreateTicketApiRequest {
        CreateTicketApiRequest {
            actor: requester_actor(),
            title: String::from("Switch port down"),
            description: String::from("Port 12 on the floor switch has no link."),
            category: String::from("network"),
            shift: String::from("weekday_morning"),
        }
    }

    #[tokio::test]
    async fn test_create_ticket_succeeds() {
        let app: Router = build_router(create_test_app_state());
        seed_category(&app).await;

        let response: Response = post_json(&app, "/tickets", &ticket_request()).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let created: CreateTicketResponse = body_json(response).await;
        assert_eq!(created.ticket.status, "pending");
        assert!(created.ticket.ticket_id > 0);
        // No rule matches, so the response carries a routing notice.
        assert!(created.routing_notice.is_some());
    }

    #[tokio::test]
    async fn test_create_category_as_requester_is_forbidden() {
        let app: Router = build_router(create_test_app_state());

        let response: Response = post_json(
            &app,
            "/categories",
            &CreateCategoryApiRequest {
                actor: requester_actor(),
                name: String::from("Hardware"),
            },
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
        let error: ErrorResponse = body_json(response).await;
        assert!(error.error);
        assert!(error.message.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_invalid_shift_is_unprocessable() {
        let app: Router = build_router(create_test_app_state());
        seed_category(&app).await;

        let mut request: CreateTicketApiRequest = ticket_request();
        request.shift = String::from("graveyard");
        let response: Response = post_json(&app, "/tickets", &request).await;

        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_second_claim_is_a_conflict() {
        let app: Router = build_router(create_test_app_state());
        seed_category(&app).await;
        let created: CreateTicketResponse =
            body_json(post_json(&app, "/tickets", &ticket_request()).await).await;
        let claim_uri: String = format!("/tickets/{}/claim", created.ticket.ticket_id);
        let claim: ActorApiRequest = ActorApiRequest {
            actor: ActorParams {
                actor_id: 2,
                actor_username: String::from("bruno"),
                actor_role: String::from("supervisor"),
            },
        };

        let first: Response = post_json(&app, &claim_uri, &claim).await;
        assert_eq!(first.status(), HttpStatusCode::OK);

        let second: Response = post_json(&app, &claim_uri, &claim).await;
        assert_eq!(second.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_ticket_outside_scope_reads_as_not_found() {
        let app: Router = build_router(create_test_app_state());
        seed_category(&app).await;
        let created: CreateTicketResponse =
            body_json(post_json(&app, "/tickets", &ticket_request()).await).await;

        let uri: String = format!(
            "/tickets/{}?actor_id=6&actor_username=elena&actor_role=requester",
            created.ticket.ticket_id
        );
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_returns_csv() {
        let app: Router = build_router(create_test_app_state());
        seed_category(&app).await;
        post_json(&app, "/tickets", &ticket_request()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/tickets/export?actor_id=1&actor_username=alice&actor_role=requester")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv: String = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.starts_with("id,title,category,status"));
        assert!(csv.contains("Switch port down"));
    }
}
