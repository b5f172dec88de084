//! Handlers for snippet pages.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use snippetbox_core::forms::FormData;
use snippetbox_core::snippets::{validate_create_form, ExpiryDays, DEFAULT_RECENT_LIMIT};
use snippetbox_core::types::DbId;
use snippetbox_db::models::snippet::CreateSnippet;
use snippetbox_db::repositories::SnippetRepo;

use super::render;
use crate::context::RequestContext;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;

pub const MSG_SNIPPET_CREATED: &str = "Snippet successfully created!";

/// Expiry preselected on a blank create form.
const DEFAULT_EXPIRES: &str = "365";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query string of the legacy `/snippet?id=N` form.
#[derive(Debug, Deserialize)]
pub struct SnippetQuery {
    pub id: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
///
/// The most recent live snippets, newest first.
pub async fn home(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    let snippets = SnippetRepo::list_recent(&state.pool, DEFAULT_RECENT_LIMIT).await?;

    let mut data = ctx.template_data();
    data.snippets = snippets;
    render(&state, StatusCode::OK, "home.page", &data)
}

/// GET /snippet/{id}
///
/// Anything other than a positive integer id is treated as not found.
pub async fn show(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_id): Path<String>,
) -> AppResult<Response> {
    let id = parse_snippet_id(&raw_id).ok_or(AppError::NotFound)?;
    show_snippet(&state, &ctx, id).await
}

/// GET /snippet?id={id}
pub async fn show_legacy(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<SnippetQuery>,
) -> AppResult<Response> {
    let id = query
        .id
        .as_deref()
        .and_then(parse_snippet_id)
        .ok_or(AppError::NotFound)?;
    show_snippet(&state, &ctx, id).await
}

/// GET /snippet/create
pub async fn create_form(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    let mut data = ctx.template_data();
    data.form = Some(FormData::new([("expires", DEFAULT_EXPIRES)]));
    render(&state, StatusCode::OK, "create.page", &data)
}

/// POST /snippet/create
///
/// Validates the form, stores the snippet and redirects to its page with a
/// flash message.
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    AuthenticatedUser(user): AuthenticatedUser,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let mut form = FormData::new(fields);
    validate_create_form(&mut form);

    if !form.is_valid() {
        let mut data = ctx.template_data();
        data.form = Some(form);
        return render(&state, StatusCode::BAD_REQUEST, "create.page", &data);
    }

    let input = CreateSnippet {
        title: form.get("title").to_string(),
        content: form.get("content").to_string(),
        expires: form.get("expires").parse::<ExpiryDays>()?,
    };
    let id = SnippetRepo::create(&state.pool, &input).await?;
    tracing::info!(snippet_id = id, user_id = user.id, "Snippet published");

    ctx.session().put_flash(MSG_SNIPPET_CREATED);
    Ok(Redirect::to(&format!("/snippet/{id}")).into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn show_snippet(state: &AppState, ctx: &RequestContext, id: DbId) -> AppResult<Response> {
    let snippet = SnippetRepo::find_by_id(&state.pool, id).await?;

    let mut data = ctx.template_data();
    data.snippet = Some(snippet);
    render(state, StatusCode::OK, "show.page", &data)
}

fn parse_snippet_id(raw: &str) -> Option<DbId> {
    raw.parse::<DbId>().ok().filter(|id| *id > 0)
}
