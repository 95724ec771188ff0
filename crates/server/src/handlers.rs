#![forbid(unsafe_code)]

use crate::error::AppError;
use crate::pages::{self, ProjectPage};
use crate::render::RenderFormat;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use bubbles_core::dot::{RankDir, render_dot};
use bubbles_core::graph::{ActivityView, Pair};
use bubbles_core::ids::ProjectId;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const HX_LOCATION: HeaderName = HeaderName::from_static("hx-location");
const HX_REFRESH: HeaderName = HeaderName::from_static("hx-refresh");

/// Query string shared by every project-scoped endpoint. Flags such as
/// `vertical` are present-or-absent, with no value.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProjectQuery {
    #[serde(rename = "pID")]
    pid: Option<String>,
    vertical: Option<String>,
    download: Option<String>,
    left: Option<String>,
    right: Option<String>,
    bubble: Option<String>,
}

impl ProjectQuery {
    fn project_id(&self) -> Result<ProjectId, AppError> {
        ProjectId::parse(self.pid.as_deref().unwrap_or_default())
            .map_err(|err| AppError::BadRequest(err.message().to_string()))
    }

    fn rankdir(&self) -> RankDir {
        RankDir::from_vertical(self.vertical.is_some())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewProjectForm {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TripleForm {
    #[serde(rename = "newLeft", default)]
    left: String,
    #[serde(rename = "newCenter", default)]
    center: String,
    #[serde(rename = "newRight", default)]
    right: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RenameForm {
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivityForm {
    #[serde(default)]
    activity: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GraphResponse {
    project: ProjectJson,
    pairs: Vec<Pair>,
    activities: Vec<ActivityView>,
    source: String,
}

#[derive(Debug, Serialize)]
struct ProjectJson {
    id: ProjectId,
    name: String,
    created_at: String,
}

fn hx_location(id: ProjectId, rankdir: RankDir) -> Response {
    let target = pages::project_href(id, rankdir);
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&target) {
        Ok(value) => {
            headers.insert(HX_LOCATION, value);
        }
        Err(err) => warn!(%target, %err, "unrepresentable HX-Location"),
    }
    (StatusCode::OK, headers).into_response()
}

pub(crate) async fn health() -> impl IntoResponse {
    "ok"
}

pub(crate) async fn list_projects(
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let projects = state.with_store(|store| store.list_projects()).await?;
    Ok(Html(pages::project_list(&projects)))
}

pub(crate) async fn create_project(
    State(state): State<AppState>,
    Form(form): Form<NewProjectForm>,
) -> Result<Response, AppError> {
    let project = state
        .with_store(move |store| store.create_project(&form.name))
        .await?;
    info!(pid = %project.id, name = %project.name, "project created");
    Ok(hx_location(project.id, RankDir::default()))
}

pub(crate) async fn delete_project(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Response, AppError> {
    let id = query.project_id()?;
    let existed = state.with_store(move |store| store.delete_project(id)).await?;
    info!(pid = %id, existed, "project deleted");
    let mut headers = HeaderMap::new();
    headers.insert(HX_REFRESH, HeaderValue::from_static("true"));
    Ok((StatusCode::OK, headers).into_response())
}

pub(crate) async fn project_page(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Response, AppError> {
    let id = query.project_id()?;
    let rankdir = query.rankdir();
    let snapshot = state.with_store(move |store| store.project_graph(id)).await?;
    let source = render_dot(id, &snapshot.graph, rankdir);

    if query.download.is_some() {
        return match state.renderer().render(&source, RenderFormat::Png).await {
            Ok(bytes) => Ok((
                [
                    (header::CONTENT_TYPE, RenderFormat::Png.content_type()),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"graph.png\""),
                ],
                bytes,
            )
                .into_response()),
            Err(err) => {
                warn!(pid = %id, %err, "png render failed");
                Ok((StatusCode::BAD_GATEWAY, format!("{err}\n\n{source}")).into_response())
            }
        };
    }

    let (svg, render_error) = match state.renderer().render(&source, RenderFormat::Svg).await {
        Ok(bytes) => (Some(String::from_utf8_lossy(&bytes).into_owned()), None),
        Err(err) => {
            warn!(pid = %id, %err, "svg render failed");
            (None, Some(err.to_string()))
        }
    };

    let html = pages::project_page(&ProjectPage {
        project: &snapshot.project,
        graph: &snapshot.graph,
        rankdir,
        svg: svg.as_deref(),
        render_error: render_error.as_deref(),
        source: &source,
    });
    Ok(Html(html).into_response())
}

pub(crate) async fn graph_json(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<GraphResponse>, AppError> {
    let id = query.project_id()?;
    let rankdir = query.rankdir();
    let snapshot = state.with_store(move |store| store.project_graph(id)).await?;
    let source = render_dot(id, &snapshot.graph, rankdir);
    Ok(Json(GraphResponse {
        project: ProjectJson {
            id,
            name: snapshot.project.name.clone(),
            created_at: pages::ts_ms_to_rfc3339(snapshot.project.created_at_ms),
        },
        pairs: snapshot.graph.pairs().to_vec(),
        activities: snapshot.graph.activities(),
        source,
    }))
}

pub(crate) async fn store_triple(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
    Form(form): Form<TripleForm>,
) -> Result<Response, AppError> {
    let id = query.project_id()?;
    let inserted = state
        .with_store(move |store| store.add_triple(id, &form.left, &form.center, &form.right))
        .await?;
    info!(pid = %id, inserted, "pairs stored");
    Ok(hx_location(id, query.rankdir()))
}

pub(crate) async fn remove_pair(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Response, AppError> {
    let id = query.project_id()?;
    let left = query.left.clone().unwrap_or_default();
    let right = query.right.clone().unwrap_or_default();
    let removed = state
        .with_store(move |store| store.remove_pair(id, &left, &right))
        .await?;
    info!(pid = %id, removed, "pair removed");
    Ok(hx_location(id, query.rankdir()))
}

pub(crate) async fn rename_activity(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
    Form(form): Form<RenameForm>,
) -> Result<Response, AppError> {
    let id = query.project_id()?;
    let (from, to) = (form.from.clone(), form.to.clone());
    let outcome = state
        .with_store(move |store| store.rename_activity(id, &form.from, &form.to))
        .await?;
    info!(
        pid = %id,
        %from,
        %to,
        rewritten = outcome.pairs_rewritten,
        merged = outcome.pairs_merged,
        state_moved = outcome.state_moved,
        "activity renamed"
    );
    Ok(hx_location(id, query.rankdir()))
}

pub(crate) async fn delete_activity(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
    Form(form): Form<ActivityForm>,
) -> Result<Response, AppError> {
    let id = query.project_id()?;
    let removed = state
        .with_store(move |store| store.remove_activity(id, &form.activity))
        .await?;
    info!(pid = %id, removed, "activity deleted");
    Ok(hx_location(id, query.rankdir()))
}

pub(crate) async fn flip(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Redirect, AppError> {
    let id = query.project_id()?;
    let bubble = query.bubble.clone().unwrap_or_default();
    let next = state
        .with_store(move |store| store.flip_state(id, &bubble))
        .await?;
    info!(pid = %id, state = %next, "bubble flipped");
    Ok(Redirect::to(&pages::project_href(id, query.rankdir())))
}
