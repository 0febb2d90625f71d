//! Route handlers
//!
//! Handlers read and write through the post repository and the
//! authenticator held in [`ServerState`], then hand their data to a
//! template. None of them talk to the store directly.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tera::Context;

use super::context::{session_cookie, RequestContext};
use super::error::AppError;
use super::ServerState;
use crate::auth::AuthError;
use crate::contact::ContactForm;
use crate::content::{parse_input_date, NewPost, Post, RenderedPost, RepositoryError};
use crate::templates::{list_item_context, ItemStatus, PageData};

type HandlerResult = Result<Response, AppError>;

/// Fields of the admin post forms
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub author: String,
    pub language: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub summary: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub id: String,
    #[serde(rename = "confirm-delete")]
    pub confirm_delete: String,
}

fn parse_id(value: &str) -> Result<i64, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("the post's id must be an integer".to_string()))
}

/// Template context shared by every page of a request
fn base_context(state: &ServerState, request: &RequestContext) -> Context {
    let localizer = request.localizer();
    let mut context = Context::new();
    context.insert("site", &state.site_data());
    context.insert(
        "page",
        &PageData::new(
            localizer.language(),
            request.current_path(),
            request.is_admin(),
        ),
    );
    context.insert("t", &localizer.translations());
    context
}

fn render(state: &ServerState, template: &str, context: &Context) -> Result<String, AppError> {
    Ok(state.templates.render(template, context)?)
}

fn page(state: &ServerState, template: &str, context: &Context) -> HandlerResult {
    Ok(Html(render(state, template, context)?).into_response())
}

/// Updated list entry followed by the editor, as swapped in by the admin page
fn editor_fragment(
    state: &ServerState,
    base: &Context,
    item: &RenderedPost,
    status: ItemStatus,
    editing: Option<&RenderedPost>,
) -> HandlerResult {
    let mut html = render(
        state,
        "post_list_item.html",
        &list_item_context(base, item, status),
    )?;

    let mut form = base.clone();
    form.insert("post", &editing);
    html.push_str(&render(state, "post_form.html", &form)?);

    Ok(Html(html).into_response())
}

/// GET /
pub async fn index(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
) -> HandlerResult {
    page(&state, "index.html", &base_context(&state, &request))
}

/// GET /articles/
pub async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
) -> HandlerResult {
    let posts = state
        .repository
        .list_posts(request.localizer().lang())?;

    let mut context = base_context(&state, &request);
    context.insert("posts", &posts);
    page(&state, "posts.html", &context)
}

/// GET /articles/:slug
pub async fn show_post(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
    Path(slug): Path<String>,
) -> HandlerResult {
    match state.repository.get_post_by_slug(&slug) {
        Ok(post) => {
            let mut context = base_context(&state, &request);
            context.insert("post", &post);
            page(&state, "post.html", &context)
        }
        Err(RepositoryError::NotFound) => not_found(State(state), Extension(request)).await,
        Err(e) => Err(e.into()),
    }
}

/// GET /agenda
pub async fn agenda(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
) -> HandlerResult {
    page(&state, "agenda.html", &base_context(&state, &request))
}

/// POST /contact
pub async fn contact(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
    Form(form): Form<ContactForm>,
) -> HandlerResult {
    let envelope = form.to_envelope(&state.config.title, &state.config.smtp);

    let mailer = Arc::clone(&state.mailer);
    let sent = tokio::task::spawn_blocking(move || mailer.send(&envelope))
        .await
        .map_err(|e| AppError::Mail(e.to_string()))?;

    let mut context = base_context(&state, &request);
    context.insert("sent", &sent.is_ok());
    let html = render(&state, "contact_result.html", &context)?;

    match sent {
        Ok(()) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Could not send contact message: {:#}", e);
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response())
        }
    }
}

/// GET /login
pub async fn login_form(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
) -> HandlerResult {
    let mut context = base_context(&state, &request);
    context.insert("wrong_password", &false);
    page(&state, "login.html", &context)
}

/// POST /login
pub async fn login(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
    Form(form): Form<LoginForm>,
) -> HandlerResult {
    match state.auth.authenticate(&form.password) {
        Ok(token) => {
            let cookie = session_cookie(&state.config.session_cookie, &token);
            let jar = CookieJar::new().add(cookie);
            Ok((jar, Redirect::to(&request.localizer().link("/admin"))).into_response())
        }
        Err(AuthError::WrongPassword) => {
            tracing::info!("Admin login refused: wrong password");
            let mut context = base_context(&state, &request);
            context.insert("wrong_password", &true);
            page(&state, "login.html", &context)
        }
    }
}

/// GET /logout
pub async fn logout(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
) -> Response {
    state.auth.logout();
    Redirect::temporary(&request.localizer().link("/")).into_response()
}

/// GET /admin
pub async fn admin_page(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
) -> HandlerResult {
    let posts = state.repository.list_posts("")?;

    let mut context = base_context(&state, &request);
    context.insert("posts", &posts);
    context.insert("post", &None::<RenderedPost>);
    context.insert("status", "");
    page(&state, "admin.html", &context)
}

/// GET /admin/posts/new
pub async fn new_post_form(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
) -> HandlerResult {
    let mut context = base_context(&state, &request);
    context.insert("post", &None::<RenderedPost>);
    page(&state, "post_form.html", &context)
}

/// GET /admin/posts/:id
pub async fn edit_post_form(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let post = state.repository.get_post_by_id(id)?;

    let mut context = base_context(&state, &request);
    context.insert("post", &Some(post));
    page(&state, "post_form.html", &context)
}

/// POST /admin/posts
pub async fn create_post(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
    Form(form): Form<PostForm>,
) -> HandlerResult {
    let new_post = NewPost {
        author: form.author,
        language: form.language,
        // Zero lets the repository stamp the post with the current time
        timestamp: parse_input_date(&form.date).unwrap_or(0),
        title: form.title,
        summary: form.summary,
        content: form.content,
    };

    let post = state.repository.add_post(new_post)?;

    let base = base_context(&state, &request);
    editor_fragment(&state, &base, &post, ItemStatus::New, Some(&post))
}

/// POST /admin/api/posts
pub async fn create_post_json(
    State(state): State<Arc<ServerState>>,
    Json(new_post): Json<NewPost>,
) -> Result<(StatusCode, Json<RenderedPost>), AppError> {
    let post = state.repository.add_post(new_post)?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /admin/posts/update
pub async fn update_post(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
    Form(form): Form<PostForm>,
) -> HandlerResult {
    let id = parse_id(&form.id)?;
    let timestamp =
        parse_input_date(&form.date).unwrap_or_else(|| chrono::Utc::now().timestamp());

    let post = state.repository.update_post(Post {
        id,
        language: form.language,
        slug: form.slug,
        author: form.author,
        title: form.title,
        timestamp,
        summary: form.summary,
        content: form.content,
    })?;

    let base = base_context(&state, &request);
    editor_fragment(&state, &base, &post, ItemStatus::Update, Some(&post))
}

/// POST /admin/posts/delete
pub async fn delete_post(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
    Form(form): Form<DeleteForm>,
) -> HandlerResult {
    if form.confirm_delete != "confirm" {
        return Ok(StatusCode::OK.into_response());
    }

    let id = parse_id(&form.id)?;
    state.repository.delete_post_by_id(id)?;

    let removed = RenderedPost {
        post: Post {
            id,
            ..Default::default()
        },
        html: String::new(),
        date_human: String::new(),
        date_iso: String::new(),
        date_input: String::new(),
    };

    let base = base_context(&state, &request);
    editor_fragment(&state, &base, &removed, ItemStatus::Delete, None)
}

/// Fallback for unknown routes and missing posts
pub async fn not_found(
    State(state): State<Arc<ServerState>>,
    Extension(request): Extension<RequestContext>,
) -> HandlerResult {
    let html = render(&state, "not_found.html", &base_context(&state, &request))?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}
