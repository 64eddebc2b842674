use anyhow::{Context, Result};
use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    serve, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::constants::TURN_FAILED_NOTICE;
use crate::engine::ChatEngine;
use crate::error::TurnError;
use crate::markdown;
use crate::session::ConversationSession;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    engine: ChatEngine,
    // Held for the whole turn, so turns never interleave.
    session: Arc<Mutex<ConversationSession>>,
}

impl AppState {
    pub async fn new(engine: ChatEngine) -> Result<Self> {
        let templates = create_minijinja_env().context("Failed to initialize template engine")?;
        let session = engine.start_session().await;
        Ok(Self {
            templates: Arc::new(templates),
            engine,
            session: Arc::new(Mutex::new(session)),
        })
    }
}

// Form body posted by the input box and the suggestion buttons
#[derive(Deserialize)]
struct ChatForm {
    #[serde(default)]
    message: String,
}

// Minijinja Environment setup
fn create_minijinja_env() -> Result<AutoReloader> {
    // Use AutoReloader so template edits show up without a restart
    let reloader = AutoReloader::new(|notifier| {
        // Create the loader *inside* the closure
        let loader = path_loader("templates");
        let mut env = Environment::new();
        env.set_loader(loader);
        // Watch the templates directory for changes
        notifier.watch_path("templates", true);
        Ok(env)
    });
    Ok(reloader)
}

fn render(state: &AppState, name: &str, context: minijinja::Value) -> Response {
    // Acquire env, get template, and render within the same block
    state
        .templates
        .acquire_env()
        .and_then(|env| env.get_template(name).and_then(|tmpl| tmpl.render(context)))
        .map(|body| Html(body).into_response())
        .unwrap_or_else(|e| {
            // Handle errors from acquire_env, get_template, or render
            error!("Failed to get or render template {}: {}", name, e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Internal Server Error: {}", e)),
            )
                .into_response()
        })
}

fn render_chat(state: &AppState, session: &ConversationSession, error: Option<&str>) -> Response {
    // Answers are Markdown; the template marks only this rendered HTML as safe
    let messages: Vec<_> = session
        .history()
        .iter()
        .map(|msg| minijinja::context! { role => msg.role.label(), html => markdown::to_html(&msg.text) })
        .collect();
    let context = minijinja::context! {
        title => "Ask Me Anything About CPF Bot",
        page => "chat",
        messages => messages,
        suggestions => session.suggestions().as_slice(),
        notice => session.notice(),
        error => error,
    };
    render(state, "chat.html", context)
}

// Chat page handler
async fn chat_handler(State(state): State<AppState>) -> Response {
    let session = state.session.lock().await;
    render_chat(&state, &session, None)
}

// Run one turn, then redirect back to the chat page (post/redirect/get)
async fn submit_handler(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Response {
    let mut session = state.session.lock().await;
    match state.engine.process_turn(&mut session, &form.message).await {
        Ok(_) | Err(TurnError::EmptyInput) => Redirect::to("/").into_response(),
        // Render in place; the error is not stored in the session
        Err(e) => {
            error!(error = %e, "Turn failed");
            render_chat(&state, &session, Some(TURN_FAILED_NOTICE))
        }
    }
}

// Start over with a fresh session, re-fetching the article
async fn reset_handler(State(state): State<AppState>) -> impl IntoResponse {
    // Fetch before taking the session lock
    let fresh = state.engine.start_session().await;
    *state.session.lock().await = fresh;
    info!("Session reset");
    Redirect::to("/")
}

// Static info pages
async fn about_handler(State(state): State<AppState>) -> Response {
    render(&state, "about.html", minijinja::context! { title => "About This App", page => "about" })
}

async fn methodology_handler(State(state): State<AppState>) -> Response {
    render(
        &state,
        "methodology.html",
        minijinja::context! { title => "Methodology", page => "methodology" },
    )
}

// Build our application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(chat_handler))
        .route("/chat", post(submit_handler))
        .route("/reset", post(reset_handler))
        .route("/about", get(about_handler))
        .route("/methodology", get(methodology_handler))
        // Serve static files from the `static` directory
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// Function to start the web server
pub async fn start_web_server(port: u16, engine: ChatEngine) -> Result<()> {
    // Loads the article for the first session
    let state = AppState::new(engine).await?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    // Bind using tokio::net::TcpListener
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    // Use axum::serve to run the application
    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
