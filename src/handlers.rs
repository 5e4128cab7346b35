use crate::error::{AppError, Result};
use crate::models::*;
use crate::retriever::MemeRetriever;
use crate::settings;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub struct AppState {
    pub retriever: MemeRetriever,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_commands, run_command, command_image),
    components(schemas(HealthResponse, Command, CommandInfo, ReplyResponse)),
    tags(
        (name = "memes-es", description = "Random memes from Spanish meme sites")
    ),
    info(
        title = "memes-es API",
        version = "0.1.0",
        description = "Bot commands that fetch a random meme.\n\n\
                      ## Size budget\n\
                      - Each command loads up to a fixed number of random pages\n\
                      - The first image within `max_meme_size` bytes is returned\n\
                      - Otherwise the smallest oversized image is returned",
        license(name = "MIT"),
    )
)]
pub struct ApiDoc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/commands", get(list_commands))
        .route("/api/commands/:name", get(run_command))
        .route("/api/commands/:name/image", get(command_image))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(crate::middleware::reply_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "memes-es",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>> {
    let max_meme_size =
        settings::max_meme_size(state.retriever.store(), state.retriever.scope()).await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        max_meme_size,
    }))
}

/// List the available bot commands
#[utoipa::path(
    get,
    path = "/api/commands",
    tag = "memes-es",
    responses(
        (status = 200, description = "Available commands", body = Vec<CommandInfo>)
    )
)]
pub async fn list_commands() -> Json<Vec<CommandInfo>> {
    Json(Command::ALL.into_iter().map(CommandInfo::from).collect())
}

/// Run a command and return the reply with the image inlined as base64
#[utoipa::path(
    get,
    path = "/api/commands/{name}",
    tag = "memes-es",
    params(
        ("name" = String, Path, description = "Command name, e.g. cuantarazon")
    ),
    responses(
        (status = 200, description = "Meme reply", body = ReplyResponse),
        (status = 404, description = "Unknown command"),
        (status = 502, description = "Meme source failed or changed its layout")
    )
)]
pub async fn run_command(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ReplyResponse>> {
    let command: Command = name.parse().map_err(AppError::UnknownCommand)?;
    tracing::info!("Running /{}", command);

    let reply = state.retriever.get_meme(command.source_url()).await?;
    Ok(Json(reply.into()))
}

/// Run a command and return only the image as a download
#[utoipa::path(
    get,
    path = "/api/commands/{name}/image",
    tag = "memes-es",
    params(
        ("name" = String, Path, description = "Command name, e.g. cuantarazon")
    ),
    responses(
        (status = 200, description = "Meme image", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "Unknown command"),
        (status = 502, description = "Meme source failed or changed its layout")
    )
)]
pub async fn command_image(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let command: Command = name.parse().map_err(AppError::UnknownCommand)?;
    tracing::info!("Running /{} (image only)", command);

    let reply = state.retriever.get_meme(command.source_url()).await?;

    let mut headers = HeaderMap::new();
    let mime = mime_guess::from_path(&reply.filename).first_or_octet_stream();
    if let Ok(header_value) = mime.essence_str().parse() {
        headers.insert(header::CONTENT_TYPE, header_value);
    }

    if let Ok(header_value) = format!("attachment; filename=\"{}\"", reply.filename).parse() {
        headers.insert(header::CONTENT_DISPOSITION, header_value);
    }

    Ok((headers, Bytes::from(reply.bytefile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::tests::ScriptedFetcher;
    use crate::settings::{ConfigStore, MemoryStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(sizes: Vec<usize>) -> Router {
        let retriever = MemeRetriever::new(
            Arc::new(ScriptedFetcher::new(sizes)),
            Arc::new(MemoryStore::new()),
            "memes",
            10,
        );
        router(Arc::new(AppState { retriever }))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body)
    }

    #[tokio::test]
    async fn runs_command_and_returns_reply() {
        let (status, headers, body) = get(app(vec![1000]), "/api/commands/cuantarazon").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["text"], "meme 0\n\nhttp://img.test/0.png");
        assert_eq!(json["filename"], "meme.png");
        assert_eq!(json["size_bytes"], 1000);
    }

    #[tokio::test]
    async fn image_endpoint_sets_disposition() {
        let (status, headers, body) =
            get(app(vec![42]), "/api/commands/cuantocabron/image").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"meme.png\""
        );
        assert_eq!(body.len(), 42);
    }

    #[tokio::test]
    async fn unknown_command_is_404() {
        let (status, _, body) = get(app(vec![]), "/api/commands/chistes").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Unknown command: chistes");
    }

    #[tokio::test]
    async fn lists_both_commands() {
        let (status, _, body) = get(app(vec![]), "/api/commands").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["cuantarazon", "cuantocabron"]);
    }

    #[tokio::test]
    async fn health_reports_budget() {
        let store = Arc::new(MemoryStore::new());
        store.set("max_meme_size", "2048", "memes").await.unwrap();
        let retriever = MemeRetriever::new(
            Arc::new(ScriptedFetcher::new(vec![])),
            store,
            "memes",
            10,
        );
        let app = router(Arc::new(AppState { retriever }));

        let (status, _, body) = get(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["max_meme_size"], 2048);
    }
}
