use std::{fmt, sync::Arc};

use anyhow::{ensure, Context};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use repository::Repository;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::clients::upload;

mod auth;
pub mod click;
mod clients;
pub mod healthz;
pub mod login;
pub mod not_found;
pub mod post;
pub mod prefecture;
mod response;
pub mod upload_image;

pub enum ApiError {
    AuthError(String),
    ForbiddenError(String),
    ClientError(String),
    NotFoundError(String),
    ServerError(String),
}

#[derive(Clone, Debug)]
pub struct ApiState {
    repo: Repository,
    upload: Option<upload::Client>,
    config: Config,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Origin the auth callback page is allowed to post its result to.
    pub app_origin: String,
    /// Origins accepted by CORS.
    pub allowed_origins: Vec<String>,
    pub auth: AuthConfig,
    pub upload: Option<UploadConfig>,
}

#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    secure_cookie: bool,
    admin_emails: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub url: String,
}

impl AuthConfig {
    /// `auth_url` is the public URL of the deployment; an https URL means
    /// the session cookie carries the `__Secure-` prefix.
    pub fn new(
        secret: String,
        auth_url: Option<&str>,
        admin_emails: &str,
    ) -> anyhow::Result<Self> {
        let admin_emails = split_list(admin_emails);
        ensure!(!admin_emails.is_empty(), "ADMIN_EMAILS is not configured");

        Ok(Self {
            secret,
            secure_cookie: auth_url.is_some_and(|url| url.starts_with("https")),
            admin_emails,
        })
    }

    pub fn is_admin(&self, email: Option<&str>) -> bool {
        email.is_some_and(|email| self.admin_emails.iter().any(|a| a == email))
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("secure_cookie", &self.secure_cookie)
            .field("admin_emails", &self.admin_emails)
            .finish()
    }
}

impl Config {
    /// Builds the config from a secret lookup such as shuttle's
    /// `SecretStore::get` or [`util::Secrets::get`].
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = get("AUTH_SECRET").context("AUTH_SECRET was not found")?;
        let app_origin =
            get("APP_ORIGIN").context("APP_ORIGIN was not found")?;
        let admin_emails = get("ADMIN_EMAILS")
            .or_else(|| get("ADMIN_EMAIL"))
            .unwrap_or_default();

        Ok(Self {
            auth: AuthConfig::new(
                secret,
                get("AUTH_URL").as_deref(),
                &admin_emails,
            )?,
            allowed_origins: check_origins(
                get("ALLOWED_ORIGINS")
                    .map(|origins| split_list(&origins))
                    .unwrap_or_else(|| vec![app_origin.clone()]),
            )?,
            app_origin,
            upload: get("UPLOAD_API_URL").map(|url| UploadConfig { url }),
        })
    }
}

/// CORS with credentials needs explicit origins, so `*` and values that are
/// not valid header values are refused.
fn check_origins(origins: Vec<String>) -> anyhow::Result<Vec<String>> {
    for origin in &origins {
        ensure!(
            origin != "*",
            "ALLOWED_ORIGINS cannot contain `*` when credentials are allowed"
        );
        ensure!(
            origin.parse::<HeaderValue>().is_ok(),
            "ALLOWED_ORIGINS has an invalid origin: {origin}"
        );
    }

    Ok(origins)
}

/// Splits a comma separated setting, dropping blank items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        post::get_posts,
        post::create_post,
        post::update_post,
        click::search_posts,
        click::record_click,
        login::expo_web_success,
        login::get_token,
        login::get_status,
        prefecture::get_prefectures,
        prefecture::get_prefecture,
        upload_image::upload_image,
    ),
    components(schemas(
        post::request::PostRequest,
        post::response::PostResp,
        post::response::GetPostsResp,
        post::response::PostResponse,
        click::request::RecordClickRequest,
        click::response::SearchPostsResp,
        click::response::RecordClickResp,
        login::response::TokenResp,
        login::response::StatusResp,
        login::response::UserResp,
        prefecture::response::PrefectureResp,
        prefecture::response::GetPrefecturesResp,
        prefecture::response::GetPrefectureResp,
        upload_image::request::UploadRequest,
        upload_image::response::UploadResp,
    )),
    tags(
        (name = "tsukimaru", description = "Tsukimaru Map API")
    )
)]
struct ApiDoc;

pub async fn serve(
    repository: Repository,
    config: Config,
) -> anyhow::Result<Router> {
    info!(task = "start api serving");

    let upload = config
        .upload
        .as_ref()
        .map(|upload| upload::Client::new(upload.url.clone()))
        .transpose()?;
    if upload.is_none() {
        warn!("UPLOAD_API_URL is not set; image upload is disabled");
    }

    let state = Arc::new(ApiState {
        repo: repository,
        upload,
        config,
    });

    Ok(Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(router(state)))
}

/// Every route of the application, without the API docs.
pub fn router(state: Arc<ApiState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(origin) if origin != "*" => Some(origin),
            _ => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    // admin only
    let admin_router = Router::new()
        .route("/posts", post(post::create_post))
        .route("/posts/:id", put(post::update_post))
        .route(
            "/upload",
            post(upload_image::upload_image)
                .layer(DefaultBodyLimit::max(upload_image::MAX_UPLOAD_BYTES)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let api_router = Router::new()
        .route("/posts", get(post::get_posts))
        .route("/click", get(click::search_posts).post(click::record_click))
        .route("/auth/expo-web-success", get(login::expo_web_success))
        .route("/auth/token", get(login::get_token))
        .route("/auth/status", get(login::get_status))
        .route("/prefectures", get(prefecture::get_prefectures))
        .route("/prefectures/:key", get(prefecture::get_prefecture))
        .merge(admin_router)
        .fallback(not_found::get_404);

    Router::new()
        .route("/healthz", get(healthz::get_health))
        .nest("/api", api_router)
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http())
        .fallback(not_found::get_404)
        .with_state(state)
}
