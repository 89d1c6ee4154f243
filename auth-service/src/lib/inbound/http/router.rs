use std::sync::Arc;
use std::time::Duration;

use auth::AuthenticationService;
use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_post::create_post;
use super::handlers::delete_post::delete_post;
use super::handlers::get_current_user::get_current_user;
use super::handlers::get_post::get_post;
use super::handlers::list_posts::list_posts;
use super::handlers::login::login;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::update_post::update_post;
use super::middleware::authenticate as auth_middleware;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::service::PostService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::UserService;

pub type Authentication<UR> = AuthenticationService<UserService<UR>, TokenService>;

pub struct AppState<UR, PR>
where
    UR: UserRepository,
    PR: PostRepository,
{
    pub user_service: Arc<UserService<UR>>,
    pub post_service: Arc<PostService<PR>>,
    pub authentication: Arc<Authentication<UR>>,
    pub tokens: Arc<TokenService>,
}

impl<UR, PR> Clone for AppState<UR, PR>
where
    UR: UserRepository,
    PR: PostRepository,
{
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            post_service: Arc::clone(&self.post_service),
            authentication: Arc::clone(&self.authentication),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<UR, PR> AppState<UR, PR>
where
    UR: UserRepository,
    PR: PostRepository,
{
    /// Wire the repositories and the token service into the domain services.
    pub fn new(users: Arc<UR>, posts: Arc<PR>, tokens: Arc<TokenService>) -> Self {
        let user_service = Arc::new(UserService::new(users));
        let authentication = Arc::new(AuthenticationService::new(
            Arc::clone(&user_service),
            Arc::clone(&tokens),
        ));

        Self {
            user_service,
            post_service: Arc::new(PostService::new(posts)),
            authentication,
            tokens,
        }
    }
}

pub fn create_router<UR, PR>(state: AppState<UR, PR>) -> Router
where
    UR: UserRepository,
    PR: PostRepository,
{
    let public_routes = Router::new()
        .route("/api/auth/register", post(register::<UR, PR>))
        .route("/api/auth/login", post(login::<UR, PR>))
        .route("/api/auth/refresh", post(refresh::<UR, PR>));

    let protected_routes = Router::new()
        .route("/api/users/me", get(get_current_user::<UR, PR>))
        .route(
            "/api/posts",
            get(list_posts::<UR, PR>).post(create_post::<UR, PR>),
        )
        .route(
            "/api/posts/:post_id",
            get(get_post::<UR, PR>)
                .put(update_post::<UR, PR>)
                .delete(delete_post::<UR, PR>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<UR, PR>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers are left out of the span: they carry bearer tokens
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
