use std::sync::Arc;
use std::time::Duration;

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

use super::handlers::bookmarks::create_bookmark;
use super::handlers::bookmarks::delete_bookmark;
use super::handlers::bookmarks::get_bookmark;
use super::handlers::bookmarks::list_bookmarks;
use super::handlers::bookmarks::update_bookmark;
use super::handlers::login::login;
use super::handlers::root::root;
use super::handlers::users::create_user;
use super::handlers::users::current_user;
use super::handlers::users::delete_user;
use super::handlers::users::get_user;
use super::handlers::users::list_users;
use super::handlers::users::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::bookmark::ports::BookmarkServicePort;
use crate::domain::access::AccessGuard;
use crate::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub bookmark_service: Arc<dyn BookmarkServicePort>,
    pub access_guard: Arc<AccessGuard>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    bookmark_service: Arc<dyn BookmarkServicePort>,
    access_guard: Arc<AccessGuard>,
) -> Router {
    let state = AppState {
        user_service,
        bookmark_service,
        access_guard,
    };

    let public_routes = Router::new()
        .route("/", get(root))
        .route("/auth/token", post(login))
        .route("/api/v1/users", post(create_user));

    let protected_routes = Router::new()
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/me", get(current_user))
        .route(
            "/api/v1/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/api/v1/bookmarks",
            get(list_bookmarks).post(create_bookmark),
        )
        .route(
            "/api/v1/bookmarks/:bookmark_id",
            get(get_bookmark)
                .put(update_bookmark)
                .delete(delete_bookmark),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
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

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::Authenticator;
    use axum::body::to_bytes;
    use axum::http::header;
    use axum::http::StatusCode;
    use chrono::Utc;
    use mockall::mock;
    use tower::ServiceExt;

    use super::*;
    use crate::bookmark::errors::BookmarkError;
    use crate::domain::bookmark::models::Bookmark;
    use crate::domain::bookmark::models::BookmarkId;
    use crate::domain::bookmark::models::BookmarkTitle;
    use crate::domain::bookmark::models::BookmarkUrl;
    use crate::domain::bookmark::models::CreateBookmarkCommand;
    use crate::domain::bookmark::models::UpdateBookmarkCommand;
    use crate::domain::user::models::AccessToken;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::NewUser;
    use crate::domain::user::models::RegisterUserCommand;
    use crate::domain::user::models::UpdateUserCommand;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::Username;
    use crate::user::errors::UserError;
    use crate::user::ports::UserRepository;

    mock! {
        pub TestUserService {}

        #[async_trait]
        impl UserServicePort for TestUserService {
            async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;
            async fn login(&self, username: &str, password: &str) -> Result<AccessToken, UserError>;
            async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
            async fn list_users(&self) -> Result<Vec<User>, UserError>;
            async fn update_user(&self, id: &UserId, command: UpdateUserCommand) -> Result<User, UserError>;
            async fn delete_user(&self, id: &UserId) -> Result<User, UserError>;
        }
    }

    mock! {
        pub TestBookmarkService {}

        #[async_trait]
        impl BookmarkServicePort for TestBookmarkService {
            async fn create_bookmark(&self, owner_id: &UserId, command: CreateBookmarkCommand) -> Result<Bookmark, BookmarkError>;
            async fn list_bookmarks(&self, owner_id: &UserId) -> Result<Vec<Bookmark>, BookmarkError>;
            async fn get_bookmark(&self, owner_id: &UserId, id: &BookmarkId) -> Result<Bookmark, BookmarkError>;
            async fn update_bookmark(&self, owner_id: &UserId, id: &BookmarkId, command: UpdateBookmarkCommand) -> Result<Bookmark, BookmarkError>;
            async fn delete_bookmark(&self, owner_id: &UserId, id: &BookmarkId) -> Result<(), BookmarkError>;
        }
    }

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn alice() -> User {
        User {
            id: UserId(1),
            username: Username::new("alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$unused".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn router_with(user_service: MockTestUserService) -> (Router, Arc<Authenticator>) {
        router_with_services(user_service, MockTestBookmarkService::new())
    }

    fn router_with_services(
        user_service: MockTestUserService,
        bookmark_service: MockTestBookmarkService,
    ) -> (Router, Arc<Authenticator>) {
        let authenticator = Arc::new(Authenticator::new(SECRET));

        let mut users = MockTestUserRepository::new();
        users.expect_find_by_username().returning(|username| {
            Ok((username == "alice").then(alice))
        });

        let guard = Arc::new(AccessGuard::new(Arc::clone(&authenticator), Arc::new(users)));
        let router = create_router(
            Arc::new(user_service),
            Arc::new(bookmark_service),
            guard,
        );

        (router, authenticator)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_is_public() {
        let (router, _) = router_with(MockTestUserService::new());

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body,
            serde_json::json!({ "message": "Welcome to the Bookmark Manager API" })
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_challenged() {
        let (router, _) = router_with(MockTestUserService::new());

        let response = router
            .oneshot(Request::get("/api/v1/users/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        let body = json_body(response).await;
        assert_eq!(body["data"]["message"], "Could not validate credentials");
    }

    #[tokio::test]
    async fn test_login_form_rejection() {
        let mut user_service = MockTestUserService::new();
        user_service
            .expect_login()
            .withf(|username, password| username == "alice" && password == "wrong")
            .times(1)
            .returning(|_, _| Err(UserError::InvalidCredentials));

        let (router, _) = router_with(user_service);

        let response = router
            .oneshot(
                Request::post("/auth/token")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=alice&password=wrong"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
        let body = json_body(response).await;
        assert_eq!(body["data"]["message"], "Incorrect username or password");
    }

    #[tokio::test]
    async fn test_login_form_success() {
        let mut user_service = MockTestUserService::new();
        user_service
            .expect_login()
            .returning(|_, _| Ok(AccessToken("signed.token.value".to_string())));

        let (router, _) = router_with(user_service);

        let response = router
            .oneshot(
                Request::post("/auth/token")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=alice&password=secret"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["access_token"], "signed.token.value");
        assert_eq!(body["token_type"], "bearer");
    }

    #[tokio::test]
    async fn test_current_user_from_token() {
        let (router, authenticator) = router_with(MockTestUserService::new());
        let token = authenticator.issue_token("alice").unwrap();

        let response = router
            .oneshot(
                Request::get("/api/v1/users/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["username"], "alice");
        assert!(body["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_list_bookmarks_for_token_owner() {
        let mut bookmark_service = MockTestBookmarkService::new();
        bookmark_service
            .expect_list_bookmarks()
            .withf(|owner_id| *owner_id == UserId(1))
            .times(1)
            .returning(|owner_id| {
                Ok(vec![Bookmark {
                    id: BookmarkId(3),
                    owner_id: *owner_id,
                    title: BookmarkTitle::new("Rust".to_string()).unwrap(),
                    description: None,
                    url: BookmarkUrl::new("https://www.rust-lang.org/").unwrap(),
                    created_at: Utc::now(),
                }])
            });

        let (router, authenticator) =
            router_with_services(MockTestUserService::new(), bookmark_service);
        let token = authenticator.issue_token("alice").unwrap();

        let response = router
            .oneshot(
                Request::get("/api/v1/bookmarks")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"][0]["id"], 3);
        assert_eq!(body["data"][0]["user_id"], 1);
        assert_eq!(body["data"][0]["url"], "https://www.rust-lang.org/");
    }

    #[tokio::test]
    async fn test_update_of_other_account_is_forbidden() {
        let mut user_service = MockTestUserService::new();
        user_service.expect_update_user().times(0);

        let (router, authenticator) = router_with(user_service);
        let token = authenticator.issue_token("alice").unwrap();

        let response = router
            .oneshot(
                Request::put("/api/v1/users/2")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"username":"mallory"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
