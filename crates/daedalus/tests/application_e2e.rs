//! End-to-end tests: configuration file → application → responses.

use bytes::Bytes;
use daedalus::prelude::*;
use daedalus_config::ConfigError;
use daedalus_routing::RegistrationError;
use http::header::{HeaderName, HeaderValue};
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use serde_json::json;
use std::sync::{Arc, Mutex};

const ROUTES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/routes.yaml");

type Trail = Arc<Mutex<Vec<&'static str>>>;

/// Records its name on the way in and sets a proof header on the way out.
struct Tag {
    name: &'static str,
    proof: Option<(&'static str, &'static str)>,
    trail: Trail,
}

impl Middleware for Tag {
    fn name(&self) -> &str {
        self.name
    }

    fn process<'a>(
        &'a self,
        request: Request,
        response: Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            self.trail.lock().unwrap().push(self.name);
            let response = next.run(request, response).await?;
            Ok(match self.proof {
                Some((name, value)) => response.with_header(
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                ),
                None => response,
            })
        })
    }
}

struct GoldenKeyAuth {
    trail: Trail,
}

impl Middleware for GoldenKeyAuth {
    fn name(&self) -> &str {
        "golden-key"
    }

    fn process<'a>(
        &'a self,
        request: Request,
        response: Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            self.trail.lock().unwrap().push("golden-key");
            let authorized = request
                .headers()
                .get("goldenkey")
                .is_some_and(|key| key == "uber-secret-token-made-of-pure-gold");
            if authorized {
                next.run(request, response).await
            } else {
                Ok(Response::error_json(StatusCode::UNAUTHORIZED, "YOU SHALL NOT PASS!"))
            }
        })
    }
}

struct JsonRoute(serde_json::Value, StatusCode);

impl Route for JsonRoute {
    fn handle<'a>(&'a self, _request: Request, response: Response) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move { Ok(response.with_json(self.1, &self.0)) })
    }
}

struct ChannelUsersRoute;

impl Route for ChannelUsersRoute {
    fn handle<'a>(&'a self, request: Request, response: Response) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let channel_id = request.required_argument("channelId")?;
            let limit = request
                .query_param("limit")?
                .unwrap_or_else(|| "50".to_string());
            Ok(response.with_json(
                StatusCode::OK,
                &json!({"channelId": channel_id, "limit": limit, "users": []}),
            ))
        })
    }
}

struct ErroringRoute;

impl Route for ErroringRoute {
    fn handle<'a>(&'a self, _request: Request, _response: Response) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async { Err("Error or not to error, that's the question!".into()) })
    }
}

struct MessageHandler(StatusCode, &'static str);

impl ErrorHandler for MessageHandler {
    fn handle(&self, _head: &RequestHead, _failure: &Failure, response: Response) -> Response {
        response.with_json(self.0, &json!({"error": self.1}))
    }
}

struct ApiErrorHandler;

impl ErrorHandler for ApiErrorHandler {
    fn handle(&self, _head: &RequestHead, failure: &Failure, _response: Response) -> Response {
        let message = match failure {
            Failure::Error(err) => err.to_string(),
            other => format!("{other:?}"),
        };
        Response::error_json(StatusCode::INTERNAL_SERVER_ERROR, &message)
    }
}

fn container(trail: &Trail) -> Container {
    let mut container = Container::new();
    let tag = |name, proof| {
        Service::middleware(Tag {
            name,
            proof,
            trail: Arc::clone(trail),
        })
    };

    container.register_named(
        "app.beforeRequest",
        tag(
            "before-request",
            Some(("processed-by-before-request-middleware", "proof-for-before-request")),
        ),
    );
    container.register_named(
        "app.beforeRoute",
        tag(
            "before-route",
            Some(("processed-by-before-route-middlewares", "proof-for-before-route")),
        ),
    );
    container.register_named("app.afterRoute", tag("after-route", None));
    container.register_named("app.onlyApiGroup", tag("only-api-group", None));
    container.register_named(
        "app.goldenKeyAuth",
        Service::middleware(GoldenKeyAuth {
            trail: Arc::clone(trail),
        }),
    );

    container.register_named(
        "app.listChannels",
        Service::route(JsonRoute(json!([{"channelId": "fb_1234"}]), StatusCode::OK)),
    );
    container.register_named(
        "app.createChannel",
        Service::route(JsonRoute(json!({"channelId": "fb_1234"}), StatusCode::CREATED)),
    );
    container.register_named("app.channelUsers", Service::route(ChannelUsersRoute));
    container.register_named("app.erroringRoute", Service::route(ErroringRoute));
    container.register_named(
        "app.helloWorld",
        Service::route(JsonRoute(json!(["Hello World"]), StatusCode::OK)),
    );

    container.register_named(
        "app.notFoundHandler",
        Service::error_handler(MessageHandler(StatusCode::NOT_FOUND, "Dummy NotFoundHandler here!")),
    );
    container.register_named(
        "app.notAllowedHandler",
        Service::error_handler(MessageHandler(
            StatusCode::METHOD_NOT_ALLOWED,
            "Dummy NotAllowedHandler here!",
        )),
    );
    container.register_named("app.apiErrorHandler", Service::error_handler(ApiErrorHandler));
    container
}

fn definition() -> ApiDefinition {
    ConfigLoader::new().with_file(ROUTES).unwrap().load().unwrap()
}

fn app_with_trail() -> (Application, Trail) {
    let trail = Trail::default();
    let app = ApplicationFactory::new(definition(), Arc::new(container(&trail)))
        .create(None)
        .unwrap();
    (app, trail)
}

fn request(method: Method, uri: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn body(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn not_found_goes_to_not_found_handler() {
    let (app, _) = app_with_trail();
    let response = app.handle(request(Method::POST, "/non-existing/path")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get("processed-by-before-request-middleware")
            .unwrap(),
        "proof-for-before-request"
    );
    assert_eq!(body(response).await, r#"{"error":"Dummy NotFoundHandler here!"}"#);
}

#[tokio::test]
async fn unmapped_method_goes_to_not_allowed_handler() {
    let (app, _) = app_with_trail();
    let response = app.handle(request(Method::PATCH, "/new-api/2.0/channels")).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body(response).await, r#"{"error":"Dummy NotAllowedHandler here!"}"#);
}

#[tokio::test]
async fn route_error_goes_to_error_handler() {
    let (app, _) = app_with_trail();
    let response = app.handle(request(Method::POST, "/new-api/2.0/error")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body(response).await,
        r#"{"error":"Error or not to error, that's the question!"}"#
    );
}

#[tokio::test]
async fn golden_key_denies_without_key() {
    let (app, _) = app_with_trail();
    let response = app.handle(request(Method::POST, "/new-api/2.0/channels")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get("processed-by-before-route-middlewares")
            .unwrap(),
        "proof-for-before-route"
    );
    assert_eq!(
        response
            .headers()
            .get("processed-by-before-request-middleware")
            .unwrap(),
        "proof-for-before-request"
    );
    assert_eq!(body(response).await, r#"{"error":"YOU SHALL NOT PASS!"}"#);
}

#[tokio::test]
async fn golden_key_allows_with_key() {
    let (app, trail) = app_with_trail();
    let mut request = request(Method::POST, "/new-api/2.0/channels");
    request.headers_mut().insert(
        "goldenkey",
        HeaderValue::from_static("uber-secret-token-made-of-pure-gold"),
    );
    let response = app.handle(request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body(response).await, r#"{"channelId":"fb_1234"}"#);

    // attached: golden-key, only-api-group, after-route; last attached runs first
    assert_eq!(
        *trail.lock().unwrap(),
        vec![
            "before-request",
            "before-route",
            "after-route",
            "only-api-group",
            "golden-key"
        ]
    );
}

#[tokio::test]
async fn ignoring_version_group_skips_it() {
    let (app, trail) = app_with_trail();
    let response = app.handle(request(Method::GET, "/new-api/2.0/hello")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await, r#"["Hello World"]"#);
    assert_eq!(
        *trail.lock().unwrap(),
        vec!["before-request", "before-route", "after-route"]
    );
}

#[tokio::test]
async fn route_arguments_reach_the_route() {
    let (app, _) = app_with_trail();
    let response = app
        .handle(request(Method::GET, "/new-api/2.0/channels/fb_1234/users"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body(response).await,
        r#"{"channelId":"fb_1234","limit":"50","users":[]}"#
    );
    assert_eq!(
        app.router()
            .url_for("channel-users", &[("channelId", "xyz")])
            .unwrap(),
        "/new-api/2.0/channels/xyz/users"
    );
}

#[tokio::test]
async fn route_reads_query_params() {
    let (app, _) = app_with_trail();
    let response = app
        .handle(request(
            Method::GET,
            "/new-api/2.0/channels/fb_1234/users?limit=10&limit=20",
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body(response).await,
        r#"{"channelId":"fb_1234","limit":"20","users":[]}"#
    );
}

#[tokio::test]
async fn disabled_route_is_not_registered() {
    let (app, _) = app_with_trail();
    let response = app.handle(request(Method::GET, "/new-api/2.0/archived")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.router().len(), 6);
}

#[tokio::test]
async fn default_route_names_and_lowercase_methods() {
    let (app, _) = app_with_trail();
    let status = app.router().route_by_name("/chat/1.0/status").unwrap();
    assert_eq!(status.methods(), &[Method::GET]);
    assert_eq!(
        status.middleware_names(),
        vec!["app.afterRoute"]
    );
}

#[tokio::test]
async fn necessary_routes_only() {
    let trail = Trail::default();
    let mut definition = definition();
    definition.settings.register_only_necessary_routes = true;

    let app = ApplicationFactory::new(definition, Arc::new(container(&trail)))
        .create(Some("/chat/1.0/status?verbose=1"))
        .unwrap();

    assert_eq!(app.router().len(), 1);
    let response = app.handle(request(Method::GET, "/chat/1.0/status")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.handle(request(Method::GET, "/new-api/2.0/channels")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shared_route_cache_serves_later_applications() {
    let trail = Trail::default();
    let container = Arc::new(container(&trail));
    let cache = Arc::new(InMemoryRouteCache::new());

    let mut definition = definition();
    definition.settings.register_only_necessary_routes = true;
    definition.settings.use_route_cache = true;

    let first = ApplicationFactory::new(definition.clone(), Arc::clone(&container))
        .with_cache(cache.clone())
        .create(Some("/chat/1.0/status"))
        .unwrap();
    assert_eq!(first.router().len(), 1);
    assert!(cache.exists("filtered_routes.chat/1.0"));

    // the cached entry wins over the changed definition
    definition.routes["chat/1.0"]["extra"] = json!({"GET": {"service": "app.helloWorld"}});
    let second = ApplicationFactory::new(definition, container)
        .with_cache(cache)
        .create(Some("/chat/1.0/status"))
        .unwrap();
    assert_eq!(second.router().len(), 1);
}

#[test]
fn layered_override_unregisters_a_route() {
    let dir = tempfile::TempDir::new().unwrap();
    let local = dir.path().join("routes.local.json");
    std::fs::write(
        &local,
        r#"{"routes": {"new-api/2.0": {"channels": {"POST": null}}}}"#,
    )
    .unwrap();

    let definition = ConfigLoader::new()
        .with_file(ROUTES)
        .unwrap()
        .with_file(&local)
        .unwrap()
        .load()
        .unwrap();

    let trail = Trail::default();
    let app = ApplicationFactory::new(definition, Arc::new(container(&trail)))
        .create(None)
        .unwrap();
    assert!(app.router().route_by_name("create-channel").is_none());
}

#[test]
fn typo_in_configuration_fails_startup() {
    let definition = ConfigLoader::new()
        .with_string(
            "routes:\n  chat/1.0:\n    status:\n      GET:\n        service: app.helloWorld\n        nme: status\n",
            "yaml",
        )
        .unwrap()
        .load()
        .unwrap();

    let trail = Trail::default();
    let err = ApplicationFactory::new(definition, Arc::new(container(&trail)))
        .create(None)
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Registration(RegistrationError::ConfigurationTypo { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Unexpected route definition key in \"chat/1.0 › status › GET › nme\", did you mean \"name\"?"
    );
}

#[test]
fn unknown_handler_fails_startup() {
    let mut definition = definition();
    definition.handlers.error = Some("app.missing".to_string());

    let trail = Trail::default();
    let err = ApplicationFactory::new(definition, Arc::new(container(&trail)))
        .create(None)
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Service(_)));
}

#[test]
fn invalid_configuration_is_a_config_error() {
    let err = ConfigLoader::new()
        .with_string("{\"settings\": {\"apiPrefix\": \"api\"}}", "json")
        .unwrap()
        .load()
        .unwrap_err();
    let err: ApplicationError = err.into();
    assert!(matches!(err, ApplicationError::Config(ConfigError::InvalidValue { .. })));
}
