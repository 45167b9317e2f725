//! End-to-end stack tests with container-backed middleware.
//!
//! These tests build middleware the way an application does: identifiers
//! resolved through a container, grouped, and attached to a stack around a
//! route.

use bytes::Bytes;
use daedalus_core::{
    empty_response, BoxFuture, Container, HandlerResult, Middleware, Next, Request, Response,
    ResponseExt, Route, Service, ServiceResolver,
};
use daedalus_middleware::{GlobalMiddlewares, MiddlewareFactory, MiddlewareGroups, MiddlewareStack};
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};

/// Rejects requests without the golden key header.
struct GoldenKeyAuth;

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
            if request.headers().get("goldenkey").is_some_and(|v| v == "gold") {
                next.run(request, response).await
            } else {
                Ok(response.with_json(
                    StatusCode::UNAUTHORIZED,
                    &serde_json::json!({"error": "YOU SHALL NOT PASS!"}),
                ))
            }
        })
    }
}

/// Appends its tag to the `x-trail` header on the way in.
struct Trail {
    tag: &'static str,
    seen: Arc<Mutex<Vec<&'static str>>>,
}

impl Middleware for Trail {
    fn name(&self) -> &str {
        self.tag
    }

    fn process<'a>(
        &'a self,
        request: Request,
        response: Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(self.tag);
            let response = response.with_header(
                HeaderName::from_static("x-trail"),
                HeaderValue::from_static(self.tag),
            );
            next.run(request, response).await
        })
    }
}

fn factory(seen: &Arc<Mutex<Vec<&'static str>>>) -> MiddlewareFactory {
    let mut container = Container::new();
    container.register(Service::middleware(GoldenKeyAuth));
    for tag in ["cors", "audit", "version"] {
        container.register_named(
            tag,
            Service::middleware(Trail {
                tag,
                seen: Arc::clone(seen),
            }),
        );
    }
    MiddlewareFactory::new(ServiceResolver::new(Arc::new(container)))
}

fn request(golden_key: Option<&str>) -> Request {
    let mut builder = http::Request::builder().uri("/new-api/2.0/channels");
    if let Some(key) = golden_key {
        builder = builder.header("goldenkey", key);
    }
    builder.body(Full::new(Bytes::new())).unwrap()
}

struct HelloWorldRoute;

impl Route for HelloWorldRoute {
    fn handle<'a>(&'a self, _request: Request, response: Response) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            Ok(response.with_json(StatusCode::OK, &serde_json::json!(["Hello World"])))
        })
    }
}

async fn body(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

#[tokio::test]
async fn test_authorized_request_reaches_route() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let factory = factory(&seen);
    let auth = std::any::type_name::<GoldenKeyAuth>();

    let mut stack = MiddlewareStack::new();
    stack.extend(factory.create_from_identifiers(&[auth, "cors"]).unwrap());

    let route = HelloWorldRoute;
    let response = stack
        .run(request(Some("gold")), empty_response(), Next::route(&route))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await, Bytes::from(r#"["Hello World"]"#));
    assert_eq!(*seen.lock().unwrap(), vec!["cors"]);
}

#[tokio::test]
async fn test_short_circuit_keeps_outer_headers() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let factory = factory(&seen);
    let auth = std::any::type_name::<GoldenKeyAuth>();

    // cors attached last, so it runs before the auth check
    let mut stack = MiddlewareStack::new();
    stack.extend(factory.create_from_identifiers(&[auth, "cors"]).unwrap());

    let route = HelloWorldRoute;
    let response = stack
        .run(request(None), empty_response(), Next::route(&route))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("x-trail").unwrap(), "cors");
    assert_eq!(
        body(response).await,
        Bytes::from(r#"{"error":"YOU SHALL NOT PASS!"}"#)
    );
}

#[tokio::test]
async fn test_groups_and_globals_compose() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let factory = factory(&seen);

    let mut definitions: IndexMap<String, Vec<String>> = IndexMap::new();
    definitions.insert("cross-origin".to_string(), vec!["cors".to_string()]);
    definitions.insert("new-api/2.0".to_string(), vec!["version".to_string()]);
    let groups = MiddlewareGroups::build(&factory, &definitions).unwrap();

    let none: [&str; 0] = [];
    let globals = GlobalMiddlewares::build(&factory, &none, &none, &["audit"]).unwrap();

    let mut stack = MiddlewareStack::new();
    stack
        .extend(groups.get_middlewares_for_groups(&["cross-origin"]))
        .extend(groups.get_middlewares("new-api/2.0"))
        .extend(globals.after_route().iter().cloned());

    assert_eq!(stack.names(), vec!["cors", "version", "audit"]);

    let route = HelloWorldRoute;
    stack
        .run(request(Some("gold")), empty_response(), Next::route(&route))
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["audit", "version", "cors"]);
}
