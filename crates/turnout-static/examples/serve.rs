//! Minimal HTTP server wiring a turnout router to hyper.
//!
//! Run with `cargo run -p turnout-static --example serve`, then try:
//!
//! ```text
//! curl -i http://127.0.0.1:3000/
//! curl -i http://127.0.0.1:3000/hello/you
//! curl -i http://127.0.0.1:3000/users/42
//! curl -i -X POST -d '{"ping":true}' http://127.0.0.1:3000/echo
//! curl -i http://127.0.0.1:3000/no/such/page
//! ```
//!
//! If a `./public` directory exists it is mounted under `/static`.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request as HyperRequest, Response as HyperResponse, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use turnout::{MiddlewareStack, Request, RequestLog, Response, Router, Slot};

async fn greet(req: Request) -> Response {
    let mut name = String::new();
    if !req.extract("/hello/*", &mut [Slot::Text(&mut name)]) {
        return Response::not_found();
    }
    Response::text(format!("hello, {name}!"))
}

async fn user_detail(req: Request) -> Response {
    let mut id = 0i64;
    if !req.extract("/users/*", &mut [Slot::I64(&mut id)]) {
        return Response::not_found().body("user ids are numeric");
    }
    Response::json(&serde_json::json!({ "id": id, "name": format!("user-{id}") }))
}

async fn echo(req: Request) -> Response {
    match req.json::<serde_json::Value>() {
        Ok(value) => Response::json(&value),
        Err(_) => Response::new(400).body(b"expected a JSON body".to_vec()),
    }
}

fn build_router() -> turnout_static::Result<Router> {
    let logged = MiddlewareStack::new().with(RequestLog);

    let mut router = Router::new()
        .get("/", |_req| async {
            Response::html("<h1>turnout demo</h1><p>try <code>/hello/you</code></p>")
        })
        .get_with("/hello/*", greet, &logged)
        .get_with("/users/*", user_detail, &logged)
        .post("/echo", echo)
        .not_found(|req: Request| async move {
            Response::not_found().body(format!("no page at {}", req.path))
        });

    let public = Path::new("public");
    if public.is_dir() {
        router = turnout_static::mount(router, "/static", public)?;
    }
    Ok(router)
}

async fn handle_request(
    req: HyperRequest<hyper::body::Incoming>,
    router: Arc<Router>,
) -> Result<HyperResponse<Full<Bytes>>, Infallible> {
    // Convert the hyper request into a turnout Request. The router wants
    // a bare path; hyper has already split the query string off for us.
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    let mut request = Request::new(method, path);

    for (key, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            request.headers.insert(key.to_string(), v.to_string());
        }
    }

    request.body = req
        .collect()
        .await
        .map(|b| b.to_bytes().to_vec())
        .unwrap_or_default();

    let response = router.handle(request).await;

    // And the turnout Response back into a hyper one.
    let mut builder = HyperResponse::builder().status(
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    );
    for (key, value) in &response.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    Ok(builder
        .body(Full::new(Bytes::from(response.body)))
        .unwrap_or_else(|_| HyperResponse::new(Full::new(Bytes::new()))))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let router = Arc::new(build_router()?);
    let addr: SocketAddr = ([127, 0, 0, 1], 3000).into();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let router = router.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let router = router.clone();
                handle_request(req, router)
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                eprintln!("Error serving connection: {err:?}");
            }
        });
    }
}
