//! Minimal stitch example: a snippet board with a validated form.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:4000/
//!   curl -i -X POST http://localhost:4000/snippet/create -d 'title=&content=hi&expires=3'
//!   curl -i http://localhost:4000/account

use std::collections::HashMap;
use std::sync::Arc;

use stitch::forms::Form;
use stitch::helpers::client_error;
use stitch::middleware::{
    Chain, ExtensionFlag, RequireAuthentication, log_request, recover_panic, secure_headers,
};
use stitch::templates::{self, Application, DefaultData, TemplateCache, TemplateData};
use stitch::{Request, Response, Router, Server, Status};
use tracing_subscriber::EnvFilter;

struct App {
    templates: TemplateCache,
}

impl Application for App {
    fn templates(&self) -> &TemplateCache {
        &self.templates
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/ui/html");
    let app = Arc::new(App {
        templates: TemplateCache::from_dir(dir).expect("templates compile"),
    });

    let standard = Chain::new()
        .with(recover_panic)
        .with(log_request)
        .with(secure_headers);
    let protected = Chain::new()
        .with(recover_panic)
        .with(log_request)
        .with(secure_headers)
        .with(RequireAuthentication::new(ExtensionFlag::new("/")));

    let router = Router::new()
        .get("/", standard.apply({
            let app = Arc::clone(&app);
            move |req: Request| {
                let app = Arc::clone(&app);
                async move { home(&app, &req) }
            }
        }))
        .get("/snippet/create", standard.apply({
            let app = Arc::clone(&app);
            move |req: Request| {
                let app = Arc::clone(&app);
                async move { create_form(&app, &req, Form::default()) }
            }
        }))
        .post("/snippet/create", standard.apply({
            let app = Arc::clone(&app);
            move |req: Request| {
                let app = Arc::clone(&app);
                async move { create_snippet(&app, &req) }
            }
        }))
        .get("/account", protected.apply(|_req: Request| async { "your account" }));

    Server::bind("0.0.0.0:4000")
        .serve(router)
        .await
        .expect("server error");
}

fn home(app: &App, req: &Request) -> Response {
    let mut data = TemplateData::new();
    data.insert(
        "snippets",
        &[
            snippet("An old silent pond", "2026-10-17T09:30:00Z"),
            snippet("Over the wintry forest", "2026-10-18T07:15:00Z"),
        ],
    );
    templates::add_default_data(app, &mut data, &DefaultData::all(), req);
    templates::render(app, &data, "home.page.tmpl")
}

fn snippet(title: &str, created: &str) -> HashMap<&'static str, String> {
    HashMap::from([("title", title.to_owned()), ("created", created.to_owned())])
}

fn create_form(app: &App, req: &Request, form: Form) -> Response {
    let mut data = TemplateData::new();
    data.insert("form", &form);
    templates::add_default_data(app, &mut data, &DefaultData::all(), req);
    templates::render(app, &data, "create.page.tmpl")
}

fn create_snippet(app: &App, req: &Request) -> Response {
    let Ok(mut form) = Form::from_request(req) else {
        return client_error(Status::BadRequest);
    };
    form.required("title")
        .required("content")
        .max_length("title", 100)
        .permitted_values("expires", &["365", "7", "1"]);

    if !form.valid() {
        return create_form(app, req, form);
    }

    Response::builder()
        .status(Status::SeeOther)
        .header("location", "/")
        .no_body()
}
