//! HTML template cache and page rendering.
//!
//! Templates live in one directory and follow a naming convention:
//!
//! | suffix | role |
//! |---|---|
//! | `*.page.tmpl` | one per page; the cache key is the file name |
//! | `*.layout.tmpl` | base layouts pages `{% extends %}` |
//! | `*.partial.tmpl` | fragments pages `{% include %}` |
//!
//! Every page is compiled once at startup together with all layouts and
//! partials, so a broken template fails the boot instead of a request.
//!
//! ```rust,no_run
//! use stitch::{Request, Response};
//! use stitch::templates::{self, Application, DefaultData, TemplateCache, TemplateData};
//!
//! struct App { templates: TemplateCache }
//!
//! impl Application for App {
//!     fn templates(&self) -> &TemplateCache { &self.templates }
//! }
//!
//! fn home(app: &App, req: &Request) -> Response {
//!     let mut data = TemplateData::new();
//!     data.insert("snippets", &["first", "second"]);
//!     templates::add_default_data(app, &mut data, &DefaultData::all(), req);
//!     templates::render(app, &data, "home.page.tmpl")
//! }
//!
//! let app = App { templates: TemplateCache::from_dir("./ui/html").unwrap() };
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use tera::{Context, Tera, Value};
use tracing::{debug, info};

use crate::error::Error;
use crate::helpers::{self, server_error};
use crate::request::Request;
use crate::response::Response;

const PAGE_SUFFIX: &str = ".page.tmpl";
const LAYOUT_SUFFIX: &str = ".layout.tmpl";
const PARTIAL_SUFFIX: &str = ".partial.tmpl";

// ── Dates ─────────────────────────────────────────────────────────────────────

/// Formats a timestamp for people: `17 Oct 2026 at 09:30`, always in UTC.
pub fn human_date<Tz: TimeZone>(t: &DateTime<Tz>) -> String {
    t.with_timezone(&Utc).format("%d %b %Y at %H:%M").to_string()
}

/// `{{ created | human_date }}`: takes an RFC 3339 string. Null and empty
/// strings render as nothing.
fn human_date_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::Null => return Ok(Value::String(String::new())),
        Value::String(s) if s.is_empty() => return Ok(Value::String(String::new())),
        Value::String(s) => s,
        _ => return Err(tera::Error::msg("human_date requires an RFC 3339 string")),
    };
    let t = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| tera::Error::msg(format!("human_date: {e}")))?;
    Ok(Value::String(human_date(&t)))
}

// ── TemplateCache ─────────────────────────────────────────────────────────────

/// Compiled pages keyed by file name (`"home.page.tmpl"`).
pub struct TemplateCache {
    pages: HashMap<String, Tera>,
}

impl TemplateCache {
    /// Compiles every `*.page.tmpl` in `dir` with all layouts and partials.
    ///
    /// A directory with no pages yields an empty cache.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref();
        let files = template_files(dir)?;

        let shared: Vec<&PathBuf> = files.iter()
            .filter(|p| has_suffix(p, LAYOUT_SUFFIX) || has_suffix(p, PARTIAL_SUFFIX))
            .collect();

        let mut pages = HashMap::new();
        for page in files.iter().filter(|p| has_suffix(p, PAGE_SUFFIX)) {
            let name = file_name(page);

            let mut tera = Tera::default();
            tera.autoescape_on(vec![".tmpl"]);
            tera.register_filter("human_date", human_date_filter);
            tera.add_template_files(
                std::iter::once(page)
                    .chain(shared.iter().copied())
                    .map(|p| (p.clone(), Some(file_name(p))))
                    .collect::<Vec<_>>(),
            )?;

            debug!(page = %name, "template compiled");
            pages.insert(name, tera);
        }

        info!(dir = %dir.display(), pages = pages.len(), "template cache ready");
        Ok(Self { pages })
    }

    /// Renders page `name` with `ctx`.
    pub fn render(&self, name: &str, ctx: &Context) -> Result<String, Error> {
        let tera = self.pages.get(name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_owned()))?;
        Ok(tera.render(name, ctx)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// Page names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn template_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let dir_error = |source| Error::TemplateDir { path: dir.to_owned(), source };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(suffix))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ── Template data ─────────────────────────────────────────────────────────────

/// Values handed to a page: the fields every layout uses plus whatever the
/// page itself needs.
///
/// Inside templates the fixed fields are `csrf_token`, `current_year`,
/// `flash` and `is_authenticated`.
#[derive(Clone, Debug, Default)]
pub struct TemplateData {
    pub csrf_token: Option<String>,
    pub current_year: Option<i32>,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    page: Context,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page-specific value.
    pub fn insert<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.page.insert(key, value);
    }

    pub fn to_context(&self) -> Context {
        let mut ctx = self.page.clone();
        ctx.insert("csrf_token", &self.csrf_token);
        ctx.insert("current_year", &self.current_year);
        ctx.insert("flash", &self.flash);
        ctx.insert("is_authenticated", &self.is_authenticated);
        ctx
    }
}

/// Which common fields [`add_default_data`] fills in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DefaultData {
    pub csrf_token: bool,
    pub current_year: bool,
    pub authentication: bool,
}

impl DefaultData {
    pub fn all() -> Self {
        Self { csrf_token: true, current_year: true, authentication: true }
    }
}

// ── Application ───────────────────────────────────────────────────────────────

/// What rendering needs from the application.
///
/// Session handling and CSRF token generation belong to the application;
/// these hooks are how it hands the results over.
pub trait Application: Send + Sync {
    fn templates(&self) -> &TemplateCache;

    /// Defaults to the [`IsAuthenticated`](crate::helpers::IsAuthenticated) extension.
    fn is_authenticated(&self, req: &Request) -> bool {
        helpers::is_authenticated(req)
    }

    /// The CSRF token to embed in forms for this request, if any.
    fn csrf_token(&self, _req: &Request) -> Option<String> {
        None
    }
}

/// Fills the common fields `defaults` asks for: CSRF token, then current
/// year, then authentication status.
pub fn add_default_data<A>(app: &A, data: &mut TemplateData, defaults: &DefaultData, req: &Request)
where
    A: Application + ?Sized,
{
    if defaults.csrf_token {
        data.csrf_token = app.csrf_token(req);
    }
    if defaults.current_year {
        data.current_year = Some(Utc::now().year());
    }
    if defaults.authentication {
        data.is_authenticated = app.is_authenticated(req);
    }
}

/// Renders page `name` into a `200 text/html` response.
///
/// An unknown page or a rendering failure is a server error: logged, and
/// answered with a bare 500.
pub fn render<A>(app: &A, data: &TemplateData, name: &str) -> Response
where
    A: Application + ?Sized,
{
    match app.templates().render(name, &data.to_context()) {
        Ok(body) => Response::html(body),
        Err(e) => server_error(&e),
    }
}
