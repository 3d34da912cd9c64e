//! Decorator: wrap a service in layers that each add one behaviour.
//!
//! Each layer is generic over the service it wraps, so a stack like
//! `Logging<Caching<RequireHeader<EchoService>>>` is resolved at compile
//! time. `ServiceExt` gives the fluent `.cached().logged()` spelling.

use crate::catalog::DemoContext;
use crate::error::Result;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub path: String,
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            headers: HashMap::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

pub trait Service {
    fn call(&self, request: &Request) -> Response;
}

/// Counts how often it actually runs, so caching is observable.
#[derive(Default)]
pub struct EchoService {
    calls: Cell<usize>,
}

impl EchoService {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Service for EchoService {
    fn call(&self, request: &Request) -> Response {
        self.calls.set(self.calls.get() + 1);
        Response {
            status: 200,
            body: format!("echo {}", request.path),
        }
    }
}

pub struct Logging<S> {
    inner: S,
    log: RefCell<Vec<String>>,
}

impl<S> Logging<S> {
    pub fn lines(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Service> Service for Logging<S> {
    fn call(&self, request: &Request) -> Response {
        let response = self.inner.call(request);
        let line = format!("GET {} -> {}", request.path, response.status);
        tracing::debug!("{line}");
        self.log.borrow_mut().push(line);
        response
    }
}

pub struct Caching<S> {
    inner: S,
    cache: RefCell<HashMap<String, Response>>,
    hits: Cell<usize>,
}

impl<S> Caching<S> {
    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Service> Service for Caching<S> {
    fn call(&self, request: &Request) -> Response {
        if let Some(hit) = self.cache.borrow().get(&request.path) {
            self.hits.set(self.hits.get() + 1);
            return hit.clone();
        }
        let response = self.inner.call(request);
        // Only successful responses are worth remembering.
        if response.status == 200 {
            self.cache.borrow_mut().insert(request.path.clone(), response.clone());
        }
        response
    }
}

pub struct RequireHeader<S> {
    inner: S,
    header: String,
}

impl<S> RequireHeader<S> {
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Service> Service for RequireHeader<S> {
    fn call(&self, request: &Request) -> Response {
        if !request.headers.contains_key(&self.header) {
            return Response {
                status: 401,
                body: format!("missing header {}", self.header),
            };
        }
        self.inner.call(request)
    }
}

pub trait ServiceExt: Service + Sized {
    fn logged(self) -> Logging<Self> {
        Logging {
            inner: self,
            log: RefCell::new(Vec::new()),
        }
    }

    fn cached(self) -> Caching<Self> {
        Caching {
            inner: self,
            cache: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
        }
    }

    fn require_header(self, header: &str) -> RequireHeader<Self> {
        RequireHeader {
            inner: self,
            header: header.to_ascii_lowercase(),
        }
    }
}

impl<S: Service> ServiceExt for S {}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.section("Stack: logged(cached(require_header(echo)))");
    let service = EchoService::default()
        .require_header("Authorization")
        .cached()
        .logged();

    let authed = |path: &str| Request::get(path).header("Authorization", "Bearer t0ken");
    let requests = [
        authed("/users/1"),
        authed("/users/1"),
        authed("/users/2"),
        Request::get("/users/3"),
        authed("/users/1"),
    ];
    for request in &requests {
        let response = service.call(request);
        println!("{} => {} {}", request.path, response.status, response.body);
    }

    ctx.section("What each layer saw");
    for line in service.lines() {
        println!("log: {line}");
    }
    let cache = service.inner();
    let echo = cache.inner().inner();
    println!("cache hits: {}", cache.hits());
    println!("echo service ran {} time(s) for {} requests", echo.calls(), requests.len());

    Ok(())
}
