use std::sync::{Arc, Mutex};

use stitch::forms::Form;
use stitch::helpers::IsAuthenticated;
use stitch::middleware::{
    Chain, ExtensionFlag, RequireAuthentication, SharedMiddleware, from_fn, log_request,
    recover_panic, secure_headers,
};
use stitch::{Endpoint, Method, Request, Response, Router, Status};

fn labelled(label: &'static str, seen: &Arc<Mutex<String>>) -> SharedMiddleware {
    let seen = Arc::clone(seen);
    Arc::new(from_fn(move |req: Request, next: Endpoint| {
        let seen = Arc::clone(&seen);
        async move {
            seen.lock().unwrap().push_str(label);
            next.call(req).await
        }
    }))
}

#[tokio::test]
async fn execution_follows_list_order() {
    let seen = Arc::new(Mutex::new(String::new()));
    let chain: Chain = ["1", "2", "3"].iter().map(|&l| labelled(l, &seen)).collect();

    let endpoint = chain.apply({
        let seen = Arc::clone(&seen);
        move |_req: Request| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push('h');
                "ok"
            }
        }
    });
    endpoint.call(Request::builder().build()).await;
    endpoint.call(Request::builder().build()).await;

    assert_eq!(*seen.lock().unwrap(), "123h123h");
}

#[tokio::test]
async fn empty_chain_behaves_like_handler() {
    async fn greet(req: Request) -> Response {
        Response::text(format!("hello {}", req.param("name").unwrap_or("stranger")))
    }

    let plain = Endpoint::new(greet);
    let composed = Chain::new().apply(greet);

    let a = plain.call(Request::builder().param("name", "ada").build()).await;
    let b = composed.call(Request::builder().param("name", "ada").build()).await;

    assert_eq!(a.status_code(), b.status_code());
    assert_eq!(a.body(), b.body());
    assert_eq!(a.headers(), b.headers());
}

#[tokio::test]
async fn standard_stack_on_a_router() {
    let standard = Chain::new()
        .with(recover_panic)
        .with(log_request)
        .with(secure_headers);
    let protected = Chain::new()
        .with(recover_panic)
        .with(secure_headers)
        .with(RequireAuthentication::new(ExtensionFlag::new("/user/login")));

    let router = Router::new()
        .get("/", standard.apply(|_req: Request| async { Response::html("<h1>Home</h1>") }))
        .get("/boom", standard.apply(|_req: Request| async {
            if true {
                panic!("template data missing");
            }
            Response::html("")
        }))
        .get("/snippet/create", protected.apply(|_req: Request| async { "create form" }));

    let (home, _) = router.lookup(Method::Get, "/").unwrap();
    let res = home.call(Request::builder().build()).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("x-frame-options"), Some("deny"));

    let (boom, _) = router.lookup(Method::Get, "/boom").unwrap();
    let res = boom.call(Request::builder().uri("/boom").build()).await;
    assert_eq!(res.status_code(), 500);
    assert_eq!(res.header("connection"), Some("close"));
    // secure_headers sits inside recover_panic, so the panic skipped it.
    assert_eq!(res.header("x-frame-options"), None);

    let (create, _) = router.lookup(Method::Get, "/snippet/create").unwrap();
    let anonymous = create.call(Request::builder().build()).await;
    assert_eq!(anonymous.status_code(), u16::from(Status::Found));
    assert_eq!(anonymous.header("location"), Some("/user/login"));
    assert_eq!(anonymous.header("x-frame-options"), Some("deny"));

    let signed_in = create
        .call(Request::builder().extension(IsAuthenticated(true)).build())
        .await;
    assert_eq!(signed_in.body(), b"create form");
}

#[tokio::test]
async fn middleware_can_enrich_the_request() {
    let load_session = from_fn(|mut req: Request, next: Endpoint| async move {
        let signed_in = req.header("cookie") == Some("session=valid");
        req.extensions_mut().insert(IsAuthenticated(signed_in));
        next.call(req).await
    });
    let chain = Chain::new()
        .with(load_session)
        .with(RequireAuthentication::new(ExtensionFlag::new("/user/login")));
    let endpoint = chain.apply(|_req: Request| async { "account" });

    let res = endpoint.call(Request::builder().header("Cookie", "session=valid").build()).await;
    assert_eq!(res.body(), b"account");

    let res = endpoint.call(Request::builder().header("Cookie", "session=stale").build()).await;
    assert_eq!(res.status_code(), 302);
}

#[tokio::test]
async fn handler_validates_submission() {
    async fn signup(req: Request) -> Response {
        let Ok(mut form) = Form::from_request(&req) else {
            return Response::status(Status::BadRequest);
        };
        form.required("name").required("email");
        if form.valid() {
            return Response::status(Status::SeeOther);
        }
        Response::builder()
            .status(Status::UnprocessableContent)
            .text(form.errors().get("email").to_owned())
    }

    let endpoint = Chain::new().with(secure_headers).apply(signup);
    let res = endpoint
        .call(Request::builder().method(Method::Post).body("name=john&email=").build())
        .await;

    assert_eq!(res.status_code(), 422);
    assert_eq!(res.body(), b"This field cannot be blank");
}
