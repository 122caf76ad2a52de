use axum::Router;
use axum::body::Body;
use faculty_server::build_app;
use faculty_server::db;
use faculty_server::state::AppState;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use sqlx::AnyPool;
use tower::ServiceExt;

/// Keeps the session cookie between requests so flashes can be read back
struct Browser {
    app: Router,
    cookie: Option<String>,
}

struct Page {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

impl Browser {
    async fn send(&mut self, method: Method, uri: &str, form: Option<&str>) -> Page {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(f) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(f.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        if let Some(set) = response.headers().get(header::SET_COOKIE) {
            self.cookie = Some(set.to_str().unwrap().split(';').next().unwrap().to_string());
        }
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        Page {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(&mut self, uri: &str) -> Page {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Page {
        self.send(Method::POST, uri, Some(form)).await
    }
}

async fn setup() -> (Browser, AnyPool) {
    let pool = db::connect("sqlite::memory:").await.unwrap();
    let state = AppState::from_pool(pool.clone(), "faculty-secret");
    let browser = Browser {
        app: build_app(state),
        cookie: None,
    };
    (browser, pool)
}

#[tokio::test]
async fn test_register_students_in_sequence() {
    let (mut browser, pool) = setup().await;

    let page = browser
        .post("/students/new", "name=Ana&email=ana%40uni.br&course=GEC")
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/students"));

    let page = browser.get("/students").await;
    assert!(page.body.contains("Student Ana registered successfully! Matriculation: GEC1"));

    browser
        .post("/students/new", "name=Bia&email=bia%40uni.br&course=gec")
        .await;
    let page = browser.get("/students").await;
    assert!(page.body.contains("Matriculation: GEC2"));
    assert!(page.body.contains("<td>GEC1</td>"));

    let students = db::student::find_all(&pool).await.unwrap();
    assert_eq!(students.len(), 2);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let (mut browser, pool) = setup().await;

    let page = browser
        .post("/students/new", "name=Ana&email=&course=GEC")
        .await;
    assert_eq!(page.location.as_deref(), Some("/students/new"));
    let page = browser.get("/students/new").await;
    assert!(page.body.contains("Fill in all fields."));

    browser
        .post("/students/new", "name=Ana&email=ana%40uni.br&course=MED")
        .await;
    let page = browser.get("/students/new").await;
    assert!(page.body.contains("Invalid course! Use GEC, GEA, GES, GEB or GET."));

    browser
        .post("/students/new", "name=Ana&email=ana%40uni.br&course=GEA")
        .await;
    browser
        .post("/students/new", "name=Other&email=ana%40uni.br&course=GES")
        .await;
    let page = browser.get("/students/new").await;
    assert!(page.body.contains("already registered"));

    assert_eq!(db::student::find_all(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_edit_and_delete_student() {
    let (mut browser, pool) = setup().await;
    browser
        .post("/students/new", "name=Ana&email=ana%40uni.br&course=GEC")
        .await;
    let id = db::student::find_all(&pool).await.unwrap()[0].id;

    let page = browser.get(&format!("/students/{id}/edit")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("GEC1"));

    browser
        .post(
            &format!("/students/{id}/edit"),
            "name=Ana+Maria&email=ana%40uni.br&course=GEC",
        )
        .await;
    let page = browser.get("/students").await;
    assert!(page.body.contains("Student updated."));
    assert!(page.body.contains("Ana Maria"));

    browser
        .post(
            &format!("/students/{id}/edit"),
            "name=Ana+Maria&email=ana%40uni.br&course=GET",
        )
        .await;
    let page = browser.get("/students").await;
    assert!(page.body.contains("Student updated with new matriculation."));
    let student = db::student::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(student.matriculation, "GET1");

    let page = browser.post(&format!("/students/{id}/delete"), "").await;
    assert_eq!(page.location.as_deref(), Some("/students"));
    let page = browser.get("/students").await;
    assert!(page.body.contains("Student removed successfully!"));
    assert!(db::student::find_by_id(&pool, id).await.unwrap().is_none());

    browser.post(&format!("/students/{id}/delete"), "").await;
    let page = browser.get("/students").await;
    assert!(page.body.contains("Student not found"));
}

#[tokio::test]
async fn test_unknown_student_edit_redirects() {
    let (mut browser, _) = setup().await;
    let page = browser.get("/students/77/edit").await;
    assert_eq!(page.location.as_deref(), Some("/students"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (browser, _) = setup().await;
    let response = browser
        .app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_student_list_failure_redirects_home() {
    let (mut browser, pool) = setup().await;
    pool.close().await;

    let page = browser.get("/students").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/"));

    let page = browser.get("/").await;
    assert!(page.body.contains("Error loading page:"));
}
