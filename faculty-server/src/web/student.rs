//! Student pages

use std::fmt::Write;

use axum::Form;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;
use shared::html::{escape, input, post_button, select};
use shared::models::{Course, Student, StudentInput};
use shared::session::Session;
use shared::{AppError, AppResult};

use super::{OrRedirect, PageResult, done, fail, page};
use crate::db;
use crate::matriculation;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StudentForm {
    name: Option<String>,
    email: Option<String>,
    course: Option<String>,
}

impl StudentForm {
    fn parse(&self) -> AppResult<StudentInput> {
        StudentInput::parse(
            self.name.as_deref().unwrap_or_default(),
            self.email.as_deref().unwrap_or_default(),
            self.course.as_deref().unwrap_or_default(),
        )
    }
}

fn course_options() -> Vec<(String, String)> {
    Course::ALL
        .iter()
        .map(|c| (c.code().to_string(), c.code().to_string()))
        .collect()
}

fn form_body(action: &str, student: Option<&Student>) -> String {
    let (name, email, course) = student
        .map(|s| (s.name.as_str(), s.email.as_str(), s.course.as_str()))
        .unwrap_or_default();
    let mut body = format!(r#"<form method="post" action="{action}">"#);
    body.push_str(&input("Name", "name", "text", name));
    body.push_str(&input("Email", "email", "email", email));
    body.push_str(&select("Course", "course", &course_options(), course));
    body.push_str(r#"<button type="submit">Save</button></form>"#);
    body
}

/// GET /students
pub async fn list(State(state): State<AppState>, session: Session) -> PageResult {
    let students = db::student::find_all(&state.pool).await.or_redirect(&session, "/")?;

    let mut body = String::from(
        r#"<p><a href="/students/new">Register a student</a></p>
<table><tr><th>Matriculation</th><th>Name</th><th>Email</th><th>Course</th><th></th></tr>"#,
    );
    for s in &students {
        let _ = write!(
            body,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href="/students/{id}/edit">Edit</a> {}</td></tr>"#,
            escape(&s.matriculation),
            escape(&s.name),
            escape(&s.email),
            escape(&s.course),
            post_button(&format!("/students/{}/delete", s.id), "Delete"),
            id = s.id,
        );
    }
    body.push_str("</table>");
    Ok(page(session, "Students", &body))
}

/// GET /students/new
pub async fn new_form(session: Session) -> Response {
    page(session, "Register student", &form_body("/students/new", None))
}

/// POST /students/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<StudentForm>,
) -> Response {
    let input = match form.parse() {
        Ok(input) => input,
        Err(e) => return fail(session, e, "/students/new"),
    };
    match matriculation::register(&state.pool, &input).await {
        Ok(student) => done(
            session,
            &format!(
                "Student {} registered successfully! Matriculation: {}",
                student.name, student.matriculation
            ),
            "/students",
        ),
        Err(e) => fail(
            session,
            AppError::from(e).context("registering student"),
            "/students/new",
        ),
    }
}

/// GET /students/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> PageResult {
    let Some(student) = db::student::find_by_id(&state.pool, id).await.or_redirect(&session, "/students")? else {
        return Ok(fail(session, AppError::not_found("Student"), "/students"));
    };
    let mut body = format!(
        "<p>Matriculation: <strong>{}</strong></p>",
        escape(&student.matriculation)
    );
    body.push_str(&form_body(&format!("/students/{id}/edit"), Some(&student)));
    Ok(page(session, "Edit student", &body))
}

/// POST /students/{id}/edit
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<StudentForm>,
) -> Response {
    let back = format!("/students/{id}/edit");
    let input = match form.parse() {
        Ok(input) => input,
        Err(e) => return fail(session, e, &back),
    };
    match matriculation::change(&state.pool, id, &input).await {
        Ok((_, true)) => done(session, "Student updated with new matriculation.", "/students"),
        Ok((_, false)) => done(session, "Student updated.", "/students"),
        Err(e) => fail(session, AppError::from(e).context("updating student"), &back),
    }
}

/// POST /students/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    match db::student::delete(&state.pool, id).await {
        Ok(true) => {
            tracing::info!(student_id = id, "Student deleted");
            done(session, "Student removed successfully!", "/students")
        }
        Ok(false) => fail(session, AppError::not_found("Student"), "/students"),
        Err(e) => fail(
            session,
            AppError::from(e).context("removing student"),
            "/students",
        ),
    }
}
