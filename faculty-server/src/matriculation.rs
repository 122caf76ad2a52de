//! Matriculation allocation
//!
//! A matriculation is the course code followed by a per-course sequence
//! number (`GEC1`, `GEC2`, ...). The next number is read from the latest
//! student of the course and written in the same transaction as the
//! student row. Two requests racing for the same number are settled by the
//! unique index on `matriculation`: the loser rolls back and tries again
//! with a higher number.

use shared::error::{ServiceError, ServiceResult};
use shared::models::{Course, Student, StudentInput};
use shared::{AppError, ErrorCode};
use sqlx::AnyPool;

use crate::db::student;

/// Attempts before a conflict is reported to the user
pub const MAX_ATTEMPTS: u32 = 5;

/// Sequence number following `latest` within `course`
///
/// A missing or foreign-prefixed matriculation starts the course at 1.
/// A suffix that is not a number counts as 0.
pub fn next_number(course: Course, latest: Option<&str>) -> u64 {
    match latest.and_then(|m| m.strip_prefix(course.code())) {
        Some(suffix) => suffix.parse::<u64>().unwrap_or(0) + 1,
        None => 1,
    }
}

pub fn format(course: Course, number: u64) -> String {
    format!("{}{number}", course.code())
}

fn duplicate_email(email: &str) -> ServiceError {
    AppError::already_exists(format!("Email {email} is already registered."))
        .with_detail("email", email)
        .into()
}

/// Pick the number for one attempt: never below what already failed
async fn candidate(
    conn: &mut sqlx::AnyConnection,
    course: Course,
    failed: Option<u64>,
) -> ServiceResult<u64> {
    let latest = student::latest_matriculation(&mut *conn, course.code()).await?;
    let next = next_number(course, latest.as_deref());
    Ok(match failed {
        Some(n) => next.max(n + 1),
        None => next,
    })
}

/// After a unique violation: the email or the matriculation?
async fn settle_conflict(
    pool: &AnyPool,
    err: ServiceError,
    email: &str,
    except_id: Option<i64>,
) -> ServiceResult<()> {
    if !err.is_unique_violation() {
        return Err(err);
    }
    if student::email_taken(pool, email, except_id).await? {
        return Err(duplicate_email(email));
    }
    Ok(())
}

fn exhausted(course: Course) -> ServiceError {
    tracing::warn!(course = %course, attempts = MAX_ATTEMPTS, "Matriculation allocation gave up");
    AppError::with_message(
        ErrorCode::MatriculationConflict,
        format!("Could not allocate a matriculation for {course}, please try again."),
    )
    .into()
}

/// Insert a new student with a freshly allocated matriculation
pub async fn register(pool: &AnyPool, input: &StudentInput) -> ServiceResult<Student> {
    if student::email_taken(pool, &input.email, None).await? {
        return Err(duplicate_email(&input.email));
    }

    let mut failed = None;
    for attempt in 1..=MAX_ATTEMPTS {
        let mut tx = pool.begin().await?;
        let number = candidate(&mut tx, input.course, failed).await?;
        let matriculation = format(input.course, number);

        match student::insert(
            &mut *tx,
            &input.name,
            &input.email,
            input.course.code(),
            &matriculation,
        )
        .await
        {
            Ok(created) => {
                tx.commit().await?;
                tracing::info!(
                    student_id = created.id,
                    matriculation = %created.matriculation,
                    attempt,
                    "Student registered"
                );
                return Ok(created);
            }
            Err(e) => {
                drop(tx);
                settle_conflict(pool, e, &input.email, None).await?;
                tracing::debug!(%matriculation, attempt, "Matriculation taken, retrying");
                failed = Some(number);
            }
        }
    }
    Err(exhausted(input.course))
}

/// Edit a student; a course change allocates a matriculation in the new course
///
/// Returns the updated student and whether the matriculation changed.
pub async fn change(
    pool: &AnyPool,
    id: i64,
    input: &StudentInput,
) -> ServiceResult<(Student, bool)> {
    let Some(current) = student::find_by_id(pool, id).await? else {
        return Err(AppError::not_found("Student").into());
    };
    if student::email_taken(pool, &input.email, Some(id)).await? {
        return Err(duplicate_email(&input.email));
    }

    if current.course == input.course.code() {
        let updated = student::update(
            pool,
            id,
            &input.name,
            &input.email,
            &current.course,
            &current.matriculation,
        )
        .await?
        .ok_or_else(|| AppError::not_found("Student"))?;
        return Ok((updated, false));
    }

    let mut failed = None;
    for attempt in 1..=MAX_ATTEMPTS {
        let mut tx = pool.begin().await?;
        let number = candidate(&mut tx, input.course, failed).await?;
        let matriculation = format(input.course, number);

        match student::update(
            &mut *tx,
            id,
            &input.name,
            &input.email,
            input.course.code(),
            &matriculation,
        )
        .await
        {
            Ok(Some(updated)) => {
                tx.commit().await?;
                tracing::info!(
                    student_id = id,
                    from = %current.matriculation,
                    to = %updated.matriculation,
                    "Student moved to another course"
                );
                return Ok((updated, true));
            }
            Ok(None) => return Err(AppError::not_found("Student").into()),
            Err(e) => {
                drop(tx);
                settle_conflict(pool, e, &input.email, Some(id)).await?;
                failed = Some(number);
            }
        }
    }
    Err(exhausted(input.course))
}
