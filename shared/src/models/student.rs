//! Student Model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};
use crate::validation::{MAX_EMAIL_LEN, MAX_NAME_LEN, validate_required_text};

/// Accepted course codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "GEC")]
    Gec,
    #[serde(rename = "GEA")]
    Gea,
    #[serde(rename = "GES")]
    Ges,
    #[serde(rename = "GEB")]
    Geb,
    #[serde(rename = "GET")]
    Get,
}

impl Course {
    pub const ALL: [Course; 5] = [Course::Gec, Course::Gea, Course::Ges, Course::Geb, Course::Get];

    pub fn code(&self) -> &'static str {
        match self {
            Course::Gec => "GEC",
            Course::Gea => "GEA",
            Course::Ges => "GES",
            Course::Geb => "GEB",
            Course::Get => "GET",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Course {
    type Err = AppError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Course::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidCourse,
                    "Invalid course! Use GEC, GEA, GES, GEB or GET.",
                )
                .with_detail("course", code)
            })
    }
}

/// Registered student; `email` and `matriculation` are unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub course: String,
    pub matriculation: String,
}

/// Validated registration/edit input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub course: Course,
}

impl StudentInput {
    /// Build from raw form fields: all required, course checked against [`Course::ALL`]
    pub fn parse(name: &str, email: &str, course: &str) -> Result<Self, AppError> {
        let (name, email, course) = (name.trim(), email.trim(), course.trim());
        if name.is_empty() || email.is_empty() || course.is_empty() {
            return Err(AppError::required("Fill in all fields."));
        }
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        validate_required_text(email, "email", MAX_EMAIL_LEN)?;
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            course: course.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_parse() {
        assert_eq!(" gec ".parse::<Course>().unwrap(), Course::Gec);
        assert_eq!("GET".parse::<Course>().unwrap(), Course::Get);
        let err = "XYZ".parse::<Course>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCourse);
    }

    #[test]
    fn test_student_input_requires_all_fields() {
        let err = StudentInput::parse("Ana", "", "GEC").unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let input = StudentInput::parse(" Ana ", "ana@uni.br", "gea").unwrap();
        assert_eq!(input.name, "Ana");
        assert_eq!(input.course, Course::Gea);
    }
}
