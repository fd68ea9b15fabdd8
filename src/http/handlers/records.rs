//! Student, teacher, claim, and member listings.
//!
//! Listing endpoints degrade to an empty list when the spreadsheet is
//! unreachable; write endpoints report the failure.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::{require, ApiError, ApiResult};
use crate::http::handlers::{load_all, load_all_or_empty};
use crate::http::server::AppState;
use crate::models::{Claim, ClaimWithStudent, MobileUser, Student, Teacher};
use crate::sheets::range;

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub items: Vec<T>,
}

impl<T> ListResponse<T> {
    fn new(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: items.len(),
            items,
        }
    }
}

/// `GET /api/students`
pub async fn list_students(State(state): State<AppState>) -> Json<ListResponse<Student>> {
    let students = load_all_or_empty(
        &state.sheets,
        Student::SHEET,
        Student::COLUMNS,
        Student::from_row,
    )
    .await;
    Json(ListResponse::new(students))
}

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub guardian_phone: String,
}

#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub success: bool,
    pub student: Student,
}

/// `POST /api/students`: register a student row.
pub async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<CreateStudentRequest>,
) -> ApiResult<Json<StudentResponse>> {
    require("name", &payload.name)?;
    require("class", &payload.class)?;

    let student = Student {
        id: Uuid::new_v4().to_string(),
        name: payload.name.trim().to_string(),
        class: payload.class.trim().to_string(),
        guardian_phone: payload.guardian_phone.trim().to_string(),
        balance: 0.0,
    };
    state
        .sheets
        .append(
            &range::body_range(Student::SHEET, Student::COLUMNS),
            &[student.to_row()],
        )
        .await?;

    tracing::info!(student_id = %student.id, class = %student.class, "Student registered");
    Ok(Json(StudentResponse {
        success: true,
        student,
    }))
}

/// `GET /api/students/classes`: distinct class names, sorted.
pub async fn list_classes(State(state): State<AppState>) -> Json<ListResponse<String>> {
    let students = load_all_or_empty(
        &state.sheets,
        Student::SHEET,
        Student::COLUMNS,
        Student::from_row,
    )
    .await;
    let mut classes: Vec<String> = students
        .into_iter()
        .map(|s| s.class)
        .filter(|c| !c.is_empty())
        .collect();
    classes.sort();
    classes.dedup();
    Json(ListResponse::new(classes))
}

/// `GET /api/teachers`
pub async fn list_teachers(State(state): State<AppState>) -> Json<ListResponse<Teacher>> {
    let teachers = load_all_or_empty(
        &state.sheets,
        Teacher::SHEET,
        Teacher::COLUMNS,
        Teacher::from_row,
    )
    .await;
    Json(ListResponse::new(teachers))
}

/// `GET /api/claims`: claims joined with their matching student.
///
/// The join is string equality on the student name; a claim whose name
/// matches no student row simply carries no student.
pub async fn list_claims(State(state): State<AppState>) -> Json<ListResponse<ClaimWithStudent>> {
    let claims = load_all_or_empty(&state.sheets, Claim::SHEET, Claim::COLUMNS, Claim::from_row).await;
    let students = load_all_or_empty(
        &state.sheets,
        Student::SHEET,
        Student::COLUMNS,
        Student::from_row,
    )
    .await;

    let joined = claims
        .into_iter()
        .map(|claim| {
            let student = students
                .iter()
                .find(|s| !claim.student_name.is_empty() && s.name == claim.student_name)
                .cloned();
            ClaimWithStudent { claim, student }
        })
        .collect();
    Json(ListResponse::new(joined))
}

#[derive(Debug, Deserialize)]
pub struct CreateClaimRequest {
    #[serde(default)]
    pub claimant_name: String,
    #[serde(default)]
    pub category: String,
    pub amount: Option<f64>,
    #[serde(default)]
    pub student_name: String,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub success: bool,
    pub claim: Claim,
}

/// `POST /api/claims`: submit a claim row.
pub async fn create_claim(
    State(state): State<AppState>,
    Json(payload): Json<CreateClaimRequest>,
) -> ApiResult<Json<ClaimResponse>> {
    require("claimant_name", &payload.claimant_name)?;
    let amount = payload.amount.unwrap_or(0.0);

    let claim = Claim {
        id: Uuid::new_v4().to_string(),
        claimant_name: payload.claimant_name.trim().to_string(),
        category: payload.category.trim().to_string(),
        amount,
        submitted_at: Some(Utc::now()),
        student_name: payload.student_name.trim().to_string(),
    };
    state
        .sheets
        .append(
            &range::body_range(Claim::SHEET, Claim::COLUMNS),
            &[claim.to_row()],
        )
        .await?;

    tracing::info!(claim_id = %claim.id, category = %claim.category, "Claim submitted");
    Ok(Json(ClaimResponse {
        success: true,
        claim,
    }))
}

/// `GET /api/members`: mobile users (church membership register).
pub async fn list_members(State(state): State<AppState>) -> Json<ListResponse<MobileUser>> {
    let members = load_all_or_empty(
        &state.sheets,
        MobileUser::SHEET,
        MobileUser::COLUMNS,
        MobileUser::from_row,
    )
    .await;
    Json(ListResponse::new(members))
}

/// `GET /api/students/{id}`: fetch one student.
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StudentResponse>> {
    let students = load_all(
        &state.sheets,
        Student::SHEET,
        Student::COLUMNS,
        Student::from_row,
    )
    .await?;
    let student = students
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("student `{}` not found", id)))?;
    Ok(Json(StudentResponse {
        success: true,
        student,
    }))
}
