//! Full HTTP flows against a real Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

mod common;

use std::env;

use axum::{http::StatusCode, Router};
use jobboard_backend::database::pool::{create_pool, run_migrations};
use jobboard_backend::models::user::Role;
use jobboard_backend::services::auth_service::AuthService;
use jobboard_backend::utils::{exchange_signature::sign_exchange, time::unix_now};
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use uuid::Uuid;

use common::{app_with_pool, send, send_with_headers, test_config, EXCHANGE_SECRET, JWT_SECRET};

async fn setup() -> (Router, PgPool) {
    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL");
    let config = test_config(&database_url);
    let pool = create_pool(&config).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    (app_with_pool(pool.clone(), &config), pool)
}

/// Staff accounts cannot self-register, so they are seeded straight through the service.
async fn staff_token(app: &Router, pool: &PgPool, role: Role) -> String {
    let email = unique_email(role.as_str());
    AuthService::new(
        pool.clone(),
        JWT_SECRET.into(),
        std::time::Duration::from_secs(3600),
        EXCHANGE_SECRET.into(),
    )
    .create_account(&email, "secret123".into(), "Staff Person", role)
    .await
    .expect("seed staff");

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["token"].as_str().expect("token").to_string()
}

fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, Uuid::new_v4().simple())
}

async fn register(app: &Router, email: &str) -> (String, JsonValue) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "secret123",
            "fullName": "Test Person"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let token = body["token"].as_str().expect("token").to_string();
    (token, body["user"].clone())
}

async fn create_job(app: &Router, hr_token: &str, overrides: JsonValue) -> JsonValue {
    let mut body = json!({
        "title": "Engineer",
        "department": "Engineering",
        "location": "Remote",
        "jobType": "full_time",
        "description": "Write and ship services",
        "requirements": "Three years of backend work",
        "salaryRangeMin": 5000,
        "salaryRangeMax": 9000,
        "status": "published"
    });
    if let (Some(base), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }
    let (status, body) = send(app, "POST", "/api/jobs", Some(hr_token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

async fn publish_job(app: &Router, hr_token: &str, title: &str) -> String {
    let job = create_job(app, hr_token, json!({ "title": title })).await;
    assert!(job["postedAt"].is_string());
    job["id"].as_str().expect("job id").to_string()
}

fn ids(body: &JsonValue) -> Vec<String> {
    body["items"]
        .as_array()
        .expect("items")
        .iter()
        .filter_map(|item| item["id"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn register_login_and_me() {
    let (app, _pool) = setup().await;
    let email = unique_email("ann");
    let (token, user) = register(&app, &email).await;
    assert_eq!(user["role"], "applicant");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": "secret123", "fullName": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email.as_str());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn exchange_token_issues_a_backend_token() {
    let (app, _pool) = setup().await;
    let email = unique_email("bridge");
    let (_, user) = register(&app, &email).await;
    let user_id: Uuid = user["id"].as_str().expect("id").parse().expect("uuid");

    let issued_at = unix_now();
    let signature = sign_exchange(EXCHANGE_SECRET, user_id, &email, Role::Applicant, issued_at)
        .expect("sign");
    let assertion = json!({
        "userId": user_id,
        "email": email,
        "role": "applicant",
        "issuedAt": issued_at
    });
    let (status, body) = send_with_headers(
        &app,
        "POST",
        "/api/auth/exchange-token",
        None,
        Some(assertion),
        &[("x-exchange-signature", signature.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let token = body["token"].as_str().expect("token");

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Role claimed by the frontend must match the stored one.
    let signature = sign_exchange(EXCHANGE_SECRET, user_id, &email, Role::Admin, issued_at)
        .expect("sign");
    let (status, body) = send_with_headers(
        &app,
        "POST",
        "/api/auth/exchange-token",
        None,
        Some(json!({
            "userId": user_id,
            "email": email,
            "role": "admin",
            "issuedAt": issued_at
        })),
        &[("x-exchange-signature", signature.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Identity mismatch");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn application_lifecycle() {
    let (app, pool) = setup().await;
    let hr_token = staff_token(&app, &pool, Role::Hr).await;
    let (applicant_token, applicant) = register(&app, &unique_email("cand")).await;
    let (other_token, _) = register(&app, &unique_email("other")).await;
    let job_id = publish_job(&app, &hr_token, "Backend Engineer").await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/jobs?search=Backend%20Engineer&limit=5",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"]
        .as_array()
        .expect("items")
        .iter()
        .any(|job| job["id"] == job_id.as_str()));

    let apply = json!({ "jobId": job_id, "coverLetter": "Hello there" });
    let (status, body) = send(
        &app,
        "POST",
        "/api/applications",
        Some(&applicant_token),
        Some(apply.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["applicantId"], applicant["id"]);
    let application_id = body["id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/applications",
        Some(&applicant_token),
        Some(apply),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You have already applied for this job");

    let detail_uri = format!("/api/applications/{}", application_id);
    let (status, _) = send(&app, "GET", &detail_uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let status_uri = format!("/api/applications/{}/status", application_id);
    let (status, body) = send(
        &app,
        "PUT",
        &status_uri,
        Some(&hr_token),
        Some(json!({ "status": "hired" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot change status from pending to hired");

    let (status, body) = send(
        &app,
        "PUT",
        &status_uri,
        Some(&hr_token),
        Some(json!({ "status": "shortlisted", "notes": "Strong CV" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "shortlisted");

    let notes_uri = format!("/api/applications/{}/notes", application_id);
    let (status, _) = send(
        &app,
        "POST",
        &notes_uri,
        Some(&hr_token),
        Some(json!({ "notes": "Call on Monday" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &detail_uri, Some(&applicant_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let history = body["statusHistory"].as_array().expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["status"], "shortlisted");
    assert_eq!(history[1]["status"], "pending");

    let (status, body) = send(&app, "GET", "/api/applications", Some(&other_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 0);

    // Drafts are not open for applications.
    let draft = create_job(&app, &hr_token, json!({ "status": "draft" })).await;
    assert!(draft["postedAt"].is_null());
    let (status, body) = send(
        &app,
        "POST",
        "/api/applications",
        Some(&other_token),
        Some(json!({ "jobId": draft["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Job is not accepting applications");

    let (status, _) = send(
        &app,
        "POST",
        "/api/applications",
        Some(&other_token),
        Some(json!({ "jobId": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let second_job_id = publish_job(&app, &hr_token, "Frontend Engineer").await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/applications",
        Some(&other_token),
        Some(json!({ "jobId": second_job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let other_second_application = body["id"].as_str().expect("id").to_string();

    // Staff see every applicant's rows, narrowed by jobId.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/applications?jobId={}", job_id),
        Some(&hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 2);
    let listed = ids(&body);
    assert!(listed.contains(&application_id));
    assert!(!listed.contains(&other_second_application));
    assert!(body["items"]
        .as_array()
        .expect("items")
        .iter()
        .all(|item| item["jobId"] == job_id.as_str()));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/applications?jobId={}", second_job_id),
        Some(&hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![other_second_application]);

    // Applicants keep seeing only their own rows, even when asking for a job.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/applications?jobId={}", job_id),
        Some(&applicant_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![application_id.clone()]);

    // Out-of-range pages are empty rather than errors.
    let (status, body) = send(
        &app,
        "GET",
        "/api/applications?page=999&limit=1",
        Some(&applicant_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(
        body["pagination"],
        json!({ "page": 999, "limit": 1, "total": 1, "totalPages": 1 })
    );

    let (status, body) = send(&app, "GET", "/api/hr/stats", Some(&hr_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["totalApplications"].as_i64().expect("count") >= 1);

    let (status, body) = send(
        &app,
        "GET",
        "/api/hr/analytics?startDate=2000-01-01",
        Some(&hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["applicationsByStatus"].is_array());

    let (status, _) = send(
        &app,
        "GET",
        "/api/hr/analytics?startDate=yesterday",
        Some(&hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn saved_jobs_and_profile() {
    let (app, pool) = setup().await;
    let hr_token = staff_token(&app, &pool, Role::Hr).await;
    let (token, _) = register(&app, &unique_email("saver")).await;
    let job_id = publish_job(&app, &hr_token, "Data Analyst").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/saved-jobs",
        Some(&token),
        Some(json!({ "jobId": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["job"]["title"], "Data Analyst");

    let (status, body) = send(
        &app,
        "POST",
        "/api/saved-jobs",
        Some(&token),
        Some(json!({ "jobId": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Job already saved");

    let (status, body) = send(&app, "GET", "/api/saved-jobs", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);

    let uri = format!("/api/saved-jobs/{}", job_id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/profile",
        Some(&token),
        Some(json!({
            "fullName": "Renamed Person",
            "skills": ["rust", "sql"],
            "experienceYears": 4
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["fullName"], "Renamed Person");
    assert_eq!(body["applicantProfile"]["skills"], json!(["rust", "sql"]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/resume",
        Some(&token),
        Some(json!({ "resumeUrl": "https://files.example.com/cv.pdf" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["resumeUrl"], "https://files.example.com/cv.pdf");

    let (status, body) = send(&app, "GET", "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applicantProfile"]["experienceYears"], 4);
    assert_eq!(
        body["applicantProfile"]["resumeUrl"],
        "https://files.example.com/cv.pdf"
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn job_crud_and_filters() {
    let (app, pool) = setup().await;
    let hr_token = staff_token(&app, &pool, Role::Hr).await;
    let other_hr_token = staff_token(&app, &pool, Role::Hr).await;
    let department = format!("Dept-{}", Uuid::new_v4().simple());

    let full_time = create_job(
        &app,
        &hr_token,
        json!({ "department": department, "location": "Berlin" }),
    )
    .await;
    let contract = create_job(
        &app,
        &hr_token,
        json!({ "department": department, "location": "Remote", "jobType": "contract" }),
    )
    .await;
    let draft = create_job(
        &app,
        &hr_token,
        json!({ "department": department, "status": "draft" }),
    )
    .await;
    let full_time_id = full_time["id"].as_str().expect("id").to_string();
    let contract_id = contract["id"].as_str().expect("id").to_string();
    let draft_id = draft["id"].as_str().expect("id").to_string();

    // Published is the default status filter.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/jobs?department={}", department),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed = ids(&body);
    assert_eq!(listed.len(), 2);
    assert!(!listed.contains(&draft_id));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/jobs?department={}&status=draft", department.to_lowercase()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![draft_id.clone()]);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/jobs?department={}&jobType=contract", department),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![contract_id.clone()]);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/jobs?department={}&location=berl", department),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![full_time_id.clone()]);

    let (status, body) = send(&app, "GET", "/api/jobs?jobType=fulltime", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid jobType: fulltime");

    // Update: fields merge, and the salary range is checked after merging.
    let uri = format!("/api/jobs/{}", full_time_id);
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&hr_token),
        Some(json!({ "title": "Senior Engineer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["title"], "Senior Engineer");
    assert_eq!(body["location"], "Berlin");

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&hr_token),
        Some(json!({ "salaryRangeMin": 20000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Any staff member may delete, not only the poster.
    let (status, body) = send(&app, "DELETE", &uri, Some(&other_hr_token), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Job deleted successfully");

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, "DELETE", &uri, Some(&hr_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Job not found");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn admins_create_staff_accounts() {
    let (app, pool) = setup().await;
    let admin_token = staff_token(&app, &pool, Role::Admin).await;
    let email = unique_email("recruiter");

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/staff",
        Some(&admin_token),
        Some(json!({
            "email": email,
            "password": "secret123",
            "fullName": "New Recruiter",
            "role": "hr"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["role"], "hr");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hr_token = body["token"].as_str().expect("token").to_string();
    let (status, _) = send(&app, "GET", "/api/hr/stats", Some(&hr_token), None).await;
    assert_eq!(status, StatusCode::OK);
}
