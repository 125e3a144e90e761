mod common;

use axum::http::{header, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use common::{body_text, TestApp};
use inventory_backend::{
    domain::{
        models::{
            assignment::{AssignmentStatus, InventoryAssignment},
            inventory::ItemStatus,
        },
        ports::InventoryRepository,
    },
    infra::repositories::sqlite_inventory_repo::SqliteInventoryRepo,
};
use serde_json::{json, Value};

const REPORTS: [&str; 4] = ["inventory-usage", "job-summary", "inventory-status", "overdue-items"];

/// Records a finished assignment with fixed times, bypassing the clock-driven API.
async fn historic_assignment(app: &TestApp, item_id: &str, job_id: &str, user_id: &str, hours_out: i64, minutes_out: i64) {
    let repo = SqliteInventoryRepo::new(app.pool.clone());
    let out = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

    let mut assignment = InventoryAssignment::check_out(item_id.into(), job_id.into(), user_id.into(), out);
    assignment.condition_at_checkout = Some("good".into());
    let mut assignment = repo.check_out(&assignment).await.unwrap();

    assignment.status = AssignmentStatus::CheckedIn;
    assignment.check_in_time = Some(out + Duration::hours(hours_out) + Duration::minutes(minutes_out));
    repo.check_in(&assignment, ItemStatus::Available, None).await.unwrap();
}

fn rows(body: &Value) -> &Vec<Value> {
    body["data"].as_array().unwrap()
}

#[tokio::test]
async fn test_report_role_gates() {
    let app = TestApp::new().await;

    for report in REPORTS {
        let uri = format!("/api/reports/{report}");
        let (status, body) = app.call("GET", &uri, &app.technician.token, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{report}");
        assert_eq!(body["error"], "Insufficient permissions");

        let (status, _) = app.call("GET", &uri, &app.admin.token, None).await;
        assert_eq!(status, StatusCode::OK, "{report}");
        let (status, _) = app.call("GET", &uri, &app.foreman.token, None).await;
        assert_eq!(status, StatusCode::OK, "{report}");

        // The role gate runs before query parsing
        let (status, _) = app.call("GET", &format!("{uri}?format=xml"), &app.technician.token, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{report}");
        let (status, _) = app.call("GET", &format!("{uri}?start_date=someday"), &app.technician.token, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{report}");

        let expected = if report == "overdue-items" { StatusCode::FORBIDDEN } else { StatusCode::OK };
        let (status, _) = app.call("GET", &uri, &app.finance.token, None).await;
        assert_eq!(status, expected, "{report}");
    }

    let response = app.send("GET", "/api/reports/job-summary", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = app.call("GET", "/api/reports/inventory-usage?format=xml", &app.admin.token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported format: xml");
}

#[tokio::test]
async fn test_inventory_usage_report() {
    let app = TestApp::new().await;
    let job = app.create_job(&app.foreman.token, json!({"name": "Basement", "claim_id": "CLM-7"})).await;
    let job_id = job["id"].as_str().unwrap();
    let old = app.create_item("DH-1", Some("Drying")).await;
    let current = app.create_item("DH-2", Some("Drying")).await;

    historic_assignment(&app, old["id"].as_str().unwrap(), job_id, &app.technician.id, 5, 30).await;
    let (status, _) = app.check_out(&app.other_technician.token, current["id"].as_str().unwrap(), json!({"job_id": job_id})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, report) = app.call("GET", "/api/reports/inventory-usage", &app.finance.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["report_type"], "inventory_usage");
    assert_eq!(report["total_records"], 2);
    assert!(report["generated_at"].is_string());

    // Newest checkout first
    let data = rows(&report);
    assert_eq!(data[0]["item_sku"], "DH-2");
    assert_eq!(data[0]["status"], "checked_out");
    assert!(data[0]["duration_hours"].is_null());
    assert_eq!(data[0]["user_name"], "tom");

    assert_eq!(data[1]["item_sku"], "DH-1");
    assert_eq!(data[1]["job_claim_id"], "CLM-7");
    assert_eq!(data[1]["user_name"], "Tess Tech");
    assert_eq!(data[1]["user_role"], "technician");
    assert_eq!(data[1]["status"], "checked_in");
    assert_eq!(data[1]["duration_hours"], 5.5);

    let (_, report) = app.call(
        "GET",
        "/api/reports/inventory-usage?start_date=2024-03-01&end_date=2024-03-02",
        &app.admin.token,
        None,
    ).await;
    assert_eq!(report["total_records"], 1);
    assert_eq!(report["filters"]["start_date"], "2024-03-01T00:00:00Z");
    assert_eq!(rows(&report)[0]["item_sku"], "DH-1");

    let uri = format!("/api/reports/inventory-usage?user_id={}", app.other_technician.id);
    let (_, report) = app.call("GET", &uri, &app.admin.token, None).await;
    assert_eq!(report["total_records"], 1);
    assert_eq!(rows(&report)[0]["item_sku"], "DH-2");

    let (status, _) = app.call("GET", "/api/reports/inventory-usage?start_date=yesterday", &app.admin.token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_job_summary_report() {
    let app = TestApp::new().await;
    let finished = app.create_job(&app.admin.token, json!({
        "name": "Roof leak",
        "start_date": "2024-01-01T00:00:00Z",
        "end_date": "2024-01-04T12:00:00Z",
        "status": "completed"
    })).await;
    let running = app.create_job(&app.admin.token, json!({"name": "Mold", "status": "active"})).await;
    let first = app.create_item("AM-1", None).await;
    let second = app.create_item("AM-2", None).await;

    historic_assignment(&app, first["id"].as_str().unwrap(), finished["id"].as_str().unwrap(), &app.technician.id, 2, 0).await;
    app.check_out(&app.admin.token, second["id"].as_str().unwrap(), json!({"job_id": running["id"]})).await;

    let (status, report) = app.call("GET", "/api/reports/job-summary", &app.foreman.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_records"], 2);

    let data = rows(&report);
    let roof = data.iter().find(|r| r["name"] == "Roof leak").unwrap();
    assert_eq!(roof["duration_days"], 3);
    assert_eq!(roof["total_assignments"], 1);
    assert_eq!(roof["active_assignments"], 0);
    let mold = data.iter().find(|r| r["name"] == "Mold").unwrap();
    assert!(mold["duration_days"].is_null());
    assert_eq!(mold["total_assignments"], 1);
    assert_eq!(mold["active_assignments"], 1);

    let (_, report) = app.call("GET", "/api/reports/job-summary?status=active", &app.foreman.token, None).await;
    assert_eq!(report["total_records"], 1);
    assert_eq!(rows(&report)[0]["job_id"], running["id"]);

    let (_, report) = app.call("GET", "/api/reports/job-summary?start_date=2999-01-01", &app.foreman.token, None).await;
    assert_eq!(report["total_records"], 0);
}

#[tokio::test]
async fn test_inventory_status_report() {
    let app = TestApp::new().await;
    let job = app.create_job(&app.admin.token, json!({"name": "Warehouse"})).await;
    let pump = app.create_item("P-1", Some("Pumps")).await;
    app.create_item("P-2", Some("Pumps")).await;
    app.create_item("X-1", None).await;
    app.create_item("X-2", Some("Uncategorized")).await;

    app.check_out(&app.technician.token, pump["id"].as_str().unwrap(), json!({
        "job_id": job["id"], "expected_return_date": "2030-06-01T00:00:00Z"
    })).await;

    let (status, report) = app.call("GET", "/api/reports/inventory-status", &app.finance.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["report_type"], "inventory_status");

    let data = &report["data"];
    let statuses = data["status_summary"].as_array().unwrap();
    let count_for = |status: &str| statuses.iter().find(|s| s["status"] == status).map(|s| s["count"].clone());
    assert_eq!(count_for("available"), Some(json!(3)));
    assert_eq!(count_for("in-use"), Some(json!(1)));

    assert_eq!(data["category_summary"], json!([
        {"category": "Pumps", "count": 2},
        {"category": "Uncategorized", "count": 2}
    ]));

    let in_use = data["items_in_use"].as_array().unwrap();
    assert_eq!(in_use.len(), 1);
    assert_eq!(in_use[0]["item_sku"], "P-1");
    assert_eq!(in_use[0]["category"], "Pumps");
    assert_eq!(in_use[0]["assigned_to"], "Tess Tech");
    assert_eq!(in_use[0]["job_name"], "Warehouse");
    assert_eq!(in_use[0]["expected_return"], "2030-06-01T00:00:00Z");
}

#[tokio::test]
async fn test_overdue_items_report() {
    let app = TestApp::new().await;
    let job = app.create_job(&app.foreman.token, json!({"name": "Flood"})).await;
    let late = app.create_item("L-1", None).await;
    let on_time = app.create_item("L-2", None).await;
    let returned = app.create_item("L-3", None).await;

    let three_days_ago = (Utc::now() - Duration::days(3)).to_rfc3339();
    let (_, assignment) = app.check_out(&app.technician.token, late["id"].as_str().unwrap(), json!({
        "job_id": job["id"], "expected_return_date": three_days_ago
    })).await;
    app.check_out(&app.technician.token, on_time["id"].as_str().unwrap(), json!({
        "job_id": job["id"], "expected_return_date": (Utc::now() + Duration::days(2)).to_rfc3339()
    })).await;
    app.check_out(&app.technician.token, returned["id"].as_str().unwrap(), json!({
        "job_id": job["id"], "expected_return_date": three_days_ago
    })).await;
    let (status, _) = app.call("POST", &format!("/api/inventory/{}/check-in", returned["id"].as_str().unwrap()), &app.technician.token, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, report) = app.call("GET", "/api/reports/overdue-items", &app.foreman.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["report_type"], "overdue_items");
    assert_eq!(report["total_overdue"], 1);

    let row = &rows(&report)[0];
    assert_eq!(row["assignment_id"], assignment["id"]);
    assert_eq!(row["item_sku"], "L-1");
    assert_eq!(row["days_overdue"], 3);
    assert_eq!(row["assigned_to"], "Tess Tech");
    assert_eq!(row["user_email"], "tess@example.com");
    assert_eq!(row["user_phone"], "555-0100");
}

#[tokio::test]
async fn test_csv_exports() {
    let app = TestApp::new().await;
    let job = app.create_job(&app.admin.token, json!({"name": "Kitchen, rear", "claim_id": "C-9"})).await;
    let item = app.create_item("FAN-1", Some("Air movers")).await;
    app.check_out(&app.technician.token, item["id"].as_str().unwrap(), json!({"job_id": job["id"]})).await;

    let response = app.send("GET", "/api/reports/job-summary?format=csv", Some(&app.admin.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"job_summary_report_"), "{disposition}");
    assert!(disposition.ends_with(".csv\""), "{disposition}");

    let text = body_text(response).await;
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("job_id,claim_id,xactimate_id,name,location,status,priority,customer_name,start_date,end_date,duration_days,total_assignments,active_assignments,created_at")
    );
    let row = lines.next().unwrap();
    assert!(row.contains("\"Kitchen, rear\""), "{row}");
    assert!(row.contains(",C-9,"), "{row}");
    assert_eq!(lines.next(), None);

    let response = app.send("GET", "/api/reports/inventory-status?format=csv", Some(&app.admin.token), None).await;
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("inventory_status_report_"));
    let text = body_text(response).await;
    assert!(text.starts_with("item_sku,item_name,category,job_name,job_claim_id,assigned_to,check_out_time,expected_return\n"));
    assert!(text.contains("FAN-1,Item FAN-1,Air movers"));

    // No rows still yields the header line
    let response = app.send("GET", "/api/reports/overdue-items?format=csv", Some(&app.admin.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert_eq!(
        text.trim_end(),
        "assignment_id,item_sku,item_name,job_name,job_claim_id,assigned_to,user_email,user_phone,check_out_time,expected_return_date,days_overdue"
    );
}
