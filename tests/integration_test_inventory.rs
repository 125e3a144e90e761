mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_item_creation_and_listing() {
    let app = TestApp::new().await;
    app.create_item("DH-2", Some("Drying")).await;
    app.create_item("DH-1", Some("Drying")).await;
    app.create_item("GEN-1", None).await;

    let (status, body) = app.call("POST", "/api/inventory", &app.admin.token, Some(json!({"sku": "DH-1", "name": "Dupe"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "SKU already exists");

    let (status, body) = app.call("POST", "/api/inventory", &app.foreman.token, Some(json!({"name": "No sku"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "sku is required");

    let (status, _) = app.call("POST", "/api/inventory", &app.technician.token, Some(json!({"sku": "X", "name": "X"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, items) = app.call("GET", "/api/inventory", &app.technician.token, None).await;
    assert_eq!(status, StatusCode::OK);
    let skus: Vec<&str> = items.as_array().unwrap().iter().map(|i| i["sku"].as_str().unwrap()).collect();
    assert_eq!(skus, vec!["DH-1", "DH-2", "GEN-1"]);
    assert!(items.as_array().unwrap().iter().all(|i| i["status"] == "available"));

    let (_, items) = app.call("GET", "/api/inventory?category=Drying", &app.admin.token, None).await;
    assert_eq!(items.as_array().unwrap().len(), 2);
    let (_, items) = app.call("GET", "/api/inventory?search=GEN", &app.admin.token, None).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
    let (status, _) = app.call("GET", "/api/inventory?status=borrowed", &app.admin.token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_and_checkin_lifecycle() {
    let app = TestApp::new().await;
    let job = app.create_job(&app.foreman.token, json!({"name": "Flooded office"})).await;
    let job_id = job["id"].as_str().unwrap();
    let item = app.create_item("AM-1", Some("Air movers")).await;
    let item_id = item["id"].as_str().unwrap();

    let (status, assignment) = app.check_out(&app.technician.token, item_id, json!({
        "job_id": job_id,
        "expected_return_date": "2030-01-01T00:00:00Z",
        "condition": "good",
        "notes": "left at site"
    })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(assignment["status"], "checked_out");
    assert_eq!(assignment["user_id"], app.technician.id.as_str());
    assert_eq!(assignment["condition_at_checkout"], "good");
    assert!(assignment["check_out_time"].is_string());
    assert!(assignment["check_in_time"].is_null());

    let (_, items) = app.call("GET", "/api/inventory?status=in-use", &app.admin.token, None).await;
    assert_eq!(items[0]["id"], item_id);

    // Already out
    let (status, body) = app.check_out(&app.other_technician.token, item_id, json!({"job_id": job_id})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Item is not available"));

    // Someone else's assignment
    let (status, _) = app.call("POST", &format!("/api/inventory/{item_id}/check-in"), &app.other_technician.token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, returned) = app.call("POST", &format!("/api/inventory/{item_id}/check-in"), &app.technician.token, Some(json!({
        "condition": "scratched", "notes": "returned dirty", "status": "maintenance"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["status"], "checked_in");
    assert_eq!(returned["condition_at_checkin"], "scratched");
    assert_eq!(returned["notes"], "left at site\nreturned dirty");
    assert!(returned["check_in_time"].is_string());

    let (_, items) = app.call("GET", "/api/inventory", &app.admin.token, None).await;
    assert_eq!(items[0]["status"], "maintenance");
    assert_eq!(items[0]["condition"], "scratched");

    let (status, body) = app.call("POST", &format!("/api/inventory/{item_id}/check-in"), &app.technician.token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Item is not checked out");
}

#[tokio::test]
async fn test_checkout_rules() {
    let app = TestApp::new().await;
    let job = app.create_job(&app.foreman.token, json!({"name": "Site"})).await;
    let job_id = job["id"].as_str().unwrap();
    let item = app.create_item("PUMP-1", None).await;
    let item_id = item["id"].as_str().unwrap();

    let (status, body) = app.check_out(&app.technician.token, item_id, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "job_id is required");

    let (status, _) = app.check_out(&app.technician.token, item_id, json!({"job_id": "missing"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.check_out(&app.technician.token, "missing", json!({"job_id": job_id})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.check_out(&app.technician.token, item_id, json!({"job_id": job_id, "user_id": app.other_technician.id})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient permissions");

    let (status, _) = app.check_out(&app.finance.token, item_id, json!({"job_id": job_id})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.check_out(&app.foreman.token, item_id, json!({"job_id": job_id, "user_id": "ghost"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown user: ghost");

    let (status, body) = app.check_out(&app.other_foreman.token, item_id, json!({"job_id": job_id})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");

    let (status, _) = app.check_out(&app.foreman.token, item_id, json!({"job_id": job_id, "expected_return_date": "tomorrow"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Foreman checks out on behalf of a technician, who can then see the job
    let (status, assignment) = app.check_out(&app.foreman.token, item_id, json!({"job_id": job_id, "user_id": app.technician.id})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(assignment["user_id"], app.technician.id.as_str());

    let (status, _) = app.call("GET", &format!("/api/jobs/{job_id}"), &app.technician.token, None).await;
    assert_eq!(status, StatusCode::OK);

    // The supervising foreman may check it back in
    let (status, _) = app.call("POST", &format!("/api/inventory/{item_id}/check-in"), &app.foreman.token, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_check_in_cannot_leave_item_in_use() {
    let app = TestApp::new().await;
    let job = app.create_job(&app.admin.token, json!({"name": "Site"})).await;
    let item = app.create_item("HEAT-1", None).await;
    let item_id = item["id"].as_str().unwrap();
    app.check_out(&app.admin.token, item_id, json!({"job_id": job["id"]})).await;

    let uri = format!("/api/inventory/{item_id}/check-in");
    let (status, body) = app.call("POST", &uri, &app.finance.token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient permissions");

    let (status, _) = app.call("POST", &uri, &app.admin.token, Some(json!({"status": "in-use"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.call("POST", &uri, &app.admin.token, Some(json!({"status": "vanished"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.call("POST", &uri, &app.admin.token, Some(json!({"status": "lost"}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_directory() {
    let app = TestApp::new().await;

    let (status, user) = app.call("POST", "/api/users", &app.admin.token, Some(json!({
        "username": "nina", "role": "technician", "first_name": "Nina", "email": "nina@example.com"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "technician");
    assert_eq!(user["display_name"], "Nina");

    let (status, body) = app.call("POST", "/api/users", &app.admin.token, Some(json!({"username": "nina", "role": "finance"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");

    let (status, _) = app.call("POST", "/api/users", &app.admin.token, Some(json!({"username": "x", "role": "boss"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.call("POST", "/api/users", &app.foreman.token, Some(json!({"username": "y", "role": "technician"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, users) = app.call("GET", "/api/users", &app.foreman.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 7);
    assert_eq!(users[0]["username"], "admin");
    assert_eq!(users[0]["display_name"], "System Administrator");

    let (status, _) = app.call("GET", "/api/users", &app.technician.token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
