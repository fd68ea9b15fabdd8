//! End-to-end API tests against a real server and mock upstreams.

mod common;

use common::{session_cookie, start_mock_upstream, start_server, values_response};
use serde_json::{json, Value};

const ADMIN_ROW: [&str; 3] = ["headmaster", "pass123", "admin"];

/// Mock spreadsheet with a populated school.
fn school_sheets(method: &str, path: &str) -> (u16, String) {
    match method {
        "GET" if path.contains("AdminUsers") => (200, values_response(&[&ADMIN_ROW])),
        "GET" if path.contains("MobileUsers") => (
            200,
            values_response(&[&["+233200000001", "Esi Mensah", "member"]]),
        ),
        "GET" if path.contains("Students") => (
            200,
            values_response(&[
                &["S-1", "Ama Mensah", "JHS 2", "+233201111111", "150"],
                &["S-2", "Kofi Boateng", "JHS 1", "+233202222222", "0"],
            ]),
        ),
        "GET" if path.contains("Teachers") => (
            200,
            values_response(&[&["T-1", "Mr. Asante", "Maths", "+233203333333"]]),
        ),
        "GET" if path.contains("Claims") => (
            200,
            values_response(&[&[
                "C-1",
                "Deacon Owusu",
                "welfare",
                "300",
                "2024-05-01",
                "Ama Mensah",
            ]]),
        ),
        "GET" if path.contains("Invoices") => (
            200,
            values_response(&[
                &[
                    "inv-1",
                    "250.00",
                    "2.50",
                    "Term 1 fees",
                    "REF-1",
                    "PAID",
                    "2024-04-01T00:00:00Z",
                    "2024-04-02T00:00:00Z",
                ],
                &[
                    "inv-2",
                    "80.00",
                    "0.60",
                    "PTA dues",
                    "",
                    "PENDING",
                    "2024-04-03T00:00:00Z",
                    "2024-04-03T00:00:00Z",
                ],
            ]),
        ),
        // Appends and updates succeed silently
        "POST" | "PUT" => (200, "{}".to_string()),
        _ => (404, "{}".to_string()),
    }
}

async fn login(client: &reqwest::Client, base: &str) -> String {
    let res = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({ "username": "headmaster", "password": "pass123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    session_cookie(&res)
}

#[tokio::test]
async fn test_login_and_session() {
    let (sheets_addr, _log) = start_mock_upstream(school_sheets).await;
    let base = start_server(sheets_addr, None).await;
    let client = reqwest::Client::new();

    // Bad password
    let res = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({ "username": "headmaster", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);

    // Missing fields
    let res = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({ "username": "headmaster" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    // Good login
    let cookie = login(&client, &base).await;

    // Session endpoint reflects the claims
    let res = client
        .get(format!("{}/api/auth/session", base))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["username"], "headmaster");
    assert_eq!(body["role"], "admin");

    // Protected route without a cookie still gets the JSON error shape
    let res = client
        .get(format!("{}/api/dashboard", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    // Garbage cookie
    let res = client
        .get(format!("{}/api/dashboard", base))
        .header("cookie", "feeflow_session=garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_invoice_create() {
    let (sheets_addr, log) = start_mock_upstream(school_sheets).await;
    let base = start_server(sheets_addr, None).await;
    let client = reqwest::Client::new();
    let cookie = login(&client, &base).await;

    let res = client
        .post(format!("{}/api/invoices", base))
        .header("cookie", &cookie)
        .json(&json!({ "amount": 101.0, "description": "Exam fee" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["invoice"]["status"], "PENDING");
    assert_eq!(body["invoice"]["fee"], 1.01);
    // Fresh unique identifier
    let id = body["invoice"]["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    // The append hit the Invoices sheet with the new id
    let appends: Vec<_> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.method == "POST" && r.path.contains("Invoices"))
        .cloned()
        .collect();
    assert_eq!(appends.len(), 1);
    assert!(appends[0].body.contains(id));
}

#[tokio::test]
async fn test_invoice_missing_fields_do_not_write() {
    let (sheets_addr, log) = start_mock_upstream(school_sheets).await;
    let base = start_server(sheets_addr, None).await;
    let client = reqwest::Client::new();
    let cookie = login(&client, &base).await;

    for payload in [
        json!({}),
        json!({ "amount": 50.0 }),
        json!({ "description": "no amount" }),
        json!({ "amount": -3.0, "description": "negative" }),
    ] {
        let res = client
            .post(format!("{}/api/invoices", base))
            .header("cookie", &cookie)
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 400, "payload {} should be rejected", payload);
    }

    // No partial writes reached the spreadsheet
    let writes = log
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.method == "POST" || r.method == "PUT")
        .count();
    assert_eq!(writes, 0);
}

#[tokio::test]
async fn test_invoice_status_update_idempotent() {
    let (sheets_addr, log) = start_mock_upstream(school_sheets).await;
    let base = start_server(sheets_addr, None).await;
    let client = reqwest::Client::new();
    let cookie = login(&client, &base).await;

    for _ in 0..2 {
        let res = client
            .put(format!("{}/api/invoices/inv-2/status", base))
            .header("cookie", &cookie)
            .json(&json!({ "status": "PAID" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["status"], "PAID");
    }

    // Both updates wrote the same status cell for the same row
    let puts: Vec<_> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.method == "PUT")
        .cloned()
        .collect();
    assert_eq!(puts.len(), 2);
    assert_eq!(puts[0].path, puts[1].path);
    assert!(puts[0].body.contains("PAID"));

    // Unknown status is a validation error
    let res = client
        .put(format!("{}/api/invoices/inv-2/status", base))
        .header("cookie", &cookie)
        .json(&json!({ "status": "CANCELLED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    // Unknown invoice is a 404
    let res = client
        .put(format!("{}/api/invoices/no-such/status", base))
        .header("cookie", &cookie)
        .json(&json!({ "status": "PAID" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_otp_login_flow() {
    let (sheets_addr, _sheets_log) = start_mock_upstream(school_sheets).await;
    let (sms_addr, sms_log) = start_mock_upstream(|method, path| {
        match (method, path) {
            ("POST", p) if p.contains("otp/generate") => {
                (200, json!({ "success": true, "message": "sent" }).to_string())
            }
            // Gateway rejects every code in this scenario
            ("POST", p) if p.contains("otp/verify") => (200, json!({ "success": false }).to_string()),
            _ => (404, "{}".to_string()),
        }
    })
    .await;
    let base = start_server(sheets_addr, Some(sms_addr)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/otp/send", base))
        .json(&json!({ "phone": "+233200000001" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    // Gateway saw the API-KEY / USERNAME headers? Headers are not logged,
    // but the generate call must have been made exactly once.
    let generates = sms_log
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.path.contains("otp/generate"))
        .count();
    assert_eq!(generates, 1);

    // Wrong code → 401, no session cookie
    let res = client
        .post(format!("{}/api/auth/otp/verify", base))
        .json(&json!({ "phone": "+233200000001", "code": "000000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    assert!(res.headers().get("set-cookie").is_none());

    // Missing code → 400
    let res = client
        .post(format!("{}/api/auth/otp/verify", base))
        .json(&json!({ "phone": "+233200000001" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn test_otp_verify_success_opens_session() {
    let (sheets_addr, _sheets_log) = start_mock_upstream(school_sheets).await;
    let (sms_addr, _sms_log) = start_mock_upstream(|method, path| match (method, path) {
        ("POST", p) if p.contains("otp/verify") => (200, json!({ "success": true }).to_string()),
        ("POST", _) => (200, json!({ "success": true }).to_string()),
        _ => (404, "{}".to_string()),
    })
    .await;
    let base = start_server(sheets_addr, Some(sms_addr)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/otp/verify", base))
        .json(&json!({ "phone": "+233200000001", "code": "123456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let cookie = session_cookie(&res);

    // The session belongs to the mobile user
    let res = client
        .get(format!("{}/api/auth/session", base))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["username"], "+233200000001");
    assert_eq!(body["role"], "member");

    // Unregistered phone cannot open a session even with a valid code
    let res = client
        .post(format!("{}/api/auth/otp/verify", base))
        .json(&json!({ "phone": "+233209999999", "code": "123456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn test_listings_and_dashboard() {
    let (sheets_addr, _log) = start_mock_upstream(school_sheets).await;
    let base = start_server(sheets_addr, None).await;
    let client = reqwest::Client::new();
    let cookie = login(&client, &base).await;

    let res = client
        .get(format!("{}/api/students", base))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["items"][0]["name"], "Ama Mensah");

    let res = client
        .get(format!("{}/api/students/classes", base))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"], json!(["JHS 1", "JHS 2"]));

    // Claims are joined to students by name
    let res = client
        .get(format!("{}/api/claims", base))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"][0]["claimant_name"], "Deacon Owusu");
    assert_eq!(body["items"][0]["student"]["id"], "S-1");

    let res = client
        .get(format!("{}/api/dashboard", base))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["students"], 2);
    assert_eq!(body["teachers"], 1);
    assert_eq!(body["invoices"]["paid"], 1);
    assert_eq!(body["invoices"]["pending"], 1);
    assert_eq!(body["collected_amount"], 250.0);
    assert_eq!(body["collected_fees"], 2.5);
    assert_eq!(body["claims"], 1);
    assert_eq!(body["claims_amount"], 300.0);
}

#[tokio::test]
async fn test_upstream_failure_handling() {
    // Spreadsheet that only knows AdminUsers; everything else fails.
    let (sheets_addr, _log) = start_mock_upstream(|method, path| match method {
        "GET" if path.contains("AdminUsers") => (200, values_response(&[&ADMIN_ROW])),
        _ => (500, json!({ "error": "backend unavailable" }).to_string()),
    })
    .await;
    let base = start_server(sheets_addr, None).await;
    let client = reqwest::Client::new();
    let cookie = login(&client, &base).await;

    // Listing endpoints degrade to an empty page
    let res = client
        .get(format!("{}/api/students", base))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 0);

    // Writes surface the upstream failure
    let res = client
        .post(format!("{}/api/invoices", base))
        .header("cookie", &cookie)
        .json(&json!({ "amount": 10.0, "description": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("upstream"));
}

#[tokio::test]
async fn test_health_is_public() {
    let (sheets_addr, _log) = start_mock_upstream(school_sheets).await;
    let base = start_server(sheets_addr, None).await;
    let res = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "operational");
}
