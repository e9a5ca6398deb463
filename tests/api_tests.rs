//! API integration tests
//!
//! Run against a live server with a fresh database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

async fn create_user(client: &Client, name: &str, role: &str) -> i32 {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": name, "role": role }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse user");
    body["id"].as_i64().expect("No user id") as i32
}

async fn create_category(client: &Client, name: &str) -> i32 {
    let response = client
        .post(format!("{}/categories", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse category");
    body["id"].as_i64().expect("No category id") as i32
}

async fn create_asset(client: &Client, category_id: i32, name: &str, total_units: i32) -> i32 {
    let response = client
        .post(format!("{}/assets", BASE_URL))
        .json(&json!({
            "name": name,
            "category_id": category_id,
            "total_units": total_units
        }))
        .send()
        .await
        .expect("Failed to create asset");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse asset");
    body["id"].as_i64().expect("No asset id") as i32
}

async fn available_units(client: &Client, asset_id: i32) -> i64 {
    let response = client
        .get(format!("{}/assets/{}", BASE_URL, asset_id))
        .send()
        .await
        .expect("Failed to fetch asset");
    let body: Value = response.json().await.expect("Failed to parse asset");
    body["available_units"].as_i64().expect("No available_units")
}

/// Submit a single-asset loan on weekdays well in the future
async fn submit_loan(client: &Client, requester: i32, asset_id: i32, quantity: i32) -> Value {
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("X-Actor-Id", requester)
        .json(&json!({
            "start_date": "2026-09-02",
            "due_date": "2026-09-09",
            "purpose": "integration test",
            "lines": [{ "asset_id": asset_id, "quantity": quantity }]
        }))
        .send()
        .await
        .expect("Failed to submit loan");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse loan")
}

async fn approve_loan(client: &Client, approver: i32, loan_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/loans/{}/approve", BASE_URL, loan_id))
        .header("X-Actor-Id", approver)
        .send()
        .await
        .expect("Failed to send approve")
}

async fn inspect_line(client: &Client, inspector: i32, line_item_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/line-items/{}/inspection", BASE_URL, line_item_id))
        .header("X-Actor-Id", inspector)
        .json(&json!({
            "overall_condition": "good",
            "confirm_empty_checklist": true
        }))
        .send()
        .await
        .expect("Failed to send inspection")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    // Readiness round-trips a query through the database
    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_full_lifecycle_with_mixed_condition_return() {
    let client = Client::new();
    let requester = create_user(&client, "lifecycle requester", "requester").await;
    let approver = create_user(&client, "lifecycle approver", "approver").await;
    let inspector = create_user(&client, "lifecycle inspector", "inspector").await;
    let officer = create_user(&client, "lifecycle officer", "return_officer").await;
    let category = create_category(&client, "cameras-lifecycle").await;
    let asset = create_asset(&client, category, "DSLR kit", 10).await;

    // Request 3 units -> pending, stock untouched
    let loan = submit_loan(&client, requester, asset, 3).await;
    let loan_id = loan["id"].as_i64().unwrap();
    assert_eq!(loan["status"], "pending");
    assert_eq!(available_units(&client, asset).await, 10);

    // Approve -> 7 available
    let response = approve_loan(&client, approver, loan_id).await;
    assert_eq!(response.status(), 200);
    let approved: Value = response.json().await.unwrap();
    assert_eq!(approved["status"], "approved");
    assert_eq!(available_units(&client, asset).await, 7);

    // Inspect the single line -> active
    let line_id = loan["lines"][0]["id"].as_i64().unwrap();
    let response = inspect_line(&client, inspector, line_id).await;
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .unwrap();
    let details: Value = response.json().await.unwrap();
    assert_eq!(details["status"], "active");

    // Return 2 good + 1 damaged -> all 3 units come back; only lost units
    // withhold stock, so availability round-trips to 10
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .header("X-Actor-Id", officer)
        .json(&json!({
            "splits": [
                { "asset_id": asset, "quantity": 2, "condition": "good", "note": "all fine" },
                { "asset_id": asset, "quantity": 1, "condition": "damaged", "note": "cracked casing" }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let returned: Value = response.json().await.unwrap();
    assert_eq!(returned["details"].as_array().unwrap().len(), 2);
    assert_eq!(returned["details"][1]["damage_severity"], "major");
    assert_eq!(returned["note"], "[good x2] all fine; [damaged x1] cracked casing");

    assert_eq!(available_units(&client, asset).await, 10);

    let response = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .unwrap();
    let details: Value = response.json().await.unwrap();
    assert_eq!(details["status"], "returned");
}

#[tokio::test]
#[ignore]
async fn test_short_return_is_rejected_without_stock_movement() {
    let client = Client::new();
    let requester = create_user(&client, "short requester", "requester").await;
    let approver = create_user(&client, "short approver", "approver").await;
    let inspector = create_user(&client, "short inspector", "inspector").await;
    let officer = create_user(&client, "short officer", "return_officer").await;
    let category = create_category(&client, "cameras-short").await;
    let asset = create_asset(&client, category, "Tripod", 10).await;

    let loan = submit_loan(&client, requester, asset, 3).await;
    let loan_id = loan["id"].as_i64().unwrap();
    assert_eq!(approve_loan(&client, approver, loan_id).await.status(), 200);
    let line_id = loan["lines"][0]["id"].as_i64().unwrap();
    assert_eq!(inspect_line(&client, inspector, line_id).await.status(), 201);
    assert_eq!(available_units(&client, asset).await, 7);

    // Only 2 of 3 accounted for -> QuantityMismatch, nothing changes
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .header("X-Actor-Id", officer)
        .json(&json!({
            "splits": [{ "asset_id": asset, "quantity": 2, "condition": "good" }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "QuantityMismatch");

    assert_eq!(available_units(&client, asset).await, 7);

    let response = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .unwrap();
    let details: Value = response.json().await.unwrap();
    assert_eq!(details["status"], "active");
}

#[tokio::test]
#[ignore]
async fn test_lost_units_do_not_release_stock() {
    let client = Client::new();
    let requester = create_user(&client, "lost requester", "requester").await;
    let approver = create_user(&client, "lost approver", "approver").await;
    let inspector = create_user(&client, "lost inspector", "inspector").await;
    let officer = create_user(&client, "lost officer", "return_officer").await;
    let category = create_category(&client, "audio-lost").await;
    let asset = create_asset(&client, category, "Wireless mic", 5).await;

    let loan = submit_loan(&client, requester, asset, 2).await;
    let loan_id = loan["id"].as_i64().unwrap();
    assert_eq!(approve_loan(&client, approver, loan_id).await.status(), 200);
    let line_id = loan["lines"][0]["id"].as_i64().unwrap();
    assert_eq!(inspect_line(&client, inspector, line_id).await.status(), 201);
    assert_eq!(available_units(&client, asset).await, 3);

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .header("X-Actor-Id", officer)
        .json(&json!({
            "splits": [
                { "asset_id": asset, "quantity": 1, "condition": "good" },
                { "asset_id": asset, "quantity": 1, "condition": "lost" }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // Only the good unit comes back on the shelf
    assert_eq!(available_units(&client, asset).await, 4);
}

#[tokio::test]
#[ignore]
async fn test_multi_line_approval_is_all_or_nothing() {
    let client = Client::new();
    let requester = create_user(&client, "atomic requester", "requester").await;
    let approver = create_user(&client, "atomic approver", "approver").await;
    let category = create_category(&client, "video-atomic").await;
    let plenty = create_asset(&client, category, "HDMI cable", 10).await;
    let scarce = create_asset(&client, category, "Capture card", 1).await;

    // Drain the scarce asset with a competing approved loan
    let competing = submit_loan(&client, requester, scarce, 1).await;
    let competing_id = competing["id"].as_i64().unwrap();
    assert_eq!(approve_loan(&client, approver, competing_id).await.status(), 200);
    assert_eq!(available_units(&client, scarce).await, 0);

    // Submission pre-check already refuses an asset with nothing on the shelf
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("X-Actor-Id", requester)
        .json(&json!({
            "start_date": "2026-09-02",
            "due_date": "2026-09-09",
            "lines": [
                { "asset_id": plenty, "quantity": 4 },
                { "asset_id": scarce, "quantity": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // To exercise the binding check at approval, submit the two-line loan
    // while stock is still there, then drain it through a competing approval
    let scarce2 = create_asset(&client, category, "Capture card B", 1).await;
    let two_line = client
        .post(format!("{}/loans", BASE_URL))
        .header("X-Actor-Id", requester)
        .json(&json!({
            "start_date": "2026-09-02",
            "due_date": "2026-09-09",
            "lines": [
                { "asset_id": plenty, "quantity": 4 },
                { "asset_id": scarce2, "quantity": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(two_line.status(), 201);
    let two_line: Value = two_line.json().await.unwrap();
    let two_line_id = two_line["id"].as_i64().unwrap();

    // Drain scarce2 through a competing loan approved first
    let competing2 = submit_loan(&client, requester, scarce2, 1).await;
    let competing2_id = competing2["id"].as_i64().unwrap();
    assert_eq!(approve_loan(&client, approver, competing2_id).await.status(), 200);
    assert_eq!(available_units(&client, scarce2).await, 0);

    let before_plenty = available_units(&client, plenty).await;

    // Approval must fail on the second line and leave the first untouched
    let response = approve_loan(&client, approver, two_line_id).await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "InsufficientStock");

    assert_eq!(available_units(&client, plenty).await, before_plenty);

    let response = client
        .get(format!("{}/loans/{}", BASE_URL, two_line_id))
        .send()
        .await
        .unwrap();
    let details: Value = response.json().await.unwrap();
    assert_eq!(details["status"], "pending");
}

#[tokio::test]
#[ignore]
async fn test_inspection_gate_fires_once_regardless_of_order() {
    let client = Client::new();
    let requester = create_user(&client, "gate requester", "requester").await;
    let approver = create_user(&client, "gate approver", "approver").await;
    let inspector = create_user(&client, "gate inspector", "inspector").await;
    let category = create_category(&client, "lighting-gate").await;
    let lamp = create_asset(&client, category, "Studio lamp", 6).await;
    let stand = create_asset(&client, category, "Light stand", 6).await;

    let loan = client
        .post(format!("{}/loans", BASE_URL))
        .header("X-Actor-Id", requester)
        .json(&json!({
            "start_date": "2026-09-02",
            "due_date": "2026-09-09",
            "lines": [
                { "asset_id": lamp, "quantity": 2 },
                { "asset_id": stand, "quantity": 2 }
            ]
        }))
        .send()
        .await
        .unwrap();
    let loan: Value = loan.json().await.unwrap();
    let loan_id = loan["id"].as_i64().unwrap();
    assert_eq!(approve_loan(&client, approver, loan_id).await.status(), 200);

    let first = loan["lines"][0]["id"].as_i64().unwrap();
    let second = loan["lines"][1]["id"].as_i64().unwrap();

    // Inspect in reverse order; loan stays approved until the last one
    assert_eq!(inspect_line(&client, inspector, second).await.status(), 201);
    let response = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .unwrap();
    let details: Value = response.json().await.unwrap();
    assert_eq!(details["status"], "approved");

    assert_eq!(inspect_line(&client, inspector, first).await.status(), 201);
    let response = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .unwrap();
    let details: Value = response.json().await.unwrap();
    assert_eq!(details["status"], "active");

    // Re-inspecting is a state conflict, not a second transition
    let response = inspect_line(&client, inspector, first).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_approvals_never_overdraw() {
    let client = Client::new();
    let requester = create_user(&client, "race requester", "requester").await;
    let approver = create_user(&client, "race approver", "approver").await;
    let category = create_category(&client, "drones-race").await;
    let asset = create_asset(&client, category, "Drone", 1).await;

    let first = submit_loan(&client, requester, asset, 1).await;
    let second = submit_loan(&client, requester, asset, 1).await;
    let first_id = first["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();

    let (a, b) = tokio::join!(
        approve_loan(&client, approver, first_id),
        approve_loan(&client, approver, second_id)
    );

    let statuses = [a.status().as_u16(), b.status().as_u16()];
    let successes = statuses.iter().filter(|s| **s == 200).count();
    let conflicts = statuses.iter().filter(|s| **s == 409).count();
    assert_eq!(successes, 1, "exactly one approval may win, got {:?}", statuses);
    assert_eq!(conflicts, 1);

    assert_eq!(available_units(&client, asset).await, 0);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_approvals_over_shared_assets_both_complete() {
    let client = Client::new();
    let requester = create_user(&client, "crossed requester", "requester").await;
    let approver = create_user(&client, "crossed approver", "approver").await;
    let category = create_category(&client, "audio-crossed").await;
    let mixer = create_asset(&client, category, "Mixer", 10).await;
    let speaker = create_asset(&client, category, "Speaker", 10).await;

    // Two loans over the same pair of assets, lines submitted in opposite
    // order. Reservation walks assets in id order regardless, so concurrent
    // approvals never wait on each other's locks crosswise; both must land
    // cleanly instead of one dying as a deadlock victim.
    let submit_pair = |first: i32, second: i32| {
        let client = client.clone();
        async move {
            let response = client
                .post(format!("{}/loans", BASE_URL))
                .header("X-Actor-Id", requester)
                .json(&json!({
                    "start_date": "2026-09-02",
                    "due_date": "2026-09-09",
                    "lines": [
                        { "asset_id": first, "quantity": 2 },
                        { "asset_id": second, "quantity": 2 }
                    ]
                }))
                .send()
                .await
                .expect("Failed to submit loan");
            assert_eq!(response.status(), 201);
            let body: Value = response.json().await.expect("Failed to parse loan");
            body["id"].as_i64().unwrap()
        }
    };

    let forward_id = submit_pair(mixer, speaker).await;
    let reversed_id = submit_pair(speaker, mixer).await;

    let (a, b) = tokio::join!(
        approve_loan(&client, approver, forward_id),
        approve_loan(&client, approver, reversed_id)
    );

    assert_eq!(a.status(), 200);
    assert_eq!(b.status(), 200);
    assert_eq!(available_units(&client, mixer).await, 6);
    assert_eq!(available_units(&client, speaker).await, 6);
}

#[tokio::test]
#[ignore]
async fn test_reject_and_cancel_only_from_pending() {
    let client = Client::new();
    let requester = create_user(&client, "reject requester", "requester").await;
    let approver = create_user(&client, "reject approver", "approver").await;
    let category = create_category(&client, "misc-reject").await;
    let asset = create_asset(&client, category, "Projector", 4).await;

    // Reject a pending loan
    let loan = submit_loan(&client, requester, asset, 1).await;
    let loan_id = loan["id"].as_i64().unwrap();
    let response = client
        .post(format!("{}/loans/{}/reject", BASE_URL, loan_id))
        .header("X-Actor-Id", approver)
        .json(&json!({ "reason": "event cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let rejected: Value = response.json().await.unwrap();
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["rejection_reason"], "event cancelled");
    assert_eq!(available_units(&client, asset).await, 4);

    // A rejected loan cannot be approved or cancelled
    assert_eq!(approve_loan(&client, approver, loan_id).await.status(), 409);
    let response = client
        .delete(format!("{}/loans/{}", BASE_URL, loan_id))
        .header("X-Actor-Id", requester)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    // Cancel a pending loan: it is gone afterwards
    let loan = submit_loan(&client, requester, asset, 1).await;
    let loan_id = loan["id"].as_i64().unwrap();
    let response = client
        .delete(format!("{}/loans/{}", BASE_URL, loan_id))
        .header("X-Actor-Id", requester)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);
    let response = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_weekend_dates_are_rejected() {
    let client = Client::new();
    let requester = create_user(&client, "weekend requester", "requester").await;
    let category = create_category(&client, "misc-weekend").await;
    let asset = create_asset(&client, category, "Easel", 2).await;

    // 2026-09-05 is a Saturday
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("X-Actor-Id", requester)
        .json(&json!({
            "start_date": "2026-09-05",
            "due_date": "2026-09-09",
            "lines": [{ "asset_id": asset, "quantity": 1 }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .header("X-Actor-Id", requester)
        .json(&json!({
            "start_date": "2026-09-09",
            "due_date": "2026-09-02",
            "lines": [{ "asset_id": asset, "quantity": 1 }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_checklist_template_flows_into_inspection() {
    let client = Client::new();
    let requester = create_user(&client, "tpl requester", "requester").await;
    let approver = create_user(&client, "tpl approver", "approver").await;
    let inspector = create_user(&client, "tpl inspector", "inspector").await;
    let category = create_category(&client, "laptops-tpl").await;
    let asset = create_asset(&client, category, "Laptop", 3).await;

    for prompt in ["Powers on", "Screen intact", "Charger present"] {
        let response = client
            .post(format!("{}/categories/{}/checklist", BASE_URL, category))
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    // Soft-delete the second prompt; sequence numbers keep their gaps
    let response = client
        .get(format!("{}/categories/{}/checklist", BASE_URL, category))
        .send()
        .await
        .unwrap();
    let items: Value = response.json().await.unwrap();
    let second_id = items[1]["id"].as_i64().unwrap();
    let response = client
        .delete(format!("{}/checklist-items/{}", BASE_URL, second_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let loan = submit_loan(&client, requester, asset, 1).await;
    let loan_id = loan["id"].as_i64().unwrap();
    assert_eq!(approve_loan(&client, approver, loan_id).await.status(), 200);
    let line_id = loan["lines"][0]["id"].as_i64().unwrap();

    // No answers supplied: the blank checklist comes from the template
    let response = client
        .post(format!("{}/line-items/{}/inspection", BASE_URL, line_id))
        .header("X-Actor-Id", inspector)
        .json(&json!({ "overall_condition": "good" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let inspection: Value = response.json().await.unwrap();
    let answers = inspection["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0]["prompt"], "Powers on");
    assert_eq!(answers[0]["seq"], 1);
    assert_eq!(answers[1]["prompt"], "Charger present");
    assert_eq!(answers[1]["seq"], 3);
}

#[tokio::test]
#[ignore]
async fn test_empty_template_requires_confirmation() {
    let client = Client::new();
    let requester = create_user(&client, "empty requester", "requester").await;
    let approver = create_user(&client, "empty approver", "approver").await;
    let inspector = create_user(&client, "empty inspector", "inspector").await;
    let category = create_category(&client, "misc-empty").await;
    let asset = create_asset(&client, category, "Extension cord", 8).await;

    let loan = submit_loan(&client, requester, asset, 1).await;
    let loan_id = loan["id"].as_i64().unwrap();
    assert_eq!(approve_loan(&client, approver, loan_id).await.status(), 200);
    let line_id = loan["lines"][0]["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/line-items/{}/inspection", BASE_URL, line_id))
        .header("X-Actor-Id", inspector)
        .json(&json!({ "overall_condition": "good" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = inspect_line(&client, inspector, line_id).await;
    assert_eq!(response.status(), 201);
}
