// E2E Test 3: Multi Users
// Tests that history and reports are isolated per X-User-Id

mod e2e;

use e2e::api_client::ApiTestClient;
use e2e::helpers::{generate_test_user, TestEnv, TestResult};
use reqwest::StatusCode;
use std::time::Instant;

#[tokio::test]
async fn test_e2e_3_multi_users() {
    let start = Instant::now();
    let test_name = "E2E Test 3: Multi Users".to_string();

    println!("\n🚀 Starting: {}", test_name);
    println!("{}", "=".repeat(80));

    let env = match TestEnv::start().await {
        Ok(env) => env,
        Err(e) => {
            TestResult::failure(test_name, e, start.elapsed()).print();
            panic!("Service check failed");
        }
    };

    let base = generate_test_user();
    let alice = ApiTestClient::new(&env.base_url, &format!("{}_alice", base));
    let bob = ApiTestClient::new(&env.base_url, &format!("{}_bob", base));

    // Step 1: Each user scans a message
    println!("\n📋 Step 1: Scanning as two users...");
    let (_, alice_scan) = alice.scan("cheap pills from our pharmacy").await.unwrap();
    let (_, bob_scan) = bob.scan("meeting agenda attached").await.unwrap();
    let alice_id = alice_scan["id"].as_str().unwrap().to_string();
    println!("✅ Scans stored");

    // Step 2: Histories are isolated
    println!("\n📋 Step 2: Verifying history isolation...");
    let (_, alice_history) = alice.get("/api/history").await.unwrap();
    let (_, bob_history) = bob.get("/api/history").await.unwrap();
    assert_eq!(alice_history.as_array().unwrap().len(), 1);
    assert_eq!(bob_history.as_array().unwrap().len(), 1);
    assert_eq!(bob_history[0]["id"], bob_scan["id"]);

    let (status, _) = bob.get(&format!("/api/history/{}", alice_id)).await.unwrap();
    if status != StatusCode::NOT_FOUND {
        TestResult::failure(
            test_name.clone(),
            "Bob can read Alice's scan".to_string(),
            start.elapsed(),
        )
        .print();
        panic!("History isolation violated");
    }
    println!("✅ Histories isolated");

    // Step 3: Clearing one user leaves the other alone
    println!("\n📋 Step 3: Clearing Alice's history...");
    assert_eq!(alice.delete("/api/history").await.unwrap(), StatusCode::NO_CONTENT);
    let (_, alice_history) = alice.get("/api/history").await.unwrap();
    let (_, bob_history) = bob.get("/api/history").await.unwrap();
    assert!(alice_history.as_array().unwrap().is_empty());
    assert_eq!(bob_history.as_array().unwrap().len(), 1);
    println!("✅ Bob's history untouched");

    TestResult::success(test_name, start.elapsed()).print();
}
