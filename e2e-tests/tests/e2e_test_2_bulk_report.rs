// E2E Test 2: Bulk Report
// Tests the complete flow: upload → parser → parallel scoring → report store → CSV export

mod e2e;

use e2e::api_client::ApiTestClient;
use e2e::helpers::{generate_test_user, TestEnv, TestResult};
use reqwest::StatusCode;
use std::time::Instant;

#[tokio::test]
async fn test_e2e_2_bulk_report() {
    let start = Instant::now();
    let test_name = "E2E Test 2: Bulk Report".to_string();

    println!("\n🚀 Starting: {}", test_name);
    println!("{}", "=".repeat(80));

    let env = match TestEnv::start().await {
        Ok(env) => env,
        Err(e) => {
            TestResult::failure(test_name, e, start.elapsed()).print();
            panic!("Service check failed");
        }
    };
    let client = ApiTestClient::new(&env.base_url, &generate_test_user());

    // Step 1: Upload 6 spam and 4 neutral messages
    println!("\n📋 Step 1: Uploading CSV...");
    let mut content = String::from("email,label\n");
    for i in 0..6 {
        content.push_str(&format!("\"Limited time: win a casino bonus, ref {}\",spam\n", i));
    }
    for i in 0..4 {
        content.push_str(&format!("\"the blue car {} is parked outside\",ham\n", i));
    }

    let (status, body) = client.bulk_analyze("inbox.csv", &content).await.unwrap();
    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(body["summary"]["total"], 10);
    assert_eq!(body["summary"]["spam_count"], 6);
    assert_eq!(body["summary"]["ham_count"], 4);
    assert_eq!(body["summary"]["spam_percentage"], 60.0);
    let batch_id = body["batch_id"].as_str().unwrap().to_string();
    println!("✅ Batch {} analyzed", batch_id);

    // Step 2: Fetch the stored report
    println!("\n📋 Step 2: Fetching report...");
    let (status, report) = client
        .get(&format!("/api/reports/{}", batch_id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 10);
    assert_eq!(results[0]["prediction"], "spam");
    assert_eq!(results[9]["prediction"], "ham");
    println!("✅ Report has {} items in upload order", results.len());

    // Step 3: Download it
    println!("\n📋 Step 3: Downloading report CSV...");
    let (status, content_type, csv) = client
        .download(&format!("/api/reports/{}/download", batch_id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/csv"));
    assert_eq!(csv.lines().count(), 11);
    println!("✅ CSV export ok");

    // Step 4: Rejected uploads
    println!("\n📋 Step 4: Checking rejected uploads...");
    let (status, _) = client.bulk_analyze("inbox.docx", "free cash").await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = client.bulk_analyze("inbox.txt", "\n\n").await.unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    println!("✅ Invalid uploads rejected");

    TestResult::success(test_name, start.elapsed()).print();
}
