//! Terminal probe for the chat backend: checks the health endpoint, then
//! sends the command-line arguments as a prompt to /generate.

use std::env;

use anyhow::Result;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let base =
        env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1".to_string());
    let client = reqwest::Client::new();

    // Same status readout the browser UI showed.
    match client.get(format!("{base}/health")).send().await {
        Ok(resp) if resp.status().is_success() => println!("✅ API is running"),
        Ok(resp) => {
            println!("❌ API returned status {}", resp.status());
            return Ok(());
        }
        Err(e) => {
            println!("❌ Cannot connect to API: {e}");
            return Ok(());
        }
    }

    let prompt = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.trim().is_empty() {
        println!("usage: chat_probe <prompt...>");
        return Ok(());
    }

    let max_length: u32 = env::var("PROBE_MAX_LENGTH")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(50);
    let temperature: f64 = env::var("PROBE_TEMPERATURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.7);

    let resp = client
        .post(format!("{base}/generate"))
        .json(&json!({
            "prompt": prompt,
            "max_length": max_length,
            "temperature": temperature,
        }))
        .send()
        .await?;

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or_else(|_| json!({}));

    if status.is_success() {
        println!("{}", body["generated_text"].as_str().unwrap_or_default());
    } else {
        println!("❌ API error: {status} - {}", body["detail"]);
    }

    Ok(())
}
