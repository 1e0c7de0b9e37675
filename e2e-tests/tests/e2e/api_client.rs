use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Thin HTTP client for the spam-rs API
pub struct ApiTestClient {
    client: Client,
    base_url: String,
    user: String,
}

impl ApiTestClient {
    pub fn new(base_url: &str, user: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user: user.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn into_json(resp: reqwest::Response) -> Result<(StatusCode, Value), String> {
        let status = resp.status();
        let text = resp.text().await.map_err(|e| e.to_string())?;
        if text.is_empty() {
            return Ok((status, Value::Null));
        }
        let body = serde_json::from_str(&text).map_err(|e| format!("{}: {}", e, text))?;
        Ok((status, body))
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value), String> {
        let resp = self
            .client
            .post(self.url(path))
            .header("X-User-Id", &self.user)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("POST {} failed: {}", path, e))?;
        Self::into_json(resp).await
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value), String> {
        let resp = self
            .client
            .get(self.url(path))
            .header("X-User-Id", &self.user)
            .send()
            .await
            .map_err(|e| format!("GET {} failed: {}", path, e))?;
        Self::into_json(resp).await
    }

    /// GET returning the raw body and its content type
    pub async fn download(&self, path: &str) -> Result<(StatusCode, String, String), String> {
        let resp = self
            .client
            .get(self.url(path))
            .header("X-User-Id", &self.user)
            .send()
            .await
            .map_err(|e| format!("GET {} failed: {}", path, e))?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = resp.text().await.map_err(|e| e.to_string())?;
        Ok((status, content_type, body))
    }

    pub async fn delete(&self, path: &str) -> Result<StatusCode, String> {
        let resp = self
            .client
            .delete(self.url(path))
            .header("X-User-Id", &self.user)
            .send()
            .await
            .map_err(|e| format!("DELETE {} failed: {}", path, e))?;
        Ok(resp.status())
    }

    pub async fn scan(&self, message: &str) -> Result<(StatusCode, Value), String> {
        self.post("/api/scan", json!({ "message": message })).await
    }

    pub async fn bulk_analyze(
        &self,
        file_name: &str,
        content: &str,
    ) -> Result<(StatusCode, Value), String> {
        self.post(
            "/api/bulk-analyze",
            json!({ "file_name": file_name, "content": content }),
        )
        .await
    }
}
