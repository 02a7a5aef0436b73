use anyhow::{bail, ensure, Context};
use axum::body::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};

/// Client for the external image store behind `UPLOAD_API_URL`.
#[derive(Clone, Debug)]
pub struct Client {
    url: String,
    client: reqwest::Client,
}

/// What to hand the store: raw image bytes, or a JSON reference to one.
#[derive(Debug)]
pub enum UploadSource {
    Bytes(Bytes),
    Json {
        base64: Option<String>,
        url: Option<String>,
    },
}

#[derive(Serialize)]
struct JsonBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    base64: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreResponse {
    url: Option<String>,
    mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Uploaded {
    pub url: String,
    pub mime_type: Option<String>,
}

impl Client {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .context("failed to build upload client")?;

        Ok(Self { url, client })
    }

    pub async fn upload(&self, source: UploadSource) -> anyhow::Result<Uploaded> {
        let request = self.client.post(&self.url);
        let request = match &source {
            UploadSource::Bytes(bytes) => request
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(bytes.clone()),
            UploadSource::Json { base64, url } => request.json(&JsonBody {
                base64: base64.as_deref(),
                url: url.as_deref(),
            }),
        };

        let response = request.send().await?;

        let status_code = response.status();
        let text = response.text().await;

        ensure!(
            status_code.is_success(),
            "status code: {}, response: {:?}",
            status_code,
            text
        );

        let response: StoreResponse = serde_json::from_str(&text?)
            .context("failed to parse upload response")?;

        let Some(url) = response.url.filter(|url| !url.is_empty()) else {
            bail!("upload response has no url");
        };

        Ok(Uploaded {
            url,
            mime_type: response.mime_type,
        })
    }
}
