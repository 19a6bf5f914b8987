//! Crypto news feed (CryptoCompare) client

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::http::{FetchError, HttpFetcher};

/// A single news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Publication time, epoch seconds
    #[serde(default)]
    pub published_on: i64,
    #[serde(default)]
    pub source: String,
}

/// Raw feed envelope. `Data` is an object rather than an array when the
/// upstream reports an error, so it is decoded lazily.
#[derive(Debug, Deserialize)]
struct NewsEnvelope {
    #[serde(rename = "Data", default)]
    data: serde_json::Value,
    #[serde(rename = "Message", default)]
    message: Option<String>,
}

/// News feed client
#[derive(Debug, Clone)]
pub struct NewsClient {
    url: String,
    lang: String,
    api_key: Option<String>,
    http: HttpFetcher,
}

impl NewsClient {
    pub fn new(
        url: impl Into<String>,
        lang: impl Into<String>,
        api_key: Option<String>,
        http: HttpFetcher,
    ) -> Self {
        Self {
            url: url.into(),
            lang: lang.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            http,
        }
    }

    /// Fetch the latest articles
    pub async fn fetch_news(&self) -> Result<Vec<NewsArticle>, FetchError> {
        let mut query = vec![("lang", self.lang.clone())];
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.clone()));
        }

        let envelope: NewsEnvelope = self.http.get_json(&self.url, &query).await?;

        if !envelope.data.is_array() {
            let message = envelope
                .message
                .unwrap_or_else(|| "news feed returned no articles".to_string());
            warn!("News feed returned no article list: {}", message);
            return Err(FetchError::EmptyResult(message));
        }

        let articles: Vec<NewsArticle> = serde_json::from_value(envelope.data)
            .map_err(|e| FetchError::Parse(format!("news articles: {}", e)))?;

        info!("Fetched {} news articles", articles.len());
        Ok(articles)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_id_accepts_numbers() {
        let raw = r#"{"id": 4512, "title": "t", "url": "u", "published_on": 1700000000, "source": "s"}"#;
        let article: NewsArticle = serde_json::from_str(raw).unwrap();
        assert_eq!(article.id, "4512");
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let client = NewsClient::new("http://localhost", "EN", Some("  ".to_string()), HttpFetcher::default());
        assert!(client.api_key.is_none());
    }
}
