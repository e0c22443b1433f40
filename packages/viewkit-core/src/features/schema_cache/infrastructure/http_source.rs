//! HTTP(S) schema source

use crate::features::schema_cache::domain::SchemaCategory;
use crate::features::schema_cache::error::{SchemaFetchError, SchemaFetchResult};
use crate::features::schema_cache::ports::SchemaSource;
use reqwest::blocking::Client;
use std::time::Duration;

/// Plain GET against `<base_url>/<file>` with a bounded timeout
pub struct HttpSchemaSource {
    client: Client,
    base_url: String,
}

impl HttpSchemaSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> SchemaFetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| SchemaFetchError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl SchemaSource for HttpSchemaSource {
    fn retrieve(&self, category: SchemaCategory) -> SchemaFetchResult<String> {
        let url = category.url(&self.base_url);
        let transport = |e: reqwest::Error| SchemaFetchError::Transport {
            category: category.key().to_string(),
            url: url.clone(),
            cause: if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            },
        };

        let response = self.client.get(&url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SchemaFetchError::Status {
                category: category.key().to_string(),
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(transport)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
