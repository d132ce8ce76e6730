//! Scripted fetcher used by the unit and endpoint tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::fetcher::{FetchError, FetchedPage, PageFetcher};

enum Scripted {
    Page(FetchedPage),
    Unreachable,
}

/// Serves canned responses by exact URL and records every URL it was asked for.
/// Unscripted URLs answer 404.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    responses: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, status: u16, content_type: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Scripted::Page(FetchedPage {
                status,
                content_type: content_type.to_string(),
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn html(self, url: &str, body: &str) -> Self {
        self.page(url, 200, "text/html; charset=utf-8", body)
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Scripted::Unreachable);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        match self.responses.get(url) {
            Some(Scripted::Page(page)) => Ok(page.clone()),
            Some(Scripted::Unreachable) => {
                // A request that cannot be built stands in for a dead host
                let err = reqwest::Client::new()
                    .get("not a valid url")
                    .build()
                    .expect_err("relative URL must not build");
                Err(FetchError::Transport(err))
            }
            None => Ok(FetchedPage {
                status: 404,
                content_type: "text/html".to_string(),
                body: String::new(),
            }),
        }
    }

    fn sample_user_agent(&self) -> String {
        "scripted-agent".to_string()
    }
}
