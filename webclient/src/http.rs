use std::{sync::Arc, time::Duration};

use ::tokio::sync::Mutex;
use ::tokio::time::{Interval, MissedTickBehavior};
use serde::Serialize;

pub use ::reqwest::{Error, IntoUrl, Request, Response};
pub type UrlGlob = ::glob::Pattern;

/// HTTP client that keeps a minimum interval between requests whose URL
/// matches a glob, so that polling never exceeds the remote rate limit.
#[derive(Clone)]
pub struct Client {
    inner: ::reqwest::Client,
    req_intervals: Vec<(UrlGlob, Arc<Mutex<Interval>>)>,
}

pub struct RequestBuilder {
    inner: ::reqwest::RequestBuilder,
    client: Client,
}

impl Client {
    pub fn new(
        timeout: Duration,
        url_wise_req_interval: impl IntoIterator<Item = (UrlGlob, Duration)>,
    ) -> Self {
        let req_intervals = url_wise_req_interval
            .into_iter()
            .map(|(pat, dur)| {
                let mut interval = ::tokio::time::interval(dur);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                (pat, Arc::new(Mutex::new(interval)))
            })
            .collect();
        let inner = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            inner,
            req_intervals,
        }
    }

    pub fn get(&self, u: impl IntoUrl) -> RequestBuilder {
        RequestBuilder::new(self.inner.get(u), self.clone())
    }

    async fn execute_request(&self, req: Request) -> Result<Response, Error> {
        let url_str = req.url().as_str();
        if let Some(interval) = self
            .req_intervals
            .iter()
            .find(|(pat, _)| pat.matches(url_str))
            .map(|(_, interval)| interval)
        {
            interval.lock().await.tick().await;
        }

        log::debug!("GET {}", url_str);
        self.inner.execute(req).await
    }
}

impl RequestBuilder {
    fn new(b: ::reqwest::RequestBuilder, client: Client) -> Self {
        Self { inner: b, client }
    }

    pub async fn send(self) -> Result<Response, Error> {
        let req = self.inner.build()?;
        self.client.execute_request(req).await
    }

    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        self.inner = self.inner.query(query);
        self
    }
}
