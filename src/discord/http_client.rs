use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::{Method, Response};
use serde_json::json;
use tokio::sync::Mutex;

/// Seconds since the epoch, the unit of `X-RateLimit-Reset`.
fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Longest wait a rate-limit header can impose on a single call.
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Converts header-supplied seconds to a wait, capped at
/// [`MAX_RATE_LIMIT_WAIT`]. Negative or NaN values mean no wait.
fn bounded_wait(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).map_or(MAX_RATE_LIMIT_WAIT, |wait| {
        wait.min(MAX_RATE_LIMIT_WAIT)
    })
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    remaining: u32,
    reset_at: f64,
}

/// Per-route and global rate-limit state learned from response headers.
#[derive(Debug, Default)]
struct RateLimits {
    routes: Mutex<HashMap<String, Bucket>>,
    global_reset_at: Mutex<Option<f64>>,
}

impl RateLimits {
    /// How long a call on `route` has to wait at time `now`.
    async fn delay(&self, route: &str, now: f64) -> Option<Duration> {
        let global = (*self.global_reset_at.lock().await).filter(|reset| *reset > now);
        let local = self
            .routes
            .lock()
            .await
            .get(route)
            .filter(|bucket| bucket.remaining == 0 && bucket.reset_at > now)
            .map(|bucket| bucket.reset_at);

        let until = match (global, local) {
            (Some(a), Some(b)) => a.max(b),
            (a, b) => a.or(b)?,
        };
        Some(bounded_wait(until - now))
    }

    async fn observe(&self, route: &str, headers: &HeaderMap) {
        let remaining = header_value::<u32>(headers, "X-RateLimit-Remaining");
        let reset_at = header_value::<f64>(headers, "X-RateLimit-Reset");
        if let (Some(remaining), Some(reset_at)) = (remaining, reset_at) {
            self.routes.lock().await.insert(
                route.to_string(),
                Bucket {
                    remaining,
                    reset_at,
                },
            );
        }
    }

    /// Marks `route` (or everything, for a global limit) as exhausted until
    /// `retry_after` has passed.
    async fn block(&self, route: &str, global: bool, retry_after: Duration) {
        let reset_at = unix_now() + retry_after.as_secs_f64();
        if global {
            *self.global_reset_at.lock().await = Some(reset_at);
        } else {
            self.routes.lock().await.insert(
                route.to_string(),
                Bucket {
                    remaining: 0,
                    reset_at,
                },
            );
        }
    }
}

/// Discord REST client for the handful of endpoints the bot uses.
///
/// Rate-limit headers are tracked per route so a call waits for an exhausted
/// bucket instead of provoking a 429. A 429 that still happens is recorded
/// and returned as an error; calls are never repeated.
pub struct DiscordHttpClient {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    limits: RateLimits,
}

impl DiscordHttpClient {
    #[must_use]
    pub fn new(api_base: &str, bot_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            limits: RateLimits::default(),
        }
    }

    pub async fn get_gateway_bot(&self) -> Result<serde_json::Value> {
        let url = format!("{}/gateway/bot", self.api_base);
        let response = self
            .request(Method::GET, &url, None)
            .await
            .context("fetch Discord gateway bot data")?;
        response
            .json()
            .await
            .context("parse Discord gateway bot JSON")
    }

    pub async fn create_message(
        &self,
        channel_id: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/channels/{channel_id}/messages", self.api_base);
        let response = self
            .request(Method::POST, &url, Some(payload))
            .await
            .context("send Discord message")?;
        response
            .json()
            .await
            .context("parse Discord send message response JSON")
    }

    pub async fn create_interaction_response(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        response_type: u8,
        data: Option<serde_json::Value>,
    ) -> Result<()> {
        let url = format!(
            "{}/interactions/{interaction_id}/{interaction_token}/callback",
            self.api_base
        );
        let mut body = json!({ "type": response_type });
        if let Some(payload) = data {
            body["data"] = payload;
        }
        let _response = self
            .request(Method::POST, &url, Some(body))
            .await
            .context("create Discord interaction response")?;
        Ok(())
    }

    pub async fn edit_original_interaction_response(
        &self,
        application_id: &str,
        interaction_token: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        let url = format!(
            "{}/webhooks/{application_id}/{interaction_token}/messages/@original",
            self.api_base
        );
        let _response = self
            .request(Method::PATCH, &url, Some(payload))
            .await
            .context("edit original Discord interaction response")?;
        Ok(())
    }

    pub async fn register_commands(
        &self,
        application_id: &str,
        guild_id: Option<&str>,
        commands: &[serde_json::Value],
    ) -> Result<()> {
        let url = if let Some(guild) = guild_id {
            format!(
                "{}/applications/{application_id}/guilds/{guild}/commands",
                self.api_base
            )
        } else {
            format!("{}/applications/{application_id}/commands", self.api_base)
        };

        let _response = self
            .request(Method::PUT, &url, Some(json!(commands)))
            .await
            .context("register Discord application commands")?;
        Ok(())
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let route = route_key(url);
        if let Some(wait) = self.limits.delay(&route, unix_now()).await {
            tracing::debug!("Discord route {route} exhausted; waiting {wait:?}");
            tokio::time::sleep(wait).await;
        }

        let mut builder = self
            .client
            .request(method.clone(), url)
            .header("Authorization", format!("Bot {}", self.bot_token));
        if let Some(payload) = body {
            builder = builder.json(&payload);
        }

        // Interaction tokens are path segments: report the route, never the URL.
        let response = builder
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("send Discord request {method} {route}"))?;

        self.limits.observe(&route, response.headers()).await;
        let status = response.status();

        if status.as_u16() == 429 {
            let headers = response.headers();
            let global = headers
                .get("X-RateLimit-Global")
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.eq_ignore_ascii_case("true"));
            let retry_after = retry_after(headers).unwrap_or(Duration::from_secs(1));
            self.limits.block(&route, global, retry_after).await;
            anyhow::bail!(
                "Discord request {method} {route} rate limited (retry after {:.2}s)",
                retry_after.as_secs_f64()
            );
        }

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|error| format!("<failed to read response body: {error}>"));
            anyhow::bail!("Discord request {method} {route} failed ({status}): {text}");
        }

        Ok(response)
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let seconds = header_value::<f64>(headers, "Retry-After")?;
    Some(bounded_wait(seconds))
}

/// Route template used as the bucket key: numeric ids collapse to `{id}`
/// and interaction tokens to `{token}`.
fn route_key(url: &str) -> String {
    let path = reqwest::Url::parse(url)
        .map_or_else(|_| url.to_string(), |parsed| parsed.path().to_string());
    let path = path
        .find("/api/v")
        .and_then(|start| {
            let rest = &path[start + "/api/v".len()..];
            rest.find('/').map(|slash| rest[slash..].to_string())
        })
        .unwrap_or(path);

    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    let mut key = String::new();
    for (index, segment) in segments.iter().enumerate() {
        let token_position =
            index >= 2 && matches!(segments[index - 2], "interactions" | "webhooks");
        key.push('/');
        if segment.bytes().all(|byte| byte.is_ascii_digit()) {
            key.push_str("{id}");
        } else if token_position {
            key.push_str("{token}");
        } else {
            key.push_str(segment);
        }
    }
    key
}
