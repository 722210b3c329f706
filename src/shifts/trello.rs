use std::future::Future;
use std::pin::Pin;

use reqwest::header::ACCEPT;

use super::source::TaskSource;
use super::types::{HostInfo, RawCard, RawMember};
use crate::config::TrelloConfig;
use crate::error::SourceError;

const CARD_FIELDS: &str = "id,name,due,idMembers";

/// Trello REST client. Credentials travel as query parameters, which is the
/// only scheme the API key/token pair supports, so transport errors are
/// stripped of their URL before they are surfaced.
pub struct TrelloClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_token: String,
}

impl TrelloClient {
    pub fn new(config: &TrelloConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_token: config.api_token.clone(),
        }
    }

    async fn get_json<T>(
        &self,
        resource: &str,
        path: &str,
        extra_query: &[(&str, &str)],
    ) -> Result<T, SourceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[("key", self.api_key.as_str()), ("token", self.api_token.as_str())])
            .query(extra_query)
            .send()
            .await
            .map_err(|error| SourceError::Request {
                resource: resource.to_string(),
                message: error.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|error| SourceError::Decode {
                resource: resource.to_string(),
                message: error.without_url().to_string(),
            })
    }
}

impl TaskSource for TrelloClient {
    fn name(&self) -> &str {
        "trello"
    }

    fn fetch_candidates<'a>(
        &'a self,
        list_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawCard>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let path = format!("/lists/{list_id}/cards");
            let cards: Vec<RawCard> = self
                .get_json("trello list cards", &path, &[("fields", CARD_FIELDS)])
                .await?;
            tracing::debug!("Trello: fetched {} cards from list {list_id}", cards.len());
            Ok(cards)
        })
    }

    fn fetch_host<'a>(
        &'a self,
        member_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<HostInfo, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let path = format!("/members/{member_id}");
            let member: RawMember = self
                .get_json("trello member", &path, &[("fields", "username")])
                .await?;
            Ok(HostInfo::from_member(member))
        })
    }
}
