use std::time::Duration;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calendar::format_date;
use crate::config::ApiConfig;
use crate::lecture::{Group, Lecture, User};
use crate::view::DateRange;

#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    group_id: i64,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct LecturesEnvelope {
    #[serde(default)]
    lectures: Vec<Lecture>,
}

#[derive(Debug, Deserialize)]
struct GroupsEnvelope {
    #[serde(default)]
    groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct GroupEnvelope {
    group: Group,
}

impl ApiClient {
    #[tracing::instrument(skip(cfg, token))]
    pub fn new(cfg: &ApiConfig, token: Option<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("failed to build http client")?;

        debug!(
            base_url = %cfg.base_url,
            has_token = token.is_some(),
            "constructed api client"
        );

        Ok(Self {
            base_url: cfg.base_url.clone(),
            http,
            token,
        })
    }

    #[tracing::instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> anyhow::Result<String> {
        let url = format!("{}/user/login", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .context("login rejected by backend")?;

        let auth: AuthResponse = response.json().context("failed decoding login response")?;
        info!(username, "logged in");
        Ok(auth.token)
    }

    #[tracing::instrument(skip(self, password))]
    pub fn register(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        group_id: i64,
    ) -> anyhow::Result<String> {
        let url = format!("{}/user/register", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&RegisterRequest {
                username,
                password,
                first_name,
                last_name,
                group_id,
            })
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .context("registration rejected by backend")?;

        let auth: AuthResponse = response
            .json()
            .context("failed decoding registration response")?;
        info!(username, group_id, "registered");
        Ok(auth.token)
    }

    #[tracing::instrument(skip(self))]
    pub fn current_user(&self) -> anyhow::Result<User> {
        self.get_json("/user", true)
            .context("failed fetching current user")
    }

    #[tracing::instrument(skip(self))]
    pub fn groups(&self) -> anyhow::Result<Vec<Group>> {
        let envelope: GroupsEnvelope = self
            .get_json("/group", false)
            .context("failed fetching groups")?;
        debug!(count = envelope.groups.len(), "fetched groups");
        Ok(envelope.groups)
    }

    #[tracing::instrument(skip(self))]
    pub fn group(&self, id: i64) -> anyhow::Result<Group> {
        let envelope: GroupEnvelope = self
            .get_json(&format!("/group/{id}"), false)
            .with_context(|| format!("failed fetching group {id}"))?;
        Ok(envelope.group)
    }

    #[tracing::instrument(skip(self))]
    pub fn lectures_for_date(
        &self,
        group_id: Option<i64>,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<Lecture>> {
        let envelope: LecturesEnvelope = self
            .get_json(&date_path(group_id, date), true)
            .context("failed fetching lectures for date")?;
        debug!(count = envelope.lectures.len(), "fetched lectures");
        Ok(envelope.lectures)
    }

    #[tracing::instrument(skip(self))]
    pub fn lectures_for_range(
        &self,
        group_id: Option<i64>,
        range: DateRange,
    ) -> anyhow::Result<Vec<Lecture>> {
        let envelope: LecturesEnvelope = self
            .get_json(&range_path(group_id, range), true)
            .context("failed fetching lectures for range")?;
        debug!(count = envelope.lectures.len(), "fetched lectures");
        Ok(envelope.lectures)
    }

    fn get_json<T>(&self, path: &str, authed: bool) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "issuing GET");

        let mut request = self.http.get(&url);
        if authed {
            let token = self
                .token
                .as_deref()
                .ok_or_else(|| anyhow!("not logged in; run `lectern login` first"))?;
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;

        response
            .json::<T>()
            .with_context(|| format!("failed decoding response from {url}"))
    }
}

pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    err.downcast_ref::<reqwest::Error>()
        .and_then(reqwest::Error::status)
        == Some(StatusCode::UNAUTHORIZED)
}

fn date_path(group_id: Option<i64>, date: NaiveDate) -> String {
    match group_id {
        Some(id) => format!("/lecture/{}/{}", id, format_date(date)),
        None => format!("/lecture/{}", format_date(date)),
    }
}

fn range_path(group_id: Option<i64>, range: DateRange) -> String {
    match group_id {
        Some(id) => format!(
            "/lecture/{}/range/{}/{}",
            id,
            format_date(range.from),
            format_date(range.to)
        ),
        None => format!(
            "/lecture/range/{}/{}",
            format_date(range.from),
            format_date(range.to)
        ),
    }
}
