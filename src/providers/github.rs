use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::cache::{CachedPage, ResponseCache};
use super::{RepoReader, RepoWriter};
use crate::config::EndpointConfig;
use crate::model::request::{
    IssueCommentRequest, IssueRequest, LabelRequest, MilestoneRequest, ProjectCardRequest,
    ProjectColumnRequest, ProjectRequest,
};
use crate::model::{Issue, Label, Milestone, Project, ProjectCard, ProjectColumn, Repository};

// Projects (classic) are still behind the inertia preview media type.
const PREVIEW_ACCEPT: &str = "application/vnd.github.inertia-preview+json";
const USER_AGENT: &str = concat!("migrate-repo/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: u32 = 100;

/// REST client for one hosting instance (github.com or an enterprise server).
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
    cache: Option<ResponseCache>,
}

impl GitHubClient {
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let token = endpoint.resolve_token()?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(endpoint.ignore_ssl_verification)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: endpoint.api_url.trim_end_matches('/').to_string(),
            token,
            cache: endpoint.cache_dir.as_ref().map(ResponseCache::new),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, PREVIEW_ACCEPT)
    }

    async fn get_page(&self, url: &str) -> Result<CachedPage> {
        if let Some(cache) = &self.cache {
            if let Some(page) = cache.get(url) {
                debug!(url, "served from response cache");
                return Ok(page);
            }
        }

        let resp = self
            .request(Method::GET, url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        let status = resp.status();
        let next = resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_link);
        let body = resp.text().await.with_context(|| format!("Failed to read body of {url}"))?;
        if !status.is_success() {
            bail!("GET {url} returned {status}: {body}");
        }

        let page = CachedPage { body, next };
        if let Some(cache) = &self.cache {
            cache.set(url, &page)?;
        }
        Ok(page)
    }

    async fn list_all<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<Vec<T>> {
        let mut next = Some(format!("{}?{query}per_page={PER_PAGE}", self.url(path)));
        let mut items = Vec::new();
        while let Some(url) = next {
            let page = self.get_page(&url).await?;
            let mut batch: Vec<T> = serde_json::from_str(&page.body)
                .with_context(|| format!("Failed to parse response of {url}"))?;
            items.append(&mut batch);
            next = page.next;
        }
        Ok(items)
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        let resp = self
            .request(method.clone(), &url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("{method} {url} failed"))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("{method} {url} returned {status}: {text}");
        }
        debug!(%method, url = %url, status = status.as_u16(), "request succeeded");
        Ok(())
    }
}

fn repo_path(repo: &Repository, rest: &str) -> String {
    format!("/repos/{}/{}{rest}", repo.owner, repo.name)
}

/// Extracts the `rel="next"` target from a `Link` header.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        if segments.any(|s| s.trim() == r#"rel="next""#) {
            Some(target.trim_start_matches('<').trim_end_matches('>').to_string())
        } else {
            None
        }
    })
}

#[async_trait]
impl RepoReader for GitHubClient {
    async fn list_milestones(&self, repo: &Repository) -> Result<Vec<Milestone>> {
        self.list_all(&repo_path(repo, "/milestones"), "state=all&").await
    }

    async fn list_labels(&self, repo: &Repository) -> Result<Vec<Label>> {
        self.list_all(&repo_path(repo, "/labels"), "").await
    }

    async fn list_issues(&self, repo: &Repository) -> Result<Vec<Issue>> {
        self.list_all(&repo_path(repo, "/issues"), "state=all&direction=asc&").await
    }

    async fn list_projects(&self, repo: &Repository) -> Result<Vec<Project>> {
        self.list_all(&repo_path(repo, "/projects"), "").await
    }

    async fn list_project_columns(&self, project_id: u64) -> Result<Vec<ProjectColumn>> {
        self.list_all(&format!("/projects/{project_id}/columns"), "").await
    }

    async fn list_project_cards(&self, column_id: u64) -> Result<Vec<ProjectCard>> {
        self.list_all(&format!("/projects/columns/{column_id}/cards"), "").await
    }
}

#[async_trait]
impl RepoWriter for GitHubClient {
    async fn create_milestone(&self, repo: &Repository, milestone: &MilestoneRequest) -> Result<()> {
        self.send(Method::POST, &repo_path(repo, "/milestones"), milestone).await
    }

    async fn update_milestone(
        &self,
        repo: &Repository,
        number: u64,
        milestone: &MilestoneRequest,
    ) -> Result<()> {
        self.send(Method::PATCH, &repo_path(repo, &format!("/milestones/{number}")), milestone)
            .await
    }

    async fn create_label(&self, repo: &Repository, label: &LabelRequest) -> Result<()> {
        self.send(Method::POST, &repo_path(repo, "/labels"), label).await
    }

    async fn update_label(&self, repo: &Repository, name: &str, label: &LabelRequest) -> Result<()> {
        let path = repo_path(repo, &format!("/labels/{}", urlencoding::encode(name)));
        self.send(Method::PATCH, &path, label).await
    }

    async fn create_issue(&self, repo: &Repository, issue: &IssueRequest) -> Result<()> {
        self.send(Method::POST, &repo_path(repo, "/issues"), issue).await
    }

    async fn update_issue(&self, repo: &Repository, number: u64, issue: &IssueRequest) -> Result<()> {
        self.send(Method::PATCH, &repo_path(repo, &format!("/issues/{number}")), issue)
            .await
    }

    async fn create_issue_comment(
        &self,
        repo: &Repository,
        number: u64,
        comment: &IssueCommentRequest,
    ) -> Result<()> {
        let path = repo_path(repo, &format!("/issues/{number}/comments"));
        self.send(Method::POST, &path, comment).await
    }

    async fn create_project(&self, repo: &Repository, project: &ProjectRequest) -> Result<()> {
        self.send(Method::POST, &repo_path(repo, "/projects"), project).await
    }

    async fn create_project_column(&self, project_id: u64, column: &ProjectColumnRequest) -> Result<()> {
        self.send(Method::POST, &format!("/projects/{project_id}/columns"), column)
            .await
    }

    async fn create_project_card(&self, column_id: u64, card: &ProjectCardRequest) -> Result<()> {
        self.send(Method::POST, &format!("/projects/columns/{column_id}/cards"), card)
            .await
    }
}
