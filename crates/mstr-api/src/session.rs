//! HTTP session against a MicroStrategy Library REST API.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, Error, Result};
use crate::models::{
    find_project, DatasetDefinition, DatasetResults, DssEnum, ObjectInfo, Project, SearchQuery,
    SearchResults,
};
use crate::token::AuthToken;

/// Header carrying the session token on every authenticated request.
pub const AUTH_TOKEN_HEADER: &str = "X-MSTR-AuthToken";

/// Header selecting the project a request runs against.
pub const PROJECT_ID_HEADER: &str = "X-MSTR-ProjectID";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default age after which a token is revalidated remotely.
pub const DEFAULT_TOKEN_LIFE: Duration = Duration::from_secs(300);

/// Standard (username/password) authentication.
const STANDARD_LOGIN_MODE: i32 = 1;

const PROJECT_ID_LENGTH: usize = 32;

/// Returns true if `id` looks like a project identifier (32 ASCII alphanumerics).
pub fn is_project_id(id: &str) -> bool {
    id.len() == PROJECT_ID_LENGTH && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Username and password for standard authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Builder for [`Session`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use mstr_api_rs::session::SessionBuilder;
///
/// let session = SessionBuilder::new("https://demo.example.com/MicroStrategyLibrary/api")
///     .request_timeout(Duration::from_secs(10))
///     .load_projects(false)
///     .build()
///     .unwrap();
/// assert_eq!(session.base_url(), "https://demo.example.com/MicroStrategyLibrary/api/");
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    base_url: String,
    request_timeout: Duration,
    token_life: Duration,
    load_projects: bool,
}

impl SessionBuilder {
    /// Starts a builder for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            token_life: DEFAULT_TOKEN_LIFE,
            load_projects: true,
        }
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets how old a token may get before `is_valid` asks the server.
    pub fn token_life(mut self, token_life: Duration) -> Self {
        self.token_life = token_life;
        self
    }

    /// Whether `open` also loads the active projects.
    pub fn load_projects(mut self, load: bool) -> Self {
        self.load_projects = load;
        self
    }

    pub fn build(self) -> Result<Session> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.request_timeout)
            .cookie_store(true)
            .build()?;

        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Session {
            http_client,
            base_url,
            auth_token: None,
            valid: false,
            username: None,
            projects: Vec::new(),
            current_project: None,
            token_life: self.token_life,
            load_projects: self.load_projects,
        })
    }
}

/// A logged-in connection to the server.
///
/// Calls are sequential: each request completes before the next is sent.
/// Every remote operation first goes through [`Session::is_valid`], so a
/// token older than the token life is revalidated before use.
pub struct Session {
    http_client: reqwest::Client,
    base_url: String,
    auth_token: Option<AuthToken>,
    valid: bool,
    username: Option<String>,
    projects: Vec<Project>,
    current_project: Option<Project>,
    token_life: Duration,
    load_projects: bool,
}

impl Session {
    /// Creates an unopened session with default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        SessionBuilder::new(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(base_url)
    }

    /// Returns the API root, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_token(&self) -> Option<&AuthToken> {
        self.auth_token.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Active projects loaded at `open`.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The project used when a call does not name one.
    pub fn current_project(&self) -> Option<&Project> {
        self.current_project.as_ref()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Logs in and, if configured, loads the active projects.
    ///
    /// On any failure the session is left not valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] when the server does not send a token and
    /// [`Error::InvalidToken`] when the token is too short.
    pub async fn open(&mut self, credentials: &Credentials) -> Result<()> {
        self.valid = false;
        self.auth_token = None;
        self.projects.clear();
        self.current_project = None;
        self.username = Some(credentials.username.clone());

        debug!(username = %credentials.username, url = %self.base_url, "Opening session");

        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
            "loginMode": STANDARD_LOGIN_MODE,
        });
        let response = self
            .http_client
            .post(self.url("auth/login"))
            .json(&body)
            .send()
            .await?;
        info!(status = response.status().as_u16(), "Login response");

        if !response.status().is_success() {
            return Err(parse_error_response(response).await);
        }

        let token = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                error!("{} missing from login response", AUTH_TOKEN_HEADER);
                Error::Auth {
                    message: format!("{} missing from login response", AUTH_TOKEN_HEADER),
                }
            })?;
        self.auth_token = Some(AuthToken::new(token)?);
        self.valid = true;

        if self.load_projects {
            match self.list_projects().await {
                Ok(projects) => self.projects = projects,
                Err(e) => {
                    self.valid = false;
                    self.auth_token = None;
                    return Err(e);
                }
            }
        }

        debug!(username = %credentials.username, projects = self.projects.len(), "Session opened");
        Ok(())
    }

    /// Logs out. Closing a session that is not open does nothing.
    ///
    /// A session already found expired by [`Session::is_valid`] only drops
    /// its token. The local token is dropped even when the logout request
    /// fails.
    pub async fn close(&mut self) -> Result<()> {
        if self.auth_token.is_none() {
            debug!("Close requested on a session that is not open");
            return Ok(());
        }
        if !self.valid {
            debug!(username = ?self.username, "Dropping token of an expired session");
            self.auth_token = None;
            return Ok(());
        }

        let result = match self.request(Method::POST, "auth/logout", None) {
            Ok(request) => self.send(request).await.map(|_| ()),
            Err(e) => Err(e),
        };
        self.valid = false;
        self.auth_token = None;
        debug!(username = ?self.username, "Session closed");
        result
    }

    /// Reports whether the session can be used.
    ///
    /// The cached flag is trusted until the token is older than the token
    /// life; after that `GET sessions` is asked. A 2xx answer refreshes the
    /// token, anything else marks the session not valid.
    ///
    /// # Errors
    ///
    /// Only transport failures are errors.
    pub async fn is_valid(&mut self) -> Result<bool> {
        let Some(token) = self.auth_token.as_ref() else {
            return Ok(false);
        };
        if !self.valid {
            return Ok(false);
        }

        let age = token.valid_for().to_std().unwrap_or_default();
        if age <= self.token_life {
            return Ok(true);
        }

        debug!(age_secs = age.as_secs(), "Revalidating session token");
        let response = self
            .http_client
            .get(self.url("sessions"))
            .header(AUTH_TOKEN_HEADER, token.as_str())
            .send()
            .await?;

        if response.status().is_success() {
            if let Some(token) = self.auth_token.as_mut() {
                token.validate();
            }
        } else {
            let err = parse_error_response(response).await;
            warn!(error = %err, "Session is no longer valid");
            self.valid = false;
        }
        Ok(self.valid)
    }

    /// Fails with [`Error::InvalidSession`] unless [`Session::is_valid`] holds.
    async fn ensure_valid(&mut self) -> Result<()> {
        if self.is_valid().await? {
            Ok(())
        } else {
            Err(Error::InvalidSession)
        }
    }

    /// Fetches the active projects (`status == 0`) visible to the user.
    pub async fn list_projects(&mut self) -> Result<Vec<Project>> {
        self.ensure_valid().await?;
        let request = self.request(Method::GET, "projects", None)?;
        let json = self.send(request).await?;
        let projects: Vec<Project> = serde_json::from_value(json)?;
        Ok(projects.into_iter().filter(Project::is_active).collect())
    }

    /// Finds a loaded project by ID, non-empty alias, or name, in that order.
    pub fn search_for_project(&self, identifier: &str) -> Option<&Project> {
        find_project(&self.projects, identifier)
    }

    /// Makes the matching project the default; a miss clears the default.
    pub fn set_default_project(&mut self, identifier: &str) -> Option<&Project> {
        self.current_project = self.search_for_project(identifier).cloned();
        match &self.current_project {
            Some(p) => debug!(project_id = %p.id, "Default project set"),
            None => warn!(identifier, "No project matches"),
        }
        self.current_project.as_ref()
    }

    /// Fetches the metadata of `object`, keyed by its id and type.
    pub async fn get_object_information(
        &mut self,
        object: &ObjectInfo,
        project_id: Option<&str>,
    ) -> Result<ObjectInfo> {
        self.ensure_valid().await?;
        let endpoint = format!("objects/{}", object.id);
        let mut request = self.request(Method::GET, &endpoint, project_id)?;
        if let Some(object_type) = object.object_type {
            request = request.query(&[("type", object_type.value())]);
        }

        let json = self.send(request).await?;
        let mut info = object.clone();
        info.update(&json)?;
        Ok(info)
    }

    /// Fetches the attributes and metrics of a report or cube.
    pub async fn get_dataset_definition(
        &mut self,
        object: &ObjectInfo,
        project_id: Option<&str>,
    ) -> Result<DatasetDefinition> {
        self.ensure_valid().await?;
        let endpoint = format!("{}/{}", dataset_kind(object), object.id);
        let request = self.request(Method::GET, &endpoint, project_id)?;
        let json = self.send(request).await?;
        DatasetDefinition::from_json(&json)
    }

    /// Runs a quick search.
    pub async fn search(
        &mut self,
        query: &SearchQuery,
        project_id: Option<&str>,
    ) -> Result<SearchResults> {
        self.ensure_valid().await?;
        let request = self
            .request(Method::GET, "searches/results", project_id)?
            .query(&query.to_query_pairs());
        let json = self.send(request).await?;
        SearchResults::from_json(&json)
    }

    /// Creates an instance of a report or cube and returns its rows.
    ///
    /// `body` is sent as-is, typically `{"viewFilter": ...}`.
    pub async fn create_instance(
        &mut self,
        object: &ObjectInfo,
        body: Option<&Value>,
        project_id: Option<&str>,
    ) -> Result<DatasetResults> {
        self.ensure_valid().await?;
        let endpoint = format!("{}/{}/instances", dataset_kind(object), object.id);
        let mut request = self.request(Method::POST, &endpoint, project_id)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        let json = self.send(request).await?;
        DatasetResults::from_json(&json)
    }

    /// Project header value for a call: the explicit id, else the default project.
    fn project_header(&self, project_id: Option<&str>) -> Option<String> {
        let id = project_id
            .map(str::to_string)
            .or_else(|| self.current_project.as_ref().map(|p| p.id.clone()))?;
        if is_project_id(&id) {
            Some(id)
        } else {
            debug!(project_id = %id, "Ignoring malformed project id");
            None
        }
    }

    /// Starts an authenticated request.
    fn request(
        &self,
        method: Method,
        endpoint: &str,
        project_id: Option<&str>,
    ) -> Result<RequestBuilder> {
        let token = self
            .auth_token
            .as_ref()
            .filter(|_| self.valid)
            .ok_or(Error::InvalidSession)?;

        let url = self.url(endpoint);
        debug!(%method, %url, "Sending request");
        let mut request = self
            .http_client
            .request(method, url)
            .header(AUTH_TOKEN_HEADER, token.as_str());
        if let Some(id) = self.project_header(project_id) {
            request = request.header(PROJECT_ID_HEADER, id);
        }
        Ok(request)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        handle_response(response).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("auth_token", &self.auth_token)
            .field("valid", &self.valid)
            .field("projects", &self.projects.len())
            .field("current_project", &self.current_project.as_ref().map(|p| &p.id))
            .finish()
    }
}

/// Reports and cubes live under different endpoints.
fn dataset_kind(object: &ObjectInfo) -> &'static str {
    match object.subtype {
        Some(subtype) if subtype.is_cube() => "cubes",
        _ => "reports",
    }
}

/// Decodes a 2xx body; an empty body becomes `null`.
async fn handle_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    info!(status = status.as_u16(), "Response");

    if !status.is_success() {
        return Err(parse_error_response(response).await);
    }

    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

async fn parse_error_response(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let api_error = ApiError::from_response(status, &body);

    if let ApiError::Http {
        code, iserver_code, ..
    } = &api_error
    {
        error!(status, code = ?code, iserver_code = ?iserver_code, "{}", api_error);
    } else {
        error!(status, "{}", api_error);
    }
    Error::Api(api_error)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
