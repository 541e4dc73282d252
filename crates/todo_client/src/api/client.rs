use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
    types::{
        Category, Credentials, ErrorBody, LoggedIn, Message, NewCategory, ProfileUpdate,
        Registered, Registration, Todo, TodoInput, User,
    },
};

/// Typed access to every endpoint of the todo board API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(ClientError::InvalidBaseUrl(config.base_url.clone()));
        }
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_todos(&self) -> ClientResult<Vec<Todo>> {
        self.json(self.http.get(self.url("/todos"))).await
    }

    pub async fn get_todo(&self, id: Uuid) -> ClientResult<Todo> {
        self.json(self.http.get(self.url(&format!("/todos/{id}")))).await
    }

    pub async fn create_todo(&self, input: &TodoInput) -> ClientResult<Todo> {
        self.json(self.http.post(self.url("/todos")).json(input)).await
    }

    pub async fn update_todo(&self, id: Uuid, input: &TodoInput) -> ClientResult<Todo> {
        self.json(self.http.put(self.url(&format!("/todos/{id}"))).json(input))
            .await
    }

    /// Returns the server's confirmation message.
    pub async fn delete_todo(&self, id: Uuid) -> ClientResult<String> {
        let message: Message = self
            .json(self.http.delete(self.url(&format!("/todos/{id}"))))
            .await?;
        Ok(message.message)
    }

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.json(self.http.get(self.url("/categories"))).await
    }

    pub async fn create_category(&self, category: &NewCategory) -> ClientResult<Category> {
        self.json(self.http.post(self.url("/categories")).json(category))
            .await
    }

    pub async fn delete_category(&self, id: Uuid) -> ClientResult<()> {
        self.empty(self.http.delete(self.url(&format!("/categories/{id}"))))
            .await
    }

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.json(self.http.get(self.url("/users"))).await
    }

    pub async fn get_user(&self, id: Uuid) -> ClientResult<User> {
        self.json(self.http.get(self.url(&format!("/users/{id}")))).await
    }

    /// Returns the id of the new user.
    pub async fn register(&self, registration: &Registration) -> ClientResult<Uuid> {
        let registered: Registered = self
            .json(self.http.post(self.url("/users/register")).json(registration))
            .await?;
        Ok(registered.user_id)
    }

    /// `identifier` may be a username or an email.
    pub async fn login(&self, identifier: &str, password: &str) -> ClientResult<User> {
        let credentials = Credentials {
            username: identifier,
            password,
        };
        let logged_in: LoggedIn = self
            .json(self.http.post(self.url("/users/login")).json(&credentials))
            .await?;
        Ok(logged_in.user)
    }

    pub async fn update_user(&self, id: Uuid, update: &ProfileUpdate) -> ClientResult<User> {
        self.json(self.http.put(self.url(&format!("/users/{id}"))).json(update))
            .await
    }

    pub async fn delete_user(&self, id: Uuid) -> ClientResult<()> {
        self.empty(self.http.delete(self.url(&format!("/users/{id}"))))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn empty(&self, request: RequestBuilder) -> ClientResult<()> {
        let response = request.send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    debug!(%url, status = status.as_u16(), %message, "api request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error)
        .ok()
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}
