use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        models::{AuthResponse, ChangePasswordRequest, LoginRequest, UpdateProfileRequest, User},
        session::AuthSession,
    },
    client::error::ApiClientError,
    config::config::AppConfig,
    quiz::{
        backend::QuizBackend,
        models::{
            MyQuizResult, PagedResponse, Quiz, QuizFinishResponse, QuizSubmission, SortOrder,
            StartQuizBody, StartedQuiz,
        },
    },
};

static LOGIN_URI: &str = "auth/login";
static PROFILE_URI: &str = "users/profile";

/// Client for the LMS REST API. Attaches the bearer token held by the shared
/// `AuthSession` and clears it when the server answers 401.
#[derive(Debug, Clone)]
pub struct LmsClient {
    base_url: String,
    client: Client,
    auth: AuthSession,
}

impl LmsClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        auth: AuthSession,
    ) -> Result<Self, ApiClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            client,
            auth,
        })
    }

    pub fn from_config(config: &AppConfig, auth: AuthSession) -> Result<Self, ApiClientError> {
        Self::new(&config.api.base_url, config.api.timeout(), auth)
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    /* Auth */

    pub async fn login(&self, request: &LoginRequest) -> Result<User, ApiClientError> {
        let response: AuthResponse = self.post_json(LOGIN_URI, request).await?;
        let user = response.user.clone();
        self.auth.set(response)?;
        Ok(user)
    }

    pub async fn get_profile(&self) -> Result<User, ApiClientError> {
        let user: User = self.get_json(PROFILE_URI).await?;
        self.auth.set_user(user.clone())?;
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<User, ApiClientError> {
        let user: User = self.put_json(PROFILE_URI, request).await?;
        self.auth.set_user(user.clone())?;
        Ok(user)
    }

    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<(), ApiClientError> {
        let uri = "users/change-password";
        let request = self.client.put(self.url(uri)).json(request);
        self.send(request, uri).await?;
        Ok(())
    }

    /* Quizzes */

    pub async fn get_quizzes(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<PagedResponse<Quiz>, ApiClientError> {
        self.get_json(&format!("quiz?page={}&pageSize={}", page, page_size))
            .await
    }

    pub async fn get_quiz(&self, quiz_id: Uuid) -> Result<Quiz, ApiClientError> {
        self.get_json(&format!("quiz/{}", quiz_id)).await
    }

    pub async fn start_quiz(&self, quiz_id: Uuid) -> Result<StartedQuiz, ApiClientError> {
        let body: StartQuizBody = self.get_json(&format!("quiz/{}/start", quiz_id)).await?;
        Ok(body.into())
    }

    pub async fn finish_quiz(
        &self,
        submission: &QuizSubmission,
    ) -> Result<QuizFinishResponse, ApiClientError> {
        self.post_json("quiz/finish", submission).await
    }

    pub async fn get_my_quiz_results(
        &self,
        quiz_id: Uuid,
        page: u32,
        page_size: u32,
        sort: SortOrder,
    ) -> Result<PagedResponse<MyQuizResult>, ApiClientError> {
        let uri = format!(
            "quiz/my-quiz-result?page={}&pageSize={}&sortBy={}&quizId={}",
            page, page_size, sort, quiz_id
        );
        self.get_json(&uri).await
    }

    /* Transport */

    async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> Result<T, ApiClientError> {
        let request = self.client.get(self.url(uri));
        let body = self.send(request, uri).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        uri: &str,
        body: &B,
    ) -> Result<T, ApiClientError> {
        let request = self
            .client
            .post(self.url(uri))
            .header("content-type", "application/json")
            .json(body);
        let body = self.send(request, uri).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        uri: &str,
        body: &B,
    ) -> Result<T, ApiClientError> {
        let request = self.client.put(self.url(uri)).json(body);
        let body = self.send(request, uri).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send(&self, request: RequestBuilder, uri: &str) -> Result<String, ApiClientError> {
        info!("LmsClient sending request to: {}", uri);
        let request = match self.auth.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or("No body".into());

        if status == StatusCode::UNAUTHORIZED && uri != LOGIN_URI {
            warn!("LmsClient request unauthorized, clearing auth session: {}", uri);
            self.auth.clear();
            return Err(ApiClientError::Unauthorized(body));
        }

        if !status.is_success() {
            error!("LmsClient request failed: {} - {}", status, body);
            return Err(ApiClientError::ApiError(status, body));
        }

        debug!("LmsClient received {} bytes from {}", body.len(), uri);
        Ok(body)
    }

    fn url(&self, uri: &str) -> String {
        format!("{}/{}", self.base_url, uri.trim_start_matches('/'))
    }
}

#[async_trait]
impl QuizBackend for LmsClient {
    async fn start_quiz(&self, quiz_id: Uuid) -> Result<StartedQuiz, ApiClientError> {
        LmsClient::start_quiz(self, quiz_id).await
    }

    async fn finish_quiz(
        &self,
        submission: &QuizSubmission,
    ) -> Result<QuizFinishResponse, ApiClientError> {
        LmsClient::finish_quiz(self, submission).await
    }
}
