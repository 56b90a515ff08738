//! Platform REST API Client
//!
//! One method per endpoint. Every call takes the bearer token explicitly;
//! the client itself holds no session.

use crate::api::dto::{Credentials, LoginResponse};
use crate::api::error::ApiResult;
use crate::api::transport::{ApiRequest, HttpTransport, Transport};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Platform API client
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a client over an arbitrary transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a client talking HTTP to `base_url`
    pub fn http(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let transport = HttpTransport::new(base_url, timeout)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// POST /api/user/login
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let body = serde_json::to_value(credentials)?;
        let value = self
            .transport
            .execute(ApiRequest::post("/api/user/login").json(body))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST /api/user/register
    pub async fn register(&self, user: Value) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::post("/api/user/register").json(user))
            .await
    }

    /// GET /api/user/profile
    pub async fn get_profile(&self, token: Option<&str>) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::get("/api/user/profile").bearer(token))
            .await
    }

    /// PUT /api/user/profile
    pub async fn update_profile(&self, token: Option<&str>, body: Value) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::put("/api/user/profile").json(body).bearer(token))
            .await
    }

    /// GET /api/user/my-teams
    pub async fn get_my_teams(&self, token: Option<&str>) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::get("/api/user/my-teams").bearer(token))
            .await
    }

    /// POST /api/user/teams
    pub async fn create_team(&self, token: Option<&str>, body: Value) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::post("/api/user/teams").json(body).bearer(token))
            .await
    }

    /// GET /api/user/teams/{team}
    pub async fn get_team_members(&self, token: Option<&str>, team_name: &str) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::get(team_path(team_name)).bearer(token))
            .await
    }

    /// PUT /api/user/teams/{team}
    pub async fn add_team_member(
        &self,
        token: Option<&str>,
        team_name: &str,
        body: Value,
    ) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::put(team_path(team_name)).json(body).bearer(token))
            .await
    }

    /// DELETE /api/user/teams/{team}
    pub async fn leave_team(&self, token: Option<&str>, team_name: &str) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::delete(team_path(team_name)).bearer(token))
            .await
    }

    /// GET /api/user/teams/{team}/artifacts
    pub async fn get_team_artifacts(
        &self,
        token: Option<&str>,
        team_name: &str,
    ) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::get(artifacts_path(team_name)).bearer(token))
            .await
    }

    /// GET /api/jury/teams/review-pending
    pub async fn get_pending_reviews(&self, token: Option<&str>) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::get("/api/jury/teams/review-pending").bearer(token))
            .await
    }

    /// GET /api/jury/teams/reviewed
    pub async fn get_reviewed_teams(&self, token: Option<&str>) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::get("/api/jury/teams/reviewed").bearer(token))
            .await
    }

    /// GET /api/jury/teams/{team}/artifacts
    pub async fn get_review_artifacts(
        &self,
        token: Option<&str>,
        team_name: &str,
    ) -> ApiResult<Value> {
        let path = format!("/api/jury/teams/{}/artifacts", urlencoding::encode(team_name));
        self.transport
            .execute(ApiRequest::get(path).bearer(token))
            .await
    }

    /// POST /api/jury/teams/review/{team}
    pub async fn submit_review(
        &self,
        token: Option<&str>,
        team_name: &str,
        body: Value,
    ) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::post(review_path(team_name)).json(body).bearer(token))
            .await
    }

    /// PUT /api/jury/teams/review/{team}
    pub async fn update_review(
        &self,
        token: Option<&str>,
        team_name: &str,
        body: Value,
    ) -> ApiResult<Value> {
        self.transport
            .execute(ApiRequest::put(review_path(team_name)).json(body).bearer(token))
            .await
    }

    /// PUT /api/user/teams/{team}/artifacts
    pub async fn update_team_artifacts(
        &self,
        token: Option<&str>,
        team_name: &str,
        body: Value,
    ) -> ApiResult<Value> {
        self.transport
            .execute(
                ApiRequest::put(artifacts_path(team_name))
                    .json(body)
                    .bearer(token),
            )
            .await
    }
}

fn team_path(team_name: &str) -> String {
    format!("/api/user/teams/{}", urlencoding::encode(team_name))
}

fn review_path(team_name: &str) -> String {
    format!("/api/jury/teams/review/{}", urlencoding::encode(team_name))
}

fn artifacts_path(team_name: &str) -> String {
    format!("{}/artifacts", team_path(team_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records requests and answers each with a login token
    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<ApiRequest>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
            self.requests.lock().unwrap().push(request);
            Ok(json!({"access_token": "jwt"}))
        }
    }

    fn recorder_client() -> (ApiClient, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (ApiClient::new(recorder.clone()), recorder)
    }

    #[test]
    fn test_team_paths_are_encoded() {
        assert_eq!(team_path("red team"), "/api/user/teams/red%20team");
        assert_eq!(
            artifacts_path("a/b"),
            "/api/user/teams/a%2Fb/artifacts"
        );
    }

    #[tokio::test]
    async fn test_profile_request_carries_token() {
        let (client, recorder) = recorder_client();
        client.get_profile(Some("abc")).await.unwrap();

        let requests = recorder.requests.lock().unwrap();
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].path, "/api/user/profile");
        assert_eq!(requests[0].bearer.as_deref(), Some("abc"));
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn test_team_write_endpoints() {
        let (client, recorder) = recorder_client();

        client
            .add_team_member(Some("t"), "alpha", json!({"username": "bob"}))
            .await
            .unwrap();
        client
            .update_team_artifacts(Some("t"), "alpha", json!({"github_url": "x"}))
            .await
            .unwrap();
        client.leave_team(Some("t"), "alpha").await.unwrap();
        client
            .create_team(Some("t"), json!({"team_name": "alpha"}))
            .await
            .unwrap();

        let requests = recorder.requests.lock().unwrap();
        let seen: Vec<(Method, &str)> = requests
            .iter()
            .map(|r| (r.method.clone(), r.path.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (Method::PUT, "/api/user/teams/alpha"),
                (Method::PUT, "/api/user/teams/alpha/artifacts"),
                (Method::DELETE, "/api/user/teams/alpha"),
                (Method::POST, "/api/user/teams"),
            ]
        );
    }

    #[tokio::test]
    async fn test_jury_endpoints() {
        let (client, recorder) = recorder_client();

        client.get_pending_reviews(Some("j")).await.unwrap();
        client.get_reviewed_teams(Some("j")).await.unwrap();
        client.get_review_artifacts(Some("j"), "red team").await.unwrap();
        client
            .submit_review(Some("j"), "alpha", json!({"criterion_1": 5}))
            .await
            .unwrap();
        client
            .update_review(Some("j"), "alpha", json!({"criterion_1": 6}))
            .await
            .unwrap();

        let requests = recorder.requests.lock().unwrap();
        let seen: Vec<(Method, &str)> = requests
            .iter()
            .map(|r| (r.method.clone(), r.path.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (Method::GET, "/api/jury/teams/review-pending"),
                (Method::GET, "/api/jury/teams/reviewed"),
                (Method::GET, "/api/jury/teams/red%20team/artifacts"),
                (Method::POST, "/api/jury/teams/review/alpha"),
                (Method::PUT, "/api/jury/teams/review/alpha"),
            ]
        );
        assert!(requests.iter().all(|r| r.bearer.as_deref() == Some("j")));
    }

    #[tokio::test]
    async fn test_login_is_anonymous() {
        let (client, recorder) = recorder_client();
        let resp = client
            .login(&Credentials {
                username: "@alice".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(resp.access_token, "jwt");
        let requests = recorder.requests.lock().unwrap();
        assert_eq!(requests[0].bearer, None);
        assert_eq!(
            requests[0].body,
            Some(json!({"username": "@alice", "password": "pw"}))
        );
    }
}
