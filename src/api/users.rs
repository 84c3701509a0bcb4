use serde_json::{Value, json};

use super::{ApiClient, ApiError, Envelope};
use crate::common::types::{LoginResult, Paged, UserProfile};

impl ApiClient {
    /// Works on an anonymous client; the token comes out of the result.
    pub async fn login(&self, user_name: &str, password: &str) -> Result<LoginResult, ApiError> {
        let env: Envelope<LoginResult> = self
            .post_json(
                "/v1/user/auth/login",
                &json!({ "userName": user_name, "password": password }),
            )
            .await?;
        env.into_result()
    }

    pub async fn signup(
        &self,
        user_name: &str,
        password: &str,
        name: &str,
    ) -> Result<(), ApiError> {
        let env: Envelope<Value> = self
            .post_json(
                "/v1/user/auth/signup",
                &json!({
                    "userName": user_name,
                    "password": password,
                    "name": name,
                    "slackId": "",
                }),
            )
            .await?;
        env.ack()
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let _: Value = self.post_empty("/v1/user/auth/logout").await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        let env: Envelope<UserProfile> = self.get_json("/v1/user/me").await?;
        env.into_result()
    }

    pub async fn apply_advisor(&self) -> Result<(), ApiError> {
        let env: Envelope<Value> = self.post_empty("/v1/user/me/advisor/apply").await?;
        env.ack()
    }

    /// Directory of all platform users (admin scope); used to start direct
    /// chats.
    pub async fn admin_users(&self) -> Result<Vec<UserProfile>, ApiError> {
        let env: Envelope<Paged<UserProfile>> = self.get_json("/v1/user/admin/users/").await?;
        Ok(env.into_result()?.content)
    }

    pub async fn pending_advisors(&self) -> Result<Vec<UserProfile>, ApiError> {
        let env: Envelope<Vec<UserProfile>> = self.get_json("/v1/user/advisor/pending").await?;
        Ok(env.into_optional()?.unwrap_or_default())
    }

    pub async fn approve_advisor(&self, user_id: &str) -> Result<(), ApiError> {
        let env: Envelope<Value> = self
            .post_empty(&format!("/v1/user/advisor/{user_id}/approve"))
            .await?;
        env.ack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn login_needs_no_bearer_and_returns_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/user/auth/login"))
            .and(body_json(json!({"userName": "a@b.c", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "result": {
                    "accessToken": "tok-1",
                    "roles": "USER",
                    "name": "Jun",
                    "userId": 12
                }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::anonymous(&server.uri());
        let login = client.login("a@b.c", "pw").await.unwrap();
        assert_eq!(login.access_token.as_deref(), Some("tok-1"));
        assert_eq!(login.user_id.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn admin_users_unwraps_page_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/user/admin/users/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "result": {"content": [{"userId": 1, "name": "A", "role": "USER"}]}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        let users = client.admin_users().await.unwrap();
        assert_eq!(users[0].name.as_deref(), Some("A"));
    }
}
