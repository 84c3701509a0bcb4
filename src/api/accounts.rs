use serde_json::{Value, json};

use super::{ApiClient, ApiError, Envelope};
use crate::common::types::{Account, Transaction};

impl ApiClient {
    /// Links an external bank account by institution code and bank-side id.
    pub async fn link_account(&self, organization: &str, bank_id: &str) -> Result<(), ApiError> {
        let _: Value = self
            .post_json(
                "/v1/account/create",
                &json!({ "organization": organization, "id": bank_id }),
            )
            .await?;
        Ok(())
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, ApiError> {
        let env: Envelope<Vec<Account>> = self.get_json("/v1/account").await?;
        Ok(env.into_optional()?.unwrap_or_default())
    }

    /// Accounts linked by a specific user. POST with a body, for historical
    /// backend reasons.
    pub async fn user_accounts(&self, user_id: &str) -> Result<Vec<Account>, ApiError> {
        let env: Envelope<Vec<Account>> = self
            .post_json("/v1/account/user-account", &json!({ "userId": user_id }))
            .await?;
        Ok(env.into_optional()?.unwrap_or_default())
    }

    pub async fn all_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        let env: Envelope<Vec<Transaction>> = self.get_json("/v1/account/tran/all").await?;
        Ok(env.into_optional()?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn user_accounts_posts_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/account/user-account"))
            .and(body_json(json!({"userId": "u1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "result": [
                    {"accountId": 1, "organization": "0004", "isTransactionSync": true}
                ]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        let accounts = client.user_accounts("u1").await.unwrap();
        assert_eq!(accounts[0].organization.as_deref(), Some("0004"));
        assert_eq!(accounts[0].is_transaction_sync, Some(true));
    }
}
