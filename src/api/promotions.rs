use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, ApiError, Envelope};
use crate::common::types::{Paged, Participation, Promotion, PromotionLiveStatus, Winner};

/// Lifecycle transition requested by an administrator. The backend owns the
/// actual state machine; this only names the endpoint suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionAction {
    Start,
    End,
}

impl PromotionAction {
    fn as_path(&self) -> &'static str {
        match self {
            PromotionAction::Start => "start",
            PromotionAction::End => "end",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionRequest {
    pub name: String,
    pub point_amount: i64,
    pub total_stock: i64,
    pub start_time: String,
    pub end_time: String,
}

impl ApiClient {
    pub async fn list_promotions(
        &self,
        status: Option<&str>,
        page: usize,
        size: usize,
    ) -> Result<Paged<Promotion>, ApiError> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        query.push(("page", page.to_string()));
        query.push(("size", size.to_string()));
        let env: Envelope<Paged<Promotion>> = self.get_query("/v1/promotions", &query).await?;
        env.into_result()
    }

    pub async fn create_promotion(&self, req: &CreatePromotionRequest) -> Result<(), ApiError> {
        let env: Envelope<Value> = self.post_json("/v1/promotions", req).await?;
        env.ack()
    }

    pub async fn join_promotion(&self, promotion_id: &str) -> Result<(), ApiError> {
        let env: Envelope<Value> = self
            .post_empty(&format!("/v1/promotions/{promotion_id}/join"))
            .await?;
        env.ack()
    }

    /// The caller's participation outcome; `None` when they have not joined
    /// (the backend answers 404).
    pub async fn participation(
        &self,
        promotion_id: &str,
    ) -> Result<Option<Participation>, ApiError> {
        let result: Result<Envelope<Participation>, ApiError> = self
            .get_json(&format!("/v1/promotions/{promotion_id}/participations"))
            .await;
        match result {
            Ok(env) => env.into_optional(),
            Err(ApiError::Status(code)) if code == reqwest::StatusCode::NOT_FOUND => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn promotion_status(
        &self,
        promotion_id: &str,
    ) -> Result<PromotionLiveStatus, ApiError> {
        let env: Envelope<PromotionLiveStatus> = self
            .get_json(&format!("/v1/promotions/{promotion_id}/status"))
            .await?;
        env.into_result()
    }

    pub async fn promotion_winners(&self, promotion_id: &str) -> Result<Vec<Winner>, ApiError> {
        let env: Envelope<Vec<Winner>> = self
            .get_json(&format!("/v1/promotions/{promotion_id}/winners"))
            .await?;
        env.into_result()
    }

    pub async fn transition_promotion(
        &self,
        promotion_id: &str,
        action: PromotionAction,
    ) -> Result<(), ApiError> {
        let env: Envelope<Value> = self
            .post_empty(&format!("/v1/promotions/{promotion_id}/{}", action.as_path()))
            .await?;
        env.ack()
    }

    /// Asks the backend to push its monitoring report to the ops channel.
    pub async fn send_manual_report(&self) -> Result<(), ApiError> {
        let env: Envelope<Value> = self
            .post_empty("/v1/promotions/monitoring/report/manual")
            .await?;
        env.ack()
    }

    pub async fn send_monitoring_test(&self) -> Result<(), ApiError> {
        let env: Envelope<Value> = self
            .post_empty("/v1/promotions/test/monitoring/test-slack-only")
            .await?;
        env.ack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Some("tkn".to_string()))
    }

    #[tokio::test]
    async fn list_promotions_decodes_paged_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/promotions"))
            .and(query_param("status", "ACTIVE"))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "result": {
                    "content": [
                        {"id": 1, "name": "Draw", "pointAmount": 100, "totalStock": 10, "status": "ACTIVE"}
                    ],
                    "totalElements": 1
                }
            })))
            .mount(&server)
            .await;

        let page = client(&server)
            .list_promotions(Some("ACTIVE"), 0, 20)
            .await
            .unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, Some(1));
    }

    #[tokio::test]
    async fn join_failure_surfaces_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/promotions/9/join"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": false,
                "message": "promotion has ended"
            })))
            .mount(&server)
            .await;

        match client(&server).join_promotion("9").await {
            Err(ApiError::Backend(msg)) => assert_eq!(msg, "promotion has ended"),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn participation_404_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/promotions/9/participations"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(client(&server).participation("9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn transition_hits_action_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/promotions/3/end"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"isSuccess": true})))
            .mount(&server)
            .await;

        client(&server)
            .transition_promotion("3", PromotionAction::End)
            .await
            .unwrap();
    }
}
