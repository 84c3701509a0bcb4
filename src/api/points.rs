use super::{ApiClient, ApiError, Envelope};
use crate::common::types::{PointHistory, PointSummary};

impl ApiClient {
    pub async fn point_summary(&self, user_id: &str) -> Result<PointSummary, ApiError> {
        let env: Envelope<PointSummary> = self
            .get_json(&format!("/v1/points/users/{user_id}/summary"))
            .await?;
        env.into_result()
    }

    pub async fn point_history(&self, user_id: &str) -> Result<Vec<PointHistory>, ApiError> {
        let env: Envelope<Vec<PointHistory>> = self
            .get_json(&format!("/v1/points/users/{user_id}/history"))
            .await?;
        Ok(env.into_optional()?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn summary_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/points/users/u1/summary"))
            .and(header("Authorization", "Bearer tkn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "result": {"userId": "u1", "totalPoints": 1500, "earnedCount": 3}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        let summary = client.point_summary("u1").await.unwrap();
        assert_eq!(summary.total_points, 1500);
    }

    #[tokio::test]
    async fn history_tolerates_array_timestamps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/points/users/u1/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "result": [{
                    "pointId": 4,
                    "promotionName": "Draw",
                    "amount": 500,
                    "earnedAt": [2025, 5, 3, 10, 0, 0]
                }]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        let history = client.point_history("u1").await.unwrap();
        assert_eq!(history[0].amount, 500);
        assert!(history[0].earned_at.as_ref().unwrap().to_datetime().is_some());
    }
}
