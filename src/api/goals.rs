use serde_json::{Value, json};

use super::{ApiClient, ApiError, Envelope};
use crate::common::types::{GoalReport, UserGoal};

impl ApiClient {
    /// `None` until the user has saved a goal profile.
    pub async fn get_goal(&self) -> Result<Option<UserGoal>, ApiError> {
        let env: Envelope<UserGoal> = self.get_json("/v1/usergoal").await?;
        env.into_optional()
    }

    /// POST on first save, PATCH afterwards.
    pub async fn save_goal(&self, goal: &UserGoal, exists: bool) -> Result<(), ApiError> {
        let env: Envelope<Value> = if exists {
            self.patch_json("/v1/usergoal", goal).await?
        } else {
            self.post_json("/v1/usergoal", goal).await?
        };
        env.ack()
    }

    pub async fn goal_reports(&self) -> Result<Vec<GoalReport>, ApiError> {
        let env: Envelope<Vec<GoalReport>> = self.get_json("/v1/usergoal/report/all").await?;
        Ok(env.into_optional()?.unwrap_or_default())
    }

    /// Kicks off AI analysis; the result text comes back synchronously.
    pub async fn create_report(&self, question: &str) -> Result<GoalReport, ApiError> {
        let env: Envelope<GoalReport> = self
            .post_json("/v1/usergoal/report/create", &json!({ "question": question }))
            .await?;
        env.into_result()
    }

    pub async fn view_report(&self, report_id: &str) -> Result<GoalReport, ApiError> {
        let env: Envelope<GoalReport> = self
            .post_json("/v1/usergoal/report", &json!({ "reportId": report_id }))
            .await?;
        env.into_result()
    }

    pub async fn delete_report(&self, report_id: &str) -> Result<(), ApiError> {
        self.delete_query(
            "/v1/usergoal/report",
            &[("reportId", report_id.to_string())],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn unset_goal_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/usergoal"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"isSuccess": true, "result": null})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        assert!(client.get_goal().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_uses_patch_when_goal_exists() {
        let server = MockServer::start().await;
        let goal = UserGoal {
            age: Some(34),
            job: Some("engineer".to_string()),
            capital: Some(1_000_000),
            monthly_income: Some(400_000),
            fixed_expenses: Some(150_000),
        };
        Mock::given(method("PATCH"))
            .and(path("/v1/usergoal"))
            .and(body_json(serde_json::to_value(&goal).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"isSuccess": true})))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        client.save_goal(&goal, true).await.unwrap();
    }

    #[tokio::test]
    async fn create_report_returns_analysis() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/usergoal/report/create"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "result": {"reportId": 3, "resultReport": "Save 20% monthly."}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        let report = client.create_report("goal: house").await.unwrap();
        assert_eq!(report.result_report.as_deref(), Some("Save 20% monthly."));
    }
}
