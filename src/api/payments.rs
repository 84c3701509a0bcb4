use serde_json::{Value, json};

use super::{ApiClient, ApiError, Envelope};
use crate::common::types::PaymentInit;

impl ApiClient {
    /// Registers an order with the backend before the hosted checkout runs.
    pub async fn init_payment(
        &self,
        user_id: &str,
        product_name: &str,
        amount: i64,
    ) -> Result<PaymentInit, ApiError> {
        let raw: Value = self
            .post_json(
                "/v1/payments/init",
                &json!({
                    "userId": user_id,
                    "productName": product_name,
                    "amount": amount,
                }),
            )
            .await?;
        let payload = raw.get("result").cloned().unwrap_or(raw);
        serde_json::from_value(payload).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Settles the order with the identifiers the checkout redirect carries.
    pub async fn confirm_payment(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<(), ApiError> {
        let env: Envelope<Value> = self
            .post_json(
                "/v1/payments/confirm",
                &json!({
                    "paymentKey": payment_key,
                    "orderId": order_id,
                    "amount": amount,
                }),
            )
            .await?;
        env.ack()
    }

    pub async fn cancel_payment(&self, order_id: &str, reason: &str) -> Result<(), ApiError> {
        let env: Envelope<Value> = self
            .post_json(
                "/v1/payments/cancel",
                &json!({ "orderId": order_id, "cancelReason": reason }),
            )
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
    async fn init_returns_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payments/init"))
            .and(body_json(json!({
                "userId": "u1",
                "productName": "Tax session",
                "amount": 30000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "result": {"orderId": "ord-7", "amount": 30000}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        let init = client.init_payment("u1", "Tax session", 30000).await.unwrap();
        assert_eq!(init.order_id, "ord-7");
        assert_eq!(init.amount, 30000);
    }

    #[tokio::test]
    async fn confirm_sends_redirect_identifiers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payments/confirm"))
            .and(body_json(json!({
                "paymentKey": "pay-1",
                "orderId": "ord-7",
                "amount": 30000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"isSuccess": true})))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        client.confirm_payment("pay-1", "ord-7", 30000).await.unwrap();
    }
}
