use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, ApiError};
use crate::common::types::{Product, Reservation};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_name: String,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateProductRequest {
    pub fn new(product_name: &str, price: i64, description: &str) -> Self {
        Self {
            product_name: product_name.to_string(),
            price,
            start_time: None,
            end_time: None,
            description: if description.trim().is_empty() {
                None
            } else {
                Some(description.to_string())
            },
        }
    }
}

/// Product/reservation endpoints predate the envelope convention and answer
/// either a bare array or `{result}`.
fn lenient_list<T: serde::de::DeserializeOwned>(raw: Value) -> Vec<T> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("result") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}

impl ApiClient {
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let raw: Value = self.get_json("/v1/products").await?;
        Ok(lenient_list(raw))
    }

    pub async fn create_product(&self, req: &CreateProductRequest) -> Result<(), ApiError> {
        let _: Value = self.post_json("/v1/products", req).await?;
        Ok(())
    }

    pub async fn user_reservations(&self, user_id: &str) -> Result<Vec<Reservation>, ApiError> {
        let raw: Value = self
            .get_json(&format!("/v1/reservations/users/{user_id}"))
            .await?;
        Ok(lenient_list(raw))
    }

    pub async fn advisor_reservations(&self, user_id: &str) -> Result<Vec<Reservation>, ApiError> {
        let raw: Value = self
            .get_json(&format!("/v1/reservations/advisors/{user_id}"))
            .await?;
        Ok(lenient_list(raw))
    }

    pub async fn all_reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        let raw: Value = self.get_json("/v1/reservations/").await?;
        Ok(lenient_list(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn products_accepts_bare_array_and_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"productId": 1, "productName": "Retirement planning", "price": 50000}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/reservations/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "result": [{"reservationId": "rv-1", "productId": 1, "userId": 9}]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Some("tkn".to_string()));
        let products = client.list_products().await.unwrap();
        assert_eq!(products[0].product_id.as_deref(), Some("1"));

        let reservations = client.all_reservations().await.unwrap();
        assert_eq!(reservations[0].user_id.as_deref(), Some("9"));
    }
}
