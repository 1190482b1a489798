//! Integration tests driving [`EbarimtClient`] against a stub HTTP server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ebarimt_client::{ApiOutcome, ClientConfig, ClientError, EbarimtClient};
use ebarimt_core::payload::{PaymentLine, ReceiptPayload, StockLine};
use ebarimt_core::{BillType, Environment, Money};

fn test_client(server: &MockServer) -> EbarimtClient {
    let config = ClientConfig::new(Environment::Staging)
        .credentials("operator", "secret")
        .timeout(Duration::from_secs(2))
        .with_base_url(server.uri());
    EbarimtClient::new(config).unwrap()
}

fn sample_payload() -> ReceiptPayload {
    ReceiptPayload {
        amount: Money::from_tugrik(1_100_000),
        vat: Money::from_tugrik(100_000),
        city_tax: Money::zero(),
        district_code: "3420".to_string(),
        branch_no: "001".to_string(),
        bill_type: BillType::B2cReceipt,
        stocks: vec![StockLine {
            code: "1001".to_string(),
            name: "Widget".to_string(),
            measure_unit: "ш".to_string(),
            qty: 1,
            unit_price: Money::from_tugrik(1_100_000),
            total_amount: Money::from_tugrik(1_100_000),
            vat: Money::from_tugrik(100_000),
            city_tax: Money::zero(),
            bar_code: String::new(),
            tax_product_code: None,
        }],
        payments: vec![PaymentLine {
            code: "CASH".to_string(),
            status: "PAID".to_string(),
            paid_amount: Money::from_tugrik(1_100_000),
            date: "2025-03-14".to_string(),
        }],
        report_month: "202503".to_string(),
        customer_tin: None,
        customer_regno: None,
        register_no: None,
    }
}

async fn mount_token_endpoint(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/realms/Staging/protocol/openid-connect/token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=vatps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "expires_in": 300
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn create_receipt_success_carries_lottery_and_qr() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/receipt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "billId": "000000012345678901234567890123456",
            "lottery": "AB12345678",
            "qrData": "opaque-qr-blob",
            "date": "2025-03-14 10:22:01"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.create_receipt(&sample_payload()).await.unwrap();

    match outcome {
        ApiOutcome::Success(receipt) => {
            assert_eq!(
                receipt.receipt_id(),
                Some("000000012345678901234567890123456")
            );
            assert_eq!(receipt.lottery.as_deref(), Some("AB12345678"));
            assert_eq!(receipt.qr_data.as_deref(), Some("opaque-qr-blob"));
        }
        ApiOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
    }
}

#[tokio::test]
async fn http_200_with_failure_body_is_verbatim_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/receipt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "TIN not found"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.create_receipt(&sample_payload()).await.unwrap();

    match outcome {
        ApiOutcome::Rejected(rejection) => assert_eq!(rejection.message, "TIN not found"),
        ApiOutcome::Success(_) => panic!("expected rejection"),
    }
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Nothing listens on this port.
    let config = ClientConfig::new(Environment::Staging)
        .timeout(Duration::from_secs(1))
        .with_base_url("http://127.0.0.1:1");
    let client = EbarimtClient::new(config).unwrap();

    let result = client.get_info().await;
    assert!(matches!(result, Err(ClientError::Transport { .. })));
}

#[tokio::test]
async fn non_2xx_without_parseable_body_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    match client.get_info().await {
        Err(ClientError::Http { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn token_is_acquired_once_and_reused() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/easy-register/api/info/consumer/AA00112233"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "loginName": "consumer1",
            "givenName": "Bat"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    for _ in 0..2 {
        let outcome = client.lookup_consumer_by_regno("AA00112233").await.unwrap();
        let info = outcome.success().unwrap();
        assert_eq!(info.login_name.as_deref(), Some("consumer1"));
    }
}

#[tokio::test]
async fn bad_credentials_surface_as_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/realms/Staging/protocol/openid-connect/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.lookup_consumer_by_regno("AA00112233").await;
    assert!(matches!(result, Err(ClientError::Auth { .. })));
}

#[tokio::test]
async fn taxpayer_lookup_unwraps_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/info/check/getInfo"))
        .and(query_param("tin", "77100012345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "data": {
                "name": "Test Trade LLC",
                "vatPayer": true,
                "cityPayer": false
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.get_taxpayer_info("77100012345").await.unwrap();
    let info = outcome.success().unwrap();
    assert_eq!(info.name.as_deref(), Some("Test Trade LLC"));
    assert!(info.vat_payer);
    assert!(!info.city_payer);
}

#[tokio::test]
async fn envelope_status_mismatch_is_rejection_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/info/check/getTinInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 404,
            "message": "regNo not found"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.get_tin_by_regno("0000000000").await.unwrap();
    match outcome {
        ApiOutcome::Rejected(rejection) => {
            assert_eq!(rejection.message, "regNo not found");
            assert_eq!(rejection.code, Some(404));
        }
        ApiOutcome::Success(_) => panic!("expected rejection"),
    }
}

#[tokio::test]
async fn tin_lookup_accepts_numeric_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/info/check/getTinInfo"))
        .and(query_param("regNo", "УН02301234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "data": 77100012345i64
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client.get_tin_by_regno("УН02301234").await.unwrap();
    assert_eq!(outcome.success().unwrap(), "77100012345");
}

#[tokio::test]
async fn void_receipt_sends_id_and_date() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/receipt"))
        .and(body_string_contains("\"id\":\"000000012345\""))
        .and(body_string_contains("2025-03-14 10:22:01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outcome = client
        .delete_receipt("000000012345", "2025-03-14 10:22:01")
        .await
        .unwrap();
    assert!(!outcome.is_rejected());
}

#[tokio::test]
async fn operator_endpoint_requires_api_key() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    // No api_key in the config.
    let client = test_client(&server);
    let request = ebarimt_client::wire::RegisterMerchantRequest {
        pos_no: "10012345".to_string(),
        merchant_tins: vec!["77100012345".to_string()],
    };
    let result = client.register_merchant(&request).await;
    assert!(matches!(
        result,
        Err(ClientError::NotConfigured { field: "api_key" })
    ));
}
