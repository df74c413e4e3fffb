use reqwest::Method;
use serde::Deserialize;
use thiserror::Error;
use tracing::{Instrument, Span};

use crate::bilibili::client::{BiliClient, Client};
use crate::bilibili::error::BiliError;
use crate::bilibili::Credential;

const NAV_PATH: &str = "/x/web-interface/nav";

/// nav 接口拒绝凭据的原因，与接口返回码一一对应
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialRejection {
    #[error("not logged in, the cookies may have expired")]
    NotLoggedIn,
    #[error("SESSDATA is invalid or expired (code -101)")]
    SessionInvalid,
    #[error("bili_jct (CSRF token) is invalid (code -111)")]
    CsrfInvalid,
    #[error("malformed request (code -400)")]
    BadRequest,
    #[error("access denied, credentials expired or lack permission (code -403)")]
    Forbidden,
    #[error("request blocked by risk control, try again later (code -412)")]
    RateLimited,
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },
}

impl CredentialRejection {
    pub fn from_code(code: i64, message: &str) -> Self {
        match code {
            -101 => Self::SessionInvalid,
            -111 => Self::CsrfInvalid,
            -400 => Self::BadRequest,
            -403 => Self::Forbidden,
            -412 => Self::RateLimited,
            _ => Self::Api {
                code,
                message: message.to_owned(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct NavResponse {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<NavInfo>,
}

/// 当前登录账号的概要信息
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavInfo {
    #[serde(rename = "isLogin", default)]
    pub is_login: bool,
    #[serde(default)]
    pub mid: i64,
    #[serde(default)]
    pub uname: String,
}

/// 凭据校验失败，内部的 `BiliError` 区分了字段缺失、凭据被拒和网络错误
#[derive(Error, Debug)]
#[error("credential validation failed: {0}")]
pub struct CredentialValidationError(#[source] BiliError);

impl CredentialValidationError {
    pub fn kind(&self) -> &BiliError {
        &self.0
    }

    pub fn into_inner(self) -> BiliError {
        self.0
    }
}

impl From<BiliError> for CredentialValidationError {
    fn from(err: BiliError) -> Self {
        Self(err)
    }
}

pub struct CredentialValidator {
    client: Client,
    span: Span,
}

impl CredentialValidator {
    pub fn new(client: Client) -> Self {
        Self::with_span(client, info_span!("credential_validator"))
    }

    pub fn with_span(client: Client, span: Span) -> Self {
        Self { client, span }
    }

    pub async fn validate(&self, credential: &Credential) -> Result<(), CredentialValidationError> {
        self.whoami(credential).await.map(|_| ())
    }

    /// 校验凭据，成功时返回当前登录的账号
    pub async fn whoami(&self, credential: &Credential) -> Result<NavInfo, CredentialValidationError> {
        Ok(self.check(credential).instrument(self.span.clone()).await?)
    }

    async fn check(&self, credential: &Credential) -> Result<NavInfo, BiliError> {
        credential.check_complete().inspect_err(|e| warn!("凭据不完整: {}", e))?;
        debug!("凭据字段完整，开始请求 nav 接口");
        let bili = BiliClient::new(self.client.clone(), credential.clone());
        let res = fetch_nav(&bili)
            .await
            .inspect_err(|e| error!("nav 接口请求失败: {}", e))?;
        let info = interpret_nav(res).inspect_err(|e| warn!("凭据校验未通过: {}", e))?;
        info!("凭据校验通过，当前用户: {}（mid: {}）", info.uname, info.mid);
        Ok(info)
    }
}

async fn fetch_nav(bili: &BiliClient) -> Result<NavResponse, BiliError> {
    Ok(bili
        .request(Method::GET, NAV_PATH)
        .send()
        .await?
        .error_for_status()?
        .json::<NavResponse>()
        .await?)
}

fn interpret_nav(res: NavResponse) -> Result<NavInfo, BiliError> {
    if res.code != 0 {
        return Err(BiliError::InvalidCredential {
            reason: CredentialRejection::from_code(res.code, &res.message),
        });
    }
    match res.data {
        Some(info) if info.is_login => Ok(info),
        _ => Err(BiliError::InvalidCredential {
            reason: CredentialRejection::NotLoggedIn,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::bilibili::client::Endpoints;
    use crate::bilibili::credential::CredentialField;
    use crate::bilibili::error::NetworkFailureKind;

    fn credential() -> Credential {
        Credential::new("sess", "jct", "buvid")
    }

    async fn validator_for(server: &MockServer) -> CredentialValidator {
        let client = Client::new(Endpoints::new(server.uri()), Duration::from_secs(2)).unwrap();
        CredentialValidator::new(client)
    }

    async fn mount_nav(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(NAV_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_validate_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(NAV_PATH))
            .and(header("cookie", "SESSDATA=sess; bili_jct=jct; buvid3=buvid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "message": "0",
                "data": {"isLogin": true, "mid": 42, "uname": "测试用户"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let info = validator_for(&server).await.whoami(&credential()).await.unwrap();
        assert_eq!(info.mid, 42);
        assert_eq!(info.uname, "测试用户");
    }

    #[tokio::test]
    async fn test_validate_sends_single_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(NAV_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": {"isLogin": true}})))
            .expect(1)
            .mount(&server)
            .await;
        assert!(validator_for(&server).await.validate(&credential()).await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_minimal_success_payload() {
        let server = MockServer::start().await;
        mount_nav(&server, json!({"code": 0, "data": {"isLogin": true}})).await;
        assert!(validator_for(&server).await.validate(&credential()).await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_not_logged_in() {
        let server = MockServer::start().await;
        mount_nav(&server, json!({"code": 0, "message": "0", "data": {"isLogin": false}})).await;
        let err = validator_for(&server).await.validate(&credential()).await.unwrap_err();
        assert_matches!(
            err.kind(),
            BiliError::InvalidCredential {
                reason: CredentialRejection::NotLoggedIn
            }
        );
    }

    #[tokio::test]
    async fn test_validate_code_table() {
        let testcases = [
            (-101, CredentialRejection::SessionInvalid),
            (-111, CredentialRejection::CsrfInvalid),
            (-400, CredentialRejection::BadRequest),
            (-403, CredentialRejection::Forbidden),
            (-412, CredentialRejection::RateLimited),
            (
                -352,
                CredentialRejection::Api {
                    code: -352,
                    message: "风控校验失败".to_owned(),
                },
            ),
        ];
        for (code, expect) in testcases {
            let server = MockServer::start().await;
            mount_nav(&server, json!({"code": code, "message": "风控校验失败"})).await;
            let err = validator_for(&server).await.validate(&credential()).await.unwrap_err();
            assert_matches!(err.into_inner(), BiliError::InvalidCredential { reason } if reason == expect);
        }
    }

    #[tokio::test]
    async fn test_incomplete_credential_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let validator = validator_for(&server).await;
        let testcases = [
            (Credential::new("", "jct", "buvid"), CredentialField::Sessdata),
            (Credential::new("sess", " ", "buvid"), CredentialField::BiliJct),
            (Credential::new("sess", "jct", ""), CredentialField::Buvid3),
        ];
        for (credential, expect) in testcases {
            let err = validator.validate(&credential).await.unwrap_err();
            assert_matches!(err.kind(), BiliError::MissingField { field } if *field == expect);
        }
    }

    #[tokio::test]
    async fn test_transport_failures_are_network_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(NAV_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let err = validator_for(&server).await.validate(&credential()).await.unwrap_err();
        assert_matches!(
            err.kind(),
            BiliError::NetworkFailure {
                kind: NetworkFailureKind::Status(503),
                ..
            }
        );

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(NAV_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;
        let err = validator_for(&server).await.validate(&credential()).await.unwrap_err();
        assert_matches!(
            err.kind(),
            BiliError::NetworkFailure {
                kind: NetworkFailureKind::Decode,
                ..
            }
        );
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(NAV_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 0, "data": {"isLogin": true}}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        let client = Client::new(Endpoints::new(server.uri()), Duration::from_millis(200)).unwrap();
        let err = CredentialValidator::new(client)
            .validate(&credential())
            .await
            .unwrap_err();
        assert_matches!(
            err.kind(),
            BiliError::NetworkFailure {
                kind: NetworkFailureKind::Timeout,
                ..
            }
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_reported() {
        // 端口 9 (discard) 上通常没有服务在监听
        let client = Client::new(Endpoints::new("http://127.0.0.1:9"), Duration::from_secs(2)).unwrap();
        let err = CredentialValidator::new(client)
            .validate(&credential())
            .await
            .unwrap_err();
        assert_matches!(
            err.kind(),
            BiliError::NetworkFailure {
                kind: NetworkFailureKind::Connection,
                ..
            }
        );
    }
}
