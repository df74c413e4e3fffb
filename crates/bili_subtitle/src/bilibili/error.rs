use std::fmt;

use thiserror::Error;

use crate::bilibili::credential::CredentialField;
use crate::bilibili::nav::CredentialRejection;

#[derive(Error, Debug, strum::IntoStaticStr)]
pub enum BiliError {
    #[error("missing required credential: {field}")]
    MissingField { field: CredentialField },
    #[error(
        "Bilibili credentials not configured or invalid. Please provide SESSDATA, BILI_JCT and BUVID3 in plugin settings."
    )]
    MissingCredentials,
    #[error("credential rejected: {reason}")]
    InvalidCredential { reason: CredentialRejection },
    #[error("network failure ({kind}): {message}")]
    NetworkFailure { kind: NetworkFailureKind, message: String },
    #[error("request failed, status code: {code}, message: {message}")]
    RequestFailed { code: i64, message: String },
    #[error("Failed to get video information for {video_id}")]
    NoVideoInfo { video_id: String },
    #[error("Video '{title}' has no available subtitles.")]
    NoSubtitles { title: String },
    #[error("{}", invalid_identifier_message(.input))]
    InvalidIdentifier { input: String },
}

fn invalid_identifier_message(input: &str) -> String {
    if input.trim().is_empty() {
        return "Video ID cannot be empty.".to_owned();
    }
    format!(
        "Invalid video ID format: {:?}. Please provide a valid BV number (e.g., 'BV1GJ411x7h7') or AV number (e.g., 'av170001' or '170001').",
        input
    )
}

/// 传输层错误的分类，直接由 reqwest 的错误类型判断，不依赖错误文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailureKind {
    Timeout,
    Connection,
    /// 服务端返回了非 2xx 状态码
    Status(u16),
    /// 响应体读取或 JSON 解析失败
    Decode,
    Other,
}

impl fmt::Display for NetworkFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::Connection => f.write_str("connection"),
            Self::Status(code) => write!(f, "http status {}", code),
            Self::Decode => f.write_str("decode"),
            Self::Other => f.write_str("other"),
        }
    }
}

impl BiliError {
    /// 错误类型名，用于拼接给宿主的错误消息
    pub fn kind_name(&self) -> &'static str {
        self.into()
    }

    pub fn is_network_failure(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. })
    }
}

impl From<reqwest::Error> for BiliError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            NetworkFailureKind::Timeout
        } else if err.is_connect() {
            NetworkFailureKind::Connection
        } else if let Some(status) = err.status() {
            NetworkFailureKind::Status(status.as_u16())
        } else if err.is_decode() || err.is_body() {
            NetworkFailureKind::Decode
        } else {
            NetworkFailureKind::Other
        };
        Self::NetworkFailure {
            kind,
            message: err.without_url().to_string(),
        }
    }
}

impl From<serde_json::Error> for BiliError {
    fn from(err: serde_json::Error) -> Self {
        Self::NetworkFailure {
            kind: NetworkFailureKind::Decode,
            message: err.to_string(),
        }
    }
}
