pub use client::{BiliClient, Client, Endpoints, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use credential::{Credential, CredentialField};
pub use error::{BiliError, NetworkFailureKind};
pub use nav::{CredentialRejection, CredentialValidationError, CredentialValidator, NavInfo};
pub use subtitle::{SubTitle, SubTitleInfo, SubtitleFormat, UNKNOWN_LANGUAGE};
pub use video::{normalize_video_id, Video, VideoId, ViewInfo};

mod client;
pub mod credential;
mod error;
mod nav;
mod subtitle;
mod video;

pub(crate) trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, BiliError>;
}

impl Validate for serde_json::Value {
    type Output = serde_json::Value;

    fn validate(self) -> Result<Self::Output, BiliError> {
        let code = match self["code"].as_i64() {
            Some(code) => code,
            None => {
                return Err(BiliError::NetworkFailure {
                    kind: NetworkFailureKind::Decode,
                    message: "no code found in response".to_owned(),
                })
            }
        };
        if code != 0 {
            return Err(BiliError::RequestFailed {
                code,
                message: self["message"].as_str().unwrap_or_default().to_owned(),
            });
        }
        Ok(self)
    }
}

/// 按 `/a/b` 形式的路径取出字段，缺失或为 null 时返回 null，路径上遇到非对象的值视为响应格式错误
pub(crate) fn take_field(value: &mut serde_json::Value, pointer: &str) -> Result<serde_json::Value, BiliError> {
    use serde_json::Value;

    let mut current = value;
    for key in pointer.split('/').filter(|k| !k.is_empty()) {
        current = match current {
            Value::Object(map) => match map.get_mut(key) {
                Some(v) => v,
                None => return Ok(Value::Null),
            },
            Value::Null => return Ok(Value::Null),
            other => {
                return Err(BiliError::NetworkFailure {
                    kind: NetworkFailureKind::Decode,
                    message: format!("expected a JSON object when reading `{}`, found {}", key, json_type(other)),
                })
            }
        };
    }
    Ok(current.take())
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
