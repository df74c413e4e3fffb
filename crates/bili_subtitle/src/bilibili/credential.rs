use std::collections::HashMap;
use std::fmt;

use cookie::Cookie;

use crate::bilibili::error::BiliError;

/// 宿主平台凭据表中使用的键名
pub const SESSDATA_KEY: &str = "sessdata";
pub const BILI_JCT_KEY: &str = "bili_jct";
pub const BUVID3_KEY: &str = "buvid3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum CredentialField {
    #[strum(serialize = "SESSDATA")]
    Sessdata,
    #[strum(serialize = "BILI_JCT")]
    BiliJct,
    #[strum(serialize = "BUVID3")]
    Buvid3,
}

/// 从浏览器中复制的三项登录 Cookie
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub sessdata: String,
    pub bili_jct: String,
    pub buvid3: String,
}

impl Credential {
    pub fn new(sessdata: impl Into<String>, bili_jct: impl Into<String>, buvid3: impl Into<String>) -> Self {
        Self {
            sessdata: sessdata.into(),
            bili_jct: bili_jct.into(),
            buvid3: buvid3.into(),
        }
    }

    /// 从宿主传入的凭据表构造，缺失的键视为空字符串，交给 `check_complete` 报告
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned().unwrap_or_default();
        Self {
            sessdata: get(SESSDATA_KEY),
            bili_jct: get(BILI_JCT_KEY),
            buvid3: get(BUVID3_KEY),
        }
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            (SESSDATA_KEY.to_owned(), self.sessdata.clone()),
            (BILI_JCT_KEY.to_owned(), self.bili_jct.clone()),
            (BUVID3_KEY.to_owned(), self.buvid3.clone()),
        ])
    }

    /// 解析浏览器请求头中的整段 Cookie，例如 `SESSDATA=xxx; bili_jct=yyy; buvid3=zzz`
    pub fn from_cookie_str(raw: &str) -> Self {
        let mut credential = Self::default();
        for cookie in Cookie::split_parse(raw).flatten() {
            let value = cookie.value().to_owned();
            match cookie.name() {
                "SESSDATA" => credential.sessdata = value,
                "bili_jct" => credential.bili_jct = value,
                "buvid3" => credential.buvid3 = value,
                _ => {}
            }
        }
        credential
    }

    pub fn field(&self, field: CredentialField) -> &str {
        match field {
            CredentialField::Sessdata => &self.sessdata,
            CredentialField::BiliJct => &self.bili_jct,
            CredentialField::Buvid3 => &self.buvid3,
        }
    }

    /// 检查三项凭据是否都已填写（去除首尾空白后非空）
    pub fn check_complete(&self) -> Result<(), BiliError> {
        use strum::IntoEnumIterator;

        for field in CredentialField::iter() {
            if self.field(field).trim().is_empty() {
                return Err(BiliError::MissingField { field });
            }
        }
        Ok(())
    }

    pub fn cookie_header(&self) -> String {
        [
            Cookie::new("SESSDATA", self.sessdata.trim()),
            Cookie::new("bili_jct", self.bili_jct.trim()),
            Cookie::new("buvid3", self.buvid3.trim()),
        ]
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
    }
}

// 凭据属于敏感信息，Debug 输出时不打印具体值
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &str| if v.trim().is_empty() { "<empty>" } else { "<redacted>" };
        f.debug_struct("Credential")
            .field("sessdata", &mask(&self.sessdata))
            .field("bili_jct", &mask(&self.bili_jct))
            .field("buvid3", &mask(&self.buvid3))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_check_complete() {
        let credential = Credential::new("sess", "jct", "buvid");
        assert!(credential.check_complete().is_ok());

        let testcases = [
            (Credential::new("", "jct", "buvid"), CredentialField::Sessdata),
            (Credential::new("sess", "   ", "buvid"), CredentialField::BiliJct),
            (Credential::new("sess", "jct", "\t\n"), CredentialField::Buvid3),
            // 多个字段缺失时按顺序报告第一个
            (Credential::new(" ", "", ""), CredentialField::Sessdata),
        ];
        for (credential, expect) in testcases {
            assert_matches!(
                credential.check_complete(),
                Err(BiliError::MissingField { field }) if field == expect
            );
        }
    }

    #[test]
    fn test_from_map() {
        let map = HashMap::from([
            ("sessdata".to_owned(), "sess".to_owned()),
            ("bili_jct".to_owned(), "jct".to_owned()),
        ]);
        let credential = Credential::from_map(&map);
        assert_eq!(credential.sessdata, "sess");
        assert_eq!(credential.bili_jct, "jct");
        assert_eq!(credential.buvid3, "");
        assert_matches!(
            credential.check_complete(),
            Err(BiliError::MissingField {
                field: CredentialField::Buvid3
            })
        );
        assert_eq!(Credential::from_map(&credential.to_map()), credential);
    }

    #[test]
    fn test_from_cookie_str() {
        let credential =
            Credential::from_cookie_str("buvid3=abc-123infoc; SESSDATA=a%2C1700000000%2Cb; DedeUserID=42; bili_jct=f00d");
        assert_eq!(credential, Credential::new("a%2C1700000000%2Cb", "f00d", "abc-123infoc"));
    }

    #[test]
    fn test_cookie_header() {
        let credential = Credential::new(" sess ", "jct", "buvid");
        assert_eq!(credential.cookie_header(), "SESSDATA=sess; bili_jct=jct; buvid3=buvid");
    }

    #[test]
    fn test_debug_redacts_values() {
        let rendered = format!("{:?}", Credential::new("secret-sess", "", "secret-buvid"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<empty>"));
    }
}
