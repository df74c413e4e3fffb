use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Method;
use serde::Deserialize;

use crate::bilibili::client::BiliClient;
use crate::bilibili::error::BiliError;
use crate::bilibili::subtitle::{SubTitle, SubTitleBody, SubTitleInfo, SubTitlesInfo};
use crate::bilibili::{take_field, Validate};

static BV_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^BV([a-zA-Z0-9]{10})$").expect("invalid bv pattern"));
static AV_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^av([0-9]+)$").expect("invalid av pattern"));
static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)$").expect("invalid number pattern"));

/// 规范化后的视频编号
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VideoId {
    /// 完整的 BV 号，包含 `BV` 前缀
    Bvid(String),
    /// av 号的数字部分，原样保留
    Aid(String),
}

impl VideoId {
    /// 按 BV 号、av 号、纯数字的顺序匹配，都不满足时返回 None
    pub fn normalize(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if BV_PATTERN.is_match(raw) {
            return Some(Self::Bvid(raw.to_owned()));
        }
        if let Some(caps) = AV_PATTERN.captures(raw) {
            return Some(Self::Aid(caps[1].to_owned()));
        }
        if NUMBER_PATTERN.is_match(raw) {
            return Some(Self::Aid(raw.to_owned()));
        }
        None
    }

    /// 请求接口时使用的查询参数
    pub fn query(&self) -> [(&'static str, &str); 1] {
        match self {
            Self::Bvid(bvid) => [("bvid", bvid.as_str())],
            Self::Aid(aid) => [("aid", aid.as_str())],
        }
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bvid(bvid) => f.write_str(bvid),
            Self::Aid(aid) => write!(f, "av{}", aid),
        }
    }
}

/// 返回规范化后的编号字符串，无法识别时返回空字符串
pub fn normalize_video_id(raw: &str) -> String {
    match VideoId::normalize(raw) {
        Some(id) => {
            debug!("视频编号 {:?} 规范化为 {}", raw, id);
            id.to_string()
        }
        None => {
            warn!("无法识别的视频编号格式: {:?}", raw);
            String::new()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub mid: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// 视频详情接口中本工具关心的字段
#[derive(Debug, Default, Deserialize)]
pub struct ViewInfo {
    #[serde(default)]
    pub bvid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub pages: Vec<PageInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageInfo {
    pub cid: i64,
    #[serde(default)]
    pub page: i32,
    #[serde(rename = "part", default)]
    pub name: String,
    #[serde(default)]
    pub duration: u32,
}

pub struct Video<'a> {
    client: &'a BiliClient,
    pub id: VideoId,
}

impl<'a> Video<'a> {
    pub fn new(client: &'a BiliClient, id: VideoId) -> Self {
        Self { client, id }
    }

    /// 直接调用视频信息接口获取详细的视频信息
    pub async fn get_view_info(&self) -> Result<ViewInfo, BiliError> {
        let mut res = self
            .client
            .request(Method::GET, "/x/web-interface/view")
            .query(&self.id.query())
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?
            .validate()?;
        let data = take_field(&mut res, "/data")?;
        if data.is_null() {
            return Err(BiliError::NoVideoInfo {
                video_id: self.id.to_string(),
            });
        }
        Ok(serde_json::from_value(data)?)
    }

    pub async fn get_pages(&self) -> Result<Vec<PageInfo>, BiliError> {
        let mut res = self
            .client
            .request(Method::GET, "/x/player/pagelist")
            .query(&self.id.query())
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?
            .validate()?;
        let data = take_field(&mut res, "/data")?;
        if data.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(data)?)
    }

    /// 获取某个分P下的字幕列表，每个字幕包含了字幕的语言和 json 下载地址
    pub async fn get_subtitle_list(&self, cid: i64) -> Result<SubTitlesInfo, BiliError> {
        let cid = cid.to_string();
        let mut res = self
            .client
            .request(Method::GET, "/x/player/v2")
            .query(&self.id.query())
            .query(&[("cid", cid.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?
            .validate()?;
        let subtitle = take_field(&mut res, "/data/subtitle")?;
        if subtitle.is_null() {
            return Ok(SubTitlesInfo::default());
        }
        Ok(serde_json::from_value(subtitle)?)
    }

    pub async fn get_subtitle_body(&self, info: &SubTitleInfo) -> Result<SubTitleBody, BiliError> {
        let mut res = self
            .client
            .client // 字幕文件位于 CDN，请求不需要鉴权
            .request(Method::GET, &info.absolute_url(), None)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;
        let body = take_field(&mut res, "/body")?;
        if body.is_null() {
            return Ok(SubTitleBody::default());
        }
        Ok(serde_json::from_value(body)?)
    }

    /// 取第一个分P的字幕：分P列表 -> 字幕列表 -> 选择字幕 -> 下载正文
    pub async fn get_video_subtitle(&self) -> Result<Option<SubTitle>, BiliError> {
        let pages = self.get_pages().await?;
        let Some(page) = pages.first() else {
            warn!("视频 {} 没有分P信息", self.id);
            return Ok(None);
        };
        debug!("视频 {} 第一个分P的 cid: {}", self.id, page.cid);
        let listing = self.get_subtitle_list(page.cid).await?;
        debug!("视频 {} 共有 {} 条字幕", self.id, listing.subtitles.len());
        let Some(info) = listing.choose() else {
            return Ok(None);
        };
        info!("选择字幕 {}（{}）", info.lan, info.language_label());
        let body = self.get_subtitle_body(&info).await?;
        if body.is_empty() {
            warn!("视频 {} 的字幕 {} 内容为空", self.id, info.lan);
            return Ok(None);
        }
        Ok(Some(SubTitle { info, body }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_video_id() {
        let testcases = [
            ("BV1GJ411x7h7", "BV1GJ411x7h7"),
            ("av170001", "av170001"),
            ("170001", "av170001"),
            ("  BV1sthHzaEcH\n", "BV1sthHzaEcH"),
            (" 42 ", "av42"),
            ("av007", "av007"),
            ("not-a-video", ""),
            ("", ""),
            ("   ", ""),
            // 长度不对的 BV 号
            ("BV1GJ411x7h", ""),
            ("BV1GJ411x7h7a", ""),
            // 不做大小写兼容
            ("bv1GJ411x7h7", ""),
            ("AV170001", ""),
            ("av", ""),
            ("av17a", ""),
            ("https://www.bilibili.com/video/BV1GJ411x7h7", ""),
            ("-170001", ""),
        ];
        for (input, expect) in testcases {
            assert_eq!(normalize_video_id(input), expect, "input: {:?}", input);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["BV1GJ411x7h7", "av170001", "170001", "av007"] {
            let once = normalize_video_id(input);
            assert_eq!(normalize_video_id(&once), once);
        }
    }

    #[test]
    fn test_video_id_query() {
        assert_eq!(
            VideoId::normalize("BV1GJ411x7h7").unwrap().query(),
            [("bvid", "BV1GJ411x7h7")]
        );
        assert_eq!(VideoId::normalize("170001").unwrap().query(), [("aid", "170001")]);
    }

    #[test]
    fn test_view_info_defaults() {
        let info: ViewInfo = serde_json::from_value(serde_json::json!({
            "bvid": "BV1GJ411x7h7",
            "owner": {"mid": 1}
        }))
        .unwrap();
        assert!(info.title.is_none());
        assert!(info.owner.name.is_none());
        assert!(info.pages.is_empty());
    }
}
