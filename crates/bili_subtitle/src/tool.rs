//! 字幕提取工具：宿主平台以凭据表和工具参数调用，输出固定的四个变量与一条文本消息。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, Span};

use crate::bilibili::{BiliClient, BiliError, Client, Credential, SubtitleFormat, Video, VideoId};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolParameters {
    #[serde(default)]
    pub video_id: String,
}

impl ToolParameters {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
        }
    }
}

/// 一次成功提取的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleResult {
    pub title: String,
    pub author: String,
    pub language: String,
    pub text: String,
}

/// 宿主平台消息协议中的一条消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolMessage {
    Variable { name: &'static str, value: String },
    Text { text: String },
}

/// 工具的输出，无论成功与否四个字段都会给出
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub subtitles: String,
    pub video_title: String,
    pub video_author: String,
    pub subtitle_language: String,
    pub message: String,
    #[serde(skip)]
    pub succeeded: bool,
}

impl ToolOutput {
    pub fn success(result: SubtitleResult) -> Self {
        let message = format!(
            "Successfully extracted subtitles from video '{}' by {}. Language: {}. Subtitle length: {} characters.",
            result.title,
            result.author,
            result.language,
            result.text.chars().count()
        );
        Self {
            subtitles: result.text,
            video_title: result.title,
            video_author: result.author,
            subtitle_language: result.language,
            message,
            succeeded: true,
        }
    }

    /// 失败时四个字段均为空字符串，保证输出结构完整
    pub fn failure(err: &BiliError) -> Self {
        Self {
            subtitles: String::new(),
            video_title: String::new(),
            video_author: String::new(),
            subtitle_language: String::new(),
            message: format!("Failed to get subtitles: {} - {}", err.kind_name(), err),
            succeeded: false,
        }
    }

    pub fn messages(&self) -> Vec<ToolMessage> {
        let variable = |name, value: &String| ToolMessage::Variable {
            name,
            value: value.clone(),
        };
        vec![
            variable("subtitles", &self.subtitles),
            variable("video_title", &self.video_title),
            variable("video_author", &self.video_author),
            variable("subtitle_language", &self.subtitle_language),
            ToolMessage::Text {
                text: self.message.clone(),
            },
        ]
    }
}

pub struct SubtitleTool {
    client: Client,
    format: SubtitleFormat,
    span: Span,
}

impl SubtitleTool {
    pub fn new(client: Client) -> Self {
        Self::with_span(client, info_span!("subtitle_tool"))
    }

    pub fn with_span(client: Client, span: Span) -> Self {
        Self {
            client,
            format: SubtitleFormat::default(),
            span,
        }
    }

    pub fn format(mut self, format: SubtitleFormat) -> Self {
        self.format = format;
        self
    }

    /// 凭据缺失或视频编号非法时直接返回错误；之后的任何失败都转换为空输出加错误消息
    pub async fn invoke(
        &self,
        credentials: Option<&HashMap<String, String>>,
        params: &ToolParameters,
    ) -> Result<ToolOutput, BiliError> {
        self.run(credentials, params).instrument(self.span.clone()).await
    }

    async fn run(
        &self,
        credentials: Option<&HashMap<String, String>>,
        params: &ToolParameters,
    ) -> Result<ToolOutput, BiliError> {
        let credential = resolve_credential(credentials)?;
        let id = resolve_video_id(&params.video_id)?;
        info!("开始提取视频 {} 的字幕", id);

        match self.fetch(credential, &id).await {
            Ok(result) => {
                info!(
                    "成功获取视频「{}」的字幕，语言: {}，长度: {} 字符",
                    result.title,
                    result.language,
                    result.text.chars().count()
                );
                Ok(ToolOutput::success(result))
            }
            Err(e) => {
                error!("获取视频 {} 的字幕失败: {} - {}", id, e.kind_name(), e);
                Ok(ToolOutput::failure(&e))
            }
        }
    }

    async fn fetch(&self, credential: Credential, id: &VideoId) -> Result<SubtitleResult, BiliError> {
        let bili = BiliClient::new(self.client.clone(), credential);
        let video = Video::new(&bili, id.clone());

        let view = match video.get_view_info().await {
            Ok(view) => view,
            Err(BiliError::RequestFailed { code, message }) => {
                warn!("视频信息接口返回错误，code: {}, message: {}", code, message);
                return Err(BiliError::NoVideoInfo { video_id: id.to_string() });
            }
            Err(e) => return Err(e),
        };
        let title = non_empty_or(view.title, UNKNOWN_TITLE);
        let author = non_empty_or(view.owner.name, UNKNOWN_AUTHOR);
        debug!("视频信息: title='{}', author='{}'", title, author);

        let Some(subtitle) = video.get_video_subtitle().await? else {
            warn!("视频「{}」没有可用的字幕", title);
            return Err(BiliError::NoSubtitles { title });
        };
        let language = subtitle.info.language_label();
        Ok(SubtitleResult {
            text: subtitle.body.render(self.format),
            title,
            author,
            language,
        })
    }
}

fn resolve_credential(credentials: Option<&HashMap<String, String>>) -> Result<Credential, BiliError> {
    let Some(map) = credentials else {
        error!("宿主未提供凭据");
        return Err(BiliError::MissingCredentials);
    };
    let credential = Credential::from_map(map);
    credential
        .check_complete()
        .inspect_err(|e| error!("凭据不完整: {}", e))?;
    Ok(credential)
}

fn resolve_video_id(raw: &str) -> Result<VideoId, BiliError> {
    VideoId::normalize(raw).ok_or_else(|| {
        error!("视频编号格式错误: {:?}", raw);
        BiliError::InvalidIdentifier { input: raw.to_owned() }
    })
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}
