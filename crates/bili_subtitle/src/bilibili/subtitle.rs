use std::fmt::Display;

pub const UNKNOWN_LANGUAGE: &str = "Unknown Language";

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SubTitlesInfo {
    pub subtitles: Vec<SubTitleInfo>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SubTitleInfo {
    pub lan: String,
    pub subtitle_url: String,
    #[serde(default)]
    pub lan_doc: Option<String>,
}

pub struct SubTitle {
    pub info: SubTitleInfo,
    pub body: SubTitleBody,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct SubTitleBody(pub Vec<SubTitleItem>);

#[derive(Debug, serde::Deserialize)]
pub struct SubTitleItem {
    from: f64,
    to: f64,
    content: String,
}

/// 字幕正文的输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::EnumString, strum::Display, clap::ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum SubtitleFormat {
    /// 每条字幕一行的纯文本
    #[default]
    Text,
    Srt,
}

impl SubTitleInfo {
    pub fn is_ai_sub(&self) -> bool {
        // ai： aisubtitle.hdslb.com/bfs/ai_subtitle/xxxx
        // 非 ai： aisubtitle.hdslb.com/bfs/subtitle/xxxx
        if self.lan.starts_with("ai-") {
            return true;
        }
        if let Some(doc) = &self.lan_doc {
            let doc = doc.trim();
            if doc.contains("自动") {
                return true;
            }
        }
        self.subtitle_url.contains("ai_subtitle")
    }

    /// 展示给用户的语言名称，优先使用 lan_doc
    pub fn language_label(&self) -> String {
        let doc = self.lan_doc.as_deref().map(str::trim).unwrap_or_default();
        if !doc.is_empty() {
            return doc.to_owned();
        }
        let lan = self.lan.trim();
        if lan.is_empty() {
            UNKNOWN_LANGUAGE.to_owned()
        } else {
            lan.to_owned()
        }
    }

    /// 字幕地址通常是省略协议的 `//aisubtitle.hdslb.com/...`
    pub fn absolute_url(&self) -> String {
        let url = self.subtitle_url.trim();
        if url.starts_with("//") {
            format!("https:{}", url)
        } else {
            url.to_owned()
        }
    }
}

impl SubTitlesInfo {
    /// 优先选择人工字幕，没有时退回到第一条（通常是 AI 字幕）
    pub fn choose(self) -> Option<SubTitleInfo> {
        let mut subtitles = self.subtitles.into_iter().filter(|s| !s.subtitle_url.trim().is_empty());
        let first = subtitles.next()?;
        if !first.is_ai_sub() {
            return Some(first);
        }
        Some(subtitles.find(|s| !s.is_ai_sub()).unwrap_or(first))
    }
}

impl SubTitleBody {
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|item| item.content.trim().is_empty())
    }

    pub fn to_plain_text(&self) -> String {
        self.0
            .iter()
            .map(|item| item.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render(&self, format: SubtitleFormat) -> String {
        match format {
            SubtitleFormat::Text => self.to_plain_text(),
            SubtitleFormat::Srt => self.to_string(),
        }
    }
}

impl Display for SubTitleBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, item) in self.0.iter().enumerate() {
            writeln!(f, "{}", idx + 1)?;
            writeln!(f, "{} --> {}", format_time(item.from), format_time(item.to))?;
            writeln!(f, "{}", item.content)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn format_time(time: f64) -> String {
    let (second, millisecond) = (time.trunc(), (time.fract() * 1e3) as u32);
    let (hour, minute, second) = (
        (second / 3600.0) as u32,
        ((second % 3600.0) / 60.0) as u32,
        (second % 60.0) as u32,
    );
    format!("{:02}:{:02}:{:02},{:03}", hour, minute, second, millisecond)
}
