use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::bilibili::{SubtitleFormat, DEFAULT_API_BASE};

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser, Debug)]
#[command(name = "bili-subtitle", version = version(), about, long_about = None)]
pub struct Args {
    /// 日志级别，语法同 RUST_LOG
    #[arg(short, long, default_value = "info", env = "RUST_LOG", global = true)]
    pub log_level: String,

    /// 请求 B 站接口的超时时间（秒）
    #[arg(long, default_value_t = 15, global = true)]
    pub timeout: u64,

    /// 接口地址，仅用于调试
    #[arg(long, default_value = DEFAULT_API_BASE, env = "BILI_API_BASE", hide = true, global = true)]
    pub api_base: String,

    #[command(flatten)]
    pub credential: CredentialArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct CredentialArgs {
    #[arg(long, env = "SESSDATA", hide_env_values = true, global = true)]
    pub sessdata: Option<String>,

    #[arg(long, env = "BILI_JCT", hide_env_values = true, global = true)]
    pub bili_jct: Option<String>,

    #[arg(long, env = "BUVID3", hide_env_values = true, global = true)]
    pub buvid3: Option<String>,

    /// 从浏览器复制的整段 Cookie，单独指定的字段优先
    #[arg(long, env = "BILI_COOKIE", hide_env_values = true, global = true)]
    pub cookie: Option<String>,

    /// 从文件读取整段 Cookie
    #[arg(long, global = true)]
    pub cookie_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 检查凭据是否完整且能正常登录
    Verify {
        /// 不在终端中提示输入缺失的字段
        #[arg(long)]
        no_prompt: bool,
    },
    /// 提取一个或多个视频的字幕
    Extract {
        /// BV 号、av 号或纯数字
        #[arg(required = true)]
        video_ids: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = SubtitleFormat::Text)]
        format: SubtitleFormat,

        /// 以 JSON 输出工具结果
        #[arg(long)]
        json: bool,

        /// 文本模式下最多预览的字幕行数，0 表示全部输出
        #[arg(long, default_value_t = 10)]
        preview_lines: usize,
    },
    /// 打印规范化后的视频编号
    Normalize {
        #[arg(required = true)]
        inputs: Vec<String>,
    },
}

pub fn version() -> String {
    format!("{} (built at {})", built_info::PKG_VERSION, built_info::BUILT_TIME_UTC)
}
