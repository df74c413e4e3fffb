#[macro_use]
extern crate tracing;

pub mod bilibili;
pub mod config;
pub mod http;
pub mod tool;
pub mod utils;

pub use bilibili::{normalize_video_id, BiliError, Credential, CredentialValidationError, CredentialValidator, VideoId};
pub use tool::{SubtitleTool, ToolMessage, ToolOutput, ToolParameters};
