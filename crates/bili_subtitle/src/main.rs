#[macro_use]
extern crate tracing;

use anyhow::{bail, Result};
use bili_subtitle::bilibili::{normalize_video_id, CredentialValidator, SubtitleFormat};
use bili_subtitle::config::{self, Args, Command};
use bili_subtitle::tool::{SubtitleTool, ToolOutput, ToolParameters};
use bili_subtitle::utils::init_logger;
use clap::Parser;
use tracing::Instrument;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level)?;
    debug!("bili-subtitle {}", config::version());

    match &args.command {
        Command::Verify { no_prompt } => verify(&args, *no_prompt).await,
        Command::Extract {
            video_ids,
            format,
            json,
            preview_lines,
        } => extract(&args, video_ids, *format, *json, *preview_lines).await,
        Command::Normalize { inputs } => {
            normalize(inputs);
            Ok(())
        }
    }
}

async fn verify(args: &Args, no_prompt: bool) -> Result<()> {
    let mut credential = args.credential.resolve()?;
    if !no_prompt {
        config::prompt_missing(&mut credential)?;
    }
    let validator = CredentialValidator::with_span(args.client()?, info_span!("verify"));
    match validator.whoami(&credential).await {
        Ok(info) => {
            println!("凭据验证成功，当前登录用户：{}（mid: {}）", info.uname, info.mid);
            Ok(())
        }
        Err(e) => {
            println!("凭据验证失败，请检查 Cookie 是否正确复制或已经过期");
            Err(e.into())
        }
    }
}

async fn extract(
    args: &Args,
    video_ids: &[String],
    format: SubtitleFormat,
    json: bool,
    preview_lines: usize,
) -> Result<()> {
    let credentials = args.credential.resolve_map()?;
    let tool = SubtitleTool::new(args.client()?).format(format);

    let mut failed = 0usize;
    for video_id in video_ids {
        let params = ToolParameters::new(video_id.as_str());
        let result = tool
            .invoke(credentials.as_ref(), &params)
            .instrument(info_span!("extract", video_id = %video_id))
            .await;
        match result {
            Ok(output) => {
                if !output.succeeded {
                    failed += 1;
                }
                if json {
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    print_output(video_id, &output, preview_lines);
                }
            }
            Err(e) => {
                failed += 1;
                error!("{}", e);
                if json {
                    println!("{}", serde_json::to_string_pretty(&ToolOutput::failure(&e))?);
                }
            }
        }
    }
    if failed > 0 {
        bail!("{} / {} 个视频的字幕提取失败", failed, video_ids.len());
    }
    Ok(())
}

fn print_output(video_id: &str, output: &ToolOutput, preview_lines: usize) {
    println!("===== {} =====", video_id);
    if output.succeeded {
        println!("标题: {}", output.video_title);
        println!("作者: {}", output.video_author);
        println!("字幕语言: {}", output.subtitle_language);
        println!("----- 字幕内容 -----");
        let lines = output.subtitles.lines().collect::<Vec<_>>();
        let shown = if preview_lines == 0 {
            lines.len()
        } else {
            preview_lines.min(lines.len())
        };
        for line in &lines[..shown] {
            println!("{}", line);
        }
        if shown < lines.len() {
            println!("...（省略了 {} 行）", lines.len() - shown);
        }
    }
    println!("{}", output.message);
}

fn normalize(inputs: &[String]) {
    for input in inputs {
        let normalized = normalize_video_id(input);
        if normalized.is_empty() {
            println!("{}\t<invalid>", input);
        } else {
            println!("{}\t{}", input, normalized);
        }
    }
}
