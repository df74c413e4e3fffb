use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// 安装全局日志订阅器，只应由二进制入口调用一次
pub fn init_logger(log_level: &str) -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
            "%b %d %H:%M:%S".to_owned(),
        ))
        .with_filter(build_filter(log_level));

    tracing_subscriber::registry().with(fmt_layer).try_init()?;
    Ok(())
}

/// 构建日志过滤器，压低 http 相关依赖的噪音日志
fn build_filter(base_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::builder().parse_lossy(format!(
        "{},\
            hyper=warn,\
            hyper_util=warn,\
            reqwest=warn,\
            rustls=warn,\
            h2=warn",
        base_level
    ))
}
