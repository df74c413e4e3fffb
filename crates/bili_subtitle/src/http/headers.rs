use reqwest::header::{HeaderMap, HeaderValue};

/// 标准的Chrome 140浏览器User-Agent
pub const CHROME_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36";

pub const BILIBILI_REFERER: &str = "https://www.bilibili.com/";

/// 现代浏览器安全头
pub const SEC_CH_UA: &str = "\"Chromium\";v=\"140\", \"Not=A?Brand\";v=\"24\", \"Google Chrome\";v=\"140\"";
pub const SEC_CH_UA_MOBILE: &str = "?0";
pub const SEC_CH_UA_PLATFORM: &str = "\"Windows\"";

/// 为API请求创建标准请求头
pub fn create_api_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert("User-Agent", HeaderValue::from_static(CHROME_USER_AGENT));
    headers.insert("Accept", HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert("Accept-Language", HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"));
    headers.insert("Referer", HeaderValue::from_static(BILIBILI_REFERER));
    headers.insert("Origin", HeaderValue::from_static("https://www.bilibili.com"));

    headers.insert("sec-ch-ua", HeaderValue::from_static(SEC_CH_UA));
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static(SEC_CH_UA_MOBILE));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static(SEC_CH_UA_PLATFORM));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-site"));

    headers
}
