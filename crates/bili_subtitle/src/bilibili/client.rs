use std::time::Duration;

use reqwest::{header, Method};

use crate::bilibili::error::BiliError;
use crate::bilibili::Credential;
use crate::http::headers::create_api_headers;

pub const DEFAULT_API_BASE: &str = "https://api.bilibili.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// 接口地址前缀，测试时可指向本地的桩服务
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub api: String,
}

impl Endpoints {
    pub fn new(api: impl Into<String>) -> Self {
        Self { api: api.into() }
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}{}", self.api.trim_end_matches('/'), path)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

// 一个对 reqwest::Client 的简单封装，用于 Bilibili 请求
#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
    endpoints: Endpoints,
}

impl Client {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, BiliError> {
        // 正常访问 api 所必须的 header，作为默认 header 添加到每个请求中
        let inner = reqwest::Client::builder()
            .default_headers(create_api_headers())
            .gzip(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { inner, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // a wrapper of reqwest::Client::request to add credential to the request
    pub fn request(&self, method: Method, url: &str, credential: Option<&Credential>) -> reqwest::RequestBuilder {
        let mut req = self.inner.request(method, url);
        // 如果有 credential，会将其转换成 cookie 添加到请求的 header 中
        if let Some(credential) = credential {
            req = req.header(header::COOKIE, credential.cookie_header());
        }
        req
    }
}

/// 携带单次调用凭据的客户端，调用结束即丢弃
#[derive(Debug, Clone)]
pub struct BiliClient {
    pub client: Client,
    credential: Credential,
}

impl BiliClient {
    pub fn new(client: Client, credential: Credential) -> Self {
        Self { client, credential }
    }

    /// 获取一个带凭据的预构建请求，`path` 相对于 api 地址
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = self.client.endpoints().api(path);
        self.client.request(method, &url, Some(&self.credential))
    }
}
