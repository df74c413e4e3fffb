use std::collections::HashMap;
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::bilibili::{Client, Credential, CredentialField, Endpoints};

mod clap;

pub use crate::config::clap::{version, Args, Command, CredentialArgs};

impl Args {
    pub fn client(&self) -> Result<Client> {
        Client::new(Endpoints::new(&self.api_base), Duration::from_secs(self.timeout)).context("创建 HTTP 客户端失败")
    }
}

impl CredentialArgs {
    /// 合并整段 Cookie 与单独指定的字段，单独指定的字段优先
    pub fn resolve(&self) -> Result<Credential> {
        let raw_cookie = match (&self.cookie, &self.cookie_file) {
            (Some(cookie), _) => Some(cookie.clone()),
            (None, Some(path)) => Some(
                std::fs::read_to_string(path).with_context(|| format!("读取 Cookie 文件 {} 失败", path.display()))?,
            ),
            (None, None) => None,
        };
        let mut credential = raw_cookie
            .as_deref()
            .map(Credential::from_cookie_str)
            .unwrap_or_default();
        let explicit = [
            (&self.sessdata, &mut credential.sessdata),
            (&self.bili_jct, &mut credential.bili_jct),
            (&self.buvid3, &mut credential.buvid3),
        ];
        for (value, slot) in explicit {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        Ok(credential)
    }

    /// 宿主平台形式的凭据表；三项都为空时视为未配置
    pub fn resolve_map(&self) -> Result<Option<HashMap<String, String>>> {
        let credential = self.resolve()?;
        if credential == Credential::default() {
            return Ok(None);
        }
        Ok(Some(credential.to_map()))
    }
}

/// 在终端中逐项提示输入缺失的凭据字段
pub fn prompt_missing(credential: &mut Credential) -> Result<()> {
    use strum::IntoEnumIterator;

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(());
    }
    let mut lines = stdin.lock().lines();
    for field in CredentialField::iter() {
        if !credential.field(field).trim().is_empty() {
            continue;
        }
        eprint!("请输入{}: ", field);
        io::stderr().flush()?;
        let line = lines.next().transpose()?.unwrap_or_default();
        let value = line.trim().to_owned();
        match field {
            CredentialField::Sessdata => credential.sessdata = value,
            CredentialField::BiliJct => credential.bili_jct = value,
            CredentialField::Buvid3 => credential.buvid3 = value,
        }
    }
    Ok(())
}
