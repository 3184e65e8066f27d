use crate::{
    exception::Exception,
    param::{CRLF, STATUS_CODES},
};

use bytes::Bytes;
use chrono::prelude::*;
use log::warn;

/// 插入序标头表。
///
/// 键唯一：重复 set 原位覆盖，不改变该标头在序列化输出中的位置。
/// 序列化顺序即插入顺序，保证同一个响应的输出字节完全确定。
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 写入一个标头。已存在的键原位覆盖值
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| n != name);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按插入顺序迭代标头
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// HTTP 响应报文的内存表示。
///
/// 由连接处理任务以默认值创建，交给 Handler 随意修改，最后经
/// `finalize` 补齐派生标头后由 `as_bytes` 序列化上线。
#[derive(Debug, Clone)]
pub struct Response {
    version: String,
    status_code: u16,
    reason_phrase: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// 构造一个全空的响应。版本、状态码与原因短语都处于未设置状态，
    /// 直接发送会被 `ensure_ready` 拦下
    pub fn new() -> Self {
        Self {
            version: String::new(),
            status_code: 0,
            reason_phrase: String::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn set_version(&mut self, version: &str) -> &mut Self {
        self.version = version.to_string();
        self
    }

    /// 设置状态码，并从标准映射表中带出对应的原因短语。
    ///
    /// 未收录的状态码只更新数字，原因短语保持现状，由调用方用
    /// `set_reason_phrase` 自行补充
    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.status_code = code;
        match STATUS_CODES.get(&code) {
            Some(&phrase) => self.reason_phrase = phrase.to_string(),
            None => {
                warn!("状态码{}不在标准映射表中，原因短语保持不变", code);
            }
        }
        self
    }

    pub fn set_reason_phrase(&mut self, phrase: &str) -> &mut Self {
        self.reason_phrase = phrase.to_string();
        self
    }

    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.headers.set(name, value);
        self
    }

    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        self.headers.remove(name);
        self
    }

    pub fn clear_headers(&mut self) -> &mut Self {
        self.headers.clear();
        self
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) -> &mut Self {
        self.body = body.into();
        self
    }

    /// 发送前的最后一步：补 `Date`，并以当前请求体的字节长度无条件覆盖
    /// `Content-Length`。该方法在 Handler 返回之后、序列化之前恰好执行一次。
    pub fn finalize(&mut self) -> &mut Self {
        if self.headers.get("Date").is_none() {
            self.headers.set("Date", &format_date(Utc::now()));
        }
        self.headers
            .set("Content-Length", &self.body.len().to_string());
        self
    }

    /// 检查发送响应所必需的字段是否齐备：协议版本、状态码、原因短语。
    pub fn ensure_ready(&self) -> Result<(), Exception> {
        if self.version.is_empty() || self.status_code == 0 || self.reason_phrase.is_empty() {
            return Err(Exception::ResponseNotReady);
        }
        Ok(())
    }

    /// 序列化为完整的 HTTP 响应字节序列：状态行、插入序的标头段、
    /// 空行、原始请求体。不对响应体做任何编码转换
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut head = String::new();
        head.push_str(&self.version);
        head.push(' ');
        head.push_str(&self.status_code.to_string());
        head.push(' ');
        head.push_str(&self.reason_phrase);
        head.push_str(CRLF);
        for (name, value) in self.headers.iter() {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str(CRLF);
        }
        head.push_str(CRLF);

        [head.as_bytes(), &self.body[..]].concat()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

// --- Getter 访问器实现 ---

impl Response {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// 按 RFC 1123 格式输出 HTTP-date，时区固定为 GMT
fn format_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
