// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求解析模块
//!
//! 该模块是服务器的核心组件之一，负责把连接上的字节流逐行解析为强类型的
//! `Request` 结构体。它涵盖了：
//! 1. 请求行（Request-Line）的解析（方法、路径、版本）。
//! 2. 标头段（Headers）的逐行提取，以空行作为结束标志。
//! 3. 由 `Content-Length` 唯一决定的定长请求体读取。
//!
//! 解析器工作在流上而不是一次性缓冲区上：同一条 keep-alive 连接上的
//! 后续请求会从上一次停下的位置继续读取。

use crate::{exception::Exception, param::HEADER_SEPARATOR};

use bytes::Bytes;
use log::{debug, error};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use std::collections::HashMap;
use std::io::ErrorKind;

/// 表示一个完整的 HTTP 请求。
///
/// 构造完成后不可变，由所属连接的处理任务独占，不跨任务共享。
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP 请求方法，按报文原样保存，不做合法性校验
    method: String,
    /// 请求的资源路径，原始字符串，不做 URL 解码
    path: String,
    /// HTTP 协议版本字符串，例如 `HTTP/1.1`
    version: String,
    /// 标头映射。标头名保留对端发送时的大小写，重名标头后出现的覆盖先出现的
    headers: HashMap<String, String>,
    /// 原始请求体。长度由 `Content-Length` 标头唯一决定，缺失则为空
    body: Bytes,
}

impl Request {
    /// 从可读字节流中解析下一个 `Request`。
    ///
    /// # 返回值
    /// - `Ok(Some(request))`：成功解析出一个请求。
    /// - `Ok(None)`：对端在请求边界处正常挂断（未读到任何字节），
    ///   调用方应静默释放连接。
    /// - `Err(exception)`：报文畸形或连接读取失败，调用方应关闭连接且不作应答。
    ///
    /// # 参数
    /// * `reader` - 连接上的带缓冲读取器，同一连接的多次调用必须复用同一个实例。
    /// * `id` - 全局连接 ID，用于在多任务环境下追踪日志。
    pub async fn from_stream<R: AsyncBufRead + Unpin>(
        reader: &mut R,
        id: u128,
    ) -> Result<Option<Self>, Exception> {
        // 1. 请求行。此处读到干净的 EOF 说明对端在两次请求之间挂断了连接
        let start_line = match read_line(reader, id).await? {
            Some(line) => line,
            None => {
                debug!("[ID{}]对端在请求边界处关闭了连接", id);
                return Ok(None);
            }
        };

        // 按单个空格切分，必须恰好得到 方法、路径、版本 三个字段
        let start_line_parts: Vec<&str> = start_line.trim().split(' ').collect();
        if start_line_parts.len() != 3 {
            error!("[ID{}]HTTP请求行格式不正确：{}", id, start_line);
            return Err(Exception::MalformedStartLine);
        }
        let method = start_line_parts[0].to_string();
        let path = start_line_parts[1].to_string();
        let version = start_line_parts[2].to_string();

        // 2. 标头段。空行结束；行边界处的 EOF 同样视为标头段结束
        let mut headers = HashMap::new();
        loop {
            let line = match read_line(reader, id).await? {
                Some(line) => line,
                None => break,
            };
            if line.is_empty() {
                break;
            }
            let (name, value) = match line.split_once(HEADER_SEPARATOR) {
                Some(pair) => pair,
                None => {
                    error!("[ID{}]HTTP标头行缺少分隔符：{}", id, line);
                    return Err(Exception::MalformedHeaderLine);
                }
            };
            // 标头名与标头值均按原样保存，不做大小写归一化，也不裁剪空白
            headers.insert(name.to_string(), value.to_string());
        }

        // 3. 请求体。只认 Content-Length，一个字节不多、一个字节不少
        let mut body = Bytes::new();
        if let Some(raw_length) = headers.get("Content-Length") {
            let length: usize = match raw_length.parse() {
                Ok(length) => length,
                Err(_) => {
                    error!("[ID{}]Content-Length的值非法：{}", id, raw_length);
                    return Err(Exception::InvalidContentLength);
                }
            };
            let mut buffer = vec![0u8; length];
            match reader.read_exact(&mut buffer).await {
                Ok(_) => body = Bytes::from(buffer),
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    error!("[ID{}]请求体不足{}字节即遇到EOF", id, length);
                    return Err(Exception::TruncatedBody);
                }
                Err(e) => {
                    error!("[ID{}]读取请求体时出错: {}", id, e);
                    return Err(Exception::SocketRead);
                }
            }
        }

        Ok(Some(Self {
            method,
            path,
            version,
            headers,
            body,
        }))
    }
}

// --- Getter 访问器实现 ---

impl Request {
    /// 获取请求方法
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 获取请求路径（原始字符串）
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 获取 HTTP 协议版本
    pub fn version(&self) -> &str {
        &self.version
    }

    /// 获取完整的标头映射
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// 按对端发送时的大小写精确查询某个标头
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|value| value.as_str())
    }

    /// 获取原始请求体
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// 读取一行报文，返回去掉行终止符后的内容。
///
/// 容忍 `\r\n` 与单独的 `\n` 两种行终止符。未读到任何字节即 EOF 时返回
/// `Ok(None)`；读到了部分字节但没有等到 `\n` 说明对端在行中间断开，
/// 视为硬错误。
async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    id: u128,
) -> Result<Option<String>, Exception> {
    let mut raw = Vec::new();
    let count = match reader.read_until(b'\n', &mut raw).await {
        Ok(count) => count,
        Err(e) => {
            error!("[ID{}]读取连接数据时出错: {}", id, e);
            return Err(Exception::SocketRead);
        }
    };
    if count == 0 {
        return Ok(None);
    }
    if raw.last() != Some(&b'\n') {
        error!("[ID{}]对端在一行报文的中间断开了连接", id);
        return Err(Exception::UnexpectedEof);
    }
    raw.pop();
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    match String::from_utf8(raw) {
        Ok(line) => Ok(Some(line)),
        Err(_) => {
            error!("[ID{}]无法解析HTTP请求", id);
            Err(Exception::RequestIsNotUtf8)
        }
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use tokio::io::BufReader;

    fn parse_blocking(raw: Vec<u8>) -> Result<Option<Request>, Exception> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(async {
            let mut reader = BufReader::new(raw.as_slice());
            Request::from_stream(&mut reader, 0).await
        })
    }

    proptest! {
        /// 任意三段式请求行解析后三个字段均保持原样
        #[test]
        fn prop_start_line_fields_roundtrip(
            method in "[A-Z]{1,7}",
            path in "/[a-zA-Z0-9_/.-]{0,24}",
        ) {
            let raw = format!("{} {} HTTP/1.1\r\n\r\n", method, path);

            let request = parse_blocking(raw.into_bytes()).unwrap().unwrap();

            prop_assert_eq!(request.method(), method.as_str());
            prop_assert_eq!(request.path(), path.as_str());
            prop_assert_eq!(request.version(), "HTTP/1.1");
        }

        /// 任意使用 ": " 分隔、以空行结束的标头块，每个键值对都恰好出现一次
        #[test]
        fn prop_header_block_roundtrip(
            name in "[A-Za-z][A-Za-z-]{0,15}",
            value in "[ -~]{0,32}",
        ) {
            let raw = format!("GET / HTTP/1.1\r\n{}: {}\r\n\r\n", name, value);

            let request = parse_blocking(raw.into_bytes()).unwrap().unwrap();

            prop_assert_eq!(request.headers().len(), 1);
            prop_assert_eq!(request.header(&name), Some(value.as_str()));
        }

        /// 任意字节串的请求体按声明长度原样读出
        #[test]
        fn prop_body_bytes_roundtrip(body in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut raw = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", body.len())
                .into_bytes();
            raw.extend_from_slice(&body);

            let request = parse_blocking(raw).unwrap().unwrap();

            prop_assert_eq!(request.body().as_ref(), body.as_slice());
        }
    }
}
