// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了服务器在一次连接的生命周期中可能抛出的各类异常情况。
//!
//! ## 设计意图
//! - **错误分类**：涵盖了报文解析错误、路由注册冲突以及连接层面的读取错误。
//! - **传播策略**：解析与传输错误只终止所在的连接，绝不波及监听循环；
//!   路由注册错误在服务启动前同步返回给调用方。
//! - **用户友好**：通过实现 `std::fmt::Display`，确保错误信息可以被安全地记录到日志。

use std::fmt;

/// 服务器处理请求过程中发生的异常类型。
///
/// 该枚举通常作为 `Result` 的 `Err` 部分返回，用于指示处理失败的具体原因。
/// 底层 `io::Error` 的细节在出错现场记录日志，不随枚举值传播。
#[derive(Debug, Copy, Clone)]
pub enum Exception {
    /// 请求行按单个空格切分后的字段数不是 3（方法、路径、版本）。
    MalformedStartLine,
    /// 标头行中缺少 `": "` 分隔符，无法切分出标头名与标头值。
    MalformedHeaderLine,
    /// `Content-Length` 标头的值无法解析为非负整数。
    InvalidContentLength,
    /// 连接中可读的字节数少于 `Content-Length` 声明的长度。
    TruncatedBody,
    /// 对端在一行报文的中间断开了连接。
    UnexpectedEof,
    /// 请求行或标头行无法解析为合法的 UTF-8 字符串。
    RequestIsNotUtf8,
    /// 从连接读取数据时发生了 EOF 之外的底层错误。
    SocketRead,
    /// 注册路由时使用了已存在的模式。在服务启动前同步返回给调用方。
    DuplicatePattern,
    /// 响应缺少发送所必需的字段（协议版本、状态码或原因短语）。
    ResponseNotReady,
}

use Exception::*;

/// 为 `Exception` 实现 `Display` 特性，使其支持字符串格式化输出。
///
/// 工业实践中，这些描述信息常用于系统日志（Logging）以及发送给开发者的调试信息中。
impl fmt::Display for Exception {
    /// 根据错误类型写入人类可读的描述文本。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedStartLine => write!(f, "Failed to find 3 parts in HTTP start line"),
            MalformedHeaderLine => write!(f, "Header line is missing the \": \" separator"),
            InvalidContentLength => write!(f, "Content-Length is not a non-negative integer"),
            TruncatedBody => write!(f, "Connection ended before the declared body length"),
            UnexpectedEof => write!(f, "Connection closed in the middle of a line"),
            RequestIsNotUtf8 => write!(f, "Request bytes can't be parsed in UTF-8"),
            SocketRead => write!(f, "Error reading from the connection"),
            DuplicatePattern => write!(f, "Pattern already set"),
            ResponseNotReady => write!(f, "Response missing version, status code or reason phrase"),
        }
    }
}
