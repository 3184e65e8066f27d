// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 服务器模块
//!
//! 该模块把各核心组件编排为完整的服务器：
//! - 监听循环：阻塞地接受 TCP 连接，每个连接派发一个独立的 Tokio 任务。
//! - 连接处理：在任务内循环执行 解析 → 路由 → 调用Handler → 收尾 → 发送，
//!   并根据响应的 `Connection` 标头决定是否在同一连接上继续服务。
//!
//! 路由注册必须在开始服务之前完成；服务期间路由表只读，连接状态由
//! 所属任务独占，因此全程无锁。

use crate::{
    exception::Exception,
    param::{HTTP_VERSION, SERVER_NAME},
    request::Request,
    response::Response,
    router::Router,
};

use log::{debug, error, info};
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpListener,
};

use std::io;
use std::net::SocketAddrV4;
use std::sync::Arc;

/// HTTP 服务器：一个名字（用于 `Server` 响应头）加一张路由表。
pub struct Server {
    name: String,
    router: Router,
}

impl Server {
    /// 以默认服务器名构造
    pub fn new() -> Self {
        Self::with_name(SERVER_NAME)
    }

    /// 以自定义服务器名构造
    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            router: Router::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 注册一个路由。必须在 `listen_and_serve` 之前调用完毕。
    pub fn register<F>(&mut self, pattern: &str, handler: F) -> Result<(), Exception>
    where
        F: Fn(Request, &mut Response) + Send + Sync + 'static,
    {
        self.router.register(pattern, handler)
    }

    /// 注销一个路由。仅用于管理用途。
    pub fn unregister(&mut self, pattern: &str) {
        self.router.unregister(pattern);
    }

    /// 绑定地址并开始服务。绑定失败是唯一中止启动的错误，原样返回给调用方。
    pub async fn listen_and_serve(self, socket: SocketAddrV4) -> io::Result<()> {
        let listener = match TcpListener::bind(socket).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("无法绑定地址：{}，错误：{}", socket, e);
                return Err(e);
            }
        };
        info!("地址{}绑定完成，开始接受连接", socket);
        self.serve(listener).await
    }

    /// 主事件循环：持续接受新连接并将其分发至独立任务处理。
    ///
    /// 接受单个连接失败只记录日志，不会中止循环。
    pub async fn serve(self, listener: TcpListener) -> io::Result<()> {
        let server = Arc::new(self);
        let mut id: u128 = 0;

        loop {
            let (stream, addr) = match listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    error!("接受连接时出错: {}", e);
                    continue;
                }
            };
            debug!("[ID{}]新的连接：{}", id, addr);

            let server = Arc::clone(&server);
            tokio::spawn(async move {
                serve_connection(server, stream, id).await;
            });
            id += 1;
        }
    }

    /// 构造带默认标头的初始响应：HTTP/1.1 200 OK，
    /// `Content-Type`、`Connection`、`Server`、`Content-Length` 依次就位。
    pub fn init_response(&self) -> Response {
        let mut response = Response::new();
        response
            .set_version(HTTP_VERSION)
            .set_code(200)
            .set_header("Content-Type", "text/html; charset=utf-8")
            .set_header("Connection", "keep-alive")
            .set_header("Server", &self.name)
            .set_header("Content-Length", "0");
        response
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

/// # 连接处理器
///
/// 负责单个连接的完整生命周期。keep-alive 的延续用显式循环表达，
/// 长连接上的请求数不受栈深限制。任何解析或发送失败都只终止本连接。
async fn serve_connection<S>(server: Arc<Server>, stream: S, id: u128)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);

    loop {
        // 1. 等待请求。干净的 EOF 表示对端挂断，静默释放连接；
        //    其余解析失败记录日志后直接关闭，不作应答
        let request = match Request::from_stream(&mut reader, id).await {
            Ok(Some(request)) => request,
            Ok(None) => break,
            Err(e) => {
                error!("[ID{}]解析HTTP请求失败: {}", id, e);
                break;
            }
        };
        debug!("[ID{}]成功解析HTTP请求", id);

        let method = request.method().to_string();
        let path = request.path().to_string();
        let version = request.version().to_string();

        // 2. 分发。默认响应先就位；请求方要求关闭时提前改写
        //    Connection 标头，Handler 仍有机会覆盖
        let mut response = server.init_response();
        if request.header("Connection") == Some("close") {
            response.set_header("Connection", "close");
        }
        let handler = server.router.resolve(request.path());
        handler(request, &mut response);

        // 3. 收尾并发送。就绪检查不通过的响应宁可不发，
        //    也不把残缺的状态行写上线
        response.finalize();
        if let Err(e) = response.ensure_ready() {
            error!("[ID{}]响应缺少必要字段，拒绝发送: {}", id, e);
            break;
        }
        if let Err(e) = write_half.write_all(&response.as_bytes()).await {
            error!("[ID{}]发送响应失败: {}", id, e);
            break;
        }
        let _ = write_half.flush().await;

        info!(
            "[ID{}] {}, {}, {}, {}, {}",
            id,
            version,
            path,
            method,
            response.status_code(),
            response.reason_phrase(),
        );

        // 4. 决策：Connection 标头缺失或为 keep-alive 时回到等待状态，
        //    其余值一律关闭连接
        match response.header("Connection") {
            None | Some("keep-alive") => continue,
            Some(_) => break,
        }
    }
    debug!("[ID{}]连接已释放", id);
}
