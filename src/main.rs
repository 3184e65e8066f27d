// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 异步 HTTP/1.1 服务器
//!
//! 该程序演示了 `minihttp` 库的完整用法：
//! - 基于 Tokio 运行时的多线程异步 I/O 处理
//! - 精确路由与最长前缀通配路由
//! - keep-alive 长连接复用
//! - 通过外部 TOML/YAML 文件配置运行参数与日志

use minihttp::router::default_not_found_handler;
use minihttp::{Config, Server};

use log::{error, info};
use tokio::runtime::Builder;

use std::net::{Ipv4Addr, SocketAddrV4};

/// # 程序入口点
///
/// 初始化系统环境、加载配置、注册演示路由并启动主事件循环。
fn main() {
    // 1. 初始化日志系统：采用 log4rs 日志架构，通过外部 YAML 灵活配置级别与输出目的地
    log4rs::init_file("config/log4rs.yaml", Default::default()).unwrap();

    // 2. 环境配置加载：从 TOML 文件读取运行参数
    let config = Config::from_toml("config/development.toml");
    info!("配置文件已载入");

    // 3. 异步运行时定制：根据配置文件动态分配工作线程数
    let worker_threads = config.worker_threads();
    let runtime = Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()
        .unwrap();
    info!("运行时已就绪，工作线程数：{}", worker_threads);

    // 4. 服务器构造与路由注册。注册必须在开始服务之前全部完成
    let server_name = config.server_name().to_string();
    let mut server = Server::with_name(&server_name);

    // "/" 以斜杠结尾，是一个兜底通配路由：只有路径恰好为 "/" 时返回默认 200
    server
        .register("/", |request, response| {
            if request.path() != "/" {
                default_not_found_handler(request, response);
            }
        })
        .unwrap();

    // 回显 User-Agent 标头。标头名按对端发送时的大小写精确匹配
    server
        .register("/user-agent", |request, response| {
            let agent = request.header("User-Agent").unwrap_or("").to_string();
            response.set_body(agent);
        })
        .unwrap();

    // 回显 /echo/ 之后的路径后缀
    server
        .register("/echo/", |request, response| {
            response.set_body(request.path()[6..].to_string());
        })
        .unwrap();

    // JSON 状态接口
    server
        .register("/api/status", move |_request, response| {
            let status = serde_json::json!({
                "server": server_name,
                "version": env!("CARGO_PKG_VERSION"),
            });
            response.set_header("Content-Type", "application/json");
            response.set_body(status.to_string());
        })
        .unwrap();

    // 5. 网络层初始化：支持全地址监听 (0.0.0.0) 或本地回环监听 (127.0.0.1)
    let address = match config.local() {
        true => Ipv4Addr::new(127, 0, 0, 1),
        false => Ipv4Addr::new(0, 0, 0, 0),
    };
    let socket = SocketAddrV4::new(address, config.port());
    info!("服务端将在{}上监听Socket连接", socket);

    // 6. 启动主事件循环。只有绑定失败会走到这里
    if let Err(e) = runtime.block_on(server.listen_and_serve(socket)) {
        error!("服务器启动失败：{}", e);
        panic!("Could not start server :(");
    }
}
