// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 路由模块
//!
//! 该模块负责把请求路径映射到注册的 Handler。匹配规则：
//! 1. 精确匹配优先。
//! 2. 其次按"最长前缀优先"匹配以 `/` 结尾的通配模式。
//! 3. 都不命中时使用内置的 404 处理器。
//!
//! 路由表只在服务启动前写入，服务期间只读，因此热路径上无需任何锁。

use crate::{exception::Exception, param::HTTP_VERSION, request::Request, response::Response};

use log::debug;

use std::collections::HashMap;
use std::sync::Arc;

/// Handler 能力接口：取得请求的所有权，通过就地修改响应来表达处理结果。
///
/// 没有返回值通道：什么都不做的 Handler 会得到服务器的默认 200 响应。
/// Handler 不得在调用结束后继续持有响应的引用。
pub type Handler = Arc<dyn Fn(Request, &mut Response) + Send + Sync>;

/// 路由表。
///
/// 两个结构：精确匹配表，以及按长度降序排列的通配模式列表。
/// 不变式：每个通配模式同时也是精确表的键，Handler 只按模式存储一份。
pub struct Router {
    handlers: HashMap<String, Handler>,
    wild_patterns: Vec<String>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            wild_patterns: Vec::new(),
        }
    }

    /// 注册一个模式到 Handler 的映射。
    ///
    /// 以 `/` 结尾的模式额外进入通配列表，列表始终按模式长度从长到短排列；
    /// 排序稳定，等长模式维持注册顺序。重复注册同一模式返回
    /// `DuplicatePattern`。
    pub fn register<F>(&mut self, pattern: &str, handler: F) -> Result<(), Exception>
    where
        F: Fn(Request, &mut Response) + Send + Sync + 'static,
    {
        if self.handlers.contains_key(pattern) {
            return Err(Exception::DuplicatePattern);
        }
        self.handlers.insert(pattern.to_string(), Arc::new(handler));

        if pattern.ends_with('/') {
            self.wild_patterns.push(pattern.to_string());
            self.wild_patterns.sort_by(|a, b| b.len().cmp(&a.len()));
        }
        Ok(())
    }

    /// 注销一个模式，精确表与通配列表同时移除。
    ///
    /// 仅用于管理用途，不应出现在请求处理路径上
    pub fn unregister(&mut self, pattern: &str) {
        self.handlers.remove(pattern);
        self.wild_patterns.retain(|p| p != pattern);
    }

    /// 为请求路径选出 Handler。
    ///
    /// 精确匹配最优先；然后沿最长到最短扫描通配列表，第一个构成路径
    /// 字面前缀的模式胜出（嵌套前缀时保证最具体的模式命中，例如
    /// `/a/b/` 优于 `/a/`）；全部落空时返回内置 404 处理器。
    pub fn resolve(&self, path: &str) -> Handler {
        if let Some(handler) = self.handlers.get(path) {
            return Arc::clone(handler);
        }

        for pattern in &self.wild_patterns {
            if path.starts_with(pattern.as_str()) {
                // 不变式保证通配模式必然存在于精确表中
                return Arc::clone(&self.handlers[pattern]);
            }
        }

        debug!("路径{}没有命中任何路由，使用默认404处理器", path);
        Arc::new(default_not_found_handler)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// 内置的 404 处理器：清空全部默认标头，只保留零长度的 Content-Length。
pub fn default_not_found_handler(_request: Request, response: &mut Response) {
    response
        .set_version(HTTP_VERSION)
        .set_code(404)
        .clear_headers()
        .set_header("Content-Length", "0");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn request_for(path: &str) -> Request {
        let raw = format!("GET {} HTTP/1.1\r\n\r\n", path);
        let mut reader = BufReader::new(raw.as_bytes());
        Request::from_stream(&mut reader, 0).await.unwrap().unwrap()
    }

    fn tagging_handler(tag: &'static str) -> impl Fn(Request, &mut Response) + Send + Sync {
        move |_request: Request, response: &mut Response| {
            response.set_body(tag);
        }
    }

    async fn resolve_tag(router: &Router, path: &str) -> String {
        let handler = router.resolve(path);
        let mut response = Response::new();
        handler(request_for(path).await, &mut response);
        String::from_utf8(response.body().to_vec()).unwrap()
    }

    /// 精确注册的模式可以被解析到
    #[tokio::test]
    async fn test_register_and_resolve_exact() {
        let mut router = Router::new();
        router.register("/hello", tagging_handler("hello")).unwrap();

        assert_eq!(resolve_tag(&router, "/hello").await, "hello");
    }

    /// 重复注册同一模式应返回错误
    #[test]
    fn test_duplicate_pattern_rejected() {
        let mut router = Router::new();
        router.register("/a", tagging_handler("first")).unwrap();

        let result = router.register("/a", tagging_handler("second"));

        match result.unwrap_err() {
            Exception::DuplicatePattern => {}
            e => panic!("Expected DuplicatePattern, got {:?}", e),
        }
    }

    /// 嵌套前缀时最长的通配模式胜出
    #[tokio::test]
    async fn test_longest_wildcard_wins() {
        let mut router = Router::new();
        router.register("/a/", tagging_handler("a")).unwrap();
        router.register("/ab/", tagging_handler("ab")).unwrap();
        router.register("/a/b/", tagging_handler("a-b")).unwrap();

        assert_eq!(resolve_tag(&router, "/a/b/c").await, "a-b");
        assert_eq!(resolve_tag(&router, "/a/x").await, "a");
        assert_eq!(resolve_tag(&router, "/ab/x").await, "ab");
    }

    /// 注册顺序不影响最长优先：短模式先注册也不会抢先命中
    #[tokio::test]
    async fn test_wildcard_order_independent_of_registration() {
        let mut router = Router::new();
        router.register("/a/b/", tagging_handler("a-b")).unwrap();
        router.register("/a/", tagging_handler("a")).unwrap();

        assert_eq!(resolve_tag(&router, "/a/b/c").await, "a-b");
    }

    /// 精确匹配永远优先于任何通配模式
    #[tokio::test]
    async fn test_exact_match_beats_wildcard() {
        let mut router = Router::new();
        router.register("/echo/", tagging_handler("wild")).unwrap();
        router
            .register("/echo/exact", tagging_handler("exact"))
            .unwrap();

        assert_eq!(resolve_tag(&router, "/echo/exact").await, "exact");
        assert_eq!(resolve_tag(&router, "/echo/other").await, "wild");
    }

    /// 通配匹配要求字面前缀，共享字符但缺少斜杠的路径不命中
    #[tokio::test]
    async fn test_wildcard_requires_literal_prefix() {
        let mut router = Router::new();
        router.register("/echo/", tagging_handler("wild")).unwrap();

        let handler = router.resolve("/echoX");
        let mut response = Response::new();
        handler(request_for("/echoX").await, &mut response);

        assert_eq!(response.status_code(), 404);
    }

    /// 未命中路由时内置404处理器清空标头、只留零长度 Content-Length
    #[tokio::test]
    async fn test_default_not_found_handler() {
        let router = Router::new();

        let handler = router.resolve("/nowhere");
        let mut response = Response::new();
        response.set_header("Content-Type", "text/html; charset=utf-8");
        handler(request_for("/nowhere").await, &mut response);

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.reason_phrase(), "Not Found");
        assert_eq!(response.headers().len(), 1);
        assert_eq!(response.header("Content-Length"), Some("0"));
        assert_eq!(response.header("Content-Type"), None);
    }

    /// 注销后精确表与通配列表同时清理
    #[tokio::test]
    async fn test_unregister_removes_both_structures() {
        let mut router = Router::new();
        router.register("/gone/", tagging_handler("gone")).unwrap();
        router.unregister("/gone/");

        let handler = router.resolve("/gone/child");
        let mut response = Response::new();
        handler(request_for("/gone/child").await, &mut response);

        assert_eq!(response.status_code(), 404);

        // 注销之后同一模式可以重新注册
        assert!(router.register("/gone/", tagging_handler("back")).is_ok());
    }
}
