//! HTTP 中间件
//! 应用状态与请求追踪

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// 应用状态
///
/// 服务使用 Arc 包装，多个请求共享同一实例；全部配置
/// （签名密钥、混淆盐、哈希参数）在启动时建立，进程内不再变更。
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::AppConfig,
    pub db: sqlx::PgPool,
    pub jwt_service: Arc<crate::auth::jwt::JwtService>,
    pub obfuscator: Arc<crate::auth::hashid::IdObfuscator>,
    pub auth_service: Arc<crate::services::AuthService>,
    pub profile_service: Arc<crate::services::ProfileService>,
    pub site_service: Arc<crate::services::SiteService>,
    pub message_service: Arc<crate::services::MessageService>,
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        let status_code = match status {
            200 => "200",
            201 => "201",
            204 => "204",
            400 => "400",
            401 => "401",
            403 => "403",
            404 => "404",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "status" => status_code).increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        // 在响应头中添加 trace_id
        let mut response = response;
        if let Ok(value) = trace_id.parse() {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = request_id.parse() {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_or_generate_trace_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "test-trace-123".parse().unwrap());

        let trace_id = extract_or_generate_trace_id(&headers);
        assert_eq!(trace_id, "test-trace-123");

        let headers = HeaderMap::new();
        let trace_id = extract_or_generate_trace_id(&headers);
        assert!(!trace_id.is_empty());
        assert_ne!(trace_id, "test-trace-123");
    }
}
