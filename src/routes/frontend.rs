//! 前端静态资源路由
//!
//! SPA 构建产物通过 rust-embed 嵌入二进制，未命中的路径回退到 index.html。
//! 以 `api/` 开头的未知路径返回 JSON 404，避免前端页面掩盖接口错误。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::models::{ApiResponse, ErrorCode};

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

fn get_mime_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match ext {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "webmanifest" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        "map" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Vite 产物带 hash，可以长期缓存
fn is_immutable_asset(path: &str) -> bool {
    path.starts_with("assets/")
}

fn is_api_path(path: &str) -> bool {
    path == "api" || path.starts_with("api/")
}

fn not_built_page() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(
            r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>AcademiQ</title></head>
<body>
    <h1>Interfaz no disponible</h1>
    <p>El frontend no ha sido compilado: <code>cd frontend &amp;&amp; npm run build</code></p>
</body>
</html>"#,
        )
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    if is_api_path(path) {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("No route for /{path}"),
        )));
    }

    let (asset, file_path) = match FrontendAssets::get(path) {
        Some(asset) if !path.is_empty() => (Some(asset), path),
        _ => (FrontendAssets::get("index.html"), "index.html"),
    };

    let Some(asset) = asset else {
        return Ok(not_built_page());
    };

    let cache_control = if is_immutable_asset(file_path) {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache"
    };

    Ok(HttpResponse::Ok()
        .content_type(get_mime_type(file_path))
        .insert_header(("Cache-Control", cache_control))
        .body(asset.data.into_owned()))
}

/// 必须最后注册，作为兜底路由
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("assets/app-1a2b.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(get_mime_type("recibo.pdf"), "application/pdf");
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_api_paths_are_not_spa_routes() {
        assert!(is_api_path("api/unknown"));
        assert!(is_api_path("api"));
        assert!(!is_api_path("apiary"));
        assert!(!is_api_path("alumnos/7"));
    }

    #[test]
    fn test_immutable_assets() {
        assert!(is_immutable_asset("assets/index-3f9a.css"));
        assert!(!is_immutable_asset("index.html"));
    }
}
