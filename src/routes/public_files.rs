use actix_files::Files;
use actix_web::web;

use crate::config::AppConfig;

/// 生成的收据与报告 PDF，按文件名直接访问
pub fn configure_public_file_routes(cfg: &mut web::ServiceConfig) {
    let config = AppConfig::get();
    cfg.service(Files::new("/recibos", config.receipts_path()).prefer_utf8(true))
        .service(Files::new("/informes", config.reports_path()).prefer_utf8(true));
}
