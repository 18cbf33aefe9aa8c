//! AcademiQ - 多租户学校管理平台后端服务
//!
//! 基于 Actix Web 与 SeaORM，覆盖学业（成绩、考勤、评语）与财务（欠款、柜台缴费、
//! SPEI 转账、Stripe 银行卡）两条主线，并生成可校验的 PDF 收据与报告。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `integrations`: 外部服务客户端（Stripe、Anthropic Claude）
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod integrations;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
