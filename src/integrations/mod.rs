//! 第三方 HTTP 接口（Stripe、Anthropic Claude）
//!
//! 只实现业务需要的几个调用，不是通用 SDK。

pub mod claude;
pub mod stripe;

pub use claude::ClaudeClient;
pub use stripe::StripeClient;
