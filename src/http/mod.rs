// ==========================================
// 工厂员工技能矩阵管理系统 - HTTP 层
// ==========================================
// 基于 axum：同步 API 在阻塞线程池执行，结果统一包装为 JSON 信封
// ==========================================

pub mod envelope;
pub mod routes;
pub mod server;

pub use envelope::ApiEnvelope;
pub use routes::{api_router, SharedState};
pub use server::{build_router, start_server};
