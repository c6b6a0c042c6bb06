// ==========================================
// 工厂员工技能矩阵管理系统 - 应用层
// ==========================================
// 职责: 组装共享连接、Repository 与 API 实例，供 HTTP 层使用
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
