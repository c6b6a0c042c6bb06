// ==========================================
// 工厂员工技能矩阵管理系统 - 引擎层
// ==========================================
// 职责: 技能评分、驾驶舱聚合、矩阵构建向导
// 红线: Engine 不拼 SQL，输入输出均为领域对象
// ==========================================

pub mod aggregation;
pub mod matrix_builder;
pub mod skill_score;

// 重导出核心引擎
pub use aggregation::{
    percentage_match, DashboardSummary, DepartmentMatrixView, DistributionReport,
    EmployeeSkillProfile, MachineCoverage, MatchResult, SkillAggregator, SummaryCounts,
};
pub use matrix_builder::{
    ImportOutcome, MatrixBuilderError, MatrixDraft, MatrixImportRecord, SkippedRow,
};
pub use skill_score::{average_score, level_histogram, score_percentage, total_score};
