// ==========================================
// 工厂员工技能矩阵管理系统 - 技能矩阵 API
// ==========================================
// 职责:
// - 向导草稿（进程内注册表，不落库）
// - 已保存矩阵的查询/删除
// - 矩阵文件导入（CSV/Excel）与 CSV 导出（记录导出日志）
// ==========================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::export_log::ExportLog;
use crate::domain::skill_matrix::{SkillMatrix, SkillMatrixSummary};
use crate::domain::types::{ExportFormat, ImportFormat, MatrixColumnKind, SkillLevel, UnknownValueError};
use crate::engine::matrix_builder::{ImportOutcome, MatrixDraft};
use crate::importer::{parser_for, MatrixCsvExporter, MatrixRecordMapper};
use crate::repository::{
    DepartmentRepository, EmployeeRepository, ExportLogRepository, MachineRepository,
    SkillMatrixRepository, SkillRepository,
};

/// 导出日志默认返回条数
pub const DEFAULT_EXPORT_LOG_LIMIT: i64 = 100;

/// 选择部门请求
#[derive(Debug, Clone, Deserialize)]
pub struct SelectDepartmentsRequest {
    pub department_ids: Vec<String>,
}

/// 添加列请求（label 缺省时取技能/机台名称）
#[derive(Debug, Clone, Deserialize)]
pub struct AddColumnRequest {
    pub kind: MatrixColumnKind,
    pub ref_id: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// 添加员工请求
#[derive(Debug, Clone, Deserialize)]
pub struct AddEmployeeRequest {
    pub employee_id: String,
}

/// 设置单元格请求
#[derive(Debug, Clone, Deserialize)]
pub struct SetCellRequest {
    pub employee_id: String,
    pub column_label: String,
    pub level: String,
}

/// 完成向导请求
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeRequest {
    pub name: String,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// 导出文件
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub row_count: i64,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

// ==========================================
// MatrixApi - 技能矩阵 API
// ==========================================
pub struct MatrixApi {
    drafts: Mutex<HashMap<String, MatrixDraft>>,
    matrix_repo: Arc<SkillMatrixRepository>,
    export_log_repo: Arc<ExportLogRepository>,
    department_repo: Arc<DepartmentRepository>,
    employee_repo: Arc<EmployeeRepository>,
    skill_repo: Arc<SkillRepository>,
    machine_repo: Arc<MachineRepository>,
}

impl MatrixApi {
    pub fn new(
        matrix_repo: Arc<SkillMatrixRepository>,
        export_log_repo: Arc<ExportLogRepository>,
        department_repo: Arc<DepartmentRepository>,
        employee_repo: Arc<EmployeeRepository>,
        skill_repo: Arc<SkillRepository>,
        machine_repo: Arc<MachineRepository>,
    ) -> Self {
        Self {
            drafts: Mutex::new(HashMap::new()),
            matrix_repo,
            export_log_repo,
            department_repo,
            employee_repo,
            skill_repo,
            machine_repo,
        }
    }

    /// 在草稿上执行操作，返回操作后的草稿快照
    fn with_draft<F>(&self, draft_id: &str, op: F) -> ApiResult<MatrixDraft>
    where
        F: FnOnce(&mut MatrixDraft) -> ApiResult<()>,
    {
        let mut drafts = self
            .drafts
            .lock()
            .map_err(|e| ApiError::InternalError(format!("草稿注册表锁获取失败: {}", e)))?;
        let draft = drafts
            .get_mut(draft_id)
            .ok_or_else(|| ApiError::NotFound(format!("矩阵草稿(id={})不存在", draft_id)))?;
        op(draft)?;
        Ok(draft.clone())
    }

    // ==========================================
    // 向导草稿
    // ==========================================

    pub fn create_draft(&self) -> ApiResult<MatrixDraft> {
        let draft = MatrixDraft::new();
        let mut drafts = self
            .drafts
            .lock()
            .map_err(|e| ApiError::InternalError(format!("草稿注册表锁获取失败: {}", e)))?;
        drafts.insert(draft.draft_id.clone(), draft.clone());
        info!(draft_id = %draft.draft_id, "矩阵草稿已创建");
        Ok(draft)
    }

    pub fn get_draft(&self, draft_id: &str) -> ApiResult<MatrixDraft> {
        self.with_draft(draft_id, |_| Ok(()))
    }

    pub fn discard_draft(&self, draft_id: &str) -> ApiResult<()> {
        let mut drafts = self
            .drafts
            .lock()
            .map_err(|e| ApiError::InternalError(format!("草稿注册表锁获取失败: {}", e)))?;
        drafts
            .remove(draft_id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("矩阵草稿(id={})不存在", draft_id)))
    }

    /// 选择部门（部门必须存在）
    pub fn select_departments(
        &self,
        draft_id: &str,
        request: SelectDepartmentsRequest,
    ) -> ApiResult<MatrixDraft> {
        for id in &request.department_ids {
            if !id.trim().is_empty() && self.department_repo.find_by_id(id.trim())?.is_none() {
                return Err(ApiError::ValidationError(format!("部门(id={})不存在", id)));
            }
        }
        let row_employee_ids: Vec<String> = self
            .get_draft(draft_id)?
            .rows
            .into_iter()
            .map(|row| row.employee_id)
            .collect();
        let mut row_departments = HashMap::with_capacity(row_employee_ids.len());
        for employee_id in row_employee_ids {
            if let Some(employee) = self.employee_repo.find_by_id(&employee_id)? {
                row_departments.insert(employee_id, employee.department_id);
            }
        }

        self.with_draft(draft_id, |draft| {
            Ok(draft.select_departments(request.department_ids, &row_departments)?)
        })
    }

    /// 添加技能/机台列
    pub fn add_column(&self, draft_id: &str, request: AddColumnRequest) -> ApiResult<MatrixDraft> {
        let default_label = match request.kind {
            MatrixColumnKind::Skill => self
                .skill_repo
                .find_by_id(&request.ref_id)?
                .map(|s| s.name)
                .ok_or_else(|| ApiError::ValidationError(format!("技能(id={})不存在", request.ref_id)))?,
            MatrixColumnKind::Machine => self
                .machine_repo
                .find_by_id(&request.ref_id)?
                .map(|m| m.name)
                .ok_or_else(|| ApiError::ValidationError(format!("机台(id={})不存在", request.ref_id)))?,
        };
        let label = request
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(default_label);

        self.with_draft(draft_id, |draft| {
            Ok(draft.add_column(request.kind, request.ref_id, label)?)
        })
    }

    pub fn remove_column(&self, draft_id: &str, label: &str) -> ApiResult<MatrixDraft> {
        self.with_draft(draft_id, |draft| Ok(draft.remove_column(label)?))
    }

    /// 添加员工行（员工须属于已选部门）
    pub fn add_employee(&self, draft_id: &str, request: AddEmployeeRequest) -> ApiResult<MatrixDraft> {
        let employee = self
            .employee_repo
            .find_by_id(&request.employee_id)?
            .ok_or_else(|| {
                ApiError::ValidationError(format!("员工(id={})不存在", request.employee_id))
            })?;

        self.with_draft(draft_id, |draft| {
            if !draft.department_ids.contains(&employee.department_id) {
                return Err(ApiError::ValidationError(format!(
                    "员工 {} 不属于已选部门",
                    employee.employee_code
                )));
            }
            Ok(draft.add_employee(employee.employee_id, employee.employee_code, employee.name)?)
        })
    }

    pub fn remove_employee(&self, draft_id: &str, employee_id: &str) -> ApiResult<MatrixDraft> {
        self.with_draft(draft_id, |draft| Ok(draft.remove_employee(employee_id)?))
    }

    pub fn set_cell(&self, draft_id: &str, request: SetCellRequest) -> ApiResult<MatrixDraft> {
        let level: SkillLevel = request
            .level
            .parse()
            .map_err(|e: UnknownValueError| ApiError::InvalidInput(e.to_string()))?;
        self.with_draft(draft_id, |draft| {
            Ok(draft.set_cell(&request.employee_id, &request.column_label, level)?)
        })
    }

    pub fn advance(&self, draft_id: &str) -> ApiResult<MatrixDraft> {
        self.with_draft(draft_id, |draft| {
            draft.advance()?;
            Ok(())
        })
    }

    pub fn back(&self, draft_id: &str) -> ApiResult<MatrixDraft> {
        self.with_draft(draft_id, |draft| {
            draft.back()?;
            Ok(())
        })
    }

    /// 导入矩阵文件并合并到草稿
    ///
    /// # 返回
    /// 合并结果（含解析阶段与合并阶段的跳过行）
    pub fn import_file(
        &self,
        draft_id: &str,
        format: &str,
        bytes: &[u8],
    ) -> ApiResult<ImportOutcome> {
        let format: ImportFormat = format
            .parse()
            .map_err(|e: UnknownValueError| ApiError::InvalidInput(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput("导入文件为空".to_string()));
        }

        let table = parser_for(format).parse_bytes(bytes)?;
        let mapped = MatrixRecordMapper.map(&table)?;

        let mut outcome = ImportOutcome::default();
        self.with_draft(draft_id, |draft| {
            outcome = draft.import_rows(mapped.records)?;
            Ok(())
        })?;

        let mut skipped = mapped.skipped;
        skipped.extend(outcome.skipped);
        skipped.sort_by_key(|s| s.row_number);
        outcome.skipped = skipped;

        if !outcome.skipped.is_empty() {
            warn!(draft_id, skipped = outcome.skipped.len(), "矩阵导入存在跳过行");
        }
        Ok(outcome)
    }

    /// 完成向导：生成矩阵快照并保存，草稿随之移除
    pub fn finalize(&self, draft_id: &str, request: FinalizeRequest) -> ApiResult<SkillMatrix> {
        let created_by = request
            .created_by
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "system".to_string());

        let mut drafts = self
            .drafts
            .lock()
            .map_err(|e| ApiError::InternalError(format!("草稿注册表锁获取失败: {}", e)))?;
        let draft = drafts
            .get(draft_id)
            .ok_or_else(|| ApiError::NotFound(format!("矩阵草稿(id={})不存在", draft_id)))?;

        let matrix = draft.finalize(&request.name, &created_by)?;
        self.matrix_repo.insert(&matrix)?;
        drafts.remove(draft_id);

        info!(matrix_id = %matrix.matrix_id, rows = matrix.rows.len(), "技能矩阵已保存");
        Ok(matrix)
    }

    // ==========================================
    // 已保存矩阵
    // ==========================================

    pub fn list_matrices(&self) -> ApiResult<Vec<SkillMatrixSummary>> {
        Ok(self
            .matrix_repo
            .list()?
            .iter()
            .map(SkillMatrixSummary::from)
            .collect())
    }

    pub fn get_matrix(&self, matrix_id: &str) -> ApiResult<SkillMatrix> {
        self.matrix_repo
            .find_by_id(matrix_id)?
            .ok_or_else(|| ApiError::NotFound(format!("技能矩阵(id={})不存在", matrix_id)))
    }

    pub fn delete_matrix(&self, matrix_id: &str) -> ApiResult<()> {
        Ok(self.matrix_repo.soft_delete(matrix_id)?)
    }

    /// 导出矩阵为 CSV 并记录导出日志
    pub fn export_matrix(&self, matrix_id: &str, exported_by: Option<&str>) -> ApiResult<ExportedFile> {
        let matrix = self.get_matrix(matrix_id)?;
        let bytes = MatrixCsvExporter.export(&matrix)?;
        let file_name = MatrixCsvExporter::file_name(&matrix);
        let row_count = matrix.rows.len() as i64;

        let log = ExportLog::new(
            Some(matrix.matrix_id.clone()),
            ExportFormat::Csv,
            file_name.clone(),
            row_count,
            exported_by.unwrap_or("system").to_string(),
        );
        self.export_log_repo.insert(&log)?;

        info!(matrix_id, file_name = %file_name, row_count, "技能矩阵已导出");
        Ok(ExportedFile {
            file_name,
            content_type: "text/csv; charset=utf-8",
            row_count,
            bytes,
        })
    }

    pub fn list_export_logs(
        &self,
        matrix_id: Option<&str>,
        limit: Option<i64>,
    ) -> ApiResult<Vec<ExportLog>> {
        let limit = limit.unwrap_or(DEFAULT_EXPORT_LOG_LIMIT);
        if limit <= 0 {
            return Err(ApiError::InvalidInput(format!("limit 必须为正数: {}", limit)));
        }
        Ok(self.export_log_repo.list(matrix_id, limit)?)
    }
}
