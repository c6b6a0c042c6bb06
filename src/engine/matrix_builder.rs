// ==========================================
// 工厂员工技能矩阵管理系统 - 技能矩阵构建向导
// ==========================================
// 状态机: Departments → Skills → Employees → Review
// 职责: 维护草稿（部门/列/行/单元格），校验步骤推进，生成矩阵快照
// 红线: 纯内存状态，不访问数据库
// ==========================================

use crate::domain::skill_matrix::{MatrixColumn, MatrixRow, SkillMatrix};
use crate::domain::types::{MatrixColumnKind, SkillLevel, WizardStep};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixBuilderError {
    #[error("当前步骤 {actual} 不允许该操作（需要 {expected}）")]
    WrongStep {
        expected: &'static str,
        actual: WizardStep,
    },

    #[error("步骤 {0} 未完成: {1}")]
    IncompleteStep(WizardStep, &'static str),

    #[error("已是第一步，无法后退")]
    AtFirstStep,

    #[error("已是最后一步，请直接完成")]
    AtLastStep,

    #[error("列已存在: {0}")]
    DuplicateColumn(String),

    #[error("列不存在: {0}")]
    UnknownColumn(String),

    #[error("员工已在矩阵中: {0}")]
    DuplicateEmployee(String),

    #[error("员工不在矩阵中: {0}")]
    UnknownEmployee(String),

    #[error("字段不能为空: {0}")]
    EmptyField(&'static str),
}

pub type BuilderResult<T> = Result<T, MatrixBuilderError>;

// ==========================================
// 导入记录
// ==========================================

/// 一行导入数据（员工工号 + 列标题 → 等级）
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixImportRecord {
    pub row_number: usize,
    pub employee_code: String,
    pub cells: Vec<(String, SkillLevel)>,
}

/// 被跳过的行/单元格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: String,
}

/// 导入合并结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub applied_rows: usize,
    pub applied_cells: usize,
    pub skipped: Vec<SkippedRow>,
}

// ==========================================
// MatrixDraft - 向导草稿
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixDraft {
    pub draft_id: String,
    pub step: WizardStep,
    pub department_ids: Vec<String>,
    pub columns: Vec<MatrixColumn>,
    pub rows: Vec<MatrixRow>,
    pub created_at: NaiveDateTime,
}

impl Default for MatrixDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixDraft {
    pub fn new() -> Self {
        Self {
            draft_id: uuid::Uuid::new_v4().to_string(),
            step: WizardStep::Departments,
            department_ids: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            created_at: chrono::Local::now().naive_local(),
        }
    }

    fn require_step(&self, allowed: &[WizardStep], expected: &'static str) -> BuilderResult<()> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(MatrixBuilderError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    // ===== Departments =====

    /// 选择部门（去重，保持输入顺序）
    ///
    /// `row_departments` 为已有行的员工 → 所属部门；
    /// 不在新选择中（或查不到部门）的员工行被移除。
    pub fn select_departments(
        &mut self,
        department_ids: Vec<String>,
        row_departments: &HashMap<String, String>,
    ) -> BuilderResult<()> {
        self.require_step(&[WizardStep::Departments], "DEPARTMENTS")?;

        let mut selected: Vec<String> = Vec::with_capacity(department_ids.len());
        for id in department_ids {
            let id = id.trim().to_string();
            if !id.is_empty() && !selected.contains(&id) {
                selected.push(id);
            }
        }
        if selected.is_empty() {
            return Err(MatrixBuilderError::IncompleteStep(
                WizardStep::Departments,
                "至少选择一个部门",
            ));
        }
        let before = self.rows.len();
        self.rows.retain(|row| {
            row_departments
                .get(&row.employee_id)
                .is_some_and(|dept| selected.contains(dept))
        });
        if self.rows.len() < before {
            debug!(
                draft_id = %self.draft_id,
                removed = before - self.rows.len(),
                "部门变更，移除不在所选部门的员工行"
            );
        }
        self.department_ids = selected;
        Ok(())
    }

    // ===== Skills =====

    /// 添加列；已有行补 None 单元格
    pub fn add_column(
        &mut self,
        kind: MatrixColumnKind,
        ref_id: String,
        label: String,
    ) -> BuilderResult<()> {
        self.require_step(&[WizardStep::Skills], "SKILLS")?;

        let label = label.trim().to_string();
        if label.is_empty() {
            return Err(MatrixBuilderError::EmptyField("label"));
        }
        if self.columns.iter().any(|c| c.label == label) {
            return Err(MatrixBuilderError::DuplicateColumn(label));
        }

        for row in &mut self.rows {
            row.cells.insert(label.clone(), SkillLevel::None);
        }
        self.columns.push(MatrixColumn { kind, ref_id, label });
        Ok(())
    }

    pub fn remove_column(&mut self, label: &str) -> BuilderResult<()> {
        self.require_step(&[WizardStep::Skills], "SKILLS")?;

        let before = self.columns.len();
        self.columns.retain(|c| c.label != label);
        if self.columns.len() == before {
            return Err(MatrixBuilderError::UnknownColumn(label.to_string()));
        }
        for row in &mut self.rows {
            row.cells.remove(label);
        }
        Ok(())
    }

    // ===== Employees =====

    /// 添加员工行，全部单元格初始化为 None
    pub fn add_employee(
        &mut self,
        employee_id: String,
        employee_code: String,
        employee_name: String,
    ) -> BuilderResult<()> {
        self.require_step(&[WizardStep::Employees], "EMPLOYEES")?;

        if self.rows.iter().any(|r| r.employee_id == employee_id) {
            return Err(MatrixBuilderError::DuplicateEmployee(employee_id));
        }

        let cells: BTreeMap<String, SkillLevel> = self
            .columns
            .iter()
            .map(|c| (c.label.clone(), SkillLevel::None))
            .collect();
        self.rows.push(MatrixRow {
            employee_id,
            employee_code,
            employee_name,
            cells,
        });
        Ok(())
    }

    pub fn remove_employee(&mut self, employee_id: &str) -> BuilderResult<()> {
        self.require_step(&[WizardStep::Employees], "EMPLOYEES")?;

        let before = self.rows.len();
        self.rows.retain(|r| r.employee_id != employee_id);
        if self.rows.len() == before {
            return Err(MatrixBuilderError::UnknownEmployee(employee_id.to_string()));
        }
        Ok(())
    }

    /// 设置单元格等级
    pub fn set_cell(
        &mut self,
        employee_id: &str,
        column_label: &str,
        level: SkillLevel,
    ) -> BuilderResult<()> {
        self.require_step(&[WizardStep::Employees, WizardStep::Review], "EMPLOYEES/REVIEW")?;

        if !self.columns.iter().any(|c| c.label == column_label) {
            return Err(MatrixBuilderError::UnknownColumn(column_label.to_string()));
        }
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.employee_id == employee_id)
            .ok_or_else(|| MatrixBuilderError::UnknownEmployee(employee_id.to_string()))?;
        row.cells.insert(column_label.to_string(), level);
        Ok(())
    }

    /// 合并导入数据
    ///
    /// 按工号匹配行、按标题匹配列；未知员工整行跳过，未知列逐格记录后跳过
    pub fn import_rows(&mut self, records: Vec<MatrixImportRecord>) -> BuilderResult<ImportOutcome> {
        self.require_step(&[WizardStep::Employees, WizardStep::Review], "EMPLOYEES/REVIEW")?;

        let mut outcome = ImportOutcome::default();
        for record in records {
            let Some(row) = self
                .rows
                .iter_mut()
                .find(|r| r.employee_code == record.employee_code)
            else {
                outcome.skipped.push(SkippedRow {
                    row_number: record.row_number,
                    reason: format!("员工工号不在矩阵中: {}", record.employee_code),
                });
                continue;
            };

            let mut applied = 0;
            for (label, level) in record.cells {
                if self.columns.iter().any(|c| c.label == label) {
                    row.cells.insert(label, level);
                    applied += 1;
                } else {
                    outcome.skipped.push(SkippedRow {
                        row_number: record.row_number,
                        reason: format!("列不存在: {}", label),
                    });
                }
            }
            outcome.applied_cells += applied;
            outcome.applied_rows += 1;
        }

        debug!(
            draft_id = %self.draft_id,
            applied_rows = outcome.applied_rows,
            skipped = outcome.skipped.len(),
            "矩阵导入合并完成"
        );
        Ok(outcome)
    }

    // ===== 步骤流转 =====

    /// 校验当前步骤并前进
    pub fn advance(&mut self) -> BuilderResult<WizardStep> {
        match self.step {
            WizardStep::Departments if self.department_ids.is_empty() => {
                return Err(MatrixBuilderError::IncompleteStep(
                    WizardStep::Departments,
                    "至少选择一个部门",
                ));
            }
            WizardStep::Skills if self.columns.is_empty() => {
                return Err(MatrixBuilderError::IncompleteStep(
                    WizardStep::Skills,
                    "至少添加一个技能或机台列",
                ));
            }
            WizardStep::Employees if self.rows.is_empty() => {
                return Err(MatrixBuilderError::IncompleteStep(
                    WizardStep::Employees,
                    "至少添加一名员工",
                ));
            }
            _ => {}
        }

        let next = self.step.next().ok_or(MatrixBuilderError::AtLastStep)?;
        debug!(draft_id = %self.draft_id, from = %self.step, to = %next, "向导前进");
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> BuilderResult<WizardStep> {
        let prev = self.step.prev().ok_or(MatrixBuilderError::AtFirstStep)?;
        self.step = prev;
        Ok(prev)
    }

    /// 生成矩阵快照（仅 Review 步骤）
    pub fn finalize(&self, name: &str, created_by: &str) -> BuilderResult<SkillMatrix> {
        self.require_step(&[WizardStep::Review], "REVIEW")?;

        let name = name.trim();
        if name.is_empty() {
            return Err(MatrixBuilderError::EmptyField("name"));
        }

        let now = chrono::Local::now().naive_local();
        Ok(SkillMatrix {
            matrix_id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            department_ids: self.department_ids.clone(),
            columns: self.columns.clone(),
            rows: self.rows.clone(),
            created_by: created_by.to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        })
    }
}
