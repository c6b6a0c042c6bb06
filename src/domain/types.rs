// ==========================================
// 工厂员工技能矩阵管理系统 - 领域类型定义
// ==========================================
// 技能等级、性别、工龄区间、导出格式、矩阵列类型、向导步骤
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 枚举值解析失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无法识别的{kind}: '{value}'")]
pub struct UnknownValueError {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValueError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ==========================================
// 技能等级 (Skill Level)
// ==========================================
// 顺序: None < Low < Medium < High < Expert
// 输入兼容: Advanced 视为 Expert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    None,
    Low,
    Medium,
    High,
    #[serde(alias = "Advanced")]
    Expert,
}

impl SkillLevel {
    /// 全部等级（升序）
    pub const ALL: [SkillLevel; 5] = [
        SkillLevel::None,
        SkillLevel::Low,
        SkillLevel::Medium,
        SkillLevel::High,
        SkillLevel::Expert,
    ];

    /// 满分
    pub const MAX_SCORE: i64 = 4;

    /// 等级分值: None=0, Low=1, Medium=2, High=3, Expert=4
    pub fn score(self) -> i64 {
        match self {
            SkillLevel::None => 0,
            SkillLevel::Low => 1,
            SkillLevel::Medium => 2,
            SkillLevel::High => 3,
            SkillLevel::Expert => 4,
        }
    }

    /// 分值反查等级（越界截断到 [0, 4]）
    pub fn from_score(score: i64) -> Self {
        match score {
            i64::MIN..=0 => SkillLevel::None,
            1 => SkillLevel::Low,
            2 => SkillLevel::Medium,
            3 => SkillLevel::High,
            _ => SkillLevel::Expert,
        }
    }

    /// 存储/展示用标签
    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::None => "None",
            SkillLevel::Low => "Low",
            SkillLevel::Medium => "Medium",
            SkillLevel::High => "High",
            SkillLevel::Expert => "Expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(SkillLevel::None),
            "low" => Ok(SkillLevel::Low),
            "medium" => Ok(SkillLevel::Medium),
            "high" => Ok(SkillLevel::High),
            "expert" | "advanced" => Ok(SkillLevel::Expert),
            _ => Err(UnknownValueError::new("技能等级", s)),
        }
    }
}

// ==========================================
// 性别 (Gender)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(UnknownValueError::new("性别", s)),
        }
    }
}

// ==========================================
// 工龄区间 (Experience Band)
// ==========================================
// 区间左闭右开: [0,1) [1,3) [3,5) [5,10) [10,∞)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceBand {
    #[serde(rename = "<1")]
    LessThanOne,
    #[serde(rename = "1-3")]
    OneToThree,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "5-10")]
    FiveToTen,
    #[serde(rename = "10+")]
    TenPlus,
}

impl ExperienceBand {
    pub const ALL: [ExperienceBand; 5] = [
        ExperienceBand::LessThanOne,
        ExperienceBand::OneToThree,
        ExperienceBand::ThreeToFive,
        ExperienceBand::FiveToTen,
        ExperienceBand::TenPlus,
    ];

    /// 按工龄（年）归档；负数按 0 处理
    pub fn from_years(years: f64) -> Self {
        let years = if years.is_finite() { years.max(0.0) } else { 0.0 };
        if years < 1.0 {
            ExperienceBand::LessThanOne
        } else if years < 3.0 {
            ExperienceBand::OneToThree
        } else if years < 5.0 {
            ExperienceBand::ThreeToFive
        } else if years < 10.0 {
            ExperienceBand::FiveToTen
        } else {
            ExperienceBand::TenPlus
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceBand::LessThanOne => "<1",
            ExperienceBand::OneToThree => "1-3",
            ExperienceBand::ThreeToFive => "3-5",
            ExperienceBand::FiveToTen => "5-10",
            ExperienceBand::TenPlus => "10+",
        }
    }
}

impl fmt::Display for ExperienceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// 导出格式 (Export Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportFormat {
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(UnknownValueError::new("导出格式", s)),
        }
    }
}

// ==========================================
// 导入文件格式 (Import Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Csv,
    Xlsx,
}

impl FromStr for ImportFormat {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Ok(ImportFormat::Csv),
            "xlsx" => Ok(ImportFormat::Xlsx),
            _ => Err(UnknownValueError::new("导入格式", s)),
        }
    }
}

// ==========================================
// 矩阵列类型 (Matrix Column Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatrixColumnKind {
    Skill,
    Machine,
}

// ==========================================
// 矩阵构建向导步骤 (Wizard Step)
// ==========================================
// 顺序: Departments → Skills → Employees → Review
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    Departments,
    Skills,
    Employees,
    Review,
}

impl WizardStep {
    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::Departments => Some(WizardStep::Skills),
            WizardStep::Skills => Some(WizardStep::Employees),
            WizardStep::Employees => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            WizardStep::Departments => None,
            WizardStep::Skills => Some(WizardStep::Departments),
            WizardStep::Employees => Some(WizardStep::Skills),
            WizardStep::Review => Some(WizardStep::Employees),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::Departments => write!(f, "DEPARTMENTS"),
            WizardStep::Skills => write!(f, "SKILLS"),
            WizardStep::Employees => write!(f, "EMPLOYEES"),
            WizardStep::Review => write!(f, "REVIEW"),
        }
    }
}
