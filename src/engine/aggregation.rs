// ==========================================
// 工厂员工技能矩阵管理系统 - 驾驶舱聚合引擎
// ==========================================
// 职责:
// - 员工分布（部门/性别/工龄区间）
// - 员工技能画像
// - 部门技能矩阵（员工 × 机台）
// - 机台覆盖度（合格人数、关键工位缺员）
// - 技能匹配百分比
// 红线: Engine 不拼 SQL，输入均为已加载的内存集合
// ==========================================

use crate::domain::department::Department;
use crate::domain::employee::Employee;
use crate::domain::skill::{EmployeeSkill, Machine, Skill};
use crate::domain::types::{ExperienceBand, Gender, SkillLevel};
use crate::engine::skill_score::{
    average_score, is_qualified, level_histogram, round1, round2, score_percentage, total_score,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

// ==========================================
// 输出结构
// ==========================================

/// 分布桶
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: String,
    pub label: String,
    pub count: i64,
}

/// 员工分布
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionReport {
    pub total_employees: i64,
    pub by_department: Vec<Bucket>,
    pub by_gender: Vec<Bucket>,
    pub by_experience: Vec<Bucket>,
}

/// 员工技能画像条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub employee_skill_id: String,
    pub skill_id: Option<String>,
    pub machine_id: Option<String>,
    pub label: String,
    pub level: SkillLevel,
    pub score: i64,
}

/// 员工技能画像
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSkillProfile {
    pub employee_id: String,
    pub employee_code: String,
    pub name: String,
    pub department_id: String,
    pub entries: Vec<ProfileEntry>,
    pub total_score: i64,
    pub average_score: Option<f64>,
    pub percentage: f64,
    pub histogram: BTreeMap<SkillLevel, i64>,
}

/// 部门矩阵列（机台）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentMatrixColumn {
    pub machine_id: String,
    pub name: String,
    pub is_critical_station: bool,
    pub female_eligible: bool,
    pub qualified_count: i64,
}

/// 部门矩阵行（员工）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentMatrixRow {
    pub employee_id: String,
    pub employee_code: String,
    pub name: String,
    pub levels: Vec<SkillLevel>, // 与 columns 对齐
    pub average_score: Option<f64>,
}

/// 部门技能矩阵
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentMatrixView {
    pub department_id: String,
    pub department_name: String,
    pub threshold: SkillLevel,
    pub columns: Vec<DepartmentMatrixColumn>,
    pub rows: Vec<DepartmentMatrixRow>,
}

/// 机台覆盖度
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineCoverage {
    pub machine_id: String,
    pub name: String,
    pub department_id: String,
    pub is_critical_station: bool,
    pub threshold: SkillLevel,
    pub employee_count: i64,
    pub assessed_count: i64,
    pub qualified_count: i64,
    pub qualified_percentage: f64,
    pub histogram: BTreeMap<SkillLevel, i64>,
    pub understaffed: bool, // 关键工位合格人数不足
}

/// 部门得分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentScore {
    pub department_id: String,
    pub name: String,
    pub employee_count: i64,
    pub average_score: Option<f64>,
    pub percentage: f64,
}

/// 驾驶舱概览
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub department_count: i64,
    pub employee_count: i64,
    pub manager_count: i64,
    pub skill_count: i64,
    pub machine_count: i64,
    pub critical_station_count: i64,
    pub average_skill_score: Option<f64>,
    pub skill_percentage: f64,
    pub level_histogram: BTreeMap<SkillLevel, i64>,
    pub departments: Vec<DepartmentScore>,
}

/// 概览计数输入
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryCounts {
    pub manager_count: i64,
    pub skill_count: i64,
}

/// 员工技能匹配结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub employee_id: String,
    pub threshold: SkillLevel,
    pub required: Vec<String>,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub percentage: f64,
}

// ==========================================
// 公共函数
// ==========================================

/// 技能匹配百分比
///
/// 要求列中等级 ≥ 阈值的占比 × 100（保留一位小数）；无要求时为 100
pub fn percentage_match(
    levels: &HashMap<String, SkillLevel>,
    required: &[String],
    threshold: SkillLevel,
) -> f64 {
    if required.is_empty() {
        return 100.0;
    }
    let matched = required
        .iter()
        .filter(|key| {
            let level = levels.get(key.as_str()).copied().unwrap_or(SkillLevel::None);
            is_qualified(level, threshold)
        })
        .count();
    round1(matched as f64 / required.len() as f64 * 100.0)
}

/// 员工技能条目的展示名（技能名优先，其次机台名）
fn entry_label(
    skill: &EmployeeSkill,
    skill_names: &HashMap<String, String>,
    machine_names: &HashMap<String, String>,
) -> String {
    let skill_label = skill.skill_id.as_ref().and_then(|id| skill_names.get(id));
    let machine_label = skill.machine_id.as_ref().and_then(|id| machine_names.get(id));
    match (skill_label, machine_label) {
        (Some(s), Some(m)) => format!("{} @ {}", s, m),
        (Some(s), None) => s.clone(),
        (None, Some(m)) => m.clone(),
        (None, None) => skill
            .skill_id
            .clone()
            .or_else(|| skill.machine_id.clone())
            .unwrap_or_default(),
    }
}

// ==========================================
// SkillAggregator - 聚合引擎
// ==========================================
pub struct SkillAggregator {
    threshold: SkillLevel,
    min_qualified_per_critical_station: i64,
}

impl SkillAggregator {
    pub fn new(threshold: SkillLevel, min_qualified_per_critical_station: i64) -> Self {
        Self {
            threshold,
            min_qualified_per_critical_station,
        }
    }

    pub fn threshold(&self) -> SkillLevel {
        self.threshold
    }

    /// 员工分布（部门/性别/工龄区间）
    ///
    /// 部门桶包含零员工的部门；性别与工龄桶包含全部取值
    #[instrument(skip_all, fields(employees = employees.len()))]
    pub fn distribution(&self, employees: &[Employee], departments: &[Department]) -> DistributionReport {
        let mut by_department: Vec<Bucket> = departments
            .iter()
            .map(|d| Bucket {
                key: d.department_id.clone(),
                label: d.name.clone(),
                count: employees
                    .iter()
                    .filter(|e| e.department_id == d.department_id)
                    .count() as i64,
            })
            .collect();
        by_department.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

        let by_gender = [Gender::Male, Gender::Female, Gender::Other]
            .iter()
            .map(|g| Bucket {
                key: g.as_str().to_string(),
                label: g.as_str().to_string(),
                count: employees.iter().filter(|e| e.gender == *g).count() as i64,
            })
            .collect();

        let by_experience = ExperienceBand::ALL
            .iter()
            .map(|band| Bucket {
                key: band.label().to_string(),
                label: format!("{} 年", band.label()),
                count: employees
                    .iter()
                    .filter(|e| e.experience_band() == *band)
                    .count() as i64,
            })
            .collect();

        DistributionReport {
            total_employees: employees.len() as i64,
            by_department,
            by_gender,
            by_experience,
        }
    }

    /// 员工技能画像
    pub fn employee_profile(
        &self,
        employee: &Employee,
        skills: &[EmployeeSkill],
        skill_names: &HashMap<String, String>,
        machine_names: &HashMap<String, String>,
    ) -> EmployeeSkillProfile {
        let mut entries: Vec<ProfileEntry> = skills
            .iter()
            .filter(|s| s.employee_id == employee.employee_id)
            .map(|s| ProfileEntry {
                employee_skill_id: s.employee_skill_id.clone(),
                skill_id: s.skill_id.clone(),
                machine_id: s.machine_id.clone(),
                label: entry_label(s, skill_names, machine_names),
                level: s.level,
                score: s.level.score(),
            })
            .collect();
        entries.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.label.cmp(&b.label)));

        let levels: Vec<SkillLevel> = entries.iter().map(|e| e.level).collect();

        EmployeeSkillProfile {
            employee_id: employee.employee_id.clone(),
            employee_code: employee.employee_code.clone(),
            name: employee.name.clone(),
            department_id: employee.department_id.clone(),
            total_score: total_score(levels.iter().copied()),
            average_score: average_score(levels.iter().copied()).map(round2),
            percentage: score_percentage(levels.iter().copied()),
            histogram: level_histogram(levels),
            entries,
        }
    }

    /// 部门技能矩阵（员工 × 机台）
    ///
    /// 未评估的单元格记为 None
    #[instrument(skip_all, fields(department_id = %department.department_id))]
    pub fn department_matrix(
        &self,
        department: &Department,
        employees: &[Employee],
        machines: &[Machine],
        skills: &[EmployeeSkill],
    ) -> DepartmentMatrixView {
        let lookup = machine_level_lookup(skills);

        let rows: Vec<DepartmentMatrixRow> = employees
            .iter()
            .filter(|e| e.department_id == department.department_id)
            .map(|e| {
                let levels: Vec<SkillLevel> = machines
                    .iter()
                    .map(|m| {
                        lookup
                            .get(&(e.employee_id.as_str(), m.machine_id.as_str()))
                            .copied()
                            .unwrap_or(SkillLevel::None)
                    })
                    .collect();
                DepartmentMatrixRow {
                    employee_id: e.employee_id.clone(),
                    employee_code: e.employee_code.clone(),
                    name: e.name.clone(),
                    average_score: average_score(levels.iter().copied()).map(round2),
                    levels,
                }
            })
            .collect();

        let columns = machines
            .iter()
            .enumerate()
            .map(|(idx, m)| DepartmentMatrixColumn {
                machine_id: m.machine_id.clone(),
                name: m.name.clone(),
                is_critical_station: m.is_critical_station,
                female_eligible: m.female_eligible,
                qualified_count: rows
                    .iter()
                    .filter(|r| is_qualified(r.levels[idx], self.threshold))
                    .count() as i64,
            })
            .collect();

        DepartmentMatrixView {
            department_id: department.department_id.clone(),
            department_name: department.name.clone(),
            threshold: self.threshold,
            columns,
            rows,
        }
    }

    /// 机台覆盖度
    ///
    /// 分母为机台所属部门的全部未删除员工；未评估员工计入 None
    pub fn machine_coverage(
        &self,
        machine: &Machine,
        department_employees: &[Employee],
        machine_skills: &[EmployeeSkill],
    ) -> MachineCoverage {
        let lookup = machine_level_lookup(machine_skills);

        let levels: Vec<SkillLevel> = department_employees
            .iter()
            .filter(|e| e.department_id == machine.department_id)
            .map(|e| {
                lookup
                    .get(&(e.employee_id.as_str(), machine.machine_id.as_str()))
                    .copied()
                    .unwrap_or(SkillLevel::None)
            })
            .collect();

        let employee_count = levels.len() as i64;
        let assessed_count = department_employees
            .iter()
            .filter(|e| {
                e.department_id == machine.department_id
                    && lookup.contains_key(&(e.employee_id.as_str(), machine.machine_id.as_str()))
            })
            .count() as i64;
        let qualified_count = levels
            .iter()
            .filter(|l| is_qualified(**l, self.threshold))
            .count() as i64;
        let qualified_percentage = if employee_count == 0 {
            0.0
        } else {
            round1(qualified_count as f64 / employee_count as f64 * 100.0)
        };

        MachineCoverage {
            machine_id: machine.machine_id.clone(),
            name: machine.name.clone(),
            department_id: machine.department_id.clone(),
            is_critical_station: machine.is_critical_station,
            threshold: self.threshold,
            employee_count,
            assessed_count,
            qualified_count,
            qualified_percentage,
            histogram: level_histogram(levels),
            understaffed: machine.is_critical_station
                && qualified_count < self.min_qualified_per_critical_station,
        }
    }

    /// 员工对指定列的技能匹配
    ///
    /// 列键可为 skill_id 或 machine_id；同一列多条记录时取最高等级
    pub fn employee_match(
        &self,
        employee_id: &str,
        skills: &[EmployeeSkill],
        required: &[String],
    ) -> MatchResult {
        let mut levels: HashMap<String, SkillLevel> = HashMap::new();
        for s in skills.iter().filter(|s| s.employee_id == employee_id) {
            for key in s.skill_id.iter().chain(s.machine_id.iter()) {
                let entry = levels.entry(key.clone()).or_insert(SkillLevel::None);
                if s.level > *entry {
                    *entry = s.level;
                }
            }
        }

        let (matched, missing): (Vec<String>, Vec<String>) = required.iter().cloned().partition(|key| {
            is_qualified(
                levels.get(key).copied().unwrap_or(SkillLevel::None),
                self.threshold,
            )
        });

        MatchResult {
            employee_id: employee_id.to_string(),
            threshold: self.threshold,
            required: required.to_vec(),
            percentage: percentage_match(&levels, required, self.threshold),
            matched,
            missing,
        }
    }

    /// 驾驶舱概览
    #[instrument(skip_all)]
    pub fn summary(
        &self,
        departments: &[Department],
        employees: &[Employee],
        machines: &[Machine],
        skills: &[EmployeeSkill],
        counts: SummaryCounts,
    ) -> DashboardSummary {
        let all_levels: Vec<SkillLevel> = skills.iter().map(|s| s.level).collect();

        let employee_department: HashMap<&str, &str> = employees
            .iter()
            .map(|e| (e.employee_id.as_str(), e.department_id.as_str()))
            .collect();

        let mut department_scores: Vec<DepartmentScore> = departments
            .iter()
            .map(|d| {
                let levels: Vec<SkillLevel> = skills
                    .iter()
                    .filter(|s| {
                        employee_department.get(s.employee_id.as_str()).copied()
                            == Some(d.department_id.as_str())
                    })
                    .map(|s| s.level)
                    .collect();
                DepartmentScore {
                    department_id: d.department_id.clone(),
                    name: d.name.clone(),
                    employee_count: employees
                        .iter()
                        .filter(|e| e.department_id == d.department_id)
                        .count() as i64,
                    average_score: average_score(levels.iter().copied()).map(round2),
                    percentage: score_percentage(levels),
                }
            })
            .collect();
        department_scores.sort_by(|a, b| {
            b.percentage
                .partial_cmp(&a.percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        DashboardSummary {
            department_count: departments.len() as i64,
            employee_count: employees.len() as i64,
            manager_count: counts.manager_count,
            skill_count: counts.skill_count,
            machine_count: machines.len() as i64,
            critical_station_count: machines.iter().filter(|m| m.is_critical_station).count() as i64,
            average_skill_score: average_score(all_levels.iter().copied()).map(round2),
            skill_percentage: score_percentage(all_levels.iter().copied()),
            level_histogram: level_histogram(all_levels),
            departments: department_scores,
        }
    }
}

/// (employee_id, machine_id) → 最高等级
fn machine_level_lookup(skills: &[EmployeeSkill]) -> HashMap<(&str, &str), SkillLevel> {
    let mut lookup: HashMap<(&str, &str), SkillLevel> = HashMap::new();
    for s in skills {
        if let Some(machine_id) = s.machine_id.as_deref() {
            let entry = lookup
                .entry((s.employee_id.as_str(), machine_id))
                .or_insert(s.level);
            if s.level > *entry {
                *entry = s.level;
            }
        }
    }
    lookup
}

/// 技能名称索引
pub fn skill_name_index(skills: &[Skill]) -> HashMap<String, String> {
    skills
        .iter()
        .map(|s| (s.skill_id.clone(), s.name.clone()))
        .collect()
}

/// 机台名称索引
pub fn machine_name_index(machines: &[Machine]) -> HashMap<String, String> {
    machines
        .iter()
        .map(|m| (m.machine_id.clone(), m.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dept(id: &str, name: &str) -> Department {
        let mut d = Department::new(name.to_string(), None);
        d.department_id = id.to_string();
        d
    }

    fn emp(id: &str, dept_id: &str, gender: Gender, years: f64) -> Employee {
        let mut e = Employee::new(
            format!("C-{}", id),
            format!("员工{}", id),
            gender,
            dept_id.to_string(),
            years,
        );
        e.employee_id = id.to_string();
        e
    }

    fn machine(id: &str, dept_id: &str, critical: bool) -> Machine {
        let mut m = Machine::new(format!("机台{}", id), dept_id.to_string(), critical, true);
        m.machine_id = id.to_string();
        m
    }

    fn on_machine(emp_id: &str, machine_id: &str, level: SkillLevel) -> EmployeeSkill {
        EmployeeSkill::new(emp_id.to_string(), None, Some(machine_id.to_string()), level)
    }

    #[test]
    fn test_distribution_分桶() {
        let departments = vec![dept("D1", "装配"), dept("D2", "焊接"), dept("D3", "空部门")];
        let employees = vec![
            emp("E1", "D1", Gender::Male, 0.5),
            emp("E2", "D1", Gender::Female, 4.0),
            emp("E3", "D2", Gender::Female, 12.0),
        ];

        let report = SkillAggregator::new(SkillLevel::Medium, 2).distribution(&employees, &departments);
        assert_eq!(report.total_employees, 3);
        assert_eq!(report.by_department[0].key, "D1");
        assert_eq!(report.by_department[0].count, 2);
        assert_eq!(report.by_department.len(), 3);
        assert_eq!(report.by_department[2].count, 0);

        let female = report.by_gender.iter().find(|b| b.key == "Female").unwrap();
        assert_eq!(female.count, 2);

        let counts: Vec<i64> = report.by_experience.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_department_matrix_未评估为none() {
        let d = dept("D1", "装配");
        let employees = vec![emp("E1", "D1", Gender::Male, 2.0), emp("E2", "D1", Gender::Male, 2.0)];
        let machines = vec![machine("M1", "D1", true), machine("M2", "D1", false)];
        let skills = vec![
            on_machine("E1", "M1", SkillLevel::Expert),
            on_machine("E2", "M1", SkillLevel::Low),
            on_machine("E2", "M2", SkillLevel::High),
        ];

        let view = SkillAggregator::new(SkillLevel::Medium, 2).department_matrix(&d, &employees, &machines, &skills);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].levels, vec![SkillLevel::Expert, SkillLevel::None]);
        assert_eq!(view.rows[0].average_score, Some(2.0));
        assert_eq!(view.columns[0].qualified_count, 1);
        assert_eq!(view.columns[1].qualified_count, 1);
    }

    #[test]
    fn test_machine_coverage_关键工位缺员() {
        let employees = vec![
            emp("E1", "D1", Gender::Male, 1.0),
            emp("E2", "D1", Gender::Female, 1.0),
            emp("E3", "D1", Gender::Male, 1.0),
        ];
        let m = machine("M1", "D1", true);
        let skills = vec![
            on_machine("E1", "M1", SkillLevel::High),
            on_machine("E2", "M1", SkillLevel::Low),
        ];

        let coverage = SkillAggregator::new(SkillLevel::Medium, 2).machine_coverage(&m, &employees, &skills);
        assert_eq!(coverage.employee_count, 3);
        assert_eq!(coverage.assessed_count, 2);
        assert_eq!(coverage.qualified_count, 1);
        assert_eq!(coverage.qualified_percentage, 33.3);
        assert_eq!(coverage.histogram[&SkillLevel::None], 1);
        assert!(coverage.understaffed);

        let relaxed = SkillAggregator::new(SkillLevel::Low, 2).machine_coverage(&m, &employees, &skills);
        assert!(!relaxed.understaffed);
    }

    #[test]
    fn test_percentage_match() {
        let mut levels = HashMap::new();
        levels.insert("M1".to_string(), SkillLevel::High);
        levels.insert("M2".to_string(), SkillLevel::Low);

        let required = vec!["M1".to_string(), "M2".to_string(), "M3".to_string()];
        assert_eq!(percentage_match(&levels, &required, SkillLevel::Medium), 33.3);
        assert_eq!(percentage_match(&levels, &[], SkillLevel::Medium), 100.0);
        assert_eq!(percentage_match(&levels, &required[..2], SkillLevel::Low), 100.0);
    }

    #[test]
    fn test_employee_match_取最高等级() {
        let skills = vec![
            EmployeeSkill::new("E1".into(), Some("S1".into()), Some("M1".into()), SkillLevel::Low),
            on_machine("E1", "M1", SkillLevel::Expert),
        ];
        let result = SkillAggregator::new(SkillLevel::Medium, 2).employee_match(
            "E1",
            &skills,
            &["M1".to_string(), "S1".to_string()],
        );
        assert_eq!(result.matched, vec!["M1".to_string()]);
        assert_eq!(result.missing, vec!["S1".to_string()]);
        assert_eq!(result.percentage, 50.0);
    }

    #[test]
    fn test_employee_profile_排序与得分() {
        let e = emp("E1", "D1", Gender::Male, 2.0);
        let skills = vec![
            EmployeeSkill::new("E1".into(), Some("S1".into()), None, SkillLevel::Medium),
            on_machine("E1", "M1", SkillLevel::Expert),
            on_machine("E2", "M1", SkillLevel::Low),
        ];
        let mut skill_names = HashMap::new();
        skill_names.insert("S1".to_string(), "读图".to_string());
        let mut machine_names = HashMap::new();
        machine_names.insert("M1".to_string(), "冲床".to_string());

        let profile = SkillAggregator::new(SkillLevel::Medium, 2)
            .employee_profile(&e, &skills, &skill_names, &machine_names);
        assert_eq!(profile.entries.len(), 2);
        assert_eq!(profile.entries[0].label, "冲床");
        assert_eq!(profile.total_score, 6);
        assert_eq!(profile.average_score, Some(3.0));
        assert_eq!(profile.percentage, 75.0);
    }

    #[test]
    fn test_summary_部门得分() {
        let departments = vec![dept("D1", "装配"), dept("D2", "焊接")];
        let employees = vec![emp("E1", "D1", Gender::Male, 1.0), emp("E2", "D2", Gender::Male, 1.0)];
        let machines = vec![machine("M1", "D1", true), machine("M2", "D2", false)];
        let skills = vec![
            on_machine("E1", "M1", SkillLevel::Expert),
            on_machine("E2", "M2", SkillLevel::Low),
        ];

        let summary = SkillAggregator::new(SkillLevel::Medium, 2).summary(
            &departments,
            &employees,
            &machines,
            &skills,
            SummaryCounts { manager_count: 1, skill_count: 0 },
        );
        assert_eq!(summary.employee_count, 2);
        assert_eq!(summary.critical_station_count, 1);
        assert_eq!(summary.average_skill_score, Some(2.5));
        assert_eq!(summary.departments[0].department_id, "D1");
        assert_eq!(summary.departments[0].percentage, 100.0);
        assert_eq!(summary.departments[1].percentage, 25.0);
    }
}
