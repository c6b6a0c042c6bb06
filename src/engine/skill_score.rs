// ==========================================
// 工厂员工技能矩阵管理系统 - 技能评分
// ==========================================
// 映射: None=0, Low=1, Medium=2, High=3, Expert(Advanced)=4
// 职责: 求和、平均、百分比、等级分布
// 红线: 纯函数，不访问数据库
// ==========================================

use crate::domain::types::SkillLevel;
use std::collections::BTreeMap;

/// 保留一位小数
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 总分
pub fn total_score<I>(levels: I) -> i64
where
    I: IntoIterator<Item = SkillLevel>,
{
    levels.into_iter().map(SkillLevel::score).sum()
}

/// 平均分（空集合返回 None）
pub fn average_score<I>(levels: I) -> Option<f64>
where
    I: IntoIterator<Item = SkillLevel>,
{
    let (sum, count) = levels
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), level| (sum + level.score(), count + 1));

    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// 技能百分比 = 平均分 / 满分 × 100（空集合为 0）
pub fn score_percentage<I>(levels: I) -> f64
where
    I: IntoIterator<Item = SkillLevel>,
{
    average_score(levels)
        .map(|avg| round1(avg / SkillLevel::MAX_SCORE as f64 * 100.0))
        .unwrap_or(0.0)
}

/// 等级分布（五个等级全部出现，缺失计 0）
pub fn level_histogram<I>(levels: I) -> BTreeMap<SkillLevel, i64>
where
    I: IntoIterator<Item = SkillLevel>,
{
    let mut histogram: BTreeMap<SkillLevel, i64> =
        SkillLevel::ALL.iter().map(|l| (*l, 0)).collect();
    for level in levels {
        *histogram.entry(level).or_insert(0) += 1;
    }
    histogram
}

/// 是否达到合格阈值
pub fn is_qualified(level: SkillLevel, threshold: SkillLevel) -> bool {
    level >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use SkillLevel::*;

    #[test]
    fn test_total_and_average() {
        let levels = vec![None, Low, Medium, High, Expert];
        assert_eq!(total_score(levels.clone()), 10);
        assert_eq!(average_score(levels.clone()), Some(2.0));
        assert_eq!(score_percentage(levels), 50.0);
    }

    #[test]
    fn test_空集合() {
        assert_eq!(total_score(Vec::<SkillLevel>::new()), 0);
        assert_eq!(average_score(Vec::<SkillLevel>::new()), Option::None);
        assert_eq!(score_percentage(Vec::<SkillLevel>::new()), 0.0);
    }

    #[test]
    fn test_level_histogram_包含全部等级() {
        let histogram = level_histogram(vec![High, High, Low]);
        assert_eq!(histogram.len(), 5);
        assert_eq!(histogram[&High], 2);
        assert_eq!(histogram[&Low], 1);
        assert_eq!(histogram[&Expert], 0);
    }

    #[test]
    fn test_is_qualified() {
        assert!(is_qualified(Medium, Medium));
        assert!(is_qualified(Expert, Medium));
        assert!(!is_qualified(Low, Medium));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round2(1.23456), 1.23);
    }
}
