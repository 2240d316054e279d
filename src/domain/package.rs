// ==========================================
// 纺织厂库存报表系统 - 包材回收领域模型
// ==========================================
// 职责: 包材记录（已归一化为类别明细行）与类别汇总
// ==========================================

use crate::domain::types::PackageCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// PackageLine - 单类别数量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLine {
    pub category: PackageCategory,
    pub quantity: i64,
}

// ==========================================
// PackageRecord - 一条包材记录
// ==========================================
// 判别字段缺失的类别不会出现在 lines 中
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub recorded_on: Option<NaiveDate>,
    pub lines: Vec<PackageLine>,
}

impl PackageRecord {
    /// 该记录中指定类别的数量合计
    pub fn quantity_of(&self, category: PackageCategory) -> i64 {
        self.lines
            .iter()
            .filter(|line| line.category == category)
            .map(|line| line.quantity)
            .sum()
    }
}

// ==========================================
// PackageRecordSet - 上游返回的三组记录
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageRecordSet {
    pub imported: Vec<PackageRecord>,        // 入厂
    pub return_required: Vec<PackageRecord>, // 应归还
    pub returned: Vec<PackageRecord>,        // 已归还
}

// ==========================================
// PackageCategoryTotals - 类别汇总
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageCategoryTotals {
    pub category: PackageCategory,
    pub imported: i64,
    pub required_return: i64,
    pub returned: i64,
    /// 应归还 - 已归还（可为负，表示多还，仅供诊断）
    pub outstanding_raw: i64,
}

impl PackageCategoryTotals {
    pub fn empty(category: PackageCategory) -> Self {
        Self {
            category,
            imported: 0,
            required_return: 0,
            returned: 0,
            outstanding_raw: 0,
        }
    }

    /// 展示用未归还数量（截为 0）
    pub fn outstanding(&self) -> i64 {
        self.outstanding_raw.max(0)
    }

    /// 是否多还
    pub fn is_over_returned(&self) -> bool {
        self.outstanding_raw < 0
    }
}

// ==========================================
// PackageGrandTotal - 全部类别合计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageGrandTotal {
    pub imported: i64,
    pub required_return: i64,
    pub returned: i64,
    pub outstanding_raw: i64,
}

// ==========================================
// PackageReport - 包材报表结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageReport {
    pub report_id: String,
    pub categories: Vec<PackageCategoryTotals>,
    pub total: PackageGrandTotal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outstanding_display_clamp() {
        let over = PackageCategoryTotals {
            category: PackageCategory::Sack,
            imported: 10,
            required_return: 5,
            returned: 8,
            outstanding_raw: -3,
        };
        assert_eq!(over.outstanding(), 0);
        assert!(over.is_over_returned());
    }

    #[test]
    fn test_quantity_of_category() {
        let record = PackageRecord {
            recorded_on: None,
            lines: vec![
                PackageLine { category: PackageCategory::Box, quantity: 3 },
                PackageLine { category: PackageCategory::Sack, quantity: 4 },
                PackageLine { category: PackageCategory::Box, quantity: 2 },
            ],
        };
        assert_eq!(record.quantity_of(PackageCategory::Box), 5);
        assert_eq!(record.quantity_of(PackageCategory::SteelPallet), 0);
    }
}
