// ==========================================
// 纺织厂库存报表系统 - 纱线库存对账引擎
// ==========================================
// 职责: 纱线入库 (materials) 与领用 (materialstores) 按纱种汇总
// 输出: 按纱种升序的库存行，剩余 = 入库 - 领用（保留符号）
// ==========================================

use crate::domain::yarn::{YarnMovement, YarnMovementSet, YarnStockLine, YarnTally};
use crate::engine::filter::DateRange;
use crate::engine::grouping::{try_group_and_sum, Grouped};
use std::collections::BTreeSet;
use tracing::instrument;

/// 纱种是否可用作分组键
///
/// 上游存在空值、字面量 "null" 及误写入的 JSON 片段，一律跳过
pub fn is_valid_yarn_type(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.starts_with('{') && !value.contains("null")
}

// ==========================================
// YarnStockReconciler - 纱线对账器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct YarnStockReconciler {
    range: DateRange,
}

impl YarnStockReconciler {
    pub fn new(range: DateRange) -> Self {
        Self { range }
    }

    #[instrument(skip_all, fields(imported = movements.imported.len(), issued = movements.issued.len()))]
    pub fn reconcile(&self, movements: &YarnMovementSet) -> Vec<YarnStockLine> {
        let imported = self.group(&movements.imported);
        let issued = self.group(&movements.issued);

        let skipped = imported.skipped() + issued.skipped();
        if skipped > 0 {
            tracing::debug!(skipped, "纱种缺失或无效，记录未计入");
        }

        let yarn_types: BTreeSet<&String> = imported.keys().chain(issued.keys()).collect();

        yarn_types
            .into_iter()
            .map(|yarn_type| {
                let imported = imported.tally_of(yarn_type);
                let issued = issued.tally_of(yarn_type);
                YarnStockLine {
                    yarn_type: yarn_type.clone(),
                    imported,
                    issued,
                    remaining: imported - issued,
                }
            })
            .collect()
    }

    /// 全部纱种合计
    pub fn summarize(lines: &[YarnStockLine]) -> YarnStockLine {
        let mut imported = YarnTally::default();
        let mut issued = YarnTally::default();
        for line in lines {
            imported += line.imported;
            issued += line.issued;
        }
        YarnStockLine {
            yarn_type: String::new(),
            imported,
            issued,
            remaining: imported - issued,
        }
    }

    fn group<'a>(&self, movements: &'a [YarnMovement]) -> Grouped<String, &'a YarnMovement, YarnTally> {
        try_group_and_sum(
            movements.iter().filter(|m| self.range.contains(m.recorded_on)),
            |m| {
                m.yarn_type
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| is_valid_yarn_type(t))
                    .map(String::from)
            },
            |m| m.tally(),
        )
    }
}
