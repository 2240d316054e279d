// ==========================================
// 纺织厂库存报表系统 - 纱线库存领域模型
// ==========================================
// 职责: 纱线入库 (materials) / 领用 (materialstores) 与按纱种汇总
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, Sub};

// ==========================================
// YarnMovement - 纱线出入记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YarnMovement {
    pub yarn_type: Option<String>,
    pub spools: i64,
    pub weight_lb_net: f64, // 净重（磅）
    pub weight_kg_net: f64, // 净重（公斤）
    pub recorded_on: Option<NaiveDate>,
}

impl YarnMovement {
    pub fn tally(&self) -> YarnTally {
        YarnTally {
            spools: self.spools,
            weight_lb_net: self.weight_lb_net,
            weight_kg_net: self.weight_kg_net,
        }
    }
}

// ==========================================
// YarnMovementSet - 上游返回的两组记录
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YarnMovementSet {
    pub imported: Vec<YarnMovement>,
    pub issued: Vec<YarnMovement>,
}

// ==========================================
// YarnTally - 纱线数量合计（筒数 + 两种净重）
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YarnTally {
    pub spools: i64,
    pub weight_lb_net: f64,
    pub weight_kg_net: f64,
}

impl AddAssign for YarnTally {
    fn add_assign(&mut self, rhs: Self) {
        self.spools += rhs.spools;
        self.weight_lb_net += rhs.weight_lb_net;
        self.weight_kg_net += rhs.weight_kg_net;
    }
}

impl Sub for YarnTally {
    type Output = YarnTally;

    fn sub(self, rhs: Self) -> Self::Output {
        YarnTally {
            spools: self.spools - rhs.spools,
            weight_lb_net: self.weight_lb_net - rhs.weight_lb_net,
            weight_kg_net: self.weight_kg_net - rhs.weight_kg_net,
        }
    }
}

// ==========================================
// YarnStockLine - 按纱种的库存行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YarnStockLine {
    pub yarn_type: String,
    pub imported: YarnTally,
    pub issued: YarnTally,
    pub remaining: YarnTally, // 入库 - 领用（可为负）
}

// ==========================================
// YarnStockReport - 原料库存报表结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YarnStockReport {
    pub report_id: String,
    pub lines: Vec<YarnStockLine>,
    pub total: YarnStockLine,
}
