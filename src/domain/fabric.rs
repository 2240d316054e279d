// ==========================================
// 纺织厂库存报表系统 - 面料出入库领域模型
// ==========================================
// 职责: 入库事件 (fabricouts) / 出库事件 (stockfabrics)
// 红线: 事件只读，核心层不修改上游记录
// ==========================================

use crate::domain::types::BillType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 未能识别面料时的累计余额键
pub const UNKNOWN_FABRIC_KEY: &str = "UNKNOWN_FABRIC";

// ==========================================
// FabricIdentifiers - 面料标识
// ==========================================
// 上游存在三套可互换的标识字段，按优先级: 组织代码 > 面料ID > 参考号
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricIdentifiers {
    pub structure_code: Option<String>, // 面料组织代码 (fabricStruct)
    pub fabric_id: Option<String>,      // 面料ID (fabricId)
    pub ref_id: Option<String>,         // 参考号 (refId)
}

impl FabricIdentifiers {
    pub fn from_code(code: &str) -> Self {
        Self {
            structure_code: Some(code.to_string()),
            ..Self::default()
        }
    }

    /// 规范标识（按优先级取第一个非空值）
    pub fn canonical(&self) -> Option<&str> {
        [&self.structure_code, &self.fabric_id, &self.ref_id]
            .into_iter()
            .flatten()
            .map(|s| s.as_str())
            .next()
    }

    /// 任一标识与给定代码完全相等即匹配
    pub fn matches(&self, code: &str) -> bool {
        [&self.structure_code, &self.fabric_id, &self.ref_id]
            .into_iter()
            .flatten()
            .any(|s| s == code)
    }
}

// ==========================================
// FabricProfile - 面料档案（标识 + 门幅 + 花型）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricProfile {
    pub identifiers: FabricIdentifiers,
    pub face: Option<String>,    // 门幅/布面
    pub pattern: Option<String>, // 花型
}

impl FabricProfile {
    pub fn from_code(code: &str) -> Self {
        Self {
            identifiers: FabricIdentifiers::from_code(code),
            face: None,
            pattern: None,
        }
    }

    /// 展示标签: "组织代码 - 门幅 - 花型"（空段跳过）
    pub fn label(&self) -> String {
        [
            &self.identifiers.structure_code,
            &self.face,
            &self.pattern,
        ]
        .into_iter()
        .flatten()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" - ")
    }

    /// 按面料分账时使用的累计余额键
    pub fn balance_key(&self) -> String {
        let label = self.label();
        if !label.is_empty() {
            return label;
        }
        self.identifiers
            .canonical()
            .unwrap_or(UNKNOWN_FABRIC_KEY)
            .to_string()
    }
}

// ==========================================
// ReceiveEvent - 入库事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveEvent {
    pub fabric: FabricProfile,
    pub bill_type: Option<BillType>,
    pub bill_no: Option<String>,
    pub quantity: i64,                  // 码数 (yards)
    pub fold: i64,                      // 折数
    pub occurred_at: Option<NaiveDate>, // 无法解析时为 None
}

impl ReceiveEvent {
    /// 票据号 = 类型字母 + 单号
    pub fn bill_number(&self) -> Option<String> {
        match (&self.bill_type, &self.bill_no) {
            (None, None) => None,
            (bill_type, bill_no) => Some(format!(
                "{}{}",
                bill_type.map(|t| t.code()).unwrap_or(""),
                bill_no.as_deref().unwrap_or("")
            )),
        }
    }
}

// ==========================================
// StockoutEvent - 出库事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutEvent {
    pub fabric: FabricProfile,
    pub quantity: i64,
    pub occurred_at: Option<NaiveDate>,
}

// ==========================================
// BillSummary - 按票据汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    pub bill_number: String,
    pub bill_type: Option<BillType>,
    pub fabric: FabricProfile,          // 首行面料
    pub first_date: Option<NaiveDate>,
    pub fold: i64,
    pub quantity: i64,
    pub line_count: usize,
}

// ==========================================
// FabricTotal - 按面料代码汇总码数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricTotal {
    pub fabric_code: String,
    pub quantity: i64,
}
