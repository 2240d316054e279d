// ==========================================
// 纺织厂库存报表系统 - 领域类型定义
// ==========================================
// 职责: 封闭枚举（票据类型 / 包材类别 / 台账行类型 / 包材状态）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 票据类型 (Bill Type)
// ==========================================
// 出货单据的类别字母，与上游 vatType 字段一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BillType {
    A,
    B,
    C,
}

impl BillType {
    /// 从上游字段解析（大小写不敏感，未知值返回 None）
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "A" => Some(BillType::A),
            "B" => Some(BillType::B),
            "C" => Some(BillType::C),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BillType::A => "A",
            BillType::B => "B",
            BillType::C => "C",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 台账行类型 (Ledger Row Kind)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerRowKind {
    Receive,      // 入库
    Stockout,     // 出库
    MonthSummary, // 月度汇总
    GrandTotal,   // 全部合计
}

impl LedgerRowKind {
    /// 是否为明细行（入库/出库）
    pub fn is_movement(&self) -> bool {
        matches!(self, LedgerRowKind::Receive | LedgerRowKind::Stockout)
    }
}

impl fmt::Display for LedgerRowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerRowKind::Receive => write!(f, "RECEIVE"),
            LedgerRowKind::Stockout => write!(f, "STOCKOUT"),
            LedgerRowKind::MonthSummary => write!(f, "MONTH_SUMMARY"),
            LedgerRowKind::GrandTotal => write!(f, "GRAND_TOTAL"),
        }
    }
}

// ==========================================
// 包材类别 (Package Category)
// ==========================================
// 固定 9 类，顺序即报表输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageCategory {
    SteelPallet,     // 钢托盘
    WoodPallet,      // 木托盘
    PaperSpool,      // 纸纱管
    PlasticSpool,    // 塑料纱管
    PaperCylinder,   // 纸筒
    PlasticCylinder, // 塑料筒
    PartitionPaper,  // 隔层纸
    Sack,            // 编织袋
    Box,             // 纸箱
}

impl PackageCategory {
    pub const ALL: [PackageCategory; 9] = [
        PackageCategory::SteelPallet,
        PackageCategory::WoodPallet,
        PackageCategory::PaperSpool,
        PackageCategory::PlasticSpool,
        PackageCategory::PaperCylinder,
        PackageCategory::PlasticCylinder,
        PackageCategory::PartitionPaper,
        PackageCategory::Sack,
        PackageCategory::Box,
    ];

    /// pallet_type 判别值 → 类别
    pub fn from_pallet_type(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "steel" => Some(PackageCategory::SteelPallet),
            "wood" => Some(PackageCategory::WoodPallet),
            _ => None,
        }
    }

    /// spool_type 判别值 → 类别（上游大小写敏感: spoolC_ 表示筒）
    pub fn from_spool_type(value: &str) -> Option<Self> {
        match value.trim() {
            "spool_paper" => Some(PackageCategory::PaperSpool),
            "spool_plastic" => Some(PackageCategory::PlasticSpool),
            "spoolC_paper" => Some(PackageCategory::PaperCylinder),
            "spoolC_plastic" => Some(PackageCategory::PlasticCylinder),
            _ => None,
        }
    }

    /// 已归还记录中该类别专属的数量字段名
    pub fn returned_field(&self) -> &'static str {
        match self {
            PackageCategory::SteelPallet => "pallet_steel",
            PackageCategory::WoodPallet => "pallet_wood",
            PackageCategory::PaperSpool => "spool_paper",
            PackageCategory::PlasticSpool => "spool_plastic",
            PackageCategory::PaperCylinder => "spoolC_paper",
            PackageCategory::PlasticCylinder => "spoolC_plastic",
            PackageCategory::PartitionPaper => "partition",
            PackageCategory::Sack => "sack",
            PackageCategory::Box => "box",
        }
    }

    /// 散装包材（隔层纸/编织袋/纸箱）：无判别字段，按字段是否有值计入，
    /// 且出入与归还分别只看仓库表与合作方表
    pub fn is_loose(&self) -> bool {
        matches!(
            self,
            PackageCategory::PartitionPaper | PackageCategory::Sack | PackageCategory::Box
        )
    }

    /// i18n 键
    pub fn label_key(&self) -> &'static str {
        match self {
            PackageCategory::SteelPallet => "package.steel_pallet",
            PackageCategory::WoodPallet => "package.wood_pallet",
            PackageCategory::PaperSpool => "package.paper_spool",
            PackageCategory::PlasticSpool => "package.plastic_spool",
            PackageCategory::PaperCylinder => "package.paper_cylinder",
            PackageCategory::PlasticCylinder => "package.plastic_cylinder",
            PackageCategory::PartitionPaper => "package.partition_paper",
            PackageCategory::Sack => "package.sack",
            PackageCategory::Box => "package.box",
        }
    }
}

impl fmt::Display for PackageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageCategory::SteelPallet => write!(f, "STEEL_PALLET"),
            PackageCategory::WoodPallet => write!(f, "WOOD_PALLET"),
            PackageCategory::PaperSpool => write!(f, "PAPER_SPOOL"),
            PackageCategory::PlasticSpool => write!(f, "PLASTIC_SPOOL"),
            PackageCategory::PaperCylinder => write!(f, "PAPER_CYLINDER"),
            PackageCategory::PlasticCylinder => write!(f, "PLASTIC_CYLINDER"),
            PackageCategory::PartitionPaper => write!(f, "PARTITION_PAPER"),
            PackageCategory::Sack => write!(f, "SACK"),
            PackageCategory::Box => write!(f, "BOX"),
        }
    }
}

// ==========================================
// 包材记录状态 (Package Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageStatus {
    Import,  // 入厂
    Return,  // 应归还
    History, // 历史
}

impl PackageStatus {
    /// 从上游 package_status 字段解析
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "packageImport" => Some(PackageStatus::Import),
            "packageReturn" => Some(PackageStatus::Return),
            "packageHistory" => Some(PackageStatus::History),
            _ => None,
        }
    }
}

// ==========================================
// 包材记录来源表 (Package Origin)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageOrigin {
    Warehouse, // 本厂仓库表 (packageasts)
    Partner,   // 合作方表 (htrpackages)
}

impl PackageOrigin {
    pub fn table_name(&self) -> &'static str {
        match self {
            PackageOrigin::Warehouse => "packageasts",
            PackageOrigin::Partner => "htrpackages",
        }
    }
}
