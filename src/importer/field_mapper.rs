// ==========================================
// 纺织厂库存报表系统 - 字段映射器
// ==========================================
// 职责: 上游松散记录 → 类型化事件
// 规则: 同一语义字段存在多种列名，按别名优先级取第一个非空值
// ==========================================

use crate::domain::fabric::{FabricIdentifiers, FabricProfile, ReceiveEvent, StockoutEvent};
use crate::domain::package::{PackageLine, PackageRecord};
use crate::domain::types::{BillType, PackageCategory, PackageOrigin, PackageStatus};
use crate::domain::yarn::YarnMovement;
use crate::importer::quantity::{parse_event_date_opt, parse_quantity, parse_weight};
use crate::importer::RawRecord;

// ==========================================
// 列名别名（按优先级）
// ==========================================
pub mod aliases {
    pub const STRUCTURE_CODE: &[&str] = &["fabricStruct", "fabric_struct"];
    pub const FABRIC_ID: &[&str] = &["fabricId", "fabric_id"];
    pub const REF_ID: &[&str] = &["refId", "ref_id"];
    pub const FACE: &[&str] = &["fabricFace", "fabricWidth", "face", "fabricW", "width"];
    pub const PATTERN: &[&str] = &["fabricPattern", "fabricDesign", "design", "pattern"];
    pub const BILL_TYPE: &[&str] = &["vatType", "vat_type", "billType"];
    pub const BILL_NO: &[&str] = &["vatNo", "vat_no", "billNo"];
    pub const YARDS: &[&str] = &["sumYard", "sum_yard", "yards"];
    pub const FOLD: &[&str] = &["fold"];
    pub const CREATED: &[&str] = &["createDate", "create_date", "created_at", "createdAt"];
    pub const PACKAGE_STATUS: &[&str] = &["package_status", "packageStatus"];
    pub const PALLET_TYPE: &[&str] = &["pallet_type", "palletType"];
    pub const PALLET_QTY: &[&str] = &["pallet"];
    pub const SPOOL_TYPE: &[&str] = &["spool_type", "spoolType"];
    pub const SPOOL_QTY: &[&str] = &["spool"];
    pub const YARN_TYPE: &[&str] = &["yarnType", "yarn_type"];
    pub const SPOOLS: &[&str] = &["spool", "spools"];
    pub const WEIGHT_LB_NET: &[&str] = &["weight_p_net", "weightPNet"];
    pub const WEIGHT_KG_NET: &[&str] = &["weight_kg_net", "weightKgNet"];
}

// ==========================================
// FieldMapper - 字段映射器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMapper;

impl FieldMapper {
    /// 按别名优先级取第一个非空值（已去除首尾空白）
    pub fn get_string(&self, row: &RawRecord, aliases: &[&str]) -> Option<String> {
        self.get_str(row, aliases).map(String::from)
    }

    fn get_str<'a>(&self, row: &'a RawRecord, aliases: &[&str]) -> Option<&'a str> {
        aliases
            .iter()
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    /// 面料档案
    pub fn map_fabric(&self, row: &RawRecord) -> FabricProfile {
        FabricProfile {
            identifiers: FabricIdentifiers {
                structure_code: self.get_string(row, aliases::STRUCTURE_CODE),
                fabric_id: self.get_string(row, aliases::FABRIC_ID),
                ref_id: self.get_string(row, aliases::REF_ID),
            },
            face: self.get_string(row, aliases::FACE),
            pattern: self.get_string(row, aliases::PATTERN),
        }
    }

    /// 入库记录 (fabricouts)
    pub fn map_receive(&self, row: &RawRecord) -> ReceiveEvent {
        ReceiveEvent {
            fabric: self.map_fabric(row),
            bill_type: self.get_str(row, aliases::BILL_TYPE).and_then(BillType::from_code),
            bill_no: self.get_string(row, aliases::BILL_NO),
            quantity: parse_quantity(self.get_str(row, aliases::YARDS)),
            fold: parse_quantity(self.get_str(row, aliases::FOLD)),
            occurred_at: parse_event_date_opt(self.get_str(row, aliases::CREATED)),
        }
    }

    /// 出库记录 (stockfabrics)
    pub fn map_stockout(&self, row: &RawRecord) -> StockoutEvent {
        StockoutEvent {
            fabric: self.map_fabric(row),
            quantity: parse_quantity(self.get_str(row, aliases::YARDS)),
            occurred_at: parse_event_date_opt(self.get_str(row, aliases::CREATED)),
        }
    }

    /// 包材记录状态
    pub fn package_status(&self, row: &RawRecord) -> Option<PackageStatus> {
        self.get_str(row, aliases::PACKAGE_STATUS)
            .and_then(PackageStatus::from_code)
    }

    /// 包材出入记录 → 类别明细
    ///
    /// 托盘/纱管按判别字段归类；散装包材只统计仓库表
    pub fn map_package_movement(&self, row: &RawRecord, origin: PackageOrigin) -> PackageRecord {
        let mut lines = Vec::new();

        let pallet = self
            .get_str(row, aliases::PALLET_TYPE)
            .and_then(PackageCategory::from_pallet_type);
        if let (Some(category), Some(qty)) = (pallet, self.get_str(row, aliases::PALLET_QTY)) {
            lines.push(PackageLine {
                category,
                quantity: parse_quantity(Some(qty)),
            });
        }

        let spool = self
            .get_str(row, aliases::SPOOL_TYPE)
            .and_then(PackageCategory::from_spool_type);
        if let (Some(category), Some(qty)) = (spool, self.get_str(row, aliases::SPOOL_QTY)) {
            lines.push(PackageLine {
                category,
                quantity: parse_quantity(Some(qty)),
            });
        }

        if origin == PackageOrigin::Warehouse {
            lines.extend(self.loose_lines(row));
        }

        PackageRecord {
            recorded_on: parse_event_date_opt(self.get_str(row, aliases::CREATED)),
            lines,
        }
    }

    /// 已归还记录 → 类别明细
    ///
    /// 每类有专属字段；散装包材只统计合作方表
    pub fn map_returned(&self, row: &RawRecord, origin: PackageOrigin) -> PackageRecord {
        let mut lines: Vec<PackageLine> = PackageCategory::ALL
            .iter()
            .filter(|c| !c.is_loose())
            .filter_map(|&category| {
                self.get_str(row, &[category.returned_field()])
                    .map(|qty| PackageLine {
                        category,
                        quantity: parse_quantity(Some(qty)),
                    })
            })
            .collect();

        if origin == PackageOrigin::Partner {
            lines.extend(self.loose_lines(row));
        }

        PackageRecord {
            recorded_on: parse_event_date_opt(self.get_str(row, aliases::CREATED)),
            lines,
        }
    }

    fn loose_lines(&self, row: &RawRecord) -> Vec<PackageLine> {
        PackageCategory::ALL
            .iter()
            .filter(|c| c.is_loose())
            .filter_map(|&category| {
                self.get_str(row, &[category.returned_field()])
                    .map(|qty| PackageLine {
                        category,
                        quantity: parse_quantity(Some(qty)),
                    })
            })
            .collect()
    }

    /// 纱线记录 (materials / materialstores)
    pub fn map_yarn(&self, row: &RawRecord) -> YarnMovement {
        YarnMovement {
            yarn_type: self.get_string(row, aliases::YARN_TYPE),
            spools: parse_quantity(self.get_str(row, aliases::SPOOLS)),
            weight_lb_net: parse_weight(self.get_str(row, aliases::WEIGHT_LB_NET)),
            weight_kg_net: parse_weight(self.get_str(row, aliases::WEIGHT_KG_NET)),
            recorded_on: parse_event_date_opt(self.get_str(row, aliases::CREATED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_alias_priority_and_trim() {
        let r = row(&[("fabric_struct", "  TC-45 "), ("fabricStruct", "")]);
        let mapper = FieldMapper;
        assert_eq!(
            mapper.get_string(&r, aliases::STRUCTURE_CODE).as_deref(),
            Some("TC-45")
        );

        let r = row(&[("fabricWidth", "58\""), ("width", "60\"")]);
        assert_eq!(mapper.get_string(&r, aliases::FACE).as_deref(), Some("58\""));
    }

    #[test]
    fn test_map_receive() {
        let r = row(&[
            ("fabricStruct", "TC-45"),
            ("refId", "R-9"),
            ("fabricFace", "60\""),
            ("vatType", "b"),
            ("vatNo", "0042"),
            ("sumYard", "1,200"),
            ("fold", "12"),
            ("createDate", "2025-01-05T08:00:00.000Z"),
        ]);
        let ev = FieldMapper.map_receive(&r);
        assert_eq!(ev.fabric.identifiers.canonical(), Some("TC-45"));
        assert_eq!(ev.fabric.identifiers.ref_id.as_deref(), Some("R-9"));
        assert_eq!(ev.bill_type, Some(BillType::B));
        assert_eq!(ev.bill_number().as_deref(), Some("B0042"));
        assert_eq!((ev.quantity, ev.fold), (1200, 12));
        assert_eq!(ev.occurred_at, NaiveDate::from_ymd_opt(2025, 1, 5));
    }

    #[test]
    fn test_map_stockout_malformed_fields() {
        let r = row(&[("fabricId", "F-1"), ("sumYard", "lots"), ("createDate", "??")]);
        let ev = FieldMapper.map_stockout(&r);
        assert_eq!(ev.quantity, 0);
        assert_eq!(ev.occurred_at, None);
        assert_eq!(ev.fabric.identifiers.canonical(), Some("F-1"));
    }

    #[test]
    fn test_map_package_movement_by_origin() {
        let r = row(&[
            ("package_status", "packageImport"),
            ("pallet_type", "steel"),
            ("pallet", "20"),
            ("spool_type", "spoolC_paper"),
            ("spool", "300"),
            ("sack", "5"),
            ("box", ""),
        ]);
        let mapper = FieldMapper;
        assert_eq!(mapper.package_status(&r), Some(PackageStatus::Import));

        let warehouse = mapper.map_package_movement(&r, PackageOrigin::Warehouse);
        assert_eq!(warehouse.quantity_of(PackageCategory::SteelPallet), 20);
        assert_eq!(warehouse.quantity_of(PackageCategory::PaperCylinder), 300);
        assert_eq!(warehouse.quantity_of(PackageCategory::Sack), 5);
        assert_eq!(warehouse.lines.len(), 3);

        let partner = mapper.map_package_movement(&r, PackageOrigin::Partner);
        assert_eq!(partner.quantity_of(PackageCategory::Sack), 0);
        assert_eq!(partner.lines.len(), 2);
    }

    #[test]
    fn test_map_package_missing_discriminator() {
        let r = row(&[("pallet", "20"), ("spool_type", "unknown"), ("spool", "4")]);
        let record = FieldMapper.map_package_movement(&r, PackageOrigin::Partner);
        assert!(record.lines.is_empty());
    }

    #[test]
    fn test_map_returned_by_origin() {
        let r = row(&[
            ("pallet_steel", "9"),
            ("spool_plastic", "4"),
            ("partition", "2"),
            ("createDate", "2025-03-01"),
        ]);
        let mapper = FieldMapper;
        let partner = mapper.map_returned(&r, PackageOrigin::Partner);
        assert_eq!(partner.quantity_of(PackageCategory::SteelPallet), 9);
        assert_eq!(partner.quantity_of(PackageCategory::PlasticSpool), 4);
        assert_eq!(partner.quantity_of(PackageCategory::PartitionPaper), 2);

        let warehouse = mapper.map_returned(&r, PackageOrigin::Warehouse);
        assert_eq!(warehouse.quantity_of(PackageCategory::PartitionPaper), 0);
        assert_eq!(warehouse.recorded_on, NaiveDate::from_ymd_opt(2025, 3, 1));
    }

    #[test]
    fn test_map_yarn() {
        let r = row(&[
            ("yarnType", "T/C 45"),
            ("spool", "24"),
            ("weight_p_net", "110.25"),
            ("weight_kg_net", "50.01"),
        ]);
        let m = FieldMapper.map_yarn(&r);
        assert_eq!(m.yarn_type.as_deref(), Some("T/C 45"));
        assert_eq!(m.spools, 24);
        assert_eq!(m.weight_lb_net, 110.25);
        assert_eq!(m.weight_kg_net, 50.01);
    }
}
