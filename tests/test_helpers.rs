// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供临时工厂库（上游六张表）与种子数据
// ==========================================

#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化上游表结构
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 初始化上游表结构（列名与工厂库一致）
fn init_schema(conn: &Connection) -> Result<(), Box<dyn Error>> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS fabricouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fabricStruct TEXT,
            fabricId TEXT,
            refId TEXT,
            fabricFace TEXT,
            fabricPattern TEXT,
            vatType TEXT,
            vatNo TEXT,
            sumYard TEXT,
            fold TEXT,
            createDate TEXT
        );

        CREATE TABLE IF NOT EXISTS stockfabrics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fabricStruct TEXT,
            fabricId TEXT,
            refId TEXT,
            fabricFace TEXT,
            fabricPattern TEXT,
            sumYard TEXT,
            createDate TEXT
        );

        CREATE TABLE IF NOT EXISTS packageasts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            package_status TEXT,
            pallet_type TEXT,
            pallet TEXT,
            spool_type TEXT,
            spool TEXT,
            pallet_steel TEXT,
            pallet_wood TEXT,
            spool_paper TEXT,
            spool_plastic TEXT,
            spoolC_paper TEXT,
            spoolC_plastic TEXT,
            "partition" TEXT,
            sack TEXT,
            box TEXT,
            createDate TEXT
        );

        CREATE TABLE IF NOT EXISTS htrpackages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            package_status TEXT,
            pallet_type TEXT,
            pallet TEXT,
            spool_type TEXT,
            spool TEXT,
            pallet_steel TEXT,
            pallet_wood TEXT,
            spool_paper TEXT,
            spool_plastic TEXT,
            spoolC_paper TEXT,
            spoolC_plastic TEXT,
            "partition" TEXT,
            sack TEXT,
            box TEXT,
            createDate TEXT
        );

        CREATE TABLE IF NOT EXISTS materials (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            yarnType TEXT,
            spool TEXT,
            weight_p_net TEXT,
            weight_kg_net TEXT,
            createDate TEXT
        );

        CREATE TABLE IF NOT EXISTS materialstores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            yarnType TEXT,
            spool TEXT,
            weight_p_net TEXT,
            weight_kg_net TEXT,
            createDate TEXT
        );
        "#,
    )?;
    Ok(())
}

/// 写入一条面料入库记录
pub fn insert_receive(
    conn: &Connection,
    fabric_struct: &str,
    vat_type: &str,
    vat_no: &str,
    yards: &str,
    fold: &str,
    create_date: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO fabricouts (fabricStruct, fabricFace, fabricPattern, vatType, vatNo, sumYard, fold, createDate)
         VALUES (?1, '60', 'PLAIN', ?2, ?3, ?4, ?5, ?6)",
        params![fabric_struct, vat_type, vat_no, yards, fold, create_date],
    )?;
    Ok(())
}

/// 写入一条面料出库记录
pub fn insert_stockout(
    conn: &Connection,
    fabric_struct: &str,
    yards: &str,
    create_date: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO stockfabrics (fabricStruct, fabricFace, fabricPattern, sumYard, createDate)
         VALUES (?1, '60', 'PLAIN', ?2, ?3)",
        params![fabric_struct, yards, create_date],
    )?;
    Ok(())
}

/// 写入一条托盘出入记录（packageImport / packageReturn）
pub fn insert_pallet_movement(
    conn: &Connection,
    table: &str,
    status: &str,
    pallet_type: &str,
    quantity: &str,
    create_date: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        &format!(
            "INSERT INTO {} (package_status, pallet_type, pallet, createDate) VALUES (?1, ?2, ?3, ?4)",
            table
        ),
        params![status, pallet_type, quantity, create_date],
    )?;
    Ok(())
}

/// 写入一条已归还记录（按类别专属字段）
pub fn insert_returned(
    conn: &Connection,
    table: &str,
    field: &str,
    quantity: &str,
    create_date: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        &format!(
            "INSERT INTO {} (package_status, \"{}\", createDate) VALUES ('packageHistory', ?1, ?2)",
            table, field
        ),
        params![quantity, create_date],
    )?;
    Ok(())
}

/// 写入一条纱线入库 / 领用记录
pub fn insert_yarn(
    conn: &Connection,
    table: &str,
    yarn_type: &str,
    spools: &str,
    weight_lb: &str,
    weight_kg: &str,
    create_date: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        &format!(
            "INSERT INTO {} (yarnType, spool, weight_p_net, weight_kg_net, createDate) VALUES (?1, ?2, ?3, ?4, ?5)",
            table
        ),
        params![yarn_type, spools, weight_lb, weight_kg, create_date],
    )?;
    Ok(())
}

/// 标准场景: 两种面料跨两个月
///
/// - TC-45: 1月入 100（A0001），1月出 40，2月入 50（B0002），2月出 80
/// - CVC-30: 1月入 1,030（A0003）
pub fn seed_fabric_scenario(conn: &Connection) -> Result<(), Box<dyn Error>> {
    insert_receive(conn, "TC-45", "A", "0001", "100", "4", "2025-01-05")?;
    insert_stockout(conn, "TC-45", "40", "2025-01-20")?;
    insert_receive(conn, "TC-45", "B", "0002", "50", "2", "2025-02-01")?;
    insert_stockout(conn, "TC-45", "80", "2025-02-15")?;
    insert_receive(conn, "CVC-30", "A", "0003", "1,030", "1", "2025-01-10")?;
    Ok(())
}
