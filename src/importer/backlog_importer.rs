// ==========================================
// 车间周排产系统 - 积压订单导入器
// ==========================================
// 职责: 生产看板电子表格 -> 清洗后的需求行 -> 工作项
// 口径: 合并单元格列做向下填充; 只保留可生产状态的行;
//       无法解析的数字按上游缺陷过滤, 不进入核心
// ==========================================

use crate::config::planning_config::PlanningConfig;
use crate::domain::work_item::{OrderKey, RawBacklogRecord, WorkItem};
use crate::importer::error::ImportError;
use crate::importer::file_parser::parser_for;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

// ===== 列名 (与上游看板表头一致) =====
pub const COL_ORDER: &str = "COMMESSA";
pub const COL_LAUNCH: &str = "LANCIO";
pub const COL_DEPARTMENT: &str = "REPARTO_ARTICOLO";
pub const COL_RESIDUAL_QTY: &str = "QTA_RESIDUA_PADRE";
pub const COL_MANAGEMENT: &str = "GEST";
pub const COL_STATE: &str = "STATO";

/// 必需列: 缺任何一列在分配开始前即报错
const REQUIRED_COLUMNS: [&str; 4] = [COL_ORDER, COL_LAUNCH, COL_DEPARTMENT, COL_RESIDUAL_QTY];

/// 合并单元格导致留空的列, 读入后向下填充
const FFILL_COLUMNS: [&str; 7] = [
    COL_ORDER,
    "ANNO",
    "WEEK",
    COL_LAUNCH,
    COL_MANAGEMENT,
    COL_STATE,
    "MONT_SMONT",
];

// ===== 行过滤口径 =====
const MANAGEMENT_INTERNAL: &str = "1) GRIGIO - PROD INT";
const MANAGEMENT_PURCHASED: &str = "3) AZZURRO - ACQ";
const STATE_PRODUCIBLE: &str = "INEVASO - PRODUCIBILE";

// ==========================================
// ImportOptions - 导入选项
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub internal_only: bool, // 仅保留自产行, 排除采购行
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            internal_only: false,
        }
    }
}

// ==========================================
// BacklogImporter - 积压订单导入器
// ==========================================
pub struct BacklogImporter {
    options: ImportOptions,
}

impl BacklogImporter {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    /// 从电子表格加载清洗后的需求行
    ///
    /// 步骤:
    /// 1) 按扩展名解析文件
    /// 2) 校验必需列
    /// 3) 合并单元格列向下填充
    /// 4) 按管理类别与可生产状态过滤
    /// 5) 数字解析失败的行过滤并告警
    pub fn load_records(&self, file_path: &Path) -> Result<Vec<RawBacklogRecord>, ImportError> {
        let parser = parser_for(file_path)?;
        let mut raw_rows = parser.parse_to_raw_records(file_path)?;

        self.check_required_columns(&raw_rows)?;
        forward_fill(&mut raw_rows, &FFILL_COLUMNS);

        let total_rows = raw_rows.len();
        let mut records = Vec::new();

        for (row_idx, row) in raw_rows.iter().enumerate() {
            if !self.row_is_in_scope(row) {
                continue;
            }

            let quantity_text = cell(row, COL_RESIDUAL_QTY);
            let residual_quantity: f64 = match quantity_text.parse() {
                Ok(qty) => qty,
                Err(_) => {
                    warn!(
                        row = row_idx + 2, // 表头占第一行
                        value = %quantity_text,
                        "未完成件数无法解析, 行被过滤"
                    );
                    continue;
                }
            };

            records.push(RawBacklogRecord {
                order_id: cell(row, COL_ORDER),
                launch_id: normalize_launch_id(&cell(row, COL_LAUNCH)),
                department: cell(row, COL_DEPARTMENT),
                residual_quantity,
            });
        }

        info!(
            file = %file_path.display(),
            total_rows,
            in_scope_rows = records.len(),
            "积压订单导入完成"
        );
        Ok(records)
    }

    /// 需求行 -> 工作项 (单位换算: 件数 x 部门节拍)
    pub fn to_work_items(
        &self,
        records: &[RawBacklogRecord],
        config: &PlanningConfig,
    ) -> Vec<WorkItem> {
        records
            .iter()
            .enumerate()
            .map(|(item_id, record)| {
                let hours_per_unit = config.cycle_hours_per_unit(&record.department);
                WorkItem::new(
                    item_id,
                    OrderKey::new(record.order_id.clone(), record.launch_id.clone()),
                    record.department.clone(),
                    record.residual_quantity,
                    record.residual_quantity * hours_per_unit,
                )
            })
            .collect()
    }

    fn check_required_columns(
        &self,
        rows: &[HashMap<String, String>],
    ) -> Result<(), ImportError> {
        let Some(first) = rows.first() else {
            // 空表没有可校验的表头, 下游自然得到零工作项
            return Ok(());
        };

        for column in REQUIRED_COLUMNS {
            if !first.contains_key(column) {
                return Err(ImportError::MissingColumn(column.to_string()));
            }
        }
        Ok(())
    }

    fn row_is_in_scope(&self, row: &HashMap<String, String>) -> bool {
        let management = cell(row, COL_MANAGEMENT);
        let management_ok = if self.options.internal_only {
            management == MANAGEMENT_INTERNAL
        } else {
            management == MANAGEMENT_INTERNAL || management == MANAGEMENT_PURCHASED
        };

        management_ok && cell(row, COL_STATE) == STATE_PRODUCIBLE
    }
}

impl Default for BacklogImporter {
    fn default() -> Self {
        Self::new(ImportOptions::default())
    }
}

/// 取单元格文本, 缺失列等同空串
fn cell(row: &HashMap<String, String>, column: &str) -> String {
    row.get(column).cloned().unwrap_or_default()
}

/// 合并单元格列向下填充: 空单元格继承上一行的非空值
fn forward_fill(rows: &mut [HashMap<String, String>], columns: &[&str]) {
    let mut last_seen: HashMap<&str, String> = HashMap::new();

    for row in rows.iter_mut() {
        for &column in columns {
            let value = row.entry(column.to_string()).or_default();
            if value.is_empty() {
                if let Some(previous) = last_seen.get(column) {
                    *value = previous.clone();
                }
            } else {
                last_seen.insert(column, value.clone());
            }
        }
    }
}

/// 投产批号规整: 电子表格常把数字批号带成 "7.0"
fn normalize_launch_id(raw: &str) -> String {
    match raw.strip_suffix(".0") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => raw.to_string(),
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::planning_config::CycleTimeEntry;
    use std::io::Write;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn header() -> &'static str {
        "COMMESSA,ANNO,WEEK,LANCIO,GEST,STATO,MONT_SMONT,REPARTO_ARTICOLO,QTA_RESIDUA_PADRE"
    }

    #[test]
    fn test_forward_fill_merged_cells() {
        let file = write_csv(&format!(
            "{}\n\
             C100,2026,10,7.0,1) GRIGIO - PROD INT,INEVASO - PRODUCIBILE,M,PACK,40\n\
             ,,,,,,,PAINT,10\n",
            header()
        ));

        let records = BacklogImporter::default().load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        // 第二行继承了第一行的订单/批次/状态
        assert_eq!(records[1].order_id, "C100");
        assert_eq!(records[1].launch_id, "7");
        assert_eq!(records[1].department, "PAINT");
    }

    #[test]
    fn test_filters_out_non_producible_rows() {
        let file = write_csv(&format!(
            "{}\n\
             C1,2026,10,1,1) GRIGIO - PROD INT,INEVASO - PRODUCIBILE,M,PACK,40\n\
             C2,2026,10,1,1) GRIGIO - PROD INT,EVASO,M,PACK,40\n\
             C3,2026,10,1,2) ALTRO,INEVASO - PRODUCIBILE,M,PACK,40\n",
            header()
        ));

        let records = BacklogImporter::default().load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].order_id, "C1");
    }

    #[test]
    fn test_internal_only_excludes_purchased() {
        let file = write_csv(&format!(
            "{}\n\
             C1,2026,10,1,1) GRIGIO - PROD INT,INEVASO - PRODUCIBILE,M,PACK,40\n\
             C2,2026,10,1,3) AZZURRO - ACQ,INEVASO - PRODUCIBILE,M,PACK,40\n",
            header()
        ));

        let all = BacklogImporter::default().load_records(file.path()).unwrap();
        assert_eq!(all.len(), 2);

        let internal = BacklogImporter::new(ImportOptions {
            internal_only: true,
        })
        .load_records(file.path())
        .unwrap();
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].order_id, "C1");
    }

    #[test]
    fn test_unparseable_quantity_row_is_filtered() {
        let file = write_csv(&format!(
            "{}\n\
             C1,2026,10,1,1) GRIGIO - PROD INT,INEVASO - PRODUCIBILE,M,PACK,abc\n\
             C2,2026,10,1,1) GRIGIO - PROD INT,INEVASO - PRODUCIBILE,M,PACK,12\n",
            header()
        ));

        let records = BacklogImporter::default().load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].residual_quantity, 12.0);
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let file = write_csv(
            "COMMESSA,LANCIO,GEST,STATO\n\
             C1,1,1) GRIGIO - PROD INT,INEVASO - PRODUCIBILE\n",
        );

        let result = BacklogImporter::default().load_records(file.path());
        assert!(matches!(result, Err(ImportError::MissingColumn(_))));
    }

    #[test]
    fn test_empty_file_yields_no_records() {
        let file = write_csv(&format!("{}\n", header()));
        let records = BacklogImporter::default().load_records(file.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_to_work_items_applies_cycle_times() {
        let records = vec![
            RawBacklogRecord {
                order_id: "C1".to_string(),
                launch_id: "1".to_string(),
                department: "PACK".to_string(),
                residual_quantity: 60.0,
            },
            RawBacklogRecord {
                order_id: "C1".to_string(),
                launch_id: "1".to_string(),
                department: "PAINT".to_string(),
                residual_quantity: 24.0,
            },
        ];

        let config = PlanningConfig {
            cycle_times: vec![CycleTimeEntry {
                department: "PACK".to_string(),
                minutes_per_unit: 10.0,
            }],
            ..Default::default()
        };

        let items = BacklogImporter::default().to_work_items(&records, &config);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_id, 0);
        assert!((items[0].required_hours - 10.0).abs() < 1e-9); // 60 件 x 10 分钟
        // PAINT 未配置节拍, 走默认 12.5 分钟/件
        assert!((items[1].required_hours - 5.0).abs() < 1e-9);
    }
}
