// ==========================================
// 车间周排产系统 - 配置存储
// ==========================================
// 职责: 三张配置表的 JSON 文件持久化
// 存储: 配置目录下每表一个文件, 缺失文件回退默认值
// ==========================================

use crate::config::planning_config::{
    ConfigError, CycleTimeEntry, PlanningConfig, PriorityEntry, ResourceEntry,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 部门资源表文件名
pub const RESOURCES_FILE: &str = "config_resources.json";
/// 订单优先级表文件名
pub const PRIORITIES_FILE: &str = "config_priorities.json";
/// 部门节拍表文件名
pub const CYCLE_TIMES_FILE: &str = "config_cycle_times.json";

// ==========================================
// ConfigStore - 配置存储
// ==========================================
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// 在指定目录上创建存储 (目录不存在时创建)
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// 系统默认配置目录
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("workshop-aps")
    }

    /// 加载整套计划配置
    ///
    /// 任一配置文件缺失时该表回退为空/默认值, 运行参数
    /// (start_day, shift_hours) 由调用方另行给定。
    pub fn load(&self) -> Result<PlanningConfig, ConfigError> {
        let resources: Vec<ResourceEntry> = self.load_table(RESOURCES_FILE)?;
        let priorities: Vec<PriorityEntry> = self.load_table(PRIORITIES_FILE)?;
        let cycle_times: Vec<CycleTimeEntry> = self.load_table(CYCLE_TIMES_FILE)?;

        Ok(PlanningConfig {
            resources,
            priorities,
            cycle_times,
            ..Default::default()
        })
    }

    /// 持久化整套计划配置 (运行参数不落盘)
    pub fn save(&self, config: &PlanningConfig) -> Result<(), ConfigError> {
        self.save_table(RESOURCES_FILE, &config.resources)?;
        self.save_table(PRIORITIES_FILE, &config.priorities)?;
        self.save_table(CYCLE_TIMES_FILE, &config.cycle_times)?;
        Ok(())
    }

    fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn load_table<T>(&self, file: &str) -> Result<Vec<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        let path = self.path_of(file);
        if !path.exists() {
            warn!(file = %path.display(), "配置文件缺失, 回退默认值");
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&path)?;
        let table = serde_json::from_str(&raw)?;
        debug!(file = %path.display(), "配置表加载完成");
        Ok(table)
    }

    fn save_table<T>(&self, file: &str, table: &[T]) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let path = self.path_of(file);
        let raw = serde_json::to_string_pretty(table)?;
        fs::write(&path, raw)?;
        debug!(file = %path.display(), "配置表已保存");
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
