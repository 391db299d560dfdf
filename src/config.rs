// src/config.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::practice::DEFAULT_PASS_THRESHOLD;
use crate::tts::TtsConfig;

// ============================================================================
// 全局配置操作锁
// ============================================================================

lazy_static::lazy_static! {
    /// 全局配置操作锁
    ///
    /// 保护所有 config 的读写操作，防止并发 load->modify->save 导致的数据丢失
    ///
    /// 使用方式：
    /// ```ignore
    /// let _guard = CONFIG_LOCK.lock().unwrap();
    /// let mut config = AppConfig::load()?;
    /// // 修改 config...
    /// config.save()?;
    /// ```
    pub static ref CONFIG_LOCK: Mutex<()> = Mutex::new(());
}

// ============================================================================
// 应用配置
// ============================================================================

fn default_recognition_language() -> String {
    "en-AU".to_string()
}

fn default_pass_threshold() -> u8 {
    DEFAULT_PASS_THRESHOLD
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 语音识别语言标签（BCP 47，传给识别协作方）
    #[serde(default = "default_recognition_language")]
    pub recognition_language: String,
    /// 发音及格线（0-100）
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u8,
    /// 词库文件路径覆盖（默认 data_dir/fingloss/terms.json）
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    /// 文本转语音配置
    #[serde(default)]
    pub tts: TtsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recognition_language: default_recognition_language(),
            pass_threshold: default_pass_threshold(),
            store_path: None,
            tts: TtsConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 配置文件路径：config_dir/fingloss/config.json
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        let app_dir = config_dir.join("fingloss");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("config.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// 从指定路径加载配置
    ///
    /// 文件不存在时返回默认配置；整体解析失败时尝试逐段恢复已知字段
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("配置文件不存在，返回默认配置");
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)?;

        // 先解析为 Value，整体反序列化失败时仍可恢复部分字段
        let v: serde_json::Value = serde_json::from_str(&content)?;

        let config: AppConfig = match serde_json::from_value(v.clone()) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("直接解析配置失败，尝试恢复已知字段: {}", e);
                let mut cfg = AppConfig::new();
                if let Some(tts) = v.get("tts") {
                    if let Ok(tts) = serde_json::from_value(tts.clone()) {
                        tracing::info!("成功恢复 tts 配置");
                        cfg.tts = tts;
                    }
                }
                if let Some(lang) = v.get("recognition_language").and_then(|l| l.as_str()) {
                    cfg.recognition_language = lang.to_string();
                }
                cfg
            }
        };

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// 保存配置到指定路径
    ///
    /// 原子写入：先写临时文件，原文件备份为 .bak，再重命名替换。
    /// 崩溃恢复：写临时文件失败原文件完好；替换失败可从 .bak 恢复。
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tracing::info!("保存配置到: {:?}", path);

        let temp_path = path.with_extension("json.tmp");
        let backup_path = path.with_extension("json.bak");

        std::fs::write(&temp_path, &content).map_err(|e| {
            tracing::error!("写入临时文件失败: {}", e);
            e
        })?;

        if path.exists() {
            if backup_path.exists() {
                let _ = std::fs::remove_file(&backup_path);
            }
            std::fs::rename(path, &backup_path).map_err(|e| {
                tracing::error!("备份旧配置文件失败: {}", e);
                e
            })?;
        }

        match std::fs::rename(&temp_path, path) {
            Ok(_) => {
                let _ = std::fs::remove_file(&backup_path);
                tracing::info!("配置保存成功");
                Ok(())
            }
            Err(e) => {
                tracing::error!("重命名临时文件失败: {}", e);
                if backup_path.exists() {
                    if let Err(restore_err) = std::fs::rename(&backup_path, path) {
                        tracing::error!("恢复备份失败: {}", restore_err);
                    } else {
                        tracing::info!("已从备份恢复配置");
                    }
                }
                Err(e.into())
            }
        }
    }

    /// 词库文件路径（配置覆盖优先）
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => crate::glossary::GlossaryStore::default_path(),
        }
    }
}
