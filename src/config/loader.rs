use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// 默认配置文件名（位于仓库根目录）
pub const DEFAULT_CONFIG_FILE: &str = "mif.toml";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从仓库根目录加载配置
    ///
    /// 合并顺序（后者覆盖前者）：
    /// 1. 内置默认值
    /// 2. `<root>/mif.toml` 或显式指定的配置文件
    /// 3. `MIF_` 前缀的环境变量（`__` 分隔层级，如 `MIF_LOGGING__LEVEL`）
    /// 4. 命令行给出的根目录
    pub fn load(root: &Path, config_file: Option<PathBuf>) -> Result<AppConfig, figment::Error> {
        let config_file = config_file.unwrap_or_else(|| root.join(DEFAULT_CONFIG_FILE));

        Self::figment(root, &config_file).extract()
    }

    fn figment(root: &Path, config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("MIF_").split("__"))
            .merge(Serialized::default("root", root))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        let format = &config.format;

        if format.urn_scheme.is_empty() {
            return Err(ConfigValidationError::EmptyField("format.urn_scheme"));
        }

        if format.ontology_scheme.is_empty() {
            return Err(ConfigValidationError::EmptyField("format.ontology_scheme"));
        }

        if format.base_ontology.is_empty() {
            return Err(ConfigValidationError::EmptyField("format.base_ontology"));
        }

        if format.marker().is_none() {
            return Err(ConfigValidationError::InvalidMarker(
                format.namespace_marker.clone(),
            ));
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("配置项 `{0}` 不能为空")]
    EmptyField(&'static str),

    #[error("命名空间标记必须是单个字符: {0:?}")]
    InvalidMarker(String),
}

impl From<ConfigValidationError> for crate::error::MifError {
    fn from(e: ConfigValidationError) -> Self {
        crate::error::MifError::Config(e.to_string())
    }
}
