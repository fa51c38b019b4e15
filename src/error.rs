//! Ошибки построения сетки и загрузки конфигурации.
//!
//! Сам вывод цивилизации не возвращает ошибок: недостижимые цели, нехватка
//! кандидатов и циклы родителей — штатные исходы генерации (фронтир).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CivGenError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid size mismatch: expected {expected} nodes, got {actual}")]
    GridSizeMismatch { expected: usize, actual: usize },
    #[error("grid must be non-empty")]
    EmptyGrid,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CivGenError>;
