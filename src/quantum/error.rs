use thiserror::Error;

/// Ошибки квантового модуля
#[derive(Debug, Error)]
pub enum QuantumError {
    /// Некорректный аргумент операции
    #[error("Некорректный аргумент: {0}")]
    InvalidArgument(String),

    /// Размерности амплитудных векторов не совпадают
    #[error("Несовпадение размерностей: {left} и {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Операция над неинициализированным полем
    #[error("Поле не инициализировано")]
    Uninitialized,
}

pub type Result<T> = std::result::Result<T, QuantumError>;
