use serde::{Serialize, Deserialize};

/// Конфигурация квантового ядра
///
/// Все константы настройки передаются при создании поля/системы,
/// глобального изменяемого состояния нет.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantumConfig {
    /// Размерность амплитудного вектора создаваемых состояний
    pub dimension: usize,
    /// Верхняя граница меры запутанности
    pub max_entanglement: f64,
    /// Постоянная времени затухания когерентности (в секундах)
    pub coherence_time: f64,
    /// Скорость декогеренции (прирост энтропии за один вызов decohere)
    pub decoherence_rate: f64,
    /// Скорость запутывания (прирост энтропии при entangle, доля переноса при резонансе)
    pub entanglement_rate: f64,
    /// Рекомендуемый интервал между тактами внешнего драйвера (в секундах)
    pub update_interval: f64,
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            dimension: 3,
            max_entanglement: 1.0,
            coherence_time: 1.0,
            decoherence_rate: 0.1,
            entanglement_rate: 0.1,
            update_interval: 0.1,
        }
    }
}
