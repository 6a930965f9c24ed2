pub mod config;
pub mod error;
pub mod field;
pub mod state;


pub use config::QuantumConfig;
pub use error::{QuantumError, Result};
pub use field::{CoherentField, FieldPattern, QuantumField};
pub use state::{EvolutionPattern, QuantumState};

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use rayon::prelude::*;

/// Разделяемое между потоками состояние: читатели параллельны,
/// мутация требует эксклюзивного доступа
pub type StateHandle = Arc<RwLock<QuantumState>>;

fn read_state(handle: &StateHandle) -> RwLockReadGuard<'_, QuantumState> {
    match handle.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_state(handle: &StateHandle) -> RwLockWriteGuard<'_, QuantumState> {
    match handle.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Агрегат: именованная коллекция состояний плюс одно поле.
/// Системные метрики пересчитываются по требованию из членов коллекции.
pub struct QuantumSystem {
    states: HashMap<String, StateHandle>,
    field: Box<dyn QuantumField>,
    config: QuantumConfig,
}

impl QuantumSystem {
    pub fn new(config: QuantumConfig) -> Self {
        Self {
            field: Box::new(CoherentField::initialized(config.clone())),
            states: HashMap::new(),
            config,
        }
    }

    /// Система с альтернативным вариантом поля
    pub fn with_field(config: QuantumConfig, field: Box<dyn QuantumField>) -> Self {
        Self {
            states: HashMap::new(),
            field,
            config,
        }
    }

    pub fn config(&self) -> &QuantumConfig {
        &self.config
    }

    /// Добавляет состояние; повторный идентификатор не ошибка,
    /// побеждает последняя запись, прежнее состояние возвращается
    pub fn add_state(&mut self, id: impl Into<String>, state: QuantumState) -> Option<QuantumState> {
        let id = id.into();
        debug!("add state: id={}", id);
        self.states
            .insert(id, Arc::new(RwLock::new(state)))
            .map(|previous| read_state(&previous).clone())
    }

    pub fn remove_state(&mut self, id: &str) -> Option<QuantumState> {
        debug!("remove state: id={}", id);
        self.states
            .remove(id)
            .map(|removed| read_state(&removed).clone())
    }

    /// Ленивая перезапускаемая последовательность членов коллекции;
    /// порядок не специфицирован
    pub fn states(&self) -> impl Iterator<Item = (&str, &StateHandle)> {
        self.states.iter().map(|(id, handle)| (id.as_str(), handle))
    }

    pub fn state(&self, id: &str) -> Option<StateHandle> {
        self.states.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Средняя когерентность членов системы
    pub fn coherence(&self) -> f64 {
        if self.states.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .states
            .par_iter()
            .map(|(_, handle)| read_state(handle).coherence())
            .sum();
        total / self.states.len() as f64
    }

    /// Средняя мера запутанности, ограниченная конфигурацией
    pub fn entanglement(&self) -> f64 {
        if self.states.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .states
            .par_iter()
            .map(|(_, handle)| read_state(handle).entanglement_measure())
            .sum();
        (total / self.states.len() as f64).min(self.config.max_entanglement)
    }

    /// Суммарная энергия членов системы
    pub fn energy(&self) -> f64 {
        self.states
            .par_iter()
            .map(|(_, handle)| read_state(handle).energy())
            .sum()
    }

    /// Снимок именованных метрик для внешнего отчёта
    pub fn metrics(&self) -> HashMap<String, f64> {
        let count = self.states.len();
        let energy = self.energy();
        let mut metrics = HashMap::new();
        metrics.insert("states".to_string(), count as f64);
        metrics.insert("coherence".to_string(), self.coherence());
        metrics.insert("entanglement".to_string(), self.entanglement());
        metrics.insert("energy".to_string(), energy);
        metrics.insert(
            "average_energy".to_string(),
            if count > 0 { energy / count as f64 } else { 0.0 },
        );
        metrics.insert("field_coherence".to_string(), self.field.coherence());
        metrics.insert("field_entropy".to_string(), self.field.entropy());
        metrics
    }

    /// Взаимное запутывание двух членов системы: фазы и энергии
    /// усредняются, вероятности ограничиваются меньшей когерентностью.
    ///
    /// Блокировки берутся в едином порядке по ключу, чтобы встречные
    /// вызовы (a, b) и (b, a) не взаимоблокировались.
    pub fn entangle(&self, id_a: &str, id_b: &str) -> Result<()> {
        let handle_a = self.handle(id_a)?;
        let handle_b = self.handle(id_b)?;
        if id_a == id_b {
            // Пара из одного состояния: связывать нечего
            let _guard = write_state(&handle_a);
            return Ok(());
        }
        let (mut first, mut second) = lock_pair(id_a, &handle_a, id_b, &handle_b);
        let mean_phase = (first.phase() + second.phase()) / 2.0;
        let mean_energy = (first.energy() + second.energy()) / 2.0;
        let bond = first
            .coherence()
            .min(second.coherence())
            .min(self.config.max_entanglement);
        for state in [&mut *first, &mut *second] {
            state.set_phase(mean_phase);
            state.set_energy(mean_energy);
            state.set_probability(bond);
        }
        debug!("entangled: {} <-> {}, bond={:.6}", id_a, id_b, bond);
        Ok(())
    }

    /// Резонансный перенос энергии между двумя членами системы:
    /// доля разрыва перетекает от богатого к бедному, фазы
    /// подтягиваются к среднему. Суммарная энергия сохраняется.
    pub fn resonate(&self, id_a: &str, id_b: &str) -> Result<()> {
        let handle_a = self.handle(id_a)?;
        let handle_b = self.handle(id_b)?;
        if id_a == id_b {
            let _guard = write_state(&handle_a);
            return Ok(());
        }
        let rate = self.config.entanglement_rate;
        let (mut first, mut second) = lock_pair(id_a, &handle_a, id_b, &handle_b);
        let (energy_a, energy_b) = (first.energy(), second.energy());
        let (phase_a, phase_b) = (first.phase(), second.phase());
        let flow = rate * (energy_a - energy_b) / 2.0;
        let mean_phase = (phase_a + phase_b) / 2.0;
        first.set_energy(energy_a - flow);
        second.set_energy(energy_b + flow);
        first.set_phase(phase_a + rate * (mean_phase - phase_a));
        second.set_phase(phase_b + rate * (mean_phase - phase_b));
        debug!("resonated: {} <-> {}, flow={:.6}", id_a, id_b, flow);
        Ok(())
    }

    /// Шаг эволюции поля системы
    pub fn evolve_field(&mut self, pattern: FieldPattern) -> Result<()> {
        self.field.evolve(pattern)
    }

    /// Измерение поля системы
    pub fn measure_field(&mut self) -> Result<f64> {
        self.field.measure()
    }

    pub fn field(&self) -> &dyn QuantumField {
        self.field.as_ref()
    }

    pub fn field_mut(&mut self) -> &mut dyn QuantumField {
        self.field.as_mut()
    }

    fn handle(&self, id: &str) -> Result<StateHandle> {
        self.states
            .get(id)
            .cloned()
            .ok_or_else(|| QuantumError::InvalidArgument(format!("неизвестное состояние: {}", id)))
    }
}

/// Захватывает пару блокировок в стабильном порядке по ключу
fn lock_pair<'a>(
    id_a: &str,
    handle_a: &'a StateHandle,
    id_b: &str,
    handle_b: &'a StateHandle,
) -> (
    RwLockWriteGuard<'a, QuantumState>,
    RwLockWriteGuard<'a, QuantumState>,
) {
    if id_a <= id_b {
        let guard_a = write_state(handle_a);
        let guard_b = write_state(handle_b);
        (guard_a, guard_b)
    } else {
        let guard_b = write_state(handle_b);
        let guard_a = write_state(handle_a);
        (guard_a, guard_b)
    }
}
