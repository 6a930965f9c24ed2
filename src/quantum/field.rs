use std::time::Instant;

use log::{debug, trace};
use serde::{Serialize, Deserialize};

use crate::quantum::config::QuantumConfig;
use crate::quantum::error::{QuantumError, Result};
use crate::quantum::state::{EvolutionPattern, QuantumState};

/// Внешний тег эволюции поля
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldPattern {
    Stable,
    Chaos,
    Oscillate,
    Spiral,
}

impl FieldPattern {
    /// Таблица соответствия внешних тегов внутренним правилам эволюции.
    /// Чистые данные: новые варианты поля добавляются без правок QuantumState.
    pub fn rule(self) -> EvolutionPattern {
        match self {
            FieldPattern::Stable => EvolutionPattern::Balance,
            FieldPattern::Chaos => EvolutionPattern::Split,
            FieldPattern::Oscillate => EvolutionPattern::Cycle,
            FieldPattern::Spiral => EvolutionPattern::Integrate,
        }
    }

    /// Разбор внешнего тега; неизвестное имя трактуется как Spiral
    /// (правило по умолчанию — Integrate)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "stable" => FieldPattern::Stable,
            "chaos" => FieldPattern::Chaos,
            "oscillate" => FieldPattern::Oscillate,
            _ => FieldPattern::Spiral,
        }
    }
}

/// Полиморфный драйвер эволюции над одним квантовым состоянием
///
/// Любая мутирующая операция требует предварительной инициализации
/// и возвращает `Uninitialized` без неё.
pub trait QuantumField: Send + Sync {
    fn initialize(&mut self);
    /// Повторная инициализация
    fn reset(&mut self);
    /// Целиком заменяет владеемое состояние, запомнив прежнее в кэше
    fn update(&mut self, new_state: QuantumState) -> Result<()>;
    /// Один шаг эволюции по внешнему тегу
    fn evolve(&mut self, pattern: FieldPattern) -> Result<()>;
    /// Сдвигает состояние на половину пути к целевому по фазе, энергии и вероятности
    fn transform(&mut self, target: &QuantumState) -> Result<()>;
    /// Связывает владеемое состояние с партнёром: усреднение фазы и
    /// энергии, вероятность ограничивается меньшей из когерентностей
    fn entangle(&mut self, other: &QuantumState) -> Result<()>;
    /// Потеря когерентности: энтропия только растёт, когерентность только падает
    fn decohere(&mut self) -> Result<()>;
    /// Наблюдение: возвращает фазу до измерения, декогерирует и коллапсирует состояние
    fn measure(&mut self) -> Result<f64>;

    fn phase(&self) -> f64;
    fn coherence(&self) -> f64;
    fn entropy(&self) -> f64;
    fn state(&self) -> Option<&QuantumState>;
    fn is_initialized(&self) -> bool;
}

/// Снимок предыдущего поколения состояния
#[derive(Debug, Clone)]
struct Snapshot {
    state: QuantumState,
    phase: f64,
    energy: f64,
    taken_at: Instant,
}

/// Базовая реализация поля: одно владеемое состояние плюс
/// одногенерационный кэш для расчёта затухания
#[derive(Debug)]
pub struct CoherentField {
    config: QuantumConfig,
    state: Option<QuantumState>,
    cache: Option<Snapshot>,
    coherence: f64,
    entropy: f64,
    last_tick: Instant,
}

impl CoherentField {
    /// Создаёт неинициализированное поле
    pub fn new(config: QuantumConfig) -> Self {
        Self {
            config,
            state: None,
            cache: None,
            coherence: 1.0,
            entropy: 0.0,
            last_tick: Instant::now(),
        }
    }

    /// Создаёт поле и сразу инициализирует его
    pub fn initialized(config: QuantumConfig) -> Self {
        let mut field = Self::new(config);
        field.initialize();
        field
    }

    pub fn config(&self) -> &QuantumConfig {
        &self.config
    }

    fn require_initialized(&self) -> Result<()> {
        if self.state.is_some() {
            Ok(())
        } else {
            Err(QuantumError::Uninitialized)
        }
    }

    /// Перезаписывает кэш снимком текущего состояния.
    /// Вызывается в начале каждой мутирующей операции.
    fn snapshot(&mut self) {
        if let Some(state) = &self.state {
            self.cache = Some(Snapshot {
                state: state.clone(),
                phase: state.phase(),
                energy: state.energy(),
                taken_at: Instant::now(),
            });
        }
    }

    /// Затухание, управляемое временем и величиной изменения.
    ///
    /// Накопленное с прошлого такта время умножается на |Δфаза| + |Δэнергия|
    /// относительно кэшированного снимка; когерентность умножается на
    /// экспоненциальный фактор, энтропия прирастает. Обе величины живут
    /// в собственных полях и никогда не пишутся в фазу или энергию.
    fn update_coherence_and_entropy(&mut self) {
        let elapsed = self.last_tick.elapsed().as_secs_f64();
        self.last_tick = Instant::now();
        let (Some(cache), Some(state)) = (&self.cache, &self.state) else {
            return;
        };
        let drift = (state.phase() - cache.phase).abs() + (state.energy() - cache.energy).abs();
        if drift <= 0.0 || elapsed <= 0.0 {
            return;
        }
        let decay = (-(drift * elapsed) / self.config.coherence_time).exp();
        self.coherence = (self.coherence * decay).clamp(0.0, 1.0);
        self.entropy += self.config.decoherence_rate * drift * elapsed;
        trace!(
            "field decay: drift={:.6}, elapsed={:.6}s, coherence={:.6}, entropy={:.6}",
            drift,
            elapsed,
            self.coherence,
            self.entropy
        );
    }

    /// Фаза предыдущего поколения (если кэш уже заполнялся)
    pub fn cached_phase(&self) -> Option<f64> {
        self.cache.as_ref().map(|snapshot| snapshot.phase)
    }

    /// Состояние предыдущего поколения
    pub fn cached_state(&self) -> Option<&QuantumState> {
        self.cache.as_ref().map(|snapshot| &snapshot.state)
    }

    /// Возраст кэшированного снимка в секундах
    pub fn cache_age(&self) -> Option<f64> {
        self.cache
            .as_ref()
            .map(|snapshot| snapshot.taken_at.elapsed().as_secs_f64())
    }
}

impl QuantumField for CoherentField {
    fn initialize(&mut self) {
        self.state = Some(QuantumState::with_dimension(self.config.dimension));
        self.cache = None;
        self.coherence = 1.0;
        self.entropy = 0.0;
        self.last_tick = Instant::now();
        debug!("field initialized: dimension={}", self.config.dimension);
    }

    fn reset(&mut self) {
        self.initialize();
    }

    fn update(&mut self, new_state: QuantumState) -> Result<()> {
        self.require_initialized()?;
        self.snapshot();
        self.state = Some(new_state);
        self.update_coherence_and_entropy();
        Ok(())
    }

    fn evolve(&mut self, pattern: FieldPattern) -> Result<()> {
        self.require_initialized()?;
        self.snapshot();
        if let Some(state) = self.state.as_mut() {
            state.evolve(pattern.rule());
        }
        self.update_coherence_and_entropy();
        trace!("field evolved: pattern={:?}", pattern);
        Ok(())
    }

    fn transform(&mut self, target: &QuantumState) -> Result<()> {
        self.require_initialized()?;
        self.snapshot();
        if let Some(state) = self.state.as_mut() {
            state.set_phase((state.phase() + target.phase()) / 2.0);
            state.set_energy((state.energy() + target.energy()) / 2.0);
            state.set_probability((state.probability() + target.probability()) / 2.0);
        }
        self.update_coherence_and_entropy();
        Ok(())
    }

    fn entangle(&mut self, other: &QuantumState) -> Result<()> {
        self.require_initialized()?;
        self.snapshot();
        if let Some(state) = self.state.as_mut() {
            let bond = state
                .coherence()
                .min(other.coherence())
                .min(self.config.max_entanglement);
            state.set_phase((state.phase() + other.phase()) / 2.0);
            state.set_energy((state.energy() + other.energy()) / 2.0);
            state.set_probability(bond);
        }
        // Запутывание не уменьшает энтропию системы
        self.entropy += self.config.entanglement_rate;
        self.update_coherence_and_entropy();
        Ok(())
    }

    fn decohere(&mut self) -> Result<()> {
        self.require_initialized()?;
        self.snapshot();
        self.entropy += self.config.decoherence_rate;
        self.coherence = (self.coherence * 0.8).clamp(0.0, 1.0);
        self.update_coherence_and_entropy();
        Ok(())
    }

    fn measure(&mut self) -> Result<f64> {
        self.require_initialized()?;
        self.snapshot();
        let observed = self.phase();
        self.decohere()?;
        if let Some(state) = self.state.as_mut() {
            state.collapse();
        }
        self.update_coherence_and_entropy();
        debug!("field measured: phase={:.6}", observed);
        Ok(observed)
    }

    fn phase(&self) -> f64 {
        self.state.as_ref().map(|state| state.phase()).unwrap_or(0.0)
    }

    fn coherence(&self) -> f64 {
        self.coherence
    }

    fn entropy(&self) -> f64 {
        self.entropy
    }

    fn state(&self) -> Option<&QuantumState> {
        self.state.as_ref()
    }

    fn is_initialized(&self) -> bool {
        self.state.is_some()
    }
}
