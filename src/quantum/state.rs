use std::f64::consts::{FRAC_PI_4, FRAC_PI_6, FRAC_PI_8, TAU};
use std::str::FromStr;

use num_complex::Complex;
use serde::{Serialize, Deserialize};

use crate::quantum::error::{QuantumError, Result};

const FRAC_PI_12: f64 = std::f64::consts::PI / 12.0;

/// Правило одного шага эволюции состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionPattern {
    /// Стабилизация: вероятность подтягивается к 1
    Integrate,
    /// Постепенный распад вероятности
    Split,
    /// Осцилляция, управляемая самой фазой
    Cycle,
    /// Релаксация вероятности к 0.5
    Balance,
}

impl FromStr for EvolutionPattern {
    type Err = QuantumError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "integrate" => Ok(Self::Integrate),
            "split" => Ok(Self::Split),
            "cycle" => Ok(Self::Cycle),
            "balance" => Ok(Self::Balance),
            other => Err(QuantumError::InvalidArgument(format!(
                "неизвестный паттерн эволюции: {}",
                other
            ))),
        }
    }
}

/// Квантовое состояние
///
/// Инварианты удерживаются после каждой мутации: вероятность в [0, 1],
/// фаза в [0, 2π), энергия неотрицательна. Энтропия — производная
/// величина и пересчитывается при изменении вероятности или амплитуды.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantumState {
    probability: f64,
    phase: f64,
    energy: f64,
    entropy: f64,
    amplitude: Vec<Complex<f64>>,
}

impl Default for QuantumState {
    fn default() -> Self {
        Self {
            probability: 1.0,
            phase: 0.0,
            energy: 1.0,
            entropy: 0.0,
            amplitude: vec![Complex::new(1.0, 0.0)],
        }
    }
}

impl QuantumState {
    /// Основное состояние: вероятность 1, фаза 0, энергия 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Основное состояние с амплитудным вектором размерности `dimension`
    pub fn with_dimension(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        let mut amplitude = vec![Complex::new(0.0, 0.0); dimension];
        amplitude[0] = Complex::new(1.0, 0.0);
        let mut state = Self {
            amplitude,
            ..Self::default()
        };
        state.recompute_entropy();
        state
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    pub fn amplitude(&self) -> &[Complex<f64>] {
        &self.amplitude
    }

    pub fn dimension(&self) -> usize {
        self.amplitude.len()
    }

    /// Устанавливает вероятность, обрезая её в [0, 1]
    pub fn set_probability(&mut self, probability: f64) {
        self.probability = probability.clamp(0.0, 1.0);
        self.recompute_entropy();
    }

    /// Устанавливает фазу, приводя её по модулю 2π в [0, 2π)
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = normalize_phase(phase);
    }

    /// Устанавливает энергию, обрезая её снизу нулём
    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy.max(0.0);
    }

    /// Заменяет амплитудный вектор; пустой вектор недопустим
    pub fn set_amplitude(&mut self, amplitude: Vec<Complex<f64>>) -> Result<()> {
        if amplitude.is_empty() {
            return Err(QuantumError::InvalidArgument(
                "амплитудный вектор не может быть пустым".to_string(),
            ));
        }
        self.amplitude = amplitude;
        self.recompute_entropy();
        Ok(())
    }

    /// Один шаг эволюции по заданному правилу
    pub fn evolve(&mut self, pattern: EvolutionPattern) {
        match pattern {
            EvolutionPattern::Integrate => {
                self.phase = normalize_phase(self.phase + FRAC_PI_4);
                self.probability = self.probability.powf(0.9);
            }
            EvolutionPattern::Split => {
                self.phase = normalize_phase(self.phase + FRAC_PI_8);
                self.probability *= 0.95;
            }
            EvolutionPattern::Cycle => {
                // Осцилляция считается от уже обновлённой фазы
                self.phase = normalize_phase(self.phase + FRAC_PI_6);
                self.probability = 0.5 + 0.5 * self.phase.sin();
            }
            EvolutionPattern::Balance => {
                self.phase = normalize_phase(self.phase + FRAC_PI_12);
                self.probability = (self.probability + 0.5) / 2.0;
            }
        }
        self.probability = self.probability.clamp(0.0, 1.0);
        self.sync_amplitude();
        self.recompute_entropy();
    }

    /// Разбирает имя паттерна и применяет шаг эволюции.
    /// При неизвестном имени состояние не меняется.
    pub fn evolve_named(&mut self, pattern: &str) -> Result<()> {
        let pattern = EvolutionPattern::from_str(pattern)?;
        self.evolve(pattern);
        Ok(())
    }

    /// Детерминированный коллапс измерения: вероятность схлопывается
    /// к ближайшему полюсу, фаза сбрасывается. Идемпотентен.
    pub fn collapse(&mut self) {
        let certain = self.probability >= 0.5;
        self.probability = if certain { 1.0 } else { 0.0 };
        self.phase = 0.0;
        self.amplitude = vec![Complex::new(if certain { 1.0 } else { 0.0 }, 0.0)];
        self.recompute_entropy();
    }

    /// Добавляет энергию и подтягивает вероятность к 1 по закону
    /// экспоненциального насыщения. Отрицательная дельта отклоняется.
    pub fn add_energy(&mut self, delta: f64) -> Result<()> {
        if delta < 0.0 {
            return Err(QuantumError::InvalidArgument(format!(
                "отрицательная дельта энергии: {}",
                delta
            )));
        }
        let old_energy = self.energy;
        self.energy += delta;
        // При нулевой исходной энергии показатель не определён,
        // вероятность не трогаем
        if old_energy > 0.0 {
            let gain = 1.0 - (-delta / old_energy).exp();
            self.probability = (self.probability + (1.0 - self.probability) * gain)
                .clamp(0.0, 1.0);
            self.recompute_entropy();
        }
        Ok(())
    }

    /// Когерентность: выравненность фазы, взвешенная вероятностью
    pub fn coherence(&self) -> f64 {
        ((self.phase.cos() + 1.0) * self.probability / 2.0).clamp(0.0, 1.0)
    }

    /// Мера запутанности: как когерентность, но с квадратом вероятности
    pub fn entanglement_measure(&self) -> f64 {
        ((self.phase.cos() + 1.0) * self.probability * self.probability / 2.0).clamp(0.0, 1.0)
    }

    /// Взвешенная оценка устойчивости состояния
    pub fn stability(&self) -> f64 {
        let phase_term = 1.0 - self.phase.sin().abs();
        let probability_term = 1.0 - 2.0 * (self.probability - 0.5).abs();
        let energy_term = (-self.energy).exp();
        let entropy_term = 1.0 - self.entropy;
        (0.3 * phase_term + 0.3 * probability_term + 0.2 * energy_term + 0.2 * entropy_term)
            .clamp(0.0, 1.0)
    }

    /// Комплексное скалярное произведение амплитудных векторов
    pub fn dot(&self, other: &QuantumState) -> Result<Complex<f64>> {
        if self.amplitude.len() != other.amplitude.len() {
            return Err(QuantumError::DimensionMismatch {
                left: self.amplitude.len(),
                right: other.amplitude.len(),
            });
        }
        Ok(self
            .amplitude
            .iter()
            .zip(other.amplitude.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Ведущая компонента амплитуды следует за фазой и вероятностью
    fn sync_amplitude(&mut self) {
        self.amplitude[0] = Complex::from_polar(self.probability.sqrt(), self.phase);
    }

    /// Пересчёт энтропии: нормированный Шеннон по |aᵢ|² для богатого
    /// представления, бинарный Шеннон по вероятности для скалярного
    fn recompute_entropy(&mut self) {
        self.entropy = if self.amplitude.len() > 1 {
            normalized_shannon(&self.amplitude)
        } else {
            binary_shannon(self.probability)
        };
    }
}

/// Приводит угол по модулю 2π в [0, 2π)
fn normalize_phase(phase: f64) -> f64 {
    let normalized = phase.rem_euclid(TAU);
    if normalized >= TAU {
        0.0
    } else {
        normalized
    }
}

/// Бинарная энтропия Шеннона, нормированная в [0, 1]
fn binary_shannon(probability: f64) -> f64 {
    let p = probability.clamp(0.0, 1.0);
    if p <= f64::EPSILON || p >= 1.0 - f64::EPSILON {
        return 0.0;
    }
    -(p * p.ln() + (1.0 - p) * (1.0 - p).ln()) / std::f64::consts::LN_2
}

/// Энтропия по квадратам норм амплитуд, отмасштабированная максимумом
/// для данной размерности; распределение неявно перенормируется
fn normalized_shannon(amplitude: &[Complex<f64>]) -> f64 {
    let total: f64 = amplitude.iter().map(|a| a.norm_sqr()).sum();
    if total <= f64::EPSILON {
        return 0.0;
    }
    let mut entropy = 0.0;
    for component in amplitude {
        let weight = component.norm_sqr() / total;
        if weight > f64::EPSILON {
            entropy -= weight * weight.ln();
        }
    }
    entropy / (amplitude.len() as f64).ln()
}
