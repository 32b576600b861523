//! Countdown-таймер для FSM состояний (detection buildup, search timeout).

use bevy::prelude::*;

/// Скалярный обратный отсчёт.
///
/// Остаток НЕ клампится к нулю: после истечения продолжает уходить в минус,
/// поэтому `expired()` стабилен — однажды истёкший таймер истёкшим и остаётся,
/// сколько бы его ни тикали дальше.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CountdownTimer {
    remaining: f32,
}

impl CountdownTimer {
    /// Запустить отсчёт от duration секунд
    pub fn start(duration: f32) -> Self {
        Self { remaining: duration }
    }

    /// Списать delta секунд, вернуть остаток
    pub fn tick_down(&mut self, delta: f32) -> f32 {
        self.remaining -= delta;
        self.remaining
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Истёк ли отсчёт (остаток ≤ 0)
    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }
}
