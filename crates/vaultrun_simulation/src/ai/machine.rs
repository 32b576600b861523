//! Generic FSM substrate для агентов.
//!
//! `AgentMachine<S>` владеет ровно одним текущим состоянием. Переход через
//! `goto`: повторный запрос текущего состояния — no-op (защита от повторных
//! entry side effects, например перезапуска отсчёта каждый кадр). Сами
//! enter/leave side effects исполняет вызывающая система сразу после
//! реального перехода — машина только гарантирует "не больше одного
//! активного состояния" и "переход либо был, либо нет".

use bevy::prelude::*;
use std::fmt::Debug;
use std::mem;

/// Состояние агента — закрытое перечисление.
///
/// Сравнение состояний в `goto` идёт по варианту enum'а (discriminant),
/// а не по payload: `DetectingPlayer` с другим значением таймера — это
/// ТО ЖЕ состояние, перезапуска не происходит.
pub trait AgentState: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Имя состояния для логов
    fn tag(&self) -> &'static str;
}

/// Машина состояний одного агента
#[derive(Component, Debug, Clone)]
pub struct AgentMachine<S: AgentState> {
    current: S,
}

impl<S: AgentState> AgentMachine<S> {
    /// Создать машину сразу в начальном состоянии.
    ///
    /// Это единственный "вход без предшествующего выхода" за жизнь агента —
    /// entry-эффекты начального состояния публикует спавнящая система.
    pub fn new(initial: S) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> &S {
        &self.current
    }

    /// Мутабельный доступ к payload текущего состояния (тики таймеров).
    /// Переходы — только через `goto`.
    pub fn current_mut(&mut self) -> &mut S {
        &mut self.current
    }

    /// Перейти в `next`. Возвращает покинутое состояние если переход
    /// реально произошёл; запрос того же варианта — `None`, без эффектов.
    pub fn goto(&mut self, next: S) -> Option<S> {
        if mem::discriminant(&self.current) == mem::discriminant(&next) {
            return None;
        }
        Some(mem::replace(&mut self.current, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestState {
        Off,
        Running { timer: f32 },
    }

    impl AgentState for TestState {
        fn tag(&self) -> &'static str {
            match self {
                TestState::Off => "Off",
                TestState::Running { .. } => "Running",
            }
        }
    }

    #[test]
    fn test_goto_returns_left_state() {
        let mut machine = AgentMachine::new(TestState::Off);
        let left = machine.goto(TestState::Running { timer: 2.0 });
        assert_eq!(left, Some(TestState::Off));
        assert_eq!(machine.current().tag(), "Running");
    }

    #[test]
    fn test_same_variant_is_noop() {
        let mut machine = AgentMachine::new(TestState::Running { timer: 2.0 });

        // Тот же вариант с другим payload — НЕ переход, таймер не трогаем
        let left = machine.goto(TestState::Running { timer: 99.0 });
        assert_eq!(left, None);
        assert_eq!(*machine.current(), TestState::Running { timer: 2.0 });
    }

    #[test]
    fn test_payload_mutation_in_place() {
        let mut machine = AgentMachine::new(TestState::Running { timer: 2.0 });
        if let TestState::Running { timer } = machine.current_mut() {
            *timer -= 0.5;
        }
        assert_eq!(*machine.current(), TestState::Running { timer: 1.5 });
    }
}
