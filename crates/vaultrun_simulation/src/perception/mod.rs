//! Perception — конус зрения робота.
//!
//! `can_see` — stateless запрос "видит ли наблюдатель цель": сначала
//! line-of-sight (луч до цели не перекрыт геометрией), затем угол между
//! forward наблюдателя и направлением на цель против половины конуса.
//! Проверка угла односторонняя: угол — неотрицательная величина,
//! нижней границы у конуса нет.
//!
//! Тест перекрытия инжектируется (`LineOfSight`): в полной игре это raycast
//! tactical-слоя, в headless-симуляции — набор AABB-окклюдеров
//! (`SightBlockers` resource).

use bevy::prelude::*;

/// Тест перекрытия луча зрения внешней геометрией
pub trait LineOfSight {
    /// true если отрезок from → to перекрыт (цель не видна)
    fn blocked(&self, from: Vec3, to: Vec3) -> bool;
}

/// Axis-aligned box — стена/ящик, перекрывающий зрение
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occluder {
    pub min: Vec3,
    pub max: Vec3,
}

impl Occluder {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Пересекает ли отрезок from → to этот box (slab test, t ∈ [0, 1])
    pub fn segment_hits(&self, from: Vec3, to: Vec3) -> bool {
        let dir = to - from;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = from[axis];
            let d = dir[axis];

            if d.abs() < 1e-8 {
                // Отрезок параллелен slab — либо внутри, либо мимо
                if origin < self.min[axis] || origin > self.max[axis] {
                    return false;
                }
            } else {
                let inv = 1.0 / d;
                let mut t0 = (self.min[axis] - origin) * inv;
                let mut t1 = (self.max[axis] - origin) * inv;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return false;
                }
            }
        }

        true
    }
}

/// Окклюдеры уровня — headless-замена raycast'а tactical-слоя
#[derive(Resource, Debug, Clone, Default)]
pub struct SightBlockers {
    pub occluders: Vec<Occluder>,
}

impl SightBlockers {
    pub fn with_occluders(occluders: Vec<Occluder>) -> Self {
        Self { occluders }
    }
}

impl LineOfSight for SightBlockers {
    fn blocked(&self, from: Vec3, to: Vec3) -> bool {
        self.occluders.iter().any(|o| o.segment_hits(from, to))
    }
}

/// Видит ли наблюдатель цель.
///
/// `fov_degrees` — полный угол конуса (градусы); видимость требует
/// угол(forward, на цель) ≤ fov/2 И свободный line-of-sight.
/// Без side effects — безопасно звать каждый тик из любого состояния.
pub fn can_see(
    observer: Vec3,
    forward: Vec3,
    fov_degrees: f32,
    target: Vec3,
    los: &impl LineOfSight,
) -> bool {
    let to_target = target - observer;

    // Цель в той же точке — видна тривиально (направления нет, перекрыть нечего)
    if to_target.length_squared() <= f32::EPSILON {
        return true;
    }

    if los.blocked(observer, target) {
        return false;
    }

    let angle = forward.angle_between(to_target).to_degrees();
    angle <= fov_degrees / 2.0
}
