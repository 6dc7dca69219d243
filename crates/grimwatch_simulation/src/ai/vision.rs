//! Vision oracle: range + detection cone + line of sight
//!
//! Чистые функции от входов; единственная внешняя зависимость — RayCaster,
//! который host внедряет через SightBlockers resource (constructor injection
//! вместо поиска raycast-нод по scene tree).

use bevy::prelude::*;

/// Результат ray cast'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Кого задел луч первым; None — статичная геометрия (стена)
    pub collider: Option<Entity>,
}

/// Абстракция ray cast'а host-физики
///
/// `cast` возвращает ПЕРВОЕ пересечение на отрезке from→to, либо None
/// если путь чист.
pub trait RayCaster: Send + Sync {
    fn cast(&self, from: Vec2, to: Vec2) -> Option<RayHit>;
}

/// Resource-обёртка над внедрённым RayCaster'ом
#[derive(Resource)]
pub struct SightBlockers(pub Box<dyn RayCaster>);

impl Default for SightBlockers {
    fn default() -> Self {
        Self(Box::new(NoObstructions))
    }
}

/// Открытое поле: луч никогда ничего не задевает
pub struct NoObstructions;

impl RayCaster for NoObstructions {
    fn cast(&self, _from: Vec2, _to: Vec2) -> Option<RayHit> {
        None
    }
}

/// Набор статичных стен-отрезков для headless прогонов
///
/// Замена настоящему физическому raycast'у в тестах и демо,
/// аналогично остальным kinematic stub'ам ядра.
pub struct StaticObstacles {
    pub segments: Vec<(Vec2, Vec2)>,
}

impl RayCaster for StaticObstacles {
    fn cast(&self, from: Vec2, to: Vec2) -> Option<RayHit> {
        for &(a, b) in &self.segments {
            if segments_intersect(from, to, a, b) {
                return Some(RayHit { collider: None });
            }
        }
        None
    }
}

/// Проверка пересечения отрезков p1p2 и p3p4 (ориентации через cross product)
fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
        (a - o).perp_dot(b - o)
    }

    let d1 = cross(p3, p4, p1);
    let d2 = cross(p3, p4, p2);
    let d3 = cross(p1, p2, p3);
    let d4 = cross(p1, p2, p4);

    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Попадает ли точка в detection cone
///
/// detection_angle ≥ 360 отключает угловой фильтр. Точка в самом origin
/// считается в конусе (направление не определено).
pub fn is_in_cone(origin: Vec2, forward: Vec2, fov_degrees: f32, point: Vec2) -> bool {
    if fov_degrees >= 360.0 {
        return true;
    }
    let to_point = point - origin;
    if to_point.length_squared() <= f32::EPSILON {
        return true;
    }
    forward.angle_to(to_point).abs() <= (fov_degrees * 0.5).to_radians()
}

/// Видна ли конкретная цель: радиус + конус + line of sight
///
/// Цель видна если луч ничего не задел, либо первым задел её саму.
/// Любая другая преграда дисквалифицирует.
pub fn is_candidate_visible(
    origin: Vec2,
    forward: Vec2,
    range: f32,
    fov_degrees: f32,
    candidate: Entity,
    candidate_pos: Vec2,
    blockers: &dyn RayCaster,
) -> bool {
    if origin.distance(candidate_pos) > range {
        return false;
    }
    if !is_in_cone(origin, forward, fov_degrees, candidate_pos) {
        return false;
    }
    match blockers.cast(origin, candidate_pos) {
        None => true,
        Some(hit) => hit.collider == Some(candidate),
    }
}

/// Ближайшая видимая цель из пула кандидатов
pub fn find_visible_target(
    origin: Vec2,
    forward: Vec2,
    range: f32,
    fov_degrees: f32,
    candidates: &[(Entity, Vec2)],
    blockers: &dyn RayCaster,
) -> Option<Entity> {
    let mut nearest: Option<(Entity, f32)> = None;

    for &(candidate, position) in candidates {
        if !is_candidate_visible(origin, forward, range, fov_degrees, candidate, position, blockers)
        {
            continue;
        }

        let distance = origin.distance(position);
        if let Some((_, best_distance)) = nearest {
            if distance < best_distance {
                nearest = Some((candidate, distance));
            }
        } else {
            nearest = Some((candidate, distance));
        }
    }

    nearest.map(|(entity, _)| entity)
}
