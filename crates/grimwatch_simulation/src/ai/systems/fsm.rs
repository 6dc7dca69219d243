//! FSM AI system: transition evaluation (один проход на fixed тик)
//!
//! Порядок проверок внутри тика:
//! 1. Dead — терминально, пропускаем
//! 2. Stunned — только отсчёт таймера, target-логика пропускается целиком
//! 3. Re-validation отслеживаемой цели СТРОГО до проверки attack range
//!    (цель, убитая ровно на входе в attack range, не даёт атаку по трупу)
//! 4. Acquisition через vision oracle
//! 5. Range/delay переходы

use bevy::prelude::*;

use crate::ai::vision::{self, SightBlockers};
use crate::ai::{
    AgentConfig, AgentState, AttackReady, PatrolState, PreviousState, TargetDetected, TargetLost,
};
use crate::components::{Agent, Facing, Targetable};
use crate::logger;

/// Переход с защитой от самоперехода (сравнение по дискриминанту)
///
/// Повторная установка текущего варианта — no-op: никаких повторных
/// entry-эффектов и дублей событий. Возвращает true если переход случился.
pub(crate) fn transition_to(
    agent: Entity,
    state: &mut AgentState,
    previous: &mut PreviousState,
    next: AgentState,
) -> bool {
    if std::mem::discriminant(&*state) == std::mem::discriminant(&next) {
        return false;
    }
    logger::log(&format!(
        "AI: {:?} {} → {}",
        agent,
        state.name(),
        next.name()
    ));
    previous.0 = state.clone();
    *state = next;
    true
}

/// Система: FSM transitions
pub fn ai_fsm_transitions(
    mut agents: Query<
        (
            Entity,
            &Transform,
            &mut AgentState,
            &mut PreviousState,
            &AgentConfig,
            &mut PatrolState,
            &Facing,
        ),
        With<Agent>,
    >,
    candidates: Query<(Entity, &Targetable, &Transform)>,
    blockers: Res<SightBlockers>,
    time: Res<Time<Fixed>>,
    mut detected_events: EventWriter<TargetDetected>,
    mut lost_events: EventWriter<TargetLost>,
    mut attack_events: EventWriter<AttackReady>,
) {
    let delta = time.delta_secs();

    for (entity, transform, mut state, mut previous, config, mut patrol, facing) in
        agents.iter_mut()
    {
        // 1. Dead — терминально
        if state.is_dead() {
            continue;
        }

        // 2. Stunned: единственный выход — по таймеру, в Patrol
        if let AgentState::Stunned { timer } = *state {
            let remaining = timer - delta;
            if remaining <= 0.0 {
                patrol.wait_timer = 0.0;
                transition_to(entity, &mut state, &mut previous, AgentState::Patrol);
            } else {
                *state = AgentState::Stunned { timer: remaining };
            }
            continue;
        }

        let origin = transform.translation.truncate();
        let forward = facing.forward();

        // 3. Re-validation: despawn/чужая группа/вне радиуса-конуса/перекрыта —
        //    всё одно и то же «цель потеряна»
        let mut tracked = state.target();
        if let Some(target) = tracked {
            let visible = candidates
                .get(target)
                .ok()
                .filter(|(_, targetable, _)| targetable.group == config.target_group)
                .map(|(_, _, target_transform)| {
                    vision::is_candidate_visible(
                        origin,
                        forward,
                        config.detection_range,
                        config.detection_angle,
                        target,
                        target_transform.translation.truncate(),
                        blockers.0.as_ref(),
                    )
                })
                .unwrap_or(false);

            if !visible {
                logger::log(&format!("👻 AI: {:?} lost target {:?}", entity, target));
                lost_events.write(TargetLost { agent: entity });
                patrol.wait_timer = 0.0;
                transition_to(entity, &mut state, &mut previous, AgentState::Patrol);
                tracked = None;
            }
        }

        // 4. Acquisition: ближайшая видимая цель из пула
        if tracked.is_none() {
            let pool: Vec<(Entity, Vec2)> = candidates
                .iter()
                .filter(|(candidate, targetable, _)| {
                    *candidate != entity && targetable.group == config.target_group
                })
                .map(|(candidate, _, candidate_transform)| {
                    (candidate, candidate_transform.translation.truncate())
                })
                .collect();

            tracked = vision::find_visible_target(
                origin,
                forward,
                config.detection_range,
                config.detection_angle,
                &pool,
                blockers.0.as_ref(),
            );
        }

        // 5. Range/delay переходы
        match tracked {
            Some(target) => {
                let Ok((_, _, target_transform)) = candidates.get(target) else {
                    continue;
                };
                let distance = origin.distance(target_transform.translation.truncate());
                let in_attack_range = distance <= config.attack_range;

                match state.clone() {
                    // Attack форсится из Detect/Chase/Attack; из Patrol путь
                    // всегда через Detect (даже если цель уже вплотную)
                    AgentState::Detect { .. } | AgentState::Chase { .. } if in_attack_range => {
                        transition_to(
                            entity,
                            &mut state,
                            &mut previous,
                            AgentState::Attack { target, timer: 0.0 },
                        );
                    }

                    AgentState::Attack { timer, .. } if in_attack_range => {
                        let elapsed = timer + delta;
                        if elapsed >= config.attack_cooldown {
                            *state = AgentState::Attack { target, timer: 0.0 };
                            attack_events.write(AttackReady {
                                agent: entity,
                                target,
                            });
                            logger::log(&format!(
                                "⚔️ AI: {:?} attack ready → {:?}",
                                entity, target
                            ));
                        } else {
                            *state = AgentState::Attack {
                                target,
                                timer: elapsed,
                            };
                        }
                    }

                    AgentState::Attack { .. } => {
                        // Цель вышла из attack range — снова преследуем
                        transition_to(
                            entity,
                            &mut state,
                            &mut previous,
                            AgentState::Chase { target },
                        );
                    }

                    AgentState::Detect { timer, .. } => {
                        let elapsed = timer + delta;
                        if elapsed >= config.detection_delay {
                            transition_to(
                                entity,
                                &mut state,
                                &mut previous,
                                AgentState::Chase { target },
                            );
                        } else {
                            *state = AgentState::Detect {
                                target,
                                timer: elapsed,
                            };
                        }
                    }

                    AgentState::Chase { .. } => {
                        // Вне attack range — продолжаем преследование
                    }

                    AgentState::Patrol => {
                        transition_to(
                            entity,
                            &mut state,
                            &mut previous,
                            AgentState::Detect { target, timer: 0.0 },
                        );
                        detected_events.write(TargetDetected {
                            agent: entity,
                            target,
                        });
                    }

                    // Stunned/Dead отсечены выше
                    AgentState::Stunned { .. } | AgentState::Dead => {}
                }
            }

            None => {
                // Никого не видим — любое не-Patrol состояние откатывается
                if !matches!(*state, AgentState::Patrol) {
                    patrol.wait_timer = 0.0;
                    transition_to(entity, &mut state, &mut previous, AgentState::Patrol);
                }
            }
        }
    }
}
