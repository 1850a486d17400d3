use bevy::prelude::*;

/// Gameplay-level outcome raised by one system and consumed by another.
/// Events carry at most a small payload and are processed at most once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Tear the current level down and reload it.
    RestartLevel,
    /// A collectible point was picked up this tick.
    PointCollected { point: Entity },
    /// The player reached the finish.
    LevelFinished,
    /// All points collected when finishing; grants the level reward.
    RewardGranted,
    /// Debug/UI request to jump to the next level.
    LevelSkipRequested,
}

/// Ordered event buffer decoupling gameplay systems, with exactly one
/// consuming system per event kind.
///
/// Producers push in arrival order. Each consuming system calls
/// [`drain_matching`](Self::drain_matching) once per tick and removes exactly
/// the events it processed; events of other kinds stay queued for their own
/// consumer. The schedule is single-threaded and cooperative, so events pushed
/// by earlier systems in a tick are visible to later systems in the same tick.
#[derive(Resource, Debug, Default)]
pub struct GameEventQueue {
    events: Vec<GameEvent>,
}

impl GameEventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Remove and return every queued event matching `pred`, preserving
    /// arrival order. Non-matching events remain queued.
    pub fn drain_matching(
        &mut self,
        mut pred: impl FnMut(&GameEvent) -> bool,
    ) -> Vec<GameEvent> {
        let mut taken = Vec::new();
        self.events.retain(|ev| {
            if pred(ev) {
                taken.push(*ev);
                false
            } else {
                true
            }
        });
        taken
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop everything; used on level switches.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_removes_only_matching_kinds() {
        let mut q = GameEventQueue::default();
        q.push(GameEvent::LevelFinished);
        q.push(GameEvent::RestartLevel);
        q.push(GameEvent::RewardGranted);

        let finished = q.drain_matching(|e| matches!(e, GameEvent::LevelFinished));
        assert_eq!(finished, vec![GameEvent::LevelFinished]);
        // The other kinds are still queued for their own consumers.
        assert_eq!(q.len(), 2);

        // A second drain of the same kind sees nothing: no double consumption.
        assert!(q
            .drain_matching(|e| matches!(e, GameEvent::LevelFinished))
            .is_empty());
    }

    #[test]
    fn drain_preserves_arrival_order() {
        let mut q = GameEventQueue::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        q.push(GameEvent::PointCollected { point: a });
        q.push(GameEvent::RestartLevel);
        q.push(GameEvent::PointCollected { point: b });

        let collected = q.drain_matching(|e| matches!(e, GameEvent::PointCollected { .. }));
        assert_eq!(
            collected,
            vec![
                GameEvent::PointCollected { point: a },
                GameEvent::PointCollected { point: b }
            ]
        );
        assert_eq!(q.len(), 1);
    }
}
