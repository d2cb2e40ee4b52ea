//! Win detection
//!
//! Collision-start pairs are classified by their labels. A ball touching the
//! goal wins the game; the first such contact latches the win so its side
//! effects run once, while every later contact is still reported.

use super::body::{BodyHandle, Label};
use super::world::CollisionPair;

/// What a pair of labels means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    BallGoal,
    BallWall,
    Other,
}

/// Unordered pair of labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPair(pub Label, pub Label);

impl LabelPair {
    pub fn of(pair: &CollisionPair) -> Self {
        Self(pair.a.label, pair.b.label)
    }

    /// Classification, independent of order
    pub fn kind(&self) -> PairKind {
        use Label::*;
        match (self.0, self.1) {
            (Ball, Goal) | (Goal, Ball) => PairKind::BallGoal,
            (Ball, Wall) | (Wall, Ball) => PairKind::BallWall,
            (Ball, Ball) | (Goal, Goal) | (Goal, Wall) | (Wall, Goal) | (Wall, Wall) => {
                PairKind::Other
            }
        }
    }
}

/// Result of observing one collision pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First ball/goal contact of the session
    Won,
    /// Ball/goal contact after the game was already won
    GoalTouched,
    /// Ball started touching a wall
    BallHitWall { ball: BodyHandle, wall: BodyHandle },
    Ignored,
}

/// Watches collision starts for the win condition
#[derive(Debug, Clone, Default)]
pub struct WinObserver {
    won: bool,
    goal_contacts: u32,
}

impl WinObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    /// Ball/goal contacts seen so far
    pub fn goal_contacts(&self) -> u32 {
        self.goal_contacts
    }

    pub fn observe(&mut self, pair: &CollisionPair) -> Observation {
        match LabelPair::of(pair).kind() {
            PairKind::BallGoal => {
                self.goal_contacts += 1;
                if self.won {
                    Observation::GoalTouched
                } else {
                    self.won = true;
                    Observation::Won
                }
            }
            PairKind::BallWall => {
                let (ball, wall) = if pair.a.label == Label::Ball {
                    (pair.a.handle, pair.b.handle)
                } else {
                    (pair.b.handle, pair.a.handle)
                };
                Observation::BallHitWall { ball, wall }
            }
            PairKind::Other => Observation::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::PairBody;

    fn pair(a: (u32, Label), b: (u32, Label)) -> CollisionPair {
        CollisionPair {
            a: PairBody {
                handle: BodyHandle(a.0),
                label: a.1,
            },
            b: PairBody {
                handle: BodyHandle(b.0),
                label: b.1,
            },
        }
    }

    #[test]
    fn test_label_pair_is_symmetric() {
        let labels = [Label::Ball, Label::Goal, Label::Wall];
        for a in labels {
            for b in labels {
                assert_eq!(LabelPair(a, b).kind(), LabelPair(b, a).kind());
            }
        }
        assert_eq!(LabelPair(Label::Goal, Label::Ball).kind(), PairKind::BallGoal);
        assert_eq!(LabelPair(Label::Wall, Label::Ball).kind(), PairKind::BallWall);
        assert_eq!(LabelPair(Label::Wall, Label::Wall).kind(), PairKind::Other);
        assert_eq!(LabelPair(Label::Goal, Label::Wall).kind(), PairKind::Other);
    }

    #[test]
    fn test_win_latches_but_contacts_are_counted() {
        let mut observer = WinObserver::new();
        assert!(!observer.has_won());

        let hit = pair((5, Label::Goal), (9, Label::Ball));
        assert_eq!(observer.observe(&hit), Observation::Won);
        assert!(observer.has_won());
        assert_eq!(observer.observe(&hit), Observation::GoalTouched);
        assert_eq!(observer.goal_contacts(), 2);
    }

    #[test]
    fn test_walls_do_not_win() {
        let mut observer = WinObserver::new();
        assert_eq!(
            observer.observe(&pair((1, Label::Wall), (9, Label::Ball))),
            Observation::BallHitWall {
                ball: BodyHandle(9),
                wall: BodyHandle(1)
            }
        );
        assert_eq!(
            observer.observe(&pair((1, Label::Wall), (2, Label::Wall))),
            Observation::Ignored
        );
        assert!(!observer.has_won());
        assert_eq!(observer.goal_contacts(), 0);
    }
}
