//! Collision taxonomy
//!
//! A fixed table maps each unordered pair of collision classes to a
//! [`ContactRule`]. [`CollisionTaxonomy`] is the contact listener that
//! applies those rules to the player during a physics step.

use serde::{Serialize, Deserialize};

use platformer_physics::{CollisionClass, ContactListener, ContactPair, PhysicsWorld};

use crate::level::ConsumableKind;
use crate::player::PlayerState;

/// What a player contact with a class of shape means
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactRule {
    /// Standing on something; physical response allowed
    Ground,
    /// Instant death; no physical response
    Hazard,
    /// Picked up once; no physical response
    Consumable(ConsumableKind),
}

/// Look up the rule for a pair of classes (in either order)
///
/// Returns `None` for pairs the game never expects to collide.
pub fn rule_for(a: CollisionClass, b: CollisionClass) -> Option<ContactRule> {
    use CollisionClass::*;

    match (a, b) {
        (Player, Ground) | (Ground, Player) => Some(ContactRule::Ground),
        (Player, Hazard) | (Hazard, Player) => Some(ContactRule::Hazard),
        (Player, HealthyConsumable) | (HealthyConsumable, Player) => {
            Some(ContactRule::Consumable(ConsumableKind::Healthy))
        }
        (Player, JunkConsumable) | (JunkConsumable, Player) => {
            Some(ContactRule::Consumable(ConsumableKind::Junk))
        }
        _ => None,
    }
}

/// Effect of picking up one consumable
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumableEffect {
    /// Added to health (negative hurts), then clamped
    pub health_delta: f32,
    /// Both velocity components are multiplied by this
    pub velocity_multiplier: f32,
}

/// Effects for each consumable kind
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumableEffects {
    pub healthy: ConsumableEffect,
    pub junk: ConsumableEffect,
}

impl Default for ConsumableEffects {
    fn default() -> Self {
        Self {
            healthy: ConsumableEffect {
                health_delta: 5.0,
                velocity_multiplier: 1.20,
            },
            junk: ConsumableEffect {
                health_delta: -5.0,
                velocity_multiplier: 0.65,
            },
        }
    }
}

impl ConsumableEffects {
    pub fn for_kind(&self, kind: ConsumableKind) -> ConsumableEffect {
        match kind {
            ConsumableKind::Healthy => self.healthy,
            ConsumableKind::Junk => self.junk,
        }
    }
}

/// Contact listener applying the taxonomy to the player
///
/// Built fresh for every step from the current player state; it holds no
/// state of its own across steps.
pub struct CollisionTaxonomy<'a> {
    player: &'a mut PlayerState,
    effects: &'a ConsumableEffects,
}

impl<'a> CollisionTaxonomy<'a> {
    pub fn new(player: &'a mut PlayerState, effects: &'a ConsumableEffects) -> Self {
        Self { player, effects }
    }

    /// Rule for a pair, which must involve the current player body
    ///
    /// # Panics
    /// On an unmapped class pair or a contact with a stale player body.
    fn rule(&self, pair: &ContactPair) -> ContactRule {
        let Some(rule) = rule_for(pair.class_a, pair.class_b) else {
            panic!(
                "unmapped collision pair {:?} / {:?}",
                pair.class_a, pair.class_b
            );
        };
        match pair.side(CollisionClass::Player) {
            Some((body, _)) if body == self.player.body => rule,
            _ => panic!("contact references a player body that is not the current player"),
        }
    }
}

impl ContactListener for CollisionTaxonomy<'_> {
    fn begin(&mut self, world: &mut PhysicsWorld, pair: &ContactPair) -> bool {
        match self.rule(pair) {
            ContactRule::Ground => {
                self.player.touch_ground();
                log::debug!("Ground contact begin ({} touching)", self.player.ground_contacts());
                true
            }
            ContactRule::Hazard => {
                if !self.player.is_dead() {
                    log::info!("Player hit a hazard");
                }
                self.player.kill();
                false
            }
            ContactRule::Consumable(kind) => {
                // A dead player eats nothing; the item stays for the restart
                if self.player.is_dead() {
                    return false;
                }
                let (item_body, _, _) = pair.other_side(self.player.shape);
                // Removal fails when another contact already consumed it
                if world.remove_body(item_body) {
                    let effect = self.effects.for_kind(kind);
                    let Some(body) = world.get_body_mut(self.player.body) else {
                        panic!("player body missing from the physics world");
                    };
                    body.velocity *= effect.velocity_multiplier;
                    self.player.adjust_health(effect.health_delta);
                    log::debug!(
                        "Consumed {:?}: health now {:.0}",
                        kind,
                        self.player.health()
                    );
                }
                false
            }
        }
    }

    fn separate(&mut self, _world: &mut PhysicsWorld, pair: &ContactPair) {
        if let ContactRule::Ground = self.rule(pair) {
            self.player.leave_ground();
            log::debug!("Ground contact separate ({} touching)", self.player.ground_contacts());
        }
    }
}
