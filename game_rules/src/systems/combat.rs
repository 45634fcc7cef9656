use rand::Rng;

use crate::entities::PlayerState;

/// Lowest damage a player strike can deal.
pub const PLAYER_DAMAGE_FLOOR: u32 = 5;
/// Lowest damage an opponent strike can deal.
pub const OPPONENT_DAMAGE_FLOOR: u32 = 3;

/// Someone to fight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opponent {
    pub name: String,
    pub health: u32,
    pub attack: u32,
}

impl Opponent {
    pub fn new(name: impl Into<String>, health: u32, attack: u32) -> Self {
        Self {
            name: name.into(),
            health,
            attack,
        }
    }

    /// A friendly sparring partner scaled by level.
    pub fn sparring(name: impl Into<String>, level: u32) -> Self {
        Self::new(name, 20 + level * 5, 4 + level)
    }
}

/// How a duel went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelReport {
    pub won: bool,
    pub rounds: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
}

/// Turn-based strikes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatEngine;

impl CombatEngine {
    /// Damage drawn uniformly from `floor..=max(floor, power)`.
    pub fn roll_damage<R: Rng + ?Sized>(&self, rng: &mut R, floor: u32, power: u32) -> u32 {
        rng.gen_range(floor..=power.max(floor))
    }

    /// One strike: rolls damage and subtracts it from `defender_health`,
    /// stopping at zero. Returns the damage rolled.
    ///
    /// Deciding what zero health means is up to the caller.
    pub fn resolve_turn<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        floor: u32,
        power: u32,
        defender_health: &mut u32,
    ) -> u32 {
        let damage = self.roll_damage(rng, floor, power);
        *defender_health = defender_health.saturating_sub(damage);
        damage
    }

    /// Alternate strikes, player first, until one side drops to zero.
    ///
    /// A win counts towards `battles_won`.
    pub fn duel<R: Rng + ?Sized>(
        &self,
        state: &mut PlayerState,
        rng: &mut R,
        opponent: &mut Opponent,
    ) -> DuelReport {
        let mut report = DuelReport {
            won: false,
            rounds: 0,
            damage_dealt: 0,
            damage_taken: 0,
        };

        while !state.vitals.is_defeated() {
            report.rounds += 1;

            let before = opponent.health;
            self.resolve_turn(
                rng,
                PLAYER_DAMAGE_FLOOR,
                state.attributes.strength,
                &mut opponent.health,
            );
            report.damage_dealt += before - opponent.health;
            if opponent.health == 0 {
                report.won = true;
                break;
            }

            let rolled = self.roll_damage(rng, OPPONENT_DAMAGE_FLOOR, opponent.attack);
            report.damage_taken += state.vitals.damage(rolled);
        }

        if report.won {
            state.counters.battles_won += 1;
        }
        tracing::debug!(
            opponent = %opponent.name,
            won = report.won,
            rounds = report.rounds,
            "duel finished"
        );
        report
    }
}
