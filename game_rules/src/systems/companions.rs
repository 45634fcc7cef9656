use crate::catalog::Catalog;
use crate::entities::{CompanionRecord, PlayerState};
use crate::error::{RulesError, RulesResult};

/// Outcome of [`CompanionEngine::recruit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecruitOutcome {
    Joined(CompanionRecord),
    PartyFull,
    AlreadyInParty,
}

impl RecruitOutcome {
    pub fn joined(&self) -> bool {
        matches!(self, RecruitOutcome::Joined(_))
    }
}

impl std::fmt::Display for RecruitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecruitOutcome::Joined(c) => {
                write!(f, "{} joins your party! Ability: {}", c.name, c.ability)
            }
            RecruitOutcome::PartyFull => f.write_str("Your party is full!"),
            RecruitOutcome::AlreadyInParty => f.write_str("Already travelling with you."),
        }
    }
}

/// Recruits companions from catalog templates.
#[derive(Debug, Clone, Copy)]
pub struct CompanionEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> CompanionEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Append a copy of the template to the party.
    ///
    /// A full party or a duplicate is reported, not treated as an error.
    pub fn recruit(&self, state: &mut PlayerState, id: &str) -> RulesResult<RecruitOutcome> {
        let template = self
            .catalog
            .companion(id)
            .ok_or_else(|| RulesError::UnknownCompanion(id.to_string()))?;

        if state.has_companion(id) {
            return Ok(RecruitOutcome::AlreadyInParty);
        }
        if state.companions.len() >= self.catalog.progression.max_companions {
            return Ok(RecruitOutcome::PartyFull);
        }

        let record = CompanionRecord::from_template(id, template);
        state.companions.push(record.clone());
        tracing::info!(companion = id, "companion recruited");

        Ok(RecruitOutcome::Joined(record))
    }
}
