use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

pub const DUEL_TIMEOUT_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDuel {
    pub challenger: u64,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeError {
    SelfChallenge,
    /// The challenger already has a pending request out to this user.
    AlreadyChallenged,
    ChallengerBusy,
    TargetBusy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptError {
    NoPendingDuel,
    WrongChallenger { actual: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelOutcome {
    ChallengerWins,
    AcceptorWins,
    Draw,
}

impl DuelOutcome {
    pub fn decide(challenger_roll: i32, acceptor_roll: i32) -> Self {
        match challenger_roll.cmp(&acceptor_roll) {
            std::cmp::Ordering::Greater => DuelOutcome::ChallengerWins,
            std::cmp::Ordering::Less => DuelOutcome::AcceptorWins,
            std::cmp::Ordering::Equal => DuelOutcome::Draw,
        }
    }
}

/// Pending duel requests, keyed by the challenged user.
#[derive(Debug, Default)]
pub struct DuelBook {
    pending: HashMap<u64, PendingDuel>,
}

impl DuelBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        let timeout = Duration::seconds(DUEL_TIMEOUT_SECONDS);
        self.pending.retain(|_, duel| now - duel.issued_at <= timeout);
    }

    pub fn is_involved(&self, user_id: u64) -> bool {
        self.pending.contains_key(&user_id)
            || self.pending.values().any(|duel| duel.challenger == user_id)
    }

    pub fn pending_for(&self, challenged: u64) -> Option<&PendingDuel> {
        self.pending.get(&challenged)
    }

    pub fn challenge(&mut self, challenger: u64, challenged: u64, now: DateTime<Utc>) -> Result<(), ChallengeError> {
        if challenger == challenged {
            return Err(ChallengeError::SelfChallenge);
        }

        self.purge_expired(now);

        if self.is_involved(challenger) {
            if self.pending_for(challenged).is_some_and(|duel| duel.challenger == challenger) {
                return Err(ChallengeError::AlreadyChallenged);
            }
            return Err(ChallengeError::ChallengerBusy);
        }
        if self.is_involved(challenged) {
            return Err(ChallengeError::TargetBusy);
        }

        self.pending.insert(challenged, PendingDuel { challenger, issued_at: now });
        Ok(())
    }

    /// Removes and returns the request if `challenger` is the one who issued it.
    pub fn accept(&mut self, acceptor: u64, challenger: u64, now: DateTime<Utc>) -> Result<PendingDuel, AcceptError> {
        self.purge_expired(now);

        let pending = *self.pending.get(&acceptor).ok_or(AcceptError::NoPendingDuel)?;
        if pending.challenger != challenger {
            return Err(AcceptError::WrongChallenger { actual: pending.challenger });
        }
        self.pending.remove(&acceptor);
        Ok(pending)
    }

    /// Drops the request on timeout, but only if it is still the one issued
    /// at `issued_at`.
    pub fn expire(&mut self, challenged: u64, issued_at: DateTime<Utc>) -> Option<PendingDuel> {
        match self.pending.get(&challenged) {
            Some(duel) if duel.issued_at == issued_at => self.pending.remove(&challenged),
            _ => None,
        }
    }
}
