//! Random server-wide events that nudge every roll up or down for a while.
//!
//! The bot checks once at the top of every hour. An event that has run its
//! course is ended; otherwise, outside the quiet hours, there is a small chance
//! a new one starts.

use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::roll::start_of_hour;

#[derive(Debug, PartialEq, Eq)]
pub struct ServerEvent {
    pub name: &'static str,
    pub effect: i32,
    pub duration_hours: i64,
    pub start_message: &'static str,
    pub end_message: &'static str,
    /// Embed color as `0xRRGGBB`.
    pub color: u32,
}

pub static EVENTS: [ServerEvent; 4] = [
    ServerEvent {
        name: "Heat Wave",
        effect: 2,
        duration_hours: 1,
        start_message: "☀️ **Heat Wave!** Every roll gets +2 for the next hour!",
        end_message: "☀️ The Heat Wave has passed. Rolls are back to normal.",
        color: 0xE67E22,
    },
    ServerEvent {
        name: "Cold Snap",
        effect: -2,
        duration_hours: 1,
        start_message: "❄️ **Cold Snap!** Every roll gets -2 for the next hour!",
        end_message: "❄️ The Cold Snap is over. Rolls are back to normal.",
        color: 0x3498DB,
    },
    ServerEvent {
        name: "Growth Spurt",
        effect: 1,
        duration_hours: 2,
        start_message: "🌱 **Growth Spurt!** Every roll gets +1 for the next 2 hours!",
        end_message: "🌱 The Growth Spurt is over. Rolls are back to normal.",
        color: 0x2ECC71,
    },
    ServerEvent {
        name: "Shrinkage",
        effect: -1,
        duration_hours: 2,
        start_message: "🥶 **Shrinkage!** Every roll gets -1 for the next 2 hours!",
        end_message: "🥶 The Shrinkage has worn off. Rolls are back to normal.",
        color: 0x979C9F,
    },
];

/// Chance, in percent, that an event starts on an eligible hour.
pub const EVENT_CHANCE_PERCENT: u32 = 5;

/// Local hours (inclusive) during which no event starts.
pub const QUIET_HOURS: std::ops::RangeInclusive<u32> = 2..=7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEvent {
    pub event: &'static ServerEvent,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl ActiveEvent {
    pub fn begin(event: &'static ServerEvent, now: DateTime<Utc>) -> Self {
        let started_at = start_of_hour(now);
        Self {
            event,
            started_at,
            ends_at: started_at + Duration::hours(event.duration_hours),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.ends_at
    }

    /// Name and effect to feed into a roll, if the event is still running.
    pub fn modifier(&self, now: DateTime<Utc>) -> Option<(String, i32)> {
        self.is_active(now)
            .then(|| (self.event.name.to_string(), self.event.effect))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTick {
    Ended(ActiveEvent),
    Started(ActiveEvent),
    Continuing { remaining: Duration },
    QuietHours,
    NothingHappened,
}

/// Advances the event clock by one hourly check.
pub fn tick<R: Rng + ?Sized>(
    current: &mut Option<ActiveEvent>,
    now: DateTime<Utc>,
    timezone: Tz,
    rng: &mut R,
) -> EventTick {
    if let Some(active) = *current {
        if active.is_active(now) {
            return EventTick::Continuing {
                remaining: active.ends_at - now,
            };
        }
        *current = None;
        return EventTick::Ended(active);
    }

    let local_hour = now.with_timezone(&timezone).hour();
    if QUIET_HOURS.contains(&local_hour) {
        return EventTick::QuietHours;
    }

    if rng.gen_range(1..=100) > EVENT_CHANCE_PERCENT {
        return EventTick::NothingHappened;
    }

    match EVENTS.choose(rng) {
        Some(event) => {
            let active = ActiveEvent::begin(event, now);
            *current = Some(active);
            EventTick::Started(active)
        }
        None => EventTick::NothingHappened,
    }
}
