//! Domain logic for the bot: roll math, items, achievements, server events,
//! schedules and the minigame state machines. Nothing in here talks to the
//! network or the database.

pub mod errors;
pub mod events;
pub mod games;
pub mod models;
pub mod rewards;
pub mod roll;
pub mod schedule;
