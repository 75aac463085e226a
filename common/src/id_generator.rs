use chrono::Utc;
use rand::Rng;

use crate::GameId;

/// Builds a 13 character hex id: eight digits of unix seconds followed by
/// five digits of the microsecond fraction mixed with random bits, so two
/// games created in the same microsecond still differ.
pub fn generate_game_id() -> GameId {
    let micros = Utc::now().timestamp_micros().max(0) as u64;
    let seconds = (micros / 1_000_000) & 0xffff_ffff;
    let fraction = micros % 1_000_000;
    let salt: u64 = rand::rng().random_range(0..0x10_0000);
    let suffix = (fraction ^ salt) & 0xf_ffff;
    GameId::new(format!("{:08x}{:05x}", seconds, suffix))
}
