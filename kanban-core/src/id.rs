/// Card identifiers.
///
/// An id is `<millis>-<seq><suffix>`: a base36 millisecond timestamp, a
/// process-wide base36 sequence number and a fixed-length random base36
/// suffix. The sequence makes ids unique within a process; the timestamp
/// and suffix keep ids from separate sessions apart.
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

const SUFFIX_LEN: usize = 6;

static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a new card id.
pub fn generate_card_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("{}-{}{}", to_base36(millis), to_base36(seq), suffix)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}
