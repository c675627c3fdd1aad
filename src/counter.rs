//! Click counter shown on the demo surface.

/// The next value after `current` that is neither a multiple of 3 nor
/// contains the digit 3, or `None` if there is none within `u64`.
pub fn next_display_value(current: u64) -> Option<u64> {
    let mut next = current.checked_add(1)?;
    loop {
        if let Some(place) = highest_three(next) {
            // every value up to the next one with a 4 in that place contains a 3
            next = (next / place).checked_add(1)?.checked_mul(place)?;
        } else if next % 3 == 0 {
            next = next.checked_add(1)?;
        } else {
            return Some(next);
        }
    }
}

/// Place value (1, 10, 100, ...) of the most significant digit 3.
fn highest_three(mut value: u64) -> Option<u64> {
    let mut place = 1;
    let mut found = None;
    loop {
        if value % 10 == 3 {
            found = Some(place);
        }
        value /= 10;
        if value == 0 {
            return found;
        }
        place *= 10;
    }
}
