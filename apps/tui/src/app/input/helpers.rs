/// Previous index in a list of `len` items, wrapping to the end.
pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index + len - 1) % len
}

/// Next index in a list of `len` items, wrapping to the start.
pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index + 1) % len
}

/// Moves a table cursor down by `step` rows without running past the last row.
pub fn step_down(index: usize, step: usize, len: usize) -> usize {
    (index + step).min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_moves_around_both_ends() {
        assert_eq!(wrap_decrement(0, 4), 3);
        assert_eq!(wrap_increment(3, 4), 0);
        assert_eq!(wrap_increment(0, 0), 0);
    }

    #[test]
    fn step_down_stops_at_last_row() {
        assert_eq!(step_down(2, 5, 4), 3);
        assert_eq!(step_down(0, 1, 0), 0);
    }
}
