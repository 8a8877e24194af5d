//! Decimal rounding for reported sizes.
//!
//! Rounding works on the shortest decimal representation of the value rather than on its binary
//! expansion, so `1.005` rounds to `1.01` the way a human reading the number expects.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Ties round away from zero.
    HalfUp,
    /// Ties round towards the even neighbour.
    HalfEven,
}

/// Round `value` to `places` decimal places using `mode`.
///
/// Non-finite values are returned unchanged.
pub fn round_decimal(value: f64, places: u32, mode: RoundingMode) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let repr = format!("{}", value.abs());
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let places = places as usize;

    if frac_part.len() <= places {
        return value;
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(places))
        .map(|b| b - b'0')
        .collect();

    let first_dropped = frac_part.as_bytes()[places] - b'0';
    let rest_nonzero = frac_part.bytes().skip(places + 1).any(|b| b != b'0');
    let last_kept = digits.last().copied().unwrap_or(0);

    let round_up = match first_dropped {
        d if d > 5 => true,
        d if d < 5 => false,
        _ => match mode {
            RoundingMode::HalfUp => true,
            RoundingMode::HalfEven => rest_nonzero || last_kept % 2 == 1,
        },
    };

    if round_up {
        increment(&mut digits);
    }

    let split = digits.len() - places;
    let mut rounded = String::with_capacity(digits.len() + 2);
    rounded.extend(digits[..split].iter().map(|d| char::from(b'0' + d)));
    if places > 0 {
        rounded.push('.');
        rounded.extend(digits[split..].iter().map(|d| char::from(b'0' + d)));
    }

    // The digit string is always a valid float literal.
    let magnitude: f64 = rounded.parse().unwrap_or(value.abs());
    magnitude.copysign(value)
}

fn increment(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, 1);
}
