/// Fixed-point formatting with JavaScript `toFixed` rounding: the exact
/// decimal value of the double is rounded half away from zero.
pub fn to_fixed(x: f64, digits: usize) -> String {
    if !x.is_finite() {
        return format!("{}", x);
    }
    // Wide enough to hold the full expansion of any double.
    let exact = format!("{:.1100}", x.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part.bytes().collect();
    let int_len = kept.len();
    kept.extend(frac_part.bytes().take(digits));
    while kept.len() < int_len + digits {
        kept.push(b'0');
    }

    let round_up = frac_part
        .as_bytes()
        .get(digits)
        .map(|d| *d >= b'5')
        .unwrap_or(false);
    if round_up {
        let mut i = kept.len();
        loop {
            if i == 0 {
                kept.insert(0, b'1');
                break;
            }
            i -= 1;
            if kept[i] == b'9' {
                kept[i] = b'0';
            } else {
                kept[i] += 1;
                break;
            }
        }
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if x < 0.0 {
        out.push('-');
    }
    out.push_str(&String::from_utf8_lossy(&kept[..split]));
    if digits > 0 {
        out.push('.');
        out.push_str(&String::from_utf8_lossy(&kept[split..]));
    }
    out
}

/// `ratio` as a percentage string, e.g. `0.4125, 1` -> `41.3%`.
pub fn percent(ratio: f64, digits: usize) -> String {
    format!("{}%", to_fixed(ratio * 100.0, digits))
}
