pub const MB: f64 = 1_048_576.0;

/// Bytes as megabytes with two decimals, e.g. `3.00`.
pub fn megabytes(b: impl Into<u64>) -> String {
    let n: f64 = b.into() as f64;
    format!("{:.2}", n / MB)
}

/// Like [`megabytes`] with the integer part grouped, e.g. `2,048.50`.
pub fn megabytes_grouped(b: impl Into<u64>) -> String {
    let plain = megabytes(b);
    match plain.split_once('.') {
        Some((whole, frac)) => format!("{}.{}", group_digits(whole), frac),
        None => group_digits(&plain),
    }
}

/// Thousands separators for a count, e.g. `1,234,567`.
pub fn count(n: u64) -> String {
    group_digits(&n.to_string())
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
