use crate::domain::Balance;

/// Decode a balance body.
///
/// Leading ASCII whitespace (space, `\t`, `\n`, `\r`, vertical tab, form feed) is
/// skipped and the longest leading decimal literal
/// (sign, digits, fraction, exponent) is parsed. Returns `None` when the body
/// does not start with a number.
pub fn decode_balance_body(body: &str) -> Option<Balance> {
    let input = body.trim_start_matches(is_leading_space);
    let literal = &input[..numeric_prefix_len(input)];
    literal.parse::<f64>().ok().map(Balance::new)
}

fn is_leading_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

fn numeric_prefix_len(input: &str) -> usize {
    let bytes = input.as_bytes();
    let mut idx = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }

    let int_digits = count_digits(&bytes[idx..]);
    idx += int_digits;

    let mut frac_digits = 0;
    if bytes.get(idx) == Some(&b'.') {
        frac_digits = count_digits(&bytes[idx + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            idx += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(idx), Some(b'e' | b'E')) {
        let mut exp = idx + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            idx = exp + exp_digits;
        }
    }

    idx
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
