//! Numeric-aware string ordering: `"9" < "10"`, `"rank 2" < "rank 11"`.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compares two strings treating runs of ASCII digits as numbers.
///
/// Non-digit characters compare case-insensitively. Strings equal under
/// those rules fall back to plain byte order, so the result is a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        let ordering = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                compare_digit_runs(&l_run, &r_run)
            }
            (Some(l), Some(r)) => {
                left.next();
                right.next();
                l.to_lowercase().cmp(r.to_lowercase())
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

/// Compares digit strings by numeric value without parsing, so arbitrarily
/// long runs work.
fn compare_digit_runs(l: &str, r: &str) -> Ordering {
    let l_trim = l.trim_start_matches('0');
    let r_trim = r.trim_start_matches('0');
    l_trim
        .len()
        .cmp(&r_trim.len())
        .then_with(|| l_trim.cmp(r_trim))
}
