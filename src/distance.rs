//! String distances used to rank lexicon candidates for an unknown word.
//!
//! Both functions work on `char`s, not bytes, so accented letters count once.
//! Case folding is the caller's job.

/// Standard Levenshtein distance (insert / delete / substitute, unit cost).
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    // Keep the shorter string on the inner axis: rows are O(min(|a|, |b|)).
    let (long, short) = if a_chars.len() >= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };
    let m = short.len();
    if m == 0 {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr: Vec<usize> = vec![0; m + 1];

    for (i, cl) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cs) in short.iter().enumerate() {
            let cost = usize::from(cl != cs);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

/// Positional mismatch count after right-padding the shorter string with spaces.
///
/// Unlike classic Hamming distance this is defined for any pair of strings;
/// the extra tail of the longer string counts as mismatches unless it is itself
/// made of spaces.
pub fn padded_hamming(a: &str, b: &str) -> usize {
    let mut ai = a.chars();
    let mut bi = b.chars();
    let mut diff = 0;
    loop {
        match (ai.next(), bi.next()) {
            (None, None) => return diff,
            (x, y) => {
                if x.unwrap_or(' ') != y.unwrap_or(' ') {
                    diff += 1;
                }
            }
        }
    }
}
