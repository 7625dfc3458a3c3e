//! Fuzzy scoring used by the last matcher stage.
//!
//! Both inputs are expected to be normalized already (trimmed, lowercased).
//! Lengths are measured in chars, not bytes, so accented phrases score the
//! same as their ASCII counterparts.

/// Classic unit-cost edit distance (insert / delete / substitute).
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    // Rolling rows: prev = distances for a[..i], curr = a[..i+1]
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];

    for (i, a_ch) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let substitution = prev[j] + usize::from(a_ch != *b_ch);
            let insertion = curr[j] + 1;
            let deletion = prev[j + 1] + 1;
            curr[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// `len(shorter) / len(longer)` when one string contains the other, else 0.
pub fn containment_score(a: &str, b: &str) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if !longer.contains(shorter) {
        return 0.0;
    }
    shorter.chars().count() as f32 / longer.chars().count() as f32
}

/// `(maxLen - distance) / maxLen`. Symmetric in its arguments.
pub fn edit_distance_score(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    let distance = levenshtein(a, b);
    (max_len - distance) as f32 / max_len as f32
}

/// Pair score: the better of the containment and edit-distance heuristics.
/// Always within [0, 1]; 1.0 only for equal non-empty strings.
pub fn similarity(a: &str, b: &str) -> f32 {
    containment_score(a, b)
        .max(edit_distance_score(a, b))
        .clamp(0.0, 1.0)
}
