//! Standard iterative-DP Levenshtein distance with unit costs, underlying
//! the token-sequence similarity subscore (§4.5).

/// Character-wise Levenshtein edit distance between `a` and `b`.
///
/// `L(s, s) == 0`; `L(s, "") == L("", s) == len(s)` (in chars, not bytes).
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = if ca == cb { 0 } else { 1 };
            let substituted = prev_diag + cost;
            let inserted = row[j] + 1;
            let deleted = above + 1;
            prev_diag = above;
            row[j + 1] = substituted.min(inserted).min(deleted);
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_have_zero_distance() {
        assert_eq!(distance("hello world", "hello world"), 0);
    }

    #[test]
    fn distance_to_empty_string_is_length() {
        assert_eq!(distance("hello", ""), 5);
        assert_eq!(distance("", "hello"), 5);
        assert_eq!(distance("", ""), 0);
    }

    #[test]
    fn single_substitution() {
        assert_eq!(distance("a+b", "a*b"), 1);
    }

    #[test]
    fn classic_kitten_sitting_example() {
        assert_eq!(distance("kitten", "sitting"), 3);
    }

    #[test]
    fn triangle_inequality_holds_on_a_sample_triple() {
        let (s1, s2, s3) = ("func ( a , b )", "func ( x , y )", "for { return }");
        let d12 = distance(s1, s2);
        let d23 = distance(s2, s3);
        let d13 = distance(s1, s3);
        assert!(d13 <= d12 + d23);
    }
}
