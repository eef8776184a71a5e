//! Column alignment between an original line and its rewritten form.
//!
//! A Levenshtein table over the two char sequences is backtracked from the
//! far corner. Every diagonal step (match or substitution) contributes one
//! `(original, translated)` boundary pair; `(0, 0)` is always present.
//! Ties prefer the diagonal, then a deletion of translated text, then a
//! deletion of original text.

/// Boundary pairs for one line, ascending in both coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentTable {
    pairs: Vec<(usize, usize)>,
    original_len: usize,
    translated_len: usize,
}

impl AlignmentTable {
    pub fn compute(original: &str, translated: &str) -> Self {
        let a: Vec<char> = original.chars().collect();
        let b: Vec<char> = translated.chars().collect();
        let (n, m) = (a.len(), b.len());
        let width = m + 1;

        let mut dist = vec![0u32; (n + 1) * width];
        for i in 0..=n {
            dist[i * width] = i as u32;
        }
        for j in 0..=m {
            dist[j] = j as u32;
        }
        for i in 1..=n {
            for j in 1..=m {
                let substitution = u32::from(a[i - 1] != b[j - 1]);
                let diag = dist[(i - 1) * width + j - 1] + substitution;
                let up = dist[(i - 1) * width + j] + 1;
                let left = dist[i * width + j - 1] + 1;
                dist[i * width + j] = diag.min(up).min(left);
            }
        }

        let mut pairs = Vec::with_capacity(n.min(m) + 1);
        let (mut i, mut j) = (n, m);
        while i > 0 && j > 0 {
            let diag = dist[(i - 1) * width + j - 1];
            let left = dist[i * width + j - 1];
            let up = dist[(i - 1) * width + j];
            if diag <= left && diag <= up {
                pairs.push((i, j));
                i -= 1;
                j -= 1;
            } else if left <= up {
                j -= 1;
            } else {
                i -= 1;
            }
        }
        pairs.push((0, 0));
        pairs.reverse();

        Self {
            pairs,
            original_len: n,
            translated_len: m,
        }
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Translated column for an original column, via the nearest pair at
    /// or before it.
    pub fn to_translated(&self, column: usize) -> usize {
        let column = column.min(self.original_len);
        let index = self.pairs.partition_point(|&(orig, _)| orig <= column);
        self.pairs[index.saturating_sub(1)].1
    }

    /// Original column for a translated column.
    pub fn to_original(&self, column: usize) -> usize {
        let column = column.min(self.translated_len);
        let index = self.pairs.partition_point(|&(_, trans)| trans <= column);
        self.pairs[index.saturating_sub(1)].0
    }
}

/// Map `column` on `original` to the matching column on `translated`.
pub fn align_column(original: &str, translated: &str, column: usize) -> usize {
    if original == translated {
        return column;
    }
    AlignmentTable::compute(original, translated).to_translated(column)
}

/// Map `column` on `translated` back to `original`.
pub fn align_column_reverse(original: &str, translated: &str, column: usize) -> usize {
    if original == translated {
        return column;
    }
    AlignmentTable::compute(original, translated).to_original(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ORIGINAL: &str = "int k = int(4.5);";
    const TRANSLATED: &str = "int k = Lib.parseInt(4.5);";

    #[test]
    fn test_origin_pair_always_present() {
        let table = AlignmentTable::compute("abc", "xyz");
        assert_eq!(table.pairs()[0], (0, 0));
        let empty = AlignmentTable::compute("", "");
        assert_eq!(empty.pairs(), &[(0, 0)]);
    }

    #[test]
    fn test_pairs_are_strictly_ascending() {
        let table = AlignmentTable::compute(ORIGINAL, TRANSLATED);
        for window in table.pairs().windows(2) {
            assert!(window[0].0 < window[1].0);
            assert!(window[0].1 < window[1].1);
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(4, 4)]
    #[case(8, 8)]
    #[case(17, 26)]
    fn test_cast_rewrite_columns(#[case] original: usize, #[case] translated: usize) {
        assert_eq!(align_column(ORIGINAL, TRANSLATED, original), translated);
    }

    #[test]
    fn test_reverse_lookup_of_shared_suffix() {
        // `(4.5);` is unchanged, so its opening paren maps back exactly.
        let paren = TRANSLATED.find("(4.5").unwrap();
        assert_eq!(
            align_column_reverse(ORIGINAL, TRANSLATED, paren),
            ORIGINAL.find("(4.5").unwrap()
        );
    }

    #[test]
    fn test_identical_lines_are_identity() {
        let line = "  ellipse(x, y, 10, 10);";
        for column in 0..=line.len() {
            assert_eq!(align_column(line, line, column), column);
            assert_eq!(align_column_reverse(line, line, column), column);
        }
    }

    #[test]
    fn test_columns_past_end_clamp() {
        assert_eq!(align_column("ab", "abc", 50), 2);
        assert_eq!(align_column_reverse("ab", "abc", 50), 2);
    }

    #[test]
    fn test_lookup_is_monotonic() {
        let table = AlignmentTable::compute("color c = #FF0000;", "int c = 0xffFF0000;");
        let mut previous = 0;
        for column in 0..=18 {
            let mapped = table.to_translated(column);
            assert!(mapped >= previous);
            previous = mapped;
        }
    }
}
