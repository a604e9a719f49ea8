use std::ops::{Add, AddAssign};

use crate::classify::LineResult;

/// Line counters for one file or for a whole tree.
///
/// `total_lines` counts physical lines; the three buckets may sum to more
/// than that because a line can land in two of them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineTotals {
    pub code_lines: u64,
    pub comment_lines: u64,
    pub blank_lines: u64,
    pub total_lines: u64,
}

impl LineTotals {
    pub fn record(&mut self, line: &LineResult) {
        self.total_lines += 1;
        self.code_lines += u64::from(line.is_code);
        self.comment_lines += u64::from(line.is_comment);
        self.blank_lines += u64::from(line.is_blank);
    }
}

impl AddAssign for LineTotals {
    fn add_assign(&mut self, other: Self) {
        self.code_lines += other.code_lines;
        self.comment_lines += other.comment_lines;
        self.blank_lines += other.blank_lines;
        self.total_lines += other.total_lines;
    }
}

impl Add for LineTotals {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FileClassifier;

    #[test]
    fn test_record_counts_every_flag() {
        let mut totals = LineTotals::default();
        totals.record(&LineResult {
            is_code: true,
            is_comment: true,
            is_blank: false,
            in_block_comment: false,
        });
        totals.record(&LineResult {
            is_code: false,
            is_comment: true,
            is_blank: true,
            in_block_comment: true,
        });
        assert_eq!(
            totals,
            LineTotals {
                code_lines: 1,
                comment_lines: 2,
                blank_lines: 1,
                total_lines: 2,
            }
        );
    }

    #[test]
    fn test_every_line_lands_in_a_bucket() {
        let source = [
            "package demo;",
            "",
            "/*",
            "",
            " */",
            "class A { // trailing",
            "    String s = \"//\";",
            "}",
        ];
        let mut classifier = FileClassifier::new();
        let mut totals = LineTotals::default();
        for line in source {
            let result = classifier.push(line);
            assert!(
                result.is_code || result.is_comment || result.is_blank,
                "line {line:?} was not counted"
            );
            totals.record(&result);
        }
        assert_eq!(totals.total_lines, source.len() as u64);
        assert!(totals.code_lines + totals.comment_lines + totals.blank_lines >= totals.total_lines);
        assert_eq!(totals.code_lines, 4);
        assert_eq!(totals.comment_lines, 4);
        assert_eq!(totals.blank_lines, 2);
    }

    #[test]
    fn test_fold_is_order_independent() {
        let a = LineTotals {
            code_lines: 3,
            comment_lines: 2,
            blank_lines: 1,
            total_lines: 6,
        };
        let b = LineTotals {
            code_lines: 10,
            comment_lines: 0,
            blank_lines: 4,
            total_lines: 14,
        };
        assert_eq!(a + b, b + a);
        let mut folded = LineTotals::default();
        folded += b;
        folded += a;
        assert_eq!(folded, a + b);
        assert_eq!(folded.code_lines, 13);
        assert_eq!(folded.total_lines, 20);
    }
}
