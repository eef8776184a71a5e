//! Sugar rewriting.
//!
//! A fixed, ordered list of rules turns dialect shorthand into plain base
//! language. Rules never add or remove line breaks, so line numbers are
//! stable through rewriting; columns on touched lines are recovered later
//! by alignment. Matches inside string literals and comments are skipped.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use smol_str::SmolStr;
use text_size::TextSize;

use crate::base::LineIndex;
use crate::parser::literal_and_comment_ranges;

/// One applied rewrite. `column` is measured in the text the rule ran on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rewrite {
    pub rule: &'static str,
    pub line: usize,
    pub column: usize,
    pub from: SmolStr,
    pub to: SmolStr,
}

/// Rewrites applied to one file, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RewriteLog {
    rewrites: Vec<Rewrite>,
}

impl RewriteLog {
    /// Whether any rule changed `line`.
    pub fn touches(&self, line: usize) -> bool {
        self.rewrites.iter().any(|r| r.line == line)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rewrite> {
        self.rewrites.iter()
    }

    pub fn len(&self) -> usize {
        self.rewrites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewrites.is_empty()
    }
}

/// Text after sugar rewriting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rewritten {
    pub text: String,
    pub log: RewriteLog,
}

struct SugarRule {
    name: &'static str,
    pattern: &'static Lazy<Regex>,
    /// Replacement for a match, or `None` to leave it alone.
    replace: fn(&Captures<'_>, &str) -> Option<String>,
}

static CAST_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(int|char|float|boolean|byte)[ \t]*\(").expect("cast pattern is valid")
});

static WEB_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([0-9a-fA-F]{6})").expect("color pattern is valid"));

static COLOR_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bcolor\b").expect("color type pattern is valid"));

static RULES: [SugarRule; 3] = [
    SugarRule {
        name: "cast-call",
        pattern: &CAST_CALL,
        replace: |captures, text| {
            let found = captures.get(0)?;
            if preceded_by_dot(text, found.start()) {
                return None;
            }
            let target = captures.get(1)?.as_str();
            let mut upper = target.chars();
            let first = upper.next()?.to_ascii_uppercase();
            Some(format!("PApplet.parse{first}{}(", upper.as_str()))
        },
    },
    SugarRule {
        name: "web-color",
        pattern: &WEB_COLOR,
        replace: |captures, text| {
            let found = captures.get(0)?;
            if text[found.end()..].starts_with(is_ident_char) {
                return None;
            }
            Some(format!("0xff{}", captures.get(1)?.as_str()))
        },
    },
    SugarRule {
        name: "color-type",
        pattern: &COLOR_TYPE,
        replace: |captures, text| {
            let found = captures.get(0)?;
            if preceded_by_dot(text, found.start())
                || text[found.end()..].trim_start_matches([' ', '\t']).starts_with('(')
            {
                return None;
            }
            Some("int".to_string())
        },
    },
];

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn preceded_by_dot(text: &str, at: usize) -> bool {
    text[..at].trim_end_matches([' ', '\t']).ends_with('.')
}

/// Apply every sugar rule to `text`, in order.
pub fn expand_sugar(text: &str) -> Rewritten {
    let mut current = text.to_string();
    let mut log = RewriteLog::default();
    for rule in &RULES {
        current = apply_rule(rule, &current, &mut log);
    }
    Rewritten { text: current, log }
}

fn apply_rule(rule: &SugarRule, text: &str, log: &mut RewriteLog) -> String {
    if !rule.pattern.is_match(text) {
        return text.to_string();
    }
    let masked = literal_and_comment_ranges(text);
    let index = LineIndex::new(text);
    let mut out = String::with_capacity(text.len() + 16);
    let mut copied = 0usize;

    for captures in rule.pattern.captures_iter(text) {
        let Some(found) = captures.get(0) else {
            continue;
        };
        let start = TextSize::new(found.start() as u32);
        if masked.iter().any(|range| range.contains(start)) {
            continue;
        }
        let Some(replacement) = (rule.replace)(&captures, text) else {
            continue;
        };
        let position = index.line_col(text, start);
        log.rewrites.push(Rewrite {
            rule: rule.name,
            line: position.line as usize,
            column: position.col as usize,
            from: SmolStr::new(found.as_str()),
            to: SmolStr::new(&replacement),
        });
        out.push_str(&text[copied..found.start()]);
        out.push_str(&replacement);
        copied = found.end();
    }
    out.push_str(&text[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("int k = int(4.5);", "int k = PApplet.parseInt(4.5);")]
    #[case("float f = float (s);", "float f = PApplet.parseFloat(s);")]
    #[case("boolean b = boolean(1);", "boolean b = PApplet.parseBoolean(1);")]
    #[case("fill(#FF8800);", "fill(0xffFF8800);")]
    #[case("color c = color(255);", "int c = color(255);")]
    #[case("color[] palette;", "int[] palette;")]
    fn test_rewrites(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(expand_sugar(input).text, expected);
    }

    #[rstest]
    #[case("String s = \"int(3) #FF0000 color\";")]
    #[case("// color c = int(x);")]
    #[case("x.color = y.int(2);")]
    #[case("int x = #FF00FFAA;")]
    #[case("int mycolor = 0;")]
    fn test_untouched(#[case] input: &str) {
        let rewritten = expand_sugar(input);
        assert_eq!(rewritten.text, input);
        assert!(rewritten.log.is_empty());
    }

    #[test]
    fn test_line_breaks_are_preserved() {
        let input = "color a = #102030;\nint b = 1;\nfloat c = float(b);\n";
        let rewritten = expand_sugar(input);
        assert_eq!(
            rewritten.text.matches('\n').count(),
            input.matches('\n').count()
        );
        assert!(rewritten.log.touches(0));
        assert!(!rewritten.log.touches(1));
        assert!(rewritten.log.touches(2));
        assert_eq!(rewritten.log.len(), 3);
    }

    #[test]
    fn test_log_records_rule_and_column() {
        let rewritten = expand_sugar("  x = int(y);");
        let rewrite = rewritten.log.iter().next().unwrap();
        assert_eq!(rewrite.rule, "cast-call");
        assert_eq!(rewrite.column, 6);
        assert_eq!(rewrite.from, "int(");
    }
}
