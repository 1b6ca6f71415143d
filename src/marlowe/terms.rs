//! Terminal Vocabulary
//!
//!     The smallest named patterns every block grammar is built from: fixed-width integers,
//!     free-width numbers, literal phrases, closed label sets, element symbols and multi-line
//!     integer arrays.
//!
//!     Lines reach the grammars already stripped and joined with `\n`, so terminals skip inline
//!     blanks before themselves and never cross a newline. Line ends are explicit ([`eol`]).
//!
//!     Two ordering rules make every grammar deterministic without backtracking on the format:
//!     label sets are tried longest-first (ties alphabetical), and fixed-width integers never
//!     consume more digits than their width, so abutting fields split where the columns do.

pub mod elements;
pub mod labels;

use chumsky::prelude::*;
use chumsky::BoxedParser;
use serde_json::Value;

pub use elements::ELEMENTS;

/// Error type shared by all block grammars.
pub type ParseError = Simple<char>;

/// A type-erased terminal or grammar.
pub type Terminal<O> = BoxedParser<'static, char, O, ParseError>;

/// Value a fixed-width integer field takes when the simulator overflowed it.
///
/// Fortran prints either the field's maximum digit run or a fill of `*`; both map to the
/// all-nines value for that width.
pub fn overflow_sentinel(width: usize) -> i64 {
    10_i64.saturating_pow(width.min(18) as u32) - 1
}

/// A parsed free-width number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(value) => Value::from(value),
            Number::Float(value) => Value::from(value),
        }
    }
}

/// Inline blanks, possibly none.
pub fn blank() -> impl Parser<char, (), Error = ParseError> + Clone {
    filter(|c: &char| *c == ' ' || *c == '\t').repeated().ignored()
}

/// At least one inline blank.
pub fn blank1() -> impl Parser<char, (), Error = ParseError> + Clone {
    filter(|c: &char| *c == ' ' || *c == '\t')
        .repeated()
        .at_least(1)
        .ignored()
}

/// Trailing blanks and the line terminator.
pub fn eol() -> impl Parser<char, (), Error = ParseError> + Clone {
    blank().then_ignore(just('\n'))
}

/// A literal multi-word phrase; words may be separated by any run of blanks.
pub fn phrase(text: &'static str) -> Terminal<()> {
    let mut words = text.split_whitespace();
    let first: Terminal<()> = match words.next() {
        Some(word) => blank()
            .ignore_then(just::<char, _, ParseError>(word))
            .ignored()
            .boxed(),
        None => return blank().boxed(),
    };
    words
        .fold(first, |acc, word| {
            acc.then_ignore(blank1())
                .then_ignore(just(word))
                .boxed()
        })
        .labelled(text)
        .boxed()
}

/// A phrase that makes up a whole line.
pub fn line(text: &'static str) -> Terminal<()> {
    phrase(text).then_ignore(eol()).boxed()
}

/// One label out of a closed set, longest first.
pub fn label(set: &'static [&'static str]) -> Terminal<&'static str> {
    let mut sorted = set.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let choice = sorted
        .into_iter()
        .map(|text| just::<char, _, ParseError>(text).boxed())
        .reduce(|acc, next| acc.or(next).boxed())
        .unwrap_or_else(|| filter::<char, _, ParseError>(|_| false).to("").boxed());
    blank().ignore_then(choice).boxed()
}

/// A chemical element symbol.
pub fn element() -> Terminal<&'static str> {
    label(ELEMENTS).labelled("element symbol").boxed()
}

/// `Yes` or `No`.
pub fn flag() -> Terminal<bool> {
    blank()
        .ignore_then(just("Yes").to(true).or(just("No").to(false)))
        .boxed()
}

/// A fixed-width integer field.
pub fn int(width: usize) -> Terminal<i64> {
    let stars = just::<char, _, ParseError>('*')
        .repeated()
        .exactly(width)
        .to(overflow_sentinel(width));
    let digits = just('-')
        .or_not()
        .then(
            filter(|c: &char| c.is_ascii_digit())
                .repeated()
                .at_least(1)
                .at_most(width),
        )
        .try_map(move |(sign, digits): (Option<char>, Vec<char>), span| {
            fixed_width_value(sign.is_some(), &digits, width).map_err(|msg| Simple::custom(span, msg))
        });
    blank()
        .ignore_then(stars.or(digits))
        .labelled("integer")
        .boxed()
}

fn fixed_width_value(negative: bool, digits: &[char], width: usize) -> Result<i64, String> {
    if !negative && digits.len() == width && digits.iter().all(|c| *c == '9') {
        return Ok(overflow_sentinel(width));
    }
    let text: String = digits.iter().collect();
    let value = text
        .parse::<i64>()
        .map_err(|err| format!("invalid integer {text:?}: {err}"))?;
    Ok(if negative { -value } else { value })
}

/// A free-width integer or float, including Fortran `D` exponents.
pub fn number() -> Terminal<Number> {
    let digit = filter::<char, _, ParseError>(|c: &char| c.is_ascii_digit());
    let mantissa = digit
        .clone()
        .repeated()
        .then(just('.').ignore_then(digit.clone().repeated()).or_not());
    let exponent = one_of("EeDd")
        .ignore_then(one_of("+-").or_not())
        .then(digit.repeated().at_least(1));
    let numeral = one_of("+-")
        .or_not()
        .then(mantissa)
        .then(exponent.or_not())
        .try_map(|((sign, (whole, fraction)), exponent), span| {
            numeral_value(sign, &whole, fraction.as_deref(), exponent.as_ref())
                .map_err(|msg| Simple::custom(span, msg))
        });
    let stars = just('*')
        .repeated()
        .at_least(1)
        .map(|stars: Vec<char>| Number::Int(overflow_sentinel(stars.len())));
    blank()
        .ignore_then(stars.or(numeral))
        .labelled("number")
        .boxed()
}

fn numeral_value(
    sign: Option<char>,
    whole: &[char],
    fraction: Option<&[char]>,
    exponent: Option<&(Option<char>, Vec<char>)>,
) -> Result<Number, String> {
    if whole.is_empty() && fraction.map_or(true, |digits| digits.is_empty()) {
        return Err("expected a number".to_string());
    }
    let mut text = String::new();
    if sign == Some('-') {
        text.push('-');
    }
    text.extend(whole);
    if fraction.is_none() && exponent.is_none() {
        return text
            .parse::<i64>()
            .map(Number::Int)
            .map_err(|err| format!("invalid integer {text:?}: {err}"));
    }
    text.push('.');
    text.extend(fraction.unwrap_or_default());
    if let Some((exponent_sign, exponent_digits)) = exponent {
        text.push('e');
        if let Some(exponent_sign) = exponent_sign {
            text.push(*exponent_sign);
        }
        text.extend(exponent_digits);
    }
    if text.starts_with('.') || text.starts_with("-.") {
        text = text.replacen('.', "0.", 1);
    }
    text.parse::<f64>()
        .map(Number::Float)
        .map_err(|err| format!("invalid number {text:?}: {err}"))
}

/// A number read as `f64`.
pub fn float() -> Terminal<f64> {
    number().map(Number::as_f64).boxed()
}

/// Three floats, for positions and direction cosines.
pub fn float3() -> Terminal<[f64; 3]> {
    float()
        .then(float())
        .then(float())
        .map(|((x, y), z)| [x, y, z])
        .boxed()
}

/// A run of non-blank characters.
pub fn word() -> Terminal<String> {
    blank()
        .ignore_then(
            filter(|c: &char| !c.is_whitespace())
                .repeated()
                .at_least(1)
                .collect::<String>(),
        )
        .boxed()
}

/// Everything up to the end of the line, trimmed.
pub fn rest_of_line() -> Terminal<String> {
    filter::<char, _, ParseError>(|c: &char| *c != '\n')
        .repeated()
        .collect::<String>()
        .map(|text| text.trim().to_string())
        .boxed()
}

/// Rows of `columns` fixed-width integers, the last row possibly short, flattened.
///
/// Zero rows is an empty array; callers that declare a count check it against the result.
pub fn int_rows(width: usize, columns: usize) -> Terminal<Vec<i64>> {
    let columns = columns.max(1);
    let full = int(width).repeated().exactly(columns).then_ignore(eol());
    let short = int(width)
        .repeated()
        .at_least(1)
        .at_most(columns.saturating_sub(1).max(1))
        .then_ignore(eol());
    full.repeated()
        .then(short.or_not())
        .map(|(rows, last)| {
            let mut values: Vec<i64> = rows.into_iter().flatten().collect();
            values.extend(last.unwrap_or_default());
            values
        })
        .boxed()
}

/// Run a terminal over a whole input, for tests and one-off field parsing.
pub fn parse_all<O>(terminal: Terminal<O>, text: &str) -> Result<O, Vec<ParseError>> {
    terminal.then_ignore(end()).parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::prelude::any;
    use rstest::rstest;

    #[rstest]
    #[case(5, "12345", 12345)]
    #[case(5, "   42", 42)]
    #[case(5, "-1234", -1234)]
    #[case(5, "00007", 7)]
    #[case(5, "99999", 99_999)]
    #[case(5, "*****", 99_999)]
    #[case(3, "***", 999)]
    #[case(8, "99999999", 99_999_999)]
    fn fixed_width_integers(#[case] width: usize, #[case] text: &str, #[case] expected: i64) {
        assert_eq!(parse_all(int(width), text), Ok(expected));
    }

    #[test]
    fn abutting_fields_split_on_width() {
        let pair = int(5).then(int(5)).boxed();
        assert_eq!(parse_all(pair, "1234567890"), Ok((12345, 67890)));
    }

    #[test]
    fn short_star_fill_is_not_an_integer() {
        assert!(parse_all(int(5), "***").is_err());
    }

    #[test]
    fn overflow_sentinels() {
        assert_eq!(overflow_sentinel(1), 9);
        assert_eq!(overflow_sentinel(6), 999_999);
        assert_eq!(overflow_sentinel(30), 999_999_999_999_999_999);
    }

    #[rstest]
    #[case("3.6150", Number::Float(3.615))]
    #[case("-0.5", Number::Float(-0.5))]
    #[case("1.5E+02", Number::Float(150.0))]
    #[case("2.5D-1", Number::Float(0.25))]
    #[case(".25", Number::Float(0.25))]
    #[case("12.", Number::Float(12.0))]
    #[case("1234", Number::Int(1234))]
    #[case("  -17", Number::Int(-17))]
    #[case("******", Number::Int(999_999))]
    fn numbers(#[case] text: &str, #[case] expected: Number) {
        assert_eq!(parse_all(number(), text), Ok(expected));
    }

    #[test]
    fn number_rejects_words() {
        assert!(parse_all(number(), "Cu").is_err());
        assert!(parse_all(number(), ".").is_err());
    }

    #[test]
    fn labels_prefer_the_longest() {
        let set: &'static [&'static str] = &["Displaced Atoms", "Displaced Atoms Sputtered"];
        assert_eq!(
            parse_all(label(set), "Displaced Atoms Sputtered"),
            Ok("Displaced Atoms Sputtered")
        );
        assert_eq!(parse_all(label(set), "Displaced Atoms"), Ok("Displaced Atoms"));
    }

    #[test]
    fn two_letter_symbols_win_over_one_letter_prefixes() {
        assert_eq!(parse_all(element(), "Cu"), Ok("Cu"));
        assert_eq!(parse_all(element(), "C"), Ok("C"));
        assert_eq!(parse_all(element(), "Og"), Ok("Og"));
        assert!(parse_all(element(), "Qq").is_err());
    }

    #[test]
    fn phrases_tolerate_column_spacing() {
        assert!(parse_all(phrase("Initial Energy"), "Initial     Energy").is_ok());
        assert!(parse_all(phrase("Initial Energy"), "InitialEnergy").is_err());
    }

    #[test]
    fn int_rows_flatten_with_short_last_row() {
        let text = "1 2 3\n4 5 6\n7\n";
        assert_eq!(parse_all(int_rows(6, 3), text), Ok(vec![1, 2, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn int_rows_may_be_empty() {
        assert_eq!(parse_all(int_rows(6, 3), ""), Ok(vec![]));
    }

    #[test]
    fn int_rows_reject_long_rows() {
        assert!(parse_all(int_rows(6, 3), "1 2 3 4\n").is_err());
    }

    #[test]
    fn flags_and_words() {
        assert_eq!(parse_all(flag(), " Yes"), Ok(true));
        assert_eq!(parse_all(flag(), "No"), Ok(false));
        assert_eq!(parse_all(word(), "  15b"), Ok("15b".to_string()));
        assert_eq!(parse_all(rest_of_line(), " a  b "), Ok("a  b".to_string()));
    }

    proptest! {
        #[test]
        fn any_non_nines_digit_run_parses_literally(width in 1usize..=9, seed in any::<u64>()) {
            let max = overflow_sentinel(width) as u64;
            let value = seed % max;
            let text = format!("{:0width$}", value, width = width);
            prop_assert_eq!(parse_all(int(width), &text), Ok(value as i64));
        }

        #[test]
        fn all_max_digit_fields_are_sentinels(width in 1usize..=12, stars in any::<bool>()) {
            let fill = if stars { '*' } else { '9' };
            let text: String = std::iter::repeat(fill).take(width).collect();
            prop_assert_eq!(parse_all(int(width), &text), Ok(overflow_sentinel(width)));
        }
    }
}
