use super::locale::NumberLocale;
use crate::mask::{Edit, FormatterState};
use std::ops::Range;
use tracing::trace;

/// Canonical decimal point stored in raw values regardless of locale.
pub const DECIMAL_POINT: char = '.';

/// Grouped number rendering for integer, decimal and currency fields.
///
/// Raw values hold ASCII digits and, for decimals, at most one
/// [`DECIMAL_POINT`]. Group separators are never stored; they are
/// re-derived from the integer digit count on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    locale: NumberLocale,
    allow_fraction: bool,
    max_fraction_digits: Option<usize>,
    max_integer_digits: Option<usize>,
    currency: Option<String>,
}

impl NumberFormat {
    pub fn integer(locale: NumberLocale) -> Self {
        Self {
            locale,
            allow_fraction: false,
            max_fraction_digits: None,
            max_integer_digits: None,
            currency: None,
        }
    }

    pub fn decimal(locale: NumberLocale) -> Self {
        Self {
            allow_fraction: true,
            ..Self::integer(locale)
        }
    }

    #[must_use]
    pub fn with_max_fraction_digits(mut self, digits: usize) -> Self {
        self.max_fraction_digits = Some(digits);
        self
    }

    #[must_use]
    pub fn with_max_integer_digits(mut self, digits: usize) -> Self {
        self.max_integer_digits = Some(digits);
        self
    }

    #[must_use]
    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency = Some(symbol.into());
        self
    }

    pub fn locale(&self) -> &NumberLocale {
        &self.locale
    }

    pub fn allows_fraction(&self) -> bool {
        self.allow_fraction
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn apply(&self, state: &FormatterState, edit: &Edit) -> FormatterState {
        let mut raw: Vec<char> = state.raw.chars().collect();
        let caret = match edit {
            Edit::Insert { text, at } => {
                let at = (*at).min(raw.len());
                self.insert_chars(&mut raw, at, text.chars())
            }
            Edit::Delete { range } => {
                let end = range.end.min(raw.len());
                let start = range.start.min(end);
                if start == end {
                    state.caret.min(raw.len())
                } else {
                    raw.drain(start..end);
                    start
                }
            }
            Edit::Backspace { at } => {
                let at = (*at).min(raw.len());
                if at == 0 {
                    state.caret.min(raw.len())
                } else {
                    raw.remove(at - 1);
                    at - 1
                }
            }
            Edit::SetRaw { text } => {
                raw.clear();
                self.insert_chars(&mut raw, 0, text.chars())
            }
        };

        let caret = self.clamp_digits(&mut raw, caret);
        FormatterState {
            raw: raw.into_iter().collect(),
            caret,
        }
    }

    pub fn render(&self, raw: &str) -> String {
        let (int_part, fraction) = split_point(raw);
        let int_len = int_part.chars().count();
        let mut out = String::new();
        if let Some(symbol) = &self.currency {
            out.push_str(symbol);
        }
        for (idx, ch) in int_part.chars().enumerate() {
            if self.separator_before(idx, int_len)
                && let Some(sep) = self.locale.grouping_separator
            {
                out.push(sep);
            }
            out.push(ch);
        }
        if let Some(fraction) = fraction {
            out.push(self.locale.decimal_separator);
            out.push_str(fraction);
        }
        out
    }

    pub fn raw_to_display(&self, raw: &str, caret: usize) -> usize {
        let len = raw.chars().count();
        let caret = caret.min(len);
        let int_len = split_point(raw).0.chars().count();
        let separators = if self.locale.grouping_separator.is_some() {
            (1..=caret.min(int_len))
                .filter(|idx| self.separator_before(*idx, int_len))
                .count()
        } else {
            0
        };
        self.prefix_len() + caret + separators
    }

    /// Counts the raw chars left of `display_caret`, skipping the currency
    /// prefix and group separators.
    pub fn display_to_raw(&self, raw: &str, display_caret: usize) -> usize {
        let display = self.render(raw);
        let body_len = display_caret.saturating_sub(self.prefix_len());
        let raw_offset = display
            .chars()
            .skip(self.prefix_len())
            .take(body_len)
            .filter(|ch| Some(*ch) != self.locale.grouping_separator)
            .count();
        raw_offset.min(raw.chars().count())
    }

    fn prefix_len(&self) -> usize {
        self.currency
            .as_deref()
            .map_or(0, |symbol| symbol.chars().count())
    }

    fn separator_before(&self, idx: usize, int_len: usize) -> bool {
        idx > 0 && idx < int_len && (int_len - idx) % self.locale.group_size.max(1) == 0
    }

    fn insert_chars(
        &self,
        raw: &mut Vec<char>,
        mut at: usize,
        chars: impl Iterator<Item = char>,
    ) -> usize {
        for ch in chars {
            let point = raw.iter().position(|c| *c == DECIMAL_POINT);
            if ch.is_ascii_digit() {
                let (count, limit) = match point {
                    Some(p) if at > p => (raw.len() - p - 1, self.max_fraction_digits),
                    Some(p) => (p, self.max_integer_digits),
                    None => (raw.len(), self.max_integer_digits),
                };
                if limit.is_some_and(|limit| count >= limit) {
                    trace!(ch = ?ch, "number part full, dropping digit");
                    continue;
                }
                raw.insert(at, ch);
                at += 1;
            } else if self.allow_fraction && point.is_none() && self.locale.is_decimal_input(ch) {
                raw.insert(at, DECIMAL_POINT);
                at += 1;
            } else {
                trace!(ch = ?ch, "char rejected by number format");
            }
        }
        at
    }

    /// Enforces digit limits after edits that move digits between the
    /// integer and fraction parts.
    fn clamp_digits(&self, raw: &mut Vec<char>, mut caret: usize) -> usize {
        let point = raw.iter().position(|c| *c == DECIMAL_POINT);
        let int_len = point.unwrap_or(raw.len());

        if let Some(max) = self.max_fraction_digits
            && let Some(p) = point
            && raw.len() - p - 1 > max
        {
            caret = drop_range(raw, p + 1 + max..raw.len(), caret);
        }
        if let Some(max) = self.max_integer_digits
            && int_len > max
        {
            caret = drop_range(raw, max..int_len, caret);
        }
        caret.min(raw.len())
    }
}

fn drop_range(raw: &mut Vec<char>, range: Range<usize>, caret: usize) -> usize {
    trace!(dropped = range.len(), "number part over limit, truncating");
    raw.drain(range.clone());
    if caret <= range.start {
        caret
    } else if caret >= range.end {
        caret - range.len()
    } else {
        range.start
    }
}

fn split_point(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once(DECIMAL_POINT) {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (raw, None),
    }
}

#[cfg(test)]
mod tests {
    use super::NumberFormat;
    use crate::formatters::locale::NumberLocale;
    use crate::mask::{Edit, FormatterState};

    #[test]
    fn groups_every_third_digit_from_right() {
        let format = NumberFormat::decimal(NumberLocale::EN_US);
        assert_eq!(format.render(""), "");
        assert_eq!(format.render("123"), "123");
        assert_eq!(format.render("1234"), "1,234");
        assert_eq!(format.render("1234567"), "1,234,567");
        assert_eq!(format.render("1234567.891"), "1,234,567.891");
    }

    #[test]
    fn locale_separators_are_used() {
        let format = NumberFormat::decimal(NumberLocale::DE_DE);
        assert_eq!(format.render("1234567.5"), "1.234.567,5");
        let plain = NumberFormat::integer(NumberLocale::PLAIN);
        assert_eq!(plain.render("1234567"), "1234567");
    }

    #[test]
    fn only_one_decimal_point_is_accepted() {
        let format = NumberFormat::decimal(NumberLocale::EN_US);
        let state = format.apply(&FormatterState::default(), &Edit::set_raw("1,234.5.6"));
        assert_eq!(state.raw, "1234.56");
        assert_eq!(state.caret, 7);
    }

    #[test]
    fn integer_rejects_decimal_point() {
        let format = NumberFormat::integer(NumberLocale::EN_US);
        let state = format.apply(&FormatterState::default(), &Edit::set_raw("12.5"));
        assert_eq!(state.raw, "125");
    }

    #[test]
    fn german_paste_reads_comma_as_point() {
        let format = NumberFormat::decimal(NumberLocale::DE_DE);
        let state = format.apply(&FormatterState::default(), &Edit::set_raw("1.234,56"));
        assert_eq!(state.raw, "1234.56");
        assert_eq!(format.render(&state.raw), "1.234,56");
    }

    #[test]
    fn fraction_digits_are_capped() {
        let format = NumberFormat::decimal(NumberLocale::EN_US).with_max_fraction_digits(2);
        let state = format.apply(&FormatterState::default(), &Edit::set_raw("9.999"));
        assert_eq!(state.raw, "9.99");

        let state = format.apply(&FormatterState::at_end("12345"), &Edit::insert(".", 2));
        assert_eq!(state.raw, "12.34");
        assert_eq!(state.caret, 3);
    }

    #[test]
    fn removing_point_respects_integer_limit() {
        let format = NumberFormat::decimal(NumberLocale::EN_US).with_max_integer_digits(3);
        let state = format.apply(&FormatterState::at_end("123.45"), &Edit::backspace(4));
        assert_eq!(state.raw, "123");
        assert_eq!(state.caret, 3);
    }

    #[test]
    fn caret_skips_group_separators() {
        let format = NumberFormat::decimal(NumberLocale::EN_US);
        assert_eq!(format.raw_to_display("1234567", 0), 0);
        assert_eq!(format.raw_to_display("1234567", 1), 2);
        assert_eq!(format.raw_to_display("1234567", 7), 9);
        assert_eq!(format.raw_to_display("1234.5", 6), 7);

        assert_eq!(format.display_to_raw("1234567", 1), 1);
        assert_eq!(format.display_to_raw("1234567", 2), 1);
        assert_eq!(format.display_to_raw("1234567", 9), 7);
    }

    #[test]
    fn currency_prefix_is_rendered_and_skipped() {
        let format = NumberFormat::decimal(NumberLocale::EN_US)
            .with_max_fraction_digits(2)
            .with_currency("$");
        assert_eq!(format.render("1234.5"), "$1,234.5");
        assert_eq!(format.raw_to_display("1234.5", 0), 1);
        assert_eq!(format.display_to_raw("1234.5", 0), 0);
        assert_eq!(format.display_to_raw("1234.5", 3), 1);
    }
}
