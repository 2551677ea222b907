//! Ready-made lexical patterns: identifiers, numbers, regex literals.

use crate::chars::{self, is_alpha, is_alpha_, is_alphanumeric, is_digit, is_hex_digit};
use crate::pattern::{
    among, has_at_least, in_range, is_char, is_char_where, is_string, many_min, many_of, not_among,
    or, sequence, Pattern,
};

/// `[a-zA-Z_][0-9a-zA-Z_]*`
pub fn is_word() -> Pattern {
    is_char_where(is_alpha_()).seq(&many_of(is_alphanumeric()))
}

/// One or more digits.
pub fn is_integer() -> Pattern {
    many_min(1, is_digit())
}

/// `0` followed by octal digits.
pub fn is_oct_integer() -> Pattern {
    is_char('0').seq(&many_of(chars::in_range('0', '7')))
}

/// A non-zero digit followed by digits.
pub fn is_dec_integer() -> Pattern {
    in_range('1', '9').seq(&many_of(is_digit()))
}

/// `0x` or `0X` followed by at least one hex digit.
pub fn is_hex_integer() -> Pattern {
    or(&is_string("0x"), &is_string("0X")).seq(&many_min(1, is_hex_digit()))
}

/// `123`, `123.` or `123.45`.
pub fn is_decimal_l() -> Pattern {
    is_integer().seq(&is_char('.').seq(&many_of(is_digit())).optional())
}

/// `.45`
pub fn is_decimal_r() -> Pattern {
    is_char('.').seq(&is_integer())
}

pub fn is_decimal() -> Pattern {
    or(&is_decimal_l(), &is_decimal_r())
}

/// `e`/`E`, an optional minus, then digits.
pub fn is_exponential() -> Pattern {
    sequence(vec![among(&['e', 'E']), is_char('-').optional(), is_integer()])
}

/// A `/.../` literal; backslash escapes any char, line breaks end it.
pub fn is_regular_expression() -> Pattern {
    let escaped = is_char('\\').seq(&has_at_least(1));
    let body = or(&escaped, &not_among(&['/', '\n', '\r', '\\'])).many();
    sequence(vec![is_char('/'), body, is_char('/')])
}

/// Trailing flags of a regex literal.
pub fn is_regular_expression_modifiers() -> Pattern {
    many_of(is_alpha())
}
