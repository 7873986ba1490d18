//! Display projection of the calculator state.

use crate::calculator::CalculatorState;

/// Format an operand for display with thousand separators.
///
/// Grouping is applied to the digit string itself, so long results keep all
/// of their digits. The sign is preserved and anything from the decimal point
/// on (including a bare trailing `.`) is passed through verbatim.
pub fn format_operand(operand: &str) -> String {
    let (sign, unsigned) = match operand.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", operand),
    };

    let (int_part, dec_part) = match unsigned.find('.') {
        Some(dot_pos) => unsigned.split_at(dot_pos),
        None => (unsigned, ""),
    };

    if int_part.is_empty() {
        return dec_part.to_string();
    }

    format!("{}{}{}", sign, group_thousands(int_part), dec_part)
}

/// Insert a `,` between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Text for the main (current operand) line. Never empty.
pub fn current_display(state: &CalculatorState) -> String {
    let formatted = format_operand(&state.current_operand);
    if formatted.is_empty() {
        "0".to_string()
    } else {
        formatted
    }
}

/// Text for the small line above: previous operand and operator glyph.
pub fn previous_display(state: &CalculatorState) -> String {
    match state.operator {
        Some(operator) if !state.previous_operand.is_empty() => {
            format!("{} {}", format_operand(&state.previous_operand), operator.glyph())
        }
        _ => String::new(),
    }
}
