//! Formats amounts of money for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::money::Money;

/// Format `amount` as dollars with two decimal places, e.g. "$1,234.50" or "-$3.00".
pub fn format_currency(amount: Money) -> String {
    let number = amount.as_f64();

    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatted_string = if number < 0.0 {
        match negative_fmt {
            Some(formatter) => formatter.fmt_string(number.abs()),
            None => format!("-${:.2}", number.abs()),
        }
    } else if number > 0.0 {
        match positive_fmt {
            Some(formatter) => formatter.fmt_string(number),
            None => format!("${number:.2}"),
        }
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    };

    pad_cents(formatted_string)
}

/// numfmt drops trailing zeros after the decimal point, e.g. "$12.30" comes
/// out as "$12.3" and "$5.00" as "$5".
fn pad_cents(formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        None => format!("{formatted_string}.00"),
        Some(position) => match formatted_string.len() - position - 1 {
            0 => format!("{formatted_string}00"),
            1 => format!("{formatted_string}0"),
            _ => formatted_string,
        },
    }
}
