// Display helpers shared by every consumer of normalized records.

/// pt-BR number and date rendering: `.` groups thousands, `,` marks decimals.
pub mod brazilian_format {
    use chrono::{DateTime, Utc};

    // 1234567.891 with 2 decimals -> "1.234.567,89"
    pub fn format_decimal(value: f64, decimals: usize) -> String {
        let formatted = format!("{:.decimals$}", value.abs(), decimals = decimals);
        let (int_part, frac_part) = match formatted.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (formatted.as_str(), None),
        };

        let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
        for (idx, digit) in int_part.chars().enumerate() {
            if idx > 0 && (int_part.len() - idx) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }
        if let Some(frac) = frac_part {
            grouped.push(',');
            grouped.push_str(frac);
        }

        let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
        if value.is_sign_negative() && !is_zero {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

    pub fn format_brl(value: f64) -> String {
        let amount = format_decimal(value, 2);
        match amount.strip_prefix('-') {
            Some(abs) => format!("-R$ {}", abs),
            None => format!("R$ {}", amount),
        }
    }

    pub fn format_thousands(value: f64) -> String {
        format!("{} mil", format_decimal(value / 1_000.0, 2))
    }

    pub fn format_millions(value: f64) -> String {
        format!("{} M", format_decimal(value / 1_000_000.0, 2))
    }

    pub fn format_bps(value: f64) -> String {
        format!("{} bps", format_decimal(value, 2))
    }

    // Ratio in, percentage out: 0.75 -> "75,00%"
    pub fn format_percentage(value: f64, decimals: usize) -> String {
        format!("{}%", format_decimal(value * 100.0, decimals))
    }

    pub fn format_date(date: &DateTime<Utc>) -> String {
        date.format("%d/%m/%Y").to_string()
    }

    pub fn format_datetime(date: &DateTime<Utc>) -> String {
        date.format("%d/%m/%Y %H:%M").to_string()
    }

}
