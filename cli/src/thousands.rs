use std::fmt::Display;

/// Formats a count with thousands separators for progress messages.
pub struct Thousands(pub u64);

impl Display for Thousands {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        write!(formatter, "{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(value: u64) -> String {
        format!("{}", Thousands(value))
    }

    #[test]
    fn small_values_are_unchanged() {
        assert_eq!(formatted(0), "0");
        assert_eq!(formatted(7), "7");
        assert_eq!(formatted(999), "999");
    }

    #[test]
    fn groups_of_three_from_the_right() {
        assert_eq!(formatted(1000), "1,000");
        assert_eq!(formatted(20000), "20,000");
        assert_eq!(formatted(123456), "123,456");
        assert_eq!(formatted(1234567), "1,234,567");
    }

    #[test]
    fn largest_u64_is_grouped_correctly() {
        assert_eq!(formatted(u64::MAX), "18,446,744,073,709,551,615");
    }
}
