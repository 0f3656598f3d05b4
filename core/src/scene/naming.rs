use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Counter value past which [`unique_name`] stops probing.
const MAX_COUNTER: u64 = 1000;

// "<base> <digits>" at the very end of the name. `\d` is any Unicode decimal digit.
static NUMBERED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) (\d+)$").expect("Invalid numbered-name regex"));

static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("Invalid digit regex"));

/// Picks a name for an asset entering a scene whose assets are already called `existing`.
///
/// Returns `original` if it is free. Otherwise the name is split into `"<base> <n>"` when it
/// ends in a space and a number (else the whole name is the base and counting starts at 1),
/// and `"<base> <k>"` is tried for `k = n + 1, n + 2, ...` until one is free. Probing stops
/// once the counter passes 1000; the name for that counter is returned unchecked.
pub fn unique_name(original: &str, existing: &HashSet<&str>) -> String {
    if !existing.contains(original) {
        return original.to_string();
    }

    let (base, mut counter) = split_numbered(original).unwrap_or((original, 1));
    loop {
        let candidate = format!("{base} {counter}");
        if !existing.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
        if counter > MAX_COUNTER {
            return format!("{base} {counter}");
        }
    }
}

/// Splits `"<base> <n>"` into the base and `n + 1`. Counters too large to increment are
/// treated as part of the base.
fn split_numbered(name: &str) -> Option<(&str, u64)> {
    let captures = NUMBERED_NAME.captures(name)?;
    let base = captures.get(1)?.as_str();
    let counter = captures.get(2)?.as_str().chars()
        .try_fold(0u64, |n, c| n.checked_mul(10)?.checked_add(digit_value(c)))?;
    Some((base, counter.checked_add(1)?))
}

fn is_decimal_digit(c: char) -> bool {
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut [0; 4]))
}

/// Value of a Unicode decimal digit. Decimal digits are encoded in runs of ten, zero
/// first, so the value is the digit's offset within its run.
fn digit_value(c: char) -> u64 {
    if let Some(value) = c.to_digit(10) {
        return u64::from(value);
    }
    let preceding = (0..u32::from(c)).rev()
        .map_while(char::from_u32)
        .take_while(|&p| is_decimal_digit(p))
        .count();
    (preceding % 10) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(list: &[&'a str]) -> HashSet<&'a str> {
        list.iter().copied().collect()
    }

    #[test]
    fn free_name_is_kept() {
        assert_eq!(unique_name("Camera", &names(&[])), "Camera");
        assert_eq!(unique_name("Camera", &names(&["Camera 1"])), "Camera");
    }

    #[test]
    fn taken_name_gets_counter() {
        assert_eq!(unique_name("道具", &names(&["道具"])), "道具 1");
        assert_eq!(unique_name("道具", &names(&["道具", "道具 1", "道具 2"])), "道具 3");
    }

    #[test]
    fn numbered_name_continues_from_its_counter() {
        assert_eq!(unique_name("道具 1", &names(&["道具 1", "道具 2"])), "道具 3");
        assert_eq!(unique_name("Prop 7", &names(&["Prop 7"])), "Prop 8");
        // Gaps below the original counter are not reused.
        assert_eq!(unique_name("Prop 7", &names(&["Prop 7", "Prop 1"])), "Prop 8");
    }

    #[test]
    fn counter_without_space_is_part_of_base() {
        assert_eq!(unique_name("道具1", &names(&["道具1"])), "道具1 1");
        assert_eq!(unique_name("Cam 0x1", &names(&["Cam 0x1"])), "Cam 0x1 1");
    }

    #[test]
    fn only_trailing_counter_is_split() {
        assert_eq!(unique_name("Light 2 3", &names(&["Light 2 3"])), "Light 2 4");
    }

    #[test]
    fn search_is_bounded() {
        let taken: Vec<String> = std::iter::once("X".to_string())
            .chain((1..=1000).map(|n| format!("X {n}")))
            .collect();
        let existing: HashSet<&str> = taken.iter().map(String::as_str).collect();
        assert_eq!(unique_name("X", &existing), "X 1001");
    }

    #[test]
    fn bound_applies_to_high_counters() {
        // Starting past the bound, the second candidate is returned without checking.
        let existing = names(&["Y 1500", "Y 1501", "Y 1502"]);
        assert_eq!(unique_name("Y 1500", &existing), "Y 1502");
    }

    #[test]
    fn oversized_counter_is_treated_as_text() {
        let name = "Z 99999999999999999999999";
        assert_eq!(unique_name(name, &names(&[name])), format!("{name} 1"));
    }

    #[test]
    fn non_ascii_digits_are_counters() {
        assert_eq!(digit_value('７'), 7);
        assert_eq!(digit_value('٣'), 3);
        assert_eq!(digit_value('𝟗'), 9);
        assert_eq!(unique_name("道具 １", &names(&["道具 １"])), "道具 2");
        assert_eq!(unique_name("道具 １２", &names(&["道具 １２", "道具 13"])), "道具 14");
    }
}
