//! Single-character flag detection for built-in arguments.

/// Outcome of looking for a flag among arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagStatus {
    /// No argument starts with `-`.
    Absent,
    /// The flag appears in at least one `-`-prefixed argument.
    Present,
    /// `-`-prefixed arguments exist but none of them carries the flag.
    Conflict,
}

/// Look for `flag` in every argument that starts with `-`.
///
/// `-rx` counts as carrying both `r` and `x`.
pub fn check_flag(args: &[&str], flag: char) -> FlagStatus {
    let mut saw_flags = false;
    for arg in args {
        if let Some(letters) = arg.strip_prefix('-') {
            saw_flags = true;
            if letters.contains(flag) {
                return FlagStatus::Present;
            }
        }
    }
    if saw_flags {
        FlagStatus::Conflict
    } else {
        FlagStatus::Absent
    }
}

/// Arguments starting with `-`, in order.
pub fn flag_args<'a>(args: &[&'a str]) -> Vec<&'a str> {
    args.iter().copied().filter(|a| a.starts_with('-')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_without_dash_arguments() {
        assert_eq!(check_flag(&["src", "docs"], 'r'), FlagStatus::Absent);
        assert_eq!(check_flag(&[], 'r'), FlagStatus::Absent);
    }

    #[test]
    fn present_alone_or_combined() {
        assert_eq!(check_flag(&["-r"], 'r'), FlagStatus::Present);
        assert_eq!(check_flag(&["src", "-xr"], 'r'), FlagStatus::Present);
        assert_eq!(check_flag(&["-x", "-r"], 'r'), FlagStatus::Present);
    }

    #[test]
    fn unknown_letter_is_a_conflict() {
        assert_eq!(check_flag(&["-x"], 'r'), FlagStatus::Conflict);
        assert_eq!(check_flag(&["-"], 'r'), FlagStatus::Conflict);
    }

    #[test]
    fn collects_dash_arguments() {
        assert_eq!(flag_args(&["a", "-x", "b", "-y"]), vec!["-x", "-y"]);
    }
}
