/// Split arguments into flags (anything starting with `-`) and positionals.
///
/// Relative order is preserved inside each group. Flags are not validated;
/// delegated programs apply their own rules to them.
pub fn classify<S: AsRef<str>>(args: &[S]) -> (Vec<String>, Vec<String>) {
    let (flags, positionals): (Vec<&str>, Vec<&str>) = args
        .iter()
        .map(|arg| arg.as_ref())
        .partition(|arg| arg.starts_with('-'));

    (
        flags.into_iter().map(String::from).collect(),
        positionals.into_iter().map(String::from).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_keeps_order_within_groups() {
        let (flags, positionals) = classify(&["-r", "a", "--force", "b", "-v", "c"]);
        assert_eq!(flags, vec!["-r", "--force", "-v"]);
        assert_eq!(positionals, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_classify_lone_dash_is_a_flag() {
        let (flags, positionals) = classify(&["-", "x"]);
        assert_eq!(flags, vec!["-"]);
        assert_eq!(positionals, vec!["x"]);
    }

    #[test]
    fn test_classify_empty() {
        let (flags, positionals) = classify::<&str>(&[]);
        assert!(flags.is_empty());
        assert!(positionals.is_empty());
    }

    #[test]
    fn test_classify_dash_inside_word_is_positional() {
        let (flags, positionals) = classify(&["my-file", "-c"]);
        assert_eq!(flags, vec!["-c"]);
        assert_eq!(positionals, vec!["my-file"]);
    }
}
