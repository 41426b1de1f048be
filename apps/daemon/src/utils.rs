//! Daemon utility functions.

/// Replace `${VAR}` references with environment values.
///
/// Unset variables expand to nothing. An unterminated `${` consumes the rest
/// of the input as the variable name.
pub fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let (name, tail) = match after.find('}') {
            Some(end) => (&after[..end], &after[end + 1..]),
            None => (after, ""),
        };
        if let Ok(value) = std::env::var(name) {
            out.push_str(&value);
        }
        rest = tail;
    }
    out.push_str(rest);
    out
}
