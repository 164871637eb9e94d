//! Splitting a command line into words.

/// Split `input` on spaces, keeping double-quoted runs together.
///
/// Quotes are removed and empty words are dropped; an unterminated quote
/// extends to the end of the line.
///
/// ```
/// use tc65_shell::split_command;
///
/// assert_eq!(split_command("put \"my file.txt\" a.txt"), vec!["put", "my file.txt", "a.txt"]);
/// ```
pub fn split_command(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                if in_quotes && !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
