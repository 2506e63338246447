//! Auto-grow sizing for the free-text inputs

/// Rows a text occupies when soft-wrapped at `columns`, never less than one.
///
/// Hard line breaks always start a new row; a trailing newline opens an
/// empty row the caret sits on.
pub fn text_rows(text: &str, columns: usize) -> usize {
    let columns = columns.max(1);
    text.split('\n')
        .map(|line| {
            let width = line.chars().count();
            width.div_ceil(columns).max(1)
        })
        .sum::<usize>()
        .max(1)
}

/// Split a text into display rows of at most `columns` characters
pub fn wrap_rows(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut rows = Vec::with_capacity(text_rows(text, columns));
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        for chunk in chars.chunks(columns) {
            rows.push(chunk.iter().collect());
        }
    }
    rows
}
