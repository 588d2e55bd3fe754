use std::collections::HashMap;

/// Count occurrences of each character (Unicode scalar value) in `input`.
pub fn char_count(input: &str) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for c in input.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}
