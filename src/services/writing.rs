/// Minimum trimmed length of a writing sample
pub const MIN_SAMPLE_CHARS: usize = 50;

pub fn word_count(content: &str) -> i32 {
    content.split_whitespace().count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whitespace_separated_tokens() {
        assert_eq!(word_count("  The duty of\tcare\n arises  "), 5);
        assert_eq!(word_count(""), 0);
    }
}
