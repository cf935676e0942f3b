use crate::game::Direction;

/// Streaming decoder for the newline-delimited command protocol.
///
/// Incoming bytes accumulate in a residual buffer until a `\n` completes a
/// line. Complete lines are trimmed, lower-cased and matched against the
/// four-token vocabulary; everything else is dropped without comment. An
/// accepted command is only emitted when it differs from the previous one,
/// so a held direction does not flood the queue with redundant turns.
///
/// One decoder serves one connection: dropping it discards any unterminated
/// residual, and a fresh connection starts with a clean dedup slate.
#[derive(Debug, Default)]
pub struct CommandDecoder {
    residual: Vec<u8>,
    last_accepted: Option<Direction>,
}

impl CommandDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning the commands it completed, in the
    /// order their terminating newline arrived.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Direction> {
        self.residual.extend_from_slice(bytes);

        let mut accepted = Vec::new();
        while let Some(end) = self.residual.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.residual.drain(..=end).collect();
            let token = String::from_utf8_lossy(&line).trim().to_ascii_lowercase();

            let Some(command) = Direction::parse(&token) else {
                continue;
            };
            if self.last_accepted == Some(command) {
                continue;
            }
            self.last_accepted = Some(command);
            accepted.push(command);
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_folding_and_garbage() {
        let mut decoder = CommandDecoder::new();
        let commands = decoder.feed(b"LEFT\nup\nGARBAGE\ndown\n");
        assert_eq!(
            commands,
            vec![Direction::Left, Direction::Up, Direction::Down]
        );
    }

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let mut decoder = CommandDecoder::new();
        let commands = decoder.feed(b"left\nleft\nleft\nright\n");
        assert_eq!(commands, vec![Direction::Left, Direction::Right]);
    }

    #[test]
    fn test_dedup_allows_reacceptance() {
        let mut decoder = CommandDecoder::new();
        let commands = decoder.feed(b"left\nright\nleft\n");
        assert_eq!(
            commands,
            vec![Direction::Left, Direction::Right, Direction::Left]
        );
    }

    #[test]
    fn test_dedup_ignores_intervening_garbage() {
        // Garbage lines are dropped before dedup ever sees them.
        let mut decoder = CommandDecoder::new();
        let commands = decoder.feed(b"left\nnoise\nleft\n");
        assert_eq!(commands, vec![Direction::Left]);
    }

    #[test]
    fn test_partial_lines_stay_buffered() {
        let mut decoder = CommandDecoder::new();
        assert!(decoder.feed(b"le").is_empty());
        assert_eq!(decoder.feed(b"ft\nri"), vec![Direction::Left]);
        assert_eq!(decoder.feed(b"ght\n"), vec![Direction::Right]);
    }

    #[test]
    fn test_unterminated_line_is_never_emitted() {
        let mut decoder = CommandDecoder::new();
        assert!(decoder.feed(b"left").is_empty());
        // The residual only resolves once the newline shows up.
        assert_eq!(decoder.feed(b"\n"), vec![Direction::Left]);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let mut decoder = CommandDecoder::new();
        assert_eq!(decoder.feed(b"  Up \r\n"), vec![Direction::Up]);
    }

    #[test]
    fn test_empty_lines_are_dropped() {
        let mut decoder = CommandDecoder::new();
        assert!(decoder.feed(b"\n\n\n").is_empty());
    }
}
