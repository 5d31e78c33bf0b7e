//! Client commands.

/// A recognized client command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `pull1` — one draw.
    Pull1,
    /// `pull10` — ten draws.
    Pull10,
}

impl Command {
    /// Decode a text payload. Matching is exact and case-sensitive; anything
    /// else is not a command.
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "pull1" => Some(Self::Pull1),
            "pull10" => Some(Self::Pull10),
            _ => None,
        }
    }

    /// Number of draws requested.
    pub fn requested(&self) -> u32 {
        match self {
            Self::Pull1 => 1,
            Self::Pull10 => 10,
        }
    }
}

/// Trailing frame reporting the remaining quota.
pub fn status_frame(quota_remaining: u32) -> String {
    format!("Pulls left: {quota_remaining}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("pull1"), Some(Command::Pull1));
        assert_eq!(Command::parse("pull10"), Some(Command::Pull10));
        assert_eq!(Command::parse("Pull1"), None);
        assert_eq!(Command::parse("pull10 "), None);
        assert_eq!(Command::parse("pull"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_requested() {
        assert_eq!(Command::Pull1.requested(), 1);
        assert_eq!(Command::Pull10.requested(), 10);
    }

    #[test]
    fn test_status_frame() {
        assert_eq!(status_frame(0), "Pulls left: 0");
        assert_eq!(status_frame(19), "Pulls left: 19");
    }
}
