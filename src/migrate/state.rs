use std::fmt::{Display, Formatter};

/// Lifecycle stage of a version execution.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum State {
    #[default]
    None = 0,
    Pre = 1,
    Exec = 2,
    Post = 3,
}

impl State {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Pre),
            2 => Some(Self::Exec),
            3 => Some(Self::Post),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::None => "No State",
            Self::Pre => "Pre-Checks",
            Self::Exec => "Execution",
            Self::Post => "Post-Checks",
        }
    }

    /// Describes a raw state code, falling back to `Unknown State`.
    pub fn describe_code(code: i32) -> &'static str {
        Self::from_code(code)
            .map(Self::description)
            .unwrap_or("Unknown State")
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
