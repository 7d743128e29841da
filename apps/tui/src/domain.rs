use serde::{Deserialize, Serialize};

/// Categorical code for the nature of a conflict event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ViolenceType {
    StateBased,
    NonState,
    OneSided,
}

impl ViolenceType {
    pub const ALL: [Self; 3] = [Self::StateBased, Self::NonState, Self::OneSided];

    pub const fn code(self) -> u8 {
        match self {
            Self::StateBased => 1,
            Self::NonState => 2,
            Self::OneSided => 3,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::StateBased),
            2 => Some(Self::NonState),
            3 => Some(Self::OneSided),
            _ => None,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::StateBased),
            1 => Some(Self::NonState),
            2 => Some(Self::OneSided),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<u8>().ok().and_then(Self::from_code)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::StateBased => "State-based",
            Self::NonState => "Non-state",
            Self::OneSided => "One-sided",
        }
    }
}

impl TryFrom<u8> for ViolenceType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown violence type code {code}"))
    }
}

impl From<ViolenceType> for u8 {
    fn from(value: ViolenceType) -> Self {
        value.code()
    }
}

/// Location precision of an event, from 1 (high precision) to 3 (low precision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Clarity {
    High,
    Medium,
    Low,
}

impl Clarity {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub const fn level(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::High),
            2 => Some(Self::Medium),
            3 => Some(Self::Low),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<u8>().ok().and_then(Self::from_level)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Clarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violence_codes_map_both_ways() {
        for kind in ViolenceType::ALL {
            assert_eq!(ViolenceType::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ViolenceType::from_code(0), None);
        assert_eq!(ViolenceType::parse(" 3 "), Some(ViolenceType::OneSided));
        assert_eq!(ViolenceType::parse("x"), None);
    }

    #[test]
    fn clarity_is_a_closed_scale() {
        assert_eq!(Clarity::parse("1"), Some(Clarity::High));
        assert_eq!(Clarity::parse("4"), None);
        assert_eq!(Clarity::parse("-1"), None);
        assert!(Clarity::High < Clarity::Low);
    }
}
