/// `response_code` values the trivia API reports next to its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    NoResults,
    InvalidParameter,
    TokenNotFound,
    TokenEmpty,
    RateLimit,
    Unknown(i64),
}

impl From<i64> for ResponseCode {
    fn from(code: i64) -> Self {
        match code {
            0 => ResponseCode::Success,
            1 => ResponseCode::NoResults,
            2 => ResponseCode::InvalidParameter,
            3 => ResponseCode::TokenNotFound,
            4 => ResponseCode::TokenEmpty,
            5 => ResponseCode::RateLimit,
            other => ResponseCode::Unknown(other),
        }
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ResponseCode::Success => write!(f, "success"),
            ResponseCode::NoResults => write!(f, "not enough questions for the query"),
            ResponseCode::InvalidParameter => write!(f, "invalid parameter"),
            ResponseCode::TokenNotFound => write!(f, "session token does not exist"),
            ResponseCode::TokenEmpty => write!(f, "session token exhausted"),
            ResponseCode::RateLimit => write!(f, "rate limit exceeded"),
            ResponseCode::Unknown(code) => write!(f, "unknown response code {}", code),
        }
    }
}

impl ResponseCode {
    pub fn is_success(&self) -> bool {
        *self == ResponseCode::Success
    }
}

#[cfg(test)]
mod response_code_tests {
    use super::*;

    #[test]
    fn zero_is_the_only_success() {
        assert!(ResponseCode::from(0).is_success());
        for code in 1..=6 {
            assert!(!ResponseCode::from(code).is_success());
        }
    }

    #[test]
    fn unknown_codes_are_kept() {
        assert_eq!(ResponseCode::from(42), ResponseCode::Unknown(42));
        assert_eq!(ResponseCode::from(-1).to_string(), "unknown response code -1");
    }

    #[test]
    fn known_codes_map_to_variants() {
        assert_eq!(ResponseCode::from(1), ResponseCode::NoResults);
        assert_eq!(ResponseCode::from(5), ResponseCode::RateLimit);
    }
}
