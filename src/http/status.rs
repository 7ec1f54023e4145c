#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub code_num: u16,
    pub message: &'static str,
}

impl Status {
    pub const OK: Status = Status {
        code_num: 200,
        message: "OK",
    };
    pub const CREATED: Status = Status {
        code_num: 201,
        message: "Created",
    };
    pub const BAD_REQUEST: Status = Status {
        code_num: 400,
        message: "Bad Request",
    };
    pub const NOT_FOUND: Status = Status {
        code_num: 404,
        message: "Not Found",
    };
    pub const INTERNAL_SERVER_ERROR: Status = Status {
        code_num: 500,
        message: "Internal Server Error",
    };

    pub const UNKNOWN_REASON: &'static str = "Unknown Status Code";

    /// Any numeric code, with its canonical reason phrase when one exists.
    pub fn from_code(code_num: u16) -> Status {
        let message = ::http::StatusCode::from_u16(code_num)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or(Self::UNKNOWN_REASON);

        Status { code_num, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_get_canonical_reason() {
        assert_eq!(Status::from_code(404), Status::NOT_FOUND);
        assert_eq!(Status::from_code(418).message, "I'm a teapot");
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(Status::from_code(599).message, "Unknown Status Code");
        assert_eq!(Status::from_code(42).message, "Unknown Status Code");
    }
}
