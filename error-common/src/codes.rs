// Stable error codes exposed on the wire.
// Clients match on these strings; never rename an existing code.

pub mod authentication {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
}

pub mod authorization {
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const QUOTE_ACCESS_DENIED: &str = "QUOTE_ACCESS_DENIED";
    pub const ACCESS_DENIED: &str = "ACCESS_DENIED";
}

pub mod validation {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
}

pub mod resource {
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

pub mod conflict {
    pub const DUPLICATE_SLUG: &str = "DUPLICATE_SLUG";
    pub const DUPLICATE_TAG_NAME: &str = "DUPLICATE_TAG_NAME";
    pub const DUPLICATE_EMAIL: &str = "DUPLICATE_EMAIL";
    pub const DUPLICATE_CATEGORY_NAME: &str = "DUPLICATE_CATEGORY_NAME";
}

pub mod system {
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}
