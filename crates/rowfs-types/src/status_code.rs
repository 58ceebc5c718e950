#![allow(non_snake_case)]

/// Status code type alias (`u16`).
#[allow(non_camel_case_types)]
pub type status_code_t = u16;

/// Common status codes (0-999).
pub mod StatusCode {
    use super::status_code_t;

    pub const OK: status_code_t = 0;
    pub const NOT_IMPLEMENTED: status_code_t = 1;
    pub const DATA_CORRUPTION: status_code_t = 2;
    pub const INVALID_ARG: status_code_t = 3;
    pub const INVALID_CONFIG: status_code_t = 4;
    pub const IO_ERROR: status_code_t = 69;
    pub const FOUND_BUG: status_code_t = 998;
    pub const UNKNOWN: status_code_t = 999;
}

/// Store status codes (1xxx) — failures of the backing key-value store.
pub mod StoreCode {
    use super::status_code_t;

    pub const GET_FAILED: status_code_t = 1000;
    pub const PUT_FAILED: status_code_t = 1001;
    pub const DELETE_FAILED: status_code_t = 1002;
    pub const SCAN_FAILED: status_code_t = 1003;
}

/// Namespace status codes (3xxx).
pub mod NamespaceCode {
    use super::status_code_t;

    pub const NOT_FOUND: status_code_t = 3000;
    pub const ALREADY_EXISTS: status_code_t = 3001;
    pub const PARENT_NOT_DIRECTORY: status_code_t = 3002;
    pub const NOT_DIRECTORY: status_code_t = 3003;
    pub const IS_DIRECTORY: status_code_t = 3004;
    pub const QUOTA_INVALID: status_code_t = 3005;
    pub const NOT_SUPPORTED: status_code_t = 3006;
    pub const BLOCK_MISMATCH: status_code_t = 3007;
}

/// Map a status code to its canonical display name.
pub fn to_string(code: status_code_t) -> &'static str {
    match code {
        StatusCode::OK => "OK",
        StatusCode::NOT_IMPLEMENTED => "NotImplemented",
        StatusCode::DATA_CORRUPTION => "DataCorruption",
        StatusCode::INVALID_ARG => "InvalidArg",
        StatusCode::INVALID_CONFIG => "InvalidConfig",
        StatusCode::IO_ERROR => "IoError",
        StatusCode::FOUND_BUG => "FoundBug",
        StoreCode::GET_FAILED => "Store::GetFailed",
        StoreCode::PUT_FAILED => "Store::PutFailed",
        StoreCode::DELETE_FAILED => "Store::DeleteFailed",
        StoreCode::SCAN_FAILED => "Store::ScanFailed",
        NamespaceCode::NOT_FOUND => "Namespace::NotFound",
        NamespaceCode::ALREADY_EXISTS => "Namespace::AlreadyExists",
        NamespaceCode::PARENT_NOT_DIRECTORY => "Namespace::ParentNotDirectory",
        NamespaceCode::NOT_DIRECTORY => "Namespace::NotDirectory",
        NamespaceCode::IS_DIRECTORY => "Namespace::IsDirectory",
        NamespaceCode::QUOTA_INVALID => "Namespace::QuotaInvalid",
        NamespaceCode::NOT_SUPPORTED => "Namespace::NotSupported",
        NamespaceCode::BLOCK_MISMATCH => "Namespace::BlockMismatch",
        _ => "Unknown",
    }
}
