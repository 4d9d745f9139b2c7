use thiserror::Error;

use crate::render::Layout;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("schema mismatch at `{path}`: expected {expected}, found {found}")]
    SchemaMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },
    #[error("{layout} layout has no representation for {shape} at `{path}`")]
    UnsupportedLayoutForShape {
        path: String,
        layout: Layout,
        shape: String,
    },
    #[error("sub-protocol contract violated at `{path}`: {detail}")]
    SubProtocolContractViolation { path: String, detail: String },
    #[error(transparent)]
    Writer(#[from] WriteError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("unknown node #{0}")]
    UnknownNode(usize),
    #[error("scope #{got} closed while #{open} is the innermost open scope")]
    UnbalancedScope { got: usize, open: usize },
    #[error("no open scope to close")]
    NoOpenScope,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate field `{field}` in complex type `{ty}`")]
    DuplicateField { ty: String, field: String },
    #[error("complex type name must not be empty")]
    EmptyTypeName,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("at `{path}`: expected {expected}")]
    Expected { path: String, expected: String },
    #[error("at `{path}`: invalid date `{raw}`: {source}")]
    BadDate {
        path: String,
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("at `{path}`: invalid date-time `{raw}`: {source}")]
    BadDateTime {
        path: String,
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{path}`")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("at JSON path {path} → {message}")]
    Json { path: String, message: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
