use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnyVerError {
    #[error("version string is not parseable: {0:?}")]
    Unparseable(String),

    #[error("numeric component {0:?} does not fit the widest supported storage width")]
    ComponentOverflow(String),

    #[error("component index {index} is out of range for a version with {len} components")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("version with {len} components has no {field} component")]
    MissingComponent { field: &'static str, len: usize },

    #[error("invalid format template {template:?}: {reason}")]
    InvalidTemplate { template: String, reason: String },
}

pub type Result<T> = std::result::Result<T, AnyVerError>;
