use beans_derive::beans_error;
use std::borrow::Cow;

#[beans_error]
pub enum LookupError {
    #[error("Missing{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

fn missing() -> Result<(), LookupError> {
    Err(LookupError::Missing { message: "name".into(), context: None })
}

fn io() -> Result<(), std::io::Error> {
    Err(std::io::Error::other("disk"))
}

fn main() {
    let err = missing().context("resolving property").unwrap_err();
    assert_eq!(err.to_string(), "Missing (resolving property): name");

    let err = io().context("reading").unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading): disk");
}
