use beans_derive::beans_error;
use std::borrow::Cow;

#[beans_error]
pub enum FeedError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Closed{}: {message}", format_context(.context))]
    Closed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let from_str: FeedError = "boom".into();
    assert!(matches!(from_str, FeedError::Internal { .. }));

    let io = std::io::Error::other("disk");
    let converted: FeedError = io.into();
    assert!(matches!(converted, FeedError::Io { context: None, .. }));
}
