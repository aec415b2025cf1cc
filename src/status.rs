//! HTTP status codes as a typed enum.
//!
//! Use [`Status`] anywhere a status code is accepted: `Response::status()`,
//! `Response::builder().status()`, [`client_error`](crate::helpers::client_error),
//! or as a bare handler return value.
//!
//! ```rust
//! use stitch::{Response, Status};
//!
//! // status-only, no body
//! Response::status(Status::NoContent);
//!
//! Response::builder()
//!     .status(Status::SeeOther)
//!     .header("location", "/snippets/42")
//!     .no_body();
//!
//! assert_eq!(Status::NotFound.text(), "Not Found");
//!
//! // return Status directly from a handler
//! async fn delete_snippet(_req: stitch::Request) -> Status {
//!     Status::NoContent
//! }
//! ```

macro_rules! statuses {
    ($( $variant:ident, $code:literal => $text:literal, )*) => {
        /// All IANA-registered HTTP status codes.
        #[allow(clippy::enum_variant_names)]
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum Status {
            $( $variant, )*
        }

        impl From<Status> for u16 {
            fn from(s: Status) -> u16 {
                match s {
                    $( Status::$variant => $code, )*
                }
            }
        }

        impl Status {
            /// The standard reason phrase, e.g. `"Not Found"`.
            ///
            /// This is the body [`client_error`](crate::helpers::client_error) and
            /// [`server_error`](crate::helpers::server_error) send.
            pub fn text(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )*
                }
            }
        }
    };
}

statuses! {
    // 1xx Informational
    Continue,                      100 => "Continue",
    SwitchingProtocols,            101 => "Switching Protocols",
    Processing,                    102 => "Processing",
    EarlyHints,                    103 => "Early Hints",

    // 2xx Success
    Ok,                            200 => "OK",
    Created,                       201 => "Created",
    Accepted,                      202 => "Accepted",
    NonAuthoritativeInformation,   203 => "Non-Authoritative Information",
    NoContent,                     204 => "No Content",
    ResetContent,                  205 => "Reset Content",
    PartialContent,                206 => "Partial Content",
    MultiStatus,                   207 => "Multi-Status",
    AlreadyReported,               208 => "Already Reported",
    ImUsed,                        226 => "IM Used",

    // 3xx Redirection
    MultipleChoices,               300 => "Multiple Choices",
    MovedPermanently,              301 => "Moved Permanently",
    Found,                         302 => "Found",
    SeeOther,                      303 => "See Other",
    NotModified,                   304 => "Not Modified",
    TemporaryRedirect,             307 => "Temporary Redirect",
    PermanentRedirect,             308 => "Permanent Redirect",

    // 4xx Client errors
    BadRequest,                    400 => "Bad Request",
    Unauthorized,                  401 => "Unauthorized",
    PaymentRequired,               402 => "Payment Required",
    Forbidden,                     403 => "Forbidden",
    NotFound,                      404 => "Not Found",
    MethodNotAllowed,              405 => "Method Not Allowed",
    NotAcceptable,                 406 => "Not Acceptable",
    ProxyAuthenticationRequired,   407 => "Proxy Authentication Required",
    RequestTimeout,                408 => "Request Timeout",
    Conflict,                      409 => "Conflict",
    Gone,                          410 => "Gone",
    LengthRequired,                411 => "Length Required",
    PreconditionFailed,            412 => "Precondition Failed",
    ContentTooLarge,               413 => "Content Too Large",
    UriTooLong,                    414 => "URI Too Long",
    UnsupportedMediaType,          415 => "Unsupported Media Type",
    RangeNotSatisfiable,           416 => "Range Not Satisfiable",
    ExpectationFailed,             417 => "Expectation Failed",
    ImATeapot,                     418 => "I'm a Teapot",
    MisdirectedRequest,            421 => "Misdirected Request",
    UnprocessableContent,          422 => "Unprocessable Content",
    Locked,                        423 => "Locked",
    FailedDependency,              424 => "Failed Dependency",
    TooEarly,                      425 => "Too Early",
    UpgradeRequired,               426 => "Upgrade Required",
    PreconditionRequired,          428 => "Precondition Required",
    TooManyRequests,               429 => "Too Many Requests",
    RequestHeaderFieldsTooLarge,   431 => "Request Header Fields Too Large",
    UnavailableForLegalReasons,    451 => "Unavailable For Legal Reasons",

    // 5xx Server errors
    InternalServerError,           500 => "Internal Server Error",
    NotImplemented,                501 => "Not Implemented",
    BadGateway,                    502 => "Bad Gateway",
    ServiceUnavailable,            503 => "Service Unavailable",
    GatewayTimeout,                504 => "Gateway Timeout",
    HttpVersionNotSupported,       505 => "HTTP Version Not Supported",
    VariantAlsoNegotiates,         506 => "Variant Also Negotiates",
    InsufficientStorage,           507 => "Insufficient Storage",
    LoopDetected,                  508 => "Loop Detected",
    NotExtended,                   510 => "Not Extended",
    NetworkAuthenticationRequired, 511 => "Network Authentication Required",
}

impl Status {
    /// Numeric status code, e.g. `404`.
    pub fn code(self) -> u16 {
        self.into()
    }
}
