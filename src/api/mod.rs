pub use adapter::{remote::RemoteAdminAdapter, AdminAdapter, AdminError};
pub use recording::{OutputFormat, RecordSpec, RecordSpecBuilder};
pub use request::RequestPatternBuilder;
pub use response::ResponseDefinitionBuilder;
pub use server::WireMock;
pub use stub::Stub;
pub use verification::VerificationError;

pub mod adapter;
pub mod dsl;
pub mod matchers;
pub mod recording;
pub mod request;
pub mod response;
pub mod server;
pub mod stub;
pub mod verification;
