pub mod client;
pub mod endpoints;
pub mod projects;
pub mod transport;
pub mod upload;

pub use client::ApiClient;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use upload::{upload_file, ProjectUpload, UploadAbortHandle, UploadTask};
