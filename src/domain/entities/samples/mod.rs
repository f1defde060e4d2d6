pub mod sample_request;

pub use sample_request::{SampleRequest, SampleStatus};
