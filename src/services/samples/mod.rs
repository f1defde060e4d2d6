pub mod sample_service;

pub use sample_service::SampleService;
